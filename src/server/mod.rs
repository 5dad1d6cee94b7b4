mod config;
mod daemon;
mod error;
mod routes;

pub use config::{
  BackendType, CacheSection, LoggingSection, PostgresSection, ServerConfig, ServerSection,
  SqliteSection,
};
pub use daemon::Daemon;
pub use error::ApiError;
pub use routes::{build_router, AppState, HOME_PATH, LISTING_PATH};
