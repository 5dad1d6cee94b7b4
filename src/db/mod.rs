mod backend;
mod postgres;
mod sqlite;

pub use backend::{ApiTokenInfo, DocumentStore};
pub use postgres::PostgresStore;
pub use sqlite::SqliteStore;
