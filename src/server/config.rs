use serde::{Deserialize, Serialize};
use std::path::Path;

/// Expand environment variables in a string.
/// Supports $VAR_NAME and ${VAR_NAME} syntax.
fn expand_env_vars(input: &str) -> String {
  let mut result = input.to_string();

  // Handle ${VAR_NAME} syntax first (more specific)
  while let Some(start) = result.find("${") {
    if let Some(end) = result[start..].find('}') {
      let var_name = &result[start + 2..start + end];
      let value = std::env::var(var_name).unwrap_or_default();
      result = format!(
        "{}{}{}",
        &result[..start],
        value,
        &result[start + end + 1..]
      );
    } else {
      break;
    }
  }

  // Handle $VAR_NAME syntax (word boundary: alphanumeric + underscore)
  let mut i = 0;
  while i < result.len() {
    if result[i..].starts_with('$') && !result[i..].starts_with("${") {
      let rest = &result[i + 1..];
      let var_len = rest
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
        .count();
      if var_len > 0 {
        let var_name = &rest[..var_len];
        let value = std::env::var(var_name).unwrap_or_default();
        result = format!("{}{}{}", &result[..i], value, &rest[var_len..]);
        i += value.len();
        continue;
      }
    }
    i += 1;
  }

  result
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendType {
  Postgres,
  #[default]
  Sqlite,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
  #[serde(default)]
  pub server: ServerSection,
  #[serde(default)]
  pub backend: BackendType,
  #[serde(default)]
  pub postgres: PostgresSection,
  #[serde(default)]
  pub sqlite: SqliteSection,
  #[serde(default)]
  pub logging: LoggingSection,
  #[serde(default)]
  pub cache: CacheSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSection {
  #[serde(default = "default_host")]
  pub host: String,
  #[serde(default = "default_http_port")]
  pub port: u16,
  /// CORS allowed origins for browser clients.
  /// Use ["*"] for permissive mode, or specify origins like ["http://localhost:3000"]
  #[serde(default = "default_cors_origins")]
  pub cors_origins: Vec<String>,
}

fn default_host() -> String {
  "0.0.0.0".into()
}
fn default_http_port() -> u16 {
  8080
}
fn default_cors_origins() -> Vec<String> {
  vec!["*".to_string()]
}

impl Default for ServerSection {
  fn default() -> Self {
    Self {
      host: default_host(),
      port: default_http_port(),
      cors_origins: default_cors_origins(),
    }
  }
}

/// Page cache and listing bounds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheSection {
  /// Maximum cached page renderings held at once
  #[serde(default = "default_max_pages")]
  pub max_pages: usize,

  /// Number of documents returned by the recent listing
  #[serde(default = "default_recent_limit")]
  pub recent_limit: usize,
}

fn default_max_pages() -> usize {
  256
}
fn default_recent_limit() -> usize {
  20
}

impl Default for CacheSection {
  fn default() -> Self {
    Self {
      max_pages: default_max_pages(),
      recent_limit: default_recent_limit(),
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostgresSection {
  #[serde(default = "default_pg_url")]
  pub url: String,
  #[serde(default = "default_max_conn")]
  pub max_connections: usize,
}
fn default_pg_url() -> String {
  "postgres://localhost/jotter".into()
}
fn default_max_conn() -> usize {
  20
}
impl Default for PostgresSection {
  fn default() -> Self {
    Self {
      url: default_pg_url(),
      max_connections: default_max_conn(),
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqliteSection {
  #[serde(default = "default_sqlite_path")]
  pub path: String,
}
fn default_sqlite_path() -> String {
  "jotter.db".into()
}
impl Default for SqliteSection {
  fn default() -> Self {
    Self {
      path: default_sqlite_path(),
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSection {
  #[serde(default = "default_level")]
  pub level: String,
}
fn default_level() -> String {
  "info".into()
}
impl Default for LoggingSection {
  fn default() -> Self {
    Self {
      level: default_level(),
    }
  }
}

impl ServerConfig {
  pub fn from_file(path: impl AsRef<Path>) -> Result<Self, anyhow::Error> {
    let content = std::fs::read_to_string(&path)?;
    let expanded = expand_env_vars(&content);
    Ok(serde_yaml::from_str(&expanded)?)
  }

  pub fn find_and_load() -> Result<Option<Self>, anyhow::Error> {
    for p in ["jotter.yaml", "jotter.yml"] {
      if Path::new(p).exists() {
        tracing::info!("Loading config from {}", p);
        return Ok(Some(Self::from_file(p)?));
      }
    }
    Ok(None)
  }

  pub fn address(&self) -> String {
    format!("{}:{}", self.server.host, self.server.port)
  }
}
