//! Database primitives: settings, pool and a liveness probe.
//!
//! The pool is created once by the binary and handed to every request
//! through router state; nothing here keeps a global connection.

use std::time::Duration;

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

/// Shared SQLite pool alias.
pub type DbPool = DatabaseConnection;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://hr_dashboard.db?mode=rwc";

#[derive(Debug, Error)]
pub enum DbError {
    #[error("database url missing")]
    MissingUrl,
    #[error("invalid {key}: {value}")]
    InvalidSetting { key: &'static str, value: String },
    #[error("failed to connect to database: {0}")]
    Connect(#[source] DbErr),
}

pub type DbResult<T> = Result<T, DbError>;

/// Environment-driven connection settings.
#[derive(Clone, Debug, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default)]
    pub log_statements: bool,
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self::new(DEFAULT_DATABASE_URL)
    }
}

impl DatabaseSettings {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: default_max_connections(),
            log_statements: false,
        }
    }

    /// In-memory database, one connection so every query sees the same data.
    pub fn in_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            log_statements: false,
        }
    }

    /// Reads `DATABASE_URL`, `DATABASE_MAX_CONNECTIONS` and `DATABASE_LOG_SQL`.
    pub fn from_env() -> DbResult<Self> {
        let url = std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.into());
        if url.trim().is_empty() {
            return Err(DbError::MissingUrl);
        }
        let max_connections = match std::env::var("DATABASE_MAX_CONNECTIONS") {
            Ok(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or(DbError::InvalidSetting {
                    key: "DATABASE_MAX_CONNECTIONS",
                    value: raw,
                })?,
            Err(_) => default_max_connections(),
        };
        let log_statements = std::env::var("DATABASE_LOG_SQL")
            .ok()
            .map(|val| matches!(val.to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);
        Ok(Self {
            url,
            max_connections,
            log_statements,
        })
    }

    pub fn database_url(&self) -> &str {
        &self.url
    }

    fn connect_options(&self) -> ConnectOptions {
        let mut options = ConnectOptions::new(self.url.clone());
        options
            .max_connections(self.max_connections)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(10))
            .sqlx_logging(self.log_statements);
        options
    }
}

/// Open the pool described by `settings`.
pub async fn connect(settings: &DatabaseSettings) -> DbResult<DbPool> {
    let pool = Database::connect(settings.connect_options())
        .await
        .map_err(DbError::Connect)?;
    info!(
        url = %redact(&settings.url),
        max_connections = settings.max_connections,
        "database pool ready"
    );
    Ok(pool)
}

/// `SELECT 1` against the pool; used by the health endpoint.
pub async fn ping(pool: &DbPool) -> bool {
    pool.execute(Statement::from_string(
        pool.get_database_backend(),
        "SELECT 1".to_string(),
    ))
    .await
    .is_ok()
}

fn redact(url: &str) -> String {
    match url.split_once('?') {
        Some((base, _)) => base.to_string(),
        None => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redact_drops_query_string() {
        assert_eq!(redact("sqlite://hr.db?mode=rwc"), "sqlite://hr.db");
        assert_eq!(redact("sqlite::memory:"), "sqlite::memory:");
    }

    #[test]
    fn default_settings_point_at_local_file() {
        let settings = DatabaseSettings::default();
        assert_eq!(settings.database_url(), DEFAULT_DATABASE_URL);
        assert_eq!(settings.max_connections, 5);
    }

    #[tokio::test]
    async fn in_memory_pool_answers_ping() {
        let pool = connect(&DatabaseSettings::in_memory()).await.unwrap();
        assert!(ping(&pool).await);
    }
}
