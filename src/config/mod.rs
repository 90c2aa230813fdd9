use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing configuration: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
}

/// Connection parameters for the relational store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub host: String,
    pub user: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub database: String,
    pub port: u16,
    pub max_connections: u32,
    /// Seconds to wait for a pooled connection.
    pub connection_timeout: u64,
    /// Deadline applied to every store call made by a request handler.
    pub query_timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Shared HMAC secret used to sign and verify bearer tokens.
    #[serde(skip_serializing)]
    pub secret: String,
    pub enable_cors: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Directory holding `server.log`.
    pub log_dir: PathBuf,
    /// Directory receiving the per-process `log-<timestamp>.txt` audit file.
    pub audit_dir: PathBuf,
}

impl DatabaseConfig {
    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup. `from_env` passes the process
    /// environment; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup("APP_ENV").as_deref() {
            Some("production") | Some("prod") => Environment::Production,
            Some("staging") | Some("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        let preset = match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        };

        preset.with_overrides(&lookup)
    }

    fn with_overrides<F>(mut self, lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Server
        if let Some(v) = lookup("PORT") {
            self.server.port = parse("PORT", v)?;
        }

        // Database
        if let Some(v) = lookup("DB_HOST") {
            self.database.host = v;
        }
        if let Some(v) = lookup("DB_USER") {
            self.database.user = v;
        }
        if let Some(v) = lookup("DB_PASSWORD") {
            self.database.password = v;
        }
        if let Some(v) = lookup("DB_NAME") {
            self.database.database = v;
        }
        if let Some(v) = lookup("DB_PORT") {
            self.database.port = parse("DB_PORT", v)?;
        }
        if let Some(v) = lookup("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = parse("DATABASE_MAX_CONNECTIONS", v)?;
        }
        if let Some(v) = lookup("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = parse("DATABASE_CONNECTION_TIMEOUT", v)?;
        }
        if let Some(v) = lookup("DATABASE_QUERY_TIMEOUT_MS") {
            self.database.query_timeout_ms = parse("DATABASE_QUERY_TIMEOUT_MS", v)?;
        }

        // Security
        if let Some(v) = lookup("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = parse("SECURITY_ENABLE_CORS", v)?;
        }
        self.security.secret = lookup("JWT_SECRET")
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        // Logging
        if let Some(v) = lookup("LOG_DIR") {
            self.logging.log_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("AUDIT_DIR") {
            self.logging.audit_dir = PathBuf::from(v);
        }

        Ok(self)
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig { port: 3000 },
            database: DatabaseConfig {
                max_connections: 5,
                connection_timeout: 30,
                query_timeout_ms: 10_000,
                ..DatabaseConfig::local()
            },
            security: SecurityConfig {
                secret: String::new(),
                enable_cors: true,
            },
            logging: LoggingConfig::default(),
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig { port: 3000 },
            database: DatabaseConfig {
                max_connections: 10,
                connection_timeout: 10,
                query_timeout_ms: 5_000,
                ..DatabaseConfig::local()
            },
            security: SecurityConfig {
                secret: String::new(),
                enable_cors: true,
            },
            logging: LoggingConfig::default(),
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig { port: 3000 },
            database: DatabaseConfig {
                max_connections: 20,
                connection_timeout: 5,
                query_timeout_ms: 2_000,
                ..DatabaseConfig::local()
            },
            security: SecurityConfig {
                secret: String::new(),
                enable_cors: true,
            },
            logging: LoggingConfig::default(),
        }
    }
}

impl DatabaseConfig {
    fn local() -> Self {
        Self {
            host: "localhost".to_string(),
            user: "postgres".to_string(),
            password: String::new(),
            database: "autodealership".to_string(),
            port: 5432,
            max_connections: 5,
            connection_timeout: 30,
            query_timeout_ms: 10_000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("logs"),
            audit_dir: PathBuf::from("."),
        }
    }
}

fn parse<T: std::str::FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { key, value })
}
