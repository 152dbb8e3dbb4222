//! # configs
//!
//! Layered application settings, lowest precedence first:
//!
//! 1. built-in defaults
//! 2. optional `config/kanban.toml`
//! 3. `KANBAN__SECTION__KEY` environment variables (e.g. `KANBAN__SERVER__PORT`)
//! 4. the plain variables older deployments use: `PORT`, `DATABASE_URL`,
//!    `DB_HOST`, `DB_PORT`, `DB_USER`, `DB_PASS`, `DB_NAME`
//!
//! A `.env` file in the working directory is loaded into the environment first.

use std::time::Duration;

use config::{Config, Environment, File, Map};
use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;

const DEFAULT_FILE: &str = "config/kanban";

const LEGACY_VARS: &[(&str, &str)] = &[
    ("PORT", "server.port"),
    ("DATABASE_URL", "database.url"),
    ("DB_HOST", "database.host"),
    ("DB_PORT", "database.port"),
    ("DB_USER", "database.user"),
    ("DB_PASS", "database.password"),
    ("DB_NAME", "database.name"),
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Allow any origin. Off means same-origin only.
    pub cors_permissive: bool,
}

impl ServerSettings {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Postgres,
    Memory,
}

#[derive(Debug)]
pub struct DatabaseSettings {
    pub backend: StorageBackend,
    /// Full connection URL, either given directly or assembled from parts.
    pub url: SecretString,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    pub statement_timeout: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogSettings {
    /// `EnvFilter` directive; `RUST_LOG` takes precedence when set.
    pub filter: String,
    pub format: LogFormat,
}

#[derive(Debug)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub log: LogSettings,
}

#[derive(Deserialize)]
struct RawDatabase {
    backend: StorageBackend,
    url: Option<String>,
    host: String,
    port: u16,
    user: String,
    password: String,
    name: String,
    max_connections: u32,
    acquire_timeout_secs: u64,
    statement_timeout_ms: u64,
}

#[derive(Deserialize)]
struct RawSettings {
    server: ServerSettings,
    database: RawDatabase,
    log: LogSettings,
}

impl Settings {
    /// Load from `.env`, `config/kanban.toml` and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        // A missing .env file is the normal case outside development.
        let _ = dotenvy::dotenv();
        Self::from_sources(Some(DEFAULT_FILE), std::env::vars().collect())
    }

    /// Load from an optional config file and an explicit variable map.
    pub fn from_sources(
        file: Option<&str>,
        vars: Map<String, String>,
    ) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("server.cors_permissive", true)?
            .set_default("database.backend", "postgres")?
            .set_default("database.host", "localhost")?
            .set_default("database.port", 5432)?
            .set_default("database.user", "postgres")?
            .set_default("database.password", "")?
            .set_default("database.name", "kanban")?
            .set_default("database.max_connections", 10)?
            .set_default("database.acquire_timeout_secs", 5)?
            .set_default("database.statement_timeout_ms", 5000)?
            .set_default("log.filter", "info")?
            .set_default("log.format", "pretty")?;

        if let Some(file) = file {
            builder = builder.add_source(File::with_name(file).required(false));
        }

        builder = builder.add_source(
            Environment::with_prefix("KANBAN")
                .separator("__")
                .try_parsing(true)
                .source(Some(vars.clone())),
        );

        for (var, key) in LEGACY_VARS {
            builder = builder.set_override_option(*key, vars.get(*var).cloned())?;
        }

        let raw: RawSettings = builder.build()?.try_deserialize()?;
        let settings = Self::try_from(raw)?;
        tracing::debug!(
            backend = ?settings.database.backend,
            bind = %settings.server.bind_addr(),
            "configuration loaded"
        );
        Ok(settings)
    }
}

impl TryFrom<RawSettings> for Settings {
    type Error = ConfigError;

    fn try_from(raw: RawSettings) -> Result<Self, Self::Error> {
        let db = raw.database;
        if db.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "database.max_connections must be at least 1".into(),
            ));
        }
        if db.statement_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "database.statement_timeout_ms must be positive".into(),
            ));
        }

        let url = match db.url.filter(|u| !u.trim().is_empty()) {
            Some(url) => url,
            None => format!(
                "postgres://{}:{}@{}:{}/{}",
                db.user, db.password, db.host, db.port, db.name
            ),
        };

        Ok(Self {
            server: raw.server,
            database: DatabaseSettings {
                backend: db.backend,
                url: SecretString::from(url),
                max_connections: db.max_connections,
                acquire_timeout: Duration::from_secs(db.acquire_timeout_secs),
                statement_timeout: Duration::from_millis(db.statement_timeout_ms),
            },
            log: raw.log,
        })
    }
}
