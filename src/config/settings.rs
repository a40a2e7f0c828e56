//! Application settings sourced from the process environment.
//!
//! Everything is read once at startup. Missing or malformed values that the
//! selected store backend needs are reported as [`Error::Config`] so the
//! process exits before binding a port.

use crate::core::door::Command;
use crate::errors::{Error, Result};
use std::time::Duration;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_DB_PORT: u16 = 5432;
const DEFAULT_SSLMODE: &str = "require";
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Which store pair backs the relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    /// Single in-process cells, lost on restart
    Memory,
    /// Append-only logs in a relational database
    Database(DatabaseSettings),
}

/// Connection parameters for the durable backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseSettings {
    /// Full connection URL handed to `SeaORM`
    pub url: String,
    /// Upper bound on establishing a single connection
    pub connect_timeout: Duration,
}

/// Top-level configuration for the relay process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// TCP port to listen on
    pub port: u16,
    /// Command in effect before any Set Command call
    pub default_command: Command,
    /// Shared secret for Set Command; `None` leaves the gate open
    pub api_token: Option<String>,
    /// Selected store backend
    pub backend: StoreBackend,
}

impl AppConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Environment Variables
    /// - `PORT` - listen port (default: 5000)
    /// - `DEFAULT_COMMAND` - `OPEN` or `CLOSE` (default: `CLOSE`)
    /// - `API_TOKEN` - shared secret checked against the `X-API-KEY` header (default: unset)
    /// - `STORE_BACKEND` - `memory` or `database` (default: `memory`)
    /// - `DATABASE_URL` - full connection URL; overrides the `DB_*` variables.
    ///   In-memory `SQLite` URLs are rejected.
    /// - `DB_HOST`, `DB_NAME`, `DB_USER`, `DB_PASSWORD` - required for `database` without `DATABASE_URL`
    /// - `DB_PORT` - default 5432
    /// - `DB_SSLMODE` - default `require`
    /// - `DB_CONNECT_TIMEOUT_SECS` - default 10
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Empty values are treated the same as unset ones
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match get("PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| Error::Config {
                message: format!("invalid PORT {raw:?}: {e}"),
            })?,
            None => DEFAULT_PORT,
        };

        let default_command = match get("DEFAULT_COMMAND") {
            Some(raw) => Command::parse(&raw).map_err(|_| Error::Config {
                message: format!("DEFAULT_COMMAND must be OPEN or CLOSE, got {raw:?}"),
            })?,
            None => Command::Close,
        };

        let api_token = get("API_TOKEN");

        let backend = match get("STORE_BACKEND")
            .map(|v| v.trim().to_lowercase())
            .as_deref()
        {
            None | Some("memory") => StoreBackend::Memory,
            Some("database") => StoreBackend::Database(DatabaseSettings::from_lookup(&get)?),
            Some(other) => {
                return Err(Error::Config {
                    message: format!("STORE_BACKEND must be memory or database, got {other:?}"),
                });
            }
        };

        Ok(Self {
            port,
            default_command,
            api_token,
            backend,
        })
    }
}

impl DatabaseSettings {
    fn from_lookup<F>(get: &F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let connect_timeout = match get("DB_CONNECT_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(raw.trim().parse().map_err(|e| Error::Config {
                message: format!("invalid DB_CONNECT_TIMEOUT_SECS {raw:?}: {e}"),
            })?),
            None => Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        };

        if let Some(url) = get("DATABASE_URL") {
            // The pool closes idle connections, and an in-memory SQLite
            // database vanishes with the last connection to it
            if is_in_memory_sqlite(&url) {
                return Err(Error::Config {
                    message: format!(
                        "DATABASE_URL {url:?} is an in-memory database; use STORE_BACKEND=memory instead"
                    ),
                });
            }
            return Ok(Self {
                url,
                connect_timeout,
            });
        }

        let required = |key: &str| {
            get(key).ok_or_else(|| Error::Config {
                message: format!("{key} is required when STORE_BACKEND=database"),
            })
        };
        let host = required("DB_HOST")?;
        let name = required("DB_NAME")?;
        let user = required("DB_USER")?;
        let password = required("DB_PASSWORD")?;

        let port = match get("DB_PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| Error::Config {
                message: format!("invalid DB_PORT {raw:?}: {e}"),
            })?,
            None => DEFAULT_DB_PORT,
        };
        let sslmode = get("DB_SSLMODE").unwrap_or_else(|| DEFAULT_SSLMODE.to_string());

        let url = format!(
            "postgres://{}:{}@{}:{}/{}?sslmode={}",
            urlencoding::encode(&user),
            urlencoding::encode(&password),
            host,
            port,
            urlencoding::encode(&name),
            urlencoding::encode(&sslmode),
        );

        Ok(Self {
            url,
            connect_timeout,
        })
    }
}

fn is_in_memory_sqlite(url: &str) -> bool {
    url.starts_with("sqlite:") && (url.contains(":memory:") || url.contains("mode=memory"))
}
