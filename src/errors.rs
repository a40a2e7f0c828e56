//! Unified error type for the relay.
//!
//! Validation and authorization variants are request-scoped and surface as
//! 4xx responses. Store failures surface as 5xx. `Config` only ever happens
//! before the server starts listening.

use thiserror::Error;

/// Every failure the relay can report.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or malformed startup setting
    #[error("Configuration error: {message}")]
    Config {
        /// What was wrong
        message: String,
    },

    /// Command outside `OPEN`/`CLOSE`
    #[error("command must be OPEN or CLOSE")]
    InvalidCommand {
        /// Raw client input
        value: String,
    },

    /// Door state outside `LOCKED`/`UNLOCKED`
    #[error("state must be UNLOCKED or LOCKED")]
    InvalidState {
        /// Raw client input
        value: String,
    },

    /// `ts_ms` present but not an integer
    #[error("ts_ms must be int")]
    InvalidTimestamp,

    /// Gate rejected the presented API key
    #[error("unauthorized")]
    Unauthorized,

    /// Store unreachable or query failed
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Stored value outside its enum
    #[error("Corrupt record in {table}: {value:?}")]
    CorruptRecord {
        /// Log table the row came from
        table: &'static str,
        /// Stored value
        value: String,
    },

    /// In-memory cell poisoned by a panicking writer
    #[error("State lock poisoned: {0}")]
    StateLock(String),

    /// Socket bind or serve failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
