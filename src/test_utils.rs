//! Shared test utilities for the relay.
//!
//! Provides an in-memory `SQLite` database with the log tables created, and
//! helpers that insert rows with explicit timestamps so ordering can be
//! controlled from a test.

use crate::{
    entities::{door_command, door_status},
    errors::Result,
};
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use tracing_subscriber::EnvFilter;

pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trace")),
        )
        .with_test_writer()
        .try_init();
}

/// Creates an in-memory `SQLite` database with all tables initialized.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Appends a command row with a caller-chosen `created_at`.
///
/// The value is written as given, without validation.
pub async fn insert_command_at(
    db: &DatabaseConnection,
    command: &str,
    created_at: DateTime<Utc>,
) -> Result<door_command::Model> {
    door_command::ActiveModel {
        command: Set(command.to_string()),
        created_at: Set(created_at),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Appends a status row with a caller-chosen `created_at`.
pub async fn insert_status_at(
    db: &DatabaseConnection,
    state: &str,
    ts_ms: Option<i64>,
    created_at: DateTime<Utc>,
) -> Result<door_status::Model> {
    door_status::ActiveModel {
        state: Set(state.to_string()),
        ts_ms: Set(ts_ms),
        created_at: Set(created_at),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}
