//! Database configuration module for the durable backend.
//!
//! Handles opening the `SeaORM` connection and creating the two log tables.
//! Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the schema always matches the Rust
//! structs. Creation is `IF NOT EXISTS`, which makes startup idempotent
//! against an existing database.

use crate::config::DatabaseSettings;
use crate::entities::{DoorCommand, DoorStatus};
use crate::errors::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Schema};
use std::time::Duration;
use tracing::{info, instrument};

/// Idle connections are closed quickly; traffic is a handful of polls per minute.
const IDLE_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_CONNECTIONS: u32 = 5;

/// Opens a connection to the configured database.
///
/// No connections are held open at rest: each store operation acquires one
/// and returns it when the operation finishes, on success or error.
#[instrument(skip(settings))]
pub async fn create_connection(settings: &DatabaseSettings) -> Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(settings.url.clone());
    options
        .min_connections(0)
        .max_connections(MAX_CONNECTIONS)
        .connect_timeout(settings.connect_timeout)
        .acquire_timeout(settings.connect_timeout)
        .idle_timeout(IDLE_TIMEOUT)
        .sqlx_logging(false);

    let db = Database::connect(options).await?;
    info!("Database connection established.");
    Ok(db)
}

/// Creates the command and status log tables if they do not exist yet.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut command_table = schema.create_table_from_entity(DoorCommand);
    let mut status_table = schema.create_table_from_entity(DoorStatus);
    command_table.if_not_exists();
    status_table.if_not_exists();

    db.execute(builder.build(&command_table)).await?;
    db.execute(builder.build(&status_table)).await?;

    info!("Door log tables ensured.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{DoorCommandModel, DoorStatusModel};
    use sea_orm::{EntityTrait, QuerySelect};

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Test that tables exist by querying them
        let _: Vec<DoorCommandModel> = DoorCommand::find().limit(1).all(&db).await?;
        let _: Vec<DoorStatusModel> = DoorStatus::find().limit(1).all(&db).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables_is_idempotent() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;
        create_tables(&db).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_create_connection_with_settings() -> Result<()> {
        let settings = DatabaseSettings {
            url: "sqlite::memory:".to_string(),
            connect_timeout: Duration::from_secs(1),
        };
        let db = create_connection(&settings).await?;
        db.ping().await?;
        Ok(())
    }
}
