//! Command store - holds the command the device should act on next.
//!
//! Two implementations share one contract. [`MemoryCommandStore`] keeps a
//! single cell that each write replaces. [`DbCommandStore`] appends every
//! accepted command to the `door_commands` log and reads back the newest row.
//! Rejected input never reaches either store.

use crate::{
    core::door::Command,
    entities::{DoorCommand, door_command},
    errors::{Error, Result},
};
use async_trait::async_trait;
use sea_orm::{QueryOrder, Set, prelude::*};
use std::sync::RwLock;
use tracing::{debug, info, instrument, warn};

/// Read/write access to the current command.
#[async_trait]
pub trait CommandStore: Send + Sync {
    /// Returns the current command, or the configured default if none was ever written.
    async fn read(&self) -> Result<Command>;

    /// Makes an already validated command current.
    async fn record(&self, command: Command) -> Result<Command>;

    /// Normalizes and validates `candidate`, then makes it current.
    ///
    /// On a validation error nothing is stored.
    async fn write(&self, candidate: &str) -> Result<Command> {
        let command = Command::parse(candidate)
            .inspect_err(|_| warn!("Rejected command {:?}", candidate))?;
        self.record(command).await
    }
}

/// Single-cell command store, initialized from the configured default.
#[derive(Debug)]
pub struct MemoryCommandStore {
    current: RwLock<Command>,
}

impl MemoryCommandStore {
    /// Creates the cell holding `initial`.
    #[must_use]
    pub const fn new(initial: Command) -> Self {
        Self {
            current: RwLock::new(initial),
        }
    }
}

#[async_trait]
impl CommandStore for MemoryCommandStore {
    async fn read(&self) -> Result<Command> {
        let current = *self
            .current
            .read()
            .map_err(|e| Error::StateLock(e.to_string()))?;
        debug!("Current command: {}", current);
        Ok(current)
    }

    #[instrument(skip(self))]
    async fn record(&self, command: Command) -> Result<Command> {
        let mut current = self
            .current
            .write()
            .map_err(|e| Error::StateLock(e.to_string()))?;
        *current = command;
        info!("Command set to {}", command);
        Ok(command)
    }
}

/// Append-only command log in the database.
#[derive(Debug, Clone)]
pub struct DbCommandStore {
    db: DatabaseConnection,
    default_command: Command,
}

impl DbCommandStore {
    /// Wraps `db`; `default_command` is returned while the log is empty.
    #[must_use]
    pub const fn new(db: DatabaseConnection, default_command: Command) -> Self {
        Self {
            db,
            default_command,
        }
    }

    /// Returns the newest log row, if any.
    pub async fn latest(&self) -> Result<Option<door_command::Model>> {
        DoorCommand::find()
            .order_by_desc(door_command::Column::CreatedAt)
            .order_by_desc(door_command::Column::Id)
            .one(&self.db)
            .await
            .map_err(Into::into)
    }
}

#[async_trait]
impl CommandStore for DbCommandStore {
    #[instrument(skip(self))]
    async fn read(&self) -> Result<Command> {
        let Some(row) = self.latest().await? else {
            debug!("Command log empty, using default {}", self.default_command);
            return Ok(self.default_command);
        };
        Command::parse(&row.command).map_err(|_| Error::CorruptRecord {
            table: "door_commands",
            value: row.command,
        })
    }

    #[instrument(skip(self))]
    async fn record(&self, command: Command) -> Result<Command> {
        let row = door_command::ActiveModel {
            command: Set(command.as_str().to_string()),
            ..Default::default()
        };
        let inserted = row.insert(&self.db).await?;
        info!(
            "Appended command {} (id {}, at {})",
            command, inserted.id, inserted.created_at
        );
        Ok(command)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use chrono::{Duration, Utc};
    use sea_orm::PaginatorTrait;

    #[tokio::test]
    async fn test_memory_store_starts_at_default() -> Result<()> {
        let store = MemoryCommandStore::new(Command::Open);
        assert_eq!(store.read().await?, Command::Open);
        Ok(())
    }

    #[tokio::test]
    async fn test_memory_store_write_normalizes() -> Result<()> {
        let store = MemoryCommandStore::new(Command::Close);

        assert_eq!(store.write(" open ").await?, Command::Open);
        assert_eq!(store.read().await?, Command::Open);

        assert_eq!(store.write("Close").await?, Command::Close);
        assert_eq!(store.read().await?, Command::Close);
        Ok(())
    }

    #[tokio::test]
    async fn test_memory_store_rejection_keeps_current() -> Result<()> {
        let store = MemoryCommandStore::new(Command::Open);

        let result = store.write("TOGGLE").await;
        assert!(matches!(result, Err(Error::InvalidCommand { .. })));
        assert_eq!(store.read().await?, Command::Open);
        Ok(())
    }

    #[tokio::test]
    async fn test_db_store_empty_log_returns_default() -> Result<()> {
        let db = setup_test_db().await?;
        let store = DbCommandStore::new(db, Command::Close);

        assert_eq!(store.read().await?, Command::Close);
        assert!(store.latest().await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_db_store_write_then_read() -> Result<()> {
        let db = setup_test_db().await?;
        let store = DbCommandStore::new(db, Command::Close);

        assert_eq!(store.write("open").await?, Command::Open);
        assert_eq!(store.read().await?, Command::Open);

        let row = store.latest().await?.unwrap();
        assert_eq!(row.command, "OPEN");
        Ok(())
    }

    #[tokio::test]
    async fn test_db_store_rejection_appends_nothing() -> Result<()> {
        let db = setup_test_db().await?;
        let store = DbCommandStore::new(db.clone(), Command::Close);
        store.write("OPEN").await?;

        let result = store.write("TOGGLE").await;
        assert!(matches!(result, Err(Error::InvalidCommand { .. })));

        assert_eq!(DoorCommand::find().count(&db).await?, 1);
        assert_eq!(store.read().await?, Command::Open);
        Ok(())
    }

    #[tokio::test]
    async fn test_db_store_repeated_write_appends_rows() -> Result<()> {
        let db = setup_test_db().await?;
        let store = DbCommandStore::new(db.clone(), Command::Close);

        store.write("OPEN").await?;
        store.write("OPEN").await?;

        let rows = DoorCommand::find()
            .order_by_asc(door_command::Column::Id)
            .all(&db)
            .await?;
        assert_eq!(rows.len(), 2);
        assert!(rows[0].created_at <= rows[1].created_at);
        assert_eq!(store.read().await?, Command::Open);
        Ok(())
    }

    #[tokio::test]
    async fn test_db_store_latest_timestamp_wins() -> Result<()> {
        let db = setup_test_db().await?;
        let store = DbCommandStore::new(db.clone(), Command::Close);
        let now = Utc::now();

        // Inserted out of order: the later timestamp wins, not the later row
        insert_command_at(&db, "OPEN", now).await?;
        insert_command_at(&db, "CLOSE", now - Duration::seconds(5)).await?;
        assert_eq!(store.read().await?, Command::Open);

        insert_command_at(&db, "CLOSE", now + Duration::seconds(5)).await?;
        assert_eq!(store.read().await?, Command::Close);
        Ok(())
    }

    #[tokio::test]
    async fn test_db_store_equal_timestamps_break_by_insertion() -> Result<()> {
        let db = setup_test_db().await?;
        let store = DbCommandStore::new(db.clone(), Command::Close);
        let now = Utc::now();

        insert_command_at(&db, "CLOSE", now).await?;
        insert_command_at(&db, "OPEN", now).await?;
        assert_eq!(store.read().await?, Command::Open);
        Ok(())
    }

    #[tokio::test]
    async fn test_db_store_created_at_comes_from_database() -> Result<()> {
        let db = setup_test_db().await?;
        let store = DbCommandStore::new(db, Command::Close);
        let before = Utc::now() - Duration::seconds(2);

        store.write("OPEN").await?;

        let row = store.latest().await?.unwrap();
        assert_eq!(row.created_at.timestamp_subsec_nanos(), 0);
        assert!(row.created_at >= before);
        assert!(row.created_at <= Utc::now() + Duration::seconds(2));
        Ok(())
    }

    #[tokio::test]
    async fn test_db_store_corrupt_row_is_reported() -> Result<()> {
        let db = setup_test_db().await?;
        let store = DbCommandStore::new(db.clone(), Command::Close);
        insert_command_at(&db, "AJAR", Utc::now()).await?;

        let result = store.read().await;
        assert!(matches!(result, Err(Error::CorruptRecord { .. })));
        Ok(())
    }
}
