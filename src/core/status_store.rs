//! Status store - holds the most recent state reported by the device.
//!
//! There is no status until the first accepted report. A bad report can only
//! be superseded by a later valid one; nothing is ever updated or deleted.

use crate::{
    core::door::{DoorState, StatusReport, parse_ts_ms},
    entities::{DoorStatus, door_status},
    errors::{Error, Result},
};
use async_trait::async_trait;
use sea_orm::{QueryOrder, Set, prelude::*};
use serde_json::Value;
use std::sync::RwLock;
use tracing::{debug, info, instrument, warn};

/// Read/write access to the last reported status.
#[async_trait]
pub trait StatusStore: Send + Sync {
    /// Returns the last accepted report, or `None` if the device never reported.
    async fn read(&self) -> Result<Option<StatusReport>>;

    /// Stores an already validated report and returns it as stored.
    async fn record(&self, state: DoorState, ts_ms: Option<i64>) -> Result<StatusReport>;

    /// Validates a raw report, then stores it.
    ///
    /// `state` is checked before `ts_ms`. On a validation error nothing is stored.
    async fn write(&self, state: &str, ts_ms: Option<&Value>) -> Result<StatusReport> {
        let state =
            DoorState::parse(state).inspect_err(|_| warn!("Rejected door state {:?}", state))?;
        let ts_ms = parse_ts_ms(ts_ms).inspect_err(|_| warn!("Rejected ts_ms {:?}", ts_ms))?;
        self.record(state, ts_ms).await
    }
}

/// Single-cell status store; empty until the first report.
#[derive(Debug, Default)]
pub struct MemoryStatusStore {
    last: RwLock<Option<StatusReport>>,
}

impl MemoryStatusStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StatusStore for MemoryStatusStore {
    async fn read(&self) -> Result<Option<StatusReport>> {
        let last = self
            .last
            .read()
            .map_err(|e| Error::StateLock(e.to_string()))?
            .clone();
        Ok(last)
    }

    #[instrument(skip(self))]
    async fn record(&self, state: DoorState, ts_ms: Option<i64>) -> Result<StatusReport> {
        let report = StatusReport {
            state,
            ts_ms,
            created_at: chrono::Utc::now(),
        };
        *self
            .last
            .write()
            .map_err(|e| Error::StateLock(e.to_string()))? = Some(report.clone());
        info!("Door reported {}", state);
        Ok(report)
    }
}

/// Append-only status log in the database.
#[derive(Debug, Clone)]
pub struct DbStatusStore {
    db: DatabaseConnection,
}

impl DbStatusStore {
    /// Wraps `db`.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Returns the newest log row, if any.
    pub async fn latest(&self) -> Result<Option<door_status::Model>> {
        DoorStatus::find()
            .order_by_desc(door_status::Column::CreatedAt)
            .order_by_desc(door_status::Column::Id)
            .one(&self.db)
            .await
            .map_err(Into::into)
    }
}

impl TryFrom<door_status::Model> for StatusReport {
    type Error = Error;

    fn try_from(row: door_status::Model) -> Result<Self> {
        let state = DoorState::parse(&row.state).map_err(|_| Error::CorruptRecord {
            table: "door_statuses",
            value: row.state.clone(),
        })?;
        Ok(Self {
            state,
            ts_ms: row.ts_ms,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl StatusStore for DbStatusStore {
    #[instrument(skip(self))]
    async fn read(&self) -> Result<Option<StatusReport>> {
        let row = self.latest().await?;
        debug!("Latest status row: {:?}", row);
        row.map(StatusReport::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn record(&self, state: DoorState, ts_ms: Option<i64>) -> Result<StatusReport> {
        let row = door_status::ActiveModel {
            state: Set(state.as_str().to_string()),
            ts_ms: Set(ts_ms),
            ..Default::default()
        };
        let inserted = row.insert(&self.db).await?;
        info!("Appended door status {} (id {})", state, inserted.id);
        StatusReport::try_from(inserted)
    }
}
