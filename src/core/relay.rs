//! Relay service context - composes the two stores and the gate.
//!
//! One [`Relay`] is constructed at startup and shared by every request
//! handler. It has no state of its own beyond the stores it wraps.

use crate::{
    config::{AppConfig, StoreBackend, database},
    core::{
        command_store::{CommandStore, DbCommandStore, MemoryCommandStore},
        door::{Command, StatusReport},
        gate::AccessGate,
        status_store::{DbStatusStore, MemoryStatusStore, StatusStore},
    },
    errors::{Error, Result},
};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

/// Combined view returned by Get Status.
///
/// The two halves are read independently and are not a single snapshot:
/// a write landing between the reads can pair a new command with an old
/// status or the other way round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DoorSnapshot {
    /// Current command
    pub command: Command,
    /// Last reported status, `null` before the first report
    pub last_status: Option<StatusReport>,
}

/// Shared handle on both stores and the gate; cheap to clone.
#[derive(Clone)]
pub struct Relay {
    commands: Arc<dyn CommandStore>,
    statuses: Arc<dyn StatusStore>,
    gate: AccessGate,
}

impl Relay {
    /// Wraps arbitrary store implementations.
    pub fn new(
        commands: Arc<dyn CommandStore>,
        statuses: Arc<dyn StatusStore>,
        gate: AccessGate,
    ) -> Self {
        Self {
            commands,
            statuses,
            gate,
        }
    }

    /// Volatile profile: state lives in process memory only.
    #[must_use]
    pub fn in_memory(default_command: Command, gate: AccessGate) -> Self {
        Self::new(
            Arc::new(MemoryCommandStore::new(default_command)),
            Arc::new(MemoryStatusStore::new()),
            gate,
        )
    }

    /// Durable profile: both stores are append-only logs in `db`.
    #[must_use]
    pub fn durable(db: DatabaseConnection, default_command: Command, gate: AccessGate) -> Self {
        Self::new(
            Arc::new(DbCommandStore::new(db.clone(), default_command)),
            Arc::new(DbStatusStore::new(db)),
            gate,
        )
    }

    /// Builds the relay described by `config`, connecting to and preparing
    /// the database when the durable backend is selected.
    pub async fn from_config(config: &AppConfig) -> Result<Self> {
        let gate = AccessGate::new(config.api_token.clone());
        if !gate.is_armed() {
            warn!("API_TOKEN is not set: POST /door/command accepts unauthenticated requests");
        }

        match &config.backend {
            StoreBackend::Memory => {
                info!(
                    "Using in-memory stores (default command {})",
                    config.default_command
                );
                Ok(Self::in_memory(config.default_command, gate))
            }
            StoreBackend::Database(settings) => {
                let db = database::create_connection(settings).await?;
                database::create_tables(&db).await?;
                info!(
                    "Using database stores (default command {})",
                    config.default_command
                );
                Ok(Self::durable(db, config.default_command, gate))
            }
        }
    }

    /// Get Command.
    pub async fn current_command(&self) -> Result<Command> {
        self.commands.read().await
    }

    /// Set Command. The gate is checked before the body is looked at.
    pub async fn set_command(&self, token: Option<&str>, candidate: &str) -> Result<Command> {
        if !self.gate.authorize(token) {
            warn!("Rejected command change: bad or missing API key");
            return Err(Error::Unauthorized);
        }
        self.commands.write(candidate).await
    }

    /// Post Status.
    pub async fn report_status(&self, state: &str, ts_ms: Option<&Value>) -> Result<StatusReport> {
        self.statuses.write(state, ts_ms).await
    }

    /// Get Status. Either read failing fails the whole call.
    pub async fn snapshot(&self) -> Result<DoorSnapshot> {
        let command = self.commands.read().await?;
        let last_status = self.statuses.read().await?;
        Ok(DoorSnapshot {
            command,
            last_status,
        })
    }
}

impl std::fmt::Debug for Relay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Relay").field("gate", &self.gate).finish()
    }
}
