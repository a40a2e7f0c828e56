//! Door value types - the command an operator issues and the state a device reports.
//!
//! Both enums are closed sets. Client input is normalized (trimmed, uppercased)
//! before membership is checked, so `" open"` and `"OPEN"` are the same command.

use crate::errors::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// Desired actuator state, polled by the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Release the lock
    Open,
    /// Engage the lock
    Close,
}

impl Command {
    /// Normalizes and validates a client-supplied command.
    pub fn parse(candidate: &str) -> Result<Self> {
        match candidate.trim().to_uppercase().as_str() {
            "OPEN" => Ok(Self::Open),
            "CLOSE" => Ok(Self::Close),
            _ => Err(Error::InvalidCommand {
                value: candidate.to_string(),
            }),
        }
    }

    /// Wire form of the value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Close => "CLOSE",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Command {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Physical lock state as observed by the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorState {
    /// Bolt engaged
    Locked,
    /// Bolt released
    Unlocked,
}

impl DoorState {
    /// Normalizes and validates a device-reported state.
    pub fn parse(candidate: &str) -> Result<Self> {
        match candidate.trim().to_uppercase().as_str() {
            "LOCKED" => Ok(Self::Locked),
            "UNLOCKED" => Ok(Self::Unlocked),
            _ => Err(Error::InvalidState {
                value: candidate.to_string(),
            }),
        }
    }

    /// Wire form of the value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Locked => "LOCKED",
            Self::Unlocked => "UNLOCKED",
        }
    }
}

impl fmt::Display for DoorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for DoorState {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A status report as held by either store variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    /// Reported lock state
    pub state: DoorState,
    /// Device-local timestamp; unit is whatever the device uses
    pub ts_ms: Option<i64>,
    /// Insertion time; the database clock for the durable store
    pub created_at: DateTime<Utc>,
}

/// Coerces an optional `ts_ms` JSON value into an integer.
///
/// Accepts JSON integers and strings holding a 64-bit integer. `None` and
/// `null` both mean the device did not send a timestamp.
pub fn parse_ts_ms(raw: Option<&Value>) -> Result<Option<i64>> {
    match raw {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n.as_i64().map(Some).ok_or(Error::InvalidTimestamp),
        Some(Value::String(s)) => s
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| Error::InvalidTimestamp),
        Some(_) => Err(Error::InvalidTimestamp),
    }
}
