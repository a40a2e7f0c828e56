//! Core relay logic - framework-agnostic stores, gate and service context.

/// Command store contract and its in-memory and database implementations
pub mod command_store;
/// Command, door state and status report value types
pub mod door;
/// Shared-secret gate for command mutation
pub mod gate;
/// Service context composing the stores and the gate
pub mod relay;
/// Status store contract and its in-memory and database implementations
pub mod status_store;

pub use command_store::{CommandStore, DbCommandStore, MemoryCommandStore};
pub use door::{Command, DoorState, StatusReport};
pub use gate::AccessGate;
pub use relay::{DoorSnapshot, Relay};
pub use status_store::{DbStatusStore, MemoryStatusStore, StatusStore};
