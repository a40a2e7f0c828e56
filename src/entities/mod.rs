//! Entity module - SeaORM definitions for the two append-only logs.
//! Rows are inserted and read back, never updated or deleted.

/// Command log table
pub mod door_command;
/// Status log table
pub mod door_status;

pub use door_command::{Entity as DoorCommand, Model as DoorCommandModel};
pub use door_status::{Entity as DoorStatus, Model as DoorStatusModel};
