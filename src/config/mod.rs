/// Database connection and schema management for the durable backend
pub mod database;

/// Environment-sourced application settings
pub mod settings;

pub use settings::{AppConfig, DatabaseSettings, StoreBackend};
