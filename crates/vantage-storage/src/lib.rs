//! Vantage Storage Layer
//!
//! SQLite-backed key/value settings used to persist view placement state
//! (open closeable tabs, last selected tab) across sessions.

mod database;
mod error;
mod migrations;
mod setting;

pub use database::{Database, SettingsStore};
pub use error::StorageError;
pub use setting::Setting;

pub type Result<T> = std::result::Result<T, StorageError>;
