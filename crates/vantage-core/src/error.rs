//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Storage error: {0}")]
    Storage(#[from] vantage_storage::StorageError),

    #[error("Layout error: {0}")]
    Layout(#[from] vantage_layout::LayoutError),

    #[error("View error: {0}")]
    View(#[from] vantage_views::ViewError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}
