//! Layout error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    #[error("Location resolver already registered: {0}")]
    DuplicateResolver(String),

    #[error("View error: {0}")]
    View(#[from] vantage_views::ViewError),

    #[error("Storage error: {0}")]
    Storage(#[from] vantage_storage::StorageError),
}
