//! Vantage Core
//!
//! Wires the engine together for an inspector front end: opens the settings
//! database, registers discovered views, and installs one location resolver
//! per configured location.

mod config;
mod error;
mod inspector;

pub use config::{Config, LocationConfig, LocationKind};
pub use error::CoreError;
pub use inspector::Inspector;

// Re-export engine components
pub use vantage_layout::{
    LayoutError, Location, LocationRef, LocationResolver, MenuEntry, RevealCallback,
    SelectionCause, StackLocation, StackPhase, TabPhase, TabbedLocation, ViewManager,
    DRAWER_LOCATION,
};
pub use vantage_storage::{Database, Setting, SettingsStore, StorageError};
pub use vantage_views::{
    Content, ContentFactory, Persistence, ProvidedView, SimpleView, ToolbarItem, View,
    ViewDescriptor, ViewError, ViewRef, Widget,
};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging. `RUST_LOG` wins over `filter` when set.
pub fn init_logging(filter: &str) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    fmt().with_env_filter(filter).with_target(true).init();
}
