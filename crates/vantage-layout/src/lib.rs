//! Vantage Layout
//!
//! Decides where views are displayed. A `ViewManager` maps each view's
//! declared location name to a concrete `Location` through pluggable
//! resolvers, and the two location kinds implement the placement rules:
//! - `TabbedLocation`: one view at a time, closeable/transient tabs, persisted
//!   open tabs and last selection
//! - `StackLocation`: independently expandable sections

mod error;
mod location;
mod manager;
mod stack;
mod state;
mod tabbed;

#[cfg(test)]
mod testing;

pub use error::LayoutError;
pub use location::{Location, LocationRef, RevealCallback};
pub use manager::{LocationResolver, ViewManager, DRAWER_LOCATION};
pub use stack::StackLocation;
pub use state::{SelectionCause, StackPhase, TabPhase};
pub use tabbed::{MenuEntry, TabbedLocation};

pub type Result<T> = std::result::Result<T, LayoutError>;
