//! Vantage Views
//!
//! The view contract and everything that sits directly on top of it:
//! - `View`: a named unit of content with deferred toolbar items and content
//! - `ViewRegistry`: view id -> view, plus the declared location name
//! - `Memo`: the one-shot memoized future shared by every at-most-once step
//! - `ContainerWidget` / `ExpandableContainerWidget`: materialize a view once
//!
//! Rendering is not done here. Containers build a small headless tree
//! (`Element`) that a renderer can walk.

mod container;
mod element;
mod error;
mod memo;
mod registry;
mod view;

pub use container::{ContainerWidget, ExpandableContainerWidget, HeaderKey, Materialization};
pub use element::{Content, Element, Node, Toolbar, ToolbarItem, ToolbarItemKind, Widget};
pub use error::ViewError;
pub use memo::{Memo, Pending};
pub use registry::ViewRegistry;
pub use view::{
    ContentFactory, Persistence, ProvidedView, SimpleView, View, ViewDescriptor, ViewRef,
};

pub type Result<T> = std::result::Result<T, ViewError>;
