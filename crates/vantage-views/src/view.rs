//! View contract and the two stock implementations
//!
//! - `ProvidedView`: built from a discovery descriptor plus a content factory
//! - `SimpleView`: constructed in code, owns its content and toolbar items

use futures_util::future::{self, BoxFuture, FutureExt};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::element::{Content, ToolbarItem};
use crate::Result;

/// A named, displayable unit of content.
///
/// Both producers may be called any number of times; implementations are not
/// required to memoize. Containers take care of calling them at most once.
pub trait View: Send + Sync {
    fn view_id(&self) -> &str;

    fn title(&self) -> &str;

    fn is_closeable(&self) -> bool;

    fn is_transient(&self) -> bool;

    fn toolbar_items(&self) -> BoxFuture<'static, Result<Vec<ToolbarItem>>>;

    fn content(&self) -> BoxFuture<'static, Result<Content>>;
}

pub type ViewRef = Arc<dyn View>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Persistence {
    /// User controls whether the tab is open; membership is persisted.
    Closeable,
    /// Never persisted; only appears when explicitly shown.
    Transient,
}

/// Record supplied by extension discovery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewDescriptor {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persistence: Option<Persistence>,
}

impl ViewDescriptor {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            location: None,
            persistence: None,
        }
    }

    pub fn at(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_persistence(mut self, persistence: Persistence) -> Self {
        self.persistence = Some(persistence);
        self
    }

    /// Parses a JSON array of descriptors.
    pub fn parse_manifest(json: &str) -> serde_json::Result<Vec<Self>> {
        serde_json::from_str(json)
    }
}

/// Produces the content object of a provided view.
pub type ContentFactory = Arc<dyn Fn() -> BoxFuture<'static, Result<Content>> + Send + Sync>;

pub struct ProvidedView {
    descriptor: ViewDescriptor,
    factory: ContentFactory,
}

impl ProvidedView {
    pub fn new(descriptor: ViewDescriptor, factory: ContentFactory) -> Self {
        Self {
            descriptor,
            factory,
        }
    }

    pub fn descriptor(&self) -> &ViewDescriptor {
        &self.descriptor
    }
}

impl View for ProvidedView {
    fn view_id(&self) -> &str {
        &self.descriptor.id
    }

    fn title(&self) -> &str {
        if self.descriptor.title.is_empty() {
            &self.descriptor.id
        } else {
            &self.descriptor.title
        }
    }

    fn is_closeable(&self) -> bool {
        self.descriptor.persistence == Some(Persistence::Closeable)
    }

    fn is_transient(&self) -> bool {
        self.descriptor.persistence == Some(Persistence::Transient)
    }

    fn toolbar_items(&self) -> BoxFuture<'static, Result<Vec<ToolbarItem>>> {
        future::ready(Ok(Vec::new())).boxed()
    }

    fn content(&self) -> BoxFuture<'static, Result<Content>> {
        (self.factory)()
    }
}

/// A permanent view whose id is its title.
pub struct SimpleView {
    title: String,
    content: Content,
    toolbar_items: RwLock<Vec<ToolbarItem>>,
    parent_for_reveal: RwLock<Option<ViewRef>>,
}

impl SimpleView {
    pub fn new(title: impl Into<String>, content: Content) -> Self {
        Self {
            title: title.into(),
            content,
            toolbar_items: RwLock::new(Vec::new()),
            parent_for_reveal: RwLock::new(None),
        }
    }

    pub fn add_toolbar_item(&self, item: ToolbarItem) {
        self.toolbar_items.write().push(item);
    }

    pub fn sync_toolbar_items(&self) -> Vec<ToolbarItem> {
        self.toolbar_items.read().clone()
    }

    /// Revealing this view reveals `parent` instead, e.g. a sub-pane that
    /// lives inside another view.
    pub fn set_parent_view_for_reveal(&self, parent: ViewRef) {
        *self.parent_for_reveal.write() = Some(parent);
    }

    /// The view a reveal request should actually target.
    pub fn reveal_target(self: &Arc<Self>) -> ViewRef {
        match self.parent_for_reveal.read().as_ref() {
            Some(parent) => Arc::clone(parent),
            None => Arc::clone(self) as ViewRef,
        }
    }
}

impl View for SimpleView {
    fn view_id(&self) -> &str {
        &self.title
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn is_closeable(&self) -> bool {
        false
    }

    fn is_transient(&self) -> bool {
        false
    }

    fn toolbar_items(&self) -> BoxFuture<'static, Result<Vec<ToolbarItem>>> {
        future::ready(Ok(self.sync_toolbar_items())).boxed()
    }

    fn content(&self) -> BoxFuture<'static, Result<Content>> {
        future::ready(Ok(Arc::clone(&self.content))).boxed()
    }
}
