//! Headless visual tree
//!
//! Containers do not draw anything. They assemble toolbars, labels and content
//! widgets into `Element`s, and whatever renders the inspector walks the tree.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Content object produced by a view.
pub trait Widget: Send + Sync {
    fn name(&self) -> &str;

    /// Called after the widget has been attached to a visible element.
    fn was_shown(&self) {}

    /// Called right before the widget is detached.
    fn will_hide(&self) {}
}

pub type Content = Arc<dyn Widget>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "type")]
pub enum ToolbarItemKind {
    Button,
    Toggle { toggled: bool },
    Text,
    Separator,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolbarItem {
    pub id: String,
    pub title: String,
    pub kind: ToolbarItemKind,
}

impl ToolbarItem {
    pub fn button(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            kind: ToolbarItemKind::Button,
        }
    }

    pub fn toggle(id: impl Into<String>, title: impl Into<String>, toggled: bool) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            kind: ToolbarItemKind::Toggle { toggled },
        }
    }

    pub fn separator() -> Self {
        Self {
            id: String::new(),
            title: String::new(),
            kind: ToolbarItemKind::Separator,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolbar {
    pub class_name: String,
    pub items: Vec<ToolbarItem>,
}

#[derive(Clone)]
pub enum Node {
    Label(String),
    Toolbar(Toolbar),
    Widget(Content),
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Label(text) => f.debug_tuple("Label").field(text).finish(),
            Node::Toolbar(toolbar) => f.debug_tuple("Toolbar").field(toolbar).finish(),
            Node::Widget(widget) => f.debug_tuple("Widget").field(&widget.name()).finish(),
        }
    }
}

/// A cheaply cloneable handle to one node list of the visual tree.
#[derive(Clone)]
pub struct Element {
    class_name: Arc<str>,
    children: Arc<RwLock<Vec<Node>>>,
}

impl Element {
    pub fn new(class_name: &str) -> Self {
        Self {
            class_name: Arc::from(class_name),
            children: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn children(&self) -> Vec<Node> {
        self.children.read().clone()
    }

    pub fn len(&self) -> usize {
        self.children.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.read().is_empty()
    }

    pub fn append_label(&self, text: impl Into<String>) {
        self.children.write().push(Node::Label(text.into()));
    }

    /// Inserts a toolbar ahead of every existing child. Empty item lists
    /// produce no toolbar at all.
    pub fn prepend_toolbar(&self, class_name: &str, items: Vec<ToolbarItem>) {
        if items.is_empty() {
            return;
        }
        let toolbar = Toolbar {
            class_name: class_name.to_string(),
            items,
        };
        self.children.write().insert(0, Node::Toolbar(toolbar));
    }

    pub fn toolbar(&self) -> Option<Toolbar> {
        self.children.read().iter().find_map(|node| match node {
            Node::Toolbar(toolbar) => Some(toolbar.clone()),
            _ => None,
        })
    }

    pub fn widgets(&self) -> Vec<Content> {
        self.children
            .read()
            .iter()
            .filter_map(|node| match node {
                Node::Widget(widget) => Some(Arc::clone(widget)),
                _ => None,
            })
            .collect()
    }

    pub fn has_widget(&self, widget: &Content) -> bool {
        self.children
            .read()
            .iter()
            .any(|node| matches!(node, Node::Widget(w) if Arc::ptr_eq(w, widget)))
    }

    /// Attaches the widget at the end. Attaching twice is a no-op.
    pub fn attach(&self, widget: &Content) {
        {
            let mut children = self.children.write();
            if children
                .iter()
                .any(|node| matches!(node, Node::Widget(w) if Arc::ptr_eq(w, widget)))
            {
                return;
            }
            children.push(Node::Widget(Arc::clone(widget)));
        }
        widget.was_shown();
    }

    /// Returns false when the widget was not attached here.
    pub fn detach(&self, widget: &Content) -> bool {
        if !self.has_widget(widget) {
            return false;
        }

        widget.will_hide();
        self.children
            .write()
            .retain(|node| !matches!(node, Node::Widget(w) if Arc::ptr_eq(w, widget)));
        true
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("class_name", &self.class_name)
            .field("children", &*self.children.read())
            .finish()
    }
}
