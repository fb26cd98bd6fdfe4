//! View registry: id -> view and the location name it was declared against

use std::collections::HashMap;

use crate::error::ViewError;
use crate::view::ViewRef;
use crate::Result;

struct Entry {
    view: ViewRef,
    location: Option<String>,
}

#[derive(Default)]
pub struct ViewRegistry {
    entries: HashMap<String, Entry>,
    /// Registration order, used when populating locations
    order: Vec<String>,
}

impl ViewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails without touching the existing entry when the id is taken.
    pub fn register(&mut self, view: ViewRef, location: Option<String>) -> Result<()> {
        let id = view.view_id().to_string();
        if self.entries.contains_key(&id) {
            return Err(ViewError::DuplicateId(id));
        }

        tracing::debug!(view_id = %id, location = ?location, "Registered view");

        self.order.push(id.clone());
        self.entries.insert(id, Entry { view, location });
        Ok(())
    }

    pub fn get(&self, view_id: &str) -> Option<ViewRef> {
        self.entries.get(view_id).map(|entry| entry.view.clone())
    }

    pub fn contains(&self, view_id: &str) -> bool {
        self.entries.contains_key(view_id)
    }

    /// The declared location name; `None` for unknown ids and for views
    /// registered without one.
    pub fn location_name(&self, view_id: &str) -> Option<&str> {
        self.entries
            .get(view_id)
            .and_then(|entry| entry.location.as_deref())
    }

    pub fn views_for_location(&self, location: &str) -> Vec<ViewRef> {
        self.order
            .iter()
            .filter_map(|id| self.entries.get(id))
            .filter(|entry| entry.location.as_deref() == Some(location))
            .map(|entry| entry.view.clone())
            .collect()
    }

    pub fn ids(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
