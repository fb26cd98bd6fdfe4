//! Location contract and the state every location shares

use futures_util::future::BoxFuture;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::{Arc, Weak};

use vantage_storage::SettingsStore;
use vantage_views::{ViewRef, ViewRegistry};

use crate::Result;

/// A placement target owning a set of views and their containers.
pub trait Location: Send + Sync {
    /// The name views are declared against, if any.
    fn name(&self) -> Option<&str>;

    /// Attaches the view without showing it.
    fn append_view(&self, view: &ViewRef, insert_before: Option<&ViewRef>) -> Result<()>;

    /// Attaches the view if needed and makes it visible. Resolves once the
    /// view is materialized.
    fn show_view(
        &self,
        view: &ViewRef,
        insert_before: Option<&ViewRef>,
    ) -> BoxFuture<'static, Result<()>>;

    /// Brings the location itself into view.
    fn reveal(&self);

    /// Drops the view from this location. Returns false when it was not a
    /// member.
    fn detach_view(&self, view_id: &str) -> bool;

    /// Attached view ids in display order.
    fn view_ids(&self) -> Vec<String>;
}

pub type LocationRef = Arc<dyn Location>;

pub type RevealCallback = Arc<dyn Fn() + Send + Sync>;

/// Side table: view id -> owning location.
///
/// Entries are weak so the table never keeps a location alive.
#[derive(Default)]
pub(crate) struct OwnerTable {
    owners: RwLock<HashMap<String, Weak<dyn Location>>>,
}

impl OwnerTable {
    /// Records `location` as the owner and detaches the view from the
    /// previous owner, if it was a different, still living location.
    pub fn claim(&self, view_id: &str, location: &Weak<dyn Location>) {
        let previous = self
            .owners
            .write()
            .insert(view_id.to_string(), location.clone());

        let Some(previous) = previous else {
            return;
        };
        if Weak::ptr_eq(&previous, location) {
            return;
        }
        if let Some(previous) = previous.upgrade() {
            tracing::debug!(
                view_id = %view_id,
                from = ?previous.name(),
                "Moving view to another location"
            );
            previous.detach_view(view_id);
        }
    }

    /// Forgets the owner, but only if it is still `location`.
    pub fn release(&self, view_id: &str, location: &Weak<dyn Location>) {
        let mut owners = self.owners.write();
        if owners
            .get(view_id)
            .is_some_and(|owner| Weak::ptr_eq(owner, location))
        {
            owners.remove(view_id);
        }
    }

    pub fn owner(&self, view_id: &str) -> Option<LocationRef> {
        self.owners.read().get(view_id).and_then(Weak::upgrade)
    }
}

/// What a location needs from the manager, without holding the manager.
#[derive(Clone)]
pub(crate) struct LocationContext {
    pub registry: Arc<RwLock<ViewRegistry>>,
    pub owners: Arc<OwnerTable>,
    pub store: Arc<dyn SettingsStore>,
}

impl LocationContext {
    pub fn views_for_location(&self, name: Option<&str>) -> Vec<ViewRef> {
        match name {
            Some(name) => self.registry.read().views_for_location(name),
            None => Vec::new(),
        }
    }
}

/// Fields shared by both location kinds.
pub(crate) struct LocationBase {
    pub name: Option<String>,
    pub context: LocationContext,
    pub self_ref: Weak<dyn Location>,
    reveal_callback: Option<RevealCallback>,
}

impl LocationBase {
    pub fn new(
        context: LocationContext,
        self_ref: Weak<dyn Location>,
        reveal_callback: Option<RevealCallback>,
        name: Option<&str>,
    ) -> Self {
        Self {
            name: name.map(str::to_string),
            context,
            self_ref,
            reveal_callback,
        }
    }

    pub fn claim(&self, view_id: &str) {
        self.context.owners.claim(view_id, &self.self_ref);
    }

    pub fn release(&self, view_id: &str) {
        self.context.owners.release(view_id, &self.self_ref);
    }

    pub fn reveal(&self) {
        if let Some(callback) = &self.reveal_callback {
            callback();
        }
    }
}
