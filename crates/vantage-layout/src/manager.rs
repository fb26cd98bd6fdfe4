//! View Manager
//!
//! Facade over the registry and the locations. Callers show views by id; the
//! manager looks up the declared location name, resolves it once through the
//! resolver registered for that name, and hands the view to the location.

use futures_util::future::{self, BoxFuture, FutureExt};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use vantage_storage::SettingsStore;
use vantage_views::{
    ContentFactory, Memo, ProvidedView, ViewDescriptor, ViewError, ViewRef, ViewRegistry,
};

use crate::error::LayoutError;
use crate::location::{LocationContext, LocationRef, OwnerTable, RevealCallback};
use crate::stack::StackLocation;
use crate::tabbed::TabbedLocation;
use crate::Result;

/// Location name of the bottom drawer; showing views there is reported.
pub const DRAWER_LOCATION: &str = "drawer-view";

/// Turns a location name into a concrete location.
pub trait LocationResolver: Send + Sync {
    fn resolve_location(
        &self,
        manager: &ViewManager,
        name: &str,
    ) -> BoxFuture<'static, Option<LocationRef>>;
}

impl<F> LocationResolver for F
where
    F: Fn(&ViewManager, &str) -> Option<LocationRef> + Send + Sync,
{
    fn resolve_location(
        &self,
        manager: &ViewManager,
        name: &str,
    ) -> BoxFuture<'static, Option<LocationRef>> {
        future::ready(self(manager, name)).boxed()
    }
}

type LocationSlot = Arc<Memo<Option<LocationRef>>>;

pub struct ViewManager {
    registry: Arc<RwLock<ViewRegistry>>,
    /// View id -> owning location
    owners: Arc<OwnerTable>,
    resolvers: Arc<RwLock<HashMap<String, Arc<dyn LocationResolver>>>>,
    /// Resolved locations, one slot per name
    locations: Arc<RwLock<HashMap<String, LocationSlot>>>,
    store: Arc<dyn SettingsStore>,
}

impl ViewManager {
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self {
            registry: Arc::new(RwLock::new(ViewRegistry::new())),
            owners: Arc::new(OwnerTable::default()),
            resolvers: Arc::new(RwLock::new(HashMap::new())),
            locations: Arc::new(RwLock::new(HashMap::new())),
            store,
        }
    }

    fn context(&self) -> LocationContext {
        LocationContext {
            registry: Arc::clone(&self.registry),
            owners: Arc::clone(&self.owners),
            store: Arc::clone(&self.store),
        }
    }

    // === Registration ===

    /// Registers a discovered view under `descriptor.id`.
    pub fn register_view(&self, descriptor: ViewDescriptor, factory: ContentFactory) -> Result<()> {
        let location = descriptor.location.clone();
        let view: ViewRef = Arc::new(ProvidedView::new(descriptor, factory));
        self.add_view(view, location.as_deref())
    }

    /// Registers a view constructed in code.
    pub fn add_view(&self, view: ViewRef, location: Option<&str>) -> Result<()> {
        self.registry
            .write()
            .register(view, location.map(str::to_string))?;
        Ok(())
    }

    /// Bulk registration from discovery. Stops at the first failure; views
    /// registered before it stay registered.
    pub fn register_extensions<I>(&self, extensions: I) -> Result<usize>
    where
        I: IntoIterator<Item = (ViewDescriptor, ContentFactory)>,
    {
        let mut count = 0;
        for (descriptor, factory) in extensions {
            self.register_view(descriptor, factory)?;
            count += 1;
        }

        tracing::info!(count, "Registered views");
        Ok(count)
    }

    pub fn view(&self, view_id: &str) -> Option<ViewRef> {
        self.registry.read().get(view_id)
    }

    pub fn view_ids(&self) -> Vec<String> {
        self.registry.read().ids().to_vec()
    }

    pub fn views_for_location(&self, name: &str) -> Vec<ViewRef> {
        self.registry.read().views_for_location(name)
    }

    /// Exactly one resolver may claim a name.
    pub fn register_resolver<R>(&self, name: &str, resolver: R) -> Result<()>
    where
        R: LocationResolver + 'static,
    {
        let mut resolvers = self.resolvers.write();
        if resolvers.contains_key(name) {
            return Err(LayoutError::DuplicateResolver(name.to_string()));
        }
        resolvers.insert(name.to_string(), Arc::new(resolver));

        tracing::debug!(location = %name, "Registered location resolver");
        Ok(())
    }

    // === Location factories ===

    pub fn create_tabbed_location(
        &self,
        reveal_callback: Option<RevealCallback>,
        name: Option<&str>,
        restore_selection: bool,
    ) -> Arc<TabbedLocation> {
        TabbedLocation::new(self.context(), reveal_callback, name, restore_selection)
    }

    pub fn create_stack_location(
        &self,
        reveal_callback: Option<RevealCallback>,
        name: Option<&str>,
    ) -> Arc<StackLocation> {
        StackLocation::new(self.context(), reveal_callback, name)
    }

    // === Showing ===

    /// Resolves a location name, at most once per name.
    ///
    /// Names without a resolver, and resolvers that come back empty, are not
    /// cached, so a resolver registered later still gets asked.
    pub async fn resolve_location(&self, name: Option<&str>) -> Option<LocationRef> {
        let name = name?;

        let cached = self.locations.read().get(name).cloned();
        let slot = match cached {
            Some(slot) => slot,
            None => {
                if !self.resolvers.read().contains_key(name) {
                    tracing::debug!(location = %name, "No resolver for location");
                    return None;
                }
                let mut locations = self.locations.write();
                let slot = Arc::clone(locations.entry(name.to_string()).or_default());
                slot
            }
        };

        let resolver = self.resolvers.read().get(name).cloned();
        let pending = slot.get_or_init(|| match resolver {
            Some(resolver) => resolver.resolve_location(self, name),
            None => future::ready(None).boxed(),
        });

        let location = pending.await;
        if location.is_none() {
            let mut locations = self.locations.write();
            if locations
                .get(name)
                .is_some_and(|cached| Arc::ptr_eq(cached, &slot))
            {
                locations.remove(name);
            }
        }
        location
    }

    /// Shows a registered view in its declared location.
    ///
    /// Unknown ids and unresolvable locations are logged and treated as a
    /// no-op. Producer failures come back as errors.
    pub async fn show_view(&self, view_id: &str) -> Result<()> {
        let lookup = {
            let registry = self.registry.read();
            registry
                .get(view_id)
                .map(|view| (view, registry.location_name(view_id).map(str::to_string)))
        };

        let Some((view, location_name)) = lookup else {
            let err = ViewError::UnknownView(view_id.to_string());
            tracing::error!(view_id = %view_id, error = %err, "Could not find view");
            return Ok(());
        };

        if location_name.as_deref() == Some(DRAWER_LOCATION) {
            tracing::info!(view_id = %view_id, "Drawer view shown");
        }

        let Some(location) = self.resolve_location(location_name.as_deref()).await else {
            tracing::debug!(view_id = %view_id, location = ?location_name, "View has no location");
            return Ok(());
        };

        location.reveal();
        location.show_view(&view, None).await
    }

    /// Reveals the location currently owning the view, then shows the view
    /// there. No-op when nothing owns it.
    pub async fn reveal_view(&self, view: &ViewRef) -> Result<()> {
        let Some(location) = self.owners.owner(view.view_id()) else {
            tracing::debug!(view_id = %view.view_id(), "Reveal requested for unplaced view");
            return Ok(());
        };

        location.reveal();
        location.show_view(view, None).await
    }

    pub fn location_of(&self, view_id: &str) -> Option<LocationRef> {
        self.owners.owner(view_id)
    }
}

impl Clone for ViewManager {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            owners: Arc::clone(&self.owners),
            resolvers: Arc::clone(&self.resolvers),
            locations: Arc::clone(&self.locations),
            store: Arc::clone(&self.store),
        }
    }
}
