//! Tabbed location
//!
//! One view visible at a time. Closeable tabs are opened and closed by the
//! user and their open set is persisted under `<name>-closeableTabs`;
//! transient views only get a tab when explicitly shown and are never
//! persisted. With restore selection enabled, the last tab the user picked is
//! stored under `<name>-selectedTab` and reselected the first time the
//! location is shown.

use futures_util::future::{self, BoxFuture, FutureExt};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::{Arc, Weak};

use vantage_storage::Setting;
use vantage_views::{ContainerWidget, Materialization, ViewRef};

use crate::error::LayoutError;
use crate::location::{Location, LocationBase, LocationContext, RevealCallback};
use crate::state::{SelectionCause, TabPhase};
use crate::Result;

type CloseableTabs = BTreeMap<String, bool>;

struct Tab {
    id: String,
    title: String,
    /// Shows a close button; transient tabs are closeable in the strip too
    closeable: bool,
    container: Arc<ContainerWidget>,
}

#[derive(Default)]
struct TabbedState {
    /// Attached views in attach order, tabbed or not
    views: Vec<ViewRef>,
    tabs: Vec<Tab>,
    selected: Option<String>,
    focused: bool,
    was_shown: bool,
    more_tabs_button: bool,
}

impl TabbedState {
    fn view(&self, view_id: &str) -> Option<&ViewRef> {
        self.views.iter().find(|v| v.view_id() == view_id)
    }

    fn tab(&self, view_id: &str) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id == view_id)
    }
}

/// Entry of the "more tabs" menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    pub view_id: String,
    pub title: String,
}

pub struct TabbedLocation {
    base: LocationBase,
    closeable_tabs: Option<Setting<CloseableTabs>>,
    last_selected: Option<Setting<String>>,
    state: RwLock<TabbedState>,
}

impl TabbedLocation {
    pub(crate) fn new(
        context: LocationContext,
        reveal_callback: Option<RevealCallback>,
        name: Option<&str>,
        restore_selection: bool,
    ) -> Arc<Self> {
        let location = Arc::new_cyclic(|weak: &Weak<TabbedLocation>| {
            let self_ref: Weak<dyn Location> = weak.clone();
            let store = Arc::clone(&context.store);

            let closeable_tabs = name.map(|name| {
                Setting::new(
                    Arc::clone(&store),
                    format!("{name}-closeableTabs"),
                    CloseableTabs::new(),
                )
            });
            let last_selected = name.filter(|_| restore_selection).map(|name| {
                Setting::new(
                    Arc::clone(&store),
                    format!("{name}-selectedTab"),
                    String::new(),
                )
            });

            Self {
                base: LocationBase::new(context, self_ref, reveal_callback, name),
                closeable_tabs,
                last_selected,
                state: RwLock::new(TabbedState::default()),
            }
        });

        location.populate();
        location
    }

    /// Attaches every view declared against this location's name.
    fn populate(&self) {
        let views = self.base.context.views_for_location(self.name());
        if views.is_empty() {
            return;
        }

        // Snapshot before claiming: claiming may detach views from another
        // location with the same name, which rewrites the set.
        let open = self.read_closeable_tabs();

        for view in &views {
            self.attach(view);
            if view.is_transient() {
                continue;
            }
            if !view.is_closeable() || open.contains_key(view.view_id()) {
                self.append_tab(view);
            }
        }

        tracing::info!(
            location = ?self.name(),
            views = views.len(),
            tabs = self.state.read().tabs.len(),
            "Populated tabbed location"
        );
    }

    fn read_closeable_tabs(&self) -> CloseableTabs {
        let Some(setting) = &self.closeable_tabs else {
            return CloseableTabs::new();
        };
        setting.get().unwrap_or_else(|e| {
            tracing::error!(key = %setting.key(), error = %e, "Failed to read closeable tabs");
            CloseableTabs::new()
        })
    }

    fn mark_closeable_open(&self, view_id: &str, open: bool) {
        let Some(setting) = &self.closeable_tabs else {
            return;
        };
        let result = setting.update(|tabs| {
            if open {
                tabs.insert(view_id.to_string(), true).is_none()
            } else {
                tabs.remove(view_id).is_some()
            }
        });
        if let Err(e) = result {
            tracing::error!(view_id = %view_id, error = %e, "Failed to persist closeable tabs");
        }
    }

    /// Makes the view a member; claims it from any previous owner.
    fn attach(&self, view: &ViewRef) {
        {
            let mut state = self.state.write();
            if state.view(view.view_id()).is_some() {
                return;
            }
            state.views.push(Arc::clone(view));
        }
        self.base.claim(view.view_id());
    }

    fn append_tab(&self, view: &ViewRef) {
        let id = view.view_id().to_string();
        {
            let mut state = self.state.write();
            if state.tab(&id).is_some() {
                return;
            }
            state.tabs.push(Tab {
                id: id.clone(),
                title: view.title().to_string(),
                closeable: view.is_closeable() || view.is_transient(),
                container: Arc::new(ContainerWidget::new(Arc::clone(view))),
            });
        }

        if view.is_closeable() && !view.is_transient() {
            self.mark_closeable_open(&id, true);
        }
        tracing::debug!(view_id = %id, location = ?self.name(), "Appended tab");
    }

    fn should_defer_tab(&self, view: &ViewRef) -> bool {
        if view.is_transient() {
            return true;
        }
        view.is_closeable() && !self.read_closeable_tabs().contains_key(view.view_id())
    }

    /// Selects an open tab and materializes its view.
    ///
    /// Returns `None` when no tab with that id is open. Awaiting the returned
    /// handle drives the materialization; dropping it does not cancel
    /// anything, the next request picks the same work back up.
    pub fn select_tab(&self, view_id: &str, cause: SelectionCause) -> Option<Materialization> {
        let (container, closeable) = {
            let mut state = self.state.write();
            let tab = state.tab(view_id)?;
            let container = Arc::clone(&tab.container);
            let closeable = container.view().is_closeable() && !container.view().is_transient();
            let previous = state.selected.replace(view_id.to_string());
            tracing::debug!(
                view_id = %view_id,
                previous = ?previous,
                cause = ?cause,
                "Selected tab"
            );
            (container, closeable)
        };

        if cause == SelectionCause::User {
            if let Some(setting) = &self.last_selected {
                if let Err(e) = setting.set(&view_id.to_string()) {
                    tracing::error!(view_id = %view_id, error = %e, "Failed to persist selected tab");
                }
            }
        }

        let materialized = container.materialize();

        if closeable {
            self.mark_closeable_open(view_id, true);
        }

        Some(materialized)
    }

    /// User closed a tab. The view stays attached and can be shown again.
    /// Permanent tabs have no close button and are left alone.
    ///
    /// Closing the selected tab selects the tab that took its index, or the
    /// new last tab, as a program selection. Returns that tab's
    /// materialization, if any.
    pub fn close_tab(&self, view_id: &str) -> Option<Materialization> {
        let next = {
            let mut state = self.state.write();
            let index = state.tabs.iter().position(|t| t.id == view_id)?;
            if !state.tabs[index].closeable {
                tracing::debug!(view_id = %view_id, "Ignoring close of permanent tab");
                return None;
            }
            state.tabs.remove(index);

            if state.selected.as_deref() == Some(view_id) {
                state.selected = None;
                let neighbour = index.min(state.tabs.len().saturating_sub(1));
                state.tabs.get(neighbour).map(|t| t.id.clone())
            } else {
                None
            }
        };

        self.mark_closeable_open(view_id, false);
        tracing::info!(view_id = %view_id, location = ?self.name(), "Closed tab");

        next.and_then(|id| self.select_tab(&id, SelectionCause::Program))
    }

    /// First-show hook: restores the persisted selection once.
    pub fn was_shown(&self) -> Option<Materialization> {
        let setting = self.last_selected.as_ref()?;
        {
            let mut state = self.state.write();
            if state.was_shown {
                return None;
            }
            state.was_shown = true;
        }

        let last = setting.get().unwrap_or_else(|e| {
            tracing::error!(key = %setting.key(), error = %e, "Failed to read selected tab");
            String::new()
        });
        if !self.has_tab(&last) {
            return None;
        }

        tracing::debug!(view_id = %last, location = ?self.name(), "Restoring tab selection");
        self.select_tab(&last, SelectionCause::Program)
    }

    /// Adds a menu listing every attached view, open or not.
    pub fn enable_more_tabs_button(&self) {
        self.state.write().more_tabs_button = true;
    }

    pub fn more_tabs_menu(&self) -> Vec<MenuEntry> {
        let state = self.state.read();
        if !state.more_tabs_button {
            return Vec::new();
        }
        state
            .views
            .iter()
            .map(|view| MenuEntry {
                view_id: view.view_id().to_string(),
                title: view.title().to_string(),
            })
            .collect()
    }

    /// Shows the view picked from the "more tabs" menu.
    pub fn activate_menu_entry(&self, view_id: &str) -> Option<BoxFuture<'static, Result<()>>> {
        let view = self.state.read().view(view_id).cloned()?;
        Some(self.show_view(&view, None))
    }

    pub fn tab_ids(&self) -> Vec<String> {
        self.state.read().tabs.iter().map(|t| t.id.clone()).collect()
    }

    pub fn tab_title(&self, view_id: &str) -> Option<String> {
        self.state.read().tab(view_id).map(|t| t.title.clone())
    }

    pub fn is_tab_closeable(&self, view_id: &str) -> bool {
        self.state
            .read()
            .tab(view_id)
            .is_some_and(|t| t.closeable)
    }

    pub fn has_tab(&self, view_id: &str) -> bool {
        self.state.read().tab(view_id).is_some()
    }

    pub fn selected_tab(&self) -> Option<String> {
        self.state.read().selected.clone()
    }

    pub fn is_focused(&self) -> bool {
        self.state.read().focused
    }

    pub fn container(&self, view_id: &str) -> Option<Arc<ContainerWidget>> {
        self.state
            .read()
            .tab(view_id)
            .map(|t| Arc::clone(&t.container))
    }

    pub fn phase(&self, view_id: &str) -> TabPhase {
        let state = self.state.read();
        if state.view(view_id).is_none() {
            TabPhase::Detached
        } else if state.selected.as_deref() == Some(view_id) {
            TabPhase::Selected
        } else {
            TabPhase::Attached
        }
    }
}

impl Location for TabbedLocation {
    fn name(&self) -> Option<&str> {
        self.base.name.as_deref()
    }

    fn append_view(&self, view: &ViewRef, insert_before: Option<&ViewRef>) -> Result<()> {
        if insert_before.is_some() {
            return Err(LayoutError::Unsupported(
                "insert before in a tabbed location".to_string(),
            ));
        }

        self.attach(view);
        if !self.should_defer_tab(view) {
            self.append_tab(view);
        }
        Ok(())
    }

    fn show_view(
        &self,
        view: &ViewRef,
        insert_before: Option<&ViewRef>,
    ) -> BoxFuture<'static, Result<()>> {
        if insert_before.is_some() {
            return future::ready(Err(LayoutError::Unsupported(
                "insert before in a tabbed location".to_string(),
            )))
            .boxed();
        }

        self.attach(view);
        self.append_tab(view);
        self.state.write().focused = true;

        match self.select_tab(view.view_id(), SelectionCause::Program) {
            Some(materialized) => materialized.map(|r| r.map_err(LayoutError::from)).boxed(),
            None => future::ready(Ok(())).boxed(),
        }
    }

    /// Revealing is the first-show event: the stored selection is restored
    /// here. The restored tab finishes materializing once its handle is
    /// awaited again.
    fn reveal(&self) {
        self.base.reveal();
        let _ = self.was_shown();
    }

    fn detach_view(&self, view_id: &str) -> bool {
        let removed = {
            let mut state = self.state.write();
            let Some(index) = state.views.iter().position(|v| v.view_id() == view_id) else {
                return false;
            };
            let view = state.views.remove(index);
            state.tabs.retain(|t| t.id != view_id);
            if state.selected.as_deref() == Some(view_id) {
                state.selected = None;
            }
            view
        };

        if removed.is_closeable() && !removed.is_transient() {
            self.mark_closeable_open(view_id, false);
        }
        self.base.release(view_id);
        tracing::debug!(view_id = %view_id, location = ?self.name(), "Detached view");
        true
    }

    fn view_ids(&self) -> Vec<String> {
        self.state
            .read()
            .views
            .iter()
            .map(|v| v.view_id().to_string())
            .collect()
    }
}
