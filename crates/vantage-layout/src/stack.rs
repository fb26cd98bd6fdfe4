//! Stack location: views stacked vertically, each behind an expandable header

use futures_util::future::{BoxFuture, FutureExt};
use parking_lot::RwLock;
use std::sync::{Arc, Weak};

use vantage_views::{ExpandableContainerWidget, HeaderKey, ViewRef};

use crate::error::LayoutError;
use crate::location::{Location, LocationBase, LocationContext, RevealCallback};
use crate::state::StackPhase;
use crate::Result;

pub struct StackLocation {
    base: LocationBase,
    containers: RwLock<Vec<Arc<ExpandableContainerWidget>>>,
}

impl StackLocation {
    pub(crate) fn new(
        context: LocationContext,
        reveal_callback: Option<RevealCallback>,
        name: Option<&str>,
    ) -> Arc<Self> {
        let location = Arc::new_cyclic(|weak: &Weak<StackLocation>| {
            let self_ref: Weak<dyn Location> = weak.clone();
            Self {
                base: LocationBase::new(context, self_ref, reveal_callback, name),
                containers: RwLock::new(Vec::new()),
            }
        });

        for view in location.base.context.views_for_location(name) {
            location.insert(&view, None);
        }

        location
    }

    /// Inserts a collapsed container before `insert_before`, or at the end
    /// when that sibling is not part of this stack.
    fn insert(&self, view: &ViewRef, insert_before: Option<&ViewRef>) {
        {
            let mut containers = self.containers.write();
            if containers.iter().any(|c| c.view().view_id() == view.view_id()) {
                return;
            }
            let index = insert_before
                .and_then(|before| {
                    containers
                        .iter()
                        .position(|c| c.view().view_id() == before.view_id())
                })
                .unwrap_or(containers.len());
            containers.insert(
                index,
                Arc::new(ExpandableContainerWidget::new(Arc::clone(view))),
            );
        }

        self.base.claim(view.view_id());
        tracing::debug!(view_id = %view.view_id(), location = ?self.name(), "Stacked view");
    }

    pub fn container(&self, view_id: &str) -> Option<Arc<ExpandableContainerWidget>> {
        self.containers
            .read()
            .iter()
            .find(|c| c.view().view_id() == view_id)
            .cloned()
    }

    pub fn phase(&self, view_id: &str) -> StackPhase {
        match self.container(view_id) {
            None => StackPhase::Absent,
            Some(c) if c.is_expanded() => StackPhase::Expanded,
            Some(_) => StackPhase::Collapsed,
        }
    }

    /// Header click.
    pub fn toggle(&self, view_id: &str) -> Option<BoxFuture<'static, Result<()>>> {
        let container = self.container(view_id)?;
        Some(with_layout_error(container.toggle_expanded()))
    }

    /// Header key press; `None` when the key does nothing.
    pub fn on_header_key(
        &self,
        view_id: &str,
        key: HeaderKey,
    ) -> Option<BoxFuture<'static, Result<()>>> {
        let container = self.container(view_id)?;
        container.on_header_key(key).map(with_layout_error)
    }
}

fn with_layout_error(
    fut: BoxFuture<'static, vantage_views::Result<()>>,
) -> BoxFuture<'static, Result<()>> {
    fut.map(|r| r.map_err(LayoutError::from)).boxed()
}

impl Location for StackLocation {
    fn name(&self) -> Option<&str> {
        self.base.name.as_deref()
    }

    fn append_view(&self, view: &ViewRef, insert_before: Option<&ViewRef>) -> Result<()> {
        self.insert(view, insert_before);
        Ok(())
    }

    fn show_view(
        &self,
        view: &ViewRef,
        insert_before: Option<&ViewRef>,
    ) -> BoxFuture<'static, Result<()>> {
        self.insert(view, insert_before);
        match self.container(view.view_id()) {
            Some(container) => with_layout_error(container.expand()),
            None => futures_util::future::ready(Ok(())).boxed(),
        }
    }

    fn reveal(&self) {
        self.base.reveal();
    }

    fn detach_view(&self, view_id: &str) -> bool {
        let container = {
            let mut containers = self.containers.write();
            let Some(index) = containers.iter().position(|c| c.view().view_id() == view_id) else {
                return false;
            };
            containers.remove(index)
        };
        container.collapse();
        self.base.release(view_id);
        tracing::debug!(view_id = %view_id, location = ?self.name(), "Detached view");
        true
    }

    fn view_ids(&self) -> Vec<String> {
        self.containers
            .read()
            .iter()
            .map(|c| c.view().view_id().to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{descriptor, manager, CountingFactory};
    use vantage_storage::Database;

    fn stacked(ids: &[&str]) -> (crate::ViewManager, Arc<StackLocation>, Vec<CountingFactory>) {
        let db = Database::open_in_memory().unwrap();
        let manager = manager(&db);
        let factories = ids
            .iter()
            .map(|id| {
                let factory = CountingFactory::new(id);
                manager
                    .register_view(descriptor(id, "sidebar", None), factory.factory())
                    .unwrap();
                factory
            })
            .collect();
        let location = manager.create_stack_location(None, Some("sidebar"));
        (manager, location, factories)
    }

    #[test]
    fn test_views_start_collapsed() {
        let (_manager, location, factories) = stacked(&["scope", "watch"]);

        assert_eq!(location.view_ids(), vec!["scope", "watch"]);
        assert_eq!(location.phase("scope"), StackPhase::Collapsed);
        assert_eq!(location.phase("other"), StackPhase::Absent);
        assert_eq!(factories[0].calls(), 0);
        assert!(location.container("watch").unwrap().body().is_empty());
    }

    #[tokio::test]
    async fn test_show_twice_materializes_once() {
        let (manager, location, factories) = stacked(&["scope"]);
        let view = manager.view("scope").unwrap();

        location.show_view(&view, None).await.unwrap();
        location.show_view(&view, None).await.unwrap();

        assert_eq!(location.phase("scope"), StackPhase::Expanded);
        assert_eq!(factories[0].calls(), 1);
        let body = location.container("scope").unwrap().body().widgets();
        assert_eq!(body.len(), 1);
        assert_eq!(body[0].name(), "scope");
    }

    #[tokio::test]
    async fn test_insert_before_sibling() {
        let (manager, location, _factories) = stacked(&["scope", "watch"]);
        let breakpoints = CountingFactory::new("breakpoints");
        manager
            .register_view(descriptor("breakpoints", "elsewhere", None), breakpoints.factory())
            .unwrap();
        let view = manager.view("breakpoints").unwrap();
        let watch = manager.view("watch").unwrap();

        location.show_view(&view, Some(&watch)).await.unwrap();
        assert_eq!(location.view_ids(), vec!["scope", "breakpoints", "watch"]);
        assert_eq!(location.phase("breakpoints"), StackPhase::Expanded);
    }

    #[test]
    fn test_insert_before_unknown_sibling_appends() {
        let (manager, location, _factories) = stacked(&["scope"]);
        let threads = CountingFactory::new("threads");
        let stray = CountingFactory::new("stray");
        for (id, factory) in [("threads", &threads), ("stray", &stray)] {
            manager
                .register_view(descriptor(id, "elsewhere", None), factory.factory())
                .unwrap();
        }
        let view = manager.view("threads").unwrap();
        let missing = manager.view("stray").unwrap();

        location.append_view(&view, Some(&missing)).unwrap();
        assert_eq!(location.view_ids(), vec!["scope", "threads"]);
        assert_eq!(location.phase("threads"), StackPhase::Collapsed);
    }

    #[tokio::test]
    async fn test_toggle_keeps_materialization() {
        let (_manager, location, factories) = stacked(&["scope"]);

        location.toggle("scope").unwrap().await.unwrap();
        assert_eq!(location.phase("scope"), StackPhase::Expanded);

        location.toggle("scope").unwrap().await.unwrap();
        assert_eq!(location.phase("scope"), StackPhase::Collapsed);
        let container = location.container("scope").unwrap();
        assert!(container.is_materialized());
        assert!(container.body().is_empty());

        location
            .on_header_key("scope", HeaderKey::Enter)
            .unwrap()
            .await
            .unwrap();
        assert_eq!(location.phase("scope"), StackPhase::Expanded);
        assert!(location.on_header_key("scope", HeaderKey::Other).is_none());
        assert!(location.toggle("missing").is_none());
        assert_eq!(factories[0].calls(), 1);
    }

    #[tokio::test]
    async fn test_detach_removes_container() {
        let (manager, location, _factories) = stacked(&["scope", "watch"]);
        let view = manager.view("scope").unwrap();
        location.show_view(&view, None).await.unwrap();

        assert!(location.detach_view("scope"));
        assert!(!location.detach_view("scope"));
        assert_eq!(location.phase("scope"), StackPhase::Absent);
        assert_eq!(location.view_ids(), vec!["watch"]);
        assert!(manager.location_of("scope").is_none());
        assert!(manager.location_of("watch").is_some());
    }
}
