//! Shared fixtures for the location and manager tests.

use futures_util::future::FutureExt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use vantage_storage::{Database, SettingsStore};
use vantage_views::{Content, ContentFactory, Persistence, ViewDescriptor, ViewError, Widget};

use crate::manager::ViewManager;

pub struct Pane(pub String);

impl Widget for Pane {
    fn name(&self) -> &str {
        &self.0
    }
}

/// Content factory that counts how often it was asked for content.
pub struct CountingFactory {
    calls: Arc<AtomicUsize>,
    factory: ContentFactory,
}

impl CountingFactory {
    pub fn new(name: &str) -> Self {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let name = name.to_string();
        let factory: ContentFactory = Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            let content: Content = Arc::new(Pane(name.clone()));
            futures_util::future::ready(Ok(content)).boxed()
        });
        Self { calls, factory }
    }

    pub fn failing(view_id: &str) -> ContentFactory {
        let view_id = view_id.to_string();
        Arc::new(move || {
            futures_util::future::ready(Err(ViewError::producer(
                view_id.clone(),
                "content",
                "panel crashed",
            )))
            .boxed()
        })
    }

    pub fn factory(&self) -> ContentFactory {
        Arc::clone(&self.factory)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

pub fn descriptor(id: &str, location: &str, persistence: Option<Persistence>) -> ViewDescriptor {
    let mut descriptor = ViewDescriptor::new(id, id.to_uppercase()).at(location);
    descriptor.persistence = persistence;
    descriptor
}

pub fn store(db: &Database) -> Arc<dyn SettingsStore> {
    Arc::new(db.clone())
}

/// A fresh manager over `db`; building a second one over the same database
/// simulates reloading the inspector.
pub fn manager(db: &Database) -> ViewManager {
    ViewManager::new(store(db))
}
