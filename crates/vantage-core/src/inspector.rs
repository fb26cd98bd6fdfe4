//! Inspector context
//!
//! The one object a front end builds at startup and passes around. It owns the
//! settings database and the view manager, and turns the configured location
//! list into resolvers. Locations are created lazily, the first time a view
//! declared against them is shown.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use vantage_layout::{
    LocationRef, RevealCallback, StackLocation, TabbedLocation, ViewManager,
};
use vantage_storage::{Database, SettingsStore};
use vantage_views::{ContentFactory, ViewDescriptor, ViewRef};

use crate::config::{Config, LocationConfig, LocationKind};
use crate::Result;

type Created<T> = Arc<RwLock<HashMap<String, Arc<T>>>>;

pub struct Inspector {
    config: Config,
    db: Database,
    manager: ViewManager,
    /// Locations built by the configured resolvers, by name
    tabbed: Created<TabbedLocation>,
    stacks: Created<StackLocation>,
}

impl Inspector {
    /// Opens the configured database and installs the location resolvers.
    pub fn new(config: Config) -> Result<Self> {
        if let Some(parent) = config.database_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = Database::open(&config.database_path)?;
        Self::with_database(config, db)
    }

    pub fn with_database(config: Config, db: Database) -> Result<Self> {
        config.validate()?;

        let store: Arc<dyn SettingsStore> = Arc::new(db.clone());
        let inspector = Self {
            config,
            db,
            manager: ViewManager::new(store),
            tabbed: Arc::new(RwLock::new(HashMap::new())),
            stacks: Arc::new(RwLock::new(HashMap::new())),
        };

        for location in &inspector.config.locations {
            inspector.install_resolver(location.clone())?;
        }

        tracing::info!(
            locations = inspector.config.locations.len(),
            "Inspector created"
        );
        Ok(inspector)
    }

    fn install_resolver(&self, location: LocationConfig) -> Result<()> {
        let tabbed = Arc::clone(&self.tabbed);
        let stacks = Arc::clone(&self.stacks);
        let name = location.name.clone();

        self.manager
            .register_resolver(&name, move |manager: &ViewManager, name: &str| {
                let reveal = reveal_logger(name);
                let resolved: LocationRef = match location.kind {
                    LocationKind::Tabbed => {
                        let created = manager.create_tabbed_location(
                            Some(reveal),
                            Some(name),
                            location.restore_selection,
                        );
                        if location.more_tabs_button {
                            created.enable_more_tabs_button();
                        }
                        tabbed.write().insert(name.to_string(), Arc::clone(&created));
                        created
                    }
                    LocationKind::Stack => {
                        let created = manager.create_stack_location(Some(reveal), Some(name));
                        stacks.write().insert(name.to_string(), Arc::clone(&created));
                        created
                    }
                };

                tracing::info!(location = %name, kind = ?location.kind, "Created location");
                Some(resolved)
            })?;
        Ok(())
    }

    /// Loads the configured manifest, if any. Returns how many views were
    /// registered.
    pub fn initialize<F>(&self, factory_for: F) -> Result<usize>
    where
        F: Fn(&ViewDescriptor) -> Option<ContentFactory>,
    {
        let count = match &self.config.manifest_path {
            Some(path) => self.load_manifest(path, factory_for)?,
            None => 0,
        };

        tracing::info!(views = count, "Inspector initialized");
        Ok(count)
    }

    /// Registers every descriptor in a JSON manifest. Descriptors that
    /// `factory_for` has no content for are skipped.
    pub fn load_manifest<F>(&self, path: impl AsRef<Path>, factory_for: F) -> Result<usize>
    where
        F: Fn(&ViewDescriptor) -> Option<ContentFactory>,
    {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let descriptors = ViewDescriptor::parse_manifest(&raw)?;

        let extensions = descriptors.into_iter().filter_map(|descriptor| {
            match factory_for(&descriptor) {
                Some(factory) => Some((descriptor, factory)),
                None => {
                    tracing::warn!(view_id = %descriptor.id, "No content for view, skipping");
                    None
                }
            }
        });

        Ok(self.manager.register_extensions(extensions)?)
    }

    // === Views ===

    pub fn register_view(&self, descriptor: ViewDescriptor, factory: ContentFactory) -> Result<()> {
        Ok(self.manager.register_view(descriptor, factory)?)
    }

    pub fn add_view(&self, view: ViewRef, location: Option<&str>) -> Result<()> {
        Ok(self.manager.add_view(view, location)?)
    }

    pub async fn show_view(&self, view_id: &str) -> Result<()> {
        Ok(self.manager.show_view(view_id).await?)
    }

    pub async fn reveal_view(&self, view: &ViewRef) -> Result<()> {
        Ok(self.manager.reveal_view(view).await?)
    }

    // === Locations ===

    /// Resolves a configured tabbed location, creating it on first use.
    pub async fn tabbed_location(&self, name: &str) -> Option<Arc<TabbedLocation>> {
        self.manager.resolve_location(Some(name)).await?;
        self.tabbed.read().get(name).cloned()
    }

    /// Resolves a configured stack location, creating it on first use.
    pub async fn stack_location(&self, name: &str) -> Option<Arc<StackLocation>> {
        self.manager.resolve_location(Some(name)).await?;
        self.stacks.read().get(name).cloned()
    }

    pub fn manager(&self) -> &ViewManager {
        &self.manager
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

impl Clone for Inspector {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            db: self.db.clone(),
            manager: self.manager.clone(),
            tabbed: Arc::clone(&self.tabbed),
            stacks: Arc::clone(&self.stacks),
        }
    }
}

fn reveal_logger(name: &str) -> RevealCallback {
    let name = name.to_string();
    Arc::new(move || {
        tracing::debug!(location = %name, "Revealed location");
    })
}
