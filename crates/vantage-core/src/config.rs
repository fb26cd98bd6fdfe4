//! Inspector configuration

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use vantage_layout::DRAWER_LOCATION;

use crate::error::CoreError;
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationKind {
    Tabbed,
    Stack,
}

/// A named location the inspector resolves views into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationConfig {
    pub name: String,
    pub kind: LocationKind,
    /// Tabbed only: reselect the user's last tab on first show
    #[serde(default)]
    pub restore_selection: bool,
    /// Tabbed only
    #[serde(default)]
    pub more_tabs_button: bool,
}

impl LocationConfig {
    pub fn tabbed(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: LocationKind::Tabbed,
            restore_selection: false,
            more_tabs_button: false,
        }
    }

    pub fn stack(name: impl Into<String>) -> Self {
        Self {
            kind: LocationKind::Stack,
            ..Self::tabbed(name)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to the settings database
    pub database_path: PathBuf,
    /// Default tracing filter, overridden by `RUST_LOG`
    pub log_filter: String,
    /// JSON list of view descriptors to register at startup
    pub manifest_path: Option<PathBuf>,
    pub locations: Vec<LocationConfig>,
}

impl Config {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            database_path: data_dir.join("vantage.db"),
            log_filter: "info".to_string(),
            manifest_path: None,
            locations: vec![
                LocationConfig {
                    restore_selection: true,
                    more_tabs_button: true,
                    ..LocationConfig::tabbed(DRAWER_LOCATION)
                },
                LocationConfig {
                    restore_selection: true,
                    ..LocationConfig::tabbed("panel")
                },
                LocationConfig::stack("sidebar"),
            ],
        }
    }

    /// Reads a JSON config file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&raw)?;
        config.validate()?;

        tracing::info!(path = %path.display(), locations = config.locations.len(), "Loaded config");
        Ok(config)
    }

    /// Location names must be unique: each one gets exactly one resolver.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for location in &self.locations {
            if location.name.is_empty() {
                return Err(CoreError::Config("location with empty name".to_string()));
            }
            if !seen.insert(location.name.as_str()) {
                return Err(CoreError::Config(format!(
                    "location declared twice: {}",
                    location.name
                )));
            }
        }
        Ok(())
    }

    /// Per-user data directory, falling back to `.vantage` in the working
    /// directory when the platform location is unknown.
    pub fn data_dir() -> PathBuf {
        platform_data_dir()
            .map(|d| d.join("Vantage"))
            .unwrap_or_else(|| PathBuf::from(".vantage"))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Self::data_dir())
    }
}

fn platform_data_dir() -> Option<PathBuf> {
    let env = |key: &str| std::env::var_os(key).map(PathBuf::from);

    if cfg!(target_os = "windows") {
        env("LOCALAPPDATA")
    } else if cfg!(target_os = "macos") {
        env("HOME").map(|home| home.join("Library/Application Support"))
    } else {
        env("XDG_DATA_HOME").or_else(|| env("HOME").map(|home| home.join(".local/share")))
    }
}
