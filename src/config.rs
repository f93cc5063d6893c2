//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/bnode/bnode.toml`
//! 3. Explicit config file (`--config`)
//! 4. Environment variables: `BNODE_*` prefix, `__` as section separator

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::NodeArena;

/// Limits applied to every node arena the tool creates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ArenaSettings {
    /// Upper bound on live nodes per arena (unlimited when unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_nodes: Option<usize>,
    /// Slots reserved up front
    pub initial_capacity: usize,
}

impl Default for ArenaSettings {
    fn default() -> Self {
        Self {
            max_nodes: None,
            initial_capacity: 64,
        }
    }
}

impl ArenaSettings {
    /// Empty arena carrying these limits.
    pub fn new_arena<T>(&self) -> NodeArena<T> {
        NodeArena::with_limits(self.initial_capacity, self.max_nodes)
    }
}

/// Raw arena settings for intermediate parsing (`None` → not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawArenaSettings {
    pub max_nodes: Option<usize>,
    pub initial_capacity: Option<usize>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub arena: RawArenaSettings,
}

/// Unified configuration for bnode.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub arena: ArenaSettings,
}

/// Get the XDG config directory for bnode.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "bnode").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("bnode.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

/// Read one env-provided key; unset is `None`, an unparsable value is an error.
fn env_value<T: DeserializeOwned>(
    config: &Config,
    key: &str,
) -> Result<Option<T>, ApplicationError> {
    match config.get::<T>(key) {
        Ok(val) => Ok(Some(val)),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(ApplicationError::Config {
            message: format!("environment override {}: {}", key, e),
        }),
    }
}

impl Settings {
    /// Merge overlay config onto self (base): overlay wins where specified.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            arena: ArenaSettings {
                max_nodes: overlay.arena.max_nodes.or(self.arena.max_nodes),
                initial_capacity: overlay
                    .arena
                    .initial_capacity
                    .unwrap_or(self.arena.initial_capacity),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Optional explicit config file; unlike the global
    ///   file it must exist
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Explicit config file
        if let Some(path) = config_file {
            let raw = load_raw_settings(path)?;
            current = current.merge_with(&raw);
        }

        // 4. Environment variables (explicit override)
        Self::apply_env_overrides(current)
    }

    /// Apply BNODE_* environment variables, e.g. `BNODE_ARENA__MAX_NODES=1000`.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("BNODE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(config_err)?;

        if let Some(val) = env_value::<usize>(&config, "arena.max_nodes")? {
            settings.arena.max_nodes = Some(val);
        }
        if let Some(val) = env_value::<usize>(&config, "arena.initial_capacity")? {
            settings.arena.initial_capacity = val;
        }

        Ok(settings)
    }

    /// Render as TOML for `bnode config show`.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: e.to_string(),
        })
    }
}
