//! Configuration loader with inheritance support.
//!
//! Loads configuration from multiple sources and merges them:
//! 1. Global config: `~/.projgraph/config.toml`
//! 2. Local config: `.projgraph/config.toml` (in the workspace root)
//! 3. CLI overrides
//!
//! Later sources override earlier ones.

use crate::error::ConfigError;
use crate::{
    ConfigOverrides, DiscoveryConfig, LoggingConfig, ManifestConfig, ProjgraphConfig,
    SortingConfig,
};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Global configuration directory name.
const GLOBAL_CONFIG_DIR: &str = ".projgraph";

/// Local configuration directory name.
const LOCAL_CONFIG_DIR: &str = ".projgraph";

/// Configuration loader with caching and inheritance support.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Global config directory (e.g., `~/.projgraph`)
    global_config_dir: Option<PathBuf>,

    /// Cached global config
    global_config: Option<ProjgraphConfig>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a new configuration loader.
    ///
    /// Automatically detects the global config directory (`~/.projgraph`).
    pub fn new() -> Self {
        let global_config_dir = dirs::home_dir().map(|h| h.join(GLOBAL_CONFIG_DIR));

        Self {
            global_config_dir,
            global_config: None,
        }
    }

    /// Create a loader with a custom global config directory.
    pub fn with_global_dir(global_dir: impl Into<PathBuf>) -> Self {
        Self {
            global_config_dir: Some(global_dir.into()),
            global_config: None,
        }
    }

    /// Get the global config file path.
    pub fn global_config_path(&self) -> Option<PathBuf> {
        self.global_config_dir
            .as_ref()
            .map(|d| d.join(CONFIG_FILE_NAME))
    }

    /// Get the local config file path for a workspace.
    pub fn local_config_path(&self, workspace_root: &Path) -> PathBuf {
        workspace_root.join(LOCAL_CONFIG_DIR).join(CONFIG_FILE_NAME)
    }

    /// Load configuration for a workspace with optional CLI overrides.
    ///
    /// Merges config in order: global → local → overrides.
    pub fn load(
        &mut self,
        workspace_root: &Path,
        overrides: Option<&ConfigOverrides>,
    ) -> Result<ProjgraphConfig, ConfigError> {
        let mut config = ProjgraphConfig::default();

        if let Some(global_config) = self.load_global()? {
            config = merge_configs(config, global_config);
        }

        if let Some(local_config) = self.load_local(workspace_root)? {
            config = merge_configs(config, local_config);
        }

        if let Some(ovr) = overrides {
            config.apply_overrides(ovr);
        }

        Ok(config)
    }

    /// Load configuration from an explicit file instead of the local one.
    ///
    /// Merges global → `path` → overrides.
    pub fn load_from_file(
        &mut self,
        path: &Path,
        overrides: Option<&ConfigOverrides>,
    ) -> Result<ProjgraphConfig, ConfigError> {
        let mut config = ProjgraphConfig::default();

        if let Some(global_config) = self.load_global()? {
            config = merge_configs(config, global_config);
        }

        debug!("Loading config from {:?}", path);
        config = merge_configs(config, load_config_file(path)?);

        if let Some(ovr) = overrides {
            config.apply_overrides(ovr);
        }

        Ok(config)
    }

    /// Load only the global configuration.
    pub fn load_global(&mut self) -> Result<Option<ProjgraphConfig>, ConfigError> {
        if let Some(ref config) = self.global_config {
            return Ok(Some(config.clone()));
        }

        let Some(global_path) = self.global_config_path() else {
            debug!("No home directory found, skipping global config");
            return Ok(None);
        };

        if !global_path.exists() {
            trace!("Global config not found at {:?}", global_path);
            return Ok(None);
        }

        debug!("Loading global config from {:?}", global_path);
        let config = load_config_file(&global_path)?;

        self.global_config = Some(config.clone());

        Ok(Some(config))
    }

    /// Load only the local configuration for a workspace.
    pub fn load_local(
        &self,
        workspace_root: &Path,
    ) -> Result<Option<ProjgraphConfig>, ConfigError> {
        let local_path = self.local_config_path(workspace_root);

        if !local_path.exists() {
            trace!("Local config not found at {:?}", local_path);
            return Ok(None);
        }

        debug!("Loading local config from {:?}", local_path);
        load_config_file(&local_path).map(Some)
    }

    /// Save configuration to the local config file for a workspace.
    pub fn save_local(
        &self,
        workspace_root: &Path,
        config: &ProjgraphConfig,
    ) -> Result<(), ConfigError> {
        let local_path = self.local_config_path(workspace_root);
        save_config_file(&local_path, config)
    }

    /// Initialize local configuration for a workspace.
    ///
    /// Creates `.projgraph/config.toml` with default configuration unless
    /// one already exists.
    pub fn init_local(&self, workspace_root: &Path) -> Result<PathBuf, ConfigError> {
        let local_dir = workspace_root.join(LOCAL_CONFIG_DIR);

        if !local_dir.exists() {
            std::fs::create_dir_all(&local_dir)
                .map_err(|e| ConfigError::create_dir(&local_dir, e))?;
        }

        let config_path = local_dir.join(CONFIG_FILE_NAME);
        if !config_path.exists() {
            save_config_file(&config_path, &ProjgraphConfig::default())?;
        }

        Ok(config_path)
    }

    /// Clear cached global configuration.
    ///
    /// Forces reload on next `load_global()` call.
    pub fn clear_cache(&mut self) {
        self.global_config = None;
    }
}

/// Load a configuration file from disk.
fn load_config_file(path: &Path) -> Result<ProjgraphConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;

    toml::from_str(&content).map_err(|e| ConfigError::parse_toml(path, e))
}

/// Save a configuration file to disk.
fn save_config_file(path: &Path, config: &ProjgraphConfig) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))
}

/// Merge two configurations, with `overlay` taking precedence.
///
/// Overlay values equal to the defaults count as unset, so partial files
/// only change what they mention.
fn merge_configs(base: ProjgraphConfig, overlay: ProjgraphConfig) -> ProjgraphConfig {
    ProjgraphConfig {
        manifest: merge_manifest(base.manifest, overlay.manifest),
        discovery: merge_discovery(base.discovery, overlay.discovery),
        sorting: merge_sorting(base.sorting, overlay.sorting),
        logging: merge_logging(base.logging, overlay.logging),
    }
}

fn merge_manifest(base: ManifestConfig, overlay: ManifestConfig) -> ManifestConfig {
    let defaults = ManifestConfig::default();
    ManifestConfig {
        file_name: if overlay.file_name != defaults.file_name {
            overlay.file_name
        } else {
            base.file_name
        },
    }
}

/// Merge discovery config; excluded directories accumulate.
fn merge_discovery(base: DiscoveryConfig, overlay: DiscoveryConfig) -> DiscoveryConfig {
    let defaults = DiscoveryConfig::default();
    DiscoveryConfig {
        max_depth: if overlay.max_depth != defaults.max_depth {
            overlay.max_depth
        } else {
            base.max_depth
        },
        exclude_dirs: {
            let mut dirs = base.exclude_dirs;
            for dir in overlay.exclude_dirs {
                if !dirs.contains(&dir) {
                    dirs.push(dir);
                }
            }
            dirs
        },
    }
}

fn merge_sorting(base: SortingConfig, overlay: SortingConfig) -> SortingConfig {
    SortingConfig {
        strategy: if overlay.strategy != SortingConfig::default().strategy {
            overlay.strategy
        } else {
            base.strategy
        },
    }
}

fn merge_logging(base: LoggingConfig, overlay: LoggingConfig) -> LoggingConfig {
    let defaults = LoggingConfig::default();
    LoggingConfig {
        level: if overlay.level != defaults.level {
            overlay.level
        } else {
            base.level
        },
        format: if overlay.format != defaults.format {
            overlay.format
        } else {
            base.format
        },
    }
}
