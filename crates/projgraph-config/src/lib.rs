//! projgraph Configuration Management
//!
//! Provides configuration loading with support for:
//! - Global config: `~/.projgraph/config.toml`
//! - Local config: `.projgraph/config.toml` (in the workspace root)
//! - CLI overrides via `ConfigOverrides`
//!
//! Configuration is merged in order: global → local → CLI overrides.

mod error;
mod loader;

pub use error::ConfigError;
pub use loader::ConfigLoader;

use projgraph_core::{SortStrategy, TomlManifestLoader, DEFAULT_MANIFEST_NAME};
use serde::{Deserialize, Serialize};

/// Log levels accepted by `logging.level`
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Root configuration for projgraph.
///
/// Represents the fully merged configuration from all sources.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct ProjgraphConfig {
    /// Manifest file settings
    pub manifest: ManifestConfig,

    /// Project discovery settings
    pub discovery: DiscoveryConfig,

    /// Scheme target ordering
    pub sorting: SortingConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Manifest file settings.
///
/// # Example TOML
///
/// ```toml
/// [manifest]
/// file_name = "Project.toml"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ManifestConfig {
    /// File name looked up in every project directory
    pub file_name: String,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            file_name: DEFAULT_MANIFEST_NAME.to_string(),
        }
    }
}

/// Project discovery settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Maximum directory depth searched below the root
    pub max_depth: usize,

    /// Directory names never descended into
    pub exclude_dirs: Vec<String>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        let mut exclude_dirs: Vec<String> =
            projgraph_core::default_exclude_dirs().into_iter().collect();
        exclude_dirs.sort();

        Self {
            max_depth: 4,
            exclude_dirs,
        }
    }
}

/// Scheme target ordering.
///
/// ```toml
/// [sorting]
/// strategy = "topological"  # or "legacy"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct SortingConfig {
    pub strategy: SortStrategy,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON structured logging
    Json,
}

/// CLI overrides for configuration values.
///
/// Used to apply command-line arguments over file-based config.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Override manifest file name
    pub manifest_name: Option<String>,

    /// Override discovery depth
    pub max_depth: Option<usize>,

    /// Override scheme ordering
    pub sort_strategy: Option<SortStrategy>,

    /// Override log level
    pub log_level: Option<String>,
}

impl ProjgraphConfig {
    /// Apply CLI overrides to this configuration.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(ref name) = overrides.manifest_name {
            self.manifest.file_name = name.clone();
        }

        if let Some(depth) = overrides.max_depth {
            self.discovery.max_depth = depth;
        }

        if let Some(strategy) = overrides.sort_strategy {
            self.sorting.strategy = strategy;
        }

        if let Some(ref level) = overrides.log_level {
            self.logging.level = level.clone();
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let file_name = &self.manifest.file_name;
        if file_name.is_empty() {
            return Err(ConfigError::invalid_value(
                "manifest.file_name",
                "must not be empty",
            ));
        }
        if file_name.contains('/') || file_name.contains('\\') {
            return Err(ConfigError::invalid_value(
                "manifest.file_name",
                format!("'{}' must be a file name, not a path", file_name),
            ));
        }

        if self.discovery.max_depth == 0 {
            return Err(ConfigError::invalid_value(
                "discovery.max_depth",
                "must be at least 1",
            ));
        }

        if !LOG_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::invalid_value(
                "logging.level",
                format!(
                    "unknown level '{}'. Valid values: {}",
                    self.logging.level,
                    LOG_LEVELS.join(", ")
                ),
            ));
        }

        Ok(())
    }

    /// Manifest loader for the configured file name.
    pub fn manifest_loader(&self) -> TomlManifestLoader {
        TomlManifestLoader::new().with_manifest_name(&self.manifest.file_name)
    }

    /// Discovery settings for [`projgraph_core::ManifestDiscovery`].
    pub fn discovery_config(&self) -> projgraph_core::DiscoveryConfig {
        projgraph_core::DiscoveryConfig {
            manifest_name: self.manifest.file_name.clone(),
            max_depth: self.discovery.max_depth,
            exclude_dirs: self.discovery.exclude_dirs.iter().cloned().collect(),
        }
    }
}
