//! Manifest Discovery Module
//!
//! Finds project directories (directories holding a manifest file) under a
//! workspace root, so several projects can be loaded into one session.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::manifest::DEFAULT_MANIFEST_NAME;

/// Errors during manifest discovery
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("Root path does not exist: {0}")]
    RootNotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DiscoveryError>;

/// Configuration for manifest discovery
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Manifest file name to look for
    pub manifest_name: String,
    /// Maximum directory depth below the root
    pub max_depth: usize,
    /// Directory names skipped during the walk
    pub exclude_dirs: HashSet<String>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            manifest_name: DEFAULT_MANIFEST_NAME.to_string(),
            max_depth: 4,
            exclude_dirs: default_exclude_dirs(),
        }
    }
}

/// Build output and tooling directories that never hold projects
pub fn default_exclude_dirs() -> HashSet<String> {
    [
        "build",
        "Derived",
        "DerivedData",
        "node_modules",
        "target",
        "Pods",
        "Carthage",
        "vendor",
        "dist",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Manifest discovery service
#[derive(Debug, Clone, Default)]
pub struct ManifestDiscovery {
    config: DiscoveryConfig,
}

impl ManifestDiscovery {
    pub fn new(config: DiscoveryConfig) -> Self {
        Self { config }
    }

    /// Create with a custom max depth
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.config.max_depth = max_depth;
        self
    }

    /// Create with a custom manifest file name
    pub fn with_manifest_name(mut self, name: impl Into<String>) -> Self {
        self.config.manifest_name = name.into();
        self
    }

    /// Sorted, canonical paths of every directory under `root_path`
    /// (inclusive) that holds a manifest.
    pub fn discover(&self, root_path: &Path) -> Result<Vec<PathBuf>> {
        let root_path = root_path.canonicalize().map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => DiscoveryError::RootNotFound(root_path.to_path_buf()),
            _ => DiscoveryError::Io(e),
        })?;

        info!("Discovering {} manifests under {:?}", self.config.manifest_name, root_path);

        let mut found = Vec::new();
        for entry in WalkDir::new(&root_path)
            .max_depth(self.config.max_depth)
            .into_iter()
            .filter_entry(|e| {
                if !e.file_type().is_dir() {
                    return true;
                }
                // The root may itself be hidden, e.g. a temp directory
                if e.depth() == 0 {
                    return true;
                }
                let name = e.file_name().to_string_lossy();
                !name.starts_with('.') && !self.config.exclude_dirs.contains(name.as_ref())
            })
        {
            let entry = match entry {
                Ok(e) => e,
                // An unreadable root fails the whole walk
                Err(e) if e.depth() == 0 => return Err(DiscoveryError::Io(e.into())),
                Err(e) => {
                    warn!("Error walking directory: {}", e);
                    continue;
                }
            };

            if !entry.file_type().is_dir() {
                continue;
            }

            if entry.path().join(&self.config.manifest_name).is_file() {
                debug!("Found project: {:?}", entry.path());
                found.push(entry.into_path());
            }
        }

        found.sort();
        info!("Discovered {} project(s)", found.len());
        Ok(found)
    }
}
