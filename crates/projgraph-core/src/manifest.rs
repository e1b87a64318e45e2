//! TOML Project Manifests
//!
//! [`TomlManifestLoader`] is the file based [`ModelLoader`]: a project is a
//! directory holding a manifest (by default `Project.toml`) that declares
//! the project's targets, schemes, settings and extra files.
//!
//! ## Format
//!
//! ```toml
//! name = "App"
//! file_name = "AppProject"            # optional, defaults to name
//! additional_files = ["README.md", { folder = "Docs" }]
//!
//! [settings.base]
//! SWIFT_VERSION = "5.0"
//!
//! [[targets]]
//! name = "App"
//! product = "app"
//! dependencies = [
//!   { target = "Core" },
//!   { target = "Utils", project = "../Shared" },
//! ]
//! ```
//!
//! Project relative paths are joined to the manifest's directory and
//! normalized lexically, so every spelling of a project path yields the
//! same [`TargetKey`](crate::TargetKey).

use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::ManifestError;
use crate::model::{
    FileElement, Product, Project, ProjectGroup, Scheme, Settings, Target, TargetReference,
};
use crate::model_loader::ModelLoader;

/// Manifest file name used when none is configured
pub const DEFAULT_MANIFEST_NAME: &str = "Project.toml";

// ============================================================================
// Raw Manifest
// ============================================================================

#[derive(Debug, Deserialize)]
struct RawManifest {
    name: String,
    file_name: Option<String>,
    #[serde(default)]
    additional_files: Vec<RawFileElement>,
    files_group: Option<ProjectGroup>,
    #[serde(default)]
    settings: Settings,
    #[serde(default)]
    targets: Vec<RawTarget>,
    #[serde(default)]
    schemes: Vec<Scheme>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawFileElement {
    File(PathBuf),
    Folder { folder: PathBuf },
}

#[derive(Debug, Deserialize)]
struct RawTarget {
    name: String,
    product: Product,
    #[serde(default)]
    dependencies: Vec<RawDependency>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDependency {
    target: String,
    /// Directory of another project, relative to this manifest
    project: Option<PathBuf>,
}

// ============================================================================
// Loader
// ============================================================================

/// Loads projects from TOML manifests on disk.
#[derive(Debug, Clone)]
pub struct TomlManifestLoader {
    manifest_name: String,
}

impl Default for TomlManifestLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl TomlManifestLoader {
    pub fn new() -> Self {
        Self {
            manifest_name: DEFAULT_MANIFEST_NAME.to_string(),
        }
    }

    /// Use a different manifest file name
    pub fn with_manifest_name(mut self, name: impl Into<String>) -> Self {
        self.manifest_name = name.into();
        self
    }

    pub fn manifest_name(&self) -> &str {
        &self.manifest_name
    }

    /// Location of the manifest for the project directory `dir`
    pub fn manifest_path(&self, dir: &Path) -> PathBuf {
        dir.join(&self.manifest_name)
    }

    /// Parse manifest `content` as the project living in `dir`.
    pub fn parse(&self, dir: &Path, content: &str) -> Result<Project, ManifestError> {
        let manifest_path = self.manifest_path(dir);
        let raw: RawManifest =
            toml::from_str(content).map_err(|e| ManifestError::parse(&manifest_path, e))?;

        let mut seen = HashSet::new();
        let mut targets = Vec::with_capacity(raw.targets.len());
        for raw_target in raw.targets {
            if !seen.insert(raw_target.name.clone()) {
                return Err(ManifestError::invalid(
                    &manifest_path,
                    format!("target '{}' is declared more than once", raw_target.name),
                ));
            }

            let dependencies = raw_target
                .dependencies
                .into_iter()
                .map(|dep| match dep.project {
                    Some(project) => {
                        TargetReference::project(dep.target, normalize_path(&dir.join(project)))
                    }
                    None => TargetReference::local(dep.target),
                })
                .collect();

            targets.push(
                Target::new(raw_target.name, raw_target.product).with_dependencies(dependencies),
            );
        }

        let additional_files = raw
            .additional_files
            .into_iter()
            .map(|element| match element {
                RawFileElement::File(p) => FileElement::File(normalize_path(&dir.join(p))),
                RawFileElement::Folder { folder } => {
                    FileElement::FolderReference(normalize_path(&dir.join(folder)))
                }
            })
            .collect();

        let file_name = raw.file_name.unwrap_or_else(|| raw.name.clone());
        Ok(Project::new(dir, raw.name)
            .with_file_name(file_name)
            .with_targets(targets)
            .with_schemes(raw.schemes)
            .with_settings(raw.settings)
            .with_files_group(raw.files_group.unwrap_or_default())
            .with_additional_files(additional_files))
    }
}

impl ModelLoader for TomlManifestLoader {
    fn load_project(&self, path: &Path) -> Result<Project, ManifestError> {
        let manifest_path = self.manifest_path(path);
        if !manifest_path.is_file() {
            return Err(ManifestError::NotFound(manifest_path));
        }

        debug!("Reading manifest {}", manifest_path.display());
        let content =
            fs::read_to_string(&manifest_path).map_err(|e| ManifestError::read(&manifest_path, e))?;
        self.parse(path, &content)
    }
}

/// Remove `.` components and fold `..` into the preceding component,
/// without touching the filesystem.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                // `..` above the root stays at the root
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => normalized.push(".."),
            },
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}
