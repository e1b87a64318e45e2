//! Project Model
//!
//! Immutable value types produced by a [`ModelLoader`](crate::ModelLoader):
//! projects, their targets and the dependency references between targets.
//!
//! A [`Project`] is identified by the canonical path of the directory holding
//! its manifest. A target is identified globally by a [`TargetKey`], the pair
//! of that path and the target name.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

// ============================================================================
// Product
// ============================================================================

/// Kind of artifact a target produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Product {
    /// Application bundle
    App,
    /// Static library
    StaticLibrary,
    /// Dynamic library
    DynamicLibrary,
    /// Dynamic framework
    Framework,
    /// Static framework
    StaticFramework,
    /// Resource bundle
    Bundle,
    /// Application extension
    AppExtension,
    /// Command line tool
    CommandLineTool,
    /// Unit test bundle
    UnitTests,
    /// UI test bundle
    UiTests,
}

impl Product {
    /// Get the string representation used in manifests
    pub fn as_str(&self) -> &'static str {
        match self {
            Product::App => "app",
            Product::StaticLibrary => "static_library",
            Product::DynamicLibrary => "dynamic_library",
            Product::Framework => "framework",
            Product::StaticFramework => "static_framework",
            Product::Bundle => "bundle",
            Product::AppExtension => "app_extension",
            Product::CommandLineTool => "command_line_tool",
            Product::UnitTests => "unit_tests",
            Product::UiTests => "ui_tests",
        }
    }

    /// Whether the product is a unit or UI test bundle
    pub fn is_tests_bundle(&self) -> bool {
        matches!(self, Product::UnitTests | Product::UiTests)
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Target
// ============================================================================

/// A declared dependency of a target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TargetReference {
    /// Target declared in the same project
    Target { name: String },
    /// Target declared in the project at `path`
    Project { target: String, path: PathBuf },
}

impl TargetReference {
    /// Reference a sibling target
    pub fn local(name: impl Into<String>) -> Self {
        TargetReference::Target { name: name.into() }
    }

    /// Reference a target of another project
    pub fn project(target: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        TargetReference::Project {
            target: target.into(),
            path: path.into(),
        }
    }

    /// Name of the referenced target
    pub fn target_name(&self) -> &str {
        match self {
            TargetReference::Target { name } => name,
            TargetReference::Project { target, .. } => target,
        }
    }

    /// Path of the project declaring the referenced target, given the path
    /// of the project that holds this reference.
    pub fn project_path<'a>(&'a self, owner: &'a Path) -> &'a Path {
        match self {
            TargetReference::Target { .. } => owner,
            TargetReference::Project { path, .. } => path,
        }
    }

    /// Key of the referenced target
    pub fn key(&self, owner: &Path) -> TargetKey {
        TargetKey::new(self.project_path(owner), self.target_name())
    }
}

/// A buildable unit inside a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    /// Target name, unique within its project
    pub name: String,

    /// Artifact kind
    pub product: Product,

    /// Declared dependencies, in declaration order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<TargetReference>,
}

impl Target {
    /// Create a target without dependencies
    pub fn new(name: impl Into<String>, product: Product) -> Self {
        Self {
            name: name.into(),
            product,
            dependencies: Vec::new(),
        }
    }

    /// Append a dependency
    pub fn depends_on(mut self, reference: TargetReference) -> Self {
        self.dependencies.push(reference);
        self
    }

    /// Replace the dependency list
    pub fn with_dependencies(mut self, dependencies: Vec<TargetReference>) -> Self {
        self.dependencies = dependencies;
        self
    }
}

/// Global identity of a target: project path plus target name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TargetKey {
    pub path: PathBuf,
    pub name: String,
}

impl TargetKey {
    pub fn new(path: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for TargetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.path.display())
    }
}

// ============================================================================
// Project Attributes
// ============================================================================

/// A named grouping of targets for build and test actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scheme {
    pub name: String,

    /// Whether the scheme is shared with other users of the project
    #[serde(default)]
    pub shared: bool,

    /// Targets built by the scheme, in build order
    #[serde(default)]
    pub build_targets: Vec<String>,

    /// Test bundles run by the scheme
    #[serde(default)]
    pub test_targets: Vec<String>,
}

impl Scheme {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shared: false,
            build_targets: Vec::new(),
            test_targets: Vec::new(),
        }
    }
}

/// Build settings: a base dictionary plus per-configuration overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub base: BTreeMap<String, String>,
    pub configurations: BTreeMap<String, BTreeMap<String, String>>,
}

impl Settings {
    /// Effective value of `key` for a configuration, falling back to base.
    pub fn value(&self, configuration: &str, key: &str) -> Option<&str> {
        self.configurations
            .get(configuration)
            .and_then(|c| c.get(key))
            .or_else(|| self.base.get(key))
            .map(String::as_str)
    }
}

/// Group the generated project files are placed within.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectGroup {
    pub name: String,
}

impl Default for ProjectGroup {
    fn default() -> Self {
        Self {
            name: "Project".to_string(),
        }
    }
}

/// A non-build file attached to the project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileElement {
    File(PathBuf),
    FolderReference(PathBuf),
}

impl FileElement {
    pub fn path(&self) -> &Path {
        match self {
            FileElement::File(p) | FileElement::FolderReference(p) => p,
        }
    }
}

// ============================================================================
// Project
// ============================================================================

/// A loaded project manifest.
///
/// Equality is structural over path, name, targets, schemes and settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Canonical path of the directory holding the manifest
    pub path: PathBuf,

    /// Display name
    pub name: String,

    /// Output project file name (defaults to `name`)
    pub file_name: String,

    /// Targets in declaration order
    pub targets: Vec<Target>,

    /// Schemes in declaration order
    pub schemes: Vec<Scheme>,

    /// Project level settings
    pub settings: Settings,

    /// Group the project files are placed within
    pub files_group: ProjectGroup,

    /// Files included in the project but in no build phase
    pub additional_files: Vec<FileElement>,
}

impl Project {
    /// Create an empty project; `file_name` defaults to `name`.
    pub fn new(path: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            path: path.into(),
            file_name: name.clone(),
            name,
            targets: Vec::new(),
            schemes: Vec::new(),
            settings: Settings::default(),
            files_group: ProjectGroup::default(),
            additional_files: Vec::new(),
        }
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    pub fn with_targets(mut self, targets: Vec<Target>) -> Self {
        self.targets = targets;
        self
    }

    pub fn with_schemes(mut self, schemes: Vec<Scheme>) -> Self {
        self.schemes = schemes;
        self
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_files_group(mut self, files_group: ProjectGroup) -> Self {
        self.files_group = files_group;
        self
    }

    pub fn with_additional_files(mut self, files: Vec<FileElement>) -> Self {
        self.additional_files = files;
        self
    }

    /// Look up a declared target by name
    pub fn target(&self, name: &str) -> Option<&Target> {
        self.targets.iter().find(|t| t.name == name)
    }

    /// Key of one of this project's targets
    pub fn target_key(&self, name: &str) -> TargetKey {
        TargetKey::new(&self.path, name)
    }
}

impl PartialEq for Project {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
            && self.name == other.name
            && self.targets == other.targets
            && self.schemes == other.schemes
            && self.settings == other.settings
    }
}

impl Eq for Project {}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
