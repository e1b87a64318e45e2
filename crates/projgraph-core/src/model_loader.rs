//! Model loading interface.
//!
//! The resolution engine never reads manifests itself; it asks a
//! [`ModelLoader`] for the [`Project`] at a path.
//! [`TomlManifestLoader`](crate::manifest::TomlManifestLoader) is the file
//! based implementation.

use std::path::Path;

use crate::error::ManifestError;
use crate::model::Project;

/// Produces project models from manifests.
pub trait ModelLoader {
    /// Load the project whose manifest lives in the directory `path`.
    ///
    /// The returned project's `path` must equal `path`, and cross-project
    /// references in its targets must carry canonical project paths.
    fn load_project(&self, path: &Path) -> Result<Project, ManifestError>;
}

impl<T: ModelLoader + ?Sized> ModelLoader for &T {
    fn load_project(&self, path: &Path) -> Result<Project, ManifestError> {
        (**self).load_project(path)
    }
}
