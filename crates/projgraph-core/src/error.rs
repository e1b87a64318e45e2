//! Error types for manifest loading and graph resolution.

use std::path::PathBuf;
use thiserror::Error;

use crate::model::TargetKey;

/// Errors raised by a [`ModelLoader`](crate::ModelLoader).
#[derive(Debug, Error)]
pub enum ManifestError {
    /// No manifest file at the expected location
    #[error("manifest not found at '{0}'")]
    NotFound(PathBuf),

    /// Manifest exists but could not be read
    #[error("failed to read manifest '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Manifest is not valid TOML or does not match the schema
    #[error("failed to parse manifest '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Manifest parsed but describes an invalid project
    #[error("invalid manifest '{path}': {message}")]
    Invalid { path: PathBuf, message: String },
}

impl ManifestError {
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    pub fn parse(path: impl Into<PathBuf>, source: toml::de::Error) -> Self {
        Self::Parse {
            path: path.into(),
            source,
        }
    }

    pub fn invalid(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Invalid {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Errors that abort a resolution session.
#[derive(Debug, Error)]
pub enum GraphLoadError {
    /// The manifest of a project could not be loaded
    #[error("failed to load project at '{path}': {source}")]
    ManifestLoad {
        path: PathBuf,
        #[source]
        source: ManifestError,
    },

    /// A target was requested that its project does not declare
    #[error("target '{name}' is not declared in project '{path}'")]
    MissingTarget { name: String, path: PathBuf },

    /// A dependency edge points at a target its project does not declare
    #[error("target {required_by} depends on '{name}', which is not declared in project '{path}'")]
    MissingDependency {
        name: String,
        path: PathBuf,
        required_by: TargetKey,
    },

    /// A target depends on itself through the active resolution stack
    #[error("circular dependency detected: {}", render_chain(.chain))]
    CircularDependency { chain: Vec<TargetKey> },

    /// The session's cancellation flag was raised
    #[error("graph resolution was cancelled")]
    Cancelled,
}

impl GraphLoadError {
    pub fn manifest_load(path: impl Into<PathBuf>, source: ManifestError) -> Self {
        Self::ManifestLoad {
            path: path.into(),
            source,
        }
    }

    pub fn missing_target(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::MissingTarget {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Cycle chain, from the first occurrence through the repeated key
    pub fn chain(&self) -> Option<&[TargetKey]> {
        match self {
            Self::CircularDependency { chain } => Some(chain),
            _ => None,
        }
    }
}

fn render_chain(chain: &[TargetKey]) -> String {
    chain
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}
