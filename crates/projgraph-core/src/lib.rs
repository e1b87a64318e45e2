//! projgraph Core - Project manifest resolution into a target dependency graph
//!
//! This crate provides the core functionality for project graph loading:
//! - Project model and TOML manifest loading
//! - Recursive target resolution with shared nodes and cycle detection
//! - A read-only graph with dependency queries and DOT/JSON output
//! - Scheme target ordering and default project schemes
//! - Manifest discovery under a workspace root

pub mod cache;
pub mod circular;
pub mod discovery;
pub mod error;
pub mod graph;
pub mod manifest;
pub mod model;
pub mod model_loader;
pub mod scheme;
pub mod session;
pub mod sorting;
pub mod target_node;

// Model re-exports
pub use model::{
    FileElement, Product, Project, ProjectGroup, Scheme, Settings, Target, TargetKey,
    TargetReference,
};

// Loading re-exports
pub use error::{GraphLoadError, ManifestError};
pub use manifest::{normalize_path, TomlManifestLoader, DEFAULT_MANIFEST_NAME};
pub use model_loader::ModelLoader;

// Resolution re-exports
pub use cache::GraphCache;
pub use circular::CircularDependencyDetector;
pub use session::{load_graph, CancellationFlag, ResolutionSession};
pub use target_node::TargetNode;

// Graph re-exports
pub use graph::{Graph, GraphSummary, Graphing, ProjectSummary, TargetSummary};
pub use scheme::project_scheme;
pub use sorting::{sorted_targets, sorted_targets_for_project_scheme, SortStrategy};

// Discovery re-exports
pub use discovery::{default_exclude_dirs, DiscoveryConfig, DiscoveryError, ManifestDiscovery};
