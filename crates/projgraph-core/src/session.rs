//! Resolution Session
//!
//! A [`ResolutionSession`] owns all mutable state of one top-level graph
//! load: the [`GraphCache`], the [`CircularDependencyDetector`], the queue
//! of projects whose remaining targets still need resolving, and an
//! optional [`CancellationFlag`]. It is threaded by `&mut` through every
//! recursive step, so independent loads never share state.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use projgraph_core::{ResolutionSession, TomlManifestLoader};
//!
//! let loader = TomlManifestLoader::new();
//! let mut session = ResolutionSession::new(&loader);
//! let project = session.load_project(&root)?;
//! let graph = session.into_graph();
//! ```

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, info};

use crate::cache::GraphCache;
use crate::circular::CircularDependencyDetector;
use crate::error::{GraphLoadError, ManifestError};
use crate::graph::Graph;
use crate::manifest::normalize_path;
use crate::model::Project;
use crate::model_loader::ModelLoader;

// ============================================================================
// Cancellation
// ============================================================================

/// Shared flag checked at every recursive resolution step.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation of every session holding this flag
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

// ============================================================================
// Session
// ============================================================================

/// State of one graph resolution.
pub struct ResolutionSession<'a> {
    loader: &'a dyn ModelLoader,
    pub(crate) cache: GraphCache,
    pub(crate) detector: CircularDependencyDetector,
    /// Projects loaded while a target was in flight; their other targets are
    /// resolved once the active stack is empty again
    pending: VecDeque<Arc<Project>>,
    cancellation: Option<CancellationFlag>,
}

impl<'a> ResolutionSession<'a> {
    pub fn new(loader: &'a dyn ModelLoader) -> Self {
        Self {
            loader,
            cache: GraphCache::new(),
            detector: CircularDependencyDetector::new(),
            pending: VecDeque::new(),
            cancellation: None,
        }
    }

    /// Attach a cancellation flag
    pub fn with_cancellation(mut self, flag: CancellationFlag) -> Self {
        self.cancellation = Some(flag);
        self
    }

    /// Load the project at `path` and resolve every one of its targets.
    ///
    /// A project already in the cache is returned as is, without reparsing.
    /// Projects reached through cross-project dependencies are loaded and
    /// resolved as part of the same call.
    pub fn load_project(&mut self, path: &Path) -> Result<Arc<Project>, GraphLoadError> {
        let project = self.load(path)?;
        if self.detector.depth() == 0 {
            self.drain_pending()?;
        }
        Ok(project)
    }

    /// Load several root projects into the same session
    pub fn load_projects<P: AsRef<Path>>(
        &mut self,
        paths: impl IntoIterator<Item = P>,
    ) -> Result<Vec<Arc<Project>>, GraphLoadError> {
        paths
            .into_iter()
            .map(|p| self.load_project(p.as_ref()))
            .collect()
    }

    /// Cache lookup or manifest load; target resolution is queued.
    ///
    /// The project enters the cache before any of its targets resolves, so
    /// targets referring back to a sibling in the same project find it.
    pub(crate) fn load(&mut self, path: &Path) -> Result<Arc<Project>, GraphLoadError> {
        let path = project_key_path(path)?;
        if let Some(project) = self.cache.project(&path) {
            return Ok(project);
        }

        self.check_cancelled()?;
        debug!("Loading project at {}", path.display());

        let project = self
            .loader
            .load_project(&path)
            .map_err(|e| GraphLoadError::manifest_load(&path, e))?;
        let project = self.cache.add_project(Arc::new(project));

        self.pending.push_back(Arc::clone(&project));
        Ok(project)
    }

    /// Resolve the remaining targets of every queued project, in load order.
    pub(crate) fn drain_pending(&mut self) -> Result<(), GraphLoadError> {
        while let Some(project) = self.pending.pop_front() {
            for target in &project.targets {
                if self
                    .cache
                    .target_node(&project.path, &target.name)
                    .is_some()
                {
                    continue;
                }
                self.resolve(&target.name, &project.path)?;
            }
        }
        Ok(())
    }

    pub(crate) fn check_cancelled(&self) -> Result<(), GraphLoadError> {
        match self.cancellation {
            Some(ref flag) if flag.is_cancelled() => Err(GraphLoadError::Cancelled),
            _ => Ok(()),
        }
    }

    pub fn cache(&self) -> &GraphCache {
        &self.cache
    }

    pub fn detector(&self) -> &CircularDependencyDetector {
        &self.detector
    }

    /// Finish the session and build the read-only graph
    pub fn into_graph(self) -> Graph {
        let graph = Graph::from_cache(&self.cache);
        info!(
            "Resolved {} project(s), {} target(s), {} dependency edge(s)",
            graph.project_count(),
            graph.node_count(),
            graph.edge_count()
        );
        graph
    }
}

/// Absolute, lexically normalized form of a project path.
///
/// Every spelling of one project directory maps to the same cache key.
pub(crate) fn project_key_path(path: &Path) -> Result<PathBuf, GraphLoadError> {
    let absolute = std::path::absolute(path)
        .map_err(|e| GraphLoadError::manifest_load(path, ManifestError::read(path, e)))?;
    Ok(normalize_path(&absolute))
}

/// Load `path` in a fresh session and return the resolved graph.
pub fn load_graph(loader: &dyn ModelLoader, path: &Path) -> Result<Graph, GraphLoadError> {
    let mut session = ResolutionSession::new(loader);
    session.load_project(path)?;
    Ok(session.into_graph())
}
