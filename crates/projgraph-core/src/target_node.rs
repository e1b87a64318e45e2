//! Target Nodes
//!
//! A [`TargetNode`] is the resolved form of a [`Target`]: it owns the ordered
//! list of the nodes its dependencies resolved to. Nodes are shared through
//! `Arc`, so a target reached along several paths (a diamond) is resolved
//! once and referenced by every dependent.
//!
//! The resolver lives here as part of [`ResolutionSession`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::trace;

use crate::error::GraphLoadError;
use crate::model::{Target, TargetKey};
use crate::session::{project_key_path, ResolutionSession};

/// A target together with its resolved dependencies.
#[derive(Debug)]
pub struct TargetNode {
    /// Path of the owning project; the project itself is owned by the cache
    project_path: PathBuf,
    target: Target,
    dependencies: Vec<Arc<TargetNode>>,
}

impl TargetNode {
    pub fn new(project_path: PathBuf, target: Target, dependencies: Vec<Arc<TargetNode>>) -> Self {
        Self {
            project_path,
            target,
            dependencies,
        }
    }

    /// Identity of this node
    pub fn key(&self) -> TargetKey {
        TargetKey::new(&self.project_path, &self.target.name)
    }

    pub fn name(&self) -> &str {
        &self.target.name
    }

    pub fn project_path(&self) -> &Path {
        &self.project_path
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    /// Resolved dependencies, in declaration order
    pub fn dependencies(&self) -> &[Arc<TargetNode>] {
        &self.dependencies
    }

    /// Whether the dependency on `key` is direct
    pub fn depends_on(&self, key: &TargetKey) -> bool {
        self.dependencies
            .iter()
            .any(|d| d.project_path == key.path && d.target.name == key.name)
    }
}

impl ResolutionSession<'_> {
    /// Resolve the target `name` of the project at `path` into a node.
    ///
    /// Cross-project dependencies are loaded on demand. Fails on cycles,
    /// unknown targets, dangling dependency edges and manifest errors; the
    /// session must not be reused after a failure.
    pub fn resolve_target(
        &mut self,
        name: &str,
        path: &Path,
    ) -> Result<Arc<TargetNode>, GraphLoadError> {
        let node = self.resolve(name, path)?;
        if self.detector.depth() == 0 {
            self.drain_pending()?;
        }
        Ok(node)
    }

    /// Recursive step of [`Self::resolve_target`].
    pub(crate) fn resolve(
        &mut self,
        name: &str,
        path: &Path,
    ) -> Result<Arc<TargetNode>, GraphLoadError> {
        self.check_cancelled()?;

        let key = TargetKey::new(project_key_path(path)?, name);
        self.detector.push(key.clone())?;
        let result = self.build_node(&key);
        self.detector.pop(&key);

        Ok(self.cache.add_target_node(Arc::new(result?)))
    }

    fn build_node(&mut self, key: &TargetKey) -> Result<TargetNode, GraphLoadError> {
        let project = self.load(&key.path)?;
        let target = project
            .target(&key.name)
            .ok_or_else(|| GraphLoadError::missing_target(&key.name, &key.path))?;

        let mut dependencies = Vec::with_capacity(target.dependencies.len());
        for reference in &target.dependencies {
            let dep = reference.key(&project.path);

            let dep_project = self.load(&dep.path)?;
            if dep_project.target(&dep.name).is_none() {
                return Err(GraphLoadError::MissingDependency {
                    name: dep.name,
                    path: dep.path,
                    required_by: key.clone(),
                });
            }

            let node = match self.cache.target_node(&dep_project.path, &dep.name) {
                Some(node) => {
                    trace!("Reusing resolved {}", node.key());
                    node
                }
                None => self.resolve(&dep.name, &dep_project.path)?,
            };
            dependencies.push(node);
        }

        Ok(TargetNode::new(
            project.path.clone(),
            target.clone(),
            dependencies,
        ))
    }
}
