//! Session Cache
//!
//! Memoizes loaded projects by path and resolved target nodes by
//! [`TargetKey`]. Every key is written at most once: the first value stored
//! for a key wins and later adds return the stored value unchanged.
//!
//! Insertion order is recorded so iteration is deterministic.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::trace;

use crate::model::{Project, TargetKey};
use crate::target_node::TargetNode;

/// Projects and target nodes resolved during one session.
#[derive(Debug, Default)]
pub struct GraphCache {
    projects: HashMap<PathBuf, Arc<Project>>,
    project_order: Vec<PathBuf>,
    target_nodes: HashMap<TargetKey, Arc<TargetNode>>,
    target_node_order: Vec<TargetKey>,
}

impl GraphCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached project for `path`, if loaded
    pub fn project(&self, path: &Path) -> Option<Arc<Project>> {
        self.projects.get(path).cloned()
    }

    /// Store a project unless one is already cached for its path.
    ///
    /// Returns the project held by the cache afterwards.
    pub fn add_project(&mut self, project: Arc<Project>) -> Arc<Project> {
        if let Some(existing) = self.projects.get(&project.path) {
            trace!("Project already cached: {}", project.path.display());
            return Arc::clone(existing);
        }

        self.project_order.push(project.path.clone());
        self.projects
            .insert(project.path.clone(), Arc::clone(&project));
        project
    }

    /// Cached node for (`path`, `name`), if resolved
    pub fn target_node(&self, path: &Path, name: &str) -> Option<Arc<TargetNode>> {
        self.target_nodes
            .get(&TargetKey::new(path, name))
            .cloned()
    }

    /// Store a node unless one is already cached for its key.
    ///
    /// Returns the node held by the cache afterwards.
    pub fn add_target_node(&mut self, node: Arc<TargetNode>) -> Arc<TargetNode> {
        let key = node.key();
        if let Some(existing) = self.target_nodes.get(&key) {
            trace!("Target node already cached: {}", key);
            return Arc::clone(existing);
        }

        self.target_node_order.push(key.clone());
        self.target_nodes.insert(key, Arc::clone(&node));
        node
    }

    /// Number of cached projects
    pub fn project_count(&self) -> usize {
        self.projects.len()
    }

    /// Number of cached target nodes
    pub fn target_node_count(&self) -> usize {
        self.target_nodes.len()
    }

    /// Cached projects in load order
    pub fn projects(&self) -> impl Iterator<Item = &Arc<Project>> {
        self.project_order
            .iter()
            .filter_map(|path| self.projects.get(path))
    }

    /// Cached target nodes in resolution-completion order
    pub fn target_nodes(&self) -> impl Iterator<Item = &Arc<TargetNode>> {
        self.target_node_order
            .iter()
            .filter_map(|key| self.target_nodes.get(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Product, Target};

    fn node(path: &str, name: &str, product: Product) -> Arc<TargetNode> {
        Arc::new(TargetNode::new(
            PathBuf::from(path),
            Target::new(name, product),
            Vec::new(),
        ))
    }

    #[test]
    fn test_add_project_first_write_wins() {
        let mut cache = GraphCache::new();
        let first = Arc::new(Project::new("/p", "First"));
        let second = Arc::new(Project::new("/p", "Second"));

        cache.add_project(Arc::clone(&first));
        let stored = cache.add_project(second);

        assert!(Arc::ptr_eq(&stored, &first));
        assert_eq!(cache.project(Path::new("/p")).unwrap().name, "First");
        assert_eq!(cache.project_count(), 1);
    }

    #[test]
    fn test_add_target_node_first_write_wins() {
        let mut cache = GraphCache::new();
        cache.add_project(Arc::new(Project::new("/p", "P")));

        let first = node("/p", "A", Product::App);
        let second = node("/p", "A", Product::Framework);

        cache.add_target_node(Arc::clone(&first));
        let stored = cache.add_target_node(second);

        assert!(Arc::ptr_eq(&stored, &first));
        let cached = cache.target_node(Path::new("/p"), "A").unwrap();
        assert_eq!(cached.target().product, Product::App);
        assert_eq!(cache.target_node_count(), 1);
    }

    #[test]
    fn test_lookups_miss_for_unknown_keys() {
        let mut cache = GraphCache::new();
        assert!(cache.project(Path::new("/p")).is_none());
        assert!(cache.target_node(Path::new("/p"), "A").is_none());

        cache.add_project(Arc::new(Project::new("/p", "P")));
        assert!(cache.target_node(Path::new("/p"), "A").is_none());
    }

    #[test]
    fn test_iteration_follows_insertion_order() {
        let mut cache = GraphCache::new();
        for path in ["/c", "/a", "/b"] {
            cache.add_project(Arc::new(Project::new(path, path)));
        }
        cache.add_project(Arc::new(Project::new("/a", "again")));

        let order: Vec<_> = cache.projects().map(|p| p.path.clone()).collect();
        assert_eq!(
            order,
            vec![PathBuf::from("/c"), PathBuf::from("/a"), PathBuf::from("/b")]
        );
    }
}
