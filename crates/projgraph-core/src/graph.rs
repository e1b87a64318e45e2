//! Resolved Target Graph
//!
//! [`Graph`] is the read-only result of a [`ResolutionSession`]: every
//! project loaded and every target node resolved, indexed by path and by
//! [`TargetKey`]. Dependency edges are mirrored into a petgraph
//! `StableGraph` (dependent → dependency) for traversal and ordering.
//!
//! [`ResolutionSession`]: crate::ResolutionSession

use std::collections::{HashMap, HashSet};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use petgraph::algo::toposort;
use petgraph::stable_graph::{NodeIndex, StableGraph};
use petgraph::Direction;
use serde::Serialize;

use crate::cache::GraphCache;
use crate::model::{Product, Project, TargetKey};
use crate::target_node::TargetNode;

/// Read-only dependency queries over resolved targets.
pub trait Graphing {
    /// Direct dependencies of the target `name` in the project at `path`.
    ///
    /// Unknown targets have no dependencies.
    fn target_dependencies(&self, path: &Path, name: &str) -> Vec<Arc<TargetNode>>;
}

// ============================================================================
// Graph
// ============================================================================

/// All projects and target nodes of a finished resolution.
#[derive(Debug, Default)]
pub struct Graph {
    /// Projects in load order
    projects: Vec<Arc<Project>>,
    project_index: HashMap<PathBuf, usize>,

    nodes: HashMap<TargetKey, Arc<TargetNode>>,

    /// Edge structure; node weights are target keys
    graph: StableGraph<TargetKey, ()>,
    node_index: HashMap<TargetKey, NodeIndex>,
}

impl Graph {
    /// Build the graph from a session cache.
    ///
    /// Nodes are laid out by project load order, then target declaration
    /// order, so traversal results do not depend on resolution order.
    pub fn from_cache(cache: &GraphCache) -> Self {
        let mut graph = Graph::default();

        for project in cache.projects() {
            graph
                .project_index
                .insert(project.path.clone(), graph.projects.len());
            graph.projects.push(Arc::clone(project));
        }

        let ordered: Vec<Arc<TargetNode>> = graph
            .projects
            .iter()
            .flat_map(|p| {
                p.targets
                    .iter()
                    .filter_map(|t| cache.target_node(&p.path, &t.name))
            })
            .collect();

        for node in &ordered {
            graph.add_node(Arc::clone(node));
        }
        for node in &ordered {
            let from = graph.node_index[&node.key()];
            for dep in node.dependencies() {
                let to = graph.add_node(Arc::clone(dep));
                graph.graph.add_edge(from, to, ());
            }
        }

        graph
    }

    fn add_node(&mut self, node: Arc<TargetNode>) -> NodeIndex {
        let key = node.key();
        if let Some(&idx) = self.node_index.get(&key) {
            return idx;
        }
        let idx = self.graph.add_node(key.clone());
        self.node_index.insert(key.clone(), idx);
        self.nodes.insert(key, node);
        idx
    }

    /// Project loaded from `path`
    pub fn project(&self, path: &Path) -> Option<&Arc<Project>> {
        self.project_index.get(path).map(|&i| &self.projects[i])
    }

    /// Projects in load order
    pub fn projects(&self) -> &[Arc<Project>] {
        &self.projects
    }

    pub fn target_node(&self, path: &Path, name: &str) -> Option<&Arc<TargetNode>> {
        self.nodes.get(&TargetKey::new(path, name))
    }

    /// Targets that depend directly on the target `name` at `path`, sorted
    /// by key.
    pub fn dependents(&self, path: &Path, name: &str) -> Vec<Arc<TargetNode>> {
        let Some(&idx) = self.node_index.get(&TargetKey::new(path, name)) else {
            return Vec::new();
        };

        let mut keys: Vec<&TargetKey> = self
            .graph
            .neighbors_directed(idx, Direction::Incoming)
            .map(|n| &self.graph[n])
            .collect();
        keys.sort();
        keys.dedup();
        keys.into_iter()
            .filter_map(|k| self.nodes.get(k).cloned())
            .collect()
    }

    /// Every target reachable from `name` at `path`, depth first in
    /// declaration order, without duplicates and excluding the target itself.
    pub fn transitive_dependencies(&self, path: &Path, name: &str) -> Vec<Arc<TargetNode>> {
        let mut result = Vec::new();
        let Some(root) = self.target_node(path, name) else {
            return result;
        };

        let mut visited = HashSet::new();
        visited.insert(root.key());
        collect_transitive(root, &mut visited, &mut result);
        result
    }

    /// All target keys with dependencies before their dependents.
    pub fn topological_order(&self) -> Vec<TargetKey> {
        // Resolution rejects cycles, so the sort cannot fail on a built graph
        match toposort(&self.graph, None) {
            Ok(order) => order
                .into_iter()
                .rev()
                .map(|idx| self.graph[idx].clone())
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    pub fn project_count(&self) -> usize {
        self.projects.len()
    }

    /// Number of target nodes
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of dependency edges
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Graphviz rendering, one cluster per project.
    pub fn to_dot(&self) -> String {
        let mut out = String::from("digraph projgraph {\n");

        for (i, project) in self.projects.iter().enumerate() {
            let _ = writeln!(out, "  subgraph cluster_{} {{", i);
            let _ = writeln!(out, "    label = {:?};", project.name);
            for target in &project.targets {
                let key = project.target_key(&target.name);
                let _ = writeln!(
                    out,
                    "    {:?} [label = {:?}];",
                    key.to_string(),
                    target.name
                );
            }
            out.push_str("  }\n");
        }

        for project in &self.projects {
            for target in &project.targets {
                let Some(node) = self.target_node(&project.path, &target.name) else {
                    continue;
                };
                for dep in node.dependencies() {
                    let _ = writeln!(
                        out,
                        "  {:?} -> {:?};",
                        node.key().to_string(),
                        dep.key().to_string()
                    );
                }
            }
        }

        out.push_str("}\n");
        out
    }

    /// Serializable snapshot of the graph
    pub fn summary(&self) -> GraphSummary {
        let projects = self
            .projects
            .iter()
            .map(|project| ProjectSummary {
                name: project.name.clone(),
                path: project.path.clone(),
                targets: project
                    .targets
                    .iter()
                    .map(|target| TargetSummary {
                        name: target.name.clone(),
                        product: target.product,
                        dependencies: self
                            .target_dependencies(&project.path, &target.name)
                            .iter()
                            .map(|d| d.key())
                            .collect(),
                    })
                    .collect(),
            })
            .collect();

        GraphSummary {
            projects,
            node_count: self.node_count(),
            edge_count: self.edge_count(),
        }
    }

    /// Pretty printed JSON of [`Self::summary`]
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.summary())
    }
}

impl Graphing for Graph {
    fn target_dependencies(&self, path: &Path, name: &str) -> Vec<Arc<TargetNode>> {
        self.target_node(path, name)
            .map(|node| node.dependencies().to_vec())
            .unwrap_or_default()
    }
}

fn collect_transitive(
    node: &TargetNode,
    visited: &mut HashSet<TargetKey>,
    result: &mut Vec<Arc<TargetNode>>,
) {
    for dep in node.dependencies() {
        if visited.insert(dep.key()) {
            result.push(Arc::clone(dep));
            collect_transitive(dep, visited, result);
        }
    }
}

// ============================================================================
// Summary
// ============================================================================

/// JSON friendly view of a [`Graph`].
#[derive(Debug, Clone, Serialize)]
pub struct GraphSummary {
    pub projects: Vec<ProjectSummary>,
    pub node_count: usize,
    pub edge_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectSummary {
    pub name: String,
    pub path: PathBuf,
    pub targets: Vec<TargetSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TargetSummary {
    pub name: String,
    pub product: Product,
    pub dependencies: Vec<TargetKey>,
}
