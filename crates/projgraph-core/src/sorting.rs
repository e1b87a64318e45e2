//! Scheme Target Sorting
//!
//! Orders a project's targets for its default scheme. Two strategies exist:
//!
//! - [`SortStrategy::Legacy`]: pairwise comparator looking only at direct
//!   local dependencies, applied by a stable insertion sort.
//! - [`SortStrategy::Topological`]: Kahn's algorithm over local dependency
//!   edges, ready set ordered by name.
//!
//! Both place test bundles after every other target.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::graph::Graphing;
use crate::model::{Project, Target};

/// How targets are ordered inside a project scheme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortStrategy {
    /// Direct-dependency comparator with name tie-break
    #[default]
    Legacy,
    /// Dependency-first order over all local edges
    Topological,
}

impl SortStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortStrategy::Legacy => "legacy",
            SortStrategy::Topological => "topological",
        }
    }
}

impl fmt::Display for SortStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "legacy" => Ok(SortStrategy::Legacy),
            "topological" | "topo" => Ok(SortStrategy::Topological),
            other => Err(format!("unknown sort strategy: {other}")),
        }
    }
}

/// Targets of `project` in legacy scheme order.
pub fn sorted_targets_for_project_scheme<'p>(
    project: &'p Project,
    graph: &dyn Graphing,
) -> Vec<&'p Target> {
    sorted_targets(project, graph, SortStrategy::Legacy)
}

/// Targets of `project` ordered with `strategy`.
pub fn sorted_targets<'p>(
    project: &'p Project,
    graph: &dyn Graphing,
    strategy: SortStrategy,
) -> Vec<&'p Target> {
    let local_deps = local_dependencies(project, graph);
    match strategy {
        SortStrategy::Legacy => legacy_sort(project, &local_deps),
        SortStrategy::Topological => topological_sort(project, &local_deps),
    }
}

/// Names of each target's resolved dependencies that live in the same project.
fn local_dependencies<'p>(
    project: &'p Project,
    graph: &dyn Graphing,
) -> HashMap<&'p str, HashSet<String>> {
    project
        .targets
        .iter()
        .map(|target| {
            let names = graph
                .target_dependencies(&project.path, &target.name)
                .iter()
                .filter(|node| node.project_path() == project.path)
                .map(|node| node.name().to_string())
                .collect();
            (target.name.as_str(), names)
        })
        .collect()
}

// ============================================================================
// Legacy
// ============================================================================

fn legacy_sort<'p>(
    project: &'p Project,
    local_deps: &HashMap<&str, HashSet<String>>,
) -> Vec<&'p Target> {
    let mut targets: Vec<&Target> = project.targets.iter().collect();

    // The comparator is not a total order, so only adjacent strict swaps
    for i in 1..targets.len() {
        let mut j = i;
        while j > 0 && legacy_less(targets[j], targets[j - 1], local_deps) {
            targets.swap(j, j - 1);
            j -= 1;
        }
    }

    targets
}

fn legacy_less(a: &Target, b: &Target, local_deps: &HashMap<&str, HashSet<String>>) -> bool {
    let a_tests = a.product.is_tests_bundle();
    let b_tests = b.product.is_tests_bundle();
    if a_tests != b_tests {
        return !a_tests;
    }

    let depends = |on: &Target, of: &Target| {
        local_deps
            .get(of.name.as_str())
            .is_some_and(|deps| deps.contains(&on.name))
    };
    if depends(a, b) {
        return true;
    }
    if depends(b, a) {
        return false;
    }

    a.name < b.name
}

// ============================================================================
// Topological
// ============================================================================

fn topological_sort<'p>(
    project: &'p Project,
    local_deps: &HashMap<&str, HashSet<String>>,
) -> Vec<&'p Target> {
    let (tests, others): (Vec<&Target>, Vec<&Target>) = project
        .targets
        .iter()
        .partition(|t| t.product.is_tests_bundle());

    let mut sorted = kahn(&others, local_deps);
    sorted.extend(kahn(&tests, local_deps));
    sorted
}

fn kahn<'p>(
    partition: &[&'p Target],
    local_deps: &HashMap<&str, HashSet<String>>,
) -> Vec<&'p Target> {
    let by_name: HashMap<&str, &Target> =
        partition.iter().map(|t| (t.name.as_str(), *t)).collect();

    let mut in_degree: HashMap<&str, usize> = HashMap::new();
    let mut dependents: HashMap<&str, Vec<&str>> = HashMap::new();
    for target in partition {
        let name = target.name.as_str();
        let mut count = 0;
        for dep in local_deps.get(name).into_iter().flatten() {
            if let Some(dep_target) = by_name.get(dep.as_str()) {
                dependents
                    .entry(dep_target.name.as_str())
                    .or_default()
                    .push(name);
                count += 1;
            }
        }
        in_degree.insert(name, count);
    }

    let mut ready: BTreeSet<&str> = in_degree
        .iter()
        .filter(|(_, &degree)| degree == 0)
        .map(|(name, _)| *name)
        .collect();

    let mut sorted = Vec::with_capacity(partition.len());
    while let Some(name) = ready.pop_first() {
        sorted.push(by_name[name]);
        for dependent in dependents.get(name).into_iter().flatten() {
            if let Some(degree) = in_degree.get_mut(dependent) {
                *degree -= 1;
                if *degree == 0 {
                    ready.insert(dependent);
                }
            }
        }
    }

    // Leftovers only exist for cyclic input; keep them, by name
    if sorted.len() < partition.len() {
        let placed: HashSet<&str> = sorted.iter().map(|t| t.name.as_str()).collect();
        let mut rest: Vec<&Target> = partition
            .iter()
            .copied()
            .filter(|t| !placed.contains(t.name.as_str()))
            .collect();
        rest.sort_by(|a, b| a.name.cmp(&b.name));
        sorted.extend(rest);
    }

    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Product, TargetReference};
    use crate::target_node::TargetNode;
    use pretty_assertions::assert_eq;
    use std::path::{Path, PathBuf};
    use std::sync::Arc;

    /// Graph stub answering from the declared dependencies of one project
    struct DeclaredGraph<'a>(&'a Project);

    impl Graphing for DeclaredGraph<'_> {
        fn target_dependencies(&self, path: &Path, name: &str) -> Vec<Arc<TargetNode>> {
            let Some(target) = self.0.target(name) else {
                return Vec::new();
            };
            target
                .dependencies
                .iter()
                .map(|r| {
                    let dep_path = r.project_path(path).to_path_buf();
                    let dep = Target::new(r.target_name(), Product::Framework);
                    Arc::new(TargetNode::new(dep_path, dep, Vec::new()))
                })
                .collect()
        }
    }

    fn project(targets: Vec<Target>) -> Project {
        Project::new(PathBuf::from("/p"), "P").with_targets(targets)
    }

    fn names(targets: &[&Target]) -> Vec<String> {
        targets.iter().map(|t| t.name.clone()).collect()
    }

    #[test]
    fn test_dependency_and_tests_last() {
        let project = project(vec![
            Target::new("X", Product::App).depends_on(TargetReference::local("Z")),
            Target::new("Y", Product::UnitTests),
            Target::new("Z", Product::App),
        ]);

        let sorted = sorted_targets_for_project_scheme(&project, &DeclaredGraph(&project));
        assert_eq!(names(&sorted), vec!["Z", "X", "Y"]);
    }

    #[test]
    fn test_unrelated_targets_sort_by_name() {
        let project = project(vec![
            Target::new("B", Product::App),
            Target::new("A", Product::App),
        ]);

        let sorted = sorted_targets_for_project_scheme(&project, &DeclaredGraph(&project));
        assert_eq!(names(&sorted), vec!["A", "B"]);
    }

    #[test]
    fn test_remote_dependencies_are_ignored() {
        let project = project(vec![
            Target::new("A", Product::App).depends_on(TargetReference::project("B", "/q")),
            Target::new("B", Product::Framework),
        ]);

        let sorted = sorted_targets_for_project_scheme(&project, &DeclaredGraph(&project));
        assert_eq!(names(&sorted), vec!["A", "B"]);
    }

    #[test]
    fn test_test_bundles_ordered_among_themselves() {
        let project = project(vec![
            Target::new("UITests", Product::UiTests).depends_on(TargetReference::local("App")),
            Target::new("AppTests", Product::UnitTests),
            Target::new("App", Product::App),
        ]);

        let sorted = sorted_targets_for_project_scheme(&project, &DeclaredGraph(&project));
        assert_eq!(names(&sorted), vec!["App", "AppTests", "UITests"]);
    }

    #[test]
    fn test_legacy_only_inspects_direct_dependencies() {
        // C never meets B in an adjacent comparison, so the name tie-break
        // leaves it after both of its dependents
        let project = project(vec![
            Target::new("A", Product::App).depends_on(TargetReference::local("B")),
            Target::new("B", Product::Framework).depends_on(TargetReference::local("C")),
            Target::new("C", Product::Framework),
            Target::new("Bb", Product::Framework),
        ]);

        let sorted = sorted_targets_for_project_scheme(&project, &DeclaredGraph(&project));
        assert_eq!(names(&sorted), vec!["B", "A", "Bb", "C"]);
    }

    #[test]
    fn test_topological_orders_indirect_chain() {
        let project = project(vec![
            Target::new("A", Product::App).depends_on(TargetReference::local("B")),
            Target::new("B", Product::Framework).depends_on(TargetReference::local("C")),
            Target::new("C", Product::Framework),
            Target::new("Bz", Product::Framework),
            Target::new("ATests", Product::UnitTests).depends_on(TargetReference::local("A")),
        ]);

        let sorted = sorted_targets(&project, &DeclaredGraph(&project), SortStrategy::Topological);
        assert_eq!(names(&sorted), vec!["Bz", "C", "B", "A", "ATests"]);
    }

    #[test]
    fn test_strategy_from_str() {
        assert_eq!("legacy".parse::<SortStrategy>(), Ok(SortStrategy::Legacy));
        assert_eq!(
            "Topological".parse::<SortStrategy>(),
            Ok(SortStrategy::Topological)
        );
        assert!("random".parse::<SortStrategy>().is_err());
        assert_eq!(SortStrategy::default(), SortStrategy::Legacy);
    }
}
