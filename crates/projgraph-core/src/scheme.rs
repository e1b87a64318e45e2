//! Default project scheme generation.

use crate::graph::Graphing;
use crate::model::{Project, Scheme};
use crate::sorting::{sorted_targets, SortStrategy};

/// Shared scheme named `<Project>-Project` building every target of
/// `project` and testing every test bundle, both in sorted order.
pub fn project_scheme(project: &Project, graph: &dyn Graphing, strategy: SortStrategy) -> Scheme {
    let targets = sorted_targets(project, graph, strategy);

    Scheme {
        name: format!("{}-Project", project.name),
        shared: true,
        build_targets: targets.iter().map(|t| t.name.clone()).collect(),
        test_targets: targets
            .iter()
            .filter(|t| t.product.is_tests_bundle())
            .map(|t| t.name.clone())
            .collect(),
    }
}
