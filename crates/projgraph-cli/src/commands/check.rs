//! Check command - Resolve the graph and report problems

use std::path::Path;

use anyhow::Result;
use clap::Args;
use projgraph_config::ProjgraphConfig;

use super::{print_info, resolve_graph, ProjectTarget};
use crate::GlobalOptions;

/// Arguments for the check command
#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub target: ProjectTarget,
}

/// Execute the check command
///
/// Resolution errors (cycles, missing targets, broken manifests) are
/// returned as is and end the process with a failure status.
pub fn execute(
    args: CheckArgs,
    workspace: &Path,
    config: &ProjgraphConfig,
    global: &GlobalOptions,
) -> Result<()> {
    let graph = resolve_graph(&args.target, workspace, config)?;

    print_info(
        &format!(
            "Checked {} project(s), {} target(s), {} dependency edge(s)",
            graph.project_count(),
            graph.node_count(),
            graph.edge_count()
        ),
        global.quiet,
    );
    println!("ok");

    Ok(())
}
