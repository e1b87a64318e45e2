//! Schemes command - Print default project schemes

use std::path::Path;

use anyhow::Result;
use clap::Args;
use projgraph_config::ProjgraphConfig;
use projgraph_core::{project_scheme, Scheme};

use super::{resolve_graph, ProjectTarget};

/// Arguments for the schemes command
#[derive(Args, Debug)]
pub struct SchemesArgs {
    #[command(flatten)]
    pub target: ProjectTarget,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// Execute the schemes command
pub fn execute(args: SchemesArgs, workspace: &Path, config: &ProjgraphConfig) -> Result<()> {
    let graph = resolve_graph(&args.target, workspace, config)?;
    let strategy = config.sorting.strategy;

    let schemes: Vec<Scheme> = graph
        .projects()
        .iter()
        .map(|project| project_scheme(project, &graph, strategy))
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&schemes)?);
        return Ok(());
    }

    for scheme in &schemes {
        println!("{} ({} ordering)", scheme.name, strategy);
        println!("  build: {}", scheme.build_targets.join(", "));
        if !scheme.test_targets.is_empty() {
            println!("  test:  {}", scheme.test_targets.join(", "));
        }
    }

    Ok(())
}
