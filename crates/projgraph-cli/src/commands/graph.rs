//! Graph command - Resolve and print the target graph

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use projgraph_config::ProjgraphConfig;
use projgraph_core::Graph;

use super::{resolve_graph, ProjectTarget};

/// Arguments for the graph command
#[derive(Args, Debug)]
pub struct GraphArgs {
    #[command(flatten)]
    pub target: ProjectTarget,

    /// Output format
    #[arg(long, short = 'f', value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Indented project / target / dependency listing
    Text,
    /// Serialized graph summary
    Json,
    /// Graphviz digraph
    Dot,
}

/// Execute the graph command
pub fn execute(args: GraphArgs, workspace: &Path, config: &ProjgraphConfig) -> Result<()> {
    let graph = resolve_graph(&args.target, workspace, config)?;

    let output = match args.format {
        OutputFormat::Text => render_text(&graph),
        OutputFormat::Json => graph.to_json().context("Failed to serialize graph")?,
        OutputFormat::Dot => graph.to_dot(),
    };
    print!("{}", output);
    if !output.ends_with('\n') {
        println!();
    }

    Ok(())
}

/// One block per project, targets in declaration order.
fn render_text(graph: &Graph) -> String {
    let mut out = String::new();

    for project in graph.projects() {
        let _ = writeln!(out, "{} ({})", project.name, project.path.display());
        for target in &project.targets {
            let _ = writeln!(out, "  {} [{}]", target.name, target.product);
            let Some(node) = graph.target_node(&project.path, &target.name) else {
                continue;
            };
            for dep in node.dependencies() {
                let _ = writeln!(out, "    -> {}", dep.key());
            }
        }
    }

    let _ = writeln!(
        out,
        "\n{} project(s), {} target(s), {} dependency edge(s)",
        graph.project_count(),
        graph.node_count(),
        graph.edge_count()
    );
    out
}
