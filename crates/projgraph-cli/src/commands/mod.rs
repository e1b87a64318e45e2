//! CLI command implementations
//!
//! This module contains all projgraph CLI command implementations.

pub mod check;
pub mod config;
pub mod discover;
pub mod graph;
pub mod schemes;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use projgraph_config::{ConfigLoader, ProjgraphConfig};
use projgraph_core::{Graph, ManifestDiscovery, ResolutionSession};
use tracing::debug;

use crate::GlobalOptions;

/// Project selection shared by the graph commands
#[derive(Args, Debug)]
pub struct ProjectTarget {
    /// Project directory (defaults to the current directory)
    pub path: Option<PathBuf>,

    /// Load every project discovered under PATH instead of PATH alone
    #[arg(long, short = 'r')]
    pub recursive: bool,
}

/// Resolve the directory a command operates on.
pub fn resolve_workspace(path: Option<&Path>) -> Result<PathBuf> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => std::env::current_dir().context("Failed to get current directory")?,
    };

    path.canonicalize()
        .with_context(|| format!("Path not found: {}", path.display()))
}

/// Load configuration with optional config file override.
///
/// Merges global → local (or `--config`) → CLI flags, then validates.
pub fn load_config(global: &GlobalOptions, workspace: &Path) -> Result<ProjgraphConfig> {
    let mut loader = ConfigLoader::new();
    let overrides = global.to_config_overrides();

    let config = match global.config {
        Some(ref config_path) => loader
            .load_from_file(config_path, Some(&overrides))
            .with_context(|| format!("Failed to load config file {}", config_path.display()))?,
        None => loader
            .load(workspace, Some(&overrides))
            .context("Failed to load configuration")?,
    };

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Load the selected project(s) and resolve their graph.
pub fn resolve_graph(
    target: &ProjectTarget,
    workspace: &Path,
    config: &ProjgraphConfig,
) -> Result<Graph> {
    let loader = config.manifest_loader();
    let mut session = ResolutionSession::new(&loader);

    if target.recursive {
        let roots = ManifestDiscovery::new(config.discovery_config())
            .discover(workspace)
            .context("Failed to discover projects")?;
        if roots.is_empty() {
            anyhow::bail!(
                "No {} found under {}",
                loader.manifest_name(),
                workspace.display()
            );
        }

        debug!("Loading {} discovered project(s)", roots.len());
        session
            .load_projects(&roots)
            .with_context(|| format!("Failed to resolve projects under {}", workspace.display()))?;
    } else {
        session
            .load_project(workspace)
            .with_context(|| format!("Failed to resolve project at {}", workspace.display()))?;
    }

    Ok(session.into_graph())
}

/// Print an info message (respects quiet flag).
pub fn print_info(message: &str, quiet: bool) {
    if !quiet {
        eprintln!("{}", message);
    }
}
