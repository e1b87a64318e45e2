//! Discover command - List project directories under a root

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use projgraph_config::ProjgraphConfig;
use projgraph_core::ManifestDiscovery;

/// Arguments for the discover command
#[derive(Args, Debug)]
pub struct DiscoverArgs {
    /// Root directory to search (defaults to the current directory)
    pub root: Option<PathBuf>,

    /// Maximum directory depth (overrides discovery.max_depth)
    #[arg(long, short = 'd')]
    max_depth: Option<usize>,

    /// Print paths relative to the root
    #[arg(long)]
    relative: bool,
}

/// Execute the discover command
pub fn execute(args: DiscoverArgs, workspace: &Path, config: &ProjgraphConfig) -> Result<()> {
    let mut discovery_config = config.discovery_config();
    if let Some(depth) = args.max_depth {
        discovery_config.max_depth = depth;
    }

    let found = ManifestDiscovery::new(discovery_config)
        .discover(workspace)
        .context("Failed to discover projects")?;

    for path in &found {
        if args.relative {
            let relative = path.strip_prefix(workspace).unwrap_or(path);
            if relative.as_os_str().is_empty() {
                println!(".");
            } else {
                println!("{}", relative.display());
            }
        } else {
            println!("{}", path.display());
        }
    }

    Ok(())
}
