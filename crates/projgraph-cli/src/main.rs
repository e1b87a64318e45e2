//! projgraph CLI - Project manifest graph resolution
//!
//! A command-line interface for loading project manifests, resolving their
//! target dependency graph and inspecting the result.
//!
//! # Usage
//!
//! ```bash
//! # Print the resolved graph of the project in the current directory
//! projgraph graph
//!
//! # Render every project under a workspace as Graphviz
//! projgraph graph ./workspace --recursive --format dot
//!
//! # Show default project schemes with dependency-first ordering
//! projgraph --sort topological schemes
//!
//! # Fail on cycles or dangling dependencies
//! projgraph check ./App
//! ```

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use projgraph_config::{ConfigOverrides, LogFormat, ProjgraphConfig};
use projgraph_core::SortStrategy;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod commands;

/// projgraph - Resolve project manifests into a target dependency graph
#[derive(Parser, Debug)]
#[command(name = "projgraph")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOptions,
}

/// Global options available to all commands
#[derive(Args, Debug, Clone)]
struct GlobalOptions {
    /// Path to configuration file (replaces the local config)
    #[arg(long, short = 'c', global = true, env = "PROJGRAPH_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    quiet: bool,

    /// Manifest file name looked up in project directories
    #[arg(long, global = true, env = "PROJGRAPH_MANIFEST")]
    manifest_name: Option<String>,

    /// Scheme target ordering (legacy, topological)
    #[arg(long, global = true, value_parser = parse_sort_strategy)]
    sort: Option<SortStrategy>,
}

/// Parse sort strategy from string
fn parse_sort_strategy(s: &str) -> Result<SortStrategy, String> {
    s.parse()
}

impl GlobalOptions {
    /// Convert global options to config overrides
    pub fn to_config_overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            manifest_name: self.manifest_name.clone(),
            sort_strategy: self.sort,
            ..Default::default()
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve and print the target graph
    Graph(commands::graph::GraphArgs),

    /// Print the default project scheme of each loaded project
    Schemes(commands::schemes::SchemesArgs),

    /// Resolve the graph and report problems
    Check(commands::check::CheckArgs),

    /// List project directories under a root
    Discover(commands::discover::DiscoverArgs),

    /// View and manage configuration
    #[command(subcommand)]
    Config(commands::config::ConfigCommand),
}

impl Commands {
    /// Directory whose local configuration applies to the command
    fn workspace(&self) -> Option<&Path> {
        match self {
            Commands::Graph(args) => args.target.path.as_deref(),
            Commands::Schemes(args) => args.target.path.as_deref(),
            Commands::Check(args) => args.target.path.as_deref(),
            Commands::Discover(args) => args.root.as_deref(),
            Commands::Config(cmd) => cmd.workspace(),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let workspace = commands::resolve_workspace(cli.command.workspace())?;
    let config = commands::load_config(&cli.global, &workspace)?;

    init_logging(&cli.global, &config)?;

    match cli.command {
        Commands::Graph(args) => commands::graph::execute(args, &workspace, &config),
        Commands::Schemes(args) => commands::schemes::execute(args, &workspace, &config),
        Commands::Check(args) => commands::check::execute(args, &workspace, &config, &cli.global),
        Commands::Discover(args) => commands::discover::execute(args, &workspace, &config),
        Commands::Config(cmd) => commands::config::execute(cmd, &workspace, &config, &cli.global),
    }
}

/// Install the stderr subscriber; flags win over the configured level.
fn init_logging(global: &GlobalOptions, config: &ProjgraphConfig) -> Result<()> {
    let level = if global.quiet {
        "error"
    } else if global.verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };

    let builder = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::new(level))
        .with_writer(std::io::stderr);

    match config.logging.format {
        LogFormat::Text => {
            tracing::subscriber::set_global_default(builder.with_ansi(true).finish())?
        }
        LogFormat::Json => {
            tracing::subscriber::set_global_default(builder.json().with_ansi(false).finish())?
        }
    }

    Ok(())
}
