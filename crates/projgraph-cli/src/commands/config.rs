//! Config command - View and manage configuration
//!
//! - Show the effective (merged) configuration
//! - Get a single value by dotted key
//! - Write a default local configuration
//! - Show configuration file paths

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use projgraph_config::{ConfigLoader, ProjgraphConfig};
use serde::Serialize;

use super::print_info;
use crate::GlobalOptions;

/// Config management commands
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show(ShowArgs),

    /// Get a specific configuration value
    Get(GetArgs),

    /// Write a default `.projgraph/config.toml` into a workspace
    Init(WorkspaceArgs),

    /// Show configuration file paths
    Path(PathArgs),
}

impl ConfigCommand {
    pub fn workspace(&self) -> Option<&Path> {
        match self {
            ConfigCommand::Show(args) => args.workspace.path.as_deref(),
            ConfigCommand::Get(args) => args.workspace.path.as_deref(),
            ConfigCommand::Init(args) => args.path.as_deref(),
            ConfigCommand::Path(args) => args.workspace.path.as_deref(),
        }
    }
}

/// Workspace selection for config commands
#[derive(Args, Debug)]
pub struct WorkspaceArgs {
    /// Workspace directory (defaults to the current directory)
    pub path: Option<PathBuf>,
}

/// Arguments for the show command
#[derive(Args, Debug)]
pub struct ShowArgs {
    #[command(flatten)]
    workspace: WorkspaceArgs,

    /// Output as JSON instead of TOML
    #[arg(long)]
    json: bool,
}

/// Arguments for the get command
#[derive(Args, Debug)]
pub struct GetArgs {
    /// Configuration key (e.g., "sorting.strategy")
    key: String,

    #[command(flatten)]
    workspace: WorkspaceArgs,
}

/// Arguments for the path command
#[derive(Args, Debug)]
pub struct PathArgs {
    #[command(flatten)]
    workspace: WorkspaceArgs,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// Configuration paths
#[derive(Debug, Clone, Serialize)]
pub struct ConfigPaths {
    /// Global config file path
    pub global: Option<PathBuf>,
    /// Local config file path
    pub local: PathBuf,
    /// Whether global config exists
    pub global_exists: bool,
    /// Whether local config exists
    pub local_exists: bool,
}

/// Execute the config command
pub fn execute(
    cmd: ConfigCommand,
    workspace: &Path,
    config: &ProjgraphConfig,
    global: &GlobalOptions,
) -> Result<()> {
    match cmd {
        ConfigCommand::Show(args) => execute_show(args, config),
        ConfigCommand::Get(args) => execute_get(args, config),
        ConfigCommand::Init(_) => execute_init(workspace, global),
        ConfigCommand::Path(args) => execute_path(args, workspace),
    }
}

fn execute_show(args: ShowArgs, config: &ProjgraphConfig) -> Result<()> {
    if args.json {
        println!("{}", serde_json::to_string_pretty(config)?);
    } else {
        print!(
            "{}",
            toml::to_string_pretty(config).context("Failed to serialize configuration")?
        );
    }
    Ok(())
}

fn execute_get(args: GetArgs, config: &ProjgraphConfig) -> Result<()> {
    let value = get_config_value(config, &args.key)
        .ok_or_else(|| anyhow::anyhow!("Unknown configuration key: {}", args.key))?;

    match value {
        serde_json::Value::String(s) => println!("{}", s),
        serde_json::Value::Bool(b) => println!("{}", b),
        serde_json::Value::Number(n) => println!("{}", n),
        serde_json::Value::Null => println!("null"),
        other => println!("{}", serde_json::to_string_pretty(&other)?),
    }

    Ok(())
}

fn execute_init(workspace: &Path, global: &GlobalOptions) -> Result<()> {
    let loader = ConfigLoader::new();
    let existed = loader.local_config_path(workspace).exists();

    let path = loader
        .init_local(workspace)
        .context("Failed to initialize local configuration")?;

    if existed {
        print_info(
            &format!("Configuration already exists: {}", path.display()),
            global.quiet,
        );
    } else {
        print_info(&format!("Created {}", path.display()), global.quiet);
    }
    println!("{}", path.display());

    Ok(())
}

fn execute_path(args: PathArgs, workspace: &Path) -> Result<()> {
    let loader = ConfigLoader::new();
    let global_path = loader.global_config_path();
    let local_path = loader.local_config_path(workspace);

    let paths = ConfigPaths {
        global_exists: global_path.as_ref().is_some_and(|p| p.exists()),
        local_exists: local_path.exists(),
        global: global_path,
        local: local_path,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&paths)?);
        return Ok(());
    }

    let status = |exists: bool| if exists { "exists" } else { "not found" };
    match paths.global {
        Some(ref gp) => println!("Global: {} ({})", gp.display(), status(paths.global_exists)),
        None => println!("Global: not available (no home directory)"),
    }
    println!(
        "Local:  {} ({})",
        paths.local.display(),
        status(paths.local_exists)
    );

    Ok(())
}

/// Get a configuration value by dotted key path
fn get_config_value(config: &ProjgraphConfig, key: &str) -> Option<serde_json::Value> {
    let json = serde_json::to_value(config).ok()?;

    let mut current = &json;
    for part in key.split('.') {
        current = current.get(part)?;
    }

    Some(current.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_config_value() {
        let config = ProjgraphConfig::default();

        assert_eq!(
            get_config_value(&config, "sorting.strategy"),
            Some(serde_json::Value::String("legacy".to_string()))
        );
        assert_eq!(
            get_config_value(&config, "discovery.max_depth"),
            Some(serde_json::json!(4))
        );
        assert!(get_config_value(&config, "sorting.missing").is_none());
    }
}
