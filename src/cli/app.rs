//! Main CLI application structure

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use super::output::{Output, OutputFormat};
use super::plugin_cmd;
use crate::checks;
use crate::formatting;
use crate::plugin::StaticRegistry;

#[derive(Parser)]
#[command(name = "lintel")]
#[command(author, version, about = "Plugin-driven static analysis for source code")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(long, short = 'v', global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Inspect registered plugins
    #[command(subcommand)]
    Plugins(plugin_cmd::PluginCommands),
}

/// Builds the host's extension registry with the bundled extensions
pub fn host_registry() -> StaticRegistry {
    let mut registry = StaticRegistry::new();
    checks::register_builtins(&mut registry);
    formatting::register_builtins(&mut registry);
    registry
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let output = Output::new(cli.format);

    match cli.command {
        Commands::Plugins(cmd) => plugin_cmd::run(cmd, &output)?,
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "info,lintel=debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("LINTEL_LOG").unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}
