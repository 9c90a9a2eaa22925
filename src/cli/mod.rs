//! CLI interface using clap
//!
//! Provides the command-line interface for HookFinder

mod commands;

pub use commands::*;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// HookFinder - find the custom filter hooks a plugin declares
#[derive(Parser, Debug)]
#[command(name = "hookfinder")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file (defaults to ./hookfinder.toml, then the user config dir)
    #[arg(short, long, global = true, env = "HOOKFINDER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json, markdown)
    #[arg(short = 'o', long, global = true, default_value = "text")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan a plugin archive or directory for custom hooks
    Scan(ScanArgs),

    /// List the known reference hooks
    Known(KnownArgs),

    /// Show or initialize configuration
    Config(ConfigArgs),
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Markdown,
}

/// Arguments for scan command
#[derive(Parser, Debug, Clone)]
pub struct ScanArgs {
    /// Zip archive or unpacked plugin directory
    pub archive: PathBuf,

    /// Additional known-hook file (.toml table or one name per line)
    #[arg(short, long)]
    pub known: Vec<PathBuf>,

    /// Do not filter out the built-in core hooks
    #[arg(long)]
    pub no_builtin: bool,

    /// Declaring call name, replaces the configured list
    #[arg(long)]
    pub callee: Vec<String>,

    /// Only show hooks whose name, function, file or call contains this text
    #[arg(short, long)]
    pub search: Option<String>,

    /// Write the report to a file instead of stdout
    #[arg(long)]
    pub output: Option<PathBuf>,
}

/// Arguments for known command
#[derive(Parser, Debug, Clone)]
pub struct KnownArgs {
    /// Only list hooks containing this text
    #[arg(short, long)]
    pub search: Option<String>,
}

/// Arguments for config command
#[derive(Parser, Debug, Clone)]
pub struct ConfigArgs {
    /// Show the effective configuration
    #[arg(long)]
    pub show: bool,

    /// Write a default hookfinder.toml in the current directory
    #[arg(long)]
    pub init: bool,

    /// Overwrite an existing file with --init
    #[arg(short, long)]
    pub force: bool,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from(["hookfinder", "scan", "plugin.zip", "--search", "price"]);
        assert!(matches!(cli.command, Commands::Scan(_)));

        if let Commands::Scan(args) = cli.command {
            assert_eq!(args.archive, PathBuf::from("plugin.zip"));
            assert_eq!(args.search.as_deref(), Some("price"));
            assert!(!args.no_builtin);
        }
    }

    #[test]
    fn test_repeatable_flags() {
        let cli = Cli::parse_from([
            "hookfinder", "-o", "json", "scan", "p.zip", "-k", "a.txt", "-k", "b.toml",
            "--callee", "apply_filters", "--callee", "do_action",
        ]);
        assert_eq!(cli.format, OutputFormat::Json);

        if let Commands::Scan(args) = cli.command {
            assert_eq!(args.known.len(), 2);
            assert_eq!(args.callee, vec!["apply_filters", "do_action"]);
        }
    }

    #[test]
    fn test_config_command() {
        let cli = Cli::parse_from(["hookfinder", "config", "--init", "--force"]);
        if let Commands::Config(args) = cli.command {
            assert!(args.init);
            assert!(args.force);
        }
    }
}
