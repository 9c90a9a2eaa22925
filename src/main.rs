//! HookFinder - custom filter hook discovery tool
//!
//! Reads a plugin archive and lists the hooks it declares beyond the known
//! core set, with the function each declaration lives in.

use anyhow::Result;
use hookfinder::cli::{self, Cli, Commands};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse_args();

    // Setup logging on stderr so reports on stdout stay clean
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config_path = cli.config.as_deref();

    // Execute command
    match cli.command {
        Commands::Scan(args) => {
            let config = cli::load_config(config_path)?;
            let outcome = cli::scan(&args, &config)?;
            cli::emit_report(&outcome, cli.format, args.output.as_deref())?;
        }

        Commands::Known(args) => {
            let config = cli::load_config(config_path)?;
            let stdout = std::io::stdout();
            cli::known(&mut stdout.lock(), &args, &config, cli.format)?;
        }

        Commands::Config(args) => {
            cli::config(&args, config_path)?;
        }
    }

    Ok(())
}
