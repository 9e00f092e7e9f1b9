//! unwanted CLI - flag installed editor extensions a workspace marks as unwanted
//!
//! This is the main entry point for the unwanted command-line interface.

mod cli;
mod commands;
mod output;
mod presenter;
mod version;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet);

    let settings = commands::common::load_settings(cli.verbose, cli.no_color)?;
    if !settings.display.color_enabled {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }

    if !cli.quiet {
        commands::common::show_release_notice(&settings);
    }

    match cli.command {
        Commands::Check(args) => commands::check::run(args, &settings).await,
        Commands::Policy(args) => commands::policy::run(args, &settings).await,
        Commands::Version(args) => commands::version::run(args),
    }
}

/// Initialize tracing with appropriate verbosity
fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("info"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    // Logs go to stderr so `--json` output stays parseable
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}
