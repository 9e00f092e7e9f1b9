//! CLI argument parsing with clap

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

/// unwanted - warn about installed editor extensions a project does not want
#[derive(Parser, Debug)]
#[command(name = "unwanted")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(
        long,
        global = true,
        env = "NO_COLOR",
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check installed extensions against the workspace policy
    Check(CheckArgs),

    /// Show the merged policy and how each entry parses
    Policy(PolicyArgs),

    /// Show version information
    Version(VersionArgs),
}

/// Where to look for policy files
#[derive(Args, Debug, Clone)]
pub struct WorkspaceArgs {
    /// Workspace root to search for .vscode/extensions*.json files
    #[arg(short, long, default_value = ".")]
    pub root: Utf8PathBuf,

    /// Workspace document (*.code-workspace) to include
    #[arg(short, long)]
    pub workspace_file: Option<Utf8PathBuf>,
}

// Check command
#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub workspace: WorkspaceArgs,

    /// Editor extensions directory (default: ~/.vscode/extensions)
    #[arg(long, conflicts_with = "installed")]
    pub extensions_dir: Option<Utf8PathBuf>,

    /// JSON snapshot of installed extensions instead of the extensions directory
    #[arg(long)]
    pub installed: Option<Utf8PathBuf>,

    /// Output findings as JSON
    #[arg(long)]
    pub json: bool,

    /// Print the marketplace search without asking
    #[arg(short, long)]
    pub yes: bool,

    /// Exit with status 1 when unwanted extensions are enabled
    #[arg(long)]
    pub strict: bool,
}

// Policy command
#[derive(Args, Debug)]
pub struct PolicyArgs {
    #[command(flatten)]
    pub workspace: WorkspaceArgs,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

// Version command
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}
