//! npmspec: RPM spec files for npm packages.
//!
//! # Usage
//!
//! ```text
//! npmspec [--dry] [--debug] [--verbose] [--registry <url>] genspec <package>
//! npmspec [--dry] [--debug] [--verbose] [--registry <url>] genpkg <package> [-u] [-f] [--author <email>]
//! ```

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{genpkg::GenpkgArgs, genspec::GenspecArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "npmspec",
    version,
    about = "Generate and update RPM packaging for npm packages",
    long_about = None,
)]
struct Cli {
    /// Report what would be written without touching the package directory.
    #[arg(long, global = true)]
    dry: bool,

    /// Debug output.
    #[arg(long, global = true)]
    debug: bool,

    /// Verbose output.
    #[arg(long, global = true)]
    verbose: bool,

    /// Registry base URL, overriding the config file.
    #[arg(long, global = true, value_name = "URL")]
    registry: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print a spec file generated from the latest registry version.
    Genspec(GenspecArgs),

    /// Create the package directory, or update an existing spec file.
    Genpkg(GenpkgArgs),
}

/// Flags shared by every subcommand.
#[derive(Debug, Clone, Default)]
pub struct GlobalOpts {
    pub dry_run: bool,
    pub registry: Option<String>,
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug, cli.verbose);

    let globals = GlobalOpts {
        dry_run: cli.dry,
        registry: cli.registry,
    };
    match cli.command {
        Commands::Genspec(args) => args.run(&globals),
        Commands::Genpkg(args) => args.run(&globals),
    }
}

/// `RUST_LOG` wins; otherwise `--debug`, then `--verbose`, then warnings only.
fn init_tracing(debug: bool, verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = if debug {
        "debug"
    } else if verbose {
        "info"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
