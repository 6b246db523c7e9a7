//! Book CLI - site configuration tooling for the Laravel tutorial book.
//!
//! Provides commands for:
//! - `check`: Validate the configuration (and optionally the sidebar sources)
//! - `show`: Print the resolved configuration as JSON
//! - `nav`: Print navigation, sidebar order and edit links
//! - `render`: Render a markdown page with the configured extensions

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{CheckArgs, NavArgs, RenderArgs, ShowArgs};
use output::Output;

/// Book - site configuration tooling.
#[derive(Parser)]
#[command(name = "book", version, about)]
struct Cli {
    /// Enable verbose output (INFO logs).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the site configuration.
    Check(CheckArgs),
    /// Print the resolved configuration as JSON.
    Show(ShowArgs),
    /// Print navigation, sidebar order and edit links.
    Nav(NavArgs),
    /// Render a markdown file to HTML.
    Render(RenderArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Check(args) => args.execute(),
        Commands::Show(args) => args.execute(),
        Commands::Nav(args) => args.execute(),
        Commands::Render(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
