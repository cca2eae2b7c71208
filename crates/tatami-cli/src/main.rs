//! tatami CLI
//!
//! Command-line interface for the ERB template formatter

mod commands;
mod files;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::error;

#[derive(Parser)]
#[command(name = "tatami")]
#[command(about = "An opinionated formatter for HTML templates with embedded Ruby (ERB)")]
#[command(version = tatami_core::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Format templates
    Fmt {
        /// Files, directories or glob patterns to format (`-` reads stdin)
        #[arg(default_value = ".")]
        paths: Vec<PathBuf>,

        /// Write results back to files instead of printing to stdout
        #[arg(long)]
        write: bool,

        /// Check formatting without modifying files
        #[arg(long)]
        check: bool,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Initialize a new configuration file
    Init,
    /// Validate configuration
    Validate,
}

fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        std::env::set_var("RUST_LOG", "tatami=debug");
    }
    tatami_core::init_tracing();

    match run_command(cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            error!("tatami failed: {e}");
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
}

fn run_command(cli: Cli) -> tatami_core::Result<i32> {
    match cli.command {
        Commands::Fmt {
            paths,
            write,
            check,
        } => commands::fmt_command(&paths, write, check, cli.config.as_deref()),

        Commands::Config { action } => match action {
            ConfigAction::Init => commands::config_init(),
            ConfigAction::Validate => commands::config_validate(cli.config.as_deref()),
        },
    }
}
