//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod check;
mod resolve;
mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::load_settings;

#[derive(Parser)]
#[command(name = "errorlens")]
#[command(about = "Resolve application error screenshots to curated remediation answers")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Start the upload server
    Serve {
        /// Address to bind to (port, host, or host:port)
        #[arg(short, long, env = "ERRORLENS_BIND")]
        bind: Option<String>,
    },

    /// OCR a screenshot and resolve the error it shows
    Resolve {
        /// Image file to read
        image: PathBuf,
        /// Print the full OCR text as well
        #[arg(long)]
        show_text: bool,
    },

    /// Resolve already-recognised text ("-" reads stdin)
    Match {
        /// Error text to resolve
        text: String,
    },

    /// Check OCR and knowledge base availability
    Check,
}

/// Run the CLI.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (settings, _config) = load_settings(cli.config.as_deref()).await?;

    match cli.command {
        Commands::Serve { bind } => {
            serve::cmd_serve(&settings, bind.as_deref().unwrap_or(&settings.bind)).await
        }
        Commands::Resolve { image, show_text } => {
            resolve::cmd_resolve(&settings, &image, show_text).await
        }
        Commands::Match { text } => resolve::cmd_match(&settings, &text).await,
        Commands::Check => check::cmd_check(&settings).await,
    }
}
