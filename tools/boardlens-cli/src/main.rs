//! BoardLens CLI — live whiteboard analysis from the terminal.
//!
//! Usage:
//!   boardlens run [OPTIONS]       Live capture + analysis loop
//!   boardlens snapshot [OPTIONS]  Capture one frame and analyze it once
//!   boardlens check               Check camera and service availability

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "boardlens",
    about = "Point a camera at a whiteboard, get positioned explanations back",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the live capture + analysis loop
    Run {
        /// Analysis service base URL
        #[arg(long)]
        endpoint: Option<String>,

        /// Facing mode to open first: front|rear
        #[arg(long)]
        facing: Option<String>,

        /// Auto-capture interval in milliseconds
        #[arg(long)]
        interval_ms: Option<u64>,

        /// Disable the periodic trigger (manual captures only)
        #[arg(long)]
        no_auto: bool,

        /// Viewport width used for overlay placement output
        #[arg(long, default_value = "1280")]
        viewport_width: f64,

        /// Viewport height used for overlay placement output
        #[arg(long, default_value = "720")]
        viewport_height: f64,
    },

    /// Capture a single frame, analyze it, and print the results
    Snapshot {
        /// Analysis service base URL
        #[arg(long)]
        endpoint: Option<String>,

        /// Facing mode to open: front|rear
        #[arg(long)]
        facing: Option<String>,
    },

    /// Check camera backend and analysis service availability
    Check {
        /// Analysis service base URL
        #[arg(long)]
        endpoint: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = boardlens_common::config::AppConfig::load();
    let log_level = if cli.verbose { "debug" } else { "info" };
    boardlens_common::logging::init_logging(&boardlens_common::config::LoggingConfig {
        level: log_level.to_string(),
        ..config.logging.clone()
    });

    match cli.command {
        Commands::Run {
            endpoint,
            facing,
            interval_ms,
            no_auto,
            viewport_width,
            viewport_height,
        } => {
            commands::run::run(
                &config,
                endpoint,
                facing,
                interval_ms,
                no_auto,
                viewport_width,
                viewport_height,
            )
            .await
        }
        Commands::Snapshot { endpoint, facing } => {
            commands::snapshot::run(&config, endpoint, facing).await
        }
        Commands::Check { endpoint } => commands::check::run(&config, endpoint).await,
    }
}
