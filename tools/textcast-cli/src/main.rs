//! Textcast CLI: prepare a text overlay for a video and export one video per
//! text segment.
//!
//! Usage:
//!   textcast init <VIDEO>        Create a project for a video
//!   textcast segments <PATH>     Preview the segments an export would produce
//!   textcast info <PATH>         Show and validate a project
//!   textcast export <PATH>       Export one video per segment
//!   textcast check               Check that ffmpeg and ffprobe are available

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use textcast_common::config::{AppConfig, TextPolicy};

mod commands;

#[derive(Parser)]
#[command(
    name = "textcast",
    about = "Burn text overlays into videos, one output per text segment",
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
    /// Create a project for a video
    Init {
        /// Source video
        video: PathBuf,

        /// Project name (defaults to the video's file stem)
        #[arg(short, long)]
        name: Option<String>,

        /// Project file or directory to write
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        #[command(flatten)]
        overlay: commands::OverlayArgs,
    },

    /// Change the overlay of an existing project
    Edit {
        /// Project file or directory
        path: PathBuf,

        #[command(flatten)]
        overlay: commands::OverlayArgs,
    },

    /// Preview the segments an export would produce
    Segments {
        /// Project file or directory
        path: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show and validate a project
    Info {
        /// Project file or directory
        path: PathBuf,
    },

    /// Export one video per segment
    Export {
        /// Project file or directory
        path: PathBuf,

        /// Directory to deliver videos into (defaults to the configured downloads dir)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// How to treat filter-special characters in the text: escape|reject
        #[arg(long)]
        text_policy: Option<String>,

        /// Write a JSON export report to this path
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Check that ffmpeg and ffprobe are available
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load();
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    textcast_common::logging::init_logging(&config.logging);

    match cli.command {
        Commands::Init {
            video,
            name,
            output,
            overlay,
        } => commands::init::run(&config, video, name, output, overlay).await,
        Commands::Edit { path, overlay } => commands::edit::run(path, overlay),
        Commands::Segments { path, json } => commands::segments::run(path, json),
        Commands::Info { path } => commands::info::run(path),
        Commands::Export {
            path,
            output,
            text_policy,
            report,
        } => {
            if let Some(policy) = text_policy {
                config.export.text_policy = parse_policy(&policy)?;
            }
            commands::export::run(&config, path, output, report).await
        }
        Commands::Check => commands::check::run(&config).await,
    }
}

fn parse_policy(value: &str) -> anyhow::Result<TextPolicy> {
    match value {
        "escape" => Ok(TextPolicy::Escape),
        "reject" => Ok(TextPolicy::Reject),
        _ => Err(anyhow::anyhow!(
            "Unknown text policy: {value}. Use: escape, reject"
        )),
    }
}
