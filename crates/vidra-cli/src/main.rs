//! Vidra CLI - Headless companion for the player SDK
//!
//! Features:
//! - Media URL derivation for on-demand and live videos
//! - Session token exchange for private videos
//! - Thumbnail artwork fetch and decode

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use vidra_core::{Endpoints, VideoOptions, VideoType};

mod commands;
mod output;

/// Vidra CLI - Hosted video URL toolkit
#[derive(Parser)]
#[command(name = "vidra-cli")]
#[command(author = "Purple Squirrel Media")]
#[command(version)]
#[command(about = "Resolve hosted video URLs and artwork", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Output format (text, json, table)
    #[arg(short, long, default_value = "text")]
    format: String,

    /// Base URL for on-demand videos
    #[arg(long, global = true)]
    vod_base: Option<String>,

    /// Base URL for live streams
    #[arg(long, global = true)]
    live_base: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Which video to work on
#[derive(Args)]
struct VideoArgs {
    /// Video or live stream identifier
    video_id: String,

    /// The identifier is a live stream
    #[arg(long)]
    live: bool,

    /// Private-access token
    #[arg(short, long)]
    token: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show every URL derived for a video
    Urls {
        #[command(flatten)]
        video: VideoArgs,
    },

    /// Resolve a playable URL, exchanging a session token if private
    Resolve {
        #[command(flatten)]
        video: VideoArgs,

        /// Media kind (hls, mp4, thumbnail)
        #[arg(short, long, default_value = "hls")]
        kind: String,
    },

    /// Fetch and decode the thumbnail
    Artwork {
        #[command(flatten)]
        video: VideoArgs,

        /// Save the decoded image to a file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

impl Cli {
    fn endpoints(&self) -> Endpoints {
        let mut endpoints = Endpoints::default();
        if let Some(base) = &self.vod_base {
            endpoints = endpoints.with_vod_base(base.as_str());
        }
        if let Some(base) = &self.live_base {
            endpoints = endpoints.with_live_base(base.as_str());
        }
        endpoints
    }
}

impl VideoArgs {
    fn options(&self, endpoints: Endpoints) -> VideoOptions {
        let video_type = if self.live {
            VideoType::Live
        } else {
            VideoType::Vod
        };
        let options = VideoOptions::new(&self.video_id, video_type).with_endpoints(endpoints);
        match &self.token {
            Some(token) => options.with_token(token),
            None => options,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_writer(std::io::stderr)
        .init();

    vidra_core::init();
    let endpoints = cli.endpoints();

    match &cli.command {
        Commands::Urls { video } => {
            commands::urls(&video.options(endpoints), &cli.format)?;
        }
        Commands::Resolve { video, kind } => {
            commands::resolve(&video.options(endpoints), kind, &cli.format).await?;
        }
        Commands::Artwork { video, output } => {
            commands::artwork(&video.options(endpoints), output.as_deref(), &cli.format).await?;
        }
    }

    Ok(())
}
