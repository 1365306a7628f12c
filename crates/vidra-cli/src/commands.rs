//! CLI command implementations

use crate::output::{format_record, print_output, table, OutputFormat};
use anyhow::{bail, Context};
use serde::Serialize;
use std::path::Path;
use tabled::Tabled;
use tracing::info;
use vidra_core::{
    ArtworkLoader, HttpArtworkLoader, MediaKind, PlayerConfig, UrlResolver, VideoOptions,
};

/// One derived URL
#[derive(Debug, Serialize, Tabled)]
pub struct UrlRow {
    pub kind: String,
    pub url: String,
}

#[derive(Debug, Serialize, Tabled)]
struct ResolvedUrl {
    video_id: String,
    kind: MediaKind,
    private: bool,
    url: String,
}

#[derive(Debug, Serialize, Tabled)]
struct ArtworkSummary {
    video_id: String,
    width: u32,
    height: u32,
    #[tabled(display_with = "display_saved_to")]
    saved_to: Option<String>,
}

fn display_saved_to(saved_to: &Option<String>) -> String {
    saved_to.clone().unwrap_or_else(|| "-".to_string())
}

/// Parse a media kind name as accepted on the command line
pub fn parse_kind(kind: &str) -> anyhow::Result<MediaKind> {
    match kind.to_lowercase().as_str() {
        "hls" | "manifest" | "adaptive" => Ok(MediaKind::AdaptiveManifest),
        "mp4" | "progressive" => Ok(MediaKind::Progressive),
        "thumbnail" | "jpg" => Ok(MediaKind::Thumbnail),
        other => bail!("unknown media kind '{}' (expected hls, mp4 or thumbnail)", other),
    }
}

/// Every URL derivable from the options, without network access
pub fn derived_urls(options: &VideoOptions) -> anyhow::Result<Vec<UrlRow>> {
    let mut rows = Vec::new();
    for kind in [
        MediaKind::AdaptiveManifest,
        MediaKind::Progressive,
        MediaKind::Thumbnail,
    ] {
        let url = options.url_for(kind)?;
        rows.push(UrlRow {
            kind: kind.to_string(),
            url: url.map(String::from).unwrap_or_else(|| "-".to_string()),
        });
    }
    if let Some(session) = options.session_token_url()? {
        rows.push(UrlRow {
            kind: "session".to_string(),
            url: session.into(),
        });
    }
    Ok(rows)
}

/// Print the derived URLs
pub fn urls(options: &VideoOptions, format: &str) -> anyhow::Result<()> {
    let rows = derived_urls(options)?;

    match OutputFormat::from(format) {
        OutputFormat::Text => {
            println!("Video: {} ({})", options.video_id, options.video_type);
            for row in &rows {
                println!("  {:<10} {}", row.kind, row.url);
            }
        }
        OutputFormat::Table => println!("{}", table(&rows)),
        OutputFormat::Json => print_output(&rows, format),
    }

    Ok(())
}

/// Resolve a playable URL
pub async fn resolve(options: &VideoOptions, kind: &str, format: &str) -> anyhow::Result<()> {
    let kind = parse_kind(kind)?;
    let client = PlayerConfig::default().http_client()?;
    let resolver = UrlResolver::new(options.clone(), client);

    let url = resolver
        .resolve(kind)
        .await
        .with_context(|| format!("resolving {} for {}", kind, options.video_id))?;
    info!(%kind, "Resolved");

    match OutputFormat::from(format) {
        OutputFormat::Text => println!("{}", url),
        _ => {
            let resolved = ResolvedUrl {
                video_id: options.video_id.clone(),
                kind,
                private: options.is_private(),
                url: url.into(),
            };
            println!("{}", format_record(&resolved, format));
        }
    }

    Ok(())
}

/// Fetch, decode and optionally save the thumbnail
pub async fn artwork(
    options: &VideoOptions,
    output: Option<&Path>,
    format: &str,
) -> anyhow::Result<()> {
    let client = PlayerConfig::default().http_client()?;
    let resolver = UrlResolver::new(options.clone(), client.clone());
    let url = resolver.resolve(MediaKind::Thumbnail).await?;

    let loader = HttpArtworkLoader::new(client);
    let artwork = loader
        .load(&url)
        .await
        .with_context(|| format!("loading artwork from {}", url))?;

    if let Some(path) = output {
        artwork
            .image
            .save(path)
            .with_context(|| format!("saving artwork to {}", path.display()))?;
        info!(path = %path.display(), "Artwork saved");
    }

    let summary = ArtworkSummary {
        video_id: options.video_id.clone(),
        width: artwork.width,
        height: artwork.height,
        saved_to: output.map(|p| p.display().to_string()),
    };

    match OutputFormat::from(format) {
        OutputFormat::Text => {
            println!("Artwork: {}x{}", summary.width, summary.height);
            if let Some(path) = &summary.saved_to {
                println!("Saved to: {}", path);
            }
        }
        _ => println!("{}", format_record(&summary, format)),
    }

    Ok(())
}
