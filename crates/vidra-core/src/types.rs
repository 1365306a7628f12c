//! Core types for Vidra

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a controller instance, used in tracing fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of hosted video
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoType {
    #[default]
    Vod,
    Live,
}

impl std::fmt::Display for VideoType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VideoType::Vod => write!(f, "vod"),
            VideoType::Live => write!(f, "live"),
        }
    }
}

/// Which media URL to resolve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    /// Segmented HLS manifest
    AdaptiveManifest,
    /// Single-file MP4
    Progressive,
    /// Poster image
    Thumbnail,
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaKind::AdaptiveManifest => write!(f, "hls"),
            MediaKind::Progressive => write!(f, "mp4"),
            MediaKind::Thumbnail => write!(f, "thumbnail"),
        }
    }
}

/// Presentation size of the video track
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct VideoSize {
    pub width: f64,
    pub height: f64,
}

impl VideoSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Width over height, if the size is known
    pub fn aspect_ratio(&self) -> Option<f64> {
        (self.height > 0.0).then(|| self.width / self.height)
    }
}

impl std::fmt::Display for VideoSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Readiness of the media item attached to the native player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ItemStatus {
    #[default]
    Unknown,
    ReadyToPlay,
    Failed,
}

/// Transport state reported by the native player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TimeControlStatus {
    #[default]
    Paused,
    WaitingToPlay,
    Playing,
}

impl std::fmt::Display for TimeControlStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeControlStatus::Paused => write!(f, "paused"),
            TimeControlStatus::WaitingToPlay => write!(f, "waiting"),
            TimeControlStatus::Playing => write!(f, "playing"),
        }
    }
}

/// Identity of one media item attached to the native player.
///
/// A fresh id is minted for every attach, so signals carrying an older id
/// belong to a replaced item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(pub u64);

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "item#{}", self.0)
    }
}

/// Handle returned by periodic time observer registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(pub u64);

/// Whether the current media has been played since it was loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PlaybackPhase {
    #[default]
    NotYetPlayed,
    Played,
}

/// A subtitle track exposed by the current media item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtitleTrack {
    /// BCP-47 locale identifier (e.g., "en", "fr-CA")
    pub locale: String,
    /// Human-readable label
    pub label: String,
}

impl SubtitleTrack {
    pub fn new(locale: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
            label: label.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aspect_ratio() {
        assert_eq!(VideoSize::new(1920.0, 1080.0).aspect_ratio(), Some(1920.0 / 1080.0));
        assert_eq!(VideoSize::default().aspect_ratio(), None);
    }

    #[test]
    fn test_video_type_serde() {
        assert_eq!(serde_json::to_string(&VideoType::Live).unwrap(), "\"live\"");
        let parsed: VideoType = serde_json::from_str("\"vod\"").unwrap();
        assert_eq!(parsed, VideoType::Vod);
    }
}
