//! Video options and the media URLs derived from them

use crate::{config::Endpoints, Error, MediaKind, Result, VideoType};
use serde::{Deserialize, Serialize};
use url::Url;

/// Identifies one hosted video and how to reach it.
///
/// Immutable once built; hand a new value to the controller to switch media.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoOptions {
    /// Platform video or live stream identifier
    pub video_id: String,
    /// On-demand or live
    pub video_type: VideoType,
    /// Private-access token (private videos only)
    pub token: Option<String>,
    /// Hosts the URLs are derived from
    #[serde(default)]
    pub endpoints: Endpoints,
}

impl VideoOptions {
    /// Options for a public video on the default hosts
    pub fn new(video_id: impl Into<String>, video_type: VideoType) -> Self {
        Self {
            video_id: video_id.into(),
            video_type,
            token: None,
            endpoints: Endpoints::default(),
        }
    }

    /// Shorthand for a public on-demand video
    pub fn vod(video_id: impl Into<String>) -> Self {
        Self::new(video_id, VideoType::Vod)
    }

    /// Shorthand for a public live stream
    pub fn live(video_id: impl Into<String>) -> Self {
        Self::new(video_id, VideoType::Live)
    }

    /// Mark the video as private
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn is_private(&self) -> bool {
        self.token.is_some()
    }

    pub fn is_live(&self) -> bool {
        self.video_type == VideoType::Live
    }

    /// HLS manifest URL
    pub fn manifest_url(&self) -> Result<Url> {
        let raw = match (self.video_type, &self.token) {
            (VideoType::Vod, None) => format!("{}/hls/manifest.m3u8", self.vod_root()),
            (VideoType::Vod, Some(token)) => {
                format!("{}/token/{}/hls/manifest.m3u8", self.vod_root(), token)
            }
            (VideoType::Live, None) => {
                format!("{}/{}.m3u8", self.endpoints.live_base, self.video_id)
            }
            (VideoType::Live, Some(token)) => format!(
                "{}/private/{}/{}.m3u8",
                self.endpoints.live_base, token, self.video_id
            ),
        };
        parse(&raw)
    }

    /// MP4 URL; live streams have none
    pub fn progressive_url(&self) -> Result<Option<Url>> {
        let raw = match (self.video_type, &self.token) {
            (VideoType::Vod, None) => format!("{}/mp4/source.mp4", self.vod_root()),
            (VideoType::Vod, Some(token)) => {
                format!("{}/token/{}/mp4/source.mp4", self.vod_root(), token)
            }
            (VideoType::Live, _) => return Ok(None),
        };
        parse(&raw).map(Some)
    }

    /// Poster image URL
    pub fn thumbnail_url(&self) -> Result<Url> {
        let raw = match (self.video_type, &self.token) {
            (VideoType::Vod, None) => format!("{}/thumbnail.jpg", self.vod_root()),
            (VideoType::Vod, Some(token)) => {
                format!("{}/token/{}/thumbnail.jpg", self.vod_root(), token)
            }
            (VideoType::Live, None) => {
                format!("{}/{}/thumbnail.jpg", self.endpoints.live_base, self.video_id)
            }
            (VideoType::Live, Some(token)) => format!(
                "{}/private/{}/{}/thumbnail.jpg",
                self.endpoints.live_base, token, self.video_id
            ),
        };
        parse(&raw)
    }

    /// Session token exchange URL; public videos have none
    pub fn session_token_url(&self) -> Result<Option<Url>> {
        let Some(token) = &self.token else {
            return Ok(None);
        };
        let raw = match self.video_type {
            VideoType::Vod => format!("{}/token/{}/session", self.vod_root(), token),
            VideoType::Live => format!("{}/private/{}/session", self.endpoints.live_base, token),
        };
        parse(&raw).map(Some)
    }

    /// Base URL for a media kind, before any session token is appended
    pub fn url_for(&self, kind: MediaKind) -> Result<Option<Url>> {
        match kind {
            MediaKind::AdaptiveManifest => self.manifest_url().map(Some),
            MediaKind::Progressive => self.progressive_url(),
            MediaKind::Thumbnail => self.thumbnail_url().map(Some),
        }
    }

    fn vod_root(&self) -> String {
        format!("{}/{}", self.endpoints.vod_base, self.video_id)
    }
}

fn parse(raw: &str) -> Result<Url> {
    let url = Url::parse(raw).map_err(|e| Error::InvalidUrl(format!("{raw}: {e}")))?;
    if url.cannot_be_a_base() {
        return Err(Error::InvalidUrl(raw.to_string()));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_vod_urls() {
        let options = VideoOptions::vod("vi123");
        assert_eq!(
            options.manifest_url().unwrap().as_str(),
            "https://vod.api.video/vod/vi123/hls/manifest.m3u8"
        );
        assert_eq!(
            options.progressive_url().unwrap().unwrap().as_str(),
            "https://vod.api.video/vod/vi123/mp4/source.mp4"
        );
        assert_eq!(
            options.thumbnail_url().unwrap().as_str(),
            "https://vod.api.video/vod/vi123/thumbnail.jpg"
        );
        assert!(options.session_token_url().unwrap().is_none());
    }

    #[test]
    fn test_private_vod_urls() {
        let options = VideoOptions::vod("vi123").with_token("tok");
        assert_eq!(
            options.manifest_url().unwrap().as_str(),
            "https://vod.api.video/vod/vi123/token/tok/hls/manifest.m3u8"
        );
        assert_eq!(
            options.session_token_url().unwrap().unwrap().as_str(),
            "https://vod.api.video/vod/vi123/token/tok/session"
        );
    }

    #[test]
    fn test_live_urls() {
        let public = VideoOptions::live("li1");
        assert_eq!(public.manifest_url().unwrap().as_str(), "https://live.api.video/li1.m3u8");
        assert!(public.progressive_url().unwrap().is_none());

        let private = VideoOptions::live("li1").with_token("tok");
        assert_eq!(
            private.manifest_url().unwrap().as_str(),
            "https://live.api.video/private/tok/li1.m3u8"
        );
        assert_eq!(
            private.thumbnail_url().unwrap().as_str(),
            "https://live.api.video/private/tok/li1/thumbnail.jpg"
        );
        assert_eq!(
            private.session_token_url().unwrap().unwrap().as_str(),
            "https://live.api.video/private/tok/session"
        );
    }

    #[test]
    fn test_malformed_endpoint_is_invalid_url() {
        let endpoints = Endpoints::default().with_vod_base("not a url");
        let options = VideoOptions::vod("vi123").with_endpoints(endpoints);
        assert!(matches!(options.manifest_url(), Err(Error::InvalidUrl(_))));
    }
}
