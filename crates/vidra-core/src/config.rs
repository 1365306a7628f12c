//! Player and endpoint configuration

use serde::{Deserialize, Serialize};

/// Default host serving on-demand videos
pub const DEFAULT_VOD_BASE: &str = "https://vod.api.video/vod";
/// Default host serving live streams
pub const DEFAULT_LIVE_BASE: &str = "https://live.api.video";
/// Query parameter carrying the session token on private media URLs
pub const DEFAULT_TOKEN_PARAM: &str = "avh";

/// Base URLs the media URLs are derived from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
    /// Base for on-demand videos, without trailing slash
    pub vod_base: String,
    /// Base for live streams, without trailing slash
    pub live_base: String,
    /// Name of the session token query parameter
    pub token_param: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            vod_base: DEFAULT_VOD_BASE.to_string(),
            live_base: DEFAULT_LIVE_BASE.to_string(),
            token_param: DEFAULT_TOKEN_PARAM.to_string(),
        }
    }
}

impl Endpoints {
    /// Point on-demand URLs at another host
    pub fn with_vod_base(mut self, base: impl Into<String>) -> Self {
        self.vod_base = trim_base(base.into());
        self
    }

    /// Point live URLs at another host
    pub fn with_live_base(mut self, base: impl Into<String>) -> Self {
        self.live_base = trim_base(base.into());
        self
    }

    /// Use both bases under a single host (handy for local mocks)
    pub fn single_host(base: impl Into<String>) -> Self {
        let base = trim_base(base.into());
        Self {
            vod_base: format!("{}/vod", base),
            live_base: base,
            token_param: DEFAULT_TOKEN_PARAM.to_string(),
        }
    }
}

fn trim_base(base: String) -> String {
    base.trim_end_matches('/').to_string()
}

/// Player configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Start playback as soon as the media is ready
    pub autoplay: bool,
    /// Restart playback when the end is reached
    pub looping: bool,
    /// Start muted
    pub muted: bool,
    /// Route hardware/lock-screen remote commands into the player
    pub enable_remote_control: bool,
    /// Request timeout for the session token exchange, in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            autoplay: false,
            looping: false,
            muted: false,
            enable_remote_control: false,
            request_timeout_ms: 10000,
        }
    }
}

impl PlayerConfig {
    pub fn with_autoplay(mut self, autoplay: bool) -> Self {
        self.autoplay = autoplay;
        self
    }

    pub fn with_looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    pub fn with_muted(mut self, muted: bool) -> Self {
        self.muted = muted;
        self
    }

    pub fn with_remote_control(mut self, enabled: bool) -> Self {
        self.enable_remote_control = enabled;
        self
    }

    pub fn with_request_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.request_timeout_ms = timeout_ms;
        self
    }

    /// Build the HTTP client used for token exchange and artwork
    pub fn http_client(&self) -> crate::Result<reqwest::Client> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(self.request_timeout_ms))
            .build()?;
        Ok(client)
    }
}
