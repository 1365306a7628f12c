//! Now-playing metadata and remote command routing
//!
//! The OS surface (lock screen, media keys, headset buttons) is supplied by
//! the host through [`NowPlayingCenter`]. [`NowPlaying`] decides what to
//! publish: full metadata on the first play of a media item, then only
//! elapsed time and rate updates.

use crate::artwork::Artwork;
use crate::PlaybackPhase;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;
use url::Url;

/// Metadata published on the first play of an item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NowPlayingInfo {
    pub video_id: String,
    pub is_live: bool,
    /// Seconds; zero for live streams
    pub duration: f64,
    pub elapsed: f64,
    pub rate: f32,
    pub artwork_url: Option<Url>,
}

/// Command coming from the OS remote-control surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RemoteCommand {
    Play,
    Pause,
    TogglePlayPause,
    /// Seconds to skip forward
    SkipForward(f64),
    /// Seconds to skip backward
    SkipBackward(f64),
    /// Absolute position in seconds
    ChangePosition(f64),
}

/// Host-side now-playing surface
#[allow(unused_variables)]
pub trait NowPlayingCenter: Send + Sync {
    /// Start or stop routing remote commands to the player
    fn set_commands_enabled(&self, enabled: bool);

    /// Replace the displayed metadata
    fn publish(&self, info: &NowPlayingInfo);

    /// Update playback position and rate of the displayed item
    fn update_playback(&self, elapsed: f64, rate: f32);

    fn set_artwork(&self, artwork: &Artwork) {}

    /// Remove everything displayed
    fn clear(&self);
}

/// Bookkeeping between the controller and the host's now-playing surface
#[derive(Default)]
pub struct NowPlaying {
    center: Option<Arc<dyn NowPlayingCenter>>,
    enabled: bool,
}

impl NowPlaying {
    pub fn new(center: Option<Arc<dyn NowPlayingCenter>>, enabled: bool) -> Self {
        Self { center, enabled }
    }

    pub fn set_center(&mut self, center: Arc<dyn NowPlayingCenter>) {
        center.set_commands_enabled(self.enabled);
        self.center = Some(center);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Active center, only while remote control is enabled
    fn active(&self) -> Option<&Arc<dyn NowPlayingCenter>> {
        self.center.as_ref().filter(|_| self.enabled)
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled == enabled {
            return;
        }
        self.enabled = enabled;
        debug!(enabled, "Remote control toggled");

        if let Some(center) = &self.center {
            center.set_commands_enabled(enabled);
            if !enabled {
                center.clear();
            }
        }
    }

    /// Playback started. `phase` is the phase before this play; the full
    /// metadata is built only for the first play.
    pub fn on_play(
        &self,
        phase: PlaybackPhase,
        info: impl FnOnce() -> NowPlayingInfo,
        elapsed: f64,
        rate: f32,
    ) {
        let Some(center) = self.active() else {
            return;
        };
        match phase {
            PlaybackPhase::NotYetPlayed => center.publish(&info()),
            PlaybackPhase::Played => center.update_playback(elapsed, rate),
        }
    }

    /// Position or rate changed without a new item
    pub fn on_progress(&self, elapsed: f64, rate: f32) {
        if let Some(center) = self.active() {
            center.update_playback(elapsed, rate);
        }
    }

    pub fn on_artwork(&self, artwork: &Artwork) {
        if let Some(center) = self.active() {
            center.set_artwork(artwork);
        }
    }

    /// Media replaced or removed
    pub fn reset(&self) {
        if let Some(center) = self.active() {
            center.clear();
        }
    }
}

impl std::fmt::Debug for NowPlaying {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NowPlaying")
            .field("has_center", &self.center.is_some())
            .field("enabled", &self.enabled)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        log: Mutex<Vec<String>>,
    }

    impl NowPlayingCenter for Recorder {
        fn set_commands_enabled(&self, enabled: bool) {
            self.log.lock().unwrap().push(format!("commands:{enabled}"));
        }

        fn publish(&self, info: &NowPlayingInfo) {
            self.log.lock().unwrap().push(format!("publish:{}", info.video_id));
        }

        fn update_playback(&self, elapsed: f64, _rate: f32) {
            self.log.lock().unwrap().push(format!("update:{elapsed}"));
        }

        fn clear(&self) {
            self.log.lock().unwrap().push("clear".into());
        }
    }

    fn info() -> NowPlayingInfo {
        NowPlayingInfo {
            video_id: "vi1".into(),
            is_live: false,
            duration: 60.0,
            elapsed: 0.0,
            rate: 1.0,
            artwork_url: None,
        }
    }

    #[test]
    fn test_first_play_publishes_then_updates() {
        let recorder = Arc::new(Recorder::default());
        let now_playing = NowPlaying::new(Some(recorder.clone()), true);

        now_playing.on_play(PlaybackPhase::NotYetPlayed, info, 0.0, 1.0);
        now_playing.on_play(PlaybackPhase::Played, info, 12.0, 1.0);

        assert_eq!(*recorder.log.lock().unwrap(), vec!["publish:vi1", "update:12"]);
    }

    #[test]
    fn test_disabled_publishes_nothing() {
        let recorder = Arc::new(Recorder::default());
        let mut now_playing = NowPlaying::new(Some(recorder.clone()), true);
        now_playing.set_enabled(false);
        now_playing.on_play(PlaybackPhase::NotYetPlayed, info, 0.0, 1.0);

        assert_eq!(*recorder.log.lock().unwrap(), vec!["commands:false", "clear"]);
    }
}
