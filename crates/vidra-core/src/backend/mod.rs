//! Native media player abstraction
//!
//! The host platform supplies the actual player through [`MediaBackend`].
//! State changes come back as typed [`NativeSignal`]s pushed into a
//! [`SignalSink`]; the controller drains them on its own execution context,
//! so a backend may report from any thread.

#[cfg(any(test, feature = "test-utils"))]
mod scripted;

#[cfg(any(test, feature = "test-utils"))]
pub use scripted::{BackendCall, ScriptedBackend};

use crate::{
    ItemId, ItemStatus, MediaKind, ObserverId, SubtitleTrack, TimeControlStatus, VideoSize,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::trace;
use url::Url;

/// State change reported by the native player
#[derive(Debug, Clone, PartialEq)]
pub enum NativeSignal {
    /// Item readiness changed
    ItemStatus { item: ItemId, status: ItemStatus },
    /// Transport state changed
    TimeControl { item: ItemId, status: TimeControlStatus },
    /// Playback reached the end of the item
    PlayedToEnd { item: ItemId },
    /// Presentation size of the video track changed
    PresentationSize { item: ItemId, size: VideoSize },
    /// A seek requested through [`MediaBackend::seek`] finished.
    /// `finished` is false when a newer seek interrupted it.
    SeekCompleted { item: ItemId, finished: bool },
}

impl NativeSignal {
    /// Item this signal concerns
    pub fn item(&self) -> ItemId {
        match self {
            NativeSignal::ItemStatus { item, .. }
            | NativeSignal::TimeControl { item, .. }
            | NativeSignal::PlayedToEnd { item }
            | NativeSignal::PresentationSize { item, .. }
            | NativeSignal::SeekCompleted { item, .. } => *item,
        }
    }
}

/// Everything the controller reacts to, in arrival order
#[derive(Debug)]
pub(crate) enum Signal {
    Native(NativeSignal),
    /// URL resolution finished for the given options generation
    Resolved {
        generation: u64,
        kind: MediaKind,
        result: crate::Result<Url>,
    },
    /// Artwork fetch finished for the given options generation
    Artwork {
        generation: u64,
        result: crate::Result<crate::artwork::Artwork>,
    },
}

/// Sending half of the controller's signal queue handed to backends
#[derive(Debug, Clone)]
pub struct SignalSink {
    tx: mpsc::UnboundedSender<Signal>,
}

impl SignalSink {
    pub(crate) fn new(tx: mpsc::UnboundedSender<Signal>) -> Self {
        Self { tx }
    }

    /// Queue a native signal. Safe to call from any thread; signals sent
    /// after the controller is gone are dropped.
    pub fn send(&self, signal: NativeSignal) {
        trace!(?signal, "Native signal");
        let _ = self.tx.send(Signal::Native(signal));
    }
}

/// Capabilities of the host's native media player.
///
/// Implementations must not call back into the controller synchronously;
/// every notification goes through the [`SignalSink`] given to
/// [`replace_item`](Self::replace_item).
pub trait MediaBackend: Send + Sync + 'static {
    /// Replace the current item with a new one loading from `url`.
    /// Signals about it must carry `item`.
    fn replace_item(&self, item: ItemId, url: &Url, sink: SignalSink);

    /// Detach the current item and stop reporting about it
    fn clear_item(&self);

    fn play(&self);

    fn pause(&self);

    /// Seek to an absolute position in seconds. Out of range targets are
    /// clamped by the backend. Completion is reported with
    /// [`NativeSignal::SeekCompleted`].
    fn seek(&self, to: f64);

    /// Current position in seconds
    fn current_time(&self) -> f64;

    /// Item duration in seconds, if known
    fn duration(&self) -> Option<f64>;

    fn time_control_status(&self) -> TimeControlStatus;

    fn rate(&self) -> f32;

    fn set_rate(&self, rate: f32);

    fn volume(&self) -> f32;

    fn set_volume(&self, volume: f32);

    fn is_muted(&self) -> bool;

    fn set_muted(&self, muted: bool);

    fn presentation_size(&self) -> Option<VideoSize>;

    /// Subtitle tracks of the current item
    fn subtitle_tracks(&self) -> Vec<SubtitleTrack>;

    fn selected_subtitle(&self) -> Option<SubtitleTrack>;

    /// Select the track with the given locale, or none
    fn select_subtitle(&self, locale: Option<&str>);

    /// Call `callback` with the current position every `interval` while playing.
    /// The registration lives until [`remove_time_observer`](Self::remove_time_observer).
    fn add_periodic_time_observer(
        &self,
        interval: Duration,
        callback: Box<dyn Fn(f64) + Send + Sync + 'static>,
    ) -> ObserverId;

    fn remove_time_observer(&self, id: ObserverId);
}

/// Full-screen presentation surface supplied by the host
pub trait FullScreenPresenter<B: MediaBackend> {
    /// Take over presentation of the player
    fn present(&self, player: Arc<B>);
}
