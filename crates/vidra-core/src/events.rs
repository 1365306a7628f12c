//! Player lifecycle events and the listener capability set
//!
//! Listeners implement [`PlayerEventListener`], overriding only the callbacks
//! they care about. Hosts that prefer closures use [`PlayerEvents`]; async
//! hosts and tests use [`EventChannel`] to receive events as a stream.

use crate::{Error, VideoSize};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Lifecycle event emitted by the controller
#[derive(Debug, Clone)]
pub enum PlayerEvent {
    /// Media item attached, not ready yet
    Prepare,
    /// Media ready to play
    Ready,
    Play,
    Pause,
    /// Restarted from the beginning
    Replay,
    Mute,
    Unmute,
    /// End reached with looping enabled
    Loop,
    VolumeChanged { volume: f32 },
    /// Seek completed; times in seconds
    Seek { from: f64, to: f64 },
    VideoSizeChanged { size: VideoSize },
    Ended,
    Error(Arc<Error>),
}

impl PlayerEvent {
    /// Stable event name for logs and assertions
    pub fn name(&self) -> &'static str {
        match self {
            PlayerEvent::Prepare => "prepare",
            PlayerEvent::Ready => "ready",
            PlayerEvent::Play => "play",
            PlayerEvent::Pause => "pause",
            PlayerEvent::Replay => "replay",
            PlayerEvent::Mute => "mute",
            PlayerEvent::Unmute => "unmute",
            PlayerEvent::Loop => "loop",
            PlayerEvent::VolumeChanged { .. } => "volume_changed",
            PlayerEvent::Seek { .. } => "seek",
            PlayerEvent::VideoSizeChanged { .. } => "video_size_changed",
            PlayerEvent::Ended => "ended",
            PlayerEvent::Error(_) => "error",
        }
    }

    /// Invoke the listener callback matching this event
    pub fn dispatch(&self, listener: &(impl PlayerEventListener + ?Sized)) {
        match self {
            PlayerEvent::Prepare => listener.on_prepare(),
            PlayerEvent::Ready => listener.on_ready(),
            PlayerEvent::Play => listener.on_play(),
            PlayerEvent::Pause => listener.on_pause(),
            PlayerEvent::Replay => listener.on_replay(),
            PlayerEvent::Mute => listener.on_mute(),
            PlayerEvent::Unmute => listener.on_unmute(),
            PlayerEvent::Loop => listener.on_loop(),
            PlayerEvent::VolumeChanged { volume } => listener.on_volume_changed(*volume),
            PlayerEvent::Seek { from, to } => listener.on_seek(*from, *to),
            PlayerEvent::VideoSizeChanged { size } => listener.on_video_size_changed(*size),
            PlayerEvent::Ended => listener.on_end(),
            PlayerEvent::Error(error) => listener.on_error(error),
        }
    }
}

impl std::fmt::Display for PlayerEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlayerEvent::VolumeChanged { volume } => write!(f, "volume_changed({volume})"),
            PlayerEvent::Seek { from, to } => write!(f, "seek({from:.3} -> {to:.3})"),
            PlayerEvent::VideoSizeChanged { size } => write!(f, "video_size_changed({size})"),
            PlayerEvent::Error(error) => write!(f, "error({error})"),
            other => f.write_str(other.name()),
        }
    }
}

/// Callbacks a subscriber may implement. Every method defaults to a no-op.
///
/// The notifier calls [`on_event`](Self::on_event), which fans out to the
/// specific callbacks unless overridden.
#[allow(unused_variables)]
pub trait PlayerEventListener: Send + Sync {
    fn on_event(&self, event: &PlayerEvent) {
        event.dispatch(self);
    }

    fn on_prepare(&self) {}
    fn on_ready(&self) {}
    fn on_play(&self) {}
    fn on_pause(&self) {}
    fn on_replay(&self) {}
    fn on_mute(&self) {}
    fn on_unmute(&self) {}
    fn on_loop(&self) {}
    fn on_volume_changed(&self, volume: f32) {}
    fn on_seek(&self, from: f64, to: f64) {}
    fn on_video_size_changed(&self, size: VideoSize) {}
    fn on_end(&self) {}
    fn on_error(&self, error: &Error) {}
}

type Callback = Box<dyn Fn() + Send + Sync>;

/// Closure-based listener
#[derive(Default)]
pub struct PlayerEvents {
    prepare: Option<Callback>,
    ready: Option<Callback>,
    play: Option<Callback>,
    pause: Option<Callback>,
    replay: Option<Callback>,
    mute: Option<Callback>,
    unmute: Option<Callback>,
    looped: Option<Callback>,
    ended: Option<Callback>,
    volume_changed: Option<Box<dyn Fn(f32) + Send + Sync>>,
    seek: Option<Box<dyn Fn(f64, f64) + Send + Sync>>,
    video_size_changed: Option<Box<dyn Fn(VideoSize) + Send + Sync>>,
    error: Option<Box<dyn Fn(&Error) + Send + Sync>>,
}

impl PlayerEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prepare(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.prepare = Some(Box::new(f));
        self
    }

    pub fn ready(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.ready = Some(Box::new(f));
        self
    }

    pub fn play(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.play = Some(Box::new(f));
        self
    }

    pub fn pause(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.pause = Some(Box::new(f));
        self
    }

    pub fn replay(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.replay = Some(Box::new(f));
        self
    }

    pub fn mute(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.mute = Some(Box::new(f));
        self
    }

    pub fn unmute(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.unmute = Some(Box::new(f));
        self
    }

    pub fn looped(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.looped = Some(Box::new(f));
        self
    }

    pub fn ended(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.ended = Some(Box::new(f));
        self
    }

    pub fn volume_changed(mut self, f: impl Fn(f32) + Send + Sync + 'static) -> Self {
        self.volume_changed = Some(Box::new(f));
        self
    }

    pub fn seek(mut self, f: impl Fn(f64, f64) + Send + Sync + 'static) -> Self {
        self.seek = Some(Box::new(f));
        self
    }

    pub fn video_size_changed(mut self, f: impl Fn(VideoSize) + Send + Sync + 'static) -> Self {
        self.video_size_changed = Some(Box::new(f));
        self
    }

    pub fn error(mut self, f: impl Fn(&Error) + Send + Sync + 'static) -> Self {
        self.error = Some(Box::new(f));
        self
    }
}

fn call(callback: &Option<Callback>) {
    if let Some(f) = callback {
        f();
    }
}

impl PlayerEventListener for PlayerEvents {
    fn on_prepare(&self) {
        call(&self.prepare);
    }

    fn on_ready(&self) {
        call(&self.ready);
    }

    fn on_play(&self) {
        call(&self.play);
    }

    fn on_pause(&self) {
        call(&self.pause);
    }

    fn on_replay(&self) {
        call(&self.replay);
    }

    fn on_mute(&self) {
        call(&self.mute);
    }

    fn on_unmute(&self) {
        call(&self.unmute);
    }

    fn on_loop(&self) {
        call(&self.looped);
    }

    fn on_end(&self) {
        call(&self.ended);
    }

    fn on_volume_changed(&self, volume: f32) {
        if let Some(f) = &self.volume_changed {
            f(volume);
        }
    }

    fn on_seek(&self, from: f64, to: f64) {
        if let Some(f) = &self.seek {
            f(from, to);
        }
    }

    fn on_video_size_changed(&self, size: VideoSize) {
        if let Some(f) = &self.video_size_changed {
            f(size);
        }
    }

    fn on_error(&self, error: &Error) {
        if let Some(f) = &self.error {
            f(error);
        }
    }
}

impl std::fmt::Debug for PlayerEvents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayerEvents").finish_non_exhaustive()
    }
}

/// Event with the wall-clock time it was delivered
#[derive(Debug, Clone)]
pub struct RecordedEvent {
    pub at: DateTime<Utc>,
    pub event: PlayerEvent,
}

/// Listener forwarding every event into an unbounded channel
#[derive(Debug)]
pub struct EventChannel {
    tx: mpsc::UnboundedSender<RecordedEvent>,
}

impl EventChannel {
    /// Create the listener and the receiving end of its channel
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<RecordedEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Arc::new(Self { tx }), rx)
    }
}

impl PlayerEventListener for EventChannel {
    fn on_event(&self, event: &PlayerEvent) {
        // Receiver gone means nobody is listening any more
        let _ = self.tx.send(RecordedEvent {
            at: Utc::now(),
            event: event.clone(),
        });
    }
}
