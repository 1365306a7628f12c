//! Playback State Controller
//!
//! Owns the native player and turns its continuous, ambiguous state reports
//! into a discrete, deduplicated stream of lifecycle events.
//!
//! All state lives on the host's main context: public API calls mutate it
//! directly, while native signals and network completions are queued on the
//! signal bus and applied when the host calls [`PlayerController::process_next`]
//! or [`PlayerController::process_pending`].

use crate::{
    artwork::ArtworkLoader,
    backend::{FullScreenPresenter, MediaBackend, NativeSignal, Signal, SignalSink},
    config::PlayerConfig,
    events::{PlayerEvent, PlayerEventListener},
    notifier::EventNotifier,
    now_playing::{NowPlaying, NowPlayingCenter, NowPlayingInfo, RemoteCommand},
    options::VideoOptions,
    resolver::{append_token, UrlResolver},
    types::*,
    Error, Result,
};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, trace, warn};
use url::Url;

/// Media item currently attached to the backend
#[derive(Debug, Clone)]
struct LoadedItem {
    item: ItemId,
    kind: MediaKind,
    status: ItemStatus,
    url: Url,
}

/// Last transport state reported to listeners
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transport {
    Playing,
    Paused,
}

#[derive(Debug, Clone, Copy)]
enum SeekKind {
    Seek { from: f64 },
    Replay,
}

/// Seek issued by the controller and not completed yet
#[derive(Debug, Clone, Copy)]
struct PendingSeek {
    kind: SeekKind,
    /// Transport was playing when the seek was issued
    was_playing: bool,
    /// The backend paused while the seek was in flight
    interrupted: bool,
    /// The backend resumed before reporting completion
    resumed: bool,
}

/// State reset on every options assignment
#[derive(Debug, Default)]
struct PlaybackSession {
    phase: PlaybackPhase,
    prepared: bool,
    fallback_attempted: bool,
    pending_seek: Option<PendingSeek>,
    suppress_next_play: bool,
    last_transport: Option<Transport>,
    subtitles: Vec<SubtitleTrack>,
}

/// Playback state controller driving one native player
pub struct PlayerController<B: MediaBackend> {
    /// Unique controller ID
    id: SessionId,
    config: PlayerConfig,
    backend: Arc<B>,
    client: Client,
    notifier: Arc<EventNotifier>,
    signal_tx: mpsc::UnboundedSender<Signal>,
    signal_rx: mpsc::UnboundedReceiver<Signal>,
    options: Option<VideoOptions>,
    resolver: Option<Arc<UrlResolver>>,
    /// Bumped on every options assignment; tags async completions
    generation: u64,
    next_item: u64,
    load: Option<LoadedItem>,
    session: PlaybackSession,
    speed_rate: f32,
    looping: bool,
    autoplay: bool,
    now_playing: NowPlaying,
    artwork_loader: Option<Arc<dyn ArtworkLoader>>,
}

impl<B: MediaBackend> PlayerController<B> {
    /// Create a controller around `backend` and start loading `options`.
    ///
    /// Must be called from within a tokio runtime; URL resolution runs on
    /// spawned tasks.
    pub fn new(backend: Arc<B>, options: Option<VideoOptions>, config: PlayerConfig) -> Result<Self> {
        let client = config.http_client()?;
        Ok(Self::with_client(backend, options, config, client))
    }

    /// Like [`new`](Self::new) with a caller-supplied HTTP client
    pub fn with_client(
        backend: Arc<B>,
        options: Option<VideoOptions>,
        config: PlayerConfig,
        client: Client,
    ) -> Self {
        let (signal_tx, signal_rx) = mpsc::unbounded_channel();

        // Initial mute is a setting, not a user action
        backend.set_muted(config.muted);

        let mut controller = Self {
            id: SessionId::new(),
            backend,
            client,
            notifier: Arc::new(EventNotifier::new()),
            signal_tx,
            signal_rx,
            options: None,
            resolver: None,
            generation: 0,
            next_item: 0,
            load: None,
            session: PlaybackSession::default(),
            speed_rate: 1.0,
            looping: config.looping,
            autoplay: config.autoplay,
            now_playing: NowPlaying::new(None, config.enable_remote_control),
            artwork_loader: None,
            config,
        };

        info!(session_id = %controller.id, "Player controller created");
        controller.set_video_options(options);
        controller
    }

    /// Get controller ID
    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    /// Options of the current media, if any
    pub fn video_options(&self) -> Option<&VideoOptions> {
        self.options.as_ref()
    }

    /// The native player. Hosts may render it but must not replace its item.
    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }

    pub fn notifier(&self) -> &Arc<EventNotifier> {
        &self.notifier
    }

    /// First-play bookkeeping for the current media
    pub fn playback_phase(&self) -> PlaybackPhase {
        self.session.phase
    }

    /// URL of the attached media item
    pub fn current_url(&self) -> Option<&Url> {
        self.load.as_ref().map(|load| &load.url)
    }

    // ------------------------------------------------------------------
    // Listeners
    // ------------------------------------------------------------------

    pub fn add_listener<L>(&self, listener: &Arc<L>)
    where
        L: PlayerEventListener + ?Sized + 'static,
    {
        self.notifier.add(listener);
    }

    pub fn remove_listener<L>(&self, listener: &Arc<L>)
    where
        L: PlayerEventListener + ?Sized + 'static,
    {
        self.notifier.remove(listener);
    }

    pub fn add_listeners<'a, L>(&self, listeners: impl IntoIterator<Item = &'a Arc<L>>)
    where
        L: PlayerEventListener + ?Sized + 'static,
    {
        self.notifier.add_all(listeners);
    }

    pub fn remove_listeners<'a, L>(&self, listeners: impl IntoIterator<Item = &'a Arc<L>>)
    where
        L: PlayerEventListener + ?Sized + 'static,
    {
        self.notifier.remove_all(listeners);
    }

    fn emit(&self, event: PlayerEvent) {
        debug!(session_id = %self.id, event = %event, "Player event");
        self.notifier.notify(&event);
    }

    // ------------------------------------------------------------------
    // Media loading
    // ------------------------------------------------------------------

    /// Switch to new media, or unload with `None`.
    ///
    /// Tears down the current item and starts resolving the adaptive
    /// manifest of the new options. Completions belonging to earlier
    /// options are ignored.
    #[instrument(skip(self, options), fields(session_id = %self.id))]
    pub fn set_video_options(&mut self, options: Option<VideoOptions>) {
        if self.load.take().is_some() {
            self.backend.clear_item();
        }
        self.now_playing.reset();

        self.generation += 1;
        self.session = PlaybackSession::default();
        self.resolver = None;
        self.options = options.clone();

        let Some(options) = options else {
            info!("Video options cleared");
            return;
        };

        info!(
            video_id = %options.video_id,
            video_type = ?options.video_type,
            private = options.is_private(),
            "Loading video"
        );

        self.resolver = Some(Arc::new(UrlResolver::new(options, self.client.clone())));
        self.spawn_resolve(MediaKind::AdaptiveManifest);
    }

    fn spawn_resolve(&self, kind: MediaKind) {
        let Some(resolver) = self.resolver.clone() else {
            return;
        };
        let tx = self.signal_tx.clone();
        let generation = self.generation;

        tokio::spawn(async move {
            let result = resolver.resolve(kind).await;
            let _ = tx.send(Signal::Resolved {
                generation,
                kind,
                result,
            });
        });
    }

    fn spawn_artwork(&self) {
        if !self.now_playing.is_enabled() {
            return;
        }
        let (Some(loader), Some(resolver)) = (self.artwork_loader.clone(), self.resolver.clone())
        else {
            return;
        };
        let tx = self.signal_tx.clone();
        let generation = self.generation;

        tokio::spawn(async move {
            let result = match resolver.resolve(MediaKind::Thumbnail).await {
                Ok(url) => loader.load(&url).await,
                Err(e) => Err(e),
            };
            let _ = tx.send(Signal::Artwork { generation, result });
        });
    }

    fn attach(&mut self, kind: MediaKind, url: Url) {
        self.next_item += 1;
        let item = ItemId(self.next_item);

        info!(session_id = %self.id, %item, %kind, url = %url, "Attaching media item");
        self.load = Some(LoadedItem {
            item,
            kind,
            status: ItemStatus::Unknown,
            url: url.clone(),
        });
        self.backend
            .replace_item(item, &url, SignalSink::new(self.signal_tx.clone()));

        // A fallback attach continues the same preparation
        if !self.session.prepared {
            self.session.prepared = true;
            self.emit(PlayerEvent::Prepare);
        }
    }

    fn fail(&self, error: Error) {
        warn!(session_id = %self.id, error = %error, "Playback error");
        self.emit(PlayerEvent::Error(Arc::new(error)));
    }

    // ------------------------------------------------------------------
    // Signal processing
    // ------------------------------------------------------------------

    /// Wait for the next queued signal and apply it.
    ///
    /// The controller keeps a sender of its own, so this only returns false
    /// after [`shutdown`](Self::shutdown) once the queue is drained. The wait
    /// is cancel safe and may sit inside `tokio::select!`.
    pub async fn process_next(&mut self) -> bool {
        match self.signal_rx.recv().await {
            Some(signal) => {
                self.handle_signal(signal);
                true
            }
            None => false,
        }
    }

    /// Detach the current video and close the signal bus.
    ///
    /// Work still in flight is discarded and later signals are refused.
    /// The controller cannot be restarted afterwards.
    pub fn shutdown(&mut self) {
        info!(session_id = %self.id, "Shutting down");
        self.set_video_options(None);
        self.signal_rx.close();
    }

    /// Apply every signal already queued without waiting.
    /// Returns the number of signals processed.
    pub fn process_pending(&mut self) -> usize {
        let mut processed = 0;
        while let Ok(signal) = self.signal_rx.try_recv() {
            self.handle_signal(signal);
            processed += 1;
        }
        processed
    }

    fn handle_signal(&mut self, signal: Signal) {
        match signal {
            Signal::Native(native) => self.handle_native(native),
            Signal::Resolved {
                generation,
                kind,
                result,
            } => {
                if generation != self.generation {
                    debug!(generation, current = self.generation, "Stale resolution ignored");
                    return;
                }
                match result {
                    Ok(url) => self.attach(kind, url),
                    Err(error) => self.fail(error),
                }
            }
            Signal::Artwork { generation, result } => {
                if generation != self.generation {
                    return;
                }
                match result {
                    Ok(artwork) => self.now_playing.on_artwork(&artwork),
                    Err(error @ Error::ThumbnailDecodeFailed(_)) => self.fail(error),
                    Err(error) => warn!(error = %error, "Artwork unavailable"),
                }
            }
        }
    }

    fn handle_native(&mut self, signal: NativeSignal) {
        let current = self.load.as_ref().map(|load| load.item);
        if current != Some(signal.item()) {
            debug!(item = %signal.item(), ?current, "Signal for replaced item ignored");
            return;
        }
        trace!(?signal, "Handling native signal");

        match signal {
            NativeSignal::ItemStatus { status, .. } => self.on_item_status(status),
            NativeSignal::TimeControl { status, .. } => match status {
                TimeControlStatus::Paused => self.on_paused(),
                TimeControlStatus::Playing => self.on_playing(),
                TimeControlStatus::WaitingToPlay => {}
            },
            NativeSignal::PlayedToEnd { .. } => self.on_played_to_end(),
            NativeSignal::PresentationSize { size, .. } => {
                self.emit(PlayerEvent::VideoSizeChanged { size })
            }
            NativeSignal::SeekCompleted { finished, .. } => {
                if finished {
                    self.on_seek_completed();
                }
            }
        }
    }

    fn on_item_status(&mut self, status: ItemStatus) {
        let Some(load) = self.load.as_mut() else {
            return;
        };
        if load.status == status {
            return;
        }
        load.status = status;
        let kind = load.kind;

        match status {
            ItemStatus::Unknown => {}
            ItemStatus::ReadyToPlay => {
                self.session.subtitles = self.backend.subtitle_tracks();
                info!(session_id = %self.id, %kind, "Media ready");
                self.emit(PlayerEvent::Ready);
                if self.autoplay {
                    self.play();
                }
            }
            ItemStatus::Failed => {
                if kind == MediaKind::AdaptiveManifest
                    && !self.session.fallback_attempted
                    && self.has_progressive_source()
                {
                    warn!(session_id = %self.id, "Adaptive stream failed, falling back to progressive");
                    self.session.fallback_attempted = true;
                    self.spawn_resolve(MediaKind::Progressive);
                } else {
                    self.fail(Error::PlaybackFailed);
                }
            }
        }
    }

    fn has_progressive_source(&self) -> bool {
        self.options
            .as_ref()
            .is_some_and(|options| matches!(options.progressive_url(), Ok(Some(_))))
    }

    fn on_paused(&mut self) {
        if let Some(seek) = self.session.pending_seek.as_mut() {
            seek.interrupted = true;
            return;
        }
        if self.is_at_end() {
            self.session.last_transport = Some(Transport::Paused);
            return;
        }
        if self.session.last_transport == Some(Transport::Paused) {
            return;
        }

        self.session.last_transport = Some(Transport::Paused);
        self.emit(PlayerEvent::Pause);
        self.now_playing.on_progress(self.current_time(), 0.0);
    }

    fn on_playing(&mut self) {
        // A resume that lands before completion belongs to the seek.
        let during_seek = match self.session.pending_seek.as_mut() {
            Some(seek) => {
                seek.resumed = true;
                true
            }
            None => false,
        };
        let suppressed = std::mem::take(&mut self.session.suppress_next_play) || during_seek;
        if !suppressed && self.session.last_transport == Some(Transport::Playing) {
            return;
        }
        self.session.last_transport = Some(Transport::Playing);

        let phase = self.session.phase;
        self.session.phase = PlaybackPhase::Played;

        if !suppressed {
            self.emit(PlayerEvent::Play);
        }

        self.now_playing.on_play(
            phase,
            || self.now_playing_info(),
            self.current_time(),
            self.speed_rate,
        );
        if phase == PlaybackPhase::NotYetPlayed {
            self.spawn_artwork();
        }
    }

    fn on_played_to_end(&mut self) {
        self.emit(PlayerEvent::Ended);
        if self.looping {
            self.replay();
            self.emit(PlayerEvent::Loop);
        }
    }

    fn on_seek_completed(&mut self) {
        let Some(pending) = self.session.pending_seek.take() else {
            return;
        };

        match pending.kind {
            SeekKind::Seek { from } => {
                self.session.suppress_next_play =
                    pending.was_playing && pending.interrupted && !pending.resumed;
                let to = self.current_time();
                self.emit(PlayerEvent::Seek { from, to });
                self.now_playing.on_progress(to, self.backend.rate());
            }
            SeekKind::Replay => {
                self.session.suppress_next_play =
                    (pending.interrupted && !pending.resumed) || !self.is_playing();
                self.start_playback();
                self.emit(PlayerEvent::Replay);
            }
        }
    }

    fn now_playing_info(&self) -> NowPlayingInfo {
        let artwork_url = self.options.as_ref().and_then(|options| {
            let url = options.thumbnail_url().ok()?;
            let token = self.resolver.as_ref().and_then(|r| r.cached_session_token());
            Some(match token {
                Some(token) => append_token(url, &options.endpoints.token_param, token),
                None => url,
            })
        });

        NowPlayingInfo {
            video_id: self
                .options
                .as_ref()
                .map(|options| options.video_id.clone())
                .unwrap_or_default(),
            is_live: self.is_live(),
            duration: self.duration(),
            elapsed: self.current_time(),
            rate: self.speed_rate,
            artwork_url,
        }
    }

    // ------------------------------------------------------------------
    // Transport
    // ------------------------------------------------------------------

    fn start_playback(&self) {
        self.backend.play();
        if self.speed_rate != 1.0 {
            self.backend.set_rate(self.speed_rate);
        }
    }

    /// Request playback
    pub fn play(&mut self) {
        debug!(session_id = %self.id, "play");
        self.start_playback();
    }

    /// Request pause
    pub fn pause(&mut self) {
        debug!(session_id = %self.id, "pause");
        self.backend.pause();
    }

    /// Seek to zero and play. A `replay` event follows once the seek
    /// completes, whatever the transport state was.
    pub fn replay(&mut self) {
        if self.load.is_none() {
            return;
        }
        self.session.pending_seek = Some(PendingSeek {
            kind: SeekKind::Replay,
            was_playing: self.is_playing(),
            interrupted: false,
            resumed: false,
        });
        self.backend.seek(0.0);
    }

    /// Seek to an absolute position in seconds. Out of range targets are
    /// passed through; the backend clamps them.
    pub fn seek(&mut self, to: f64) {
        if self.load.is_none() {
            return;
        }
        let from = self.current_time();
        debug!(session_id = %self.id, from, to, "seek");
        self.session.pending_seek = Some(PendingSeek {
            kind: SeekKind::Seek { from },
            was_playing: self.is_playing(),
            interrupted: false,
            resumed: false,
        });
        self.backend.seek(to);
    }

    /// Seek relative to the current position
    pub fn seek_by(&mut self, offset: f64) {
        let to = self.current_time() + offset;
        self.seek(to);
    }

    // ------------------------------------------------------------------
    // Properties
    // ------------------------------------------------------------------

    pub fn is_live(&self) -> bool {
        self.options.as_ref().is_some_and(VideoOptions::is_live)
    }

    pub fn is_vod(&self) -> bool {
        self.options.as_ref().is_some_and(|options| !options.is_live())
    }

    pub fn is_playing(&self) -> bool {
        self.backend.time_control_status() == TimeControlStatus::Playing
    }

    /// Duration in seconds; zero while unknown or for live streams
    pub fn duration(&self) -> f64 {
        self.backend
            .duration()
            .filter(|d| d.is_finite())
            .unwrap_or(0.0)
    }

    /// Current position in seconds
    pub fn current_time(&self) -> f64 {
        self.backend.current_time()
    }

    /// Position and duration are equal once rounded to whole seconds
    pub fn is_at_end(&self) -> bool {
        let duration = self.duration();
        duration > 0.0 && duration.round() == self.current_time().round()
    }

    pub fn video_size(&self) -> Option<VideoSize> {
        self.backend.presentation_size()
    }

    pub fn speed_rate(&self) -> f32 {
        self.speed_rate
    }

    /// Set the playback rate, applied now if playing and on every play
    pub fn set_speed_rate(&mut self, rate: f32) {
        self.speed_rate = rate;
        if self.is_playing() {
            self.backend.set_rate(rate);
        }
        self.now_playing.on_progress(self.current_time(), rate);
    }

    pub fn is_muted(&self) -> bool {
        self.backend.is_muted()
    }

    /// Always emits `mute` or `unmute`, even when unchanged
    pub fn set_muted(&mut self, muted: bool) {
        self.backend.set_muted(muted);
        self.emit(if muted {
            PlayerEvent::Mute
        } else {
            PlayerEvent::Unmute
        });
    }

    pub fn volume(&self) -> f32 {
        self.backend.volume()
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.backend.set_volume(volume);
        self.emit(PlayerEvent::VolumeChanged { volume });
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    pub fn is_autoplay(&self) -> bool {
        self.autoplay
    }

    pub fn set_autoplay(&mut self, autoplay: bool) {
        self.autoplay = autoplay;
    }

    // ------------------------------------------------------------------
    // Subtitles
    // ------------------------------------------------------------------

    pub fn has_subtitles(&self) -> bool {
        !self.session.subtitles.is_empty()
    }

    pub fn subtitle_locales(&self) -> Vec<String> {
        self.session
            .subtitles
            .iter()
            .map(|track| track.locale.clone())
            .collect()
    }

    pub fn current_subtitle_locale(&self) -> Option<String> {
        self.backend.selected_subtitle().map(|track| track.locale)
    }

    /// Select the subtitle track for `locale`; no-op without a matching track
    pub fn set_current_subtitle_locale(&mut self, locale: &str) {
        if !self.session.subtitles.iter().any(|t| t.locale == locale) {
            debug!(locale, "No subtitle track for locale");
            return;
        }
        self.backend.select_subtitle(Some(locale));
    }

    pub fn hide_subtitle(&mut self) {
        self.backend.select_subtitle(None);
    }

    // ------------------------------------------------------------------
    // Presentation and OS integration
    // ------------------------------------------------------------------

    /// Hand the native player to a host full-screen surface
    pub fn go_to_full_screen(&self, presenter: &impl FullScreenPresenter<B>) {
        presenter.present(self.backend.clone());
    }

    /// Register a periodic position callback. The caller must remove it
    /// with [`remove_time_observer`](Self::remove_time_observer).
    pub fn add_periodic_time_observer(
        &self,
        interval: Duration,
        callback: impl Fn(f64) + Send + Sync + 'static,
    ) -> ObserverId {
        self.backend
            .add_periodic_time_observer(interval, Box::new(callback))
    }

    pub fn remove_time_observer(&self, id: ObserverId) {
        self.backend.remove_time_observer(id);
    }

    pub fn set_now_playing_center(&mut self, center: Arc<dyn NowPlayingCenter>) {
        self.now_playing.set_center(center);
    }

    pub fn set_artwork_loader(&mut self, loader: Arc<dyn ArtworkLoader>) {
        self.artwork_loader = Some(loader);
    }

    pub fn enable_remote_control(&self) -> bool {
        self.now_playing.is_enabled()
    }

    /// Toggle remote command routing; disabling clears now-playing info
    pub fn set_enable_remote_control(&mut self, enabled: bool) {
        self.now_playing.set_enabled(enabled);
    }

    /// Apply a command from the OS remote-control surface.
    /// Returns false when remote control is disabled.
    pub fn handle_remote_command(&mut self, command: RemoteCommand) -> bool {
        if !self.now_playing.is_enabled() {
            debug!(?command, "Remote command ignored");
            return false;
        }

        match command {
            RemoteCommand::Play => self.play(),
            RemoteCommand::Pause => self.pause(),
            RemoteCommand::TogglePlayPause => {
                if self.is_playing() {
                    self.pause();
                } else {
                    self.play();
                }
            }
            RemoteCommand::SkipForward(seconds) => self.seek_by(seconds),
            RemoteCommand::SkipBackward(seconds) => self.seek_by(-seconds),
            RemoteCommand::ChangePosition(position) => self.seek(position),
        }
        true
    }
}

impl<B: MediaBackend> Drop for PlayerController<B> {
    fn drop(&mut self) {
        if self.load.take().is_some() {
            self.backend.clear_item();
        }
        self.now_playing.reset();
    }
}

impl<B: MediaBackend> std::fmt::Debug for PlayerController<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayerController")
            .field("id", &self.id)
            .field("options", &self.options)
            .field("generation", &self.generation)
            .field("load", &self.load)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendCall, ScriptedBackend};
    use crate::config::Endpoints;
    use crate::events::EventChannel;

    fn options(id: &str) -> VideoOptions {
        VideoOptions::vod(id).with_endpoints(Endpoints::single_host("http://127.0.0.1:9"))
    }

    async fn settle(controller: &mut PlayerController<ScriptedBackend>) {
        for _ in 0..20 {
            tokio::task::yield_now().await;
            controller.process_pending();
        }
    }

    #[tokio::test]
    async fn test_shutdown_ends_processing() {
        let backend = Arc::new(ScriptedBackend::new());
        let mut controller =
            PlayerController::new(backend.clone(), Some(options("vi1")), PlayerConfig::default())
                .unwrap();
        let (channel, mut events) = EventChannel::new();
        controller.add_listener(&channel);

        controller.shutdown();
        tokio::time::timeout(std::time::Duration::from_secs(5), async {
            while controller.process_next().await {}
        })
        .await
        .expect("signal bus stays open after shutdown");

        assert!(backend.attached_urls().is_empty());
        assert!(controller.video_options().is_none());
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_no_options_is_idle() {
        let backend = Arc::new(ScriptedBackend::new());
        let mut controller =
            PlayerController::new(backend.clone(), None, PlayerConfig::default()).unwrap();
        settle(&mut controller).await;

        assert_eq!(backend.calls(), vec![BackendCall::SetMuted(false)]);
        assert!(!controller.is_live());
        assert!(!controller.is_vod());
        assert_eq!(controller.duration(), 0.0);
    }

    #[tokio::test]
    async fn test_seek_without_item_is_ignored() {
        let backend = Arc::new(ScriptedBackend::new());
        let mut controller =
            PlayerController::new(backend.clone(), None, PlayerConfig::default()).unwrap();
        controller.seek(10.0);
        controller.replay();

        assert!(!backend.calls().iter().any(|c| matches!(c, BackendCall::Seek(_))));
    }

    #[tokio::test]
    async fn test_live_failure_has_no_fallback() {
        let backend = Arc::new(ScriptedBackend::new().failing_urls_containing("live1"));
        let live = VideoOptions::live("live1")
            .with_endpoints(Endpoints::single_host("http://127.0.0.1:9"));
        let mut controller =
            PlayerController::new(backend.clone(), Some(live), PlayerConfig::default()).unwrap();
        let (channel, mut rx) = EventChannel::new();
        controller.add_listener(&channel);
        settle(&mut controller).await;

        assert_eq!(backend.attached_urls().len(), 1);
        let mut names = Vec::new();
        while let Ok(recorded) = rx.try_recv() {
            names.push(recorded.event.name());
        }
        assert_eq!(names, vec!["prepare", "error"]);
    }

    #[tokio::test]
    async fn test_signals_for_replaced_item_are_ignored() {
        let backend = Arc::new(ScriptedBackend::new().without_auto_ready());
        let mut controller =
            PlayerController::new(backend.clone(), Some(options("vi1")), PlayerConfig::default())
                .unwrap();
        settle(&mut controller).await;
        let first = backend.current_item().unwrap();

        controller.set_video_options(Some(options("vi2")));
        settle(&mut controller).await;

        let (channel, mut rx) = EventChannel::new();
        controller.add_listener(&channel);
        SignalSink::new(controller.signal_tx.clone()).send(NativeSignal::ItemStatus {
            item: first,
            status: ItemStatus::ReadyToPlay,
        });
        controller.process_pending();

        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_seek_by_passes_offset_through() {
        let backend = Arc::new(ScriptedBackend::new());
        let mut controller =
            PlayerController::new(backend.clone(), Some(options("vi1")), PlayerConfig::default())
                .unwrap();
        settle(&mut controller).await;

        backend.set_position(5.0);
        controller.seek_by(-30.0);

        assert!(backend.calls().contains(&BackendCall::Seek(-25.0)));
    }

    #[tokio::test]
    async fn test_speed_rate_applied_on_play() {
        let backend = Arc::new(ScriptedBackend::new());
        let mut controller =
            PlayerController::new(backend.clone(), Some(options("vi1")), PlayerConfig::default())
                .unwrap();
        settle(&mut controller).await;

        controller.set_speed_rate(1.5);
        assert!(!backend.calls().contains(&BackendCall::SetRate(1.5)));

        controller.play();
        assert!(backend.calls().contains(&BackendCall::SetRate(1.5)));
    }
}
