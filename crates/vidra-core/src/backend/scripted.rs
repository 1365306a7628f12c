//! Scripted in-memory backend for tests and demos
//!
//! Behaves like a well-mannered native player: items become ready (or fail)
//! as soon as they are attached, transport changes are reported only when
//! the state actually changes, and seeks complete immediately.

use super::{MediaBackend, NativeSignal, SignalSink};
use crate::{ItemId, ItemStatus, ObserverId, SubtitleTrack, TimeControlStatus, VideoSize};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use url::Url;

/// A call the controller made into the backend
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    ReplaceItem { item: ItemId, url: Url },
    ClearItem,
    Play,
    Pause,
    Seek(f64),
    SetRate(f32),
    SetVolume(f32),
    SetMuted(bool),
    SelectSubtitle(Option<String>),
}

type TimeObserver = Arc<dyn Fn(f64) + Send + Sync>;

struct State {
    calls: Vec<BackendCall>,
    current: Option<(ItemId, SignalSink)>,
    duration: Option<f64>,
    position: f64,
    status: TimeControlStatus,
    rate: f32,
    volume: f32,
    muted: bool,
    size: Option<VideoSize>,
    subtitles: Vec<SubtitleTrack>,
    selected: Option<String>,
    failing: Vec<String>,
    auto_ready: bool,
    resume_before_completion: bool,
    observers: Vec<(ObserverId, TimeObserver)>,
    next_observer: u64,
}

/// Scripted [`MediaBackend`]
pub struct ScriptedBackend {
    state: Mutex<State>,
}

impl Default for ScriptedBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                calls: Vec::new(),
                current: None,
                duration: Some(60.2),
                position: 0.0,
                status: TimeControlStatus::Paused,
                rate: 1.0,
                volume: 1.0,
                muted: false,
                size: Some(VideoSize::new(1920.0, 1080.0)),
                subtitles: Vec::new(),
                selected: None,
                failing: Vec::new(),
                auto_ready: true,
                resume_before_completion: false,
                observers: Vec::new(),
                next_observer: 0,
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Items whose URL contains `fragment` fail instead of becoming ready
    pub fn failing_urls_containing(self, fragment: impl Into<String>) -> Self {
        self.state().failing.push(fragment.into());
        self
    }

    pub fn with_duration(self, duration: Option<f64>) -> Self {
        self.state().duration = duration;
        self
    }

    pub fn with_subtitles(self, tracks: Vec<SubtitleTrack>) -> Self {
        self.state().subtitles = tracks;
        self
    }

    pub fn with_presentation_size(self, size: Option<VideoSize>) -> Self {
        self.state().size = size;
        self
    }

    /// Leave attached items pending until [`emit`](Self::emit) reports a status
    pub fn without_auto_ready(self) -> Self {
        self.state().auto_ready = false;
        self
    }

    /// Report the transport resuming before the seek completes
    pub fn resuming_before_seek_completes(self) -> Self {
        self.state().resume_before_completion = true;
        self
    }

    /// Every call received so far
    pub fn calls(&self) -> Vec<BackendCall> {
        self.state().calls.clone()
    }

    /// URLs attached so far, in order
    pub fn attached_urls(&self) -> Vec<Url> {
        self.state()
            .calls
            .iter()
            .filter_map(|call| match call {
                BackendCall::ReplaceItem { url, .. } => Some(url.clone()),
                _ => None,
            })
            .collect()
    }

    /// Item currently attached
    pub fn current_item(&self) -> Option<ItemId> {
        self.state().current.as_ref().map(|(item, _)| *item)
    }

    /// Report a signal for the current item
    pub fn emit(&self, signal: NativeSignal) {
        if let Some((_, sink)) = &self.state().current {
            sink.send(signal);
        }
    }

    /// Move the playhead without reporting anything
    pub fn set_position(&self, position: f64) {
        self.state().position = position;
    }

    /// Run every registered time observer once, as a periodic tick would
    pub fn tick_observers(&self) {
        let (position, observers) = {
            let state = self.state();
            let observers: Vec<TimeObserver> =
                state.observers.iter().map(|(_, cb)| cb.clone()).collect();
            (state.position, observers)
        };
        for observer in observers {
            observer(position);
        }
    }

    pub fn observer_count(&self) -> usize {
        self.state().observers.len()
    }

    /// Play through to the end: playhead at duration, transport paused,
    /// end-of-item reported
    pub fn finish_playback(&self) {
        let mut state = self.state();
        state.position = state.duration.unwrap_or(state.position);
        let Some((item, sink)) = state.current.clone() else {
            return;
        };
        sink.send(NativeSignal::PlayedToEnd { item });
        if state.status != TimeControlStatus::Paused {
            state.status = TimeControlStatus::Paused;
            sink.send(NativeSignal::TimeControl {
                item,
                status: TimeControlStatus::Paused,
            });
        }
    }

    fn transition(state: &mut State, status: TimeControlStatus) {
        if state.status == status {
            return;
        }
        state.status = status;
        if let Some((item, sink)) = &state.current {
            sink.send(NativeSignal::TimeControl {
                item: *item,
                status,
            });
        }
    }
}

impl MediaBackend for ScriptedBackend {
    fn replace_item(&self, item: ItemId, url: &Url, sink: SignalSink) {
        let mut state = self.state();
        state.calls.push(BackendCall::ReplaceItem {
            item,
            url: url.clone(),
        });
        state.position = 0.0;
        state.status = TimeControlStatus::Paused;
        state.selected = None;
        state.current = Some((item, sink.clone()));

        if !state.auto_ready {
            return;
        }

        let fails = state.failing.iter().any(|f| url.as_str().contains(f.as_str()));
        if fails {
            sink.send(NativeSignal::ItemStatus {
                item,
                status: ItemStatus::Failed,
            });
            return;
        }

        sink.send(NativeSignal::ItemStatus {
            item,
            status: ItemStatus::ReadyToPlay,
        });
        if let Some(size) = state.size {
            sink.send(NativeSignal::PresentationSize { item, size });
        }
    }

    fn clear_item(&self) {
        let mut state = self.state();
        state.calls.push(BackendCall::ClearItem);
        state.current = None;
        state.status = TimeControlStatus::Paused;
        state.position = 0.0;
    }

    fn play(&self) {
        let mut state = self.state();
        state.calls.push(BackendCall::Play);
        if state.current.is_some() {
            Self::transition(&mut state, TimeControlStatus::Playing);
        }
    }

    fn pause(&self) {
        let mut state = self.state();
        state.calls.push(BackendCall::Pause);
        Self::transition(&mut state, TimeControlStatus::Paused);
    }

    fn seek(&self, to: f64) {
        let mut state = self.state();
        state.calls.push(BackendCall::Seek(to));
        let Some((item, sink)) = state.current.clone() else {
            return;
        };

        let upper = state.duration.unwrap_or(f64::MAX);
        let was_playing = state.status == TimeControlStatus::Playing;

        // Playing seeks stall the transport briefly, like a real player
        if was_playing {
            Self::transition(&mut state, TimeControlStatus::Paused);
        }
        state.position = to.clamp(0.0, upper);
        if was_playing && state.resume_before_completion {
            Self::transition(&mut state, TimeControlStatus::Playing);
        }
        sink.send(NativeSignal::SeekCompleted { item, finished: true });
        if was_playing {
            Self::transition(&mut state, TimeControlStatus::Playing);
        }
    }

    fn current_time(&self) -> f64 {
        self.state().position
    }

    fn duration(&self) -> Option<f64> {
        let state = self.state();
        state.current.as_ref().and(state.duration)
    }

    fn time_control_status(&self) -> TimeControlStatus {
        self.state().status
    }

    fn rate(&self) -> f32 {
        self.state().rate
    }

    fn set_rate(&self, rate: f32) {
        let mut state = self.state();
        state.calls.push(BackendCall::SetRate(rate));
        state.rate = rate;
    }

    fn volume(&self) -> f32 {
        self.state().volume
    }

    fn set_volume(&self, volume: f32) {
        let mut state = self.state();
        state.calls.push(BackendCall::SetVolume(volume));
        state.volume = volume;
    }

    fn is_muted(&self) -> bool {
        self.state().muted
    }

    fn set_muted(&self, muted: bool) {
        let mut state = self.state();
        state.calls.push(BackendCall::SetMuted(muted));
        state.muted = muted;
    }

    fn presentation_size(&self) -> Option<VideoSize> {
        let state = self.state();
        state.current.as_ref().and(state.size)
    }

    fn subtitle_tracks(&self) -> Vec<SubtitleTrack> {
        self.state().subtitles.clone()
    }

    fn selected_subtitle(&self) -> Option<SubtitleTrack> {
        let state = self.state();
        let locale = state.selected.as_ref()?;
        state.subtitles.iter().find(|t| &t.locale == locale).cloned()
    }

    fn select_subtitle(&self, locale: Option<&str>) {
        let mut state = self.state();
        state
            .calls
            .push(BackendCall::SelectSubtitle(locale.map(str::to_string)));
        state.selected = locale.map(str::to_string);
    }

    fn add_periodic_time_observer(
        &self,
        _interval: Duration,
        callback: Box<dyn Fn(f64) + Send + Sync + 'static>,
    ) -> ObserverId {
        let mut state = self.state();
        state.next_observer += 1;
        let id = ObserverId(state.next_observer);
        state.observers.push((id, Arc::from(callback)));
        id
    }

    fn remove_time_observer(&self, id: ObserverId) {
        self.state().observers.retain(|(observer, _)| *observer != id);
    }
}
