//! On-screen controls support
//!
//! Widgets map user input to [`ControlAction`]s and apply them to the
//! controller. [`IdleTimer`] hides the control surface after a period
//! without interaction.

use crate::backend::MediaBackend;
use crate::controller::PlayerController;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::trace;

/// Playback rates offered by the speed picker
pub const SPEED_RATES: [f32; 7] = [0.5, 0.75, 1.0, 1.25, 1.5, 1.75, 2.0];

/// Volume change per step
pub const VOLUME_STEP: f32 = 0.1;

/// Default delay before the controls hide
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(5);

/// Keyboard/remote control handling
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlAction {
    PlayPause,
    SeekForward(f64),
    SeekBackward(f64),
    VolumeUp,
    VolumeDown,
    ToggleMute,
    /// Show the first subtitle track, or hide the current one
    ToggleSubtitles,
    SpeedUp,
    SpeedDown,
    Replay,
}

impl ControlAction {
    /// Apply the action through the controller's public API
    pub fn apply<B: MediaBackend>(&self, controller: &mut PlayerController<B>) {
        trace!(action = ?self, "Control action");
        match *self {
            ControlAction::PlayPause => {
                if controller.is_playing() {
                    controller.pause();
                } else {
                    controller.play();
                }
            }
            ControlAction::SeekForward(seconds) => controller.seek_by(seconds),
            ControlAction::SeekBackward(seconds) => controller.seek_by(-seconds),
            ControlAction::VolumeUp => {
                let volume = (controller.volume() + VOLUME_STEP).min(1.0);
                controller.set_volume(volume);
            }
            ControlAction::VolumeDown => {
                let volume = (controller.volume() - VOLUME_STEP).max(0.0);
                controller.set_volume(volume);
            }
            ControlAction::ToggleMute => {
                let muted = controller.is_muted();
                controller.set_muted(!muted);
            }
            ControlAction::ToggleSubtitles => {
                if controller.current_subtitle_locale().is_some() {
                    controller.hide_subtitle();
                } else if let Some(locale) = controller.subtitle_locales().first() {
                    controller.set_current_subtitle_locale(locale);
                }
            }
            ControlAction::SpeedUp => {
                if let Some(rate) = next_speed(controller.speed_rate()) {
                    controller.set_speed_rate(rate);
                }
            }
            ControlAction::SpeedDown => {
                if let Some(rate) = previous_speed(controller.speed_rate()) {
                    controller.set_speed_rate(rate);
                }
            }
            ControlAction::Replay => controller.replay(),
        }
    }
}

/// Next faster preset rate
pub fn next_speed(current: f32) -> Option<f32> {
    SPEED_RATES.iter().copied().find(|rate| *rate > current)
}

/// Next slower preset rate
pub fn previous_speed(current: f32) -> Option<f32> {
    SPEED_RATES.iter().rev().copied().find(|rate| *rate < current)
}

/// Timer hiding the controls after a period of inactivity.
///
/// Owned by the widget that needs it. Each [`start`](Self::start) or
/// [`reset`](Self::reset) replaces the pending deadline; the callback runs
/// at most once per deadline. Must be used inside a tokio runtime.
pub struct IdleTimer {
    timeout: Duration,
    callback: Arc<dyn Fn() + Send + Sync>,
    handle: Option<JoinHandle<()>>,
}

impl IdleTimer {
    pub fn new(timeout: Duration, callback: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            timeout,
            callback: Arc::new(callback),
            handle: None,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Arm the timer, replacing any pending deadline
    pub fn start(&mut self) {
        self.cancel();

        let timeout = self.timeout;
        let callback = self.callback.clone();
        self.handle = Some(tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            callback();
        }));
    }

    /// Push the deadline back after user interaction
    pub fn reset(&mut self) {
        self.start();
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    /// A deadline is pending
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for IdleTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for IdleTimer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdleTimer")
            .field("timeout", &self.timeout)
            .field("running", &self.is_running())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter() -> (Arc<AtomicUsize>, impl Fn() + Send + Sync + 'static) {
        let fired = Arc::new(AtomicUsize::new(0));
        let clone = fired.clone();
        (fired, move || {
            clone.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_speed_steps() {
        assert_eq!(next_speed(1.0), Some(1.25));
        assert_eq!(previous_speed(1.0), Some(0.75));
        assert_eq!(next_speed(2.0), None);
        assert_eq!(previous_speed(0.5), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_timer_fires_once() {
        let (fired, callback) = counter();
        let mut timer = IdleTimer::new(Duration::from_secs(3), callback);
        timer.start();

        tokio::time::sleep(Duration::from_secs(4)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(!timer.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_timer_reset_postpones() {
        let (fired, callback) = counter();
        let mut timer = IdleTimer::new(Duration::from_secs(3), callback);
        timer.start();

        tokio::time::sleep(Duration::from_secs(2)).await;
        timer.reset();
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_timer_cancel() {
        let (fired, callback) = counter();
        let mut timer = IdleTimer::new(DEFAULT_IDLE_TIMEOUT, callback);
        timer.start();
        timer.cancel();

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        assert!(!timer.is_running());
    }
}
