//! Vidra Core - Player SDK library for hosted video
//!
//! This crate provides the playback core that sits between a host
//! application and its native media player:
//! - Media URL derivation for on-demand and live videos
//! - Session token exchange for private videos
//! - Playback state control with adaptive to progressive fallback
//! - Deduplicated lifecycle events fanned out to weakly held listeners
//! - Now-playing metadata and remote command routing
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                          Vidra Core                             │
//! ├─────────────────────────────────────────────────────────────────┤
//! │                                                                 │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────┐           │
//! │  │ VideoOptions │  │     URL      │  │   Artwork    │           │
//! │  │  Endpoints   │──│   Resolver   │  │    Loader    │           │
//! │  └──────────────┘  └──────┬───────┘  └──────┬───────┘           │
//! │                           │ signal bus      │                   │
//! │                    ┌──────┴─────────────────┴──┐                │
//! │                    │    Player Controller      │                │
//! │                    └──────┬─────────────┬──────┘                │
//! │                           │             │                       │
//! │  ┌──────────────┐  ┌──────┴──────┐  ┌───┴──────────┐            │
//! │  │    Media     │  │    Event    │  │ Now Playing  │            │
//! │  │   Backend    │  │  Notifier   │  │   Center     │            │
//! │  └──────────────┘  └─────────────┘  └──────────────┘            │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! let backend = Arc::new(MyNativePlayer::new());
//! let mut player = PlayerController::new(
//!     backend,
//!     Some(VideoOptions::vod("vi5fv44Hol1jFrCovyktAJS9")),
//!     PlayerConfig::default().with_autoplay(true),
//! )?;
//! player.add_listener(&my_listener);
//!
//! loop {
//!     tokio::select! {
//!         _ = player.process_next() => {}
//!         _ = host_closed.recv() => break,
//!     }
//! }
//! player.shutdown();
//! ```

pub mod artwork;
pub mod backend;
pub mod config;
pub mod controller;
pub mod controls;
pub mod error;
pub mod events;
pub mod notifier;
pub mod now_playing;
pub mod options;
pub mod resolver;
pub mod types;

pub use artwork::{decode_artwork, Artwork, ArtworkLoader, HttpArtworkLoader};
pub use backend::{FullScreenPresenter, MediaBackend, NativeSignal, SignalSink};
pub use config::{Endpoints, PlayerConfig};
pub use controller::PlayerController;
pub use controls::{ControlAction, IdleTimer};
pub use error::{Error, Result};
pub use events::{EventChannel, PlayerEvent, PlayerEventListener, PlayerEvents, RecordedEvent};
pub use notifier::EventNotifier;
pub use now_playing::{NowPlaying, NowPlayingCenter, NowPlayingInfo, RemoteCommand};
pub use options::VideoOptions;
pub use resolver::UrlResolver;
pub use types::*;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Log library initialization
pub fn init() {
    tracing::info!(version = VERSION, "Vidra Core initialized");
}
