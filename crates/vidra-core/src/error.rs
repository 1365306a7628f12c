//! Error types for Vidra Core

use thiserror::Error;

/// Result type alias for player operations
pub type Result<T> = std::result::Result<T, Error>;

/// Player error types
#[derive(Error, Debug)]
pub enum Error {
    // URL errors
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    // Session token exchange errors
    #[error("Server responded with status {status}")]
    Server { status: u16 },

    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Session token exchange failed: {0}")]
    SessionToken(#[source] Box<Error>),

    // Playback errors
    #[error("Playback failed: neither the adaptive nor the progressive source became ready")]
    PlaybackFailed,

    // Artwork errors
    #[error("Failed to decode thumbnail: {0}")]
    ThumbnailDecodeFailed(String),
}

impl Error {
    /// Wrap an exchange failure so it surfaces on the private-video auth path
    pub fn session_token(cause: Error) -> Self {
        match cause {
            already @ Error::SessionToken(_) => already,
            other => Error::SessionToken(Box::new(other)),
        }
    }

    /// Returns true if a caller may reasonably retry the failed operation
    pub fn is_recoverable(&self) -> bool {
        match self {
            Error::Transport(_) => true,
            Error::Server { status } => *status >= 500,
            Error::SessionToken(cause) => cause.is_recoverable(),
            _ => false,
        }
    }

    /// Returns the error code for host-side reporting
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::InvalidUrl(_) => "INVALID_URL",
            Error::Server { .. } => "SERVER_ERROR",
            Error::Transport(_) => "TRANSPORT",
            Error::Decode(_) => "DECODE",
            Error::SessionToken(_) => "SESSION_TOKEN",
            Error::PlaybackFailed => "PLAYBACK_FAILED",
            Error::ThumbnailDecodeFailed(_) => "THUMBNAIL_DECODE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_token_wrapping_is_flat() {
        let wrapped = Error::session_token(Error::Server { status: 404 });
        let twice = Error::session_token(wrapped);

        match twice {
            Error::SessionToken(cause) => assert!(matches!(*cause, Error::Server { status: 404 })),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_recoverability() {
        assert!(Error::Server { status: 503 }.is_recoverable());
        assert!(!Error::Server { status: 404 }.is_recoverable());
        assert!(!Error::PlaybackFailed.is_recoverable());
        assert!(!Error::session_token(Error::Decode("missing field".into())).is_recoverable());
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(Error::PlaybackFailed.error_code(), "PLAYBACK_FAILED");
        assert_eq!(Error::InvalidUrl("x".into()).error_code(), "INVALID_URL");
        assert_eq!(
            Error::session_token(Error::Decode("x".into())).error_code(),
            "SESSION_TOKEN"
        );
    }
}
