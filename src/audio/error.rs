//! Typed load failures surfaced by the playback core.

use thiserror::Error;

/// Why a track failed to load.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadReason {
    #[error("audio file is missing")]
    Missing,
    #[error("audio format is not supported")]
    Unsupported,
    #[error("decoder did not become ready in time")]
    Timeout,
    #[error("i/o error: {0}")]
    Io(String),
}

/// A failed attempt to load the track at `index`.
///
/// Emitted at most once per failed load on the out-of-band error channel;
/// playback state reverts to the previous track, not playing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to load track {index}: {reason}")]
pub struct LoadError {
    pub index: usize,
    pub reason: LoadReason,
}
