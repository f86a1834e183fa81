//! Playback state snapshot and controller commands.

use std::time::Duration;

/// An immutable snapshot of the playback state.
///
/// `duration == Duration::ZERO` means the decoder has not reported a
/// duration yet. Once a duration is known, `position <= duration` holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackState {
    /// Index of the current track in the catalog.
    pub track: usize,
    /// Whether playback is currently active.
    pub playing: bool,
    /// Duration of the current track, `ZERO` while unknown.
    pub duration: Duration,
    /// Elapsed playback time for the current track.
    pub position: Duration,
}

impl PlaybackState {
    /// State at service start: first track selected, nothing loaded.
    pub fn initial() -> Self {
        Self {
            track: 0,
            playing: false,
            duration: Duration::ZERO,
            position: Duration::ZERO,
        }
    }

    /// Whether the decoder has reported a duration for the current load.
    pub fn duration_known(&self) -> bool {
        self.duration > Duration::ZERO
    }
}

/// Commands consumed by the controller thread, applied strictly in
/// arrival order.
#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    /// Load the track at the given index and start playing it.
    Play(usize),
    /// Pause if playing, resume if paused. No-op when nothing is loaded.
    TogglePause,
    /// Play the next track, wrapping past the end of the catalog.
    Next,
    /// Play the previous track, wrapping before the start.
    Prev,
    /// Position poll from the ticker thread. Ticks carry the generation
    /// they were spawned for; a tick from a retired generation is
    /// discarded so a slow poll can never clobber a newer load.
    Tick { generation: u64 },
    /// Dispose the loaded track and exit the controller thread.
    Shutdown,
}
