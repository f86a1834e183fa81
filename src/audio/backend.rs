//! The decoder seam between the controller and the platform audio stack.
//!
//! The controller only ever talks to these traits; the production
//! implementation lives in [`super::sink`], tests substitute a scripted
//! fake. Both traits are used exclusively from the controller thread, so
//! neither requires `Send`.

use std::time::Duration;

use crate::catalog::Track;

use super::error::LoadReason;

/// Opens tracks and produces playable handles.
pub trait AudioBackend {
    /// Load `track` and return a paused handle, ready to start.
    fn load(&mut self, track: &Track) -> Result<Box<dyn LoadedTrack>, LoadReason>;
}

/// A loaded track. Dropping the handle disposes the decoder resource.
pub trait LoadedTrack {
    /// Start or resume playback.
    fn start(&mut self);
    /// Pause playback, keeping the position.
    fn pause(&mut self);
    /// Current playback position.
    fn position(&self) -> Duration;
    /// Total duration as reported by the decoder, if it knows one.
    fn duration(&self) -> Option<Duration>;
}
