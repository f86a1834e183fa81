use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// A single playable track. Immutable once scanned.
#[derive(Clone)]
pub struct Track {
    pub path: PathBuf,
    /// Track title, from tags or the file stem.
    pub title: String,
    /// One-line description shown under the title (artist/album by default).
    pub description: String,
    /// Cover art file next to the track, if one was found.
    pub artwork: Option<PathBuf>,
    /// Duration from the file's tags, used as a fallback when the decoder
    /// cannot report one.
    pub duration: Option<Duration>,
}

/// Returned when a catalog would be empty; playback needs at least one track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("catalog contains no tracks")]
pub struct EmptyCatalog;

/// A fixed, non-empty, ordered list of tracks.
pub struct Catalog {
    tracks: Vec<Track>,
}

impl Catalog {
    pub fn new(tracks: Vec<Track>) -> Result<Self, EmptyCatalog> {
        if tracks.is_empty() {
            return Err(EmptyCatalog);
        }
        Ok(Self { tracks })
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Index of the track after `index`, wrapping past the end.
    pub fn next_index(&self, index: usize) -> usize {
        (index + 1) % self.tracks.len()
    }

    /// Index of the track before `index`, wrapping before the start.
    pub fn prev_index(&self, index: usize) -> usize {
        (index + self.tracks.len() - 1) % self.tracks.len()
    }
}
