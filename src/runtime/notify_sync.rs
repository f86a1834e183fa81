//! Mirrors the playback state stream onto the MPRIS interface.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::audio::StateSubscription;
use crate::catalog::Catalog;
use crate::mpris::{MprisHandle, PlaybackStatus, status_for};

/// Consume every playback transition and update the published metadata
/// and status in place. Exits when the state stream closes.
pub fn spawn(
    mpris: MprisHandle,
    catalog: Arc<Catalog>,
    subscription: StateSubscription,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut last_track: Option<usize> = None;
        let mut last_status: Option<PlaybackStatus> = None;

        while let Ok(state) = subscription.recv() {
            let status = status_for(&state);
            let track = (status != PlaybackStatus::Stopped).then_some(state.track);

            if track != last_track {
                mpris.set_track_metadata(track, track.and_then(|i| catalog.get(i)));
                last_track = track;
            }
            if Some(status) != last_status {
                mpris.set_playback(status);
                last_status = Some(status);
            }
        }
    })
}
