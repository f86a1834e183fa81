//! Playback core: the controller thread, decoder backend seam and the
//! state publisher.
//!
//! All playback state lives on one controller thread which consumes a
//! single command queue; everything else observes immutable snapshots
//! through [`StateSubscription`]s.

mod backend;
mod error;
mod player;
mod publisher;
mod sink;
mod thread;
mod types;

pub use backend::{AudioBackend, LoadedTrack};
pub use error::{LoadError, LoadReason};
pub use player::Player;
pub use publisher::{StatePublisher, StateSubscription};
pub use sink::RodioBackend;
pub use types::{Command, PlaybackState};
