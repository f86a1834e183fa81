use std::sync::mpsc::{Receiver, Sender, channel};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use crate::catalog::Catalog;
use crate::config::AudioSettings;
use crate::router::Controls;

use super::backend::AudioBackend;
use super::error::LoadError;
use super::publisher::{ErrorHub, StatePublisher, StateSubscription};
use super::sink::RodioBackend;
use super::thread::{ControllerSeed, spawn_controller};
use super::types::{Command, PlaybackState};

/// Owning handle to the playback controller thread.
///
/// Everything that mutates playback goes through [`Controls`]; everything
/// that observes it goes through [`Player::subscribe`] or
/// [`Player::snapshot`]. Dropping the player without [`Player::shutdown`]
/// leaves the controller thread to wind down on its own once the last
/// sender is gone.
pub struct Player {
    tx: Sender<Command>,
    publisher: StatePublisher,
    errors: ErrorHub,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl Player {
    /// Start the controller against the default audio output device.
    pub fn new(catalog: Arc<Catalog>, settings: AudioSettings) -> Self {
        let load_timeout = std::time::Duration::from_millis(settings.load_timeout_ms);
        Self::with_backend(catalog, settings, move || RodioBackend::open(load_timeout))
    }

    /// Start the controller with a caller-supplied backend. The factory
    /// runs on the controller thread, so the backend itself does not need
    /// to be `Send`.
    pub fn with_backend<B, F>(catalog: Arc<Catalog>, settings: AudioSettings, make_backend: F) -> Self
    where
        B: AudioBackend + 'static,
        F: FnOnce() -> B + Send + 'static,
    {
        let (tx, rx) = channel();
        let publisher = StatePublisher::new(PlaybackState::initial());
        let errors = ErrorHub::new();

        let join = spawn_controller(
            ControllerSeed {
                catalog,
                rx,
                tx: tx.clone(),
                publisher: publisher.clone(),
                errors: errors.clone(),
                settings,
            },
            make_backend,
        );

        Self {
            tx,
            publisher,
            errors,
            join: Mutex::new(Some(join)),
        }
    }

    pub fn controls(&self) -> Controls {
        Controls::new(self.tx.clone())
    }

    /// Current state plus every later transition, in order, nothing
    /// skipped.
    pub fn subscribe(&self) -> StateSubscription {
        self.publisher.subscribe()
    }

    pub fn snapshot(&self) -> PlaybackState {
        self.publisher.latest()
    }

    /// Out-of-band load failures. Failures never appear in the state
    /// stream beyond the reverted state they leave behind.
    pub fn load_errors(&self) -> Receiver<LoadError> {
        self.errors.subscribe()
    }

    /// Stop the controller and wait for it to dispose its resources.
    pub fn shutdown(&self) {
        let _ = self.tx.send(Command::Shutdown);
        let handle = self
            .join
            .lock()
            .expect("player join lock poisoned")
            .take();
        if let Some(handle) = handle {
            let _ = handle.join();
        }
    }
}
