//! The playback controller: a single thread that owns all playback state.
//!
//! Commands and position ticks arrive on one queue and are applied in
//! arrival order, so no two mutations are ever concurrent. Every mutation
//! is followed by exactly the emissions the observers need; the controller
//! is the only writer the publisher ever sees.
//!
//! Ticker liveness is tied to the generation counter: the counter bumps on
//! every load and on every play-state change, a ticker exits as soon as
//! the counter moves past the generation it was spawned for, and a queued
//! tick from a retired generation is discarded on receipt. That both
//! prevents a stale poll from clobbering a fresh load and guarantees a
//! live ticker whenever playback is active.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{Receiver, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, warn};

use crate::catalog::Catalog;
use crate::config::AudioSettings;

use super::backend::{AudioBackend, LoadedTrack};
use super::error::LoadError;
use super::publisher::{ErrorHub, StatePublisher};
use super::types::{Command, PlaybackState};

pub(super) struct ControllerSeed {
    pub catalog: Arc<Catalog>,
    pub rx: Receiver<Command>,
    pub tx: Sender<Command>,
    pub publisher: StatePublisher,
    pub errors: ErrorHub,
    pub settings: AudioSettings,
}

/// Spawn the controller thread. The backend is constructed on the spawned
/// thread because audio output handles are not generally `Send`.
pub(super) fn spawn_controller<B, F>(seed: ControllerSeed, make_backend: F) -> JoinHandle<()>
where
    B: AudioBackend + 'static,
    F: FnOnce() -> B + Send + 'static,
{
    thread::spawn(move || {
        let backend = make_backend();
        Controller {
            catalog: seed.catalog,
            rx: seed.rx,
            tx: seed.tx,
            publisher: seed.publisher,
            errors: seed.errors,
            poll_interval: Duration::from_millis(seed.settings.poll_interval_ms),
            backend,
            loaded: None,
            state: PlaybackState::initial(),
            generation: Arc::new(AtomicU64::new(0)),
        }
        .run();
    })
}

struct Controller<B> {
    catalog: Arc<Catalog>,
    rx: Receiver<Command>,
    tx: Sender<Command>,
    publisher: StatePublisher,
    errors: ErrorHub,
    poll_interval: Duration,
    backend: B,
    loaded: Option<Box<dyn LoadedTrack>>,
    state: PlaybackState,
    generation: Arc<AtomicU64>,
}

impl<B: AudioBackend> Controller<B> {
    fn run(mut self) {
        while let Ok(cmd) = self.rx.recv() {
            match cmd {
                Command::Play(index) => self.load_and_play(index),
                Command::TogglePause => self.toggle_pause(),
                Command::Next => {
                    let index = self.catalog.next_index(self.state.track);
                    self.load_and_play(index);
                }
                Command::Prev => {
                    let index = self.catalog.prev_index(self.state.track);
                    self.load_and_play(index);
                }
                Command::Tick { generation } => self.apply_tick(generation),
                Command::Shutdown => break,
            }
        }

        // Retire the ticker and dispose the decoder resource; reachable
        // from any state.
        self.bump_generation();
        self.loaded = None;
    }

    fn load_and_play(&mut self, index: usize) {
        if index >= self.catalog.len() {
            warn!(
                index,
                catalog_len = self.catalog.len(),
                "ignoring play for out-of-range index"
            );
            return;
        }

        let previous = self.state.clone();
        let generation = self.bump_generation();
        // Dispose the old load before the new one touches the device.
        self.loaded = None;

        self.state = PlaybackState {
            track: index,
            playing: true,
            duration: Duration::ZERO,
            position: Duration::ZERO,
        };
        self.publisher.emit(self.state.clone());

        let track = self
            .catalog
            .get(index)
            .expect("index bounds checked against catalog");

        match self.backend.load(track) {
            Ok(mut handle) => {
                handle.start();
                let duration = handle
                    .duration()
                    .or(track.duration)
                    .unwrap_or(Duration::ZERO);
                self.loaded = Some(handle);

                debug!(index, ?duration, "track loaded");
                self.state.duration = duration;
                self.publisher.emit(self.state.clone());

                self.spawn_ticker(generation);
            }
            Err(reason) => {
                // The old handle is already gone; fall back to the last
                // successfully playing track, not playing.
                self.state = PlaybackState {
                    track: previous.track,
                    playing: false,
                    duration: previous.duration,
                    position: previous.position,
                };
                self.publisher.emit(self.state.clone());

                let error = LoadError { index, reason };
                warn!(%error, "track load failed");
                self.errors.emit(error);
            }
        }
    }

    fn toggle_pause(&mut self) {
        let Some(handle) = self.loaded.as_mut() else {
            debug!("toggle ignored: nothing loaded");
            return;
        };

        if self.state.playing {
            handle.pause();
            self.state.playing = false;
            // Retires the running ticker on its next wakeup.
            self.bump_generation();
        } else {
            handle.start();
            self.state.playing = true;
            let generation = self.bump_generation();
            self.spawn_ticker(generation);
        }
        self.publisher.emit(self.state.clone());
    }

    fn apply_tick(&mut self, generation: u64) {
        if generation != self.generation.load(Ordering::SeqCst) || !self.state.playing {
            return;
        }
        let Some(handle) = self.loaded.as_ref() else {
            return;
        };

        let mut position = handle.position();
        if self.state.duration_known() && position > self.state.duration {
            position = self.state.duration;
        }
        self.state.position = position;
        self.publisher.emit(self.state.clone());
    }

    fn bump_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn spawn_ticker(&self, generation: u64) {
        let tx = self.tx.clone();
        let current = self.generation.clone();
        let interval = self.poll_interval;
        thread::spawn(move || {
            loop {
                thread::sleep(interval);
                if current.load(Ordering::SeqCst) != generation {
                    break;
                }
                if tx.send(Command::Tick { generation }).is_err() {
                    break;
                }
            }
        });
    }
}
