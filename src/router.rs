//! Thin command surface shared by the UI, the MPRIS interface, and any
//! other caller that wants to drive playback. Every method enqueues a
//! command and returns immediately; the controller thread applies them
//! in arrival order.

use std::sync::mpsc::Sender;

use tracing::debug;

use crate::audio::Command;

/// Action identifiers carried by remote-control surfaces.
pub const ACTION_PREV: &str = "PREV";
pub const ACTION_PLAY_PAUSE: &str = "PLAY_PAUSE";
pub const ACTION_NEXT: &str = "NEXT";

#[derive(Clone)]
pub struct Controls {
    tx: Sender<Command>,
}

impl Controls {
    pub(crate) fn new(tx: Sender<Command>) -> Self {
        Self { tx }
    }

    pub fn play(&self, index: usize) {
        self.send(Command::Play(index));
    }

    pub fn toggle_play_pause(&self) {
        self.send(Command::TogglePause);
    }

    pub fn next(&self) {
        self.send(Command::Next);
    }

    pub fn previous(&self) {
        self.send(Command::Prev);
    }

    /// Map a remote-control action string onto a command. `None` is the
    /// bare "start me" intent and begins playback at the first track.
    /// Unknown identifiers are dropped.
    pub fn dispatch_action(&self, action: Option<&str>) {
        match action {
            None => self.play(0),
            Some(ACTION_PREV) => self.previous(),
            Some(ACTION_PLAY_PAUSE) => self.toggle_play_pause(),
            Some(ACTION_NEXT) => self.next(),
            Some(other) => debug!(action = other, "ignoring unknown action"),
        }
    }

    pub(crate) fn send(&self, cmd: Command) {
        // A closed queue means the controller is gone; nothing to do.
        let _ = self.tx.send(cmd);
    }
}
