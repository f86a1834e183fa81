//! Replay-latest broadcast of playback state transitions.
//!
//! Each subscriber owns a private mpsc channel. Subscribing delivers the
//! latest known state into the fresh channel before it is registered, so a
//! late subscriber sees latest-then-live with no gap and no transition from
//! before it subscribed. Emission happens under the same lock, which keeps
//! delivery in emission order for every subscriber. Dropping a
//! subscription only causes its sender to be pruned on the next emit.

use std::sync::mpsc::{Receiver, RecvError, RecvTimeoutError, Sender, TryRecvError, channel};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::error::LoadError;
use super::types::PlaybackState;

struct Inner {
    latest: PlaybackState,
    subscribers: Vec<Sender<PlaybackState>>,
}

/// Fan-out of every `PlaybackState` transition, cloneable across threads.
#[derive(Clone)]
pub struct StatePublisher {
    inner: Arc<Mutex<Inner>>,
}

impl StatePublisher {
    pub fn new(initial: PlaybackState) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                latest: initial,
                subscribers: Vec::new(),
            })),
        }
    }

    /// The most recently emitted state. Never blocks on the controller.
    pub fn latest(&self) -> PlaybackState {
        self.inner.lock().expect("publisher lock poisoned").latest.clone()
    }

    /// Register a new subscriber; it immediately receives the latest state.
    pub fn subscribe(&self) -> StateSubscription {
        let mut inner = self.inner.lock().expect("publisher lock poisoned");
        let (tx, rx) = channel();
        // The replay send cannot fail: we still hold the receiver.
        let _ = tx.send(inner.latest.clone());
        inner.subscribers.push(tx);
        StateSubscription { rx }
    }

    /// Publish one transition to every live subscriber, in order.
    pub(super) fn emit(&self, next: PlaybackState) {
        let mut inner = self.inner.lock().expect("publisher lock poisoned");
        inner.latest = next.clone();
        inner
            .subscribers
            .retain(|tx| tx.send(next.clone()).is_ok());
    }
}

/// A live view of published state transitions. Drop to unsubscribe.
pub struct StateSubscription {
    rx: Receiver<PlaybackState>,
}

impl StateSubscription {
    pub fn recv(&self) -> Result<PlaybackState, RecvError> {
        self.rx.recv()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Result<PlaybackState, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }

    pub fn try_recv(&self) -> Result<PlaybackState, TryRecvError> {
        self.rx.try_recv()
    }
}

/// Out-of-band fan-out of load failures, for logging and tests.
#[derive(Clone)]
pub(super) struct ErrorHub {
    senders: Arc<Mutex<Vec<Sender<LoadError>>>>,
}

impl ErrorHub {
    pub(super) fn new() -> Self {
        Self {
            senders: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub(super) fn subscribe(&self) -> Receiver<LoadError> {
        let (tx, rx) = channel();
        self.senders.lock().expect("error hub lock poisoned").push(tx);
        rx
    }

    pub(super) fn emit(&self, error: LoadError) {
        self.senders
            .lock()
            .expect("error hub lock poisoned")
            .retain(|tx| tx.send(error.clone()).is_ok());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(track: usize) -> PlaybackState {
        PlaybackState {
            track,
            ..PlaybackState::initial()
        }
    }

    #[test]
    fn subscribe_replays_latest_then_delivers_live_transitions() {
        let publisher = StatePublisher::new(state(0));
        publisher.emit(state(1));

        let sub = publisher.subscribe();
        assert_eq!(sub.try_recv().unwrap(), state(1));
        assert!(sub.try_recv().is_err());

        publisher.emit(state(2));
        publisher.emit(state(3));
        assert_eq!(sub.try_recv().unwrap(), state(2));
        assert_eq!(sub.try_recv().unwrap(), state(3));
    }

    #[test]
    fn dropping_one_subscription_does_not_affect_others() {
        let publisher = StatePublisher::new(state(0));
        let keep = publisher.subscribe();
        let dropped = publisher.subscribe();
        drop(dropped);

        publisher.emit(state(1));
        assert_eq!(keep.try_recv().unwrap(), state(0));
        assert_eq!(keep.try_recv().unwrap(), state(1));
        assert_eq!(publisher.latest(), state(1));
    }

    #[test]
    fn intermediate_transitions_are_never_coalesced() {
        let publisher = StatePublisher::new(state(0));
        let sub = publisher.subscribe();
        let _ = sub.try_recv();

        for i in 1..=5 {
            publisher.emit(state(i));
        }
        for i in 1..=5 {
            assert_eq!(sub.try_recv().unwrap(), state(i));
        }
    }
}
