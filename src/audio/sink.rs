//! `rodio`-backed implementation of the decoder seam.
//!
//! Opening and decoding a file can stall on bad media or slow storage, so
//! the decode runs on a helper thread and the load is bounded by the
//! configured timeout.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};

use crate::catalog::Track;

use super::backend::{AudioBackend, LoadedTrack};
use super::error::LoadReason;

pub struct RodioBackend {
    stream: OutputStream,
    load_timeout: Duration,
}

impl RodioBackend {
    /// Open the default output device. Must be called on the thread that
    /// will own the backend.
    pub fn open(load_timeout: Duration) -> Self {
        let stream =
            OutputStreamBuilder::open_default_stream().expect("ERR: No audio output device");
        // rodio logs to stderr when OutputStream is dropped. That's useful in debugging,
        // but noisy for a TUI app.
        let mut stream = stream;
        stream.log_on_drop(false);

        Self {
            stream,
            load_timeout,
        }
    }
}

impl AudioBackend for RodioBackend {
    fn load(&mut self, track: &Track) -> Result<Box<dyn LoadedTrack>, LoadReason> {
        let path = track.path.clone();
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let _ = tx.send(open_source(&path));
        });

        let source = match rx.recv_timeout(self.load_timeout) {
            Ok(result) => result?,
            Err(_) => return Err(LoadReason::Timeout),
        };

        // Prefer the decoder-reported duration; fall back to the tagged one.
        let duration = source.total_duration().or(track.duration);

        let sink = Sink::connect_new(self.stream.mixer());
        sink.append(source);
        sink.pause();

        Ok(Box::new(RodioTrack { sink, duration }))
    }
}

fn open_source(path: &Path) -> Result<Decoder<BufReader<File>>, LoadReason> {
    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => LoadReason::Missing,
        _ => LoadReason::Io(e.to_string()),
    })?;

    Decoder::new(BufReader::new(file)).map_err(|_| LoadReason::Unsupported)
}

struct RodioTrack {
    sink: Sink,
    duration: Option<Duration>,
}

impl LoadedTrack for RodioTrack {
    fn start(&mut self) {
        self.sink.play();
    }

    fn pause(&mut self) {
        self.sink.pause();
    }

    fn position(&self) -> Duration {
        self.sink.get_pos()
    }

    fn duration(&self) -> Option<Duration> {
        self.duration
    }
}

impl Drop for RodioTrack {
    fn drop(&mut self) {
        self.sink.stop();
    }
}
