use std::fs::{File, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Set up tracing when `VIVACE_LOG` is present, writing to a log file so
/// the output never fights the terminal UI. Unset means no logging.
pub fn init() {
    let Ok(filter) = EnvFilter::try_from_env("VIVACE_LOG") else {
        return;
    };
    let Some(file) = open_log_file() else {
        return;
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
}

fn open_log_file() -> Option<File> {
    let dir = state_dir()?;
    std::fs::create_dir_all(&dir).ok()?;
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("vivace.log"))
        .ok()
}

fn state_dir() -> Option<PathBuf> {
    if let Ok(state_home) = std::env::var("XDG_STATE_HOME")
        && !state_home.is_empty()
    {
        return Some(PathBuf::from(state_home).join("vivace"));
    }
    let home = std::env::var("HOME").ok()?;
    Some(PathBuf::from(home).join(".local/state/vivace"))
}
