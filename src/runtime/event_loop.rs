use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::audio::{PlaybackState, Player};
use crate::catalog::Catalog;
use crate::config;
use crate::router::{ACTION_NEXT, ACTION_PLAY_PAUSE, ACTION_PREV, Controls};
use crate::ui;

/// State tracked by the runtime event loop across iterations.
pub struct EventLoopState {
    /// Cursor position in the track list.
    pub selected: usize,
    /// Latest playback snapshot drained from the state stream.
    pub playback: PlaybackState,
    /// Last load failure, shown until the next play attempt.
    pub status_line: Option<String>,
}

/// Main terminal event loop: drains playback transitions and load
/// errors, redraws, and maps keys onto playback commands. Returns when
/// quit is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    catalog: &Catalog,
    player: &Player,
    controls: &Controls,
) -> Result<(), Box<dyn std::error::Error>> {
    let subscription = player.subscribe();
    let errors = player.load_errors();
    let mut state = EventLoopState {
        selected: 0,
        playback: player.snapshot(),
        status_line: None,
    };

    loop {
        while let Ok(snapshot) = subscription.try_recv() {
            state.playback = snapshot;
        }
        while let Ok(error) = errors.try_recv() {
            state.status_line = Some(error.to_string());
        }

        terminal.draw(|f| {
            ui::draw(
                f,
                catalog,
                &state.playback,
                state.selected,
                state.status_line.as_deref(),
                &settings.ui,
            )
        })?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, catalog, controls, &mut state) {
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Returns `true` when the loop should exit.
fn handle_key_event(
    key: KeyEvent,
    catalog: &Catalog,
    controls: &Controls,
    state: &mut EventLoopState,
) -> bool {
    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('j') | KeyCode::Down => {
            state.selected = catalog.next_index(state.selected);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            state.selected = catalog.prev_index(state.selected);
        }
        KeyCode::Enter => {
            state.status_line = None;
            controls.play(state.selected);
        }
        KeyCode::Char('p') | KeyCode::Char(' ') => {
            controls.dispatch_action(Some(ACTION_PLAY_PAUSE));
        }
        KeyCode::Char('l') => {
            state.status_line = None;
            controls.dispatch_action(Some(ACTION_NEXT));
        }
        KeyCode::Char('h') => {
            state.status_line = None;
            controls.dispatch_action(Some(ACTION_PREV));
        }
        _ => {}
    }

    false
}
