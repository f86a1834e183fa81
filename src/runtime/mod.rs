use std::env;
use std::path::Path;
use std::sync::Arc;

use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::audio::Player;
use crate::catalog::{Catalog, scan};
use crate::mpris;

mod event_loop;
mod logging;
mod notify_sync;
mod settings;
mod startup;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();
    let settings = settings::load_settings();

    let dir = env::args().nth(1).unwrap_or_else(|| {
        std::env::current_dir()
            .ok()
            .and_then(|p| p.to_str().map(|s| s.to_string()))
            .unwrap_or_else(|| "Music".to_string())
    });

    let tracks = scan(Path::new(&dir), &settings.library);
    let catalog = Arc::new(Catalog::new(tracks)?);
    let player = Player::new(catalog.clone(), settings.audio.clone());
    let controls = player.controls();

    if settings.mpris.enabled {
        let handle = mpris::spawn_mpris(controls.clone());
        notify_sync::spawn(handle, catalog.clone(), player.subscribe());
    }

    startup::apply_playback_defaults(&controls);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop::run(&mut terminal, &settings, &catalog, &player, &controls);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    player.shutdown();

    run_result
}
