//! Terminal rendering for the catalog list and the now-playing panel.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use std::time::Duration;

use crate::audio::PlaybackState;
use crate::catalog::Catalog;
use crate::config::{TimeField, UiSettings};
use crate::mpris::{PlaybackStatus, status_for};

/// Format a `Duration` as `MM:SS`.
fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Build the now-playing time text (elapsed/total/remaining) per `UiSettings`.
fn now_playing_time_text(
    elapsed: Duration,
    total: Option<Duration>,
    ui: &UiSettings,
) -> Option<String> {
    if ui.now_playing_time_fields.is_empty() {
        return None;
    }

    let mut parts: Vec<String> = Vec::new();
    for f in &ui.now_playing_time_fields {
        match f {
            TimeField::Elapsed => parts.push(format_mmss(elapsed)),
            TimeField::Total => {
                if let Some(t) = total {
                    parts.push(format_mmss(t));
                }
            }
            TimeField::Remaining => {
                if let Some(t) = total {
                    let rem = t.saturating_sub(elapsed);
                    parts.push(format!("-{}", format_mmss(rem)));
                }
            }
        }
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(&ui.now_playing_time_separator))
    }
}

fn controls_text() -> String {
    [
        "[j/k] up/down",
        "[enter] play selected",
        "[space/p] play/pause",
        "[h/l] prev/next",
        "[q] quit",
    ]
    .join(" | ")
}

fn track_line(catalog: &Catalog, index: usize, playback: &PlaybackState, current: bool) -> String {
    let Some(track) = catalog.get(index) else {
        return String::new();
    };
    let marker = if current && playback.playing {
        "> "
    } else if current {
        "= "
    } else {
        "  "
    };
    if track.description.is_empty() {
        format!("{marker}{}", track.title)
    } else {
        format!("{marker}{}  ({})", track.title, track.description)
    }
}

fn now_playing_text(
    catalog: &Catalog,
    playback: &PlaybackState,
    status_line: Option<&str>,
    ui: &UiSettings,
) -> String {
    if let Some(msg) = status_line {
        return format!("!! {msg}");
    }

    let status = status_for(playback);
    if status == PlaybackStatus::Stopped {
        return "nothing playing".to_string();
    }

    let label = match status {
        PlaybackStatus::Playing => "playing",
        _ => "paused",
    };
    let title = catalog
        .get(playback.track)
        .map(|t| t.title.as_str())
        .unwrap_or("?");

    let total = playback.duration_known().then_some(playback.duration);
    match now_playing_time_text(playback.position, total, ui) {
        Some(time) => format!("[{label}] {title}  {time}"),
        None => format!("[{label}] {title}"),
    }
}

pub fn draw(
    frame: &mut Frame,
    catalog: &Catalog,
    playback: &PlaybackState,
    selected: usize,
    status_line: Option<&str>,
    ui: &UiSettings,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let header = Paragraph::new(ui.header_text.clone())
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, chunks[0]);

    let current = status_for(playback) != PlaybackStatus::Stopped;
    let items: Vec<ListItem> = (0..catalog.len())
        .map(|i| {
            ListItem::new(track_line(
                catalog,
                i,
                playback,
                current && i == playback.track,
            ))
        })
        .collect();
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("tracks"))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    let mut list_state = ListState::default();
    list_state.select(Some(selected.min(catalog.len().saturating_sub(1))));
    frame.render_stateful_widget(list, chunks[1], &mut list_state);

    let mut now_playing = Paragraph::new(now_playing_text(catalog, playback, status_line, ui))
        .block(Block::default().borders(Borders::ALL).title("now playing"));
    if status_line.is_some() {
        now_playing = now_playing.style(Style::default().fg(Color::Red));
    }
    frame.render_widget(now_playing, chunks[2]);

    let controls = Paragraph::new(controls_text())
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(controls, chunks[3]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Track;
    use std::path::PathBuf;

    fn test_catalog() -> Catalog {
        Catalog::new(vec![
            Track {
                path: PathBuf::from("/m/0.mp3"),
                title: "First".to_string(),
                description: "Someone - Somewhere".to_string(),
                artwork: None,
                duration: Some(Duration::from_secs(90)),
            },
            Track {
                path: PathBuf::from("/m/1.mp3"),
                title: "Second".to_string(),
                description: String::new(),
                artwork: None,
                duration: None,
            },
        ])
        .unwrap()
    }

    #[test]
    fn mmss_pads_minutes_and_seconds() {
        assert_eq!(format_mmss(Duration::from_secs(0)), "00:00");
        assert_eq!(format_mmss(Duration::from_secs(65)), "01:05");
        assert_eq!(format_mmss(Duration::from_secs(3600)), "60:00");
    }

    #[test]
    fn time_text_follows_configured_fields() {
        let mut ui = UiSettings::default();
        ui.now_playing_time_fields = vec![TimeField::Elapsed, TimeField::Remaining];
        ui.now_playing_time_separator = " | ".to_string();

        let text = now_playing_time_text(
            Duration::from_secs(30),
            Some(Duration::from_secs(90)),
            &ui,
        );
        assert_eq!(text.as_deref(), Some("00:30 | -01:00"));
    }

    #[test]
    fn time_text_skips_total_when_duration_unknown() {
        let ui = UiSettings::default();
        let text = now_playing_time_text(Duration::from_secs(5), None, &ui);
        assert_eq!(text.as_deref(), Some("00:05"));
    }

    #[test]
    fn now_playing_line_reflects_status() {
        let catalog = test_catalog();
        let ui = UiSettings::default();

        let stopped = PlaybackState::initial();
        assert_eq!(
            now_playing_text(&catalog, &stopped, None, &ui),
            "nothing playing"
        );

        let playing = PlaybackState {
            track: 0,
            playing: true,
            duration: Duration::from_secs(90),
            position: Duration::from_secs(30),
        };
        assert_eq!(
            now_playing_text(&catalog, &playing, None, &ui),
            "[playing] First  00:30 / 01:30"
        );
    }

    #[test]
    fn errors_take_over_the_now_playing_line() {
        let catalog = test_catalog();
        let ui = UiSettings::default();
        let playing = PlaybackState {
            track: 0,
            playing: true,
            duration: Duration::from_secs(90),
            position: Duration::ZERO,
        };

        let text = now_playing_text(&catalog, &playing, Some("failed to load track 1"), &ui);
        assert_eq!(text, "!! failed to load track 1");
    }

    #[test]
    fn track_lines_mark_the_current_track() {
        let catalog = test_catalog();
        let playing = PlaybackState {
            track: 0,
            playing: true,
            duration: Duration::from_secs(90),
            position: Duration::ZERO,
        };

        assert!(track_line(&catalog, 0, &playing, true).starts_with("> "));
        assert!(track_line(&catalog, 1, &playing, false).starts_with("  "));

        let paused = PlaybackState {
            playing: false,
            ..playing
        };
        assert!(track_line(&catalog, 0, &paused, true).starts_with("= "));
    }
}
