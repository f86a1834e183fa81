use std::path::{Path, PathBuf};
use std::time::Duration;

use lofty::prelude::{AudioFile, ItemKey, TaggedFileExt};
use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::describe::description_from_fields;
use super::model::Track;

/// Sidecar image names checked (in order) when looking for cover art.
const ARTWORK_CANDIDATES: &[&str] = &["cover.jpg", "cover.png", "folder.jpg", "front.jpg"];

fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
    let exts: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

pub(super) fn find_artwork(track_path: &Path) -> Option<PathBuf> {
    let dir = track_path.parent()?;
    ARTWORK_CANDIDATES
        .iter()
        .map(|name| dir.join(name))
        .find(|p| p.is_file())
}

/// Scan `dir` for audio files and build the track list in display order.
pub fn scan(dir: &Path, settings: &LibrarySettings) -> Vec<Track> {
    let mut tracks: Vec<Track> = Vec::new();

    let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    for entry in walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(Result::ok)
    {
        let path = entry.path();
        if path.is_file()
            && (settings.include_hidden || !is_hidden(path))
            && is_audio_file(path, settings)
        {
            let default_title = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("UNKNOWN")
                .to_string();

            let mut title = default_title;
            let mut artist: Option<String> = None;
            let mut album: Option<String> = None;
            let mut duration: Option<Duration> = None;

            if let Ok(tagged) = lofty::read_from_path(path) {
                duration = Some(tagged.properties().duration());

                if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
                    if let Some(v) = tag.get_string(&ItemKey::TrackTitle) {
                        if !v.trim().is_empty() {
                            title = v.to_string();
                        }
                    }
                    if let Some(v) = tag.get_string(&ItemKey::TrackArtist) {
                        let v = v.trim();
                        if !v.is_empty() {
                            artist = Some(v.to_string());
                        }
                    }
                    if let Some(v) = tag.get_string(&ItemKey::AlbumTitle) {
                        let v = v.trim();
                        if !v.is_empty() {
                            album = Some(v.to_string());
                        }
                    }
                }
            }

            let description = description_from_fields(
                path,
                &title,
                artist.as_deref(),
                album.as_deref(),
                &settings.description_fields,
                &settings.description_separator,
            );

            tracks.push(Track {
                path: path.to_path_buf(),
                title,
                description,
                artwork: find_artwork(path),
                duration,
            });
        }
    }

    tracks.sort_by(|a, b| a.title.to_lowercase().cmp(&b.title.to_lowercase()));
    tracks
}
