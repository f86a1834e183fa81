//! Builds the one-line `Track.description` from tag fields.

use std::path::Path;

use crate::config::TrackField;

/// Join the configured fields into a description, skipping empty values.
pub(super) fn description_from_fields(
    path: &Path,
    title: &str,
    artist: Option<&str>,
    album: Option<&str>,
    fields: &[TrackField],
    separator: &str,
) -> String {
    let mut parts: Vec<String> = Vec::new();

    for f in fields {
        let value = match f {
            TrackField::Title => Some(title.trim().to_string()),
            TrackField::Artist => artist.map(str::trim).map(str::to_string),
            TrackField::Album => album.map(str::trim).map(str::to_string),
            TrackField::Filename => path
                .file_stem()
                .and_then(|s| s.to_str())
                .map(str::to_string),
            TrackField::Path => path.to_str().map(str::to_string),
        };
        if let Some(v) = value {
            if !v.is_empty() {
                parts.push(v);
            }
        }
    }

    parts.join(separator)
}
