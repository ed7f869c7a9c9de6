//! Track field normalization
//!
//! Assembles a [`CanonicalEvent`] from a record once identity and state are
//! known. Optional fields degrade to their "not provided" values; required
//! fields abort the build with the failing field's error.

use crate::coerce::{extract_int, extract_optional_int, optional_str, required_str};
use crate::record::{FieldValue, Record};
use sls_common::events::DEFAULT_SOURCE;
use sls_common::{AppIdentity, CanonicalEvent, Error, PlaybackState, Result};

pub const ARTIST: &str = "artist";
pub const ALBUM: &str = "album";
pub const ALBUM_ARTIST: &str = "albumartist";
pub const TRACK: &str = "track";
pub const DURATION: &str = "duration";
pub const TRACK_NUMBER: &str = "track-number";
pub const MBID: &str = "mbid";
pub const SOURCE: &str = "source";

/// Album values that players send when they have no album
const ALBUM_PLACEHOLDERS: &[&str] = &["Unknown album", "Unknown"];

/// Album-artist values that players send when they have no album artist
const ALBUM_ARTIST_PLACEHOLDERS: &[&str] = &["Unknown album", "Unknown", "Unknown albumArtist"];

/// Strip placeholder / missing values to `""`
///
/// Comparison is exact and case-sensitive.
fn strip_placeholder(value: Option<&FieldValue>, placeholders: &[&str]) -> String {
    match value.and_then(FieldValue::as_str) {
        Some(s) if !placeholders.contains(&s) => s.to_string(),
        _ => String::new(),
    }
}

/// Normalized album name, `""` when absent or a placeholder
pub fn normalize_album(value: Option<&FieldValue>) -> String {
    strip_placeholder(value, ALBUM_PLACEHOLDERS)
}

/// Normalized album artist, `""` when absent or a placeholder
pub fn normalize_album_artist(value: Option<&FieldValue>) -> String {
    strip_placeholder(value, ALBUM_ARTIST_PLACEHOLDERS)
}

/// Build the canonical event for `record`
///
/// The event timestamp is the wall clock at build time; the record is never
/// consulted for it.
pub fn normalize_track(
    record: &Record,
    app: AppIdentity,
    state: PlaybackState,
) -> Result<CanonicalEvent> {
    let artist = required_str(record, ARTIST)?;
    let track = required_str(record, TRACK)?;

    let duration = extract_int(record, DURATION, true)?;
    let duration_secs = u32::try_from(duration).map_err(|_| {
        Error::coercion(
            DURATION,
            "non-negative integer",
            format!("{} seconds", duration),
        )
    })?;

    let track_number = extract_optional_int(record, TRACK_NUMBER)?.map(|n| n.to_string());
    let music_id = optional_str(record, MBID).map(str::to_string);
    let source = optional_str(record, SOURCE).unwrap_or(DEFAULT_SOURCE);

    CanonicalEvent::builder()
        .app(app)
        .state(state)
        .artist(artist)
        .track(track)
        .album(normalize_album(record.get(ALBUM)))
        .album_artist(normalize_album_artist(record.get(ALBUM_ARTIST)))
        .duration_secs(duration_secs)
        .track_number(track_number)
        .music_id(music_id)
        .source(source)
        .build()
}
