//! Canonical scrobble event and its builder

use crate::{time, Error, PlaybackState, Result};
use serde::Serialize;

/// Source tag used when a notification does not name one ("P" = chosen by user)
pub const DEFAULT_SOURCE: &str = "P";

/// Identity of the application that emitted a notification
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct AppIdentity {
    display_name: String,
    package_id: String,
}

impl AppIdentity {
    /// Create an identity, rejecting empty name or package
    pub fn new(display_name: impl Into<String>, package_id: impl Into<String>) -> Result<Self> {
        let display_name = display_name.into();
        let package_id = package_id.into();

        if display_name.is_empty() {
            return Err(Error::IdentityResolution(format!(
                "empty application name for package '{}'",
                package_id
            )));
        }
        if package_id.is_empty() {
            return Err(Error::IdentityResolution(format!(
                "empty package id for application '{}'",
                display_name
            )));
        }

        Ok(Self {
            display_name,
            package_id,
        })
    }

    /// Human-readable application label
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Package / bundle identifier
    pub fn package_id(&self) -> &str {
        &self.package_id
    }
}

/// Validated, normalized playback notification
///
/// Fields are private: an event can only be obtained from
/// [`CanonicalEventBuilder::build`], which enforces the required fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CanonicalEvent {
    app: AppIdentity,
    timestamp_utc: i64,
    artist: String,
    track: String,
    album: String,
    album_artist: String,
    duration_secs: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    track_number: Option<String>,
    music_id: Option<String>,
    source: String,
    state: PlaybackState,
}

impl CanonicalEvent {
    /// Start building an event
    pub fn builder() -> CanonicalEventBuilder {
        CanonicalEventBuilder::default()
    }

    pub fn app(&self) -> &AppIdentity {
        &self.app
    }

    /// Processing time in seconds since the Unix epoch (UTC)
    pub fn timestamp_utc(&self) -> i64 {
        self.timestamp_utc
    }

    pub fn artist(&self) -> &str {
        &self.artist
    }

    pub fn track(&self) -> &str {
        &self.track
    }

    /// Album name, `""` when not provided
    pub fn album(&self) -> &str {
        &self.album
    }

    /// Album artist, `""` when not provided
    pub fn album_artist(&self) -> &str {
        &self.album_artist
    }

    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    /// Track number as decimal text, `None` when not provided
    pub fn track_number(&self) -> Option<&str> {
        self.track_number.as_deref()
    }

    /// MusicBrainz identifier, passed through unvalidated
    pub fn music_id(&self) -> Option<&str> {
        self.music_id.as_deref()
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }
}

/// Builder for [`CanonicalEvent`]
///
/// Optional fields start at their "not provided" defaults. The timestamp is
/// taken from the wall clock when [`build`](Self::build) runs.
#[derive(Debug, Clone, Default)]
pub struct CanonicalEventBuilder {
    app: Option<AppIdentity>,
    artist: Option<String>,
    track: Option<String>,
    album: String,
    album_artist: String,
    duration_secs: Option<u32>,
    track_number: Option<String>,
    music_id: Option<String>,
    source: Option<String>,
    state: Option<PlaybackState>,
}

impl CanonicalEventBuilder {
    pub fn app(mut self, app: AppIdentity) -> Self {
        self.app = Some(app);
        self
    }

    pub fn artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = Some(artist.into());
        self
    }

    pub fn track(mut self, track: impl Into<String>) -> Self {
        self.track = Some(track.into());
        self
    }

    pub fn album(mut self, album: impl Into<String>) -> Self {
        self.album = album.into();
        self
    }

    pub fn album_artist(mut self, album_artist: impl Into<String>) -> Self {
        self.album_artist = album_artist.into();
        self
    }

    pub fn duration_secs(mut self, duration_secs: u32) -> Self {
        self.duration_secs = Some(duration_secs);
        self
    }

    pub fn track_number(mut self, track_number: Option<String>) -> Self {
        self.track_number = track_number;
        self
    }

    pub fn music_id(mut self, music_id: Option<String>) -> Self {
        self.music_id = music_id;
        self
    }

    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn state(mut self, state: PlaybackState) -> Self {
        self.state = Some(state);
        self
    }

    /// Validate required fields and stamp the event with the current time
    ///
    /// # Errors
    /// - [`Error::IdentityResolution`] if no app identity was set
    /// - [`Error::MissingField`] if artist, track, duration or state is
    ///   missing, or artist/track is empty
    pub fn build(self) -> Result<CanonicalEvent> {
        let app = self
            .app
            .ok_or_else(|| Error::IdentityResolution("no application identity".to_string()))?;
        let artist = non_empty(self.artist, "artist")?;
        let track = non_empty(self.track, "track")?;
        let duration_secs = self
            .duration_secs
            .ok_or_else(|| Error::MissingField("duration".to_string()))?;
        let state = self
            .state
            .ok_or_else(|| Error::MissingField("state".to_string()))?;

        Ok(CanonicalEvent {
            app,
            timestamp_utc: time::now_unix_secs(),
            artist,
            track,
            album: self.album,
            album_artist: self.album_artist,
            duration_secs,
            track_number: self.track_number,
            music_id: self.music_id,
            source: self.source.unwrap_or_else(|| DEFAULT_SOURCE.to_string()),
            state,
        })
    }
}

fn non_empty(value: Option<String>, field: &str) -> Result<String> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(Error::MissingField(field.to_string())),
    }
}
