//! Playback-related type definitions

use serde::{Deserialize, Serialize};

/// Canonical playback state of a scrobble event
///
/// Each notification carries exactly one state; sequencing across
/// notifications belongs to the submission pipeline.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlaybackState {
    /// A new track started playing
    Start,
    /// Playback of the current track resumed
    Resume,
    /// Playback of the current track paused
    Pause,
    /// The current track finished
    Complete,
}

impl PlaybackState {
    /// All states, ordered by wire code
    pub const ALL: [PlaybackState; 4] = [
        PlaybackState::Start,
        PlaybackState::Resume,
        PlaybackState::Pause,
        PlaybackState::Complete,
    ];

    /// Wire code used by emitting applications
    pub fn code(self) -> i32 {
        match self {
            PlaybackState::Start => 0,
            PlaybackState::Resume => 1,
            PlaybackState::Pause => 2,
            PlaybackState::Complete => 3,
        }
    }
}

impl std::fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlaybackState::Start => write!(f, "START"),
            PlaybackState::Resume => write!(f, "RESUME"),
            PlaybackState::Pause => write!(f, "PAUSE"),
            PlaybackState::Complete => write!(f, "COMPLETE"),
        }
    }
}
