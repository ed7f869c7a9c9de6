//! # SLS Common Library
//!
//! Shared code for the scrobbler ingestion crates including:
//! - Error taxonomy for rejected playback notifications
//! - Canonical event types (playback state, app identity, scrobble track)
//! - Configuration loading
//! - Timestamp utilities

pub mod config;
pub mod error;
pub mod events;
pub mod time;

pub use error::{Error, Result};
pub use events::{AppIdentity, CanonicalEvent, CanonicalEventBuilder, PlaybackState};
