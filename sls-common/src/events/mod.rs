//! Event types produced by the ingestion layer
//!
//! A [`CanonicalEvent`] is the validated, normalized form of one playback
//! notification and is what the submission pipeline consumes.

// Sub-modules (supporting types)
mod playback_types;
mod track_types;

pub use playback_types::PlaybackState;
pub use track_types::{AppIdentity, CanonicalEvent, CanonicalEventBuilder, DEFAULT_SOURCE};
