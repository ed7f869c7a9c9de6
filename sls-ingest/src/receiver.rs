//! Play-status receivers
//!
//! Each source-application family publishes notifications under its own
//! action name and with its own field conventions. A receiver turns one such
//! notification into a [`CanonicalEvent`]; the [`Ingestor`](crate::Ingestor)
//! picks the receiver by action.

use crate::coerce::extract_int;
use crate::identity::{resolve_identity, AppRegistry, MarkerTable};
use crate::normalizer::normalize_track;
use crate::record::Record;
use crate::state::{map_state, STATE};
use sls_common::{CanonicalEvent, Result};

/// Action name of the Simple Last.fm Scrobbler developer API
pub const SLS_API_ACTION: &str = "com.adam.aslfms.notify.playstatechanged";

/// Parses notifications of one source-application family
pub trait PlayStatusReceiver: Send + Sync {
    /// Notification action handled by this receiver
    fn action(&self) -> &str;

    /// Convert one record into a canonical event
    fn parse_record(&self, record: &Record, registry: &dyn AppRegistry) -> Result<CanonicalEvent>;
}

/// Receiver for the Simple Last.fm Scrobbler API
///
/// Sequence: identity, then state, then track fields. The first failure
/// aborts the record.
#[derive(Debug, Clone, Default)]
pub struct SlsApiReceiver {
    markers: MarkerTable,
}

impl SlsApiReceiver {
    /// Receiver with the built-in marker table
    pub fn new() -> Self {
        Self::default()
    }

    /// Receiver with a custom marker table
    pub fn with_markers(markers: MarkerTable) -> Self {
        Self { markers }
    }

    pub fn markers(&self) -> &MarkerTable {
        &self.markers
    }
}

impl PlayStatusReceiver for SlsApiReceiver {
    fn action(&self) -> &str {
        SLS_API_ACTION
    }

    fn parse_record(&self, record: &Record, registry: &dyn AppRegistry) -> Result<CanonicalEvent> {
        let app = resolve_identity(record, &self.markers, registry)?;
        let state = map_state(extract_int(record, STATE, true)?)?;
        normalize_track(record, app, state)
    }
}
