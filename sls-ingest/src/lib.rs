//! sls-ingest library - playback notification ingestion
//!
//! Normalizes loosely typed play-status notifications from third-party media
//! players into [`CanonicalEvent`]s:
//! - `coerce` - integer/string coercion of heterogeneous field encodings
//! - `identity` - emitting-application resolution (marker table + explicit fields)
//! - `state` - status code to playback state
//! - `normalizer` - track field sanitization and defaulting
//! - `receiver` - per-application-family record parsers
//! - `ingestor` - action dispatch and hand-off to the submission sink

pub mod coerce;
pub mod identity;
pub mod ingestor;
pub mod normalizer;
pub mod notification;
pub mod receiver;
pub mod record;
pub mod state;

pub use identity::{AppRegistry, MarkerTable, RegistryError, StaticAppRegistry};
pub use ingestor::{Ingestor, ScrobbleSink};
pub use receiver::{PlayStatusReceiver, SlsApiReceiver, SLS_API_ACTION};
pub use record::{FieldValue, Record};
pub use sls_common::{AppIdentity, CanonicalEvent, Error, PlaybackState, Result};

use sls_common::config::TomlConfig;
use std::sync::Arc;
use tracing::info;

/// Build the standard ingestor from configuration
///
/// The registry is populated from `[applications]`; `[markers]` entries are
/// added to the built-in marker table.
pub fn build_ingestor(config: &TomlConfig) -> Ingestor {
    let registry = StaticAppRegistry::from(config.applications.clone());
    if registry.is_empty() {
        info!("No applications configured; marker identities fall back to explicit fields");
    } else {
        info!("Known applications: {}", registry.len());
    }
    let markers = MarkerTable::builtin().extended(config.markers.clone());
    Ingestor::with_sls_api(Arc::new(registry), markers)
}
