//! Ingestion orchestrator
//!
//! Selects the receiver for a notification's action, runs it over the record
//! and hands the resulting event to the submission sink. Nothing is retried
//! and no state is kept between calls, so one `Ingestor` can serve concurrent
//! notifications through `&self`.

use crate::identity::{AppRegistry, MarkerTable};
use crate::receiver::{PlayStatusReceiver, SlsApiReceiver};
use crate::record::Record;
use sls_common::{CanonicalEvent, Error, Result};
use std::sync::Arc;
use tracing::{debug, warn};

/// Submission collaborator that accepts canonical events
pub trait ScrobbleSink: Send + Sync {
    /// Take ownership of one accepted event
    fn submit(&self, event: CanonicalEvent);

    /// True once the sink can no longer deliver events
    fn is_closed(&self) -> bool {
        false
    }
}

impl<F> ScrobbleSink for F
where
    F: Fn(CanonicalEvent) + Send + Sync,
{
    fn submit(&self, event: CanonicalEvent) {
        self(event)
    }
}

/// Dispatches notifications to their receivers
pub struct Ingestor {
    receivers: Vec<Box<dyn PlayStatusReceiver>>,
    registry: Arc<dyn AppRegistry>,
}

impl Ingestor {
    /// Ingestor without receivers
    pub fn new(registry: Arc<dyn AppRegistry>) -> Self {
        Self {
            receivers: Vec::new(),
            registry,
        }
    }

    /// Ingestor with the SLS API receiver using `markers`
    pub fn with_sls_api(registry: Arc<dyn AppRegistry>, markers: MarkerTable) -> Self {
        Self::new(registry).register(SlsApiReceiver::with_markers(markers))
    }

    /// Add a receiver; a later receiver for the same action replaces the earlier one
    pub fn register(mut self, receiver: impl PlayStatusReceiver + 'static) -> Self {
        self.receivers.retain(|r| r.action() != receiver.action());
        self.receivers.push(Box::new(receiver));
        self
    }

    /// Actions this ingestor accepts
    pub fn actions(&self) -> impl Iterator<Item = &str> {
        self.receivers.iter().map(|r| r.action())
    }

    /// Turn one notification into a canonical event
    ///
    /// # Errors
    /// - [`Error::UnsupportedAction`] if no receiver handles `action`
    /// - the receiver's record failure otherwise
    pub fn ingest(&self, action: &str, record: &Record) -> Result<CanonicalEvent> {
        let receiver = self
            .receivers
            .iter()
            .find(|r| r.action() == action)
            .ok_or_else(|| Error::UnsupportedAction(action.to_string()))?;

        match receiver.parse_record(record, self.registry.as_ref()) {
            Ok(event) => {
                debug!(
                    action,
                    package = event.app().package_id(),
                    state = %event.state(),
                    artist = event.artist(),
                    track = event.track(),
                    "Notification accepted"
                );
                Ok(event)
            }
            Err(e) => {
                warn!(action, fields = record.len(), error = %e, "Notification rejected");
                Err(e)
            }
        }
    }

    /// Ingest one notification and hand the event to `sink`
    ///
    /// The sink is only called for accepted notifications, exactly once.
    pub fn ingest_and_submit(
        &self,
        action: &str,
        record: &Record,
        sink: &dyn ScrobbleSink,
    ) -> Result<()> {
        let event = self.ingest(action, record)?;
        sink.submit(event);
        Ok(())
    }
}
