//! Newline-delimited JSON notification stream
//!
//! Each input line is one notification:
//!
//! ```json
//! {"action": "com.adam.aslfms.notify.playstatechanged", "extras": {"state": 0, "artist": "..."}}
//! ```
//!
//! `action` is optional and defaults to the caller-supplied action. Accepted
//! events are written to the output as one JSON object per line.

use crate::ingestor::{Ingestor, ScrobbleSink};
use crate::record::Record;
use serde::Deserialize;
use sls_common::{CanonicalEvent, Error, Result};
use std::io::{BufRead, Write};
use std::sync::Mutex;
use tracing::{debug, error, warn};

/// One delivered notification
#[derive(Debug, Clone, Deserialize)]
pub struct Notification {
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub extras: Record,
}

/// Counts for one processed stream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamSummary {
    pub accepted: usize,
    pub rejected: usize,
    /// Lines that were not valid notification JSON
    pub malformed: usize,
}

/// Sink writing each event as a JSON line
///
/// The first write failure closes the sink: later events are dropped and the
/// failure is reported by [`finish`](Self::finish).
pub struct JsonLinesSink<W: Write + Send> {
    out: Mutex<W>,
    failure: Mutex<Option<std::io::Error>>,
}

impl<W: Write + Send> JsonLinesSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
            failure: Mutex::new(None),
        }
    }

    fn write_event(&self, event: &CanonicalEvent) -> std::io::Result<()> {
        let mut out = self
            .out
            .lock()
            .map_err(|_| std::io::Error::other("output lock poisoned"))?;
        serde_json::to_writer(&mut *out, event)?;
        out.write_all(b"\n")
    }

    /// Flush the output and return it, or the first write failure
    pub fn finish(self) -> Result<W> {
        if let Some(e) = self.failure.into_inner().ok().flatten() {
            return Err(Error::Io(e));
        }
        let mut out = self
            .out
            .into_inner()
            .map_err(|_| Error::Io(std::io::Error::other("output lock poisoned")))?;
        out.flush()?;
        Ok(out)
    }
}

impl<W: Write + Send> ScrobbleSink for JsonLinesSink<W> {
    fn submit(&self, event: CanonicalEvent) {
        if self.is_closed() {
            return;
        }
        if let Err(e) = self.write_event(&event) {
            error!(error = %e, "Failed to write event");
            if let Ok(mut failure) = self.failure.lock() {
                failure.get_or_insert(e);
            }
        }
    }

    fn is_closed(&self) -> bool {
        self.failure.lock().map_or(true, |failure| failure.is_some())
    }
}

/// Ingest every notification read from `input`, submitting accepted events to `sink`
///
/// Rejected and malformed lines are logged and counted. An I/O failure on
/// `input` fails the stream; a closed sink ends it, and the event that found
/// the sink closed is not counted.
pub fn process_stream<R: BufRead>(
    ingestor: &Ingestor,
    input: R,
    default_action: &str,
    sink: &dyn ScrobbleSink,
) -> Result<StreamSummary> {
    let mut summary = StreamSummary::default();

    for (index, line) in input.lines().enumerate() {
        let line = line?;
        let line_no = index + 1;
        if line.trim().is_empty() {
            continue;
        }

        let notification: Notification = match serde_json::from_str(&line) {
            Ok(n) => n,
            Err(e) => {
                warn!(line = line_no, error = %e, "Malformed notification");
                summary.malformed += 1;
                continue;
            }
        };

        let action = notification.action.as_deref().unwrap_or(default_action);
        match ingestor.ingest_and_submit(action, &notification.extras, sink) {
            Ok(()) if sink.is_closed() => {
                warn!(line = line_no, "Output closed, stopping");
                break;
            }
            Ok(()) => summary.accepted += 1,
            Err(e) if e.is_record_failure() => {
                debug!(line = line_no, error = %e, "Skipping notification");
                summary.rejected += 1;
            }
            Err(e) => return Err(e),
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::{MarkerTable, StaticAppRegistry};
    use crate::receiver::SLS_API_ACTION;
    use std::io::Cursor;
    use std::sync::Arc;

    fn ingestor() -> Ingestor {
        Ingestor::with_sls_api(Arc::new(StaticAppRegistry::new()), MarkerTable::builtin())
    }

    /// Accepts whole lines until `ok_lines` newlines have been written
    struct FailAfterLines {
        ok_lines: usize,
    }

    impl Write for FailAfterLines {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            if self.ok_lines == 0 {
                return Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"));
            }
            self.ok_lines -= buf.iter().filter(|b| **b == b'\n').count();
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    const GOOD: &str = r#"{"extras": {"app-name": "TestPlayer", "app-package": "com.test.player", "state": 0, "artist": "Radiohead", "track": "Idioteque", "duration": 262}}"#;

    #[test]
    fn test_counts_each_outcome() {
        let input = format!(
            "{}\n\n{}\nnot json\n{}\n",
            GOOD,
            r#"{"extras": {"state": 9}}"#,
            r#"{"action": "com.other", "extras": {}}"#
        );
        let sink = JsonLinesSink::new(Vec::new());

        let summary =
            process_stream(&ingestor(), Cursor::new(input), SLS_API_ACTION, &sink).unwrap();

        assert_eq!(
            summary,
            StreamSummary {
                accepted: 1,
                rejected: 2,
                malformed: 1
            }
        );
        let out = String::from_utf8(sink.finish().unwrap()).unwrap();
        assert_eq!(out.lines().count(), 1);
    }

    #[test]
    fn test_output_lines_are_events() {
        let sink = JsonLinesSink::new(Vec::new());
        process_stream(&ingestor(), Cursor::new(GOOD), SLS_API_ACTION, &sink).unwrap();

        let out = sink.finish().unwrap();
        let event: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(event["artist"], "Radiohead");
        assert_eq!(event["state"], "START");
        assert_eq!(event["duration_secs"], 262);
    }

    #[test]
    fn test_write_failure_stops_stream() {
        let input = format!("{}\n{}\n{}\n", GOOD, GOOD, GOOD);
        let sink = JsonLinesSink::new(FailAfterLines { ok_lines: 1 });

        let summary =
            process_stream(&ingestor(), Cursor::new(input), SLS_API_ACTION, &sink).unwrap();

        assert_eq!(summary.accepted, 1);
        assert!(sink.is_closed());
        assert!(matches!(sink.finish(), Err(Error::Io(_))));
    }

    #[test]
    fn test_closed_sink_drops_events() {
        let sink = JsonLinesSink::new(FailAfterLines { ok_lines: 0 });
        let event = ingestor()
            .ingest(SLS_API_ACTION, &serde_json::from_str::<Notification>(GOOD).unwrap().extras)
            .unwrap();

        assert!(!sink.is_closed());
        sink.submit(event.clone());
        assert!(sink.is_closed());
        sink.submit(event);
        assert!(matches!(sink.finish(), Err(Error::Io(_))));
    }

    #[test]
    fn test_explicit_action_must_match() {
        let line = GOOD.replacen('{', r#"{"action": "com.adam.aslfms.notify.playstatechanged", "#, 1);
        let sink = JsonLinesSink::new(Vec::new());
        let summary =
            process_stream(&ingestor(), Cursor::new(line), "unused.default", &sink).unwrap();

        assert_eq!(summary.accepted, 1);
    }
}
