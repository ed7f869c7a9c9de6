//! Emitting-application identity resolution
//!
//! Two paths, tried in order:
//! 1. **Marker path** - some players announce themselves only through the
//!    presence of a marker field. The [`MarkerTable`] maps the marker to a
//!    package id and the [`AppRegistry`] supplies the display label.
//! 2. **Explicit path** - the `app-name` and `app-package` string fields.
//!
//! The marker path falls through to the explicit path whenever the registry
//! lookup fails.

use crate::coerce::optional_str;
use crate::record::Record;
use sls_common::{AppIdentity, Error, Result};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Record field carrying the application display name
pub const APP_NAME: &str = "app-name";
/// Record field carrying the application package id
pub const APP_PACKAGE: &str = "app-package";

/// Built-in marker entries: (marker field, package id)
const BUILTIN_MARKERS: &[(&str, &str)] = &[
    // GoneMAD Music Player sends its package name as a bare key
    ("gonemad.gmmp", "gonemad.gmmp"),
];

// ============================================================================
// Application registry
// ============================================================================

/// Failure of a registry lookup
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Package is not installed / not known
    #[error("package not found: {0}")]
    NameNotFound(String),

    /// The registry could not be queried
    #[error("application registry unavailable: {0}")]
    Unavailable(String),
}

/// Platform application registry
///
/// Resolves a package id to the application's human-readable label.
pub trait AppRegistry: Send + Sync {
    fn application_label(&self, package_id: &str) -> std::result::Result<String, RegistryError>;
}

/// In-memory registry populated from configuration
#[derive(Debug, Clone, Default)]
pub struct StaticAppRegistry {
    labels: HashMap<String, String>,
}

impl StaticAppRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style registration of one application
    pub fn with_app(mut self, package_id: impl Into<String>, label: impl Into<String>) -> Self {
        self.labels.insert(package_id.into(), label.into());
        self
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl From<BTreeMap<String, String>> for StaticAppRegistry {
    fn from(labels: BTreeMap<String, String>) -> Self {
        Self {
            labels: labels.into_iter().collect(),
        }
    }
}

impl AppRegistry for StaticAppRegistry {
    fn application_label(&self, package_id: &str) -> std::result::Result<String, RegistryError> {
        self.labels
            .get(package_id)
            .cloned()
            .ok_or_else(|| RegistryError::NameNotFound(package_id.to_string()))
    }
}

// ============================================================================
// Marker table
// ============================================================================

/// One marker-field special case
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerEntry {
    /// Record key whose presence identifies the application
    pub marker: String,
    /// Package id of that application
    pub package_id: String,
}

/// Ordered table of marker-field special cases
///
/// The first entry whose marker is present in a record wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerTable {
    entries: Vec<MarkerEntry>,
}

impl MarkerTable {
    /// Table without any entries
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Table with the built-in entries
    pub fn builtin() -> Self {
        BUILTIN_MARKERS
            .iter()
            .fold(Self::empty(), |table, (marker, package)| {
                table.with_entry(*marker, *package)
            })
    }

    /// Append an entry; an existing entry for the same marker is replaced in place
    pub fn with_entry(mut self, marker: impl Into<String>, package_id: impl Into<String>) -> Self {
        let entry = MarkerEntry {
            marker: marker.into(),
            package_id: package_id.into(),
        };
        match self.entries.iter_mut().find(|e| e.marker == entry.marker) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
        self
    }

    /// Add every `(marker, package)` pair
    pub fn extended<I, K, V>(self, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        entries
            .into_iter()
            .fold(self, |table, (marker, package)| table.with_entry(marker, package))
    }

    pub fn entries(&self) -> &[MarkerEntry] {
        &self.entries
    }

    /// Package id of the first marker present in `record`
    pub fn match_record(&self, record: &Record) -> Option<&MarkerEntry> {
        self.entries.iter().find(|e| record.contains_key(&e.marker))
    }
}

impl Default for MarkerTable {
    fn default() -> Self {
        Self::builtin()
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Determine the emitting application of `record`
///
/// # Errors
/// [`Error::IdentityResolution`] when neither the marker path nor the
/// explicit fields yield a non-empty name and package.
pub fn resolve_identity(
    record: &Record,
    markers: &MarkerTable,
    registry: &dyn AppRegistry,
) -> Result<AppIdentity> {
    if let Some(entry) = markers.match_record(record) {
        match registry.application_label(&entry.package_id) {
            Ok(label) if !label.is_empty() => {
                return AppIdentity::new(label, entry.package_id.as_str());
            }
            Ok(_) => {
                debug!(
                    marker = %entry.marker,
                    package = %entry.package_id,
                    "Registry returned empty label, falling back to explicit fields"
                );
            }
            Err(e) => {
                debug!(
                    marker = %entry.marker,
                    package = %entry.package_id,
                    error = %e,
                    "Marker lookup failed, falling back to explicit fields"
                );
            }
        }
    }

    let name = optional_str(record, APP_NAME).unwrap_or_default();
    let package = optional_str(record, APP_PACKAGE).unwrap_or_default();

    if name.is_empty() || package.is_empty() {
        return Err(Error::IdentityResolution(format!(
            "no registered marker and missing '{}'/'{}' (name={:?}, package={:?})",
            APP_NAME, APP_PACKAGE, name, package
        )));
    }

    AppIdentity::new(name, package)
}
