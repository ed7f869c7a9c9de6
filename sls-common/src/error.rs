//! Common error types for SLS ingestion

use thiserror::Error;

/// Common result type for SLS operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across SLS crates
///
/// The first four variants are the record-failure taxonomy: each one is
/// terminal for the notification being processed.
#[derive(Error, Debug)]
pub enum Error {
    /// Required field absent from the record (or explicitly null/empty)
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// Field present but not interpretable as the required type
    #[error("Field '{field}' is not a valid {expected}: {detail}")]
    TypeCoercion {
        field: String,
        expected: &'static str,
        detail: String,
    },

    /// Playback state code outside 0..=3
    #[error("Unknown playback state code: {0}")]
    UnknownState(i32),

    /// Neither the marker table nor explicit fields produced an app identity
    #[error("Could not resolve emitting application: {0}")]
    IdentityResolution(String),

    /// No receiver is registered for the notification action
    #[error("Unsupported notification action: {0}")]
    UnsupportedAction(String),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Build a [`Error::TypeCoercion`] for `field`
    pub fn coercion(field: &str, expected: &'static str, detail: impl Into<String>) -> Self {
        Error::TypeCoercion {
            field: field.to_string(),
            expected,
            detail: detail.into(),
        }
    }

    /// True for failures caused by the content of a single record
    ///
    /// Callers use this to decide between dropping one notification and
    /// aborting the whole run.
    pub fn is_record_failure(&self) -> bool {
        matches!(
            self,
            Error::MissingField(_)
                | Error::TypeCoercion { .. }
                | Error::UnknownState(_)
                | Error::IdentityResolution(_)
                | Error::UnsupportedAction(_)
        )
    }
}
