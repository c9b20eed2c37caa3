//! Error types shared across the crate.

use crate::mutations::load::Payload;

/// Failure to fetch the raw text of a single payload.
#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Failure to load one of the three input payloads.
///
/// Any such failure is fatal to initialization; there is no partial view.
#[derive(thiserror::Error, Debug)]
#[error("could not load {payload} payload from {location:?}")]
pub struct LoadError {
    /// Which payload failed.
    pub payload: Payload,
    /// Path or URL the payload was fetched from.
    pub location: String,
    /// The underlying failure.
    #[source]
    pub source: FetchError,
}

/// Failure to apply an annotation update on the remote store.
#[derive(thiserror::Error, Debug)]
pub enum SyncError {
    #[error("HTTP transport failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("annotation store rejected update with status {0}")]
    Status(u16),
}

/// Failure of a session command.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("no row {0} in current view")]
    UnknownRow(usize),
    #[error("no record with signature {0:?}")]
    UnknownSignature(String),
    #[error("session state is poisoned")]
    Poisoned,
}
