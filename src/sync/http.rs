//! HTTP client for the annotation store.

use std::time::Duration;

use crate::err::SyncError;

use super::{AnnotationUpdate, Transport};

/// Posts updates as JSON to the annotation store endpoint.
#[derive(Debug)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl HttpTransport {
    /// Construct with the endpoint URL and per-request `timeout`.
    ///
    /// Must not be called from within an async runtime.
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, SyncError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }
}

impl Transport for HttpTransport {
    fn apply_updates(&self, update: &AnnotationUpdate) -> Result<(), SyncError> {
        tracing::debug!(
            "POST {} {} {} = {}",
            &self.endpoint,
            &update.file,
            &update.signature,
            update.present
        );
        let response = self
            .client
            .post(&self.endpoint)
            .json(&update.request())
            .send()?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(SyncError::Status(status.as_u16()))
        }
    }
}
