//! Propagation of annotation changes to the external annotation store.
//!
//! The in-memory annotation sets are the source of truth.  Every toggle
//! produces one `AnnotationUpdate` that is handed to an `UpdateSink` without
//! waiting for the outcome.

use std::time::Duration;

use indexmap::IndexMap;

use crate::{
    conf::SyncConf,
    err::SyncError,
    mutations::{annos::AnnotationList, schema::Signature},
};

pub mod http;
pub mod queue;

/// A single-key membership change of one annotation list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationUpdate {
    /// The list that changed.
    pub list: AnnotationList,
    /// Identifier of the file backing the list in the store.
    pub file: String,
    /// The changed signature.
    pub signature: Signature,
    /// The new membership.
    pub present: bool,
}

/// Wire format of `applyUpdates` requests.
#[derive(Debug, serde::Serialize)]
pub struct UpdateRequest<'a> {
    pub file: &'a str,
    pub updates: IndexMap<&'a Signature, bool>,
}

impl AnnotationUpdate {
    /// The request body for the annotation store.
    pub fn request(&self) -> UpdateRequest<'_> {
        UpdateRequest {
            file: &self.file,
            updates: IndexMap::from([(&self.signature, self.present)]),
        }
    }
}

/// Receiver of annotation updates.
///
/// Submission is fire-and-forget: the caller has already applied the change
/// locally and never observes the outcome.
pub trait UpdateSink {
    fn submit(&self, update: AnnotationUpdate);

    /// Updates that could not be delivered to the store.
    fn unsynced(&self) -> Vec<queue::Unsynced> {
        Vec::new()
    }

    /// Number of updates not yet confirmed by the store.
    fn pending(&self) -> usize {
        0
    }

    /// Latest membership of every key not yet confirmed by the store.
    ///
    /// Re-applied when annotation lists are reloaded so that the reloaded
    /// sets do not revert changes still on their way to the store.
    fn pending_updates(&self) -> Vec<PendingUpdate> {
        Vec::new()
    }
}

/// Membership of one key that the store has not confirmed yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingUpdate {
    pub list: AnnotationList,
    pub signature: Signature,
    pub present: bool,
}

/// Remote annotation store.
pub trait Transport {
    /// Apply `update` on the store.  The acknowledgement is not inspected.
    fn apply_updates(&self, update: &AnnotationUpdate) -> Result<(), SyncError>;
}

/// Sink used when no annotation store is configured; updates are only logged.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl UpdateSink for LogSink {
    fn submit(&self, update: AnnotationUpdate) {
        tracing::info!(
            "no annotation store configured, not persisting {} {} = {}",
            update.list,
            &update.signature,
            update.present
        );
    }
}

/// Sink shared between request handlers.
pub type SharedSink = Box<dyn UpdateSink + Send + Sync>;

/// Build the sink configured in `conf`.
///
/// Without an endpoint, updates are only logged.  Must not be called from
/// within an async runtime.
pub fn sink_from_conf(conf: &SyncConf) -> Result<SharedSink, anyhow::Error> {
    match &conf.endpoint {
        Some(endpoint) => {
            tracing::info!("persisting annotation updates to {}", endpoint);
            let transport =
                http::HttpTransport::new(endpoint, Duration::from_secs(conf.timeout_secs))?;
            let settings = queue::RetrySettings {
                max_attempts: conf.max_attempts,
                retry_delay: Duration::from_millis(conf.retry_delay_ms),
            };
            Ok(Box::new(queue::SyncQueue::start(transport, settings)?))
        }
        None => {
            tracing::warn!("no annotation store endpoint configured, updates are not persisted");
            Ok(Box::new(LogSink))
        }
    }
}
