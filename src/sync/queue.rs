//! Background delivery of annotation updates with bounded retries.

use std::{
    sync::{mpsc, Arc, Mutex},
    thread::JoinHandle,
    time::Duration,
};

use indexmap::IndexMap;

use crate::mutations::{annos::AnnotationList, schema::Signature};

use super::{AnnotationUpdate, PendingUpdate, Transport, UpdateSink};

/// Retry behaviour of the `SyncQueue`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetrySettings {
    /// Maximal number of attempts per update, at least one.
    pub max_attempts: u32,
    /// Delay after the first failed attempt; grows linearly.
    pub retry_delay: Duration,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_delay: Duration::from_millis(500),
        }
    }
}

/// An update that could not be delivered.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Unsynced {
    pub list: AnnotationList,
    pub signature: Signature,
    pub present: bool,
    pub attempts: u32,
    pub error: String,
}

type Key = (AnnotationList, Signature);

/// Delivery bookkeeping shared between submitters and the worker.
#[derive(Debug, Default)]
struct State {
    /// Latest membership per key that has not been confirmed by the store.
    desired: IndexMap<Key, bool>,
    /// Keys whose latest delivery exhausted all retries.
    unsynced: IndexMap<Key, Unsynced>,
}

/// Fire-and-forget update sink backed by a worker thread.
///
/// Before each attempt the worker checks that the update still reflects the
/// latest toggle of its signature, stale updates are dropped.
pub struct SyncQueue {
    sender: Option<mpsc::Sender<AnnotationUpdate>>,
    worker: Option<JoinHandle<()>>,
    state: Arc<Mutex<State>>,
}

impl SyncQueue {
    /// Start the worker thread delivering through `transport`.
    pub fn start<T>(transport: T, settings: RetrySettings) -> std::io::Result<Self>
    where
        T: Transport + Send + 'static,
    {
        let (sender, receiver) = mpsc::channel::<AnnotationUpdate>();
        let state = Arc::new(Mutex::new(State::default()));
        let worker_state = state.clone();
        let worker = std::thread::Builder::new()
            .name("annotation-sync".into())
            .spawn(move || {
                for update in receiver {
                    deliver(&transport, &settings, &worker_state, update);
                }
                tracing::debug!("annotation sync worker finished");
            })?;

        Ok(Self {
            sender: Some(sender),
            worker: Some(worker),
            state,
        })
    }

    /// Deliver all queued updates and stop the worker.
    pub fn shutdown(mut self) {
        self.finish();
    }

    fn finish(&mut self) {
        self.sender.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                tracing::error!("annotation sync worker panicked");
            }
        }
    }
}

impl Drop for SyncQueue {
    fn drop(&mut self) {
        self.finish();
    }
}

impl UpdateSink for SyncQueue {
    fn submit(&self, update: AnnotationUpdate) {
        let key = (update.list, update.signature.clone());
        if let Ok(mut state) = self.state.lock() {
            state.desired.insert(key, update.present);
        }
        let Some(sender) = self.sender.as_ref() else {
            return;
        };
        if let Err(mpsc::SendError(update)) = sender.send(update) {
            tracing::error!(
                "annotation sync worker gone, {} {} stays unsynced",
                update.list,
                &update.signature
            );
            if let Ok(mut state) = self.state.lock() {
                state.unsynced.insert(
                    (update.list, update.signature.clone()),
                    Unsynced {
                        list: update.list,
                        signature: update.signature,
                        present: update.present,
                        attempts: 0,
                        error: "sync worker not running".into(),
                    },
                );
            }
        }
    }

    fn unsynced(&self) -> Vec<Unsynced> {
        match self.state.lock() {
            Ok(state) => state.unsynced.values().cloned().collect(),
            Err(_) => Vec::new(),
        }
    }

    fn pending(&self) -> usize {
        self.state
            .lock()
            .map(|state| state.desired.len())
            .unwrap_or_default()
    }

    fn pending_updates(&self) -> Vec<PendingUpdate> {
        match self.state.lock() {
            Ok(state) => state
                .desired
                .iter()
                .map(|((list, signature), present)| PendingUpdate {
                    list: *list,
                    signature: signature.clone(),
                    present: *present,
                })
                .collect(),
            Err(_) => Vec::new(),
        }
    }
}

/// Whether `update` is still the latest wanted state of its key.
fn is_current(state: &Mutex<State>, key: &Key, present: bool) -> bool {
    state
        .lock()
        .map(|state| state.desired.get(key) == Some(&present))
        .unwrap_or_default()
}

fn deliver<T: Transport>(
    transport: &T,
    settings: &RetrySettings,
    state: &Mutex<State>,
    update: AnnotationUpdate,
) {
    let key = (update.list, update.signature.clone());
    let max_attempts = settings.max_attempts.max(1);
    let mut last_error = String::new();

    for attempt in 1..=max_attempts {
        if !is_current(state, &key, update.present) {
            tracing::debug!(
                "dropping superseded update {} {} = {}",
                update.list,
                &update.signature,
                update.present
            );
            return;
        }

        match transport.apply_updates(&update) {
            Ok(()) => {
                if let Ok(mut state) = state.lock() {
                    state.unsynced.shift_remove(&key);
                    if state.desired.get(&key) == Some(&update.present) {
                        state.desired.shift_remove(&key);
                    }
                }
                tracing::debug!(
                    "persisted {} {} = {} (attempt {})",
                    update.list,
                    &update.signature,
                    update.present,
                    attempt
                );
                return;
            }
            Err(e) => {
                tracing::warn!(
                    "attempt {}/{} to persist {} {} failed: {}",
                    attempt,
                    max_attempts,
                    update.list,
                    &update.signature,
                    &e
                );
                last_error = e.to_string();
                if attempt < max_attempts {
                    std::thread::sleep(settings.retry_delay * attempt);
                }
            }
        }
    }

    tracing::error!(
        "giving up persisting {} {} = {}, local state is now unsynced",
        update.list,
        &update.signature,
        update.present
    );
    if let Ok(mut state) = state.lock() {
        state.unsynced.insert(
            key,
            Unsynced {
                list: update.list,
                signature: update.signature,
                present: update.present,
                attempts: max_attempts,
                error: last_error,
            },
        );
    }
}
