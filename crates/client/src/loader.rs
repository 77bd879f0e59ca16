//! Cancellable loading into the shared [`DataStore`].
//!
//! At most one character load is in flight: [`Loader::begin`] cancels the
//! previous request's token before handing out a new one. A superseded
//! load resolves to [`LoadOutcome::Cancelled`], leaves the store alone, and
//! raises no notification. Failures replace the store with empty lists and
//! publish a notification on the [`EventBus`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use grimoire_core::{CharacterRecord, CoreError, DataStore, SpellRecord};
use grimoire_events::{EventBus, Notification, NotificationKind};
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use crate::source::{RecordSource, SourcePayload};

/// User-facing message for a failed load.
const LOAD_FAILED_MESSAGE: &str = "Could not load characters. Please try again later.";

/// User-facing message for a collection the source did not provide.
const MISSING_COLLECTION_MESSAGE: &str = "Some data is unavailable right now.";

// ---------------------------------------------------------------------------
// Request handle
// ---------------------------------------------------------------------------

/// Per-request cancellation handle. Clones share the same token.
#[derive(Debug, Clone, Default)]
pub struct RequestHandle {
    token: CancellationToken,
}

impl RequestHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves once the request is cancelled.
    pub async fn cancelled(&self) {
        self.token.cancelled().await
    }
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum LoadOutcome {
    /// The store now holds these lists.
    Loaded {
        characters: Vec<CharacterRecord>,
        spells: Vec<SpellRecord>,
    },
    /// Transport or parse failure; already notified. The store is empty.
    Failed(CoreError),
    /// Superseded by a newer load. The store was not touched.
    Cancelled,
}

impl LoadOutcome {
    /// The lists this load produced; empty unless it succeeded.
    pub fn into_lists(self) -> (Vec<CharacterRecord>, Vec<SpellRecord>) {
        match self {
            LoadOutcome::Loaded { characters, spells } => (characters, spells),
            LoadOutcome::Failed(_) | LoadOutcome::Cancelled => (Vec::new(), Vec::new()),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, LoadOutcome::Cancelled)
    }
}

// ---------------------------------------------------------------------------
// Loader
// ---------------------------------------------------------------------------

pub struct Loader {
    source: Arc<dyn RecordSource>,
    store: Arc<RwLock<DataStore>>,
    bus: Arc<EventBus>,
    /// Token of the most recent character load.
    in_flight: Mutex<Option<RequestHandle>>,
    /// Bumped by every `begin`; only the latest generation may write.
    generation: AtomicU64,
}

impl Loader {
    pub fn new(source: Arc<dyn RecordSource>, store: Arc<RwLock<DataStore>>, bus: Arc<EventBus>) -> Self {
        Self {
            source,
            store,
            bus,
            in_flight: Mutex::new(None),
            generation: AtomicU64::new(0),
        }
    }

    pub fn store(&self) -> &Arc<RwLock<DataStore>> {
        &self.store
    }

    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    /// Start a new load, cancelling any load still in flight.
    pub fn begin(&self) -> PendingLoad<'_> {
        let handle = RequestHandle::new();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let previous = self
            .in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .replace(handle.clone());
        if let Some(previous) = previous {
            if !previous.is_cancelled() {
                tracing::debug!(generation, "Cancelling superseded load");
                previous.cancel();
            }
        }

        PendingLoad {
            loader: self,
            handle,
            generation,
        }
    }

    /// Begin and run a load in one step.
    pub async fn load(&self) -> LoadOutcome {
        self.begin().run().await
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }
}

/// A load that has been started but not yet driven.
pub struct PendingLoad<'a> {
    loader: &'a Loader,
    handle: RequestHandle,
    generation: u64,
}

impl PendingLoad<'_> {
    /// Handle the caller can use to cancel this load.
    pub fn handle(&self) -> RequestHandle {
        self.handle.clone()
    }

    pub async fn run(self) -> LoadOutcome {
        let loader = self.loader;
        let source = loader.source.name();

        let fetched = tokio::select! {
            biased;
            _ = self.handle.cancelled() => {
                tracing::debug!(source, generation = self.generation, "Load cancelled in flight");
                return LoadOutcome::Cancelled;
            }
            result = loader.source.fetch() => result,
        };

        // Re-check under the write lock: a newer load may have landed first.
        let mut store = loader.store.write().await;
        if self.handle.is_cancelled() || !loader.is_current(self.generation) {
            tracing::debug!(source, generation = self.generation, "Discarding superseded load result");
            return LoadOutcome::Cancelled;
        }

        match fetched {
            Ok(SourcePayload {
                characters,
                spells,
                missing,
            }) => {
                store.replace(characters.clone(), spells.clone());
                drop(store);

                for key in missing {
                    tracing::warn!(source, key, "Expected collection missing from payload");
                    loader.bus.publish(
                        Notification::new(NotificationKind::Parse, MISSING_COLLECTION_MESSAGE)
                            .with_detail(format!("Missing top-level key: {key}")),
                    );
                }

                tracing::info!(
                    source,
                    characters = characters.len(),
                    spells = spells.len(),
                    "Load complete",
                );
                LoadOutcome::Loaded { characters, spells }
            }
            Err(err) => {
                store.replace(Vec::new(), Vec::new());
                drop(store);

                tracing::error!(source, error = %err, "Load failed");
                loader
                    .bus
                    .publish(Notification::from_error(LOAD_FAILED_MESSAGE, &err));
                LoadOutcome::Failed(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_handle_clones_share_token() {
        let handle = RequestHandle::new();
        let clone = handle.clone();
        clone.cancel();
        assert!(handle.is_cancelled());
    }

    #[test]
    fn failed_and_cancelled_outcomes_yield_empty_lists() {
        let (c, s) = LoadOutcome::Cancelled.into_lists();
        assert!(c.is_empty() && s.is_empty());
        let (c, s) = LoadOutcome::Failed(CoreError::Transport("down".into())).into_lists();
        assert!(c.is_empty() && s.is_empty());
    }
}
