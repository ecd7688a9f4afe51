//! # Persistence Worker
//!
//! Background task that mirrors cache mutations into the store.
//!
//! ## Two-Phase Write
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Write Path                                         │
//! │                                                                         │
//! │  Phase 1 (caller, synchronous)                                         │
//! │  ─────────────────────────────                                         │
//! │  engine.set_quantity("a", 12)                                          │
//! │       │  validate → mutate cache → enqueue Job::Put                    │
//! │       ▼                                                                 │
//! │  returns Mutation { value, persist: PersistHandle }                    │
//! │                                                                         │
//! │  Phase 2 (worker task, asynchronous)                                   │
//! │  ───────────────────────────────────                                   │
//! │  ┌──────────┐    ┌──────────┐    ┌──────────┐                          │
//! │  │ Job::Put │ ─► │ Job::Del │ ─► │ Job::Put │ ─►  store, one at a time │
//! │  └──────────┘    └──────────┘    └──────────┘                          │
//! │       │                                                                 │
//! │       ├── Ok  → reply Ok on the job's oneshot                          │
//! │       └── Err → error! log + reply Err. No retry, no rollback.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Jobs run in submission order, so a put and a later delete of the same id
//! reach the store in that order. A stalled store call stalls the queue
//! behind it; nothing times out.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use stockroom_core::InventoryItem;
use stockroom_db::ItemStore;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, warn};

use crate::error::{PersistError, StoreOp};

type Reply = oneshot::Sender<Result<(), PersistError>>;

enum Job {
    Put { item: InventoryItem, reply: Reply },
    Delete { id: String, reply: Reply },
    Flush { reply: oneshot::Sender<()> },
}

// =============================================================================
// Persist Handle
// =============================================================================

/// Pending outcome of one or more store writes.
///
/// Dropping the handle is fine: the writes still happen and failures are
/// still logged. Await it to observe the outcome.
#[derive(Debug, Default)]
pub struct PersistHandle {
    pending: Vec<oneshot::Receiver<Result<(), PersistError>>>,
}

impl PersistHandle {
    /// A handle for an operation that issued no store write.
    pub fn completed() -> Self {
        Self::default()
    }

    /// Number of store writes this handle tracks.
    pub fn writes(&self) -> usize {
        self.pending.len()
    }

    /// True if the operation issued no store write.
    pub fn is_noop(&self) -> bool {
        self.pending.is_empty()
    }

    /// Folds another handle's writes into this one.
    pub fn merge(&mut self, other: PersistHandle) {
        self.pending.extend(other.pending);
    }

    /// Waits for every tracked write and returns the first failure.
    pub async fn wait(self) -> Result<(), PersistError> {
        match self.wait_all().await.into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Waits for every tracked write and returns all failures, in order.
    pub async fn wait_all(self) -> Vec<PersistError> {
        let mut failures = Vec::new();
        for rx in self.pending {
            match rx.await {
                Ok(Ok(())) => {}
                Ok(Err(err)) => failures.push(err),
                Err(_) => failures.push(PersistError::WorkerGone),
            }
        }
        failures
    }
}

// =============================================================================
// Statistics
// =============================================================================

/// Running counts of persistence outcomes.
#[derive(Debug, Default)]
pub struct PersistStats {
    completed: AtomicU64,
    failed: AtomicU64,
}

impl PersistStats {
    /// Writes the store accepted.
    pub fn completed(&self) -> u64 {
        self.completed.load(Ordering::Relaxed)
    }

    /// Writes that failed (each one logged as a StorePersistenceError).
    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }
}

// =============================================================================
// Persist Queue
// =============================================================================

/// Sending side of the persistence worker.
///
/// The worker exits once the queue is dropped and every queued job has run.
#[derive(Debug)]
pub(crate) struct PersistQueue {
    tx: mpsc::UnboundedSender<Job>,
    stats: Arc<PersistStats>,
}

impl std::fmt::Debug for Job {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Job::Put { item, .. } => write!(f, "Put({})", item.id),
            Job::Delete { id, .. } => write!(f, "Delete({id})"),
            Job::Flush { .. } => write!(f, "Flush"),
        }
    }
}

impl PersistQueue {
    /// Spawns the worker on the current Tokio runtime.
    pub(crate) fn spawn<S: ItemStore>(store: Arc<S>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let stats = Arc::new(PersistStats::default());

        tokio::spawn(run_worker(store, rx, Arc::clone(&stats)));

        PersistQueue { tx, stats }
    }

    pub(crate) fn stats(&self) -> &Arc<PersistStats> {
        &self.stats
    }

    /// Queues a whole-record upsert of `item`.
    pub(crate) fn put(&self, item: InventoryItem) -> PersistHandle {
        let (reply, rx) = oneshot::channel();
        self.submit(Job::Put { item, reply });
        PersistHandle { pending: vec![rx] }
    }

    /// Queues a delete of `id`.
    pub(crate) fn delete(&self, id: String) -> PersistHandle {
        let (reply, rx) = oneshot::channel();
        self.submit(Job::Delete { id, reply });
        PersistHandle { pending: vec![rx] }
    }

    /// Resolves once every job queued before this call has run.
    pub(crate) async fn flush(&self) -> Result<(), PersistError> {
        let (reply, rx) = oneshot::channel();
        self.submit(Job::Flush { reply });
        rx.await.map_err(|_| PersistError::WorkerGone)
    }

    fn submit(&self, job: Job) {
        // On failure the job (and its reply sender) is dropped, so the
        // handle resolves to WorkerGone.
        if let Err(mpsc::error::SendError(job)) = self.tx.send(job) {
            warn!(?job, "Persistence worker is gone, store write dropped");
        }
    }
}

async fn run_worker<S: ItemStore>(
    store: Arc<S>,
    mut rx: mpsc::UnboundedReceiver<Job>,
    stats: Arc<PersistStats>,
) {
    info!("Persistence worker started");

    while let Some(job) = rx.recv().await {
        match job {
            Job::Put { item, reply } => {
                let result = store.put(&item).await;
                let outcome = record(&stats, &item.id, StoreOp::Put, result);
                let _ = reply.send(outcome);
            }
            Job::Delete { id, reply } => {
                let result = store.delete(&id).await;
                if let Ok(false) = result {
                    debug!(id = %id, "Store had no record to delete");
                }
                let outcome = record(&stats, &id, StoreOp::Delete, result.map(|_| ()));
                let _ = reply.send(outcome);
            }
            Job::Flush { reply } => {
                let _ = reply.send(());
            }
        }
    }

    info!(
        completed = stats.completed(),
        failed = stats.failed(),
        "Persistence worker stopped"
    );
}

fn record(
    stats: &PersistStats,
    id: &str,
    op: StoreOp,
    result: stockroom_db::DbResult<()>,
) -> Result<(), PersistError> {
    match result {
        Ok(()) => {
            stats.completed.fetch_add(1, Ordering::Relaxed);
            debug!(id = %id, %op, "Store write completed");
            Ok(())
        }
        Err(source) => {
            stats.failed.fetch_add(1, Ordering::Relaxed);
            error!(
                id = %id,
                %op,
                error = %source,
                "StorePersistenceError: store write failed, cache keeps the change"
            );
            Err(PersistError::Store {
                id: id.to_string(),
                op,
                source,
            })
        }
    }
}
