//! Snapshot hand-off between the roster and its [`SnapshotStore`].
//!
//! After every mutation the roster passes a full snapshot to [`Persister::persist`].
//! What happens next depends on the [`SavePolicy`]:
//!
//! - `WriteThrough`: the save runs on the blocking pool and the caller awaits it.
//! - `WriteBehind`: the snapshot is queued for a single writer task and the
//!   caller returns immediately. The writer saves snapshots in submission
//!   order, coalescing a backlog down to its newest entry, so the durable copy
//!   is always last-write-wins.
//!
//! Either way a failed save is logged and counted, never returned: the
//! in-memory roster stays the source of truth.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use ledger::{Snapshot, SnapshotStore};
use scoreconf::SavePolicy;
use tokio::sync::{mpsc, oneshot};

enum WriterMsg {
    Save(Snapshot),
    Flush(oneshot::Sender<()>),
}

/// Save counters, exposed on the health endpoint.
#[derive(Debug, Default)]
pub struct SaveStats {
    succeeded: AtomicU64,
    failed: AtomicU64,
}

impl SaveStats {
    pub fn succeeded(&self) -> u64 {
        self.succeeded.load(Ordering::Relaxed)
    }

    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }
}

pub struct Persister {
    store: Arc<dyn SnapshotStore>,
    policy: SavePolicy,
    stats: Arc<SaveStats>,
    queue: Option<mpsc::UnboundedSender<WriterMsg>>,
}

impl Persister {
    /// Build a persister over `store`.
    ///
    /// With `WriteBehind` this spawns the writer task, so it must be called
    /// from within a Tokio runtime.
    pub fn new(store: Arc<dyn SnapshotStore>, policy: SavePolicy) -> Self {
        let stats = Arc::new(SaveStats::default());

        let queue = match policy {
            SavePolicy::WriteThrough => None,
            SavePolicy::WriteBehind => {
                let (tx, rx) = mpsc::unbounded_channel();
                tokio::spawn(run_writer(Arc::clone(&store), Arc::clone(&stats), rx));
                Some(tx)
            }
        };

        Self {
            store,
            policy,
            stats,
            queue,
        }
    }

    pub fn policy(&self) -> SavePolicy {
        self.policy
    }

    pub fn stats(&self) -> &SaveStats {
        &self.stats
    }

    pub fn describe(&self) -> String {
        self.store.describe()
    }

    /// Hand a snapshot to the store according to the save policy.
    pub async fn persist(&self, snapshot: Snapshot) {
        match &self.queue {
            Some(queue) => {
                if queue.send(WriterMsg::Save(snapshot)).is_err() {
                    self.stats.failed.fetch_add(1, Ordering::Relaxed);
                    tracing::error!("Snapshot writer has stopped; snapshot dropped");
                }
            }
            None => save_now(Arc::clone(&self.store), &self.stats, snapshot).await,
        }
    }

    /// Wait until every snapshot submitted so far has been written (or failed).
    pub async fn flush(&self) {
        let Some(queue) = &self.queue else {
            return;
        };
        let (tx, rx) = oneshot::channel();
        if queue.send(WriterMsg::Flush(tx)).is_ok() {
            let _ = rx.await;
        }
    }
}

async fn save_now(store: Arc<dyn SnapshotStore>, stats: &SaveStats, snapshot: Snapshot) {
    let description = store.describe();
    let result = tokio::task::spawn_blocking(move || store.save(&snapshot)).await;

    match result {
        Ok(Ok(())) => {
            stats.succeeded.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(store = %description, "Snapshot saved");
        }
        Ok(Err(e)) => {
            stats.failed.fetch_add(1, Ordering::Relaxed);
            tracing::error!(store = %description, error = %e, "Snapshot save failed");
        }
        Err(e) => {
            stats.failed.fetch_add(1, Ordering::Relaxed);
            tracing::error!(store = %description, error = %e, "Snapshot save task panicked");
        }
    }
}

async fn run_writer(
    store: Arc<dyn SnapshotStore>,
    stats: Arc<SaveStats>,
    mut rx: mpsc::UnboundedReceiver<WriterMsg>,
) {
    while let Some(first) = rx.recv().await {
        let mut latest = None;
        let mut waiters = Vec::new();

        let mut absorb = |msg| match msg {
            WriterMsg::Save(snapshot) => latest = Some(snapshot),
            WriterMsg::Flush(ack) => waiters.push(ack),
        };
        absorb(first);
        // Anything already queued is older than what we are about to write
        while let Ok(msg) = rx.try_recv() {
            absorb(msg);
        }

        if let Some(snapshot) = latest {
            save_now(Arc::clone(&store), &stats, snapshot).await;
        }
        for ack in waiters {
            let _ = ack.send(());
        }
    }

    tracing::debug!("Snapshot writer shutting down");
}
