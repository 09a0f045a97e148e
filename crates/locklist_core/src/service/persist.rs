//! Background persistence of collection snapshots.
//!
//! # Responsibility
//! - Accept snapshots without blocking the caller.
//! - Write them through one writer task so writes never reorder.
//!
//! # Invariants
//! - Only the newest pending snapshot is written; older pending ones are
//!   superseded because every write is a full replace.
//! - Write failures are logged and never reach the caller.

use crate::model::item::TodoItem;
use crate::repo::item_store::ItemStore;
use log::{debug, warn};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;

#[derive(Debug, Clone)]
enum PersistAction {
    Idle,
    Save(Arc<Vec<TodoItem>>),
    Clear,
}

#[derive(Debug, Clone)]
struct PendingWrite {
    generation: u64,
    action: PersistAction,
}

/// Fire-and-forget handle to the writer task.
pub struct PersistQueue {
    pending_tx: watch::Sender<PendingWrite>,
    written_rx: watch::Receiver<u64>,
    next_generation: AtomicU64,
}

impl PersistQueue {
    /// Spawns the writer task on the current tokio runtime.
    ///
    /// # Panics
    /// Panics when called outside a tokio runtime.
    pub fn start(store: ItemStore) -> Self {
        let (pending_tx, pending_rx) = watch::channel(PendingWrite {
            generation: 0,
            action: PersistAction::Idle,
        });
        let (written_tx, written_rx) = watch::channel(0);
        tokio::spawn(run_writer(store, pending_rx, written_tx));

        Self {
            pending_tx,
            written_rx,
            next_generation: AtomicU64::new(0),
        }
    }

    /// Schedules a full-snapshot write.
    pub fn schedule_save(&self, items: Vec<TodoItem>) {
        self.schedule(PersistAction::Save(Arc::new(items)));
    }

    /// Schedules removal of the persisted collection.
    pub fn schedule_clear(&self) {
        self.schedule(PersistAction::Clear);
    }

    /// Waits until everything scheduled so far has been handed to the store.
    pub async fn flush(&self) {
        let target = self.next_generation.load(Ordering::SeqCst);
        let mut written = self.written_rx.clone();
        if written.wait_for(|generation| *generation >= target).await.is_err() {
            warn!("event=persist_flush module=service status=error error_code=writer_stopped");
        }
    }

    fn schedule(&self, action: PersistAction) {
        let generation = self.next_generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.pending_tx
            .send_replace(PendingWrite { generation, action });
    }
}

async fn run_writer(
    store: ItemStore,
    mut pending_rx: watch::Receiver<PendingWrite>,
    written_tx: watch::Sender<u64>,
) {
    while pending_rx.changed().await.is_ok() {
        let pending = pending_rx.borrow_and_update().clone();
        let started_at = Instant::now();
        match &pending.action {
            PersistAction::Idle => {}
            PersistAction::Save(items) => match store.save(items).await {
                Ok(()) => debug!(
                    "event=persist_write module=service status=ok generation={} count={} duration_ms={}",
                    pending.generation,
                    items.len(),
                    started_at.elapsed().as_millis()
                ),
                Err(err) => warn!(
                    "event=persist_write module=service status=error generation={} error={err}",
                    pending.generation
                ),
            },
            PersistAction::Clear => store.clear().await,
        }
        written_tx.send_replace(pending.generation);
    }
    debug!("event=persist_writer module=service status=stopped");
}
