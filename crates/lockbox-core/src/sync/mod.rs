//! Record store boundary.
//!
//! The [`VaultStore`] trait is the collaborator contract with the remote
//! document collection: a one-shot append and a live subscription that
//! delivers the complete record list, newest first, on every change.
//!
//! Implementations:
//! - [`MemoryStore`]: in-process, for tests and embedding
//! - [`SqliteStore`]: file-backed SQLite collection

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;
use tracing::debug;

use crate::error::{LockboxError, Result};
use crate::record::{NewRecord, RecordId, VaultRecord};

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Name of the document collection holding vault records.
pub const COLLECTION: &str = "secretMessages";

/// A complete, ordered view of the collection.
pub type Snapshot = Arc<Vec<VaultRecord>>;

/// Store interface for vault records.
///
/// All implementations must ensure:
/// - `append` assigns the id and the timestamp (store clock)
/// - records are never mutated after append
/// - every snapshot is complete and ordered by timestamp, newest first
#[async_trait]
pub trait VaultStore: Send + Sync {
    /// Append a new record.
    ///
    /// # Errors
    ///
    /// Returns `LockboxError::Storage` if the write is rejected.
    async fn append(&self, record: &NewRecord) -> Result<RecordId>;

    /// Open a live subscription to the collection.
    ///
    /// The subscription is released when it is dropped or unsubscribed.
    fn subscribe(&self) -> Result<Subscription>;

    /// Number of subscriptions currently held.
    fn subscriber_count(&self) -> usize;
}

/// Publisher side of a store's live record stream.
#[derive(Debug)]
pub(crate) struct RecordFeed {
    sender: watch::Sender<Snapshot>,
    subscribers: Arc<AtomicUsize>,
}

impl RecordFeed {
    pub(crate) fn new(initial: Vec<VaultRecord>) -> Self {
        let (sender, _) = watch::channel(Arc::new(ordered(initial)));
        Self {
            sender,
            subscribers: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Replace the published snapshot.
    pub(crate) fn publish(&self, records: Vec<VaultRecord>) {
        let snapshot = Arc::new(ordered(records));
        debug!(records = snapshot.len(), "publishing snapshot");
        self.sender.send_replace(snapshot);
    }

    pub(crate) fn current(&self) -> Snapshot {
        self.sender.borrow().clone()
    }

    pub(crate) fn subscribe(&self) -> Subscription {
        let count = self.subscribers.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(subscribers = count, "subscription acquired");
        Subscription {
            receiver: self.sender.subscribe(),
            subscribers: Arc::clone(&self.subscribers),
            released: false,
        }
    }

    pub(crate) fn subscriber_count(&self) -> usize {
        self.subscribers.load(Ordering::SeqCst)
    }
}

/// Sort newest first. Records without a timestamp are pending and sort on top.
fn ordered(mut records: Vec<VaultRecord>) -> Vec<VaultRecord> {
    records.sort_by(|a, b| match (a.timestamp, b.timestamp) {
        (None, None) => std::cmp::Ordering::Equal,
        (None, Some(_)) => std::cmp::Ordering::Less,
        (Some(_), None) => std::cmp::Ordering::Greater,
        (Some(x), Some(y)) => y.cmp(&x),
    });
    records
}

/// A live view of the collection.
///
/// Released exactly once, on [`Subscription::unsubscribe`] or on drop.
#[derive(Debug)]
pub struct Subscription {
    receiver: watch::Receiver<Snapshot>,
    subscribers: Arc<AtomicUsize>,
    released: bool,
}

impl Subscription {
    /// The latest snapshot, without waiting.
    pub fn current(&self) -> Snapshot {
        self.receiver.borrow().clone()
    }

    /// Wait for the next snapshot and return it.
    ///
    /// # Errors
    ///
    /// Returns `LockboxError::Storage` once the store has gone away.
    pub async fn next_snapshot(&mut self) -> Result<Snapshot> {
        self.receiver
            .changed()
            .await
            .map_err(|_| LockboxError::Storage("Record stream closed".to_string()))?;
        Ok(self.receiver.borrow_and_update().clone())
    }

    /// Release the subscription now.
    pub fn unsubscribe(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        let remaining = self.subscribers.fetch_sub(1, Ordering::SeqCst) - 1;
        debug!(subscribers = remaining, "subscription released");
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}
