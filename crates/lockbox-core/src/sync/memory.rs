//! In-process record store.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use super::{RecordFeed, Subscription, VaultStore};
use crate::error::{LockboxError, Result};
use crate::record::{NewRecord, RecordId, VaultRecord};

/// Record store held entirely in memory.
#[derive(Debug)]
pub struct MemoryStore {
    records: Mutex<Vec<VaultRecord>>,
    feed: RecordFeed,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    /// Seed the store with existing records.
    pub fn with_records(records: Vec<VaultRecord>) -> Self {
        Self {
            feed: RecordFeed::new(records.clone()),
            records: Mutex::new(records),
        }
    }

    /// Number of records held.
    pub fn len(&self) -> usize {
        self.feed.current().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VaultStore for MemoryStore {
    async fn append(&self, record: &NewRecord) -> Result<RecordId> {
        if record.payload.is_empty() {
            return Err(LockboxError::Storage("payload is required".to_string()));
        }

        let stored = VaultRecord {
            id: RecordId::new(Uuid::now_v7().to_string()),
            payload: record.payload.clone(),
            kind: record.kind,
            user_tag: record.user_tag.clone(),
            timestamp: Some(Utc::now()),
        };
        let id = stored.id.clone();

        let snapshot = {
            let mut records = self
                .records
                .lock()
                .map_err(|_| LockboxError::Storage("Record list poisoned".to_string()))?;
            records.push(stored);
            records.clone()
        };
        debug!(id = %id, kind = %record.kind, "record appended");
        self.feed.publish(snapshot);

        Ok(id)
    }

    fn subscribe(&self) -> Result<Subscription> {
        Ok(self.feed.subscribe())
    }

    fn subscriber_count(&self) -> usize {
        self.feed.subscriber_count()
    }
}
