//! Tag-filtered view over the live record stream.

use crate::record::{normalize_tag, RecordId, VaultRecord};

/// In-memory view of the latest store snapshot.
///
/// Holds records in the order the store delivered them (newest first).
/// Every snapshot replaces the previous one wholesale.
#[derive(Debug, Clone, Default)]
pub struct VaultIndex {
    records: Vec<VaultRecord>,
}

impl VaultIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: Vec<VaultRecord>) -> Self {
        Self { records: snapshot }
    }

    /// Replace the view with a fresh snapshot.
    pub fn replace(&mut self, snapshot: Vec<VaultRecord>) {
        self.records = snapshot;
    }

    pub fn records(&self) -> &[VaultRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &RecordId) -> Option<&VaultRecord> {
        self.records.iter().find(|record| &record.id == id)
    }

    /// Records whose normalized tag contains the normalized `term`.
    ///
    /// Case-insensitive substring match. An empty term matches every record,
    /// untagged ones included. Order is preserved.
    pub fn filter(&self, term: &str) -> Vec<&VaultRecord> {
        let term = normalize_tag(term);
        self.records
            .iter()
            .filter(|record| normalize_tag(record.tag()).contains(&term))
            .collect()
    }
}
