//! # Snapshot
//!
//! One decoded poll response: an ordered, immutable set of entity records.

use chrono::{DateTime, Utc};

use super::correlate;
use crate::wire::address::Address;
use crate::wire::protocol::EntityRecord;

/// Ordered collection of entity records from one poll response
///
/// Records keep their decode order. A snapshot is never mutated after it is
/// built; the history ring replaces whole snapshots.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    records: Vec<EntityRecord>,
    received_at: Option<DateTime<Utc>>,
    dropped_bytes: usize,
}

impl Snapshot {
    /// Create a snapshot from records in decode order
    pub fn new(records: Vec<EntityRecord>) -> Self {
        Self {
            records,
            received_at: None,
            dropped_bytes: 0,
        }
    }

    /// Stamp the snapshot with its ingestion time
    pub fn with_received_at(mut self, received_at: DateTime<Utc>) -> Self {
        self.received_at = Some(received_at);
        self
    }

    pub(crate) fn with_dropped_bytes(mut self, dropped_bytes: usize) -> Self {
        self.dropped_bytes = dropped_bytes;
        self
    }

    /// Records in decode order
    pub fn records(&self) -> &[EntityRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EntityRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// No entities visible
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Ingestion time; `None` for never-filled ring slots
    pub fn received_at(&self) -> Option<DateTime<Utc>> {
        self.received_at
    }

    /// Trailing bytes discarded under the drop-trailing truncation policy
    pub fn dropped_bytes(&self) -> usize {
        self.dropped_bytes
    }

    /// First record with `address`, see [`correlate::find`]
    pub fn find(&self, address: Address) -> Option<&EntityRecord> {
        correlate::find(self, address)
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = &'a EntityRecord;
    type IntoIter = std::slice::Iter<'a, EntityRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
