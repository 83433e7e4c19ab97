//! In-memory record store plus the three operations that act on it:
//! identifier allocation, record construction and the delete lookup.
//!
//! The store keeps records in insertion order. Adding appends and deleting
//! removes in place, so relative order never changes during a session.

use log::{info, warn};

use crate::error::AllocatorAnomaly;
use crate::models::Record;

/// Result of asking the allocator for the next id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdAllocation {
    pub id: u32,
    /// Set when the allocator fell back to `1` because the last record had an
    /// unusable id.
    pub anomaly: Option<AllocatorAnomaly>,
}

/// Compute the id for the next record: one past the id of the *last* record
/// in the sequence, or `1` for an empty sequence.
///
/// This deliberately looks at the tail rather than the maximum id present.
pub fn next_id(records: &[Record]) -> IdAllocation {
    let Some(last) = records.last() else {
        return IdAllocation {
            id: 1,
            anomaly: None,
        };
    };

    let anomaly = if last.id == 0 {
        AllocatorAnomaly::InvalidLastId
    } else {
        match last.id.checked_add(1) {
            Some(id) => return IdAllocation { id, anomaly: None },
            None => AllocatorAnomaly::Exhausted(last.id),
        }
    };

    warn!("identifier allocator anomaly: {anomaly}");
    IdAllocation {
        id: 1,
        anomaly: Some(anomaly),
    }
}

/// Construct a record from raw input and an allocated id.
///
/// Titles and artists are stored as given apart from surrounding whitespace.
/// Construction of owned strings cannot fail here, so the placeholder record
/// from [`Record::placeholder`] is only used for an id of `0`.
pub fn build_record(id: u32, title: &str, artist: &str) -> Record {
    if id == 0 {
        warn!("refusing to build a CD with id 0, using placeholder record");
        return Record::placeholder();
    }
    Record::new(id, title.trim(), artist.trim())
}

/// Zero-based position of the first record whose id equals `target_id`.
///
/// `None` means not found; the store is never touched.
pub fn find_for_delete(target_id: u32, records: &[Record]) -> Option<usize> {
    records.iter().position(|record| record.id == target_id)
}

/// Ordered collection of records owned by a session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    records: Vec<Record>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Id the next call to [`Inventory::add`] would assign.
    pub fn next_id(&self) -> IdAllocation {
        next_id(&self.records)
    }

    /// Allocate an id, build the record and append it. Returns a copy of the
    /// stored record together with any allocator diagnostic.
    pub fn add(&mut self, title: &str, artist: &str) -> (Record, Option<AllocatorAnomaly>) {
        let IdAllocation { id, anomaly } = self.next_id();
        let record = build_record(id, title, artist);
        info!("adding CD {record}");
        self.records.push(record.clone());
        (record, anomaly)
    }

    pub fn find_for_delete(&self, target_id: u32) -> Option<usize> {
        find_for_delete(target_id, &self.records)
    }

    /// Remove the record with `target_id`, returning it when it existed.
    pub fn remove(&mut self, target_id: u32) -> Option<Record> {
        let position = self.find_for_delete(target_id)?;
        let removed = self.records.remove(position);
        info!("deleted CD {removed} at position {position}");
        Some(removed)
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }
}
