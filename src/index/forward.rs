//! Forward Store
//!
//! Maps a record's 64-bit hash back to the full [`AddressRecord`], so that
//! an ID-level trie search can be materialized into complete results. The
//! store is backed by a concurrent map and shared read-only across server
//! worker threads once the shard has loaded.

use std::mem;

use dashmap::DashMap;

use crate::ingest::types::AddressRecord;

#[derive(Debug, Default)]
pub struct ForwardStore {
    records: DashMap<u64, AddressRecord>,
}

impl ForwardStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a record under its ID. A later insert with the same key
    /// overwrites the earlier one.
    pub fn insert(&self, id: u64, record: AddressRecord) {
        self.records.insert(id, record);
    }

    pub fn get(&self, id: u64) -> Option<AddressRecord> {
        self.records.get(&id).map(|entry| entry.value().clone())
    }

    pub fn contains(&self, id: u64) -> bool {
        self.records.contains_key(&id)
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Rough in-memory footprint: per entry, the key, the record struct and
    /// the heap capacity of every string field.
    pub fn storage_size(&self) -> usize {
        self.records
            .iter()
            .map(|entry| {
                let record = entry.value();
                mem::size_of::<u64>()
                    + mem::size_of::<AddressRecord>()
                    + record.number.capacity()
                    + record.street.capacity()
                    + record.unit.capacity()
                    + record.city.capacity()
                    + record.postcode.capacity()
                    + record.original_street.capacity()
                    + record.original_unit.capacity()
                    + record.original_city.capacity()
            })
            .sum()
    }
}
