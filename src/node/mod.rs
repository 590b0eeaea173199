//! Data Node
//!
//! Owns exactly one shard of the address dataset. On startup the node parses
//! its CSV file, normalizes every record, and builds the dual index (radix
//! trie + forward store). After that point the indexes are immutable and the
//! node answers RPC searches with pure reads, so no locking is needed on the
//! query path.
//!
//! ## Query forms
//! - **Multi-term**: each term is normalized and prefix-searched; the ID
//!   sets are intersected. `["MCKINNON", "SALINAS"]` must match a record in
//!   both its street and city fields.
//! - **Structured**: a single term containing a comma (e.g.
//!   `"611 3RD ST, Steilacoom, 98388"`) is parsed into number/street/city/
//!   postcode components and matched against composite keys built at index
//!   time, most specific first.
//!
//! ## Submodules
//! - **`handlers`**: Axum handlers for the internode RPC surface.
//! - **`protocol`**: Endpoint constants and wire DTOs shared with the
//!   gateway.

pub mod handlers;
pub mod protocol;

#[cfg(test)]
mod tests;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, bail};

use crate::index::forward::ForwardStore;
use crate::index::radix::RadixTrieIndex;
use crate::ingest::loader::CsvLoader;
use crate::ingest::normalizer::{normalize, normalize_street_suffix};
use crate::ingest::types::AddressRecord;

/// Separator between components of a composite search key.
const KEY_SEPARATOR: char = '|';

/// Index-accounting numbers captured once at the end of a successful load.
#[derive(Debug, Clone, Copy, Default)]
pub struct Statistics {
    pub total_records: u64,
    pub radix_memory_bytes: u64,
    pub forward_bytes: u64,
    pub load_time_ms: u64,
}

/// Lifecycle of a data node. `search` is only legal in `Ready`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeState {
    Uninitialized,
    Loading,
    Ready,
    Terminated,
}

pub struct DataNode {
    shard_id: u32,
    data_file_path: PathBuf,
    radix: RadixTrieIndex,
    forward: ForwardStore,
    stats: Statistics,
    state: NodeState,
}

/// A structured address query, split out of a comma-separated term.
#[derive(Debug, Default, PartialEq)]
struct ParsedAddress {
    number: String,
    street: String,
    city: String,
    postcode: String,
}

impl DataNode {
    /// Creates an empty node. Indexes stay empty until [`initialize`]
    /// succeeds.
    ///
    /// [`initialize`]: DataNode::initialize
    pub fn new(shard_id: u32, data_file_path: impl Into<PathBuf>) -> Self {
        Self {
            shard_id,
            data_file_path: data_file_path.into(),
            radix: RadixTrieIndex::new(),
            forward: ForwardStore::new(),
            stats: Statistics::default(),
            state: NodeState::Uninitialized,
        }
    }

    pub fn shard_id(&self) -> u32 {
        self.shard_id
    }

    pub fn state(&self) -> NodeState {
        self.state
    }

    pub fn statistics(&self) -> Statistics {
        self.stats
    }

    /// Loads the shard file and builds both indexes. Must be called exactly
    /// once, before the RPC server starts accepting requests. A shard that
    /// yields zero valid records is a fatal startup error.
    pub fn initialize(&mut self) -> anyhow::Result<()> {
        let start = Instant::now();
        self.state = NodeState::Loading;

        tracing::info!(
            "Starting data load from {} (shard_id={})",
            self.data_file_path.display(),
            self.shard_id
        );

        let mut loader = CsvLoader::new();
        let records = loader
            .parse(&self.data_file_path)
            .with_context(|| format!("loading shard {}", self.shard_id))?;

        if records.is_empty() {
            self.state = NodeState::Terminated;
            bail!(
                "no valid records loaded from {}",
                self.data_file_path.display()
            );
        }

        tracing::info!(
            "Parsed {} records ({} rows dropped)",
            loader.success_count(),
            loader.error_count()
        );

        let total = records.len() as u64;
        for record in records {
            self.index_record(record);
        }

        self.stats = Statistics {
            total_records: total,
            radix_memory_bytes: self.radix.memory_usage() as u64,
            forward_bytes: self.forward.storage_size() as u64,
            load_time_ms: start.elapsed().as_millis() as u64,
        };
        self.state = NodeState::Ready;

        tracing::info!(
            "Index build complete: {} records, radix {} bytes, forward {} bytes, {} ms",
            self.stats.total_records,
            self.stats.radix_memory_bytes,
            self.stats.forward_bytes,
            self.stats.load_time_ms
        );

        Ok(())
    }

    /// Normalizes one record's searchable fields (the raw originals were
    /// preserved by the loader) and inserts it into both indexes.
    fn index_record(&mut self, mut record: AddressRecord) {
        record.number = normalize(&record.number);
        record.street = normalize(&record.street);
        record.unit = normalize(&record.unit);
        record.city = normalize(&record.city);
        record.postcode = normalize(&record.postcode);

        let id = record.hash;

        // Individual fields, for free-form term queries.
        for field in [&record.street, &record.city, &record.postcode, &record.number] {
            if !field.is_empty() {
                self.radix.insert(field, id);
            }
        }

        // A suffix-expanded street spelling, so "3RD ST" and "3RD STREET"
        // both prefix-match.
        let expanded_street = normalize_street_suffix(&record.original_street);
        if !expanded_street.is_empty() && expanded_street != record.street {
            self.radix.insert(&expanded_street, id);
        }

        // Composite keys, for structured comma queries.
        for key in composite_keys(&record.number, &record.street, &record.city, &record.postcode) {
            self.radix.insert(&key, id);
        }

        self.forward.insert(id, record);
    }

    /// Executes a search. Returns complete records in a deterministic but
    /// unranked order; ranking happens on the gateway.
    pub fn search(&self, query_terms: &[String]) -> Vec<AddressRecord> {
        if self.state != NodeState::Ready {
            tracing::warn!(
                "Search rejected: node is {:?}, not Ready (shard_id={})",
                self.state,
                self.shard_id
            );
            return Vec::new();
        }

        if query_terms.is_empty() {
            tracing::info!("Empty query, returning 0 results");
            return Vec::new();
        }

        let matching_ids = self.find_matching_ids(query_terms);
        tracing::debug!("Found {} matching IDs", matching_ids.len());

        let mut results = Vec::with_capacity(matching_ids.len());
        for id in matching_ids {
            match self.forward.get(id) {
                Some(record) => results.push(record),
                None => {
                    // An ID in the trie but not the store is a data fault,
                    // never a request failure.
                    tracing::warn!(
                        "Index inconsistency: ID {:x} in radix trie but not in forward store",
                        id
                    );
                }
            }
        }

        tracing::info!(
            "Search with {} term(s) returning {} record(s)",
            query_terms.len(),
            results.len()
        );
        results
    }

    fn find_matching_ids(&self, query_terms: &[String]) -> Vec<u64> {
        // A single comma-carrying term is a structured address query.
        if query_terms.len() == 1 && query_terms[0].contains(',') {
            return self.find_structured(&query_terms[0]);
        }

        let normalized: Vec<String> = query_terms.iter().map(|t| normalize(t)).collect();

        let mut result_ids = self.radix.search(&normalized[0]);

        for term in &normalized[1..] {
            if result_ids.is_empty() {
                break;
            }
            let term_ids: std::collections::HashSet<u64> =
                self.radix.search(term).into_iter().collect();
            result_ids.retain(|id| term_ids.contains(id));
        }

        result_ids
    }

    /// Matches a structured query against the composite keys, most specific
    /// first; the first key with any matches wins.
    fn find_structured(&self, query: &str) -> Vec<u64> {
        let parsed = parse_structured_query(query);

        let keys = composite_keys(
            &normalize(&parsed.number),
            &normalize(&parsed.street),
            &normalize(&parsed.city),
            &normalize(&parsed.postcode),
        );

        for key in keys.iter().rev() {
            let ids = self.radix.search(key);
            if !ids.is_empty() {
                tracing::info!("Structured query matched {} record(s) via {:?}", ids.len(), key);
                return ids;
            }
        }

        Vec::new()
    }
}

/// Composite keys for a record, least to most specific. Components are
/// already normalized; empty components suppress the keys that need them.
fn composite_keys(number: &str, street: &str, city: &str, postcode: &str) -> Vec<String> {
    let mut keys = Vec::new();

    if number.is_empty() || street.is_empty() {
        return keys;
    }

    keys.push(format!("{number}{KEY_SEPARATOR}{street}"));

    if !city.is_empty() {
        keys.push(format!("{number}{KEY_SEPARATOR}{street}{KEY_SEPARATOR}{city}"));

        if !postcode.is_empty() {
            keys.push(format!(
                "{number}{KEY_SEPARATOR}{street}{KEY_SEPARATOR}{city}{KEY_SEPARATOR}{postcode}"
            ));
        }
    }

    keys
}

/// Splits `"number street, city, postcode"` into components. The first
/// comma-separated part is split on whitespace: first token is the house
/// number, the rest is the street.
fn parse_structured_query(query: &str) -> ParsedAddress {
    let parts: Vec<&str> = query
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect();

    let mut parsed = ParsedAddress::default();

    if let Some(first) = parts.first() {
        let mut tokens = first.split_whitespace();
        if let Some(number) = tokens.next() {
            parsed.number = number.to_string();
        }
        parsed.street = tokens.collect::<Vec<_>>().join(" ");
    }
    if let Some(city) = parts.get(1) {
        parsed.city = city.to_string();
    }
    if let Some(postcode) = parts.get(2) {
        parsed.postcode = postcode.to_string();
    }

    parsed
}
