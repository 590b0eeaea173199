//! Internode RPC Protocol
//!
//! Defines the API endpoints and Data Transfer Objects (DTOs) exchanged
//! between the gateway and the data nodes. Both RPC methods are unary:
//! JSON in, JSON out, one response per request.
//!
//! Record IDs travel the wire as hex strings even though the nodes index
//! them as `u64`; conversion happens only at this serialization boundary,
//! and the gateway echoes the string through to its own HTTP response.

use serde::{Deserialize, Serialize};

use crate::ingest::types::AddressRecord;

// --- API Endpoints ---

/// Unary search: query terms in, matching records out.
pub const ENDPOINT_SEARCH: &str = "/internal/search";
/// Index-accounting snapshot captured at load time.
pub const ENDPOINT_STATISTICS: &str = "/internal/statistics";

// --- Data Transfer Objects ---

/// Search request sent by the gateway to every shard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query_terms: Vec<String>,
}

/// One address record as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireAddressRecord {
    /// Hex representation of the record's 64-bit hash.
    pub hash: String,
    pub longitude: f64,
    pub latitude: f64,
    pub number: String,
    pub street: String,
    pub unit: String,
    pub city: String,
    pub postcode: String,
}

impl From<&AddressRecord> for WireAddressRecord {
    fn from(record: &AddressRecord) -> Self {
        Self {
            hash: format!("{:016x}", record.hash),
            longitude: record.longitude,
            latitude: record.latitude,
            number: record.number.clone(),
            street: record.street.clone(),
            unit: record.unit.clone(),
            city: record.city.clone(),
            postcode: record.postcode.clone(),
        }
    }
}

/// Search response returned by a data node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<WireAddressRecord>,
    pub result_count: usize,
}

/// Statistics response returned by a data node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatisticsResponse {
    pub total_records: u64,
    pub radix_tree_memory: u64,
    pub forward_index_size: u64,
    pub load_time_ms: u64,
}

/// Error body for a failed RPC call.
#[derive(Debug, Serialize, Deserialize)]
pub struct RpcError {
    pub error: String,
}
