//! Gateway DTOs
//!
//! The per-shard result envelope produced by the fan-out, the scored record
//! produced by the aggregator, and the JSON shapes of the external HTTP API.

use serde::{Deserialize, Serialize};

use crate::node::protocol::WireAddressRecord;


/// Outcome of one shard's RPC during a single request. Lives only for the
/// duration of that request.
#[derive(Debug, Clone)]
pub struct DataNodeResult {
    pub shard_id: u32,
    pub success: bool,
    pub error_message: String,
    pub records: Vec<WireAddressRecord>,
}

impl DataNodeResult {
    pub fn ok(shard_id: u32, records: Vec<WireAddressRecord>) -> Self {
        Self {
            shard_id,
            success: true,
            error_message: String::new(),
            records,
        }
    }

    pub fn failed(shard_id: u32, error_message: impl Into<String>) -> Self {
        Self {
            shard_id,
            success: false,
            error_message: error_message.into(),
            records: Vec::new(),
        }
    }
}

/// A record paired with its relevance score and originating shard.
#[derive(Debug, Clone)]
pub struct ScoredRecord {
    pub record: WireAddressRecord,
    pub shard_id: u32,
    pub relevance_score: f64,
}

/// One entry of the `results` array in the HTTP response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ResultRecord {
    pub hash: String,
    pub longitude: f64,
    pub latitude: f64,
    pub number: String,
    pub street: String,
    pub unit: String,
    pub city: String,
    pub postcode: String,
    pub shard_id: u32,
    pub relevance_score: f64,
}

impl From<ScoredRecord> for ResultRecord {
    fn from(scored: ScoredRecord) -> Self {
        Self {
            hash: scored.record.hash,
            longitude: scored.record.longitude,
            latitude: scored.record.latitude,
            number: scored.record.number,
            street: scored.record.street,
            unit: scored.record.unit,
            city: scored.record.city,
            postcode: scored.record.postcode,
            shard_id: scored.shard_id,
            relevance_score: scored.relevance_score,
        }
    }
}

/// Response of `POST /api/findAddress`, on success and on partial or total
/// shard failure alike.
#[derive(Debug, Serialize, Deserialize)]
pub struct FindAddressResponse {
    pub query: String,
    pub query_terms: Vec<String>,
    pub results: Vec<ResultRecord>,
    pub result_count: usize,
    pub successful_nodes: usize,
    pub failed_nodes: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Response of `GET /health`.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub data_nodes: usize,
}

/// Fallback body for `GET /` when the static frontend file is unavailable.
#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub service: String,
    pub version: String,
    pub endpoints: Vec<String>,
}
