//! Data Node RPC Handlers
//!
//! Axum handlers exposing the node's search pipeline and statistics over
//! the internode protocol. These are the only entry points into a running
//! data node; they translate wire DTOs into calls on [`DataNode`].

use std::sync::Arc;

use axum::{Extension, Json, http::StatusCode};

use super::DataNode;
use super::protocol::{SearchRequest, SearchResponse, StatisticsResponse, WireAddressRecord};

/// Unary search. Faults inside the node surface as empty results rather
/// than errors, so a shard never propagates a panic to the gateway.
pub async fn handle_search(
    Extension(node): Extension<Arc<DataNode>>,
    Json(request): Json<SearchRequest>,
) -> (StatusCode, Json<SearchResponse>) {
    tracing::info!(
        "Search request received with {} term(s): {:?}",
        request.query_terms.len(),
        request.query_terms
    );

    let records = node.search(&request.query_terms);
    let results: Vec<WireAddressRecord> = records.iter().map(WireAddressRecord::from).collect();
    let result_count = results.len();

    tracing::info!("Search completed, returning {} result(s)", result_count);

    (
        StatusCode::OK,
        Json(SearchResponse {
            results,
            result_count,
        }),
    )
}

/// Index-accounting snapshot, captured once at the end of the load.
pub async fn handle_statistics(
    Extension(node): Extension<Arc<DataNode>>,
) -> (StatusCode, Json<StatisticsResponse>) {
    let stats = node.statistics();

    tracing::debug!("Statistics request served (shard_id={})", node.shard_id());

    (
        StatusCode::OK,
        Json(StatisticsResponse {
            total_records: stats.total_records,
            radix_tree_memory: stats.radix_memory_bytes,
            forward_index_size: stats.forward_bytes,
            load_time_ms: stats.load_time_ms,
        }),
    )
}
