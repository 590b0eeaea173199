//! Gateway HTTP Handlers
//!
//! The external API surface: health probe, the static frontend page, and
//! the `findAddress` search endpoint. Request bodies are parsed by hand so
//! that malformed JSON and missing fields produce the documented 400
//! bodies instead of framework defaults. Every response carries a
//! permissive CORS header, added by [`cors_middleware`].

use std::sync::Arc;

use axum::{
    Extension, Json,
    body::Body,
    extract::Request,
    http::{HeaderValue, StatusCode, header},
    middleware::Next,
    response::{Html, IntoResponse, Response},
};
use serde_json::json;
use uuid::Uuid;

use super::aggregator::aggregate_and_rank;
use super::fanout::{Gateway, summarize};
use super::types::{FindAddressResponse, HealthResponse, ResultRecord, ServiceInfo};

/// Appends `Access-Control-Allow-Origin: *` to every response.
pub async fn cors_middleware(request: Request<Body>, next: Next) -> Response {
    let mut response = next.run(request).await;
    response.headers_mut().insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    response
}

/// `GET /health`
pub async fn handle_health(Extension(gateway): Extension<Arc<Gateway>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        data_nodes: gateway.data_node_count(),
    })
}

/// `GET /` — serves the configured frontend HTML, or a JSON service-info
/// document when the file is unavailable.
pub async fn handle_index(Extension(gateway): Extension<Arc<Gateway>>) -> Response {
    match tokio::fs::read_to_string(&gateway.config().static_html_path).await {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::debug!(
                "Frontend file {} unavailable ({}), serving service info",
                gateway.config().static_html_path.display(),
                e
            );
            Json(ServiceInfo {
                service: "Geocoding Gateway".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                endpoints: vec!["/health".to_string(), "/api/findAddress".to_string()],
            })
            .into_response()
        }
    }
}

/// `POST /api/findAddress`
pub async fn handle_find_address(
    Extension(gateway): Extension<Arc<Gateway>>,
    body: String,
) -> Response {
    match find_address(gateway, &body).await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!("findAddress failed: {:#}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Internal server error",
                    "details": format!("{e:#}"),
                })),
            )
                .into_response()
        }
    }
}

async fn find_address(gateway: Arc<Gateway>, body: &str) -> anyhow::Result<Response> {
    let json_body: serde_json::Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(_) => return Ok(bad_request("Invalid JSON in request body")),
    };

    let Some(address) = json_body.get("address").and_then(|v| v.as_str()) else {
        return Ok(bad_request("Missing 'address' field in request body"));
    };

    if address.is_empty() {
        return Ok(bad_request("Address keyword cannot be empty"));
    }

    let query_terms = split_query_terms(address);
    if query_terms.is_empty() {
        return Ok(bad_request("Address keyword must contain at least one term"));
    }

    let request_id = Uuid::new_v4().to_string();
    tracing::info!(
        "[{}] findAddress {:?} -> {} term(s): {:?}",
        request_id,
        address,
        query_terms.len(),
        query_terms
    );

    let results = gateway.query_all_data_nodes(&query_terms, &request_id).await;
    let summary = summarize(&results);

    for result in results.iter().filter(|r| !r.success) {
        tracing::warn!(
            "[{}] Data node {} failed: {}",
            request_id,
            result.shard_id,
            result.error_message
        );
    }

    let ranked = aggregate_and_rank(&results, &query_terms, gateway.config().max_results);
    tracing::info!(
        "[{}] Returning {} ranked result(s) from {} successful node(s)",
        request_id,
        ranked.len(),
        summary.successful_nodes
    );

    let status = status_for(summary.successful_nodes, summary.failed_nodes);
    let error = (status == StatusCode::SERVICE_UNAVAILABLE)
        .then(|| "All data nodes failed to respond".to_string());

    let response = FindAddressResponse {
        query: address.to_string(),
        query_terms,
        result_count: ranked.len(),
        results: ranked.into_iter().map(ResultRecord::from).collect(),
        successful_nodes: summary.successful_nodes,
        failed_nodes: summary.failed_nodes,
        error,
    };

    Ok((status, Json(response)).into_response())
}

/// A comma marks a structured address query, passed through as a single
/// term for the data nodes to parse. Anything else splits on ASCII
/// whitespace.
pub fn split_query_terms(address: &str) -> Vec<String> {
    if address.contains(',') {
        vec![address.to_string()]
    } else {
        address.split_ascii_whitespace().map(str::to_string).collect()
    }
}

/// Status-code policy: all shards healthy is 200; partial failure with
/// usable results is 207; nothing reachable is 503.
pub fn status_for(successful_nodes: usize, failed_nodes: usize) -> StatusCode {
    if failed_nodes == 0 {
        StatusCode::OK
    } else if successful_nodes > 0 {
        StatusCode::MULTI_STATUS
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

fn bad_request(message: &str) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
}
