//! Parallel Shard Fan-out
//!
//! Dispatches one RPC per data node concurrently and waits for every call
//! to settle before returning. There is no early return on first success:
//! partial-failure semantics require one [`DataNodeResult`] per configured
//! shard, success or not, so the caller can count degraded shards.
//!
//! The per-call deadline is the only cancellation mechanism. A shard that
//! exceeds it contributes a timeout failure; the others are unaffected.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::{GatewayConfig, ShardAddress};
use crate::node::protocol::{ENDPOINT_SEARCH, ENDPOINT_STATISTICS, SearchRequest, SearchResponse, StatisticsResponse};

use super::types::DataNodeResult;

/// Counts derived from one fan-out round. Timeouts are a subset of
/// failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FanoutSummary {
    pub successful_nodes: usize,
    pub failed_nodes: usize,
    pub timeouts: usize,
}

pub struct Gateway {
    config: GatewayConfig,
    // One shared client: connections to the shards persist across requests.
    client: reqwest::Client,
}

impl Gateway {
    pub fn new(config: GatewayConfig) -> Self {
        tracing::info!(
            "Gateway created: http_port={}, {} data node(s), rpc timeout {} ms",
            config.http_port,
            config.data_nodes.len(),
            config.rpc_timeout_ms
        );
        for node in &config.data_nodes {
            tracing::info!("  shard {} at {}", node.shard_id, node.address);
        }

        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn data_node_count(&self) -> usize {
        self.config.data_nodes.len()
    }

    /// Queries every configured shard in parallel. The returned list is
    /// aligned with the configured shard list, one entry per shard.
    pub async fn query_all_data_nodes(
        self: &Arc<Self>,
        query_terms: &[String],
        request_id: &str,
    ) -> Vec<DataNodeResult> {
        let overall_start = Instant::now();
        tracing::info!(
            "[{}] Querying {} data node(s) in parallel",
            request_id,
            self.config.data_nodes.len()
        );

        let mut handles = Vec::with_capacity(self.config.data_nodes.len());
        for node in self.config.data_nodes.clone() {
            let gateway = Arc::clone(self);
            let terms = query_terms.to_vec();
            handles.push((
                node.shard_id,
                tokio::spawn(async move { gateway.query_data_node(&node, &terms).await }),
            ));
        }

        let mut results = Vec::with_capacity(handles.len());
        for (shard_id, handle) in handles {
            match handle.await {
                Ok(result) => results.push(result),
                Err(e) => {
                    // A panicked task still produces an entry, keeping the
                    // result list aligned with the shard list.
                    tracing::error!("[{}] Shard {} task failed: {}", request_id, shard_id, e);
                    results.push(DataNodeResult::failed(shard_id, format!("Task failure: {e}")));
                }
            }
        }

        let summary = summarize(&results);
        tracing::info!(
            "[{}] Fan-out completed in {} ms: {} successful, {} failed ({} timeouts)",
            request_id,
            overall_start.elapsed().as_millis(),
            summary.successful_nodes,
            summary.failed_nodes,
            summary.timeouts
        );
        if summary.failed_nodes > 0 && summary.successful_nodes > 0 {
            tracing::warn!(
                "[{}] Partial failure: {} shard(s) degraded",
                request_id,
                summary.failed_nodes
            );
        } else if summary.successful_nodes == 0 {
            tracing::error!("[{}] Complete failure: all shards failed to respond", request_id);
        }

        results
    }

    /// One RPC against one shard, bounded by the configured deadline.
    async fn query_data_node(&self, node: &ShardAddress, query_terms: &[String]) -> DataNodeResult {
        let timeout_ms = self.config.rpc_timeout_ms;
        let url = format!("http://{}{}", node.address, ENDPOINT_SEARCH);
        let request = SearchRequest {
            query_terms: query_terms.to_vec(),
        };
        let start = Instant::now();

        let response = self
            .client
            .post(&url)
            .json(&request)
            .timeout(Duration::from_millis(timeout_ms))
            .send()
            .await;

        let elapsed_ms = start.elapsed().as_millis();

        let response = match response {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                tracing::error!(
                    "Shard {} timed out after {} ms (deadline {} ms)",
                    node.shard_id,
                    elapsed_ms,
                    timeout_ms
                );
                return DataNodeResult::failed(
                    node.shard_id,
                    format!("RPC timeout after {timeout_ms} ms"),
                );
            }
            Err(e) => {
                tracing::error!("Shard {} RPC failed after {} ms: {}", node.shard_id, elapsed_ms, e);
                return DataNodeResult::failed(node.shard_id, format!("RPC error: {e}"));
            }
        };

        if !response.status().is_success() {
            let status = response.status();
            tracing::error!("Shard {} returned HTTP {}", node.shard_id, status);
            return DataNodeResult::failed(
                node.shard_id,
                format!("RPC error: shard returned HTTP {status} (code: {})", status.as_u16()),
            );
        }

        match response.json::<SearchResponse>().await {
            Ok(body) => {
                tracing::info!(
                    "Shard {} returned {} result(s) in {} ms",
                    node.shard_id,
                    body.result_count,
                    elapsed_ms
                );
                DataNodeResult::ok(node.shard_id, body.results)
            }
            Err(e) => {
                tracing::error!("Shard {} sent an undecodable response: {}", node.shard_id, e);
                DataNodeResult::failed(node.shard_id, format!("RPC error: {e}"))
            }
        }
    }

    /// Fetches one shard's load-time statistics snapshot.
    pub async fn fetch_statistics(&self, node: &ShardAddress) -> anyhow::Result<StatisticsResponse> {
        let url = format!("http://{}{}", node.address, ENDPOINT_STATISTICS);
        let response = self
            .client
            .get(&url)
            .timeout(Duration::from_millis(self.config.rpc_timeout_ms))
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json().await?)
    }
}

/// Classifies a completed fan-out round.
pub fn summarize(results: &[DataNodeResult]) -> FanoutSummary {
    let successful_nodes = results.iter().filter(|r| r.success).count();
    let failed_nodes = results.len() - successful_nodes;
    let timeouts = results
        .iter()
        .filter(|r| !r.success && r.error_message.contains("timeout"))
        .count();

    FanoutSummary {
        successful_nodes,
        failed_nodes,
        timeouts,
    }
}
