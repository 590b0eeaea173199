//! Process Configuration
//!
//! Typed settings read from environment variables, one struct per role.
//! Invalid values fall into two classes: ones that make the process
//! meaningless (bad `SHARD_ID`, bad `HTTP_PORT`, no data nodes) abort
//! startup; tunables (`RPC_PORT`, `RPC_TIMEOUT_MS`) log a warning and fall
//! back to their defaults.

use std::path::PathBuf;

use anyhow::bail;

pub const DEFAULT_HTTP_PORT: u16 = 18080;
pub const DEFAULT_RPC_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_MAX_RESULTS: usize = 5;
const BASE_RPC_PORT: u16 = 50051;

/// Settings for a data node process.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub shard_id: u32,
    pub data_file_path: PathBuf,
    pub rpc_port: u16,
}

impl NodeConfig {
    /// Reads `SHARD_ID` (default 0), `DATA_FILE_PATH` (default
    /// `data/shard_<id>_data_demo.csv`) and `RPC_PORT` (default
    /// `50051 + SHARD_ID`).
    pub fn from_env() -> anyhow::Result<Self> {
        let shard_id = match std::env::var("SHARD_ID") {
            Ok(raw) => match raw.parse::<u32>() {
                Ok(id) => id,
                Err(_) => bail!("invalid SHARD_ID: {raw:?} (must be a non-negative integer)"),
            },
            Err(_) => 0,
        };

        let data_file_path = std::env::var("DATA_FILE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(format!("data/shard_{shard_id}_data_demo.csv")));

        let default_port = BASE_RPC_PORT.saturating_add(shard_id as u16);
        let rpc_port = match std::env::var("RPC_PORT") {
            Ok(raw) => match raw.parse::<u16>() {
                Ok(port) => port,
                Err(_) => {
                    tracing::warn!("Invalid RPC_PORT {:?}, using default {}", raw, default_port);
                    default_port
                }
            },
            Err(_) => default_port,
        };

        Ok(Self {
            shard_id,
            data_file_path,
            rpc_port,
        })
    }
}

/// Address of one data node as seen from the gateway.
#[derive(Debug, Clone)]
pub struct ShardAddress {
    pub shard_id: u32,
    /// `host:port` without a scheme.
    pub address: String,
}

/// Settings for a gateway process.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub http_port: u16,
    pub data_nodes: Vec<ShardAddress>,
    pub rpc_timeout_ms: u64,
    pub static_html_path: PathBuf,
    pub max_results: usize,
}

impl GatewayConfig {
    /// Reads `HTTP_PORT`, the contiguous `DATA_NODE_0`, `DATA_NODE_1`, …
    /// list, `RPC_TIMEOUT_MS`, `STATIC_HTML_PATH` and `MAX_RESULTS`.
    ///
    /// When no `DATA_NODE_n` variable is set the two local development
    /// defaults (`localhost:50051`, `localhost:50052`) apply; an explicitly
    /// empty node list is a fatal configuration error.
    pub fn from_env() -> anyhow::Result<Self> {
        let http_port = match std::env::var("HTTP_PORT") {
            Ok(raw) => match raw.parse::<u16>() {
                Ok(port) if port > 0 => port,
                _ => bail!("invalid HTTP_PORT: {raw:?} (must be between 1 and 65535)"),
            },
            Err(_) => DEFAULT_HTTP_PORT,
        };

        let mut data_nodes = Vec::new();
        for shard_id in 0u32.. {
            match std::env::var(format!("DATA_NODE_{shard_id}")) {
                Ok(address) if !address.trim().is_empty() => data_nodes.push(ShardAddress {
                    shard_id,
                    address: address.trim().to_string(),
                }),
                _ => break,
            }
        }
        if data_nodes.is_empty() {
            tracing::info!("No DATA_NODE_n variables set, using local development defaults");
            data_nodes = vec![
                ShardAddress {
                    shard_id: 0,
                    address: "localhost:50051".to_string(),
                },
                ShardAddress {
                    shard_id: 1,
                    address: "localhost:50052".to_string(),
                },
            ];
        }

        let rpc_timeout_ms = match std::env::var("RPC_TIMEOUT_MS") {
            Ok(raw) => match raw.parse::<i64>() {
                Ok(ms) if ms > 0 => ms as u64,
                _ => {
                    tracing::warn!(
                        "RPC_TIMEOUT_MS must be a positive integer (got {:?}), using default {}",
                        raw,
                        DEFAULT_RPC_TIMEOUT_MS
                    );
                    DEFAULT_RPC_TIMEOUT_MS
                }
            },
            Err(_) => DEFAULT_RPC_TIMEOUT_MS,
        };

        let static_html_path = std::env::var("STATIC_HTML_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("web/index.html"));

        let max_results = match std::env::var("MAX_RESULTS") {
            Ok(raw) => match raw.parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    tracing::warn!(
                        "Invalid MAX_RESULTS {:?}, using default {}",
                        raw,
                        DEFAULT_MAX_RESULTS
                    );
                    DEFAULT_MAX_RESULTS
                }
            },
            Err(_) => DEFAULT_MAX_RESULTS,
        };

        Ok(Self {
            http_port,
            data_nodes,
            rpc_timeout_ms,
            static_html_path,
            max_results,
        })
    }
}
