//! Data Node server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    extract::Extension,
    routing::{get, post},
};
use geoshard::config::NodeConfig;
use geoshard::lifecycle::shutdown_signal;
use geoshard::node::DataNode;
use geoshard::node::handlers::{handle_search, handle_statistics};
use geoshard::node::protocol::{ENDPOINT_SEARCH, ENDPOINT_STATISTICS};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let config = NodeConfig::from_env()?;
    tracing::info!(
        "Starting data node: shard_id={}, data file {}, rpc port {}",
        config.shard_id,
        config.data_file_path.display(),
        config.rpc_port
    );

    let mut node = DataNode::new(config.shard_id, config.data_file_path.clone());
    node.initialize()?;

    let stats = node.statistics();
    tracing::info!(
        "Startup statistics: {} records, radix {} bytes, forward {} bytes, loaded in {} ms",
        stats.total_records,
        stats.radix_memory_bytes,
        stats.forward_bytes,
        stats.load_time_ms
    );

    let node = Arc::new(node);
    let app = Router::new()
        .route(ENDPOINT_SEARCH, post(handle_search))
        .route(ENDPOINT_STATISTICS, get(handle_statistics))
        .layer(Extension(node));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.rpc_port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("RPC server listening on {}", addr);
    tracing::info!("Press Ctrl+C to shutdown");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Data node stopped");
    Ok(())
}
