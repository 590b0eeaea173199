//! Gateway server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router, middleware,
    extract::Extension,
    routing::{get, post},
};
use geoshard::config::GatewayConfig;
use geoshard::gateway::fanout::Gateway;
use geoshard::gateway::handlers::{
    cors_middleware, handle_find_address, handle_health, handle_index,
};
use geoshard::lifecycle::shutdown_signal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let config = GatewayConfig::from_env()?;
    let http_port = config.http_port;
    let gateway = Arc::new(Gateway::new(config));

    // Best-effort probe of every shard's statistics. Shards may still be
    // loading; a failed probe is logged, never fatal.
    let nodes = gateway.config().data_nodes.clone();
    for node in &nodes {
        match gateway.fetch_statistics(node).await {
            Ok(stats) => tracing::info!(
                "Shard {} ready: {} records, loaded in {} ms",
                node.shard_id,
                stats.total_records,
                stats.load_time_ms
            ),
            Err(e) => tracing::warn!("Shard {} statistics unavailable: {}", node.shard_id, e),
        }
    }

    let app = Router::new()
        .route("/health", get(handle_health))
        .route("/", get(handle_index))
        .route("/api/findAddress", post(handle_find_address))
        .layer(middleware::from_fn(cors_middleware))
        .layer(Extension(gateway));

    let addr = SocketAddr::from(([0, 0, 0, 0], http_port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("HTTP API available at http://{}", addr);
    tracing::info!("Endpoint: POST /api/findAddress");
    tracing::info!("Press Ctrl+C to shutdown");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Gateway server stopped");
    Ok(())
}
