//! Query Gateway
//!
//! The public front door of the cluster. Each `findAddress` request fans
//! out to every configured data node in parallel, tolerates shards that
//! time out or fail, then merges the survivors: scoring each record against
//! the query, collapsing duplicates that appear on multiple shards, and
//! keeping only the top results.
//!
//! ## Submodules
//! - **`fanout`**: Parallel RPC dispatch with per-call deadlines and
//!   partial-failure accounting.
//! - **`aggregator`**: Relevance scoring, deduplication, ordering and
//!   truncation of the merged result set.
//! - **`handlers`**: Axum handlers for the external HTTP API.
//! - **`types`**: DTOs for the HTTP API and the per-shard result envelope.

pub mod aggregator;
pub mod fanout;
pub mod handlers;
pub mod types;
