//! Sharded Address-Search Cluster Library
//!
//! This library crate defines the core modules of the address-search service.
//! It serves as the foundation for the two binaries (`data_node` and `gateway`).
//!
//! ## Architecture Modules
//! The system is composed of five loosely coupled subsystems:
//!
//! - **`ingest`**: The data intake pipeline. Parses shard CSV files into
//!   validated address records and canonicalizes address text (case,
//!   whitespace, street suffixes).
//! - **`index`**: The in-memory dual index. A space-compressed radix trie maps
//!   normalized terms to record IDs; a forward store maps record IDs back to
//!   full records.
//! - **`node`**: The Data Node. Owns one shard's indexes, executes multi-term
//!   prefix search, and serves the internode RPC surface.
//! - **`gateway`**: The query front door. Fans a request out to every data
//!   node in parallel, tolerates partial failures, then scores, deduplicates,
//!   and truncates the merged results.
//! - **`config`** / **`lifecycle`**: Typed settings from the environment and
//!   signal-driven graceful shutdown shared by both binaries.

pub mod config;
pub mod gateway;
pub mod index;
pub mod ingest;
pub mod lifecycle;
pub mod node;
