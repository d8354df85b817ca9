//! Query executor for the ledger indexer.
//!
//! Builds GraphQL documents in code and sends them, one round trip per call,
//! to the configured endpoint.

pub mod client;
pub mod document;

pub use client::{GraphqlClient, GraphqlQuery, QueryError, QueryExecutor};
pub use document::{Document, Field, Fragment};

/// Default indexer endpoint (Midnight testnet-02).
pub const DEFAULT_GRAPHQL_URL: &str = "https://rpc.testnet-02.midnight.network/graphql";
