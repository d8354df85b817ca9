//! Common test infrastructure
//!
//! Tests should only import from this module, not from internal submodules.
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::TestServer;
//!
//! #[tokio::test]
//! async fn test_echo() {
//!     let server = TestServer::spawn().await;
//!     let client = server.client().await;
//!
//!     let result = client.call_tool("echo", serde_json::json!({"message": "hi"})).await.unwrap();
//!     assert_eq!(result.first_text(), Some("Echo: hi"));
//! }
//! ```

mod constants;
mod indexer;
mod server;

// Public API - this is what tests import
pub use constants::*;
#[allow(unused_imports)]
pub use indexer::FakeIndexer;
pub use server::TestServer;
