//! Shared constants for end-to-end tests
//!
//! Data served by the fake indexer lives here, so tests and fixtures agree.

#![allow(dead_code)]

// ============================================================================
// Server
// ============================================================================

pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 20;

// ============================================================================
// Indexer Data
// ============================================================================

pub const LATEST_BLOCK_HEIGHT: u64 = 123_456;
pub const LATEST_BLOCK_HASH: &str = "0a1b2c3d";
pub const LATEST_BLOCK_TIMESTAMP: u64 = 1_735_689_600_000;

/// Block hash the indexer reports as not found
pub const UNKNOWN_BLOCK_HASH: &str = "deadbeef";
pub const UNKNOWN_BLOCK_ERROR: &str = "block not found";

pub const TRANSACTION_HASH: &str = "f00dcafe";
pub const CONTRACT_ADDRESS: &str = "0200aabbcc";
pub const STAKE_KEY_1: &str = "e1a2b3";
pub const STAKE_KEY_2: &str = "e1c4d5";
