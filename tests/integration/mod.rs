//! Integration test suite for switchboard.
//!
//! These tests drive the public API from instruction to summary and check
//! that decomposition, dependency ordering, dispatch and aggregation work
//! together.
//!
//! # Test Categories
//!
//! - `scenarios`: Reference instructions against the built-in agents
//! - `execution_order`: Ordering, idempotence and aggregation rules
//! - `server_api`: HTTP handlers over a real orchestrator
//!
//! # CI Compatibility
//!
//! Simulated latency is disabled and all agents are in-process fixtures,
//! so nothing here touches the network.


mod execution_order;
mod server_api;
