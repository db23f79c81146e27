//! Custom middleware implementations for the API.
//!
//! This module contains middleware for request IDs, metrics collection
//! and MCP context detection.

pub mod mcp;
pub mod metrics;
pub mod request_id;

pub use mcp::*;
pub use metrics::*;
pub use request_id::*;
