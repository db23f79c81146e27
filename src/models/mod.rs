//! Data models for the tool surface.
//!
//! This module contains the request/response bodies of the HTTP API, the
//! tool catalogue, the MCP context envelope and the report records the tools
//! produce.

pub mod api;
pub mod mcp;
pub mod reports;
pub mod tools;

pub use api::*;
pub use mcp::*;
pub use reports::*;
pub use tools::*;
