//! HTTP request handlers for API endpoints.

pub mod health;
pub mod metrics;
pub mod openapi;
pub mod tools;
pub mod version;

pub use health::*;
pub use metrics::*;
pub use openapi::*;
pub use tools::*;
pub use version::*;
