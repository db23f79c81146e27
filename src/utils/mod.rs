//! Small helpers shared by middleware and handlers.

pub mod build_info;
pub mod http;
pub mod route;

pub use http::*;
pub use route::*;
