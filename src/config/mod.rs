//! Configuration structures and loading utilities.
//!
//! Every configuration struct has a `Default` and a `from_env()` constructor
//! that falls back to the default for absent or unparsable variables.

pub mod advisory;
pub mod agent;
pub mod resilient_client;
pub mod server;
pub mod tools;

pub use advisory::*;
pub use agent::*;
pub use server::*;
pub use tools::*;

use std::env;
use std::str::FromStr;

/// Parse an environment variable, falling back to `default`
pub(crate) fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Read a string variable, treating blank values as absent
pub(crate) fn env_string(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
