//! Orchestrating client: chains weather, AQI and advisory tool calls for a
//! location and drives them from an interactive prompt.

pub mod agent;
pub mod repl;
pub mod tool_client;

pub use agent::AqiAgent;
pub use repl::run_repl;
pub use tool_client::{AgentError, ToolClient};
