//! Agent module
//!
//! The agent itself runs in an external runtime. This module defines the
//! interface the service needs from it and an HTTP client speaking to it.

mod http_runtime;
mod runtime;

pub use http_runtime::HttpAgentRuntime;
pub use runtime::{AgentRuntime, RunEvent, RunEventStream};
