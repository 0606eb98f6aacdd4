//! Agent runtime trait

use async_trait::async_trait;
use futures::stream::BoxStream;
use serde_json::Value;

use crate::Result;

/// Event emitted while streaming a run
#[derive(Debug, Clone, PartialEq)]
pub enum RunEvent {
    /// First event of a stream, identifies the run
    Metadata { run_id: String },
    /// Output chunk, usually the message list so far
    Data(Value),
    /// The run failed; no further data follows
    Error(String),
    /// Stream finished
    End,
}

impl RunEvent {
    /// SSE event name used on the wire
    pub fn name(&self) -> &'static str {
        match self {
            RunEvent::Metadata { .. } => "metadata",
            RunEvent::Data(_) => "data",
            RunEvent::Error(_) => "error",
            RunEvent::End => "end",
        }
    }
}

pub type RunEventStream = BoxStream<'static, Result<RunEvent>>;

/// Interface of the external agent runtime
///
/// Input validation, execution and streaming all belong to the runtime;
/// the service only forwards input and configuration to it.
#[async_trait]
pub trait AgentRuntime: Send + Sync {
    /// JSON schema of the run input, optionally specialised for a config
    async fn input_schema(&self, config: Option<&Value>) -> Result<Value>;

    /// JSON schema of the run output
    async fn output_schema(&self) -> Result<Value>;

    /// JSON schema of the runnable config
    async fn config_schema(&self) -> Result<Value>;

    /// Run to completion and return the output
    async fn invoke(&self, input: Option<Value>, config: Value) -> Result<Value>;

    /// Start a run and stream its events
    async fn stream(&self, input: Option<Value>, config: Value) -> Result<RunEventStream>;
}
