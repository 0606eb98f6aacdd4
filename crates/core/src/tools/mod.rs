//! Tools exposed to the agent
//!
//! All tools implement [`Tool`] so the agent runtime can describe and call
//! them uniformly.

mod trending_titles;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::Result;

pub use trending_titles::{TrendingTitlesApiWrapper, TrendingTitlesTool, TRENDING_TITLES_URL};

/// Description of a tool as advertised to the agent
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub args_schema: Value,
}

/// Trait for tools that the agent can use
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get the name of this tool
    fn name(&self) -> &str;

    /// Get a description of this tool
    fn description(&self) -> &str;

    /// JSON schema of the tool arguments
    fn args_schema(&self) -> Value;

    /// Execute the tool with the given input
    async fn run(&self, input: &Value) -> Result<Value>;

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            args_schema: self.args_schema(),
        }
    }
}
