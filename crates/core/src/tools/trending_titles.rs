//! Trending titles tool
//!
//! Wraps a single webhook call returning the current trending titles.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::info;

use super::Tool;
use crate::Result;

pub const TRENDING_TITLES_URL: &str =
    "https://kno2getherworkflow.ddns.net/webhook/getTrendingTitles";

/// Client for the trending titles API
#[derive(Clone)]
pub struct TrendingTitlesApiWrapper {
    client: Client,
    api_key: String,
    url: String,
}

impl TrendingTitlesApiWrapper {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            url: TRENDING_TITLES_URL.to_string(),
        }
    }

    /// Point the wrapper at another endpoint
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Retrieve trending titles; any non-success status is an error
    pub async fn get_trending_titles(&self) -> Result<Value> {
        info!("Fetching trending titles from {}", self.url);
        let titles = self
            .client
            .post(&self.url)
            .header("api-key", &self.api_key)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(titles)
    }
}

/// Tool that fetches trending titles
pub struct TrendingTitlesTool {
    api_wrapper: TrendingTitlesApiWrapper,
}

impl TrendingTitlesTool {
    pub fn new(api_wrapper: TrendingTitlesApiWrapper) -> Self {
        Self { api_wrapper }
    }
}

#[async_trait]
impl Tool for TrendingTitlesTool {
    fn name(&self) -> &str {
        "trending_titles"
    }

    fn description(&self) -> &str {
        "A wrapper around an API that provides trending titles. \
         Useful for when you need to fetch current trending topics or titles."
    }

    fn args_schema(&self) -> Value {
        json!({"type": "object", "properties": {}})
    }

    async fn run(&self, _input: &Value) -> Result<Value> {
        self.api_wrapper.get_trending_titles().await
    }
}
