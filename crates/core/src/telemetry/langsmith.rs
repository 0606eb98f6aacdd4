//! LangSmith feedback client

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, info};
use uuid::Uuid;

use super::feedback::{FeedbackClient, FeedbackCreateRequest, FeedbackScore};
use crate::{Error, Result};

pub const DEFAULT_ENDPOINT: &str = "https://api.smith.langchain.com";

/// Connection settings for the tracing service
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: None,
        }
    }
}

#[derive(Serialize)]
struct FeedbackPayload<'a> {
    id: Uuid,
    run_id: Uuid,
    key: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    score: Option<&'a FeedbackScore>,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<&'a Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    comment: Option<&'a str>,
    feedback_source: Value,
}

pub struct LangSmithClient {
    client: Client,
    config: TelemetryConfig,
}

impl LangSmithClient {
    pub fn new(config: TelemetryConfig) -> Self {
        info!("Creating LangSmith client for {}", config.endpoint);
        Self {
            client: Client::new(),
            config,
        }
    }

    fn feedback_url(&self) -> String {
        format!("{}/feedback", self.config.endpoint.trim_end_matches('/'))
    }
}

#[async_trait]
impl FeedbackClient for LangSmithClient {
    async fn create_feedback(&self, feedback: &FeedbackCreateRequest) -> Result<()> {
        let payload = FeedbackPayload {
            id: Uuid::new_v4(),
            run_id: feedback.run_id,
            key: &feedback.key,
            score: feedback.score.as_ref(),
            value: feedback.value.as_ref(),
            comment: feedback.comment.as_deref(),
            feedback_source: json!({
                "type": "api",
                "metadata": {"from_langserve": true},
            }),
        };

        let mut request = self.client.post(self.feedback_url()).json(&payload);
        if let Some(api_key) = &self.config.api_key {
            request = request.header("x-api-key", api_key);
        }

        let res = request.send().await?;
        let status = res.status();
        if !status.is_success() {
            let error_text = res.text().await.unwrap_or_default();
            return Err(Error::Telemetry(format!(
                "Feedback submission returned {}: {}",
                status, error_text
            )));
        }

        debug!(run_id = %feedback.run_id, key = %feedback.key, "Feedback submitted");
        Ok(())
    }
}
