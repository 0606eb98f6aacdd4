//! Feedback records and the client interface

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::Result;

/// Numeric or boolean feedback score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeedbackScore {
    Bool(bool),
    Int(i64),
    Float(f64),
}

/// Feedback on a single run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackCreateRequest {
    pub run_id: Uuid,
    pub key: String,
    #[serde(default)]
    pub score: Option<FeedbackScore>,
    #[serde(default)]
    pub value: Option<Value>,
    #[serde(default)]
    pub comment: Option<String>,
}

/// Sink for run feedback
#[async_trait]
pub trait FeedbackClient: Send + Sync {
    /// Submit feedback; `Ok` means the service accepted the request
    async fn create_feedback(&self, feedback: &FeedbackCreateRequest) -> Result<()>;
}
