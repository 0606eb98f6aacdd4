//! Assistant repository trait
//!
//! Defines the interface for assistant storage operations.

use async_trait::async_trait;

use super::model::{Assistant, PutAssistantRequest};
use crate::Result;

/// Repository interface for assistants keyed by owner identity and id
#[async_trait]
pub trait AssistantRepository: Send + Sync {
    /// Get the assistant stored under `user_id`
    async fn get(&self, user_id: &str, assistant_id: &str) -> Result<Option<Assistant>>;

    /// Create or replace an assistant owned by `user_id`
    async fn put(
        &self,
        user_id: &str,
        assistant_id: &str,
        request: PutAssistantRequest,
    ) -> Result<Assistant>;

    /// List assistants owned by `user_id`
    async fn list(&self, user_id: &str) -> Result<Vec<Assistant>>;

    /// List assistants shared under the public identity
    async fn list_public(&self) -> Result<Vec<Assistant>>;
}
