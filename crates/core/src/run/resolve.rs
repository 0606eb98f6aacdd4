//! Run request resolution
//!
//! Looks the assistant up under the caller's identity and the public
//! identity, merges its config with the per-run identifiers and validates
//! the input against the schema the runtime reports for that config.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::config::merge_run_config;
use super::validate::validate_input;
use crate::agent::AgentRuntime;
use crate::assistant::{AssistantRepository, PUBLIC_USER_ID};
use crate::{Error, Result};

/// Payload for creating a run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRunPayload {
    pub assistant_id: String,
    pub thread_id: String,
    /// Message list; `null` or absent means "continue without new input"
    #[serde(default)]
    pub input: Option<Value>,
}

/// Input and configuration ready to be handed to the runtime
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRun {
    pub input: Option<Value>,
    pub config: Value,
}

/// Resolve a raw run-creation body for `user_id`.
///
/// Fails with [`Error::InvalidBody`] before any lookup when the body is not
/// a run payload, with [`Error::AssistantNotFound`] when neither identity
/// owns the assistant, and with [`Error::InputValidation`] when the input
/// does not match the runtime's input schema.
pub async fn resolve_run(
    body: &[u8],
    user_id: &str,
    assistants: &dyn AssistantRepository,
    runtime: &dyn AgentRuntime,
) -> Result<ResolvedRun> {
    let raw: Value = serde_json::from_slice(body)
        .map_err(|_| Error::InvalidBody("Invalid JSON body".to_string()))?;
    let payload: CreateRunPayload = serde_json::from_value(raw.clone())
        .map_err(|e| Error::InvalidBody(format!("Invalid run payload: {}", e)))?;

    let (owned, public) = tokio::join!(
        assistants.get(user_id, &payload.assistant_id),
        assistants.get(PUBLIC_USER_ID, &payload.assistant_id),
    );
    let assistant = match (owned?, public?) {
        (Some(assistant), _) | (None, Some(assistant)) => assistant,
        (None, None) => return Err(Error::AssistantNotFound(payload.assistant_id)),
    };
    debug!(
        assistant_id = %payload.assistant_id,
        owner = %assistant.user_id,
        "Resolved assistant for run"
    );

    let config = merge_run_config(
        &assistant.config,
        user_id,
        &payload.thread_id,
        &payload.assistant_id,
    );

    let input = match payload.input {
        Some(input) => {
            let schema = runtime.input_schema(Some(&config)).await?;
            let errors = validate_input(&schema, &input)?;
            if !errors.is_empty() {
                return Err(Error::InputValidation { body: raw, errors });
            }
            Some(input)
        }
        None => None,
    };

    Ok(ResolvedRun { input, config })
}
