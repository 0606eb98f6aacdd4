//! Error types for the core library

use serde::Serialize;
use thiserror::Error;

/// A single schema violation found while validating run input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// JSON pointer into the offending input, e.g. `/0/content`
    pub loc: String,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid body: {0}")]
    InvalidBody(String),

    #[error("Assistant not found: {0}")]
    AssistantNotFound(String),

    #[error("Input validation failed with {} error(s)", errors.len())]
    InputValidation {
        body: serde_json::Value,
        errors: Vec<FieldError>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Agent error: {0}")]
    Agent(String),

    #[error("Telemetry error: {0}")]
    Telemetry(String),
}
