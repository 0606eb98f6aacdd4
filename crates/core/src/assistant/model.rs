//! Assistant model definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Well-known owner identity under which shared assistants are stored.
pub const PUBLIC_USER_ID: &str = "eef39817-c173-4eb6-8be4-f77cf37054fb";

/// A stored assistant record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Assistant {
    pub assistant_id: String,

    /// Owner identity of this copy of the record
    pub user_id: String,

    pub name: String,

    /// Runnable config; may carry a nested `configurable` object
    #[serde(default)]
    pub config: Value,

    #[serde(default)]
    pub public: bool,

    pub updated_at: DateTime<Utc>,
}

impl Assistant {
    pub fn new(
        user_id: impl Into<String>,
        assistant_id: impl Into<String>,
        name: impl Into<String>,
        config: Value,
    ) -> Self {
        Self {
            assistant_id: assistant_id.into(),
            user_id: user_id.into(),
            name: name.into(),
            config,
            public: false,
            updated_at: Utc::now(),
        }
    }

    pub fn with_public(mut self, public: bool) -> Self {
        self.public = public;
        self
    }
}

/// Request body for creating or replacing an assistant.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PutAssistantRequest {
    pub name: String,
    #[serde(default)]
    pub config: Value,
    #[serde(default)]
    pub public: bool,
}
