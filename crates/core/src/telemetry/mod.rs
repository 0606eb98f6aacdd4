//! Telemetry module
//!
//! Feedback on runs is relayed to an external tracing service. Nothing is
//! stored locally; a successful call only confirms submission.

mod feedback;
mod langsmith;

pub use feedback::{FeedbackClient, FeedbackCreateRequest, FeedbackScore};
pub use langsmith::{LangSmithClient, TelemetryConfig, DEFAULT_ENDPOINT};
