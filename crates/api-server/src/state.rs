//! Application state

use std::sync::{Arc, OnceLock};

use gpts_core::agent::{AgentRuntime, HttpAgentRuntime};
use gpts_core::assistant::{AssistantRepository, FileAssistantStore};
use gpts_core::telemetry::{FeedbackClient, LangSmithClient, TelemetryConfig};

use crate::config::ServerConfig;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    assistants: Arc<dyn AssistantRepository>,
    runtime: Arc<dyn AgentRuntime>,
    /// Base URL of the HTTP runtime; `None` for in-process runtimes
    runtime_url: Option<String>,
    telemetry: Option<TelemetryConfig>,
    /// Built on first feedback submission
    feedback_client: OnceLock<Arc<dyn FeedbackClient>>,
}

impl AppState {
    /// Create a new AppState from the server configuration
    pub async fn new(config: &ServerConfig) -> gpts_core::Result<Self> {
        let assistants_path = config.data_dir.join("assistants.json");
        let assistants = FileAssistantStore::new(assistants_path).await?;
        let runtime = HttpAgentRuntime::new(config.runtime_url.clone());
        let runtime_url = runtime.base_url().to_string();

        Ok(Self::build(
            Arc::new(assistants),
            Arc::new(runtime),
            Some(runtime_url),
            config.telemetry.clone(),
        ))
    }

    pub fn with_components(
        assistants: Arc<dyn AssistantRepository>,
        runtime: Arc<dyn AgentRuntime>,
        telemetry: Option<TelemetryConfig>,
    ) -> Self {
        Self::build(assistants, runtime, None, telemetry)
    }

    fn build(
        assistants: Arc<dyn AssistantRepository>,
        runtime: Arc<dyn AgentRuntime>,
        runtime_url: Option<String>,
        telemetry: Option<TelemetryConfig>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                assistants,
                runtime,
                runtime_url,
                telemetry,
                feedback_client: OnceLock::new(),
            }),
        }
    }

    /// Use `client` instead of constructing one from the telemetry config
    #[cfg(test)]
    pub fn with_feedback_client(self, client: Arc<dyn FeedbackClient>) -> Self {
        if self.inner.feedback_client.set(client).is_err() {
            panic!("feedback client already initialized");
        }
        self
    }

    pub fn assistants(&self) -> &dyn AssistantRepository {
        self.inner.assistants.as_ref()
    }

    pub fn runtime(&self) -> &dyn AgentRuntime {
        self.inner.runtime.as_ref()
    }

    /// Owned runtime handle for work that outlives the request
    pub fn runtime_arc(&self) -> Arc<dyn AgentRuntime> {
        Arc::clone(&self.inner.runtime)
    }

    pub fn runtime_url(&self) -> Option<&str> {
        self.inner.runtime_url.as_deref()
    }

    pub fn telemetry_enabled(&self) -> bool {
        self.inner.telemetry.is_some()
    }

    /// Feedback client, or `None` when telemetry is disabled
    pub fn feedback_client(&self) -> Option<Arc<dyn FeedbackClient>> {
        let config = self.inner.telemetry.as_ref()?;
        let client = self.inner.feedback_client.get_or_init(|| {
            Arc::new(LangSmithClient::new(config.clone())) as Arc<dyn FeedbackClient>
        });
        Some(Arc::clone(client))
    }
}
