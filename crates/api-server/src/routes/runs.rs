//! Run API endpoints
//!
//! Runs are executed by the external agent runtime. These handlers resolve
//! the assistant config for the caller and hand the run over.

use std::convert::Infallible;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    routing::{get, post},
    Json, Router,
};
use futures::Stream;
use serde_json::Value;
use tracing::{info, warn};

use gpts_core::run::{resolve_run, ResolvedRun};
use gpts_core::telemetry::FeedbackCreateRequest;

use crate::error::{core_error, route_error, RouteError};
use crate::identity::UserId;
use crate::routes::StatusResponse;
use crate::state::AppState;
use crate::stream::to_sse;

async fn resolve(state: &AppState, user_id: &str, body: &[u8]) -> Result<ResolvedRun, RouteError> {
    resolve_run(body, user_id, state.assistants(), state.runtime())
        .await
        .map_err(core_error)
}

/// POST /runs - Start a run in the background
async fn create_run(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    body: Bytes,
) -> Result<Json<StatusResponse>, RouteError> {
    let ResolvedRun { input, config } = resolve(&state, &user_id, &body).await?;

    let runtime = state.runtime_arc();
    tokio::spawn(async move {
        if let Err(e) = runtime.invoke(input, config).await {
            warn!("Background run failed: {}", e);
        }
    });

    Ok(Json(StatusResponse::ok()))
}

/// POST /runs/stream - Start a run and stream its events
async fn stream_run(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    body: Bytes,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, RouteError> {
    let ResolvedRun { input, config } = resolve(&state, &user_id, &body).await?;

    let events = state
        .runtime()
        .stream(input, config)
        .await
        .map_err(core_error)?;

    Ok(Sse::new(to_sse(events)).keep_alive(KeepAlive::default()))
}

/// GET /runs/input_schema
async fn input_schema(State(state): State<AppState>) -> Result<Json<Value>, RouteError> {
    state
        .runtime()
        .input_schema(None)
        .await
        .map(Json)
        .map_err(core_error)
}

/// GET /runs/output_schema
async fn output_schema(State(state): State<AppState>) -> Result<Json<Value>, RouteError> {
    state
        .runtime()
        .output_schema()
        .await
        .map(Json)
        .map_err(core_error)
}

/// GET /runs/config_schema
async fn config_schema(State(state): State<AppState>) -> Result<Json<Value>, RouteError> {
    state
        .runtime()
        .config_schema()
        .await
        .map(Json)
        .map_err(core_error)
}

/// POST /runs/feedback - Relay feedback on a run
///
/// A successful response means the feedback was submitted. It does not
/// guarantee that the tracing service recorded it.
async fn create_run_feedback(
    State(state): State<AppState>,
    Json(feedback): Json<FeedbackCreateRequest>,
) -> Result<Json<StatusResponse>, RouteError> {
    let client = state
        .feedback_client()
        .ok_or_else(|| route_error(StatusCode::NOT_FOUND, "Feedback is disabled"))?;

    client.create_feedback(&feedback).await.map_err(core_error)?;

    Ok(Json(StatusResponse::ok()))
}

/// Create the runs router; `/feedback` only exists with telemetry enabled
pub fn router(telemetry_enabled: bool) -> Router<AppState> {
    let router = Router::new()
        .route("/", post(create_run))
        .route("/stream", post(stream_run))
        .route("/input_schema", get(input_schema))
        .route("/output_schema", get(output_schema))
        .route("/config_schema", get(config_schema));

    if telemetry_enabled {
        info!("Telemetry enabled, serving run feedback");
        router.route("/feedback", post(create_run_feedback))
    } else {
        router
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    };
    use std::time::Duration;

    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request},
    };
    use futures::StreamExt;
    use serde_json::json;
    use tempfile::TempDir;
    use tokio::sync::mpsc;
    use tower::ServiceExt;

    use gpts_core::agent::{AgentRuntime, RunEvent, RunEventStream};
    use gpts_core::assistant::{
        AssistantRepository, FileAssistantStore, PutAssistantRequest, PUBLIC_USER_ID,
    };
    use gpts_core::telemetry::{FeedbackClient, TelemetryConfig};

    use crate::{routes::app, state::AppState};

    type Invocation = (Option<Value>, Value);

    struct FakeRuntime {
        invoked: mpsc::UnboundedSender<Invocation>,
        schema_calls: AtomicUsize,
    }

    #[async_trait]
    impl AgentRuntime for FakeRuntime {
        async fn input_schema(&self, config: Option<&Value>) -> gpts_core::Result<Value> {
            self.schema_calls.fetch_add(1, Ordering::SeqCst);
            Ok(json!({
                "type": "array",
                "title": config.map(|c| c["configurable"]["assistant_id"].clone()),
                "items": {"type": "object", "required": ["content"]}
            }))
        }

        async fn output_schema(&self) -> gpts_core::Result<Value> {
            Ok(json!({"type": "array", "title": "output"}))
        }

        async fn config_schema(&self) -> gpts_core::Result<Value> {
            Ok(json!({"type": "object", "title": "config"}))
        }

        async fn invoke(&self, input: Option<Value>, config: Value) -> gpts_core::Result<Value> {
            let _ = self.invoked.send((input, config));
            Ok(json!([]))
        }

        async fn stream(
            &self,
            _input: Option<Value>,
            config: Value,
        ) -> gpts_core::Result<RunEventStream> {
            let thread_id = config["configurable"]["thread_id"].clone();
            Ok(futures::stream::iter(vec![
                Ok(RunEvent::Metadata { run_id: "run-1".into() }),
                Ok(RunEvent::Data(json!([{"type": "ai", "content": thread_id}]))),
                Ok(RunEvent::End),
            ])
            .boxed())
        }
    }

    #[derive(Default)]
    struct RecordingFeedback {
        received: Mutex<Vec<FeedbackCreateRequest>>,
    }

    #[async_trait]
    impl FeedbackClient for RecordingFeedback {
        async fn create_feedback(&self, feedback: &FeedbackCreateRequest) -> gpts_core::Result<()> {
            self.received.lock().unwrap().push(feedback.clone());
            Ok(())
        }
    }

    struct Harness {
        state: AppState,
        runtime: Arc<FakeRuntime>,
        invoked: mpsc::UnboundedReceiver<Invocation>,
        _temp_dir: TempDir,
    }

    async fn build_harness(telemetry: Option<TelemetryConfig>) -> Harness {
        let temp_dir = TempDir::new().unwrap();
        let store = FileAssistantStore::new(temp_dir.path().join("assistants.json"))
            .await
            .unwrap();
        store
            .put(
                "user-1",
                "a-1",
                PutAssistantRequest {
                    name: "Helper".to_string(),
                    config: json!({"configurable": {"type": "chatbot", "user_id": "stale"}}),
                    public: false,
                },
            )
            .await
            .unwrap();
        store
            .put(
                PUBLIC_USER_ID,
                "shared",
                PutAssistantRequest {
                    name: "Shared".to_string(),
                    config: json!({"configurable": {"type": "agent"}}),
                    public: true,
                },
            )
            .await
            .unwrap();

        let (tx, rx) = mpsc::unbounded_channel();
        let runtime = Arc::new(FakeRuntime {
            invoked: tx,
            schema_calls: AtomicUsize::new(0),
        });
        let state = AppState::with_components(Arc::new(store), runtime.clone(), telemetry);

        Harness {
            state,
            runtime,
            invoked: rx,
            _temp_dir: temp_dir,
        }
    }

    fn post_json(uri: &str, body: impl Into<Body>, user: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(user) = user {
            builder = builder.header(header::COOKIE, format!("opengpts_user_id={}", user));
        }
        builder.body(body.into()).unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn create_run_returns_ok_and_invokes_in_background() {
        let mut harness = build_harness(None).await;

        let response = app(harness.state.clone())
            .oneshot(post_json(
                "/runs",
                json!({
                    "assistant_id": "a-1",
                    "thread_id": "t-1",
                    "input": [{"type": "human", "content": "hi"}]
                })
                .to_string(),
                Some("user-1"),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, json!({"status": "ok"}));

        let (input, config) = tokio::time::timeout(Duration::from_secs(5), harness.invoked.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(input, Some(json!([{"type": "human", "content": "hi"}])));
        assert_eq!(config["configurable"]["user_id"], "user-1");
        assert_eq!(config["configurable"]["thread_id"], "t-1");
        assert_eq!(config["configurable"]["type"], "chatbot");
    }

    #[tokio::test]
    async fn create_run_uses_public_assistant_for_other_users() {
        let mut harness = build_harness(None).await;

        let response = app(harness.state.clone())
            .oneshot(post_json(
                "/runs",
                json!({"assistant_id": "shared", "thread_id": "t-2", "input": null}).to_string(),
                Some("user-2"),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let (input, config) = tokio::time::timeout(Duration::from_secs(5), harness.invoked.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(input, None);
        assert_eq!(config["configurable"]["type"], "agent");
        assert_eq!(config["configurable"]["user_id"], "user-2");
        assert_eq!(harness.runtime.schema_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn create_run_unknown_assistant_is_not_found() {
        let harness = build_harness(None).await;

        let response = app(harness.state.clone())
            .oneshot(post_json(
                "/runs",
                json!({"assistant_id": "missing", "thread_id": "t", "input": [{"content": "x"}]})
                    .to_string(),
                Some("user-1"),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["error"], "Assistant not found");
        assert_eq!(harness.runtime.schema_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn create_run_rejects_invalid_json() {
        let harness = build_harness(None).await;

        let response = app(harness.state.clone())
            .oneshot(post_json("/runs", "{\"assistant_id\": ", Some("user-1")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json_body(response).await["error"], "Invalid JSON body");
    }

    #[tokio::test]
    async fn create_run_requires_user_cookie() {
        let harness = build_harness(None).await;

        let response = app(harness.state.clone())
            .oneshot(post_json(
                "/runs",
                json!({"assistant_id": "a-1", "thread_id": "t"}).to_string(),
                None,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn create_run_reports_input_validation_errors() {
        let harness = build_harness(None).await;
        let payload = json!({"assistant_id": "a-1", "thread_id": "t", "input": [{"type": "human"}]});

        let response = app(harness.state.clone())
            .oneshot(post_json("/runs", payload.to_string(), Some("user-1")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = json_body(response).await;
        assert_eq!(body["body"], payload);
        assert_eq!(body["detail"][0]["loc"], "/0");
        assert_eq!(body["detail"][0]["type"], "value_error");
    }

    #[tokio::test]
    async fn stream_run_emits_server_sent_events() {
        let harness = build_harness(None).await;

        let response = app(harness.state.clone())
            .oneshot(post_json(
                "/runs/stream",
                json!({"assistant_id": "a-1", "thread_id": "t-stream", "input": null}).to_string(),
                Some("user-1"),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/event-stream"
        );
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();

        let metadata = text.find("event: metadata").unwrap();
        let data = text.find("event: data").unwrap();
        let end = text.find("event: end").unwrap();
        assert!(metadata < data && data < end);
        assert!(text.contains("\"run_id\":\"run-1\""));
        assert!(text.contains("t-stream"));
    }

    #[tokio::test]
    async fn schema_endpoints_pass_runtime_schemas_through() {
        let harness = build_harness(None).await;

        for (uri, title) in [
            ("/runs/output_schema", json!("output")),
            ("/runs/config_schema", json!("config")),
            ("/runs/input_schema", Value::Null),
        ] {
            let response = app(harness.state.clone())
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(json_body(response).await["title"], title);
        }
    }

    #[tokio::test]
    async fn feedback_route_absent_without_telemetry() {
        let harness = build_harness(None).await;

        let response = app(harness.state.clone())
            .oneshot(post_json(
                "/runs/feedback",
                json!({"run_id": uuid::Uuid::new_v4(), "key": "score"}).to_string(),
                None,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn feedback_is_forwarded_when_telemetry_enabled() {
        let harness = build_harness(Some(TelemetryConfig::default())).await;
        let recorder = Arc::new(RecordingFeedback::default());
        let state = harness.state.clone().with_feedback_client(recorder.clone());
        let run_id = uuid::Uuid::new_v4();

        let response = app(state)
            .oneshot(post_json(
                "/runs/feedback",
                json!({"run_id": run_id, "key": "user_score", "score": 1, "comment": "nice"})
                    .to_string(),
                None,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, json!({"status": "ok"}));

        let received = recorder.received.lock().unwrap();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].run_id, run_id);
        assert_eq!(received[0].comment.as_deref(), Some("nice"));
    }
}
