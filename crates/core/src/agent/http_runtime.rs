//! HTTP client for the external agent runtime
//!
//! Endpoints (relative to the runtime base URL):
//! - `POST /input_schema` with `{config}`
//! - `GET /output_schema`, `GET /config_schema`
//! - `POST /invoke` with `{input, config}`, answers `{output}`
//! - `POST /stream` with `{input, config}`, answers server-sent events

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Client, Response};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, info, warn};

use super::runtime::{AgentRuntime, RunEvent, RunEventStream};
use crate::{Error, Result};

#[derive(Serialize)]
struct SchemaRequest<'a> {
    config: Option<&'a Value>,
}

#[derive(Serialize)]
struct RunRequest {
    input: Option<Value>,
    config: Value,
}

/// Client for an agent runtime served over HTTP
#[derive(Clone)]
pub struct HttpAgentRuntime {
    client: Client,
    base_url: String,
}

impl HttpAgentRuntime {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            // Disable proxy for internal runtime communication
            client: Client::builder()
                .no_proxy()
                .build()
                .unwrap_or_else(|_| Client::new()),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json(&self, path: &str) -> Result<Value> {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| Error::Agent(format!("Failed to connect to agent runtime: {}", e)))?;
        Self::json_body(res).await
    }

    async fn post_json(&self, path: &str, body: &impl Serialize) -> Result<Value> {
        let res = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| Error::Agent(format!("Failed to connect to agent runtime: {}", e)))?;
        Self::json_body(res).await
    }

    async fn json_body(res: Response) -> Result<Value> {
        let res = Self::check_status(res).await?;
        res.json()
            .await
            .map_err(|e| Error::Agent(format!("Invalid response from agent runtime: {}", e)))
    }

    async fn check_status(res: Response) -> Result<Response> {
        let status = res.status();
        if status.is_success() {
            return Ok(res);
        }
        let error_text = res.text().await.unwrap_or_default();
        Err(Error::Agent(format!(
            "Agent runtime returned {}: {}",
            status, error_text
        )))
    }
}

#[async_trait]
impl AgentRuntime for HttpAgentRuntime {
    async fn input_schema(&self, config: Option<&Value>) -> Result<Value> {
        self.post_json("/input_schema", &SchemaRequest { config })
            .await
    }

    async fn output_schema(&self) -> Result<Value> {
        self.get_json("/output_schema").await
    }

    async fn config_schema(&self) -> Result<Value> {
        self.get_json("/config_schema").await
    }

    async fn invoke(&self, input: Option<Value>, config: Value) -> Result<Value> {
        let mut body = self
            .post_json("/invoke", &RunRequest { input, config })
            .await?;
        Ok(match body.get_mut("output") {
            Some(output) => output.take(),
            None => body,
        })
    }

    async fn stream(&self, input: Option<Value>, config: Value) -> Result<RunEventStream> {
        info!("Starting streamed run: {}/stream", self.base_url);

        let res = self
            .client
            .post(self.url("/stream"))
            .json(&RunRequest { input, config })
            .send()
            .await
            .map_err(|e| Error::Agent(format!("Failed to connect to agent runtime: {}", e)))?;
        let res = Self::check_status(res).await?;

        let (tx, rx) = mpsc::channel(32);
        tokio::spawn(forward_events(res, tx));

        Ok(ReceiverStream::new(rx).boxed())
    }
}

/// Read the SSE body and forward decoded events until `end` or disconnect
async fn forward_events(res: Response, tx: mpsc::Sender<Result<RunEvent>>) {
    let mut stream = res.bytes_stream();
    let mut buffer: Vec<u8> = Vec::new();

    while let Some(item) = stream.next().await {
        let chunk = match item {
            Ok(chunk) => chunk,
            Err(e) => {
                let _ = tx
                    .send(Err(Error::Agent(format!("Stream error: {}", e))))
                    .await;
                return;
            }
        };
        buffer.extend(chunk.iter().copied().filter(|b| *b != b'\r'));

        for frame in drain_frames(&mut buffer) {
            let Some(event) = parse_frame(&frame) else {
                continue;
            };
            let is_end = event == RunEvent::End;
            if tx.send(Ok(event)).await.is_err() {
                debug!("Run event receiver closed");
                return;
            }
            if is_end {
                return;
            }
        }
    }

    // Runtime hung up without an explicit end frame
    let _ = tx.send(Ok(RunEvent::End)).await;
}

/// Split every complete `\n\n`-terminated frame off the front of `buffer`.
///
/// Frames are decoded only once complete, so a multi-byte character split
/// across network chunks stays intact.
fn drain_frames(buffer: &mut Vec<u8>) -> Vec<String> {
    let mut frames = Vec::new();
    while let Some(idx) = buffer.windows(2).position(|w| w == b"\n\n") {
        let frame: Vec<u8> = buffer.drain(..idx + 2).collect();
        frames.push(String::from_utf8_lossy(&frame).into_owned());
    }
    frames
}

/// Decode one SSE frame into a run event; unknown events are skipped
pub(crate) fn parse_frame(frame: &str) -> Option<RunEvent> {
    let mut event_name = "message";
    let mut data_lines: Vec<&str> = Vec::new();

    for line in frame.lines() {
        if let Some(value) = line.strip_prefix("event:") {
            event_name = value.trim();
        } else if let Some(value) = line.strip_prefix("data:") {
            data_lines.push(value.strip_prefix(' ').unwrap_or(value));
        }
    }
    let data = data_lines.join("\n");

    match event_name {
        "metadata" => {
            let value: Value = serde_json::from_str(&data).ok()?;
            let run_id = value.get("run_id")?.as_str()?.to_string();
            Some(RunEvent::Metadata { run_id })
        }
        "data" | "message" if !data.is_empty() => match serde_json::from_str(&data) {
            Ok(value) => Some(RunEvent::Data(value)),
            Err(e) => {
                warn!("Ignoring undecodable data frame: {}", e);
                None
            }
        },
        "error" => {
            let message = serde_json::from_str::<Value>(&data)
                .ok()
                .and_then(|v| v.get("message").and_then(Value::as_str).map(String::from))
                .unwrap_or(data);
            Some(RunEvent::Error(message))
        }
        "end" => Some(RunEvent::End),
        _ => None,
    }
}
