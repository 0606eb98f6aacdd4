//! Run events to server-sent events

use std::convert::Infallible;

use axum::response::sse::Event;
use futures::{Stream, StreamExt};
use serde_json::json;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::warn;

use gpts_core::agent::{RunEvent, RunEventStream};

/// Relay runtime events as SSE.
///
/// The output always finishes with one `end` event. A transport failure
/// becomes a generic `error` event and stops the relay.
pub fn to_sse(events: RunEventStream) -> impl Stream<Item = Result<Event, Infallible>> {
    let (tx, rx) = mpsc::channel(32);

    tokio::spawn(async move {
        let mut events = events;
        while let Some(item) = events.next().await {
            let (event, last) = match item {
                Ok(RunEvent::End) => break,
                Ok(event) => (sse_event(&event), false),
                Err(e) => {
                    warn!("Error in run stream: {}", e);
                    (error_event("Internal Server Error"), true)
                }
            };
            if tx.send(Ok(event)).await.is_err() {
                // Client went away
                return;
            }
            if last {
                break;
            }
        }
        let _ = tx.send(Ok(Event::default().event("end"))).await;
    });

    ReceiverStream::new(rx)
}

fn sse_event(event: &RunEvent) -> Event {
    match event {
        RunEvent::Metadata { run_id } => Event::default()
            .event(event.name())
            .data(json!({ "run_id": run_id }).to_string()),
        RunEvent::Data(value) => Event::default().event(event.name()).data(value.to_string()),
        RunEvent::Error(message) => error_event(message),
        RunEvent::End => Event::default().event(event.name()),
    }
}

fn error_event(message: &str) -> Event {
    Event::default()
        .event("error")
        .data(json!({ "status_code": 500, "message": message }).to_string())
}
