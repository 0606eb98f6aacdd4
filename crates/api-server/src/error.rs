//! Error responses shared by the route handlers

use axum::{http::StatusCode, Json};
use serde::Serialize;
use serde_json::Value;

use gpts_core::{Error, FieldError};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<Vec<FieldError>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

pub type RouteError = (StatusCode, Json<ErrorResponse>);

pub fn route_error(status: StatusCode, error: impl Into<String>) -> RouteError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
            detail: None,
            body: None,
        }),
    )
}

/// Map a core error onto the HTTP status the caller sees
pub fn core_error(err: Error) -> RouteError {
    match err {
        Error::InvalidBody(message) => route_error(StatusCode::UNPROCESSABLE_ENTITY, message),
        Error::InputValidation { body, errors } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorResponse {
                error: "Input validation failed".to_string(),
                detail: Some(errors),
                body: Some(body),
            }),
        ),
        Error::AssistantNotFound(_) => route_error(StatusCode::NOT_FOUND, "Assistant not found"),
        other => {
            tracing::error!("Request failed: {}", other);
            route_error(StatusCode::INTERNAL_SERVER_ERROR, other.to_string())
        }
    }
}
