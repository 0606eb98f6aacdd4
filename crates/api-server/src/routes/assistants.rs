//! Assistant API endpoints
//!
//! Assistants are always read and written on behalf of the cookie identity.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use gpts_core::assistant::{Assistant, PutAssistantRequest};

use crate::error::{core_error, route_error, RouteError};
use crate::identity::UserId;
use crate::state::AppState;

/// GET /assistants - List the caller's assistants
async fn list_assistants(
    State(state): State<AppState>,
    UserId(user_id): UserId,
) -> Result<Json<Vec<Assistant>>, RouteError> {
    let assistants = state.assistants().list(&user_id).await.map_err(core_error)?;
    Ok(Json(assistants))
}

/// GET /assistants/public - List shared assistants
async fn list_public_assistants(
    State(state): State<AppState>,
) -> Result<Json<Vec<Assistant>>, RouteError> {
    let assistants = state.assistants().list_public().await.map_err(core_error)?;
    Ok(Json(assistants))
}

/// GET /assistants/{id}
async fn get_assistant(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Path(assistant_id): Path<String>,
) -> Result<Json<Assistant>, RouteError> {
    state
        .assistants()
        .get(&user_id, &assistant_id)
        .await
        .map_err(core_error)?
        .map(Json)
        .ok_or_else(|| route_error(StatusCode::NOT_FOUND, "Assistant not found"))
}

/// POST /assistants - Create an assistant with a generated id
async fn create_assistant(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Json(req): Json<PutAssistantRequest>,
) -> Result<(StatusCode, Json<Assistant>), RouteError> {
    if req.name.trim().is_empty() {
        return Err(route_error(StatusCode::BAD_REQUEST, "Name cannot be empty"));
    }

    let assistant_id = Uuid::new_v4().to_string();
    let assistant = state
        .assistants()
        .put(&user_id, &assistant_id, req)
        .await
        .map_err(core_error)?;

    tracing::info!("Created assistant {} for {}", assistant_id, user_id);
    Ok((StatusCode::CREATED, Json(assistant)))
}

/// PUT /assistants/{id} - Create or replace an assistant
async fn put_assistant(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Path(assistant_id): Path<String>,
    Json(req): Json<PutAssistantRequest>,
) -> Result<Json<Assistant>, RouteError> {
    if req.name.trim().is_empty() {
        return Err(route_error(StatusCode::BAD_REQUEST, "Name cannot be empty"));
    }

    let assistant = state
        .assistants()
        .put(&user_id, &assistant_id, req)
        .await
        .map_err(core_error)?;
    Ok(Json(assistant))
}

/// Create the assistants router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/assistants", get(list_assistants).post(create_assistant))
        .route("/assistants/public", get(list_public_assistants))
        .route(
            "/assistants/{id}",
            get(get_assistant).put(put_assistant),
        )
}
