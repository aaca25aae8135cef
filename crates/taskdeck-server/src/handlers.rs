//! REST handlers for the task API.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::json;

use taskdeck_store::TaskRow;

use crate::error::ApiError;
use crate::payload::TaskPayload;
use crate::server::AppState;

/// Route path parameters arrive as strings; a non-integer id is a 400
/// before any lookup.
fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse().map_err(|_| ApiError::InvalidId)
}

/// GET /api/tasks
pub async fn list_tasks(State(state): State<AppState>) -> Result<Json<Vec<TaskRow>>, ApiError> {
    let tasks = state.repo.list()?;
    Ok(Json(tasks))
}

/// POST /api/tasks
pub async fn create_task(
    State(state): State<AppState>,
    Json(payload): Json<TaskPayload>,
) -> Result<(StatusCode, Json<TaskRow>), ApiError> {
    let draft = payload.into_draft(None).map_err(ApiError::Validation)?;
    let task = state.repo.create(&draft)?;
    tracing::info!(id = task.id, "task created");
    Ok((StatusCode::CREATED, Json(task)))
}

/// PUT /api/tasks/{id}
pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<TaskPayload>,
) -> Result<Json<TaskRow>, ApiError> {
    let id = parse_id(&id)?;
    let existing = state.repo.get(id)?;
    let draft = payload
        .into_draft(Some(&existing.to_draft()))
        .map_err(ApiError::Validation)?;
    let task = state.repo.update(id, &draft)?;
    tracing::info!(id, "task updated");
    Ok(Json(task))
}

/// DELETE /api/tasks/{id}
pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = parse_id(&id)?;
    state.repo.delete(id)?;
    tracing::info!(id, "task deleted");
    Ok(Json(json!({ "deleted": true })))
}

/// GET /health
pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "ok": true }))
}
