use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Extension, Json};

use crate::middleware::auth::CurrentUser;
use crate::models::event::{Event, EventUpdate, NewEvent};
use crate::services::event::EventService;
use crate::utils::error::AppError;

/// The owner is always the authenticated caller; an owner field in the body
/// would be ignored by deserialization.
pub async fn create(
    State(events): State<EventService>,
    Extension(current): Extension<CurrentUser>,
    Json(payload): Json<NewEvent>,
) -> Result<impl IntoResponse, AppError> {
    let event = events.create(current.id, payload).await?;

    tracing::info!(event_id = event.id, user_id = current.id, "Event created");
    Ok((StatusCode::CREATED, Json(event)))
}

pub async fn list(State(events): State<EventService>) -> Result<Json<Vec<Event>>, AppError> {
    Ok(Json(events.list().await?))
}

pub async fn get(
    State(events): State<EventService>,
    Path(id): Path<i64>,
) -> Result<Json<Event>, AppError> {
    let event = events
        .find(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;
    Ok(Json(event))
}

pub async fn update(
    State(events): State<EventService>,
    Path(id): Path<i64>,
    Json(payload): Json<EventUpdate>,
) -> Result<Json<Event>, AppError> {
    Ok(Json(events.update(id, payload).await?))
}

pub async fn remove(
    State(events): State<EventService>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    events.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
