use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::models::user::{User, UserUpdate};
use crate::services::user::UserService;
use crate::utils::error::AppError;

pub async fn list(State(users): State<UserService>) -> Result<Json<Vec<User>>, AppError> {
    Ok(Json(users.list().await?))
}

pub async fn get(
    State(users): State<UserService>,
    Path(id): Path<i64>,
) -> Result<Json<User>, AppError> {
    let user = users
        .find(id)
        .await?
        .ok_or_else(|| AppError::NotFound("User does not exist".to_string()))?;
    Ok(Json(user))
}

pub async fn update(
    State(users): State<UserService>,
    Path(id): Path<i64>,
    Json(payload): Json<UserUpdate>,
) -> Result<Json<User>, AppError> {
    Ok(Json(users.update(id, payload).await?))
}

pub async fn remove(
    State(users): State<UserService>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    users.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
