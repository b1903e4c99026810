use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use crate::auth::token::TokenIssuer;
use crate::models::user::{Credentials, NewUser, User};
use crate::services::user::UserService;
use crate::utils::error::AppError;

#[derive(Serialize)]
pub struct AuthPayload {
    pub user: User,
    pub token: String,
}

pub async fn register(
    State(users): State<UserService>,
    State(tokens): State<TokenIssuer>,
    Json(payload): Json<NewUser>,
) -> Result<impl IntoResponse, AppError> {
    let user = users.create(payload).await?;
    let token = tokens.issue(user.id)?;

    tracing::info!(user_id = user.id, "User registered");
    Ok((StatusCode::CREATED, Json(AuthPayload { user, token })))
}

pub async fn login(
    State(users): State<UserService>,
    State(tokens): State<TokenIssuer>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<AuthPayload>, AppError> {
    let user = users.login(credentials).await?;
    let token = tokens.issue(user.id)?;

    tracing::info!(user_id = user.id, "User logged in");
    Ok(Json(AuthPayload { user, token }))
}
