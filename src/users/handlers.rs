use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use tracing::{instrument, warn};

use super::{
    dto::{MessagesFromResponse, MessagesToResponse, UsersResponse},
    repo_types::UserDetail,
};
use crate::{auth::jwt::AuthUser, error::ApiError, state::AppState};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/:username", get(get_user))
        .route("/users/:username/to", get(messages_to))
        .route("/users/:username/from", get(messages_from))
}

#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<UsersResponse>, ApiError> {
    let users = state.users.all().await?;
    Ok(Json(UsersResponse { users }))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<UserDetail>, ApiError> {
    match state.users.get(&username).await? {
        Some(user) => Ok(Json(user)),
        None => {
            warn!(%username, "user not found");
            Err(ApiError::NotFound(format!("User '{username}' not found")))
        }
    }
}

/// Messages received by `username`; only that user may read them.
#[instrument(skip(state, auth))]
pub async fn messages_to(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(username): Path<String>,
) -> Result<Json<MessagesToResponse>, ApiError> {
    auth.ensure_correct_user(&username)?;
    let messages = state.users.messages_to(&username).await?;
    Ok(Json(MessagesToResponse { messages }))
}

/// Messages sent by `username`; only that user may read them.
#[instrument(skip(state, auth))]
pub async fn messages_from(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(username): Path<String>,
) -> Result<Json<MessagesFromResponse>, ApiError> {
    auth.ensure_correct_user(&username)?;
    let messages = state.users.messages_from(&username).await?;
    Ok(Json(MessagesFromResponse { messages }))
}
