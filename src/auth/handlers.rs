use axum::{
    extract::{rejection::JsonRejection, FromRef, State},
    routing::post,
    Json, Router,
};
use serde_json::Value;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginRequest, RegisterRequest, TokenResponse, LOGIN, REGISTER},
        jwt::JwtKeys,
        services,
    },
    error::ApiError,
    schema,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<TokenResponse>, ApiError> {
    let Json(payload) = payload?;
    let request: RegisterRequest = schema::parse(&REGISTER, payload)?;
    let (new_user, password) = request.into_parts();

    let user = services::register(
        state.users.as_ref(),
        &state.config.hashing,
        &new_user,
        &password,
    )
    .await?;

    let token = JwtKeys::from_ref(&state).sign(&user.username)?;
    Ok(Json(TokenResponse { token }))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<TokenResponse>, ApiError> {
    let Json(payload) = payload?;
    let request: LoginRequest = schema::parse(&LOGIN, payload)?;

    if !services::authenticate(state.users.as_ref(), &request.username, &request.password).await? {
        return Err(ApiError::BadRequest(
            "Invalid username and password combination".into(),
        ));
    }

    if !state.users.update_login_timestamp(&request.username).await? {
        warn!(username = %request.username, "user vanished during login");
        return Err(ApiError::NotFound(format!(
            "User '{}' not found",
            request.username
        )));
    }

    let token = JwtKeys::from_ref(&state).sign(&request.username)?;
    info!(username = %request.username, "user logged in");
    Ok(Json(TokenResponse { token }))
}
