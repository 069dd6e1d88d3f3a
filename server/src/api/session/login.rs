use crate::api::error::ApiError;
use crate::api::ErrorResponse;
use crate::auth::session_cookie;
use crate::state::AppState;
use axum::{
    extract::State,
    http::header,
    response::{AppendHeaders, IntoResponse},
    Json,
};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[serde(alias = "usuario")]
    pub username: String,
    #[serde(alias = "contraseña")]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoginResponse {
    pub ok: bool,
    /// Same value as the session cookie, for clients that send `Authorization: Bearer`.
    pub token: String,
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body(content = LoginRequest, example = json!({"username": "user", "password": "password"})),
    responses(
        (status = 200, description = "Login successful, session cookie set", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 500, description = "Session storage failure", body = ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let credentials = state.auth.credentials.clone();
    let LoginRequest { username, password } = req;

    // argon2 verification is CPU-bound
    let verified = tokio::task::spawn_blocking(move || credentials.verify(&username, &password))
        .await
        .map_err(|e| {
            tracing::error!("Credential check panicked: {}", e);
            ApiError::internal("Failed to log in")
        })?;

    let Some(username) = verified else {
        return Err(ApiError::unauthorized("Invalid credentials"));
    };

    let expires_at = Utc::now() + Duration::seconds(state.auth.session_ttl_secs);
    let token = state
        .auth
        .sessions
        .create(&username, expires_at)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create session: {}", e);
            ApiError::internal("Failed to create session")
        })?;

    tracing::info!(username = %username, "user logged in");

    let cookie = session_cookie(&token, state.auth.session_ttl_secs, state.auth.cookie_secure);
    Ok((
        AppendHeaders([(header::SET_COOKIE, cookie)]),
        Json(LoginResponse { ok: true, token }),
    ))
}
