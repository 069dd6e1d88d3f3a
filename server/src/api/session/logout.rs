use crate::auth::{clear_session_cookie, session_token};
use crate::state::AppState;
use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::{AppendHeaders, IntoResponse},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LogoutResponse {
    pub ok: bool,
}

/// Always succeeds: the cookie is cleared even when the session is unknown or the
/// session store is unreachable.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "auth",
    responses(
        (status = 200, description = "Session ended, cookie cleared", body = LogoutResponse)
    )
)]
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    if let Some(token) = session_token(&headers) {
        if let Err(e) = state.auth.sessions.revoke(&token).await {
            tracing::warn!("Failed to revoke session: {}", e);
        }
    }

    (
        AppendHeaders([(
            header::SET_COOKIE,
            clear_session_cookie(state.auth.cookie_secure),
        )]),
        Json(LogoutResponse { ok: true }),
    )
}
