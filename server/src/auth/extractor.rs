use crate::api::ErrorResponse;
use crate::config::AuthMode;
use crate::state::AppState;
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use recetario_core::StoreError;

pub const SESSION_COOKIE: &str = "recetario_session";

/// Session token from `Authorization: Bearer` or, failing that, the session cookie.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());
    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .flat_map(|h| h.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn cookie_attributes(max_age: i64, secure: bool) -> String {
    let mut attrs = format!("HttpOnly; Path=/; Max-Age={}; SameSite=None", max_age);
    if secure {
        attrs.push_str("; Secure");
    }
    attrs
}

pub fn session_cookie(token: &str, ttl_secs: i64, secure: bool) -> String {
    format!(
        "{}={}; {}",
        SESSION_COOKIE,
        token,
        cookie_attributes(ttl_secs, secure)
    )
}

pub fn clear_session_cookie(secure: bool) -> String {
    format!("{}=; {}", SESSION_COOKIE, cookie_attributes(0, secure))
}

/// The logged-in username. Rejects with 401 when there is no live session.
///
/// Ignores the auth mode; handlers that must also work with authentication disabled take
/// [`Identity`] instead.
pub struct AuthUser(pub String);

/// The caller's identity when there is one.
///
/// In session mode a missing or stale session is rejected exactly like [`AuthUser`];
/// with authentication disabled every caller is anonymous.
pub struct Identity(pub Option<String>);

#[derive(Debug)]
pub enum AuthError {
    MissingSession,
    InvalidSession,
    Storage(StoreError),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::MissingSession => (StatusCode::UNAUTHORIZED, "Authentication required"),
            AuthError::InvalidSession => (StatusCode::UNAUTHORIZED, "Invalid or expired session"),
            AuthError::Storage(err) => {
                tracing::error!("Failed to resolve session: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to resolve session",
                )
            }
        };

        (
            status,
            Json(ErrorResponse {
                error: message.to_string(),
            }),
        )
            .into_response()
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = session_token(&parts.headers).ok_or(AuthError::MissingSession)?;

        let username = state
            .auth
            .sessions
            .resolve(&token)
            .await
            .map_err(AuthError::Storage)?
            .ok_or(AuthError::InvalidSession)?;

        Ok(AuthUser(username))
    }
}

impl FromRequestParts<AppState> for Identity {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match state.auth.mode {
            AuthMode::Disabled => Ok(Identity(None)),
            AuthMode::Session => {
                let AuthUser(username) = AuthUser::from_request_parts(parts, state).await?;
                Ok(Identity(Some(username)))
            }
        }
    }
}
