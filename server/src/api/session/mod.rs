pub mod login;
pub mod logout;
pub mod me;

use crate::state::AppState;
use axum::routing::{get, post};
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /api/auth endpoints (mounted at /api/auth in session mode)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login::login))
        .route("/logout", post(logout::logout))
        .route("/me", get(me::me))
}

#[derive(OpenApi)]
#[openapi(
    paths(login::login, logout::logout, me::me),
    components(schemas(
        login::LoginRequest,
        login::LoginResponse,
        logout::LogoutResponse,
        me::MeResponse,
    ))
)]
pub struct ApiDoc;
