use recetario_core::RecipeService;
use std::sync::Arc;

use crate::auth::{CredentialStore, SessionStore};
use crate::config::AuthMode;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub recipes: Arc<RecipeService>,
    pub auth: Arc<AuthState>,
}

#[derive(Debug)]
pub struct AuthState {
    pub mode: AuthMode,
    pub credentials: Arc<dyn CredentialStore>,
    pub sessions: Arc<dyn SessionStore>,
    pub session_ttl_secs: i64,
    pub cookie_secure: bool,
}
