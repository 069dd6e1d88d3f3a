mod credentials;
mod crypto;
mod extractor;
mod sessions;

pub use credentials::{CredentialStore, StaticCredentials};
pub use crypto::hash_password;
pub use extractor::{
    clear_session_cookie, session_cookie, session_token, AuthUser, Identity, SESSION_COOKIE,
};
#[cfg(test)]
pub use sessions::MemorySessionStore;
pub use sessions::{PgSessionStore, SessionStore};
