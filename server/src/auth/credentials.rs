use std::fmt;

use super::crypto::verify_password;
use crate::config::UserCredential;

/// Checks a username/password pair and yields the caller's identity.
pub trait CredentialStore: Send + Sync + fmt::Debug {
    fn verify(&self, username: &str, password: &str) -> Option<String>;
}

/// Fixed list of users with argon2 hashes, supplied through configuration.
#[derive(Debug, Default)]
pub struct StaticCredentials {
    users: Vec<UserCredential>,
}

impl StaticCredentials {
    pub fn new(users: Vec<UserCredential>) -> Self {
        Self { users }
    }
}

impl CredentialStore for StaticCredentials {
    fn verify(&self, username: &str, password: &str) -> Option<String> {
        let user = self.users.iter().find(|u| u.username == username)?;
        verify_password(password, &user.password_hash).then(|| user.username.clone())
    }
}
