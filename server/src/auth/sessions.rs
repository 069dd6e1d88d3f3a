//! Login sessions keyed by token hash.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use recetario_core::StoreError;
use std::fmt;
#[cfg(test)]
use std::{collections::HashMap, sync::RwLock};

use super::crypto::{generate_token, hash_token};
use crate::db::{run_blocking, DbPool};
use crate::models::NewSession;
use crate::schema::sessions;

#[async_trait]
pub trait SessionStore: Send + Sync + fmt::Debug {
    /// Start a session for `username` and return the raw token for the client.
    async fn create(&self, username: &str, expires_at: DateTime<Utc>)
        -> Result<String, StoreError>;

    /// Username of a live session, `None` for unknown or expired tokens.
    async fn resolve(&self, token: &str) -> Result<Option<String>, StoreError>;

    /// End a session. Unknown tokens are ignored.
    async fn revoke(&self, token: &str) -> Result<(), StoreError>;
}

#[derive(Clone)]
pub struct PgSessionStore {
    pool: DbPool,
}

impl PgSessionStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl fmt::Debug for PgSessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgSessionStore").finish_non_exhaustive()
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn create(
        &self,
        username: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<String, StoreError> {
        let token = generate_token();
        let token_hash = hash_token(&token);
        let username = username.to_string();

        run_blocking(&self.pool, move |conn| {
            // Drop expired rows while we are here
            diesel::delete(sessions::table.filter(sessions::expires_at.le(Utc::now())))
                .execute(conn)?;

            diesel::insert_into(sessions::table)
                .values(&NewSession {
                    username: &username,
                    token_hash: &token_hash,
                    expires_at,
                })
                .execute(conn)
        })
        .await?;

        Ok(token)
    }

    async fn resolve(&self, token: &str) -> Result<Option<String>, StoreError> {
        let token_hash = hash_token(token);

        run_blocking(&self.pool, move |conn| {
            sessions::table
                .filter(sessions::token_hash.eq(&token_hash))
                .filter(sessions::expires_at.gt(Utc::now()))
                .select(sessions::username)
                .first::<String>(conn)
                .optional()
        })
        .await
    }

    async fn revoke(&self, token: &str) -> Result<(), StoreError> {
        let token_hash = hash_token(token);

        run_blocking(&self.pool, move |conn| {
            diesel::delete(sessions::table.filter(sessions::token_hash.eq(&token_hash)))
                .execute(conn)
        })
        .await?;

        Ok(())
    }
}

/// Process-local sessions for router tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<String, (String, DateTime<Utc>)>>,
}

#[cfg(test)]
impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
fn poisoned<T>(_: std::sync::PoisonError<T>) -> StoreError {
    StoreError::Query("session lock poisoned".to_string())
}

#[cfg(test)]
#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(
        &self,
        username: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<String, StoreError> {
        let token = generate_token();
        self.sessions
            .write()
            .map_err(poisoned)?
            .insert(hash_token(&token), (username.to_string(), expires_at));
        Ok(token)
    }

    async fn resolve(&self, token: &str) -> Result<Option<String>, StoreError> {
        let sessions = self.sessions.read().map_err(poisoned)?;
        Ok(sessions
            .get(&hash_token(token))
            .filter(|(_, expires_at)| *expires_at > Utc::now())
            .map(|(username, _)| username.clone()))
    }

    async fn revoke(&self, token: &str) -> Result<(), StoreError> {
        self.sessions
            .write()
            .map_err(poisoned)?
            .remove(&hash_token(token));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[tokio::test]
    async fn test_memory_sessions_lifecycle() {
        let store = MemorySessionStore::new();
        let token = store
            .create("ana", Utc::now() + Duration::hours(1))
            .await
            .unwrap();

        assert_eq!(store.resolve(&token).await.unwrap().as_deref(), Some("ana"));
        assert_eq!(store.resolve("bogus").await.unwrap(), None);

        store.revoke(&token).await.unwrap();
        assert_eq!(store.resolve(&token).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_memory_sessions_expire() {
        let store = MemorySessionStore::new();
        let token = store
            .create("ana", Utc::now() - Duration::seconds(1))
            .await
            .unwrap();

        assert_eq!(store.resolve(&token).await.unwrap(), None);
    }
}
