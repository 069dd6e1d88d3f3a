//! Process configuration read from the environment.

use anyhow::{anyhow, bail, Context};
use std::env;
use std::fmt::Display;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// Recipe routes require a login session and reads are scoped to the caller.
    Session,
    /// No login; every request is anonymous and reads are unscoped.
    Disabled,
}

impl FromStr for AuthMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "session" => Ok(AuthMode::Session),
            "none" | "disabled" => Ok(AuthMode::Disabled),
            other => Err(anyhow!("expected \"session\" or \"none\", got \"{}\"", other)),
        }
    }
}

/// A configured login: username plus argon2 PHC hash.
#[derive(Clone, PartialEq, Eq)]
pub struct UserCredential {
    pub username: String,
    pub password_hash: String,
}

impl std::fmt::Debug for UserCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserCredential")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub auth_mode: AuthMode,
    pub users: Vec<UserCredential>,
    pub session_ttl_secs: i64,
    pub cookie_secure: bool,
    pub cors_origin: Option<String>,
    pub default_image: String,
    pub upload_dir: PathBuf,
    pub upload_url_prefix: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

        let auth_mode: AuthMode = load_or("AUTH_MODE", "session")?;
        let users = match env::var("RECETARIO_USERS") {
            Ok(raw) => parse_users(&raw)?,
            Err(_) => Vec::new(),
        };
        if auth_mode == AuthMode::Session && users.is_empty() {
            tracing::warn!(
                "AUTH_MODE is session but RECETARIO_USERS is empty; nobody can log in"
            );
        }

        let config = Self {
            database_url,
            bind_addr: load_or("BIND_ADDR", "0.0.0.0:3000")?,
            auth_mode,
            users,
            session_ttl_secs: session_ttl(load_or("SESSION_TTL_SECS", "3600")?)?,
            cookie_secure: parse_bool(
                "SESSION_COOKIE_SECURE",
                &string_or("SESSION_COOKIE_SECURE", "true"),
            )?,
            cors_origin: env::var("CORS_ORIGIN").ok().filter(|o| !o.trim().is_empty()),
            default_image: string_or("DEFAULT_IMAGE", "/uploads/default.png"),
            upload_dir: PathBuf::from(string_or("UPLOAD_DIR", "uploads")),
            upload_url_prefix: normalize_prefix(&string_or("UPLOAD_URL_PREFIX", "/uploads"))?,
        };

        info!(
            bind_addr = %config.bind_addr,
            auth_mode = ?config.auth_mode,
            users = config.users.len(),
            upload_dir = %config.upload_dir.display(),
            "configuration loaded"
        );

        Ok(config)
    }
}

fn string_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    })
}

fn load_or<T: FromStr>(key: &str, default: &str) -> anyhow::Result<T>
where
    T::Err: Display,
{
    let raw = string_or(key, default);
    raw.parse()
        .map_err(|e| anyhow!("Invalid {key} value \"{raw}\": {e}"))
}

fn parse_bool(key: &str, raw: &str) -> anyhow::Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        other => bail!("Invalid {key} value \"{other}\": expected true or false"),
    }
}

/// Sessions last between one minute and one year.
fn session_ttl(secs: i64) -> anyhow::Result<i64> {
    if !(60..=365 * 24 * 3600).contains(&secs) {
        bail!("SESSION_TTL_SECS must be between 60 and 31536000, got {}", secs);
    }
    Ok(secs)
}

/// Parse `user:hash;user2:hash2`. PHC hashes contain `$`, `,` and `=` but never `;`.
pub fn parse_users(raw: &str) -> anyhow::Result<Vec<UserCredential>> {
    let mut users: Vec<UserCredential> = Vec::new();

    for entry in raw.split(';').map(str::trim).filter(|e| !e.is_empty()) {
        let (username, password_hash) = entry
            .split_once(':')
            .ok_or_else(|| anyhow!("RECETARIO_USERS entry without ':' separator"))?;

        if username.is_empty() || password_hash.is_empty() {
            bail!("RECETARIO_USERS entry with empty username or hash");
        }
        if users.iter().any(|u| u.username == username) {
            bail!("RECETARIO_USERS lists \"{}\" twice", username);
        }

        users.push(UserCredential {
            username: username.to_string(),
            password_hash: password_hash.to_string(),
        });
    }

    Ok(users)
}

/// Ensure a leading slash and no trailing slash, e.g. "uploads/" -> "/uploads".
fn normalize_prefix(raw: &str) -> anyhow::Result<String> {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        bail!("UPLOAD_URL_PREFIX cannot be the site root");
    }
    Ok(format!("/{}", trimmed))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHQ$aGFzaGhhc2g";

    #[test]
    fn test_parse_users() {
        let users = parse_users(&format!("ana:{HASH}; luis:{HASH};")).unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].username, "ana");
        assert_eq!(users[0].password_hash, HASH);
        assert_eq!(users[1].username, "luis");
    }

    #[test]
    fn test_parse_users_rejects_malformed_entries() {
        assert!(parse_users("ana").is_err());
        assert!(parse_users(&format!(":{HASH}")).is_err());
        assert!(parse_users(&format!("ana:{HASH};ana:{HASH}")).is_err());
        assert!(parse_users("").unwrap().is_empty());
    }

    #[test]
    fn test_auth_mode_from_str() {
        assert_eq!("session".parse::<AuthMode>().unwrap(), AuthMode::Session);
        assert_eq!("NONE".parse::<AuthMode>().unwrap(), AuthMode::Disabled);
        assert!("cookies".parse::<AuthMode>().is_err());
    }

    #[test]
    fn test_normalize_prefix() {
        assert_eq!(normalize_prefix("uploads/").unwrap(), "/uploads");
        assert_eq!(normalize_prefix("/media/img").unwrap(), "/media/img");
        assert!(normalize_prefix("/").is_err());
    }

    #[test]
    fn test_session_ttl_bounds() {
        assert_eq!(session_ttl(3600).unwrap(), 3600);
        assert!(session_ttl(0).is_err());
        assert!(session_ttl(i64::MAX).is_err());
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("X", "TRUE").unwrap());
        assert!(!parse_bool("X", "0").unwrap());
        assert!(parse_bool("X", "maybe").is_err());
    }

    #[test]
    fn test_credential_debug_hides_hash() {
        let user = UserCredential {
            username: "ana".to_string(),
            password_hash: HASH.to_string(),
        };
        assert!(!format!("{:?}", user).contains("argon2"));
    }
}
