use crate::domain::model::Session;
use crate::domain::ports::SessionStore;
use crate::utils::error::{NavError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

pub const ACCESS_TOKEN_VAR: &str = "SESSION_ACCESS_TOKEN";
pub const EXPIRES_AT_VAR: &str = "SESSION_EXPIRES_AT";

/// Session store holding at most one session, fixed at construction.
#[derive(Debug, Clone, Default)]
pub struct StaticSessionStore {
    session: Option<Session>,
}

impl StaticSessionStore {
    pub fn new(session: Session) -> Self {
        Self {
            session: Some(session),
        }
    }

    pub fn signed_out() -> Self {
        Self { session: None }
    }
}

#[async_trait]
impl SessionStore for StaticSessionStore {
    async fn get_session(&self) -> Result<Option<Session>> {
        Ok(self.session.clone())
    }
}

/// Session store from `SESSION_ACCESS_TOKEN` / `SESSION_EXPIRES_AT`.
/// Returns `None` when no token is configured, i.e. there is no store at all.
pub fn session_store_from_env() -> Result<Option<Arc<dyn SessionStore>>> {
    session_store_from_lookup(|key| std::env::var(key).ok())
}

pub fn session_store_from_lookup<F>(lookup: F) -> Result<Option<Arc<dyn SessionStore>>>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(token) = crate::config::non_empty(lookup(ACCESS_TOKEN_VAR)) else {
        return Ok(None);
    };

    let mut session = Session::new(token);
    if let Some(raw) = crate::config::non_empty(lookup(EXPIRES_AT_VAR)) {
        let expires_at = DateTime::parse_from_rfc3339(raw.trim())
            .map_err(|e| NavError::InvalidConfigValue {
                field: EXPIRES_AT_VAR.to_string(),
                value: raw.clone(),
                reason: e.to_string(),
            })?
            .with_timezone(&Utc);
        session = session.with_expiry(expires_at);
    }

    Ok(Some(Arc::new(StaticSessionStore::new(session))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn signed_out_store_has_no_session() {
        let store = StaticSessionStore::signed_out();
        assert!(store.get_session().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn env_token_builds_store() {
        let store = session_store_from_lookup(|key| match key {
            ACCESS_TOKEN_VAR => Some("jwt-from-env".to_string()),
            EXPIRES_AT_VAR => Some("2099-01-01T00:00:00Z".to_string()),
            _ => None,
        })
        .unwrap()
        .expect("store should exist");

        let session = store.get_session().await.unwrap().unwrap();
        assert_eq!(session.access_token, "jwt-from-env");
        assert!(session.is_active());
    }

    #[test]
    fn missing_token_means_no_store() {
        assert!(session_store_from_lookup(|_| None).unwrap().is_none());
    }

    #[test]
    fn bad_expiry_is_rejected() {
        let result = session_store_from_lookup(|key| match key {
            ACCESS_TOKEN_VAR => Some("jwt".to_string()),
            EXPIRES_AT_VAR => Some("tomorrow".to_string()),
            _ => None,
        });
        assert!(result.is_err());
    }
}
