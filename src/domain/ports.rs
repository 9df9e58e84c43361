use crate::domain::model::{EntitlementCheck, Session};
use crate::utils::error::Result;
use async_trait::async_trait;

/// External store that knows the signed-in subject, if any.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get_session(&self) -> Result<Option<Session>>;
}

/// Supplies the bearer token for outgoing entitlement requests.
/// `None` means the request goes out unauthenticated.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn session_token(&self) -> Result<Option<String>>;
}

#[async_trait]
pub trait EntitlementsApi: Send + Sync {
    async fn check(&self, entitlement_key: &str) -> Result<Option<EntitlementCheck>>;
}
