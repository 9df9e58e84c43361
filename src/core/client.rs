use crate::config::EntitlementsConfig;
use crate::domain::model::{EntitlementCheck, Environment};
use crate::domain::ports::{EntitlementsApi, SessionStore, TokenProvider};
use crate::utils::error::{NavError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use url::Url;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

pub const PUBLISHABLE_KEY_HEADER: &str = "x-publishable-key";
pub const ENVIRONMENT_HEADER: &str = "x-environment";

/// Whether entitlement checks are available for this request.
pub enum ClientState {
    /// No publishable key configured; every entitlement reads as absent.
    Disabled,
    Enabled(UpdateClient),
}

impl ClientState {
    pub fn is_enabled(&self) -> bool {
        matches!(self, ClientState::Enabled(_))
    }

    pub fn client(&self) -> Option<&UpdateClient> {
        match self {
            ClientState::Enabled(client) => Some(client),
            ClientState::Disabled => None,
        }
    }
}

impl std::fmt::Debug for ClientState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientState::Disabled => f.write_str("Disabled"),
            ClientState::Enabled(client) => f
                .debug_struct("Enabled")
                .field("api_url", &client.api_url)
                .field("environment", &client.environment)
                .finish(),
        }
    }
}

/// Build the entitlements client for one request.
///
/// The session store is asked for a token on every entitlement call, never
/// cached. Passing `None` means requests always go out unauthenticated.
pub fn create_client(
    config: &EntitlementsConfig,
    session_store: Option<Arc<dyn SessionStore>>,
) -> Result<ClientState> {
    let Some(publishable_key) = config
        .publishable_key
        .as_deref()
        .filter(|key| !key.trim().is_empty())
    else {
        tracing::debug!("No publishable key configured, entitlements disabled");
        return Ok(ClientState::Disabled);
    };

    let tokens = SessionTokenProvider::new(session_store, config.request_timeout);
    let client = UpdateClient::new(publishable_key, config, Arc::new(tokens))?;
    Ok(ClientState::Enabled(client))
}

/// Reads the bearer token out of the current session.
pub struct SessionTokenProvider {
    store: Option<Arc<dyn SessionStore>>,
    timeout: Duration,
}

impl SessionTokenProvider {
    pub fn new(store: Option<Arc<dyn SessionStore>>, timeout: Duration) -> Self {
        Self { store, timeout }
    }
}

#[async_trait]
impl TokenProvider for SessionTokenProvider {
    async fn session_token(&self) -> Result<Option<String>> {
        let Some(store) = &self.store else {
            return Ok(None);
        };

        let session = bounded("session lookup", self.timeout, store.get_session()).await??;

        match session {
            Some(session) if session.is_active() => Ok(Some(session.access_token)),
            Some(_) => {
                tracing::debug!("Session expired, sending unauthenticated request");
                Ok(None)
            }
            None => Ok(None),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CheckResponse {
    #[serde(default)]
    data: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

/// HTTP client for the entitlements service.
pub struct UpdateClient {
    http: Client,
    api_url: Url,
    publishable_key: String,
    environment: Environment,
    timeout: Duration,
    tokens: Arc<dyn TokenProvider>,
}

impl UpdateClient {
    pub fn new(
        publishable_key: &str,
        config: &EntitlementsConfig,
        tokens: Arc<dyn TokenProvider>,
    ) -> Result<Self> {
        let api_url = Url::parse(&config.api_url).map_err(|e| NavError::InvalidConfigValue {
            field: "entitlements.api_url".to_string(),
            value: config.api_url.clone(),
            reason: e.to_string(),
        })?;
        let http = Client::builder().build()?;
        Ok(Self {
            http,
            api_url,
            publishable_key: publishable_key.to_string(),
            environment: config.environment,
            timeout: config.request_timeout,
            tokens,
        })
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    pub fn api_url(&self) -> &str {
        self.api_url.as_str()
    }

    /// `{api_url}/entitlements/{key}`, with the key encoded as a single path segment.
    pub(crate) fn check_url(&self, entitlement_key: &str) -> Result<Url> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|_| NavError::InvalidConfigValue {
                field: "entitlements.api_url".to_string(),
                value: self.api_url.to_string(),
                reason: "URL cannot have path segments".to_string(),
            })?
            .pop_if_empty()
            .push("entitlements")
            .push(entitlement_key);
        Ok(url)
    }

    async fn fetch_check(&self, entitlement_key: &str) -> Result<Option<EntitlementCheck>> {
        let token = self.tokens.session_token().await?;

        let url = self.check_url(entitlement_key)?;
        tracing::debug!(
            "Checking entitlement '{}' at {} (authenticated: {})",
            entitlement_key,
            url,
            token.is_some()
        );

        let mut request = self
            .http
            .get(url.clone())
            .header(PUBLISHABLE_KEY_HEADER, &self.publishable_key)
            .header(ENVIRONMENT_HEADER, self.environment.as_str());
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        tracing::debug!("Entitlements API response status: {}", status);

        if !status.is_success() {
            let message = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    tracing::debug!("Could not read error body: {}", e);
                    "<unreadable body>".to_string()
                }
            };
            return Err(NavError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.bytes().await?;
        let parsed: CheckResponse = serde_json::from_slice(&body)?;

        match parsed.data.filter(|data| !data.is_null()) {
            Some(data) => Ok(Some(EntitlementCheck::from_data(&data))),
            None => {
                if let Some(error) = parsed.error.filter(|e| !e.is_null()) {
                    tracing::debug!("Entitlement '{}' returned no data: {}", entitlement_key, error);
                }
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl EntitlementsApi for UpdateClient {
    async fn check(&self, entitlement_key: &str) -> Result<Option<EntitlementCheck>> {
        bounded("entitlement check", self.timeout, self.fetch_check(entitlement_key)).await?
    }
}

/// Run `fut` with a deadline, mapping expiry to [`NavError::Timeout`].
async fn bounded<F, T>(operation: &'static str, after: Duration, fut: F) -> Result<T>
where
    F: Future<Output = T>,
{
    tokio::time::timeout(after, fut)
        .await
        .map_err(|_| NavError::Timeout { operation, after })
}
