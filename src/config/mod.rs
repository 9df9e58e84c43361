#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::sidebar::{EntitlementFailurePolicy, DEFAULT_BASE_PATH, PREMIUM_ENTITLEMENT};
use crate::core::urls::UrlEnv;
use crate::domain::model::Environment;
use crate::utils::error::{NavError, Result};
use crate::utils::validation::{self, Validate};
use std::time::Duration;

pub const PUBLISHABLE_KEY_VAR: &str = "NEXT_PUBLIC_UPDATE_PUBLISHABLE_KEY";
pub const API_URL_VAR: &str = "UPDATE_API_URL";
pub const ENVIRONMENT_VAR: &str = "UPDATE_ENVIRONMENT";
pub const REQUEST_TIMEOUT_VAR: &str = "UPDATE_REQUEST_TIMEOUT_SECS";

pub const DEFAULT_API_URL: &str = "https://api.update.dev/v1";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Settings for the entitlements client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitlementsConfig {
    /// Absent means the entitlements feature is off.
    pub publishable_key: Option<String>,
    pub api_url: String,
    pub environment: Environment,
    pub request_timeout: Duration,
}

impl Default for EntitlementsConfig {
    fn default() -> Self {
        Self {
            publishable_key: None,
            api_url: DEFAULT_API_URL.to_string(),
            environment: Environment::Test,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

impl EntitlementsConfig {
    pub fn with_publishable_key(mut self, key: impl Into<String>) -> Self {
        self.publishable_key = non_empty(Some(key.into()));
        self
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

impl Validate for EntitlementsConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("entitlements.api_url", &self.api_url)?;
        validation::validate_range(
            "entitlements.request_timeout_secs",
            self.request_timeout.as_secs(),
            1,
            300,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarConfig {
    pub entitlement_key: String,
    pub base_path: String,
    pub on_entitlement_error: EntitlementFailurePolicy,
}

impl Default for SidebarConfig {
    fn default() -> Self {
        Self {
            entitlement_key: PREMIUM_ENTITLEMENT.to_string(),
            base_path: DEFAULT_BASE_PATH.to_string(),
            on_entitlement_error: EntitlementFailurePolicy::Propagate,
        }
    }
}

impl Validate for SidebarConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("sidebar.entitlement_key", &self.entitlement_key)?;
        validation::validate_relative_path("sidebar.base_path", &self.base_path)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    pub entitlements: EntitlementsConfig,
    pub sidebar: SidebarConfig,
    pub urls: UrlEnv,
}

impl AppConfig {
    /// 從環境變數載入配置
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| non_empty(lookup(key));

        let mut entitlements = EntitlementsConfig {
            publishable_key: get(PUBLISHABLE_KEY_VAR),
            ..EntitlementsConfig::default()
        };

        if let Some(api_url) = get(API_URL_VAR) {
            entitlements = entitlements.with_api_url(api_url);
        }

        if let Some(raw) = get(ENVIRONMENT_VAR) {
            entitlements.environment =
                raw.parse::<Environment>()
                    .map_err(|reason| NavError::InvalidConfigValue {
                        field: ENVIRONMENT_VAR.to_string(),
                        value: raw.clone(),
                        reason,
                    })?;
        }

        if let Some(raw) = get(REQUEST_TIMEOUT_VAR) {
            let secs = raw
                .trim()
                .parse::<u64>()
                .map_err(|e| NavError::InvalidConfigValue {
                    field: REQUEST_TIMEOUT_VAR.to_string(),
                    value: raw.clone(),
                    reason: e.to_string(),
                })?;
            entitlements.request_timeout = Duration::from_secs(secs);
        }

        let urls = UrlEnv::from_lookup(&lookup);

        Ok(Self {
            entitlements,
            sidebar: SidebarConfig::default(),
            urls,
        })
    }

    pub fn entitlements_enabled(&self) -> bool {
        self.entitlements.publishable_key.is_some()
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.entitlements.validate()?;
        self.sidebar.validate()
    }
}

pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
