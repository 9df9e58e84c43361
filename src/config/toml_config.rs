use crate::config::{non_empty, AppConfig};
use crate::core::sidebar::EntitlementFailurePolicy;
use crate::domain::model::Environment;
use crate::utils::error::{NavError, Result};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub entitlements: EntitlementsSection,
    #[serde(default)]
    pub sidebar: SidebarSection,
    #[serde(default)]
    pub urls: UrlsSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntitlementsSection {
    pub publishable_key: Option<String>,
    pub api_url: Option<String>,
    pub environment: Option<Environment>,
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SidebarSection {
    pub entitlement_key: Option<String>,
    pub base_path: Option<String>,
    pub on_entitlement_error: Option<EntitlementFailurePolicy>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UrlsSection {
    pub deployment_url: Option<String>,
    pub public_url: Option<String>,
}

fn placeholder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("placeholder pattern is valid"))
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content, |key| std::env::var(key).ok());
        Self::parse(&processed)
    }

    fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| NavError::Config {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${API_KEY})，找不到的保持原樣
    pub fn substitute_env_vars<F>(content: &str, lookup: F) -> String
    where
        F: Fn(&str) -> Option<String>,
    {
        placeholder_re()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                lookup(var_name).unwrap_or_else(|| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    /// Overlay file values onto `base`. Unresolved `${VAR}` values count as unset.
    pub fn apply_to(&self, mut base: AppConfig) -> Result<AppConfig> {
        let e = &self.entitlements;
        if let Some(key) = resolved(&e.publishable_key) {
            base.entitlements.publishable_key = Some(key);
        }
        if let Some(api_url) = resolved(&e.api_url) {
            base.entitlements = base.entitlements.with_api_url(api_url);
        }
        if let Some(environment) = e.environment {
            base.entitlements.environment = environment;
        }
        if let Some(secs) = e.request_timeout_secs {
            base.entitlements.request_timeout = Duration::from_secs(secs);
        }

        let s = &self.sidebar;
        if let Some(key) = resolved(&s.entitlement_key) {
            base.sidebar.entitlement_key = key;
        }
        if let Some(base_path) = resolved(&s.base_path) {
            base.sidebar.base_path = base_path;
        }
        if let Some(policy) = s.on_entitlement_error {
            base.sidebar.on_entitlement_error = policy;
        }

        if let Some(host) = resolved(&self.urls.deployment_url) {
            base.urls.deployment_url = Some(host);
        }
        if let Some(url) = resolved(&self.urls.public_url) {
            base.urls.public_url = Some(url);
        }

        base.validate()?;
        Ok(base)
    }
}

fn resolved(value: &Option<String>) -> Option<String> {
    non_empty(value.clone()).filter(|v| !placeholder_re().is_match(v))
}
