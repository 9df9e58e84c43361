use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One entry in the sidebar. `href` is relative to the sidebar's base path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationItem {
    pub label: String,
    pub href: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub disabled: bool,
}

impl NavigationItem {
    pub fn new(label: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            href: href.into(),
            disabled: false,
        }
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

/// The ordered item list plus the base path the rendering surface mounts it under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sidebar {
    pub base_path: String,
    pub items: Vec<NavigationItem>,
}

impl Sidebar {
    /// Absolute paths for each item. `/` maps to the base path itself.
    pub fn links(&self) -> Vec<String> {
        let base = self.base_path.trim_end_matches('/');
        self.items
            .iter()
            .map(|item| {
                if item.href == "/" {
                    if base.is_empty() {
                        "/".to_string()
                    } else {
                        base.to_string()
                    }
                } else {
                    format!("{}{}", base, item.href)
                }
            })
            .collect()
    }

    pub fn enabled_items(&self) -> impl Iterator<Item = &NavigationItem> {
        self.items.iter().filter(|item| !item.disabled)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitlementCheck {
    #[serde(rename = "hasAccess", default, deserialize_with = "access_flag")]
    pub has_access: bool,
}

impl EntitlementCheck {
    /// Only a literal `true` grants access; any other shape reads as no access.
    pub fn from_data(data: &serde_json::Value) -> Self {
        Self {
            has_access: data.get("hasAccess").and_then(serde_json::Value::as_bool) == Some(true),
        }
    }
}

fn access_flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_bool() == Some(true))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            expires_at: None,
        }
    }

    pub fn with_expiry(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map_or(true, |expiry| expiry > now)
    }

    pub fn is_active(&self) -> bool {
        self.is_active_at(Utc::now())
    }
}

/// Where URL resolution is happening.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionContext {
    /// Running in a browser; `origin` is the page's scheme + host + port.
    Browser { origin: String },
    Server,
}

impl ExecutionContext {
    pub fn browser(origin: impl Into<String>) -> Self {
        ExecutionContext::Browser {
            origin: origin.into(),
        }
    }
}

/// Environment tag sent along with every entitlement request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Test,
    Live,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Test => "test",
            Environment::Live => "live",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "test" => Ok(Environment::Test),
            "live" => Ok(Environment::Live),
            other => Err(format!("unknown environment '{}', expected test or live", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn disabled_flag_is_omitted_when_false() {
        let json = serde_json::to_value(NavigationItem::new("Pricing", "/pricing")).unwrap();
        assert_eq!(json, serde_json::json!({"label": "Pricing", "href": "/pricing"}));

        let json =
            serde_json::to_value(NavigationItem::new("Paid Content", "/paid-content").disabled(true))
                .unwrap();
        assert_eq!(json["disabled"], serde_json::Value::Bool(true));
    }

    #[test]
    fn links_resolve_against_base_path() {
        let sidebar = Sidebar {
            base_path: "/protected".to_string(),
            items: vec![
                NavigationItem::new("Account", "/"),
                NavigationItem::new("Pricing", "/pricing"),
            ],
        };
        assert_eq!(sidebar.links(), vec!["/protected", "/protected/pricing"]);
    }

    #[test]
    fn entitlement_without_flag_means_no_access() {
        let check: EntitlementCheck = serde_json::from_str("{}").unwrap();
        assert!(!check.has_access);
    }

    #[test]
    fn odd_access_flags_mean_no_access() {
        for body in [r#"{"hasAccess":null}"#, r#"{"hasAccess":"yes"}"#, r#"{"hasAccess":1}"#] {
            let check: EntitlementCheck = serde_json::from_str(body).unwrap();
            assert!(!check.has_access, "{}", body);
        }

        let data = serde_json::json!({"hasAccess": true});
        assert!(EntitlementCheck::from_data(&data).has_access);
        for data in [
            serde_json::json!({"hasAccess": null}),
            serde_json::json!({"hasAccess": "true"}),
            serde_json::json!(true),
            serde_json::json!([]),
        ] {
            assert!(!EntitlementCheck::from_data(&data).has_access, "{}", data);
        }
    }

    #[test]
    fn expired_session_is_inactive() {
        let now = Utc::now();
        let session = Session::new("tok").with_expiry(now - Duration::minutes(1));
        assert!(!session.is_active_at(now));
        assert!(Session::new("tok").is_active_at(now));
    }

    #[test]
    fn environment_parses_case_insensitively() {
        assert_eq!("LIVE".parse::<Environment>().unwrap(), Environment::Live);
        assert!("staging".parse::<Environment>().is_err());
    }
}
