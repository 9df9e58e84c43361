use crate::config::SidebarConfig;
use crate::core::client::ClientState;
use crate::domain::model::{NavigationItem, Sidebar};
use crate::domain::ports::EntitlementsApi;
use crate::utils::error::Result;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const PREMIUM_ENTITLEMENT: &str = "premium";
pub const DEFAULT_BASE_PATH: &str = "/protected";

/// What to render when the entitlement lookup itself fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntitlementFailurePolicy {
    /// Hand the error to the caller.
    #[default]
    Propagate,
    /// Log it and treat the subject as not entitled.
    FailClosed,
}

impl FromStr for EntitlementFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "propagate" => Ok(EntitlementFailurePolicy::Propagate),
            "fail_closed" | "fail-closed" => Ok(EntitlementFailurePolicy::FailClosed),
            other => Err(format!(
                "unknown policy '{}', expected propagate or fail_closed",
                other
            )),
        }
    }
}

/// Builds the protected-area sidebar, gating "Paid Content" on one entitlement.
#[derive(Debug, Clone)]
pub struct SidebarBuilder {
    entitlement_key: String,
    base_path: String,
    on_error: EntitlementFailurePolicy,
}

impl Default for SidebarBuilder {
    fn default() -> Self {
        Self {
            entitlement_key: PREMIUM_ENTITLEMENT.to_string(),
            base_path: DEFAULT_BASE_PATH.to_string(),
            on_error: EntitlementFailurePolicy::Propagate,
        }
    }
}

impl SidebarBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &SidebarConfig) -> Self {
        Self {
            entitlement_key: config.entitlement_key.clone(),
            base_path: config.base_path.clone(),
            on_error: config.on_entitlement_error,
        }
    }

    pub fn entitlement_key(mut self, key: impl Into<String>) -> Self {
        self.entitlement_key = key.into();
        self
    }

    pub fn base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self
    }

    pub fn on_error(mut self, policy: EntitlementFailurePolicy) -> Self {
        self.on_error = policy;
        self
    }

    pub async fn build(&self, state: &ClientState) -> Result<Sidebar> {
        let api = state.client().map(|client| client as &dyn EntitlementsApi);
        self.build_with(api).await
    }

    /// `api = None` is the disabled case: no lookup, no access.
    pub async fn build_with(&self, api: Option<&dyn EntitlementsApi>) -> Result<Sidebar> {
        let has_access = match api {
            Some(api) => self.has_access(api).await?,
            None => false,
        };

        tracing::debug!(
            "Building sidebar (entitlement '{}': {})",
            self.entitlement_key,
            if has_access { "granted" } else { "absent" }
        );

        Ok(Sidebar {
            base_path: self.base_path.clone(),
            items: navigation_items(has_access),
        })
    }

    async fn has_access(&self, api: &dyn EntitlementsApi) -> Result<bool> {
        match api.check(&self.entitlement_key).await {
            Ok(data) => Ok(data.is_some_and(|check| check.has_access)),
            Err(e) => match self.on_error {
                EntitlementFailurePolicy::Propagate => Err(e),
                EntitlementFailurePolicy::FailClosed => {
                    tracing::warn!(
                        "Entitlement check for '{}' failed, hiding paid content: {}",
                        self.entitlement_key,
                        e
                    );
                    Ok(false)
                }
            },
        }
    }
}

/// Build the sidebar with the default entitlement and base path.
pub async fn build_sidebar(state: &ClientState) -> Result<Sidebar> {
    SidebarBuilder::default().build(state).await
}

fn navigation_items(has_access: bool) -> Vec<NavigationItem> {
    vec![
        NavigationItem::new("Account", "/"),
        NavigationItem::new("Pricing", "/pricing"),
        NavigationItem::new("Subscription", "/subscription"),
        NavigationItem::new("Paid Content", "/paid-content").disabled(!has_access),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::EntitlementCheck;
    use crate::utils::error::NavError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    enum Answer {
        Data(Option<EntitlementCheck>),
        Fail,
    }

    struct FakeApi {
        answer: Answer,
        calls: AtomicUsize,
    }

    impl FakeApi {
        fn new(answer: Answer) -> Self {
            Self {
                answer,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl EntitlementsApi for FakeApi {
        async fn check(&self, entitlement_key: &str) -> Result<Option<EntitlementCheck>> {
            assert_eq!(entitlement_key, "premium");
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.answer {
                Answer::Data(data) => Ok(*data),
                Answer::Fail => Err(NavError::Api {
                    status: 503,
                    message: "unavailable".to_string(),
                }),
            }
        }
    }

    fn labels(sidebar: &Sidebar) -> Vec<&str> {
        sidebar.items.iter().map(|i| i.label.as_str()).collect()
    }

    #[test]
    fn disabled_client_hides_paid_content() {
        let sidebar = tokio_test::block_on(build_sidebar(&ClientState::Disabled)).unwrap();
        assert_eq!(sidebar.items.len(), 4);
        assert_eq!(sidebar.base_path, "/protected");
        assert!(sidebar.items[3].disabled);
        assert_eq!(sidebar.items[3].href, "/paid-content");
    }

    #[tokio::test]
    async fn access_enables_paid_content() {
        let api = FakeApi::new(Answer::Data(Some(EntitlementCheck { has_access: true })));
        let sidebar = SidebarBuilder::new().build_with(Some(&api)).await.unwrap();
        assert!(!sidebar.items[3].disabled);
        assert_eq!(api.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn no_data_means_no_access() {
        let api = FakeApi::new(Answer::Data(None));
        let sidebar = SidebarBuilder::new().build_with(Some(&api)).await.unwrap();
        assert!(sidebar.items[3].disabled);

        let api = FakeApi::new(Answer::Data(Some(EntitlementCheck { has_access: false })));
        let sidebar = SidebarBuilder::new().build_with(Some(&api)).await.unwrap();
        assert!(sidebar.items[3].disabled);
    }

    #[tokio::test]
    async fn first_three_entries_are_fixed() {
        for answer in [
            Answer::Data(None),
            Answer::Data(Some(EntitlementCheck { has_access: true })),
        ] {
            let api = FakeApi::new(answer);
            let sidebar = SidebarBuilder::new().build_with(Some(&api)).await.unwrap();
            assert_eq!(
                labels(&sidebar),
                vec!["Account", "Pricing", "Subscription", "Paid Content"]
            );
            let hrefs: Vec<&str> = sidebar.items[..3].iter().map(|i| i.href.as_str()).collect();
            assert_eq!(hrefs, vec!["/", "/pricing", "/subscription"]);
            assert!(sidebar.items[..3].iter().all(|i| !i.disabled));
        }
    }

    #[tokio::test]
    async fn lookup_errors_propagate_by_default() {
        let api = FakeApi::new(Answer::Fail);
        let err = SidebarBuilder::new().build_with(Some(&api)).await.unwrap_err();
        assert!(matches!(err, NavError::Api { status: 503, .. }));
    }

    #[tokio::test]
    async fn fail_closed_hides_paid_content_on_error() {
        let api = FakeApi::new(Answer::Fail);
        let sidebar = SidebarBuilder::new()
            .on_error(EntitlementFailurePolicy::FailClosed)
            .build_with(Some(&api))
            .await
            .unwrap();
        assert!(sidebar.items[3].disabled);
        assert_eq!(sidebar.enabled_items().count(), 3);
    }

    #[tokio::test]
    async fn same_state_builds_same_sidebar() {
        let api = FakeApi::new(Answer::Data(Some(EntitlementCheck { has_access: true })));
        let builder = SidebarBuilder::new();
        let first = builder.build_with(Some(&api)).await.unwrap();
        let second = builder.build_with(Some(&api)).await.unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn policy_parses_both_spellings() {
        assert_eq!(
            "fail-closed".parse::<EntitlementFailurePolicy>().unwrap(),
            EntitlementFailurePolicy::FailClosed
        );
        assert!("ignore".parse::<EntitlementFailurePolicy>().is_err());
    }
}
