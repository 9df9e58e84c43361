//! Base URL resolution for links that leave the sidebar (callbacks, checkout returns).
//!
//! Resolution order on the server:
//! - `VERCEL_URL` set: `https://` + its value
//! - `NEXT_PUBLIC_APP_URL` set: used verbatim, scheme included
//! - otherwise `http://localhost:3000`
//!
//! In a browser the page origin wins and the environment is ignored.

use crate::domain::model::ExecutionContext;

pub const DEPLOYMENT_URL_VAR: &str = "VERCEL_URL";
pub const PUBLIC_URL_VAR: &str = "NEXT_PUBLIC_APP_URL";
pub const LOCAL_FALLBACK_URL: &str = "http://localhost:3000";

/// The environment values URL resolution depends on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlEnv {
    /// Platform deployment host, without scheme.
    pub deployment_url: Option<String>,
    /// Application public URL, scheme included.
    pub public_url: Option<String>,
}

impl UrlEnv {
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            deployment_url: crate::config::non_empty(lookup(DEPLOYMENT_URL_VAR)),
            public_url: crate::config::non_empty(lookup(PUBLIC_URL_VAR)),
        }
    }
}

pub fn get_base_url(context: &ExecutionContext, env: &UrlEnv) -> String {
    match context {
        ExecutionContext::Browser { origin } => origin.clone(),
        ExecutionContext::Server => {
            if let Some(host) = set(&env.deployment_url) {
                return format!("https://{}", host);
            }
            if let Some(url) = set(&env.public_url) {
                return url.to_string();
            }
            LOCAL_FALLBACK_URL.to_string()
        }
    }
}

pub fn get_full_url(context: &ExecutionContext, env: &UrlEnv, path: &str) -> String {
    join_url(&get_base_url(context, env), path)
}

/// Append `path` to `base`, adding a leading `/` when missing. Nothing else is normalised.
pub fn join_url(base: &str, path: &str) -> String {
    if path.starts_with('/') {
        format!("{}{}", base, path)
    } else {
        format!("{}/{}", base, path)
    }
}

fn set(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// A context and environment captured once, for repeated lookups.
#[derive(Debug, Clone)]
pub struct UrlResolver {
    context: ExecutionContext,
    env: UrlEnv,
}

impl UrlResolver {
    pub fn new(context: ExecutionContext, env: UrlEnv) -> Self {
        Self { context, env }
    }

    pub fn base_url(&self) -> String {
        get_base_url(&self.context, &self.env)
    }

    pub fn full_url(&self, path: &str) -> String {
        get_full_url(&self.context, &self.env, path)
    }
}
