pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::{AppConfig, EntitlementsConfig};
pub use crate::core::{
    client::{create_client, ClientState, UpdateClient},
    sidebar::{build_sidebar, EntitlementFailurePolicy, SidebarBuilder},
    urls::{get_base_url, get_full_url, UrlEnv, UrlResolver},
};
pub use domain::model::{ExecutionContext, NavigationItem, Sidebar};
pub use utils::error::{NavError, Result};
