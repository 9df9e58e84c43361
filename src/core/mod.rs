pub mod client;
pub mod sidebar;
pub mod urls;

pub use crate::domain::model::{EntitlementCheck, NavigationItem, Session, Sidebar};
pub use crate::domain::ports::{EntitlementsApi, SessionStore, TokenProvider};
pub use crate::utils::error::Result;
