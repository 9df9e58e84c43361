use crate::adapters::session::StaticSessionStore;
use crate::config::toml_config::TomlConfig;
use crate::config::AppConfig;
use crate::domain::model::Session;
use crate::domain::ports::SessionStore;
use crate::utils::error::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::sync::Arc;

#[derive(Debug, Clone, Parser)]
#[command(name = "protected-nav")]
#[command(about = "Build the entitlement-gated sidebar and resolve application URLs")]
pub struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Publishable key, overrides NEXT_PUBLIC_UPDATE_PUBLISHABLE_KEY
    #[arg(long, global = true)]
    pub publishable_key: Option<String>,

    /// Bearer token of the signed-in user, overrides SESSION_ACCESS_TOKEN
    #[arg(long, global = true)]
    pub access_token: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Build the sidebar for the current session
    Sidebar {
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Render paid content disabled when the entitlement lookup fails
        #[arg(long)]
        fail_closed: bool,
    },
    /// Print the application base URL
    BaseUrl {
        /// Resolve as a browser with this origin
        #[arg(long)]
        origin: Option<String>,
    },
    /// Print the full URL for a path
    FullUrl {
        path: String,

        /// Resolve as a browser with this origin
        #[arg(long)]
        origin: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl Cli {
    /// Environment first, then the config file, then command line flags.
    pub fn load_config(&self) -> Result<AppConfig> {
        let mut config = AppConfig::from_env()?;

        if let Some(path) = &self.config {
            tracing::info!("📁 Loading configuration from: {}", path);
            config = TomlConfig::from_file(path)?.apply_to(config)?;
        }

        if let Some(key) = &self.publishable_key {
            config.entitlements = config.entitlements.with_publishable_key(key.clone());
        }

        if let Command::Sidebar {
            fail_closed: true, ..
        } = self.command
        {
            config.sidebar.on_entitlement_error =
                crate::core::sidebar::EntitlementFailurePolicy::FailClosed;
        }

        Ok(config)
    }

    /// `--access-token` wins over the environment.
    pub fn session_store(&self) -> Result<Option<Arc<dyn SessionStore>>> {
        match self.access_token.as_deref().filter(|t| !t.trim().is_empty()) {
            Some(token) => Ok(Some(Arc::new(StaticSessionStore::new(Session::new(token))))),
            None => crate::adapters::session::session_store_from_env(),
        }
    }
}
