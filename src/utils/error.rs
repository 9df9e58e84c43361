use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NavError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Entitlements API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Session store error: {message}")]
    Session { message: String },

    #[error("{operation} timed out after {after:?}")]
    Timeout {
        operation: &'static str,
        after: Duration,
    },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid value for '{field}': {value} ({reason})")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Authentication,
    Configuration,
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl NavError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            NavError::Http(_) | NavError::Timeout { .. } => ErrorCategory::Network,
            NavError::Api { status, .. } if *status == 401 || *status == 403 => {
                ErrorCategory::Authentication
            }
            NavError::Session { .. } => ErrorCategory::Authentication,
            NavError::Api { .. } => ErrorCategory::Network,
            NavError::Config { .. } | NavError::InvalidConfigValue { .. } => {
                ErrorCategory::Configuration
            }
            NavError::Serialization(_) | NavError::Io(_) => ErrorCategory::Processing,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 暫時性錯誤，重試可能成功
            NavError::Timeout { .. } | NavError::Http(_) => ErrorSeverity::Medium,
            NavError::Api { status, .. } if *status >= 500 => ErrorSeverity::Medium,
            NavError::Api { .. } | NavError::Session { .. } | NavError::Serialization(_) => {
                ErrorSeverity::High
            }
            NavError::Config { .. } | NavError::InvalidConfigValue { .. } | NavError::Io(_) => {
                ErrorSeverity::Critical
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            NavError::Http(_) => "Could not reach the entitlements service".to_string(),
            NavError::Timeout { operation, after } => {
                format!("The {} did not finish within {}s", operation, after.as_secs())
            }
            NavError::Api { status, .. } => {
                format!("The entitlements service rejected the request (HTTP {})", status)
            }
            NavError::Session { .. } => "Could not read the current session".to_string(),
            NavError::Serialization(_) => {
                "The entitlements service sent an unexpected response".to_string()
            }
            NavError::Io(e) => format!("File access failed: {}", e),
            NavError::Config { message } => format!("Invalid configuration: {}", message),
            NavError::InvalidConfigValue { field, reason, .. } => {
                format!("Invalid configuration value for {}: {}", field, reason)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => {
                "Check network connectivity and UPDATE_API_URL, or raise UPDATE_REQUEST_TIMEOUT_SECS"
            }
            ErrorCategory::Authentication => {
                "Sign in again or verify the publishable key belongs to this environment"
            }
            ErrorCategory::Configuration => "Review the environment variables and config file",
            ErrorCategory::Processing => "Re-run with --verbose and inspect the response body",
        }
    }
}

pub type Result<T> = std::result::Result<T, NavError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_api_errors_are_authentication() {
        let err = NavError::Api {
            status: 401,
            message: "bad token".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Authentication);
        assert_eq!(err.severity(), ErrorSeverity::High);
    }

    #[test]
    fn timeouts_are_retryable_network_errors() {
        let err = NavError::Timeout {
            operation: "entitlement check",
            after: Duration::from_secs(3),
        };
        assert_eq!(err.category(), ErrorCategory::Network);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert_eq!(err.to_string(), "entitlement check timed out after 3s");
    }

    #[test]
    fn config_errors_are_critical() {
        let err = NavError::Config {
            message: "missing".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert!(err.user_friendly_message().contains("missing"));
    }
}
