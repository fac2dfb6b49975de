//! Error types for jira-ops
//!
//! One enum covers configuration, input, transport and Jira API failures.
//! Uses thiserror for ergonomic error handling.

use crate::integrations::retry::{RetryDecision, RetryableError};
use std::time::Duration;
use thiserror::Error;

/// Result type alias for jira-ops operations
pub type Result<T> = std::result::Result<T, JiraOpsError>;

/// Error type for every jira-ops operation
#[derive(Error, Debug)]
pub enum JiraOpsError {
    /// Missing or unusable configuration (credentials, settings file)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Settings failed validation; every problem is listed
    #[error("Invalid configuration:\n{}", .0.join("\n"))]
    Validation(Vec<String>),

    /// User supplied something we refuse to send
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// 401 from Jira; carries what was being accessed
    #[error("Authentication failed. Check your API token.")]
    Auth(String),

    /// 404 from Jira; carries what was missing, e.g. "Issue KAN-1"
    #[error("{0} not found")]
    NotFound(String),

    /// 429 from Jira, with the Retry-After value in seconds
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Any other unexpected status; the body is kept verbatim
    #[error("Jira API error: HTTP {status}: {body}")]
    Api { status: u16, body: String },

    /// An automation rule could not act on the issue
    #[error("Rule not applied: {0}")]
    RuleSkipped(String),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Interactive prompt errors (terminal closed, not a tty)
    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),
}

impl JiraOpsError {
    /// HTTP status carried by the error, if Jira answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            JiraOpsError::Auth(_) => Some(401),
            JiraOpsError::NotFound(_) => Some(404),
            JiraOpsError::RateLimited(_) => Some(429),
            JiraOpsError::Api { status, .. } => Some(*status),
            JiraOpsError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

impl RetryableError for JiraOpsError {
    fn retry_decision(&self) -> RetryDecision {
        match self {
            JiraOpsError::Http(e) => {
                if e.is_connect() || e.is_timeout() {
                    RetryDecision::Retry
                } else {
                    match e.status().map(|s| s.as_u16()) {
                        Some(429) => RetryDecision::RetryAfter(Duration::from_secs(60)),
                        Some(500..=599) => RetryDecision::Retry,
                        _ => RetryDecision::NoRetry,
                    }
                }
            }
            JiraOpsError::RateLimited(secs) => {
                RetryDecision::RetryAfter(Duration::from_secs(*secs))
            }
            JiraOpsError::Api { status, .. } if (500..=599).contains(status) => {
                RetryDecision::Retry
            }
            JiraOpsError::Api { .. }
            | JiraOpsError::Config(_)
            | JiraOpsError::Validation(_)
            | JiraOpsError::InvalidInput(_)
            | JiraOpsError::Auth(_)
            | JiraOpsError::NotFound(_)
            | JiraOpsError::RuleSkipped(_)
            | JiraOpsError::Json(_)
            | JiraOpsError::Yaml(_)
            | JiraOpsError::Io(_)
            | JiraOpsError::Prompt(_) => RetryDecision::NoRetry,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_errors_are_retried() {
        let err = JiraOpsError::Api {
            status: 503,
            body: "unavailable".to_string(),
        };
        assert_eq!(err.retry_decision(), RetryDecision::Retry);
    }

    #[test]
    fn test_client_errors_are_not_retried() {
        let err = JiraOpsError::Api {
            status: 400,
            body: "{\"errorMessages\":[\"bad\"]}".to_string(),
        };
        assert_eq!(err.retry_decision(), RetryDecision::NoRetry);
        assert_eq!(
            JiraOpsError::NotFound("KAN-1".into()).retry_decision(),
            RetryDecision::NoRetry
        );
    }

    #[test]
    fn test_rate_limit_uses_retry_after() {
        assert_eq!(
            JiraOpsError::RateLimited(7).retry_decision(),
            RetryDecision::RetryAfter(Duration::from_secs(7))
        );
    }

    #[test]
    fn test_api_error_keeps_body_verbatim() {
        let err = JiraOpsError::Api {
            status: 400,
            body: "Field 'summary' is required".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Jira API error: HTTP 400: Field 'summary' is required"
        );
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn test_not_found_and_auth_messages() {
        assert_eq!(
            JiraOpsError::NotFound("Issue KAN-9".into()).to_string(),
            "Issue KAN-9 not found"
        );
        assert_eq!(
            JiraOpsError::Auth("Issue KAN-9".into()).to_string(),
            "Authentication failed. Check your API token."
        );
    }

    #[test]
    fn test_validation_lists_every_problem() {
        let err = JiraOpsError::Validation(vec!["a: bad".into(), "b: worse".into()]);
        assert_eq!(err.to_string(), "Invalid configuration:\na: bad\nb: worse");
    }
}
