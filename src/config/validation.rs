//! Configuration validation
//!
//! Checks credentials and settings before any request is sent:
//! - Site URL uses http(s)
//! - Email looks like an email
//! - Token is present
//! - Search and retry limits are in range

use super::credentials::Credentials;
use super::settings::Settings;
use crate::JiraOpsError;

/// Jira rejects larger pages on the search endpoint
pub const MAX_SEARCH_RESULTS: u32 = 100;
const MAX_RETRIES: u32 = 10;

/// Validation error details
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

pub type ValidationResult = std::result::Result<(), Vec<ValidationError>>;

fn is_http_url(url: &str) -> bool {
    url.starts_with("https://") || url.starts_with("http://")
}

pub fn validate_credentials(creds: &Credentials) -> ValidationResult {
    let mut errors = Vec::new();

    if !is_http_url(&creds.url) {
        errors.push(ValidationError::new(
            "JIRA_URL",
            format!("Invalid Jira URL: {}", creds.url),
        ));
    }

    let email_ok = creds
        .email
        .split_once('@')
        .is_some_and(|(user, domain)| !user.is_empty() && domain.contains('.'));
    if !email_ok {
        errors.push(ValidationError::new(
            "JIRA_EMAIL",
            format!("Not an email address: {}", creds.email),
        ));
    }

    if creds.api_token.trim().is_empty() {
        errors.push(ValidationError::new("JIRA_API_TOKEN", "API token cannot be empty"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

pub fn validate_settings(settings: &Settings) -> ValidationResult {
    let mut errors = Vec::new();

    if settings.default_project.trim().is_empty() {
        errors.push(ValidationError::new(
            "default_project",
            "Default project key cannot be empty",
        ));
    }

    let max = settings.search.max_results;
    if max == 0 || max > MAX_SEARCH_RESULTS {
        errors.push(ValidationError::new(
            "search.max_results",
            format!("Must be between 1 and {}, got {}", MAX_SEARCH_RESULTS, max),
        ));
    }

    if settings.http.timeout_secs == 0 {
        errors.push(ValidationError::new(
            "http.timeout_secs",
            "Timeout must be greater than 0",
        ));
    }

    if settings.http.max_retries > MAX_RETRIES {
        errors.push(ValidationError::new(
            "http.max_retries",
            format!("At most {} retries allowed", MAX_RETRIES),
        ));
    }

    if !is_http_url(&settings.automation.base_url) {
        errors.push(ValidationError::new(
            "automation.base_url",
            format!("Invalid URL: {}", settings.automation.base_url),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate both halves, folding every problem into one error
pub fn validate_all(creds: &Credentials, settings: &Settings) -> crate::Result<()> {
    fold([validate_credentials(creds), validate_settings(settings)])
}

/// Settings only, for commands that never send a request
pub fn validate_offline(settings: &Settings) -> crate::Result<()> {
    fold([validate_settings(settings)])
}

fn fold<const N: usize>(results: [ValidationResult; N]) -> crate::Result<()> {
    let mut messages = Vec::new();
    for result in results {
        if let Err(errors) = result {
            messages.extend(errors.iter().map(|e| format!("  - {}", e)));
        }
    }

    if messages.is_empty() {
        Ok(())
    } else {
        Err(JiraOpsError::Validation(messages))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn good_creds() -> Credentials {
        Credentials::new("https://loxodonta.atlassian.net", "dev@example.com", "token")
    }

    #[test]
    fn test_valid_config() {
        assert!(validate_all(&good_creds(), &Settings::default()).is_ok());
    }

    #[test]
    fn test_bad_credentials() {
        let creds = Credentials::new("loxodonta.atlassian.net", "not-an-email", "");
        let errors = validate_credentials(&creds).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert_eq!(errors[0].field, "JIRA_URL");
        assert_eq!(errors[1].field, "JIRA_EMAIL");
        assert_eq!(errors[2].field, "JIRA_API_TOKEN");
    }

    #[test]
    fn test_search_bounds() {
        let mut settings = Settings::default();
        settings.search.max_results = 0;
        assert!(validate_settings(&settings).is_err());

        settings.search.max_results = 101;
        assert!(validate_settings(&settings).is_err());

        settings.search.max_results = 100;
        assert!(validate_settings(&settings).is_ok());
    }

    #[test]
    fn test_validate_all_collects_both_sides() {
        let creds = Credentials::new("ftp://x", "dev@example.com", "t");
        let mut settings = Settings::default();
        settings.http.max_retries = 50;

        let err = validate_all(&creds, &settings).unwrap_err().to_string();
        assert!(err.contains("JIRA_URL"));
        assert!(err.contains("http.max_retries"));
    }

    #[test]
    fn test_offline_ignores_credentials() {
        assert!(validate_offline(&Settings::default()).is_ok());

        let mut settings = Settings::default();
        settings.default_project = " ".to_string();
        let err = validate_offline(&settings).unwrap_err().to_string();
        assert!(err.contains("default_project"));
        assert!(!err.contains("JIRA_"));
    }
}
