//! Jira credentials
//!
//! Basic-auth pair plus the site URL, resolved from flags or environment.

use crate::{JiraOpsError, Result};

pub const URL_VAR: &str = "JIRA_URL";
pub const EMAIL_VAR: &str = "JIRA_EMAIL";
pub const TOKEN_VAR: &str = "JIRA_API_TOKEN";
pub const CLOUD_ID_VAR: &str = "CLOUD_ID";

/// Where to create an API token; shown when credentials are missing
pub const TOKEN_HELP_URL: &str = "https://id.atlassian.com/manage-profile/security/api-tokens";

/// Credentials for one Jira Cloud site
#[derive(Clone)]
pub struct Credentials {
    /// Site URL without trailing slash, e.g. https://your-domain.atlassian.net
    pub url: String,
    pub email: String,
    pub api_token: String,
    /// Needed only for the automation API
    pub cloud_id: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("url", &self.url)
            .field("email", &self.email)
            .field("api_token", &"<redacted>")
            .field("cloud_id", &self.cloud_id)
            .finish()
    }
}

impl Credentials {
    pub fn new(
        url: impl Into<String>,
        email: impl Into<String>,
        api_token: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into().trim_end_matches('/').to_string(),
            email: email.into(),
            api_token: api_token.into(),
            cloud_id: None,
        }
    }

    pub fn with_cloud_id(mut self, cloud_id: impl Into<String>) -> Self {
        self.cloud_id = Some(cloud_id.into());
        self
    }

    /// Build from optional values, reporting every missing variable at once
    pub fn resolve(
        url: Option<String>,
        email: Option<String>,
        api_token: Option<String>,
        cloud_id: Option<String>,
    ) -> Result<Self> {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());

        let missing: Vec<&str> = [
            (URL_VAR, present(&url)),
            (EMAIL_VAR, present(&email)),
            (TOKEN_VAR, present(&api_token)),
        ]
        .into_iter()
        .filter(|(_, ok)| !ok)
        .map(|(name, _)| name)
        .collect();

        if !missing.is_empty() {
            return Err(JiraOpsError::Config(format!(
                "Missing required environment variables: {}\n\
                 Set them in the environment or a .env file, e.g.\n  \
                 {}=https://your-domain.atlassian.net\n  \
                 {}=your-email@example.com\n  \
                 {}=your-api-token\n\
                 Create an API token at: {}",
                missing.join(", "),
                URL_VAR,
                EMAIL_VAR,
                TOKEN_VAR,
                TOKEN_HELP_URL
            )));
        }

        let mut creds = Self::new(
            url.unwrap_or_default().trim(),
            email.unwrap_or_default().trim(),
            api_token.unwrap_or_default().trim(),
        );
        creds.cloud_id = cloud_id.filter(|c| !c.trim().is_empty());
        Ok(creds)
    }

    /// Cloud id or a configuration error naming the variable
    pub fn require_cloud_id(&self) -> Result<&str> {
        self.cloud_id.as_deref().ok_or_else(|| {
            JiraOpsError::Config(format!(
                "{} must be set to use the automation API",
                CLOUD_ID_VAR
            ))
        })
    }

    /// Browser URL for an issue
    pub fn browse_url(&self, key: &str) -> String {
        format!("{}/browse/{}", self.url, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let creds = Credentials::new("https://x.atlassian.net/", "a@b.c", "t");
        assert_eq!(creds.url, "https://x.atlassian.net");
        assert_eq!(creds.browse_url("KAN-1"), "https://x.atlassian.net/browse/KAN-1");
    }

    #[test]
    fn test_resolve_reports_all_missing() {
        let err = Credentials::resolve(None, Some("a@b.c".into()), Some("  ".into()), None)
            .unwrap_err()
            .to_string();
        assert!(err.contains("JIRA_URL"));
        assert!(err.contains("JIRA_API_TOKEN"));
        assert!(!err.contains("Missing required environment variables: JIRA_URL, JIRA_EMAIL"));
    }

    #[test]
    fn test_resolve_ok() {
        let creds = Credentials::resolve(
            Some("https://x.atlassian.net".into()),
            Some("a@b.c".into()),
            Some("secret".into()),
            Some("".into()),
        )
        .unwrap();
        assert_eq!(creds.email, "a@b.c");
        assert!(creds.cloud_id.is_none());
        assert!(creds.require_cloud_id().is_err());
    }

    #[test]
    fn test_debug_redacts_token() {
        let creds = Credentials::new("https://x", "a@b.c", "super-secret");
        let shown = format!("{:?}", creds);
        assert!(!shown.contains("super-secret"));
    }
}
