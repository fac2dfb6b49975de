//! Settings file handling
//!
//! Loads ~/.config/jira-ops/config.yaml. Every field has a default, so a
//! missing file or a partial file both work.

use crate::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// HTTP client behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpSettings {
    /// Client-wide timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retries for read requests after the first attempt
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    2
}

fn default_initial_backoff_ms() -> u64 {
    500
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            initial_backoff_ms: default_initial_backoff_ms(),
        }
    }
}

/// Search defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchSettings {
    #[serde(default = "default_max_results")]
    pub max_results: u32,
}

fn default_max_results() -> u32 {
    10
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            max_results: default_max_results(),
        }
    }
}

/// Atlassian automation API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutomationSettings {
    /// Host of the public automation API
    #[serde(default = "default_automation_url")]
    pub base_url: String,

    /// Where rule summary exports are written
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_automation_url() -> String {
    "https://api.atlassian.com".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for AutomationSettings {
    fn default() -> Self {
        Self {
            base_url: default_automation_url(),
            output_dir: default_output_dir(),
        }
    }
}

/// jira-ops settings
///
/// Everything that is not a credential. Credentials come from flags or the
/// environment, never from this file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Project key used when a prompt or command needs one
    #[serde(default = "default_project")]
    pub default_project: String,

    #[serde(default)]
    pub search: SearchSettings,

    #[serde(default)]
    pub http: HttpSettings,

    #[serde(default)]
    pub automation: AutomationSettings,
}

fn default_project() -> String {
    "KAN".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_project: default_project(),
            search: SearchSettings::default(),
            http: HttpSettings::default(),
            automation: AutomationSettings::default(),
        }
    }
}

impl Settings {
    /// Load from an explicit path; the file must exist
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(crate::JiraOpsError::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        tracing::info!(path = %path.display(), "Loading settings");

        let content = fs::read_to_string(path)?;
        let settings: Self = serde_yaml::from_str(&content)?;

        tracing::debug!(
            default_project = %settings.default_project,
            max_results = settings.search.max_results,
            max_retries = settings.http.max_retries,
            "Settings loaded"
        );

        Ok(settings)
    }

    /// Load from the default path, falling back to defaults when absent
    pub fn load_default() -> Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load(&path)
        } else {
            tracing::debug!(path = %path.display(), "No settings file, using defaults");
            Ok(Self::default())
        }
    }

    /// Explicit path when given, default lookup otherwise
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Self::load_default(),
        }
    }

    /// ~/.config/jira-ops/config.yaml
    pub fn default_path() -> PathBuf {
        let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(".config");
        path.push("jira-ops");
        path.push("config.yaml");
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.default_project, "KAN");
        assert_eq!(settings.search.max_results, 10);
        assert_eq!(settings.http.timeout_secs, 30);
        assert_eq!(settings.automation.base_url, "https://api.atlassian.com");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "default_project: LOX\nhttp:\n  max_retries: 0\n").unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.default_project, "LOX");
        assert_eq!(settings.http.max_retries, 0);
        assert_eq!(settings.http.timeout_secs, 30);
        assert_eq!(settings.search.max_results, 10);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = Settings::resolve(Some(&dir.path().join("nope.yaml"))).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }
}
