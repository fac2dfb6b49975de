//! CLI actions
//!
//! One async function per action. Each prints human-readable output to
//! stdout and returns `Result<()>`; errors are left for the caller to report.

pub mod automation;
pub mod demo;
pub mod issue;
pub mod search;
pub mod site;

use crate::config::{Credentials, Settings};
use crate::integrations::JiraClient;
use crate::Result;

/// Everything an action needs for one invocation
pub struct Session {
    pub client: JiraClient,
    pub credentials: Credentials,
    pub settings: Settings,
}

impl Session {
    pub fn new(credentials: Credentials, settings: Settings) -> Result<Self> {
        let client = JiraClient::new(&credentials, &settings)?;
        Ok(Self {
            client,
            credentials,
            settings,
        })
    }

    /// Browser URL for an issue on this site
    pub fn browse_url(&self, key: &str) -> String {
        self.credentials.browse_url(key)
    }
}
