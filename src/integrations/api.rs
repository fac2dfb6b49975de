//! Issue operations used by the automation rules
//!
//! The rules only need a handful of calls, so they depend on this trait
//! rather than on [`JiraClient`](super::JiraClient) directly.

use super::adf::AdfDocument;
use super::types::{IssueKey, JiraComment, JiraIssue, JiraTransition};
use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait IssueApi: Send + Sync {
    async fn get_issue(&self, key: &IssueKey) -> Result<JiraIssue>;

    async fn get_transitions(&self, key: &IssueKey) -> Result<Vec<JiraTransition>>;

    async fn transition_issue(&self, key: &IssueKey, transition_id: &str) -> Result<()>;

    async fn assign_issue(&self, key: &IssueKey, account_id: &str) -> Result<()>;

    /// Replace the issue's labels with `labels`
    async fn set_labels(&self, key: &IssueKey, labels: &[String]) -> Result<()>;

    async fn add_comment(&self, key: &IssueKey, body: AdfDocument) -> Result<JiraComment>;
}
