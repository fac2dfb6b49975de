//! Jira REST v3 types
//!
//! Responses keep only the fields jira-ops reads; everything beyond the
//! essentials is optional so partial payloads (search with a `fields`
//! filter, restricted users) still deserialize.

use super::adf::AdfDocument;
use crate::{JiraOpsError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Issue key (`KAN-123`) or numeric issue id, trimmed and upper-cased
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IssueKey(String);

impl IssueKey {
    pub fn parse(raw: &str) -> Result<Self> {
        let key = raw.trim().to_uppercase();
        if key.is_empty() {
            return Err(JiraOpsError::InvalidInput("Issue key is required".to_string()));
        }

        let is_id = key.chars().all(|c| c.is_ascii_digit());
        let is_key = key.rsplit_once('-').is_some_and(|(project, number)| {
            project.starts_with(|c: char| c.is_ascii_alphabetic())
                && project.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
                && !number.is_empty()
                && number.chars().all(|c| c.is_ascii_digit())
        });

        if is_id || is_key {
            Ok(Self(key))
        } else {
            Err(JiraOpsError::InvalidInput(format!(
                "'{}' is not an issue key (expected something like KAN-123)",
                raw.trim()
            )))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IssueKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for IssueKey {
    type Err = JiraOpsError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Trim and upper-case a project key
pub fn normalize_project_key(raw: &str) -> Result<String> {
    let key = raw.trim().to_uppercase();
    if key.is_empty() {
        return Err(JiraOpsError::InvalidInput("Project key is required".to_string()));
    }
    if !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(JiraOpsError::InvalidInput(format!(
            "'{}' is not a project key",
            raw.trim()
        )));
    }
    Ok(key)
}

// ============ Responses ============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JiraIssue {
    #[serde(default)]
    pub id: String,
    pub key: String,
    pub fields: JiraFields,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JiraFields {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub description: Option<AdfDocument>,
    #[serde(rename = "issuetype")]
    pub issue_type: JiraIssueType,
    pub status: JiraStatus,
    #[serde(default)]
    pub priority: Option<JiraPriority>,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub assignee: Option<JiraUser>,
    #[serde(default)]
    pub reporter: Option<JiraUser>,
    #[serde(default)]
    pub creator: Option<JiraUser>,
    #[serde(default)]
    pub project: Option<JiraProjectRef>,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub updated: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JiraIssueType {
    pub name: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub subtask: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JiraStatus {
    pub name: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "statusCategory", default)]
    pub status_category: Option<JiraStatusCategory>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JiraStatusCategory {
    pub key: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JiraPriority {
    pub name: String,
    #[serde(default)]
    pub id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JiraUser {
    #[serde(rename = "displayName", default)]
    pub display_name: String,
    #[serde(rename = "accountId", default)]
    pub account_id: Option<String>,
    #[serde(rename = "emailAddress", default)]
    pub email: Option<String>,
    #[serde(default = "default_true")]
    pub active: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JiraProjectRef {
    pub key: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JiraSearchResponse {
    #[serde(default)]
    pub total: u32,
    #[serde(rename = "startAt", default)]
    pub start_at: u32,
    #[serde(rename = "maxResults", default)]
    pub max_results: u32,
    #[serde(default)]
    pub issues: Vec<JiraIssue>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JiraTransition {
    pub id: String,
    pub name: String,
    pub to: JiraStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JiraTransitionsResponse {
    #[serde(default)]
    pub transitions: Vec<JiraTransition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JiraComment {
    pub id: String,
    #[serde(default)]
    pub body: Option<AdfDocument>,
    #[serde(default)]
    pub author: Option<JiraUser>,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub updated: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JiraWorklog {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub author: Option<JiraUser>,
    #[serde(rename = "timeSpent", default)]
    pub time_spent: Option<String>,
    #[serde(rename = "timeSpentSeconds", default)]
    pub time_spent_seconds: Option<u64>,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub comment: Option<AdfDocument>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JiraWorklogsResponse {
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub worklogs: Vec<JiraWorklog>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JiraIssueTypeDetails {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub subtask: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JiraProjectCategory {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JiraProject {
    #[serde(default)]
    pub id: String,
    pub key: String,
    pub name: String,
    #[serde(rename = "projectTypeKey", default)]
    pub project_type_key: Option<String>,
    #[serde(default)]
    pub lead: Option<JiraUser>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "projectCategory", default)]
    pub project_category: Option<JiraProjectCategory>,
    #[serde(rename = "issueTypes", default)]
    pub issue_types: Vec<JiraIssueTypeDetails>,
}

impl JiraProject {
    /// Issue types a top-level issue can be created with
    pub fn standard_issue_types(&self) -> Vec<&JiraIssueTypeDetails> {
        self.issue_types.iter().filter(|t| !t.subtask).collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerInfo {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(rename = "buildNumber", default)]
    pub build_number: Option<u64>,
    #[serde(rename = "baseUrl", default)]
    pub base_url: Option<String>,
    #[serde(rename = "deploymentType", default)]
    pub deployment_type: Option<String>,
    #[serde(rename = "serverTitle", default)]
    pub server_title: Option<String>,
}

/// Response of a create call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedIssue {
    pub id: String,
    pub key: String,
    #[serde(rename = "self", default)]
    pub self_url: Option<String>,
}

/// Jira's standard error body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorCollection {
    #[serde(rename = "errorMessages", default)]
    pub error_messages: Vec<String>,
    #[serde(default)]
    pub errors: BTreeMap<String, String>,
}

impl ErrorCollection {
    /// Flatten into "message; field: message" form
    pub fn summary(&self) -> String {
        self.error_messages
            .iter()
            .cloned()
            .chain(self.errors.iter().map(|(field, msg)| format!("{}: {}", field, msg)))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkCreateError {
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(rename = "failedElementNumber", default)]
    pub failed_element_number: Option<usize>,
    #[serde(rename = "elementErrors", default)]
    pub element_errors: ErrorCollection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BulkCreateResponse {
    #[serde(default)]
    pub issues: Vec<CreatedIssue>,
    #[serde(default)]
    pub errors: Vec<BulkCreateError>,
}

// ============ Requests ============

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyRef {
    pub key: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NameRef {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IssueTypeRef {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountRef {
    #[serde(rename = "accountId")]
    pub account_id: String,
}

/// Fields of an issue to create
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewIssue {
    pub project: KeyRef,
    pub summary: String,
    #[serde(rename = "issuetype")]
    pub issue_type: IssueTypeRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<AdfDocument>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<NameRef>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
}

impl NewIssue {
    pub fn new(
        project: impl Into<String>,
        summary: impl Into<String>,
        issue_type: impl Into<String>,
    ) -> Self {
        Self {
            project: KeyRef {
                key: project.into(),
            },
            summary: summary.into(),
            issue_type: IssueTypeRef {
                name: issue_type.into(),
                id: None,
            },
            description: None,
            priority: None,
            labels: Vec::new(),
        }
    }

    pub fn with_issue_type_id(mut self, id: impl Into<String>) -> Self {
        self.issue_type.id = Some(id.into());
        self
    }

    /// Blank text leaves the description unset
    pub fn with_description(mut self, text: &str) -> Self {
        self.description = AdfDocument::from_lines(text);
        self
    }

    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(NameRef {
            name: priority.into(),
        });
        self
    }

    pub fn with_labels(mut self, labels: Vec<String>) -> Self {
        self.labels = labels;
        self
    }

    /// Full request body (`{"fields": {...}}`)
    pub fn to_payload(&self) -> serde_json::Value {
        serde_json::json!({ "fields": self })
    }
}

/// Sparse field update for PUT /issue/{key}; unset fields are left alone
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IssueFieldsUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<AdfDocument>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<NameRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<AccountRef>,
}

impl IssueFieldsUpdate {
    pub fn is_empty(&self) -> bool {
        self.summary.is_none()
            && self.description.is_none()
            && self.priority.is_none()
            && self.labels.is_none()
            && self.assignee.is_none()
    }

    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Description as a single paragraph
    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(AdfDocument::paragraph(text));
        self
    }

    pub fn priority(mut self, name: impl Into<String>) -> Self {
        self.priority = Some(NameRef { name: name.into() });
        self
    }

    pub fn labels(mut self, labels: Vec<String>) -> Self {
        self.labels = Some(labels);
        self
    }

    pub fn assignee(mut self, account_id: impl Into<String>) -> Self {
        self.assignee = Some(AccountRef {
            account_id: account_id.into(),
        });
        self
    }
}

/// Split a comma-separated label list, dropping blanks
pub fn parse_labels(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}
