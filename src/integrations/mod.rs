//! Jira integration
//!
//! - **jira**: REST v3 client ([`JiraClient`])
//! - **api**: the [`IssueApi`] trait the automation rules are written against
//! - **types**: request/response shapes
//! - **adf**: Atlassian Document Format for rich-text fields
//! - **retry**: backoff for read requests

pub mod adf;
pub mod api;
pub mod jira;
pub mod retry;
pub mod types;

pub use adf::{AdfDocument, AdfNode};
pub use api::IssueApi;
pub use jira::{JiraClient, SEARCH_FIELDS};
pub use retry::{with_retry, RetryConfig, RetryDecision, RetryableError};
pub use types::{
    normalize_project_key, parse_labels, BulkCreateError, BulkCreateResponse, CreatedIssue,
    ErrorCollection, IssueFieldsUpdate, IssueKey, JiraComment, JiraFields, JiraIssue,
    JiraIssueType, JiraIssueTypeDetails, JiraPriority, JiraProject, JiraSearchResponse,
    JiraStatus, JiraTransition, JiraUser, JiraWorklog, JiraWorklogsResponse, NewIssue,
    ServerInfo,
};
