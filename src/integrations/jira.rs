//! Jira Cloud REST client
//!
//! Async wrapper over REST v3 and the public automation API. Reads go
//! through the retry policy; writes are sent once.

use super::adf::AdfDocument;
use super::api::IssueApi;
use super::retry::{with_retry, RetryConfig};
use super::types::{
    BulkCreateResponse, CreatedIssue, IssueFieldsUpdate, IssueKey, JiraComment, JiraIssue,
    JiraProject, JiraSearchResponse, JiraTransition, JiraTransitionsResponse, JiraUser,
    JiraWorklogsResponse, NewIssue, ServerInfo,
};
use crate::config::{Credentials, Settings};
use crate::{JiraOpsError, Result};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, RETRY_AFTER};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};

/// Per-request timeout for search/query operations (large result sets)
const SEARCH_TIMEOUT: Duration = Duration::from_secs(30);
/// Per-request timeout for single resource fetches
const GET_TIMEOUT: Duration = Duration::from_secs(10);
/// Per-request timeout for create/update/delete operations
const WRITE_TIMEOUT: Duration = Duration::from_secs(15);
/// Used when a 429 carries no usable Retry-After header
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Fields requested by searches; enough for the result listing
pub const SEARCH_FIELDS: &[&str] = &["summary", "status", "issuetype", "assignee", "priority"];

/// Jira Cloud API client
pub struct JiraClient {
    http: Client,
    api_base: String,
    automation_base: String,
    email: String,
    api_token: String,
    retry: RetryConfig,
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    jql: &'a str,
    #[serde(rename = "maxResults")]
    max_results: u32,
    fields: &'a [&'a str],
}

#[derive(Serialize)]
struct TransitionRequest<'a> {
    transition: TransitionId<'a>,
}

#[derive(Serialize)]
struct TransitionId<'a> {
    id: &'a str,
}

#[derive(Serialize)]
struct CommentRequest {
    body: AdfDocument,
}

#[derive(Serialize)]
struct FieldsRequest<'a, T: Serialize> {
    fields: &'a T,
}

#[derive(Serialize)]
struct BulkCreateRequest<'a> {
    #[serde(rename = "issueUpdates")]
    issue_updates: Vec<FieldsRequest<'a, NewIssue>>,
}

/// Map a response to `Ok` when its status is expected, otherwise to the
/// matching error. The body of unexpected responses is kept verbatim.
async fn expect_status(
    response: Response,
    expected: &[StatusCode],
    subject: &str,
) -> Result<Response> {
    let status = response.status();
    if expected.contains(&status) {
        return Ok(response);
    }

    match status {
        StatusCode::UNAUTHORIZED => {
            let body = response.text().await.unwrap_or_default();
            debug!(subject, body = %body, "Jira rejected credentials");
            Err(JiraOpsError::Auth(subject.to_string()))
        }
        StatusCode::NOT_FOUND => {
            let body = response.text().await.unwrap_or_default();
            debug!(subject, body = %body, "Jira resource not found");
            Err(JiraOpsError::NotFound(subject.to_string()))
        }
        StatusCode::TOO_MANY_REQUESTS => {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
            Err(JiraOpsError::RateLimited(retry_after))
        }
        status => Err(JiraOpsError::Api {
            status: status.as_u16(),
            body: response.text().await.unwrap_or_default(),
        }),
    }
}

impl JiraClient {
    /// Create a client for the site in `creds`
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(creds: &Credentials, settings: &Settings) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(settings.http.timeout_secs))
            .user_agent(concat!("jira-ops/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            api_base: format!("{}/rest/api/3", creds.url.trim_end_matches('/')),
            automation_base: settings
                .automation
                .base_url
                .trim_end_matches('/')
                .to_string(),
            email: creds.email.clone(),
            api_token: creds.api_token.clone(),
            retry: RetryConfig::from_settings(&settings.http),
        })
    }

    pub fn with_retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// `{site}/rest/api/3`
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.http
            .request(method, url)
            .basic_auth(&self.email, Some(&self.api_token))
            .header(ACCEPT, "application/json")
    }

    fn issue_url(&self, key: &IssueKey, suffix: &str) -> String {
        format!(
            "{}/issue/{}{}",
            self.api_base,
            urlencoding::encode(key.as_str()),
            suffix
        )
    }

    /// Send a read request (retried on transient failures) and decode a 200 body
    async fn read<T, B>(&self, operation: &str, subject: &str, build: B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Fn() -> RequestBuilder + Sync,
    {
        let build = &build;
        with_retry(&self.retry, operation, move || async move {
            let response = build().send().await?;
            let response = expect_status(response, &[StatusCode::OK], subject).await?;
            Ok::<T, JiraOpsError>(response.json::<T>().await?)
        })
        .await
    }

    /// Send a write request exactly once
    async fn write(
        &self,
        builder: RequestBuilder,
        expected: &[StatusCode],
        subject: &str,
    ) -> Result<Response> {
        let response = builder.timeout(WRITE_TIMEOUT).send().await?;
        expect_status(response, expected, subject).await
    }

    // ============ Reads ============

    /// GET /serverInfo
    pub async fn server_info(&self) -> Result<ServerInfo> {
        let url = format!("{}/serverInfo", self.api_base);
        debug!("Fetching Jira server info");
        self.read("server_info", "Server info", || {
            self.request(Method::GET, &url).timeout(GET_TIMEOUT)
        })
        .await
    }

    /// Get a single issue by key
    pub async fn get_issue(&self, key: &IssueKey) -> Result<JiraIssue> {
        let url = self.issue_url(key, "");
        let subject = format!("Issue {}", key);
        debug!(key = %key, "Fetching Jira issue");
        self.read("get_issue", &subject, || {
            self.request(Method::GET, &url).timeout(GET_TIMEOUT)
        })
        .await
    }

    /// Search for issues using JQL
    pub async fn search(
        &self,
        jql: &str,
        max_results: u32,
        fields: &[&str],
    ) -> Result<JiraSearchResponse> {
        let url = format!("{}/search", self.api_base);
        let body = SearchRequest {
            jql,
            max_results,
            fields,
        };

        debug!(jql = %jql, max_results, "Searching Jira issues");

        let result: JiraSearchResponse = self
            .read("search", "Search endpoint", || {
                self.request(Method::POST, &url)
                    .json(&body)
                    .timeout(SEARCH_TIMEOUT)
            })
            .await?;

        info!(
            total = result.total,
            returned = result.issues.len(),
            "Jira search complete"
        );
        Ok(result)
    }

    /// Every project visible to the user
    pub async fn list_projects(&self) -> Result<Vec<JiraProject>> {
        let url = format!("{}/project", self.api_base);
        debug!("Listing Jira projects");
        self.read("list_projects", "Projects", || {
            self.request(Method::GET, &url).timeout(GET_TIMEOUT)
        })
        .await
    }

    pub async fn get_project(&self, project_key: &str) -> Result<JiraProject> {
        let url = format!(
            "{}/project/{}",
            self.api_base,
            urlencoding::encode(project_key)
        );
        let subject = format!("Project {}", project_key);
        debug!(project = %project_key, "Fetching Jira project");
        self.read("get_project", &subject, || {
            self.request(Method::GET, &url).timeout(GET_TIMEOUT)
        })
        .await
    }

    /// Get available transitions for an issue
    pub async fn get_transitions(&self, key: &IssueKey) -> Result<Vec<JiraTransition>> {
        let url = self.issue_url(key, "/transitions");
        let subject = format!("Issue {}", key);
        debug!(key = %key, "Fetching Jira transitions");
        let result: JiraTransitionsResponse = self
            .read("get_transitions", &subject, || {
                self.request(Method::GET, &url).timeout(GET_TIMEOUT)
            })
            .await?;
        Ok(result.transitions)
    }

    pub async fn get_worklogs(&self, key: &IssueKey) -> Result<JiraWorklogsResponse> {
        let url = self.issue_url(key, "/worklog");
        let subject = format!("Issue {}", key);
        debug!(key = %key, "Fetching Jira worklogs");
        self.read("get_worklogs", &subject, || {
            self.request(Method::GET, &url).timeout(GET_TIMEOUT)
        })
        .await
    }

    /// Find users by name or email fragment
    pub async fn search_users(&self, query: &str) -> Result<Vec<JiraUser>> {
        let url = format!("{}/user/search", self.api_base);
        debug!(query = %query, "Searching Jira users");
        self.read("search_users", "User search endpoint", || {
            self.request(Method::GET, &url)
                .query(&[("query", query)])
                .timeout(GET_TIMEOUT)
        })
        .await
    }

    /// Raw automation rule summary for a cloud site
    pub async fn automation_rule_summary(&self, cloud_id: &str) -> Result<serde_json::Value> {
        let url = format!(
            "{}/automation/public/jira/{}/rest/v1/rule/summary",
            self.automation_base,
            urlencoding::encode(cloud_id)
        );
        debug!(cloud_id = %cloud_id, "Fetching automation rule summary");
        self.read("automation_rule_summary", "Automation rules", || {
            self.request(Method::GET, &url).timeout(SEARCH_TIMEOUT)
        })
        .await
    }

    // ============ Writes ============

    /// Transition an issue to a new status
    pub async fn transition_issue(&self, key: &IssueKey, transition_id: &str) -> Result<()> {
        let url = self.issue_url(key, "/transitions");
        let body = TransitionRequest {
            transition: TransitionId { id: transition_id },
        };

        info!(key = %key, transition_id = %transition_id, "Transitioning Jira issue");

        self.write(
            self.request(Method::POST, &url).json(&body),
            &[StatusCode::NO_CONTENT, StatusCode::OK],
            &format!("Issue {}", key),
        )
        .await?;
        Ok(())
    }

    pub async fn create_issue(&self, issue: &NewIssue) -> Result<CreatedIssue> {
        let url = format!("{}/issue", self.api_base);

        info!(
            project = %issue.project.key,
            issue_type = %issue.issue_type.name,
            "Creating Jira issue"
        );

        let response = self
            .write(
                self.request(Method::POST, &url)
                    .json(&FieldsRequest { fields: issue }),
                &[StatusCode::CREATED],
                &format!("Project {}", issue.project.key),
            )
            .await?;

        let created: CreatedIssue = response.json().await?;
        info!(key = %created.key, id = %created.id, "Created Jira issue");
        Ok(created)
    }

    /// Create several issues with one POST /issue/bulk
    pub async fn bulk_create(&self, issues: &[NewIssue]) -> Result<BulkCreateResponse> {
        if issues.is_empty() {
            return Ok(BulkCreateResponse::default());
        }

        let url = format!("{}/issue/bulk", self.api_base);
        let body = BulkCreateRequest {
            issue_updates: issues
                .iter()
                .map(|fields| FieldsRequest { fields })
                .collect(),
        };

        info!(count = issues.len(), "Bulk creating Jira issues");

        let response = self
            .write(
                self.request(Method::POST, &url).json(&body),
                &[StatusCode::CREATED],
                "Bulk create endpoint",
            )
            .await?;

        let result: BulkCreateResponse = response.json().await?;
        info!(
            created = result.issues.len(),
            errors = result.errors.len(),
            "Bulk create complete"
        );
        Ok(result)
    }

    /// PUT the given fields; an empty update is rejected before sending
    pub async fn update_issue(&self, key: &IssueKey, update: &IssueFieldsUpdate) -> Result<()> {
        if update.is_empty() {
            return Err(JiraOpsError::InvalidInput(
                "No changes specified".to_string(),
            ));
        }

        let url = self.issue_url(key, "");
        info!(key = %key, "Updating Jira issue");

        self.write(
            self.request(Method::PUT, &url)
                .json(&FieldsRequest { fields: update }),
            &[StatusCode::NO_CONTENT, StatusCode::OK],
            &format!("Issue {}", key),
        )
        .await?;
        Ok(())
    }

    pub async fn assign_issue(&self, key: &IssueKey, account_id: &str) -> Result<()> {
        self.update_issue(key, &IssueFieldsUpdate::default().assignee(account_id))
            .await
    }

    pub async fn set_labels(&self, key: &IssueKey, labels: &[String]) -> Result<()> {
        self.update_issue(key, &IssueFieldsUpdate::default().labels(labels.to_vec()))
            .await
    }

    /// Permanently delete an issue
    pub async fn delete_issue(&self, key: &IssueKey) -> Result<()> {
        let url = self.issue_url(key, "");
        info!(key = %key, "Deleting Jira issue");

        self.write(
            self.request(Method::DELETE, &url),
            &[StatusCode::NO_CONTENT],
            &format!("Issue {}", key),
        )
        .await?;

        info!(key = %key, "Deleted Jira issue");
        Ok(())
    }

    /// Add a comment to an issue
    pub async fn add_comment(&self, key: &IssueKey, body: AdfDocument) -> Result<JiraComment> {
        let url = self.issue_url(key, "/comment");
        info!(key = %key, "Adding comment to Jira issue");

        let response = self
            .write(
                self.request(Method::POST, &url)
                    .json(&CommentRequest { body }),
                &[StatusCode::CREATED],
                &format!("Issue {}", key),
            )
            .await?;

        Ok(response.json().await?)
    }
}

#[async_trait]
impl IssueApi for JiraClient {
    async fn get_issue(&self, key: &IssueKey) -> Result<JiraIssue> {
        JiraClient::get_issue(self, key).await
    }

    async fn get_transitions(&self, key: &IssueKey) -> Result<Vec<JiraTransition>> {
        JiraClient::get_transitions(self, key).await
    }

    async fn transition_issue(&self, key: &IssueKey, transition_id: &str) -> Result<()> {
        JiraClient::transition_issue(self, key, transition_id).await
    }

    async fn assign_issue(&self, key: &IssueKey, account_id: &str) -> Result<()> {
        JiraClient::assign_issue(self, key, account_id).await
    }

    async fn set_labels(&self, key: &IssueKey, labels: &[String]) -> Result<()> {
        JiraClient::set_labels(self, key, labels).await
    }

    async fn add_comment(&self, key: &IssueKey, body: AdfDocument) -> Result<JiraComment> {
        JiraClient::add_comment(self, key, body).await
    }
}
