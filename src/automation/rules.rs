use super::messages::{now_timestamp, priority_alert_comment, status_change_comment};
use super::RuleOutcome;
use crate::integrations::{AdfDocument, IssueApi, IssueKey, JiraTransition, JiraUser};
use crate::Result;
use tracing::{info, warn};

/// Statuses that mean work has already started or finished
const STARTED_STATUSES: [&str; 3] = ["in progress", "done", "closed"];

/// Priorities that trigger an alert comment
const ALERT_PRIORITIES: [&str; 4] = ["high", "highest", "critical", "blocker"];

/// Alert priorities that get the red marker
const CRITICAL_PRIORITIES: [&str; 3] = ["critical", "blocker", "highest"];

/// Label added for an issue type, matched case-insensitively
pub fn label_for_issue_type(issue_type: &str) -> Option<&'static str> {
    match issue_type.to_lowercase().as_str() {
        "bug" => Some("bug"),
        "story" => Some("feature"),
        "task" => Some("task"),
        "epic" => Some("epic"),
        "sub-task" => Some("subtask"),
        "improvement" => Some("enhancement"),
        _ => None,
    }
}

/// First transition that starts work: name contains "progress" or is "start"
pub fn find_start_transition(transitions: &[JiraTransition]) -> Option<&JiraTransition> {
    transitions.iter().find(|t| {
        let name = t.name.to_lowercase();
        name.contains("progress") || name == "start"
    })
}

pub fn is_alert_priority(priority: &str) -> bool {
    ALERT_PRIORITIES.contains(&priority.trim().to_lowercase().as_str())
}

pub fn is_critical_priority(priority: &str) -> bool {
    CRITICAL_PRIORITIES.contains(&priority.trim().to_lowercase().as_str())
}

fn display_name(user: Option<&JiraUser>) -> &str {
    match user {
        Some(u) if !u.display_name.is_empty() => &u.display_name,
        Some(_) => "Unknown",
        None => "Unassigned",
    }
}

/// Rule 1: assign the issue to whoever reported it
pub async fn auto_assign_to_reporter(api: &dyn IssueApi, key: &IssueKey) -> Result<RuleOutcome> {
    let issue = api.get_issue(key).await?;

    let reporter = issue.fields.reporter.as_ref();
    let Some(account_id) = reporter.and_then(|r| r.account_id.as_deref()) else {
        warn!(key = %key, "Issue has no reporter to assign");
        return Ok(RuleOutcome::Skipped(format!(
            "Could not find reporter for {}",
            key
        )));
    };

    api.assign_issue(key, account_id).await?;

    let name = reporter.map(|r| r.display_name.as_str()).unwrap_or_default();
    info!(key = %key, reporter = %name, "Assigned issue to reporter");
    Ok(RuleOutcome::Applied(format!(
        "Assigned {} to reporter: {}",
        key,
        if name.is_empty() { "Unknown" } else { name }
    )))
}

/// Rule 2: move an assigned, not-yet-started issue to "In Progress"
pub async fn auto_transition_on_assignment(
    api: &dyn IssueApi,
    key: &IssueKey,
) -> Result<RuleOutcome> {
    let issue = api.get_issue(key).await?;

    if issue.fields.assignee.is_none() {
        warn!(key = %key, "Issue is not assigned");
        return Ok(RuleOutcome::Skipped(format!("{} is not assigned", key)));
    }

    let status = &issue.fields.status.name;
    if STARTED_STATUSES.contains(&status.to_lowercase().as_str()) {
        return Ok(RuleOutcome::NoChange(format!(
            "{} is already in status: {}",
            key, status
        )));
    }

    let transitions = api.get_transitions(key).await?;
    let Some(transition) = find_start_transition(&transitions) else {
        let available: Vec<&str> = transitions.iter().map(|t| t.name.as_str()).collect();
        warn!(key = %key, ?available, "No 'In Progress' transition found");
        return Ok(RuleOutcome::Skipped(format!(
            "No 'In Progress' transition for {}. Available: {}",
            key,
            if available.is_empty() {
                "none".to_string()
            } else {
                available.join(", ")
            }
        )));
    };

    api.transition_issue(key, &transition.id).await?;

    info!(key = %key, from = %status, to = %transition.to.name, "Transitioned issue");
    Ok(RuleOutcome::Applied(format!(
        "Transitioned {} from '{}' to '{}'",
        key, status, transition.to.name
    )))
}

/// Rule 3: comment on the issue about a status change
pub async fn notify_on_status_change(
    api: &dyn IssueApi,
    key: &IssueKey,
    old_status: &str,
    new_status: &str,
) -> Result<RuleOutcome> {
    let issue = api.get_issue(key).await?;
    let assignee = display_name(issue.fields.assignee.as_ref());

    let text = status_change_comment(old_status, new_status, assignee, &now_timestamp());
    api.add_comment(key, AdfDocument::paragraph(text)).await?;

    info!(key = %key, old = %old_status, new = %new_status, "Posted status change notification");
    Ok(RuleOutcome::Applied(format!(
        "Added status change notification to {}",
        key
    )))
}

/// Rule 4: add a label derived from the issue type
pub async fn auto_label_by_issue_type(api: &dyn IssueApi, key: &IssueKey) -> Result<RuleOutcome> {
    let issue = api.get_issue(key).await?;
    let issue_type = &issue.fields.issue_type.name;

    let Some(label) = label_for_issue_type(issue_type) else {
        return Ok(RuleOutcome::NoChange(format!(
            "No label mapping for issue type: {}",
            issue_type
        )));
    };

    if issue.fields.labels.iter().any(|l| l == label) {
        return Ok(RuleOutcome::NoChange(format!(
            "{} already has label '{}'",
            key, label
        )));
    }

    let mut labels = issue.fields.labels.clone();
    labels.push(label.to_string());
    api.set_labels(key, &labels).await?;

    info!(key = %key, label, "Added issue type label");
    Ok(RuleOutcome::Applied(format!(
        "Added label '{}' to {} (type: {})",
        label, key, issue_type
    )))
}

/// Rule 5: alert comment when priority is raised to High or above
pub async fn auto_comment_on_priority_change(
    api: &dyn IssueApi,
    key: &IssueKey,
    old_priority: &str,
    new_priority: &str,
) -> Result<RuleOutcome> {
    if !is_alert_priority(new_priority) {
        return Ok(RuleOutcome::NoChange(format!(
            "Priority '{}' does not require an alert",
            new_priority
        )));
    }

    let issue = api.get_issue(key).await?;
    let assignee = display_name(issue.fields.assignee.as_ref());
    let summary = if issue.fields.summary.is_empty() {
        "No summary"
    } else {
        issue.fields.summary.as_str()
    };
    let icon = if is_critical_priority(new_priority) {
        "🔴"
    } else {
        "🟠"
    };

    let text = priority_alert_comment(
        icon,
        old_priority,
        new_priority,
        assignee,
        summary,
        &now_timestamp(),
    );
    api.add_comment(key, AdfDocument::paragraph(text)).await?;

    info!(key = %key, old = %old_priority, new = %new_priority, "Posted priority alert");
    Ok(RuleOutcome::Applied(format!(
        "Added priority alert to {}",
        key
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integrations::{JiraComment, JiraIssue};
    use crate::JiraOpsError;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        GetIssue,
        GetTransitions,
        Transition(String),
        Assign(String),
        SetLabels(Vec<String>),
        Comment(String),
    }

    struct FakeApi {
        issue: serde_json::Value,
        transitions: serde_json::Value,
        calls: Mutex<Vec<Call>>,
    }

    impl FakeApi {
        fn new(fields: serde_json::Value) -> Self {
            let mut base = json!({
                "summary": "Checkout broken",
                "issuetype": {"name": "Bug"},
                "status": {"name": "To Do"},
                "labels": []
            });
            if let (Some(base), Some(extra)) = (base.as_object_mut(), fields.as_object()) {
                for (k, v) in extra {
                    base.insert(k.clone(), v.clone());
                }
            }
            Self {
                issue: json!({"id": "10001", "key": "KAN-1", "fields": base}),
                transitions: json!([]),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn with_transitions(mut self, transitions: serde_json::Value) -> Self {
            self.transitions = transitions;
            self
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: Call) {
            self.calls.lock().unwrap().push(call);
        }
    }

    #[async_trait]
    impl IssueApi for FakeApi {
        async fn get_issue(&self, _key: &IssueKey) -> Result<JiraIssue> {
            self.record(Call::GetIssue);
            Ok(serde_json::from_value(self.issue.clone())?)
        }

        async fn get_transitions(&self, _key: &IssueKey) -> Result<Vec<JiraTransition>> {
            self.record(Call::GetTransitions);
            Ok(serde_json::from_value(self.transitions.clone())?)
        }

        async fn transition_issue(&self, _key: &IssueKey, transition_id: &str) -> Result<()> {
            self.record(Call::Transition(transition_id.to_string()));
            Ok(())
        }

        async fn assign_issue(&self, _key: &IssueKey, account_id: &str) -> Result<()> {
            self.record(Call::Assign(account_id.to_string()));
            Ok(())
        }

        async fn set_labels(&self, _key: &IssueKey, labels: &[String]) -> Result<()> {
            self.record(Call::SetLabels(labels.to_vec()));
            Ok(())
        }

        async fn add_comment(&self, _key: &IssueKey, body: AdfDocument) -> Result<JiraComment> {
            self.record(Call::Comment(body.plain_text()));
            Ok(JiraComment {
                id: "1".into(),
                body: Some(body),
                author: None,
                created: None,
                updated: None,
            })
        }
    }

    struct FailingApi;

    #[async_trait]
    impl IssueApi for FailingApi {
        async fn get_issue(&self, key: &IssueKey) -> Result<JiraIssue> {
            Err(JiraOpsError::NotFound(format!("issue {}", key)))
        }
        async fn get_transitions(&self, _key: &IssueKey) -> Result<Vec<JiraTransition>> {
            unreachable!()
        }
        async fn transition_issue(&self, _key: &IssueKey, _id: &str) -> Result<()> {
            unreachable!()
        }
        async fn assign_issue(&self, _key: &IssueKey, _id: &str) -> Result<()> {
            unreachable!()
        }
        async fn set_labels(&self, _key: &IssueKey, _labels: &[String]) -> Result<()> {
            unreachable!()
        }
        async fn add_comment(&self, _key: &IssueKey, _body: AdfDocument) -> Result<JiraComment> {
            unreachable!()
        }
    }

    fn key() -> IssueKey {
        IssueKey::parse("KAN-1").unwrap()
    }

    fn transition(id: &str, name: &str, to: &str) -> serde_json::Value {
        json!({"id": id, "name": name, "to": {"name": to}})
    }

    #[test]
    fn test_label_mapping() {
        assert_eq!(label_for_issue_type("Story"), Some("feature"));
        assert_eq!(label_for_issue_type("SUB-TASK"), Some("subtask"));
        assert_eq!(label_for_issue_type("Improvement"), Some("enhancement"));
        assert_eq!(label_for_issue_type("Spike"), None);
    }

    #[test]
    fn test_priority_classification() {
        assert!(is_alert_priority("High"));
        assert!(is_alert_priority(" blocker "));
        assert!(!is_alert_priority("Medium"));
        assert!(is_critical_priority("Highest"));
        assert!(!is_critical_priority("High"));
    }

    #[test]
    fn test_find_start_transition() {
        let transitions: Vec<JiraTransition> = serde_json::from_value(json!([
            transition("11", "To Do", "To Do"),
            transition("21", "Start", "In Progress"),
            transition("31", "Move to In Progress", "In Progress"),
        ]))
        .unwrap();
        assert_eq!(find_start_transition(&transitions).unwrap().id, "21");
        assert!(find_start_transition(&transitions[..1]).is_none());
    }

    #[tokio::test]
    async fn test_assign_to_reporter() {
        let api = FakeApi::new(json!({
            "reporter": {"accountId": "acc-9", "displayName": "Rae"}
        }));
        let outcome = auto_assign_to_reporter(&api, &key()).await.unwrap();
        assert!(matches!(outcome, RuleOutcome::Applied(_)));
        assert!(outcome.message().contains("Rae"));
        assert_eq!(api.calls(), vec![Call::GetIssue, Call::Assign("acc-9".into())]);
    }

    #[tokio::test]
    async fn test_assign_without_reporter_is_skipped() {
        let api = FakeApi::new(json!({"reporter": null}));
        let outcome = auto_assign_to_reporter(&api, &key()).await.unwrap();
        assert!(!outcome.is_success());
        assert_eq!(api.calls(), vec![Call::GetIssue]);
    }

    #[tokio::test]
    async fn test_transition_requires_assignee() {
        let api = FakeApi::new(json!({}));
        let outcome = auto_transition_on_assignment(&api, &key()).await.unwrap();
        assert!(matches!(outcome, RuleOutcome::Skipped(_)));
        assert_eq!(api.calls(), vec![Call::GetIssue]);
    }

    #[tokio::test]
    async fn test_transition_skips_started_issue() {
        let api = FakeApi::new(json!({
            "assignee": {"displayName": "Ann", "accountId": "a1"},
            "status": {"name": "In Progress"}
        }));
        let outcome = auto_transition_on_assignment(&api, &key()).await.unwrap();
        assert!(matches!(outcome, RuleOutcome::NoChange(_)));
        assert!(outcome.is_success());
        assert_eq!(api.calls(), vec![Call::GetIssue]);
    }

    #[tokio::test]
    async fn test_transition_applies_first_start_transition() {
        let api = FakeApi::new(json!({
            "assignee": {"displayName": "Ann", "accountId": "a1"}
        }))
        .with_transitions(json!([
            transition("11", "Done", "Done"),
            transition("21", "In Progress", "In Progress"),
        ]));
        let outcome = auto_transition_on_assignment(&api, &key()).await.unwrap();
        assert!(matches!(outcome, RuleOutcome::Applied(_)));
        assert_eq!(
            api.calls(),
            vec![Call::GetIssue, Call::GetTransitions, Call::Transition("21".into())]
        );
    }

    #[tokio::test]
    async fn test_transition_lists_available_when_missing() {
        let api = FakeApi::new(json!({
            "assignee": {"displayName": "Ann", "accountId": "a1"}
        }))
        .with_transitions(json!([transition("31", "Close", "Closed")]));
        let outcome = auto_transition_on_assignment(&api, &key()).await.unwrap();
        assert!(matches!(outcome, RuleOutcome::Skipped(_)));
        assert!(outcome.message().contains("Available: Close"));
    }

    #[tokio::test]
    async fn test_status_notification_comment() {
        let api = FakeApi::new(json!({}));
        let outcome = notify_on_status_change(&api, &key(), "To Do", "Done")
            .await
            .unwrap();
        assert!(outcome.is_success());

        let calls = api.calls();
        let Call::Comment(text) = &calls[1] else {
            panic!("expected a comment, got {:?}", calls);
        };
        assert!(text.contains("changed from 'To Do' to 'Done'"));
        assert!(text.contains("Assignee: Unassigned"));
        assert!(text.contains("Timestamp: "));
    }

    #[tokio::test]
    async fn test_label_appends_to_existing() {
        let api = FakeApi::new(json!({
            "issuetype": {"name": "Story"},
            "labels": ["ui"]
        }));
        let outcome = auto_label_by_issue_type(&api, &key()).await.unwrap();
        assert!(matches!(outcome, RuleOutcome::Applied(_)));
        assert_eq!(
            api.calls()[1],
            Call::SetLabels(vec!["ui".into(), "feature".into()])
        );
    }

    #[tokio::test]
    async fn test_label_no_change_cases() {
        let api = FakeApi::new(json!({"labels": ["bug"]}));
        let outcome = auto_label_by_issue_type(&api, &key()).await.unwrap();
        assert!(matches!(outcome, RuleOutcome::NoChange(_)));

        let api = FakeApi::new(json!({"issuetype": {"name": "Spike"}}));
        let outcome = auto_label_by_issue_type(&api, &key()).await.unwrap();
        assert!(matches!(outcome, RuleOutcome::NoChange(_)));
        assert_eq!(api.calls(), vec![Call::GetIssue]);
    }

    #[tokio::test]
    async fn test_priority_below_threshold_makes_no_calls() {
        let api = FakeApi::new(json!({}));
        let outcome = auto_comment_on_priority_change(&api, &key(), "Low", "Medium")
            .await
            .unwrap();
        assert!(matches!(outcome, RuleOutcome::NoChange(_)));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_priority_alert_markers() {
        let api = FakeApi::new(json!({"assignee": {"displayName": "Ann"}}));
        auto_comment_on_priority_change(&api, &key(), "Low", "Blocker")
            .await
            .unwrap();
        let api_high = FakeApi::new(json!({}));
        auto_comment_on_priority_change(&api_high, &key(), "Low", "High")
            .await
            .unwrap();

        let calls = api.calls();
        let Call::Comment(critical) = &calls[1] else {
            panic!("expected a comment, got {:?}", calls);
        };
        let high_calls = api_high.calls();
        let Call::Comment(high) = &high_calls[1] else {
            panic!("expected a comment, got {:?}", high_calls);
        };
        assert!(critical.starts_with("🔴"));
        assert!(critical.contains("Assignee: Ann"));
        assert!(critical.contains("Summary: Checkout broken"));
        assert!(high.starts_with("🟠"));
    }

    #[tokio::test]
    async fn test_fetch_errors_propagate() {
        let err = auto_label_by_issue_type(&FailingApi, &key()).await.unwrap_err();
        assert!(matches!(err, JiraOpsError::NotFound(_)));
    }
}
