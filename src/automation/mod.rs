//! Automation rules
//!
//! Five trigger/condition/action rules run on demand against a single issue.
//! Each rule fetches the issue, checks one condition, and makes at most one
//! follow-up call. Rules are written against [`IssueApi`] so they can run
//! against any client.
//!
//! | # | Rule | Condition | Action |
//! |---|------|-----------|--------|
//! | 1 | Auto-assign to reporter | issue has a reporter | assign to reporter |
//! | 2 | Auto-transition on assignment | assigned, not started | move to "In Progress" |
//! | 3 | Notify on status change | always | add status comment |
//! | 4 | Auto-label by issue type | type mapped, label missing | add label |
//! | 5 | Alert on priority change | new priority is high | add alert comment |

mod messages;
mod rules;

pub use messages::{
    now_timestamp, priority_alert_comment, status_change_comment, TIMESTAMP_FORMAT,
};
pub use rules::{
    auto_assign_to_reporter, auto_comment_on_priority_change, auto_label_by_issue_type,
    auto_transition_on_assignment, find_start_transition, is_alert_priority,
    is_critical_priority, label_for_issue_type, notify_on_status_change,
};

use crate::integrations::{IssueApi, IssueKey};
use crate::Result;

/// Placeholder for old/new values the user left blank
pub const UNKNOWN: &str = "Unknown";

/// What a rule did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleOutcome {
    /// The follow-up call was made
    Applied(String),
    /// Condition already satisfied; nothing to do
    NoChange(String),
    /// Condition could not be evaluated or acted on
    Skipped(String),
}

impl RuleOutcome {
    /// Applied and NoChange count as success
    pub fn is_success(&self) -> bool {
        !matches!(self, RuleOutcome::Skipped(_))
    }

    pub fn message(&self) -> &str {
        match self {
            RuleOutcome::Applied(m) | RuleOutcome::NoChange(m) | RuleOutcome::Skipped(m) => m,
        }
    }
}

/// The five rules, for menus and help text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    AssignToReporter,
    TransitionOnAssignment,
    NotifyStatusChange,
    LabelByIssueType,
    PriorityAlert,
}

impl Rule {
    pub const ALL: [Rule; 5] = [
        Rule::AssignToReporter,
        Rule::TransitionOnAssignment,
        Rule::NotifyStatusChange,
        Rule::LabelByIssueType,
        Rule::PriorityAlert,
    ];

    pub fn number(&self) -> u8 {
        match self {
            Rule::AssignToReporter => 1,
            Rule::TransitionOnAssignment => 2,
            Rule::NotifyStatusChange => 3,
            Rule::LabelByIssueType => 4,
            Rule::PriorityAlert => 5,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Rule::AssignToReporter => "Auto-assign to Reporter",
            Rule::TransitionOnAssignment => "Auto-transition on Assignment",
            Rule::NotifyStatusChange => "Notify on Status Change",
            Rule::LabelByIssueType => "Auto-label by Issue Type",
            Rule::PriorityAlert => "Alert on Priority Change",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Rule::AssignToReporter => "🤖",
            Rule::TransitionOnAssignment => "⚡",
            Rule::NotifyStatusChange => "📢",
            Rule::LabelByIssueType => "🏷️",
            Rule::PriorityAlert => "⚠️",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Rule::AssignToReporter => "Assigns the issue to the person who created it",
            Rule::TransitionOnAssignment => "Moves an assigned issue to 'In Progress'",
            Rule::NotifyStatusChange => "Adds a notification comment for a status change",
            Rule::LabelByIssueType => "Adds a label matching the issue type",
            Rule::PriorityAlert => "Adds an alert comment when priority becomes High/Critical",
        }
    }

    /// Rules 3 and 5 need the old and new values from the caller
    pub fn needs_change_values(&self) -> bool {
        matches!(self, Rule::NotifyStatusChange | Rule::PriorityAlert)
    }
}

/// A rule plus the inputs it needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleRequest {
    AssignToReporter,
    TransitionOnAssignment,
    NotifyStatusChange { old: String, new: String },
    LabelByIssueType,
    PriorityAlert { old: String, new: String },
}

/// Blank values become [`UNKNOWN`]
fn or_unknown(value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        UNKNOWN.to_string()
    } else {
        value.to_string()
    }
}

impl RuleRequest {
    /// Build a request for `rule`; old/new are ignored by rules that don't use them
    pub fn new(rule: Rule, old: &str, new: &str) -> Self {
        match rule {
            Rule::AssignToReporter => RuleRequest::AssignToReporter,
            Rule::TransitionOnAssignment => RuleRequest::TransitionOnAssignment,
            Rule::NotifyStatusChange => RuleRequest::NotifyStatusChange {
                old: or_unknown(old),
                new: or_unknown(new),
            },
            Rule::LabelByIssueType => RuleRequest::LabelByIssueType,
            Rule::PriorityAlert => RuleRequest::PriorityAlert {
                old: or_unknown(old),
                new: or_unknown(new),
            },
        }
    }

    pub fn rule(&self) -> Rule {
        match self {
            RuleRequest::AssignToReporter => Rule::AssignToReporter,
            RuleRequest::TransitionOnAssignment => Rule::TransitionOnAssignment,
            RuleRequest::NotifyStatusChange { .. } => Rule::NotifyStatusChange,
            RuleRequest::LabelByIssueType => Rule::LabelByIssueType,
            RuleRequest::PriorityAlert { .. } => Rule::PriorityAlert,
        }
    }
}

/// Run one rule against one issue
pub async fn run_rule(
    api: &dyn IssueApi,
    key: &IssueKey,
    request: &RuleRequest,
) -> Result<RuleOutcome> {
    tracing::debug!(key = %key, rule = ?request.rule(), "Running automation rule");

    match request {
        RuleRequest::AssignToReporter => auto_assign_to_reporter(api, key).await,
        RuleRequest::TransitionOnAssignment => auto_transition_on_assignment(api, key).await,
        RuleRequest::NotifyStatusChange { old, new } => {
            notify_on_status_change(api, key, old, new).await
        }
        RuleRequest::LabelByIssueType => auto_label_by_issue_type(api, key).await,
        RuleRequest::PriorityAlert { old, new } => {
            auto_comment_on_priority_change(api, key, old, new).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_success() {
        assert!(RuleOutcome::Applied("x".into()).is_success());
        assert!(RuleOutcome::NoChange("x".into()).is_success());
        assert!(!RuleOutcome::Skipped("x".into()).is_success());
        assert_eq!(RuleOutcome::Skipped("why".into()).message(), "why");
    }

    #[test]
    fn test_rules_are_numbered_in_order() {
        let numbers: Vec<u8> = Rule::ALL.iter().map(Rule::number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_request_fills_unknown() {
        let request = RuleRequest::new(Rule::NotifyStatusChange, "  ", "Done");
        assert_eq!(
            request,
            RuleRequest::NotifyStatusChange {
                old: "Unknown".into(),
                new: "Done".into()
            }
        );
        assert_eq!(
            RuleRequest::new(Rule::LabelByIssueType, "a", "b"),
            RuleRequest::LabelByIssueType
        );
        assert!(Rule::PriorityAlert.needs_change_values());
        assert!(!Rule::AssignToReporter.needs_change_values());
    }
}
