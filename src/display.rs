//! Plain-text rendering of Jira data for the CLI
//!
//! Everything here returns a `String`; handlers decide where it goes and
//! add colors around it.

use crate::integrations::{
    BulkCreateResponse, JiraIssue, JiraProject, JiraSearchResponse, JiraTransition, JiraUser,
    JiraWorklog, ServerInfo,
};
use crate::JiraOpsError;
use std::fmt::Write;

/// Error bodies longer than this are cut when they are not JSON
pub const MAX_ERROR_BODY: usize = 500;

/// Display name, or `fallback` when the user is missing
pub fn user_name<'a>(user: Option<&'a JiraUser>, fallback: &'a str) -> &'a str {
    match user {
        Some(u) if !u.display_name.is_empty() => &u.display_name,
        _ => fallback,
    }
}

/// Full detail view of an issue
pub fn issue_details(issue: &JiraIssue, browse_url: &str) -> String {
    let f = &issue.fields;
    let mut out = String::new();

    let _ = writeln!(out, "{}: {}", issue.key, f.summary);
    let _ = writeln!(out, "Status: {}", f.status.name);
    if let Some(project) = &f.project {
        let _ = writeln!(out, "Project: {} ({})", project.name, project.key);
    }
    let _ = writeln!(out, "Issue Type: {}", f.issue_type.name);
    let _ = writeln!(
        out,
        "Priority: {}",
        f.priority.as_ref().map(|p| p.name.as_str()).unwrap_or("None")
    );
    let _ = writeln!(out, "Assignee: {}", user_name(f.assignee.as_ref(), "Unassigned"));
    let _ = writeln!(out, "Reporter: {}", user_name(f.reporter.as_ref(), "Unknown"));
    let _ = writeln!(out, "Creator: {}", user_name(f.creator.as_ref(), "Unknown"));
    if let Some(created) = &f.created {
        let _ = writeln!(out, "Created: {}", created);
    }
    if !f.labels.is_empty() {
        let _ = writeln!(out, "Labels: {}", f.labels.join(", "));
    }

    out.push_str("\nDescription:\n");
    let description = f
        .description
        .as_ref()
        .map(|d| d.plain_text())
        .filter(|text| !text.is_empty());
    match description {
        Some(text) => {
            for line in text.lines() {
                let _ = writeln!(out, "  {}", line);
            }
        }
        None => out.push_str("  (No description)\n"),
    }

    let _ = write!(out, "\nURL: {}", browse_url);
    out
}

/// `Found N issue(s), showing M:`, or the empty-result notice
pub fn search_heading(results: &JiraSearchResponse) -> String {
    if results.issues.is_empty() {
        return "No issues found.".to_string();
    }
    format!(
        "Found {} issue(s), showing {}:",
        results.total.max(results.issues.len() as u32),
        results.issues.len()
    )
}

/// Numbered transition list, 1-based to match prompts
pub fn transitions_list(transitions: &[JiraTransition]) -> String {
    if transitions.is_empty() {
        return "No transitions available.".to_string();
    }
    transitions
        .iter()
        .enumerate()
        .map(|(i, t)| format!("  {}. {} -> {} (id: {})", i + 1, t.name, t.to.name, t.id))
        .collect::<Vec<_>>()
        .join("\n")
}

/// `- <time> logged by <author> on <created>` per worklog
pub fn worklog_lines(worklogs: &[JiraWorklog]) -> String {
    worklogs
        .iter()
        .map(|wl| {
            let mut line = format!(
                "- {} logged by {} on {}",
                wl.time_spent.as_deref().unwrap_or("?"),
                user_name(wl.author.as_ref(), "Unknown"),
                wl.created.as_deref().unwrap_or("unknown date")
            );
            if let Some(comment) = wl.comment.as_ref().map(|c| c.plain_text()) {
                if !comment.is_empty() {
                    let _ = write!(line, "\n  Comment: {}", comment.replace('\n', " "));
                }
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn user_lines(users: &[JiraUser]) -> String {
    users
        .iter()
        .map(|u| {
            format!(
                "- {} ({})\n  Account ID: {}\n  Active: {}\n{}",
                u.display_name,
                u.email.as_deref().unwrap_or("Hidden Email"),
                u.account_id.as_deref().unwrap_or("-"),
                u.active,
                "-".repeat(30)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn project_details(project: &JiraProject) -> String {
    let mut out = format!("Project: {} ({})\n", project.name, project.key);
    let _ = writeln!(out, "ID: {}", project.id);
    let _ = writeln!(out, "Lead: {}", user_name(project.lead.as_ref(), "Unknown"));
    let _ = writeln!(
        out,
        "Type: {}",
        project.project_type_key.as_deref().unwrap_or("unknown")
    );
    let _ = writeln!(
        out,
        "Category: {}",
        project
            .project_category
            .as_ref()
            .map(|c| c.name.as_str())
            .unwrap_or("None")
    );
    if let Some(description) = project.description.as_deref().filter(|d| !d.is_empty()) {
        let _ = writeln!(out, "Description: {}", description);
    }
    let types: Vec<&str> = project.issue_types.iter().map(|t| t.name.as_str()).collect();
    let _ = write!(
        out,
        "Issue Types: {}",
        if types.is_empty() {
            "(none)".to_string()
        } else {
            types.join(", ")
        }
    );
    out
}

/// Numbered `KEY - Name` list
pub fn project_list(projects: &[JiraProject]) -> String {
    projects
        .iter()
        .enumerate()
        .map(|(i, p)| format!("  {}. {} - {}", i + 1, p.key, p.name))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn server_info(info: &ServerInfo) -> String {
    let field = |v: Option<&str>| v.unwrap_or("unknown").to_string();
    let mut out = String::new();
    if let Some(title) = &info.server_title {
        let _ = writeln!(out, "Server Title: {}", title);
    }
    let _ = writeln!(out, "Server Version: {}", field(info.version.as_deref()));
    let _ = writeln!(
        out,
        "Build Number: {}",
        info.build_number
            .map(|n| n.to_string())
            .unwrap_or_else(|| "unknown".to_string())
    );
    let _ = writeln!(out, "Base URL: {}", field(info.base_url.as_deref()));
    let _ = write!(out, "Deployment Type: {}", field(info.deployment_type.as_deref()));
    out
}

/// Created keys then one line per failed element
pub fn bulk_result(result: &BulkCreateResponse) -> String {
    let mut out = format!("Created {} issue(s).", result.issues.len());
    for issue in &result.issues {
        let _ = write!(out, "\n  - Created: {}", issue.key);
    }
    if !result.errors.is_empty() {
        let _ = write!(out, "\nEncountered {} error(s).", result.errors.len());
        for error in &result.errors {
            let element = error
                .failed_element_number
                .map(|n| format!("#{}", n + 1))
                .unwrap_or_else(|| "?".to_string());
            let _ = write!(out, "\n  - Issue {}: {}", element, error.element_errors.summary());
        }
    }
    out
}

/// How an error is shown to the user; API bodies are pretty-printed or cut
pub fn error_report(error: &JiraOpsError) -> String {
    match error {
        JiraOpsError::Api { status, body } => {
            format!("Jira API error: HTTP {}\n{}", status, format_api_error(body))
        }
        other => other.to_string(),
    }
}

/// Pretty-print a JSON error body, or cut a non-JSON one
pub fn format_api_error(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Ok(pretty) = serde_json::to_string_pretty(&value) {
            return pretty;
        }
    }

    preview(body, MAX_ERROR_BODY)
}

/// First `max` characters of `text`, with an ellipsis when cut
pub fn preview(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn issue() -> JiraIssue {
        serde_json::from_value(json!({
            "id": "10001",
            "key": "KAN-7",
            "fields": {
                "summary": "Login fails",
                "issuetype": {"name": "Bug"},
                "status": {"name": "To Do"},
                "priority": {"name": "High"},
                "reporter": {"displayName": "Rae Porter"},
                "project": {"key": "KAN", "name": "Kanban"},
                "description": {"type": "doc", "version": 1, "content": [
                    {"type": "paragraph", "content": [{"type": "text", "text": "Steps"}]}
                ]}
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_issue_details() {
        let text = issue_details(&issue(), "https://x/browse/KAN-7");
        assert!(text.starts_with("KAN-7: Login fails\n"));
        assert!(text.contains("Project: Kanban (KAN)"));
        assert!(text.contains("Assignee: Unassigned"));
        assert!(text.contains("Reporter: Rae Porter"));
        assert!(text.contains("Creator: Unknown"));
        assert!(text.contains("\nDescription:\n  Steps\n"));
        assert!(text.ends_with("URL: https://x/browse/KAN-7"));
    }

    #[test]
    fn test_issue_without_description() {
        let mut issue = issue();
        issue.fields.description = None;
        assert!(issue_details(&issue, "u").contains("(No description)"));
    }

    #[test]
    fn test_search_heading() {
        let results = JiraSearchResponse {
            total: 12,
            start_at: 0,
            max_results: 10,
            issues: vec![issue()],
        };
        assert_eq!(search_heading(&results), "Found 12 issue(s), showing 1:");

        let empty = JiraSearchResponse {
            total: 0,
            start_at: 0,
            max_results: 10,
            issues: vec![],
        };
        assert_eq!(search_heading(&empty), "No issues found.");
    }

    #[test]
    fn test_worklog_lines() {
        let worklogs: Vec<JiraWorklog> = serde_json::from_value(json!([
            {"id": "1", "timeSpent": "2h", "author": {"displayName": "Ann"},
             "created": "2024-03-01T10:00:00.000+0000"},
            {"id": "2", "timeSpent": "30m", "author": {"displayName": "Bo"},
             "created": "2024-03-02T10:00:00.000+0000",
             "comment": {"type": "doc", "version": 1, "content": [
                 {"type": "paragraph", "content": [{"type": "text", "text": "pairing"}]}
             ]}}
        ]))
        .unwrap();
        let text = worklog_lines(&worklogs);
        assert!(text.starts_with("- 2h logged by Ann on 2024-03-01T10:00:00.000+0000"));
        assert!(text.ends_with("  Comment: pairing"));
    }

    #[test]
    fn test_transitions_list() {
        let transitions: Vec<JiraTransition> = serde_json::from_value(json!([
            {"id": "21", "name": "Start", "to": {"name": "In Progress"}}
        ]))
        .unwrap();
        assert_eq!(
            transitions_list(&transitions),
            "  1. Start -> In Progress (id: 21)"
        );
        assert_eq!(transitions_list(&[]), "No transitions available.");
    }

    #[test]
    fn test_user_lines_hide_missing_email() {
        let users: Vec<JiraUser> = serde_json::from_value(json!([
            {"displayName": "Ann", "accountId": "a-1"}
        ]))
        .unwrap();
        let text = user_lines(&users);
        assert!(text.starts_with("- Ann (Hidden Email)\n  Account ID: a-1\n  Active: true"));
    }

    #[test]
    fn test_bulk_result() {
        let result: BulkCreateResponse = serde_json::from_value(json!({
            "issues": [{"id": "1", "key": "KAN-1"}],
            "errors": [{"status": 400, "failedElementNumber": 1,
                        "elementErrors": {"errors": {"summary": "too long"}}}]
        }))
        .unwrap();
        let text = bulk_result(&result);
        assert!(text.contains("Created 1 issue(s).\n  - Created: KAN-1"));
        assert!(text.contains("Encountered 1 error(s).\n  - Issue #2: summary: too long"));
    }

    #[test]
    fn test_format_api_error() {
        assert_eq!(
            format_api_error(r#"{"errorMessages":["nope"]}"#),
            "{\n  \"errorMessages\": [\n    \"nope\"\n  ]\n}"
        );
        let long = "x".repeat(600);
        let cut = format_api_error(&long);
        assert_eq!(cut.len(), MAX_ERROR_BODY + 3);
        assert_eq!(format_api_error("Bad Gateway"), "Bad Gateway");
    }

    #[test]
    fn test_error_report_formats_api_bodies() {
        let json_body = JiraOpsError::Api {
            status: 400,
            body: r#"{"errors":{"summary":"required"}}"#.to_string(),
        };
        assert_eq!(
            error_report(&json_body),
            "Jira API error: HTTP 400\n{\n  \"errors\": {\n    \"summary\": \"required\"\n  }\n}"
        );

        let html = JiraOpsError::Api {
            status: 502,
            body: "<html>".repeat(200),
        };
        let report = error_report(&html);
        assert!(report.starts_with("Jira API error: HTTP 502\n<html>"));
        assert!(report.ends_with("..."));
        assert_eq!(report.lines().nth(1).unwrap().chars().count(), MAX_ERROR_BODY + 3);

        let missing = JiraOpsError::NotFound("Issue KAN-9".to_string());
        assert_eq!(error_report(&missing), "Issue KAN-9 not found");
    }

    #[test]
    fn test_preview() {
        assert_eq!(preview("short", 10), "short");
        assert_eq!(preview("abcdef", 3), "abc...");
    }
}
