use super::Session;
use crate::display;
use crate::integrations::{
    normalize_project_key, BulkCreateError, BulkCreateResponse, ErrorCollection, JiraClient,
    JiraSearchResponse, NewIssue, SEARCH_FIELDS,
};
use crate::style;
use crate::Result;
use tracing::warn;

/// Used when the query is left blank
pub const DEFAULT_JQL: &str = "order by created DESC";

/// Bulk creation accepts this many issues at most
pub const MAX_BULK_COUNT: u32 = 10;

/// Used when the requested bulk count is out of range
pub const FALLBACK_BULK_COUNT: u32 = 2;

pub fn normalize_jql(raw: &str) -> &str {
    let jql = raw.trim();
    if jql.is_empty() {
        DEFAULT_JQL
    } else {
        jql
    }
}

/// Count within 1..=10, or the fallback and `false`
pub fn bulk_count(requested: u32) -> (u32, bool) {
    if (1..=MAX_BULK_COUNT).contains(&requested) {
        (requested, true)
    } else {
        (FALLBACK_BULK_COUNT, false)
    }
}

/// Task issues titled `{prefix} - Bulk Issue #{i}`, numbered from 1
pub fn bulk_issues(project: &str, prefix: &str, count: u32) -> Vec<NewIssue> {
    (1..=count)
        .map(|i| NewIssue::new(project, format!("{} - Bulk Issue #{}", prefix, i), "Task"))
        .collect()
}

/// Run a JQL search and list the hits
pub async fn search(session: &Session, jql: &str, max_results: Option<u32>) -> Result<()> {
    let jql = normalize_jql(jql);
    let max_results = max_results.unwrap_or(session.settings.search.max_results);

    println!("Searching: {}", style::highlight(jql));
    let results = session
        .client
        .search(jql, max_results, SEARCH_FIELDS)
        .await?;

    println!();
    print_results(&results);
    Ok(())
}

/// Hits with status, type and priority colored
pub fn print_results(results: &JiraSearchResponse) {
    println!("{}", display::search_heading(results));
    for issue in &results.issues {
        let f = &issue.fields;
        let priority = f.priority.as_ref().map(|p| p.name.as_str()).unwrap_or("None");
        let assignee = display::user_name(f.assignee.as_ref(), "Unassigned");

        println!();
        println!(
            "{} {} {}",
            style::status_indicator(&f.status.name),
            style::issue_key(&issue.key),
            f.summary
        );
        println!(
            "    {} {} | {}",
            style::type_style(&f.issue_type.name),
            style::priority_style(priority),
            style::status_style(&f.status.name)
        );
        println!("    {}", style::dim(&format!("Assignee: {}", assignee)));
    }
}

/// Create `count` numbered Task issues in one go
pub async fn bulk_create(
    session: &Session,
    project: &str,
    prefix: &str,
    count: u32,
    sequential: bool,
) -> Result<()> {
    let project = normalize_project_key(project)?;
    let (count, valid) = bulk_count(count);
    if !valid {
        warn!(count, "Invalid bulk count, using fallback");
        println!(
            "{} Invalid count. Using {}.",
            style::warning_mark(),
            FALLBACK_BULK_COUNT
        );
    }

    let issues = bulk_issues(&project, prefix.trim(), count);
    println!("Creating {} issues in {}...", count, project);

    let result = if sequential {
        create_one_by_one(&session.client, &issues).await
    } else {
        session.client.bulk_create(&issues).await?
    };

    let mark = if result.errors.is_empty() {
        style::success_mark()
    } else {
        style::warning_mark()
    };
    println!("{} {}", mark, display::bulk_result(&result));
    Ok(())
}

/// One create call per issue; failures are collected, not fatal
pub async fn create_one_by_one(client: &JiraClient, issues: &[NewIssue]) -> BulkCreateResponse {
    let mut result = BulkCreateResponse::default();
    for (index, issue) in issues.iter().enumerate() {
        match client.create_issue(issue).await {
            Ok(created) => result.issues.push(created),
            Err(e) => {
                warn!(index, error = %e, "Sequential create failed");
                result.errors.push(BulkCreateError {
                    status: e.status(),
                    failed_element_number: Some(index),
                    element_errors: ErrorCollection {
                        error_messages: vec![e.to_string()],
                        ..Default::default()
                    },
                });
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_jql_uses_default() {
        assert_eq!(normalize_jql("   "), "order by created DESC");
        assert_eq!(normalize_jql(" project = KAN "), "project = KAN");
    }

    #[test]
    fn test_bulk_count_range() {
        assert_eq!(bulk_count(1), (1, true));
        assert_eq!(bulk_count(10), (10, true));
        assert_eq!(bulk_count(0), (2, false));
        assert_eq!(bulk_count(11), (2, false));
    }

    #[test]
    fn test_bulk_issue_titles() {
        let issues = bulk_issues("KAN", "Sprint prep", 3);
        assert_eq!(issues.len(), 3);
        assert_eq!(issues[0].summary, "Sprint prep - Bulk Issue #1");
        assert_eq!(issues[2].summary, "Sprint prep - Bulk Issue #3");
        assert!(issues.iter().all(|i| i.issue_type.name == "Task"));
        assert!(issues.iter().all(|i| i.project.key == "KAN"));

        let payload = issues[0].to_payload();
        let fields = payload["fields"].as_object().unwrap();
        assert_eq!(fields.len(), 3);
        assert!(fields.contains_key("project"));
        assert!(fields.contains_key("summary"));
        assert!(fields.contains_key("issuetype"));
    }
}
