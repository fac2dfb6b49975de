//! Guided tour of the read endpoints, plus an optional create/delete round

use super::{search, Session};
use crate::display;
use crate::integrations::{normalize_project_key, IssueKey, NewIssue, SEARCH_FIELDS};
use crate::style;
use crate::Result;

/// Results shown by the demo search
const DEMO_SEARCH_LIMIT: u32 = 5;

const DEMO_SUMMARY: &str = "Test issue created by jira-ops demo";

/// Numbered demo steps; failures are printed and counted
#[derive(Default)]
struct Tour {
    calls: usize,
    succeeded: usize,
}

impl Tour {
    fn section(&mut self, title: &str) {
        self.calls += 1;
        println!();
        println!(
            "{}",
            style::banner(&format!("API CALL #{}: {}", self.calls, title))
        );
    }

    fn record<T>(&mut self, result: Result<T>) -> Option<T> {
        match result {
            Ok(value) => {
                self.succeeded += 1;
                Some(value)
            }
            Err(e) => {
                tracing::warn!(step = self.calls, error = %e, "Demo call failed");
                println!("{} {}", style::failure_mark(), display::error_report(&e));
                None
            }
        }
    }
}

async fn show_server_info(session: &Session) -> Result<()> {
    let info = session.client.server_info().await?;
    println!("{}", display::server_info(&info));
    Ok(())
}

async fn show_issue(session: &Session, key: &IssueKey) -> Result<()> {
    let issue = session.client.get_issue(key).await?;
    let url = session.browse_url(&issue.key);
    println!("{}", display::issue_details(&issue, &url));
    Ok(())
}

async fn show_search(session: &Session, jql: &str) -> Result<()> {
    let results = session
        .client
        .search(jql, DEMO_SEARCH_LIMIT, SEARCH_FIELDS)
        .await?;
    search::print_results(&results);
    Ok(())
}

async fn show_project(session: &Session, project: &str) -> Result<()> {
    let project = session.client.get_project(project).await?;
    println!("{}", display::project_details(&project));
    Ok(())
}

async fn show_transitions(session: &Session, key: &IssueKey) -> Result<()> {
    let transitions = session.client.get_transitions(key).await?;
    println!("{}", display::transitions_list(&transitions));
    Ok(())
}

async fn create_test_issue(session: &Session, project: &str) -> Result<IssueKey> {
    let issue = NewIssue::new(project, DEMO_SUMMARY, "Task")
        .with_description("Created by the jira-ops demo and deleted right after.")
        .with_priority("Medium");
    let created = session.client.create_issue(&issue).await?;
    println!("{} Issue created: {}", style::success_mark(), created.key);
    IssueKey::parse(&created.key)
}

async fn delete_test_issue(session: &Session, key: &IssueKey) -> Result<()> {
    session.client.delete_issue(key).await?;
    println!("{} Issue '{}' deleted", style::success_mark(), key);
    Ok(())
}

/// Run each call in turn; a failed call is reported and the tour continues
pub async fn run(
    session: &Session,
    project: Option<&str>,
    issue: Option<&IssueKey>,
    with_writes: bool,
) -> Result<()> {
    let project =
        normalize_project_key(project.unwrap_or(session.settings.default_project.as_str()))?;
    let issue = match issue {
        Some(key) => key.clone(),
        None => IssueKey::parse(&format!("{}-1", project))?,
    };
    let jql = format!("project = {} ORDER BY created DESC", project);
    let mut tour = Tour::default();

    tour.section("Get Server Information");
    tour.record(show_server_info(session).await);

    tour.section(&format!("Get Issue '{}'", issue));
    tour.record(show_issue(session, &issue).await);

    tour.section("Search Issues with JQL");
    println!("Query: {}", jql);
    tour.record(show_search(session, &jql).await);

    tour.section(&format!("Get Project '{}'", project));
    tour.record(show_project(session, &project).await);

    tour.section(&format!("Get Transitions for Issue '{}'", issue));
    tour.record(show_transitions(session, &issue).await);

    if with_writes {
        tour.section(&format!("Create Issue in Project '{}'", project));
        if let Some(created) = tour.record(create_test_issue(session, &project).await) {
            tour.section(&format!("Delete Issue '{}'", created));
            println!("{} This permanently deletes the issue", style::warning_mark());
            tour.record(delete_test_issue(session, &created).await);
        }
    }

    println!();
    println!("{}", style::banner("Demo Complete"));
    println!("{} of {} API calls succeeded", tour.succeeded, tour.calls);
    Ok(())
}
