//! Step-by-step issue creation wizard

use super::Prompter;
use crate::display;
use crate::handlers::{issue, Session};
use crate::integrations::{normalize_project_key, parse_labels, JiraIssueTypeDetails, NewIssue};
use crate::style;
use crate::{JiraOpsError, Result};
use std::fmt::Write;

/// Offered priorities, highest first
pub const PRIORITIES: [&str; 5] = ["Highest", "High", "Medium", "Low", "Lowest"];

/// Used when a project's issue types cannot be fetched
pub const FALLBACK_ISSUE_TYPE: &str = "Task";

const DESCRIPTION_PREVIEW: usize = 100;

/// Summary shown before the final confirmation
pub fn review(issue: &NewIssue) -> String {
    let mut out = String::from("Issue Summary:\n");
    let _ = writeln!(out, "  Project: {}", issue.project.key);
    let _ = writeln!(out, "  Type: {}", issue.issue_type.name);
    let _ = write!(out, "  Summary: {}", issue.summary);
    if let Some(description) = &issue.description {
        let _ = write!(
            out,
            "\n  Description: {}",
            display::preview(&description.plain_text(), DESCRIPTION_PREVIEW)
        );
    }
    if let Some(priority) = &issue.priority {
        let _ = write!(out, "\n  Priority: {}", priority.name);
    }
    if !issue.labels.is_empty() {
        let _ = write!(out, "\n  Labels: {}", issue.labels.join(", "));
    }
    out
}

async fn choose_project(session: &Session, prompter: &Prompter) -> Result<String> {
    println!("Fetching available projects...");
    let projects = match session.client.list_projects().await {
        Ok(projects) => projects,
        Err(e) => {
            tracing::warn!(error = %e, "Could not list projects");
            println!("{} Could not fetch projects: {}", style::warning_mark(), e);
            let key = prompter.with_default("Project key", &session.settings.default_project)?;
            return normalize_project_key(&key);
        }
    };

    if projects.is_empty() {
        return Err(JiraOpsError::Config(
            "No projects found. Please check your credentials.".to_string(),
        ));
    }

    let labels: Vec<String> = projects
        .iter()
        .map(|p| format!("{} - {}", p.key, p.name))
        .collect();
    let index = prompter.select("Project", &labels, 0)?;
    println!(
        "{} Selected: {} ({})",
        style::success_mark(),
        projects[index].name,
        projects[index].key
    );
    Ok(projects[index].key.clone())
}

async fn choose_issue_type(
    session: &Session,
    project: &str,
    prompter: &Prompter,
) -> Result<Option<JiraIssueTypeDetails>> {
    println!("Fetching issue types...");
    let types: Vec<JiraIssueTypeDetails> = match session.client.get_project(project).await {
        Ok(details) => details.standard_issue_types().into_iter().cloned().collect(),
        Err(e) => {
            tracing::warn!(project, error = %e, "Could not fetch issue types");
            Vec::new()
        }
    };

    if types.is_empty() {
        println!(
            "{} Could not fetch issue types. Using default '{}'",
            style::warning_mark(),
            FALLBACK_ISSUE_TYPE
        );
        return Ok(None);
    }

    let names: Vec<&str> = types.iter().map(|t| t.name.as_str()).collect();
    let index = prompter.select("Issue type", &names, 0)?;
    Ok(types.into_iter().nth(index))
}

/// Ask for every field, show a review, and create the issue on confirmation
pub async fn run(session: &Session, prompter: &Prompter) -> Result<()> {
    println!("{}", style::banner("Jira Issue Creator"));
    println!("Connected to: {}", style::path(&session.credentials.url));

    let project = choose_project(session, prompter).await?;
    let issue_type = choose_issue_type(session, &project, prompter).await?;

    let summary = prompter.required("Summary")?;
    let description = prompter.multiline("Description")?;

    let mut priorities = vec!["(none)"];
    priorities.extend(PRIORITIES);
    let priority = match prompter.select("Priority", &priorities, 0)? {
        0 => None,
        i => Some(priorities[i]),
    };

    let labels = prompter
        .optional("Labels (comma-separated)")?
        .map(|raw| parse_labels(&raw))
        .unwrap_or_default();

    let mut new_issue = match &issue_type {
        Some(t) => NewIssue::new(&project, summary, &t.name).with_issue_type_id(&t.id),
        None => NewIssue::new(&project, summary, FALLBACK_ISSUE_TYPE),
    }
    .with_description(&description)
    .with_labels(labels);
    if let Some(priority) = priority {
        new_issue = new_issue.with_priority(priority);
    }

    println!();
    println!("{}", review(&new_issue));

    if prompter.confirm("Show the JSON payload?", false)? {
        println!("{}", issue::payload_json(&new_issue)?);
    }
    if !prompter.confirm("Create this issue?", true)? {
        println!("Issue creation cancelled.");
        return Ok(());
    }

    issue::create(session, &new_issue).await
}
