use super::Session;
use crate::display;
use crate::integrations::{
    AdfDocument, IssueFieldsUpdate, IssueKey, JiraTransition, NewIssue,
};
use crate::interactive::Prompter;
use crate::style;
use crate::{JiraOpsError, Result};

/// Print an issue, optionally opening it in the browser
pub async fn show(session: &Session, key: &IssueKey, open_in_browser: bool) -> Result<()> {
    println!("Fetching details for {}...", style::issue_key(key.as_str()));
    let issue = session.client.get_issue(key).await?;
    let url = session.browse_url(&issue.key);

    println!();
    println!("{}", display::issue_details(&issue, &url));

    if open_in_browser {
        if let Err(e) = open::that(&url) {
            tracing::warn!(url = %url, error = %e, "Could not open browser");
            println!("{} Could not open browser: {}", style::warning_mark(), e);
        }
    }
    Ok(())
}

fn require_summary(issue: &NewIssue) -> Result<()> {
    if issue.summary.trim().is_empty() {
        return Err(JiraOpsError::InvalidInput("Summary is required".to_string()));
    }
    Ok(())
}

/// Request body for `issue`, pretty-printed
pub fn payload_json(issue: &NewIssue) -> Result<String> {
    require_summary(issue)?;
    Ok(serde_json::to_string_pretty(&issue.to_payload())?)
}

/// `--dry-run`: print the payload; needs no session
pub fn preview(issue: &NewIssue) -> Result<()> {
    println!("{}", payload_json(issue)?);
    Ok(())
}

pub async fn create(session: &Session, issue: &NewIssue) -> Result<()> {
    require_summary(issue)?;

    println!("Creating issue...");
    let created = session.client.create_issue(issue).await?;
    let url = session.browse_url(&created.key);

    println!("{} Issue created!", style::success_mark());
    println!("  Key: {}", style::issue_key(&created.key));
    println!("  ID: {}", created.id);
    println!("  URL: {}", style::path(&url));
    Ok(())
}

/// Apply a field update; an empty one only prints a warning
pub async fn update(session: &Session, key: &IssueKey, update: &IssueFieldsUpdate) -> Result<()> {
    if update.is_empty() {
        println!(
            "{} No changes specified for {}",
            style::warning_mark(),
            key
        );
        return Ok(());
    }

    session.client.update_issue(key, update).await?;
    println!("{} Updated {}", style::success_mark(), style::issue_key(key.as_str()));
    Ok(())
}

/// Delete after confirmation unless `assume_yes`
pub async fn delete(
    session: &Session,
    key: &IssueKey,
    assume_yes: bool,
    prompter: &Prompter,
) -> Result<()> {
    if !assume_yes {
        let confirmed = prompter.confirm(
            &format!("Are you sure you want to delete {}? This cannot be undone", key),
            false,
        )?;
        if !confirmed {
            println!("Deletion cancelled.");
            return Ok(());
        }
    }

    session.client.delete_issue(key).await?;
    println!("{} Deleted issue {}", style::success_mark(), key);
    Ok(())
}

/// Transition by id, transition name, or target status name (case-insensitive)
pub fn find_transition<'a>(
    transitions: &'a [JiraTransition],
    target: &str,
) -> Option<&'a JiraTransition> {
    let target = target.trim();
    transitions
        .iter()
        .find(|t| t.id == target)
        .or_else(|| transitions.iter().find(|t| t.name.eq_ignore_ascii_case(target)))
        .or_else(|| {
            transitions
                .iter()
                .find(|t| t.to.name.eq_ignore_ascii_case(target))
        })
}

/// Move an issue through its workflow; prompts when `target` is `None`
pub async fn transition(
    session: &Session,
    key: &IssueKey,
    target: Option<&str>,
    prompter: &Prompter,
) -> Result<()> {
    let issue = session.client.get_issue(key).await?;
    let transitions = session.client.get_transitions(key).await?;

    println!(
        "{} is currently {}",
        style::issue_key(key.as_str()),
        style::status_style(&issue.fields.status.name)
    );
    if transitions.is_empty() {
        println!("{} No transitions available", style::warning_mark());
        return Ok(());
    }

    let chosen = match target {
        Some(target) => find_transition(&transitions, target).ok_or_else(|| {
            JiraOpsError::InvalidInput(format!(
                "No transition matching '{}'. Available:\n{}",
                target,
                display::transitions_list(&transitions)
            ))
        })?,
        None => {
            let labels: Vec<String> = transitions
                .iter()
                .map(|t| format!("{} -> {}", t.name, t.to.name))
                .collect();
            &transitions[prompter.select("Choose a transition", &labels, 0)?]
        }
    };

    session.client.transition_issue(key, &chosen.id).await?;
    println!(
        "{} {} moved from '{}' to '{}'",
        style::success_mark(),
        key,
        issue.fields.status.name,
        chosen.to.name
    );
    Ok(())
}

pub async fn comment(session: &Session, key: &IssueKey, text: &str) -> Result<()> {
    let text = text.trim();
    if text.is_empty() {
        return Err(JiraOpsError::InvalidInput(
            "Comment text is required".to_string(),
        ));
    }

    let comment = session
        .client
        .add_comment(key, AdfDocument::paragraph(text))
        .await?;
    tracing::debug!(key = %key, comment_id = %comment.id, "Comment added");
    println!("{} Comment added to {}", style::success_mark(), key);
    Ok(())
}

pub async fn worklogs(session: &Session, key: &IssueKey) -> Result<()> {
    let result = session.client.get_worklogs(key).await?;
    if result.worklogs.is_empty() {
        println!("No worklogs found for {}", key);
        return Ok(());
    }

    println!(
        "{} Found {} worklog(s) for {}:",
        style::success_mark(),
        result.worklogs.len(),
        key
    );
    println!("{}", display::worklog_lines(&result.worklogs));
    Ok(())
}
