//! Site-level lookups: server, projects, users

use super::Session;
use crate::display;
use crate::integrations::normalize_project_key;
use crate::style;
use crate::{JiraOpsError, Result};

pub async fn server_info(session: &Session) -> Result<()> {
    let info = session.client.server_info().await?;
    println!("{}", style::header("Jira Server"));
    println!("{}", display::server_info(&info));
    Ok(())
}

/// Details of one project; falls back to the configured default project
pub async fn project_show(session: &Session, project: Option<&str>) -> Result<()> {
    let key =
        normalize_project_key(project.unwrap_or(session.settings.default_project.as_str()))?;
    let project = session.client.get_project(&key).await?;
    println!("{} {}", style::success_mark(), display::project_details(&project));
    Ok(())
}

pub async fn project_list(session: &Session) -> Result<()> {
    let projects = session.client.list_projects().await?;
    if projects.is_empty() {
        println!("No projects found. Please check your credentials.");
        return Ok(());
    }

    println!("{} Found {} project(s):", style::success_mark(), projects.len());
    println!("{}", display::project_list(&projects));
    Ok(())
}

pub async fn users(session: &Session, query: &str) -> Result<()> {
    let query = query.trim();
    if query.is_empty() {
        return Err(JiraOpsError::InvalidInput(
            "A name or email to search for is required".to_string(),
        ));
    }

    let users = session.client.search_users(query).await?;
    if users.is_empty() {
        println!("No users matching '{}'", query);
        return Ok(());
    }

    println!("{} Found {} user(s):", style::success_mark(), users.len());
    println!("{}", display::user_lines(&users));
    Ok(())
}
