//! Menu loops for running without a subcommand

use super::{creator, Prompter};
use crate::automation::{Rule, RuleRequest};
use crate::display;
use crate::handlers::{automation, demo, issue, search, site, Session};
use crate::integrations::{parse_labels, IssueFieldsUpdate, IssueKey};
use crate::style;
use crate::Result;

/// Entries of the main menu, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    GetIssue,
    CreateIssue,
    UpdateIssue,
    DeleteIssue,
    TransitionIssue,
    AddComment,
    Worklogs,
    Search,
    BulkCreate,
    ProjectDetails,
    ListProjects,
    SearchUsers,
    ServerInfo,
    ExportAutomation,
    AutomationRules,
    Demo,
    Exit,
}

impl MenuAction {
    pub const ALL: [MenuAction; 17] = [
        MenuAction::GetIssue,
        MenuAction::CreateIssue,
        MenuAction::UpdateIssue,
        MenuAction::DeleteIssue,
        MenuAction::TransitionIssue,
        MenuAction::AddComment,
        MenuAction::Worklogs,
        MenuAction::Search,
        MenuAction::BulkCreate,
        MenuAction::ProjectDetails,
        MenuAction::ListProjects,
        MenuAction::SearchUsers,
        MenuAction::ServerInfo,
        MenuAction::ExportAutomation,
        MenuAction::AutomationRules,
        MenuAction::Demo,
        MenuAction::Exit,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MenuAction::GetIssue => "Get issue details",
            MenuAction::CreateIssue => "Create issue",
            MenuAction::UpdateIssue => "Update issue",
            MenuAction::DeleteIssue => "Delete issue",
            MenuAction::TransitionIssue => "Transition issue",
            MenuAction::AddComment => "Add comment",
            MenuAction::Worklogs => "View worklogs",
            MenuAction::Search => "Search issues (JQL)",
            MenuAction::BulkCreate => "Bulk create issues",
            MenuAction::ProjectDetails => "Project details",
            MenuAction::ListProjects => "List projects",
            MenuAction::SearchUsers => "Search users",
            MenuAction::ServerInfo => "Server info",
            MenuAction::ExportAutomation => "Export automation rules",
            MenuAction::AutomationRules => "Run automation rules",
            MenuAction::Demo => "API demo (read-only)",
            MenuAction::Exit => "Exit",
        }
    }
}

/// Menu labels prefixed with their 1-based number
pub fn numbered<T: AsRef<str>>(labels: &[T]) -> Vec<String> {
    labels
        .iter()
        .enumerate()
        .map(|(i, label)| format!("{}. {}", i + 1, label.as_ref()))
        .collect()
}

fn ask_issue_key(prompter: &Prompter) -> Result<IssueKey> {
    IssueKey::parse(&prompter.required("Issue key (e.g. KAN-123)")?)
}

async fn dispatch(action: MenuAction, session: &Session, prompter: &Prompter) -> Result<()> {
    match action {
        MenuAction::GetIssue => {
            let key = ask_issue_key(prompter)?;
            issue::show(session, &key, false).await
        }
        MenuAction::CreateIssue => creator::run(session, prompter).await,
        MenuAction::UpdateIssue => {
            let key = ask_issue_key(prompter)?;
            let mut update = IssueFieldsUpdate::default();
            if let Some(summary) = prompter.optional("New summary (blank to keep)")? {
                update = update.summary(summary);
            }
            if let Some(description) = prompter.optional("New description (blank to keep)")? {
                update = update.description(description);
            }
            if let Some(priority) = prompter.optional("New priority (blank to keep)")? {
                update = update.priority(priority);
            }
            let labels = prompter.optional("Replace labels (comma-separated, blank to keep)")?;
            if let Some(labels) = labels {
                update = update.labels(parse_labels(&labels));
            }
            issue::update(session, &key, &update).await
        }
        MenuAction::DeleteIssue => {
            let key = ask_issue_key(prompter)?;
            issue::delete(session, &key, false, prompter).await
        }
        MenuAction::TransitionIssue => {
            let key = ask_issue_key(prompter)?;
            issue::transition(session, &key, None, prompter).await
        }
        MenuAction::AddComment => {
            let key = ask_issue_key(prompter)?;
            let text = prompter.required("Comment")?;
            issue::comment(session, &key, &text).await
        }
        MenuAction::Worklogs => {
            let key = ask_issue_key(prompter)?;
            issue::worklogs(session, &key).await
        }
        MenuAction::Search => {
            let jql = prompter
                .optional(&format!("JQL (blank for '{}')", search::DEFAULT_JQL))?
                .unwrap_or_default();
            search::search(session, &jql, None).await
        }
        MenuAction::BulkCreate => {
            let project = prompter.with_default("Project key", &session.settings.default_project)?;
            let prefix = prompter.with_default("Summary prefix", "Test Issue")?;
            let count = prompter
                .with_default("How many issues (1-10)", "2")?
                .parse()
                .unwrap_or(0);
            search::bulk_create(session, &project, &prefix, count, false).await
        }
        MenuAction::ProjectDetails => {
            let project = prompter.with_default("Project key", &session.settings.default_project)?;
            site::project_show(session, Some(&project)).await
        }
        MenuAction::ListProjects => site::project_list(session).await,
        MenuAction::SearchUsers => {
            let query = prompter.required("Name or email")?;
            site::users(session, &query).await
        }
        MenuAction::ServerInfo => site::server_info(session).await,
        MenuAction::ExportAutomation => {
            let project = prompter.with_default("Project key", &session.settings.default_project)?;
            automation::export(session, Some(&project), None).await
        }
        MenuAction::AutomationRules => automation_menu(session, prompter).await,
        MenuAction::Demo => demo::run(session, None, None, false).await,
        MenuAction::Exit => Ok(()),
    }
}

/// Loop over the main menu until Exit; action errors are printed, not fatal
pub async fn main_menu(session: &Session, prompter: &Prompter) -> Result<()> {
    println!("{}", style::banner("Jira Ops"));
    println!("Connected to: {}", style::path(&session.credentials.url));

    let labels = numbered(&MenuAction::ALL.map(|a| a.label()));
    loop {
        println!();
        let action = MenuAction::ALL[prompter.select("What would you like to do?", &labels, 0)?];
        if action == MenuAction::Exit {
            println!("Goodbye!");
            return Ok(());
        }

        if let Err(e) = dispatch(action, session, prompter).await {
            tracing::debug!(?action, error = ?e, "Menu action failed");
            println!("{} {}", style::failure_mark(), display::error_report(&e));
        }
    }
}

/// Ask for the rule inputs and build a request
fn ask_rule_request(rule: Rule, prompter: &Prompter) -> Result<RuleRequest> {
    if !rule.needs_change_values() {
        return Ok(RuleRequest::new(rule, "", ""));
    }

    let what = if rule == Rule::PriorityAlert {
        "priority"
    } else {
        "status"
    };
    let old = prompter
        .optional(&format!("Old {} (e.g. To Do / Medium)", what))?
        .unwrap_or_default();
    let new = prompter
        .optional(&format!("New {} (e.g. Done / High)", what))?
        .unwrap_or_default();
    Ok(RuleRequest::new(rule, &old, &new))
}

/// The five automation rules plus Exit
pub async fn automation_menu(session: &Session, prompter: &Prompter) -> Result<()> {
    let mut labels: Vec<String> = Rule::ALL
        .iter()
        .map(|r| format!("{}. {} {} - {}", r.number(), r.icon(), r.title(), r.description()))
        .collect();
    labels.push(format!("{}. Exit", Rule::ALL.len() + 1));

    loop {
        println!();
        println!("{}", style::banner("Jira Automation Rules"));
        let choice = prompter.select("Select a rule", &labels, 0)?;
        let Some(&rule) = Rule::ALL.get(choice) else {
            return Ok(());
        };

        let result = async {
            let key = ask_issue_key(prompter)?;
            let request = ask_rule_request(rule, prompter)?;
            automation::run_rule(session, &key, &request).await
        }
        .await;
        if let Err(e) = result {
            println!("{} {}", style::failure_mark(), display::error_report(&e));
        }

        prompter.pause()?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_ends_with_exit() {
        assert_eq!(MenuAction::ALL.last(), Some(&MenuAction::Exit));
        assert_eq!(MenuAction::ALL[0].label(), "Get issue details");
    }

    #[test]
    fn test_numbered_labels() {
        assert_eq!(
            numbered(&["Get issue", "Exit"]),
            vec!["1. Get issue".to_string(), "2. Exit".to_string()]
        );
    }
}
