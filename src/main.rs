//! jira-ops - Jira Cloud issue operations and automation rules
//!
//! Main entry point for the jira-ops CLI.

use clap::Parser;
use jira_ops::automation::RuleRequest;
use jira_ops::commands::{
    AutomationCommands, Cli, Commands, CreateArgs, IssueCommands, ProjectCommands,
};
use jira_ops::config::{validate_all, validate_offline, Credentials, Settings};
use jira_ops::handlers::{automation, demo, issue, search, site, Session};
use jira_ops::integrations::{
    normalize_project_key, parse_labels, IssueFieldsUpdate, IssueKey, NewIssue,
};
use jira_ops::interactive::{self, Prompter};
use std::process;

#[tokio::main]
async fn main() {
    // .env values fill in whatever the real environment leaves unset
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if let Err(e) = jira_ops::logging::init(cli.verbose) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", jira_ops::display::error_report(&e));
        process::exit(1);
    }
}

async fn run(cli: Cli) -> jira_ops::Result<()> {
    let settings = Settings::resolve(cli.config.as_deref())?;

    if let Some(args) = cli.offline_create() {
        validate_offline(&settings)?;
        return issue::preview(&new_issue_from_args(args, &settings)?);
    }

    let credentials = Credentials::resolve(cli.url, cli.email, cli.token, cli.cloud_id)?;
    validate_all(&credentials, &settings)?;

    tracing::info!(url = %credentials.url, "Configuration loaded");

    let session = Session::new(credentials, settings)?;
    let prompter = Prompter::new();

    match cli.command {
        None => interactive::main_menu(&session, &prompter).await,
        Some(command) => run_command(command, &session, &prompter).await,
    }
}

async fn run_command(
    command: Commands,
    session: &Session,
    prompter: &Prompter,
) -> jira_ops::Result<()> {
    match command {
        Commands::Issue(cmd) => run_issue_command(cmd, session, prompter).await,

        Commands::Search { jql, max_results } => {
            search::search(session, &jql, max_results).await
        }

        Commands::BulkCreate {
            project,
            prefix,
            count,
            sequential,
        } => {
            let project = project.unwrap_or_else(|| session.settings.default_project.clone());
            search::bulk_create(session, &project, &prefix, count, sequential).await
        }

        Commands::Project(ProjectCommands::Show { key }) => {
            site::project_show(session, key.as_deref()).await
        }
        Commands::Project(ProjectCommands::List) => site::project_list(session).await,

        Commands::Users { query } => site::users(session, &query).await,

        Commands::ServerInfo => site::server_info(session).await,

        Commands::Automation(AutomationCommands::Export {
            project,
            output_dir,
        }) => automation::export(session, project.as_deref(), output_dir.as_deref()).await,

        Commands::Rule(cmd) => {
            let (rule, key, old, new) = cmd.parts();
            let key = IssueKey::parse(key)?;
            automation::run_rule(session, &key, &RuleRequest::new(rule, old, new)).await
        }

        Commands::Rules => interactive::automation_menu(session, prompter).await,

        Commands::Demo {
            project,
            issue,
            with_writes,
        } => {
            let issue = issue.as_deref().map(IssueKey::parse).transpose()?;
            demo::run(session, project.as_deref(), issue.as_ref(), with_writes).await
        }
    }
}

async fn run_issue_command(
    command: IssueCommands,
    session: &Session,
    prompter: &Prompter,
) -> jira_ops::Result<()> {
    match command {
        IssueCommands::Get { key, open } => {
            issue::show(session, &IssueKey::parse(&key)?, open).await
        }

        IssueCommands::Create(args) => match args.summary.as_deref() {
            Some(_) => {
                let new_issue = new_issue_from_args(&args, &session.settings)?;
                issue::create(session, &new_issue).await
            }
            None => interactive::creator::run(session, prompter).await,
        },

        IssueCommands::Update {
            key,
            summary,
            description,
            priority,
            labels,
            assignee,
        } => {
            let mut update = IssueFieldsUpdate::default();
            if let Some(summary) = summary {
                update = update.summary(summary);
            }
            if let Some(description) = description {
                update = update.description(description);
            }
            if let Some(priority) = priority {
                update = update.priority(priority);
            }
            if let Some(labels) = labels {
                update = update.labels(parse_labels(&labels));
            }
            if let Some(assignee) = assignee {
                update = update.assignee(assignee);
            }
            issue::update(session, &IssueKey::parse(&key)?, &update).await
        }

        IssueCommands::Delete { key, yes } => {
            issue::delete(session, &IssueKey::parse(&key)?, yes, prompter).await
        }

        IssueCommands::Transition { key, to } => {
            issue::transition(session, &IssueKey::parse(&key)?, to.as_deref(), prompter).await
        }

        IssueCommands::Comment { key, text } => {
            issue::comment(session, &IssueKey::parse(&key)?, &text).await
        }

        IssueCommands::Worklogs { key } => {
            issue::worklogs(session, &IssueKey::parse(&key)?).await
        }
    }
}

fn new_issue_from_args(args: &CreateArgs, settings: &Settings) -> jira_ops::Result<NewIssue> {
    let project = normalize_project_key(
        args.project
            .as_deref()
            .unwrap_or(settings.default_project.as_str()),
    )?;

    let mut new_issue = NewIssue::new(
        project,
        args.summary.as_deref().unwrap_or_default().trim(),
        args.issue_type.trim(),
    );
    if let Some(description) = &args.description {
        new_issue = new_issue.with_description(description);
    }
    if let Some(priority) = &args.priority {
        new_issue = new_issue.with_priority(priority.trim());
    }
    if let Some(labels) = &args.labels {
        new_issue = new_issue.with_labels(parse_labels(labels));
    }
    Ok(new_issue)
}
