//! CLI command definitions
//!
//! All CLI structs and subcommand enums are defined here.

use crate::automation::Rule;
use crate::config::{CLOUD_ID_VAR, EMAIL_VAR, TOKEN_VAR, URL_VAR};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// jira-ops - Jira Cloud issue operations and automation rules
#[derive(Parser, Debug)]
#[command(name = "jira-ops")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Jira site URL (e.g. https://your-domain.atlassian.net)
    #[arg(long, global = true, env = URL_VAR)]
    pub url: Option<String>,

    /// Account email used for basic auth
    #[arg(long, global = true, env = EMAIL_VAR)]
    pub email: Option<String>,

    /// API token used for basic auth
    #[arg(long, global = true, env = TOKEN_VAR, hide_env_values = true)]
    pub token: Option<String>,

    /// Atlassian cloud id (automation API only)
    #[arg(long, global = true, env = CLOUD_ID_VAR)]
    pub cloud_id: Option<String>,

    /// Path to config file (default: ~/.config/jira-ops/config.yaml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose/debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Omit to open the interactive menu
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Work with a single issue
    #[command(subcommand)]
    Issue(IssueCommands),

    /// Search issues with JQL
    Search {
        /// JQL query (default: order by created DESC)
        #[arg(default_value = "")]
        jql: String,

        /// Maximum number of results (default from config, 10)
        #[arg(short, long)]
        max_results: Option<u32>,
    },

    /// Create several numbered Task issues at once
    BulkCreate {
        /// Project key (default from config)
        #[arg(short, long)]
        project: Option<String>,

        /// Summary prefix; issues are titled "<prefix> - Bulk Issue #<n>"
        #[arg(short = 's', long, default_value = "Test Issue")]
        prefix: String,

        /// Number of issues, 1-10
        #[arg(short = 'n', long, default_value_t = 2)]
        count: u32,

        /// Create one issue per request instead of using the bulk endpoint
        #[arg(long)]
        sequential: bool,
    },

    /// Project details and listing
    #[command(subcommand)]
    Project(ProjectCommands),

    /// Search users by name or email
    Users {
        /// Name or email fragment
        query: String,
    },

    /// Show Jira server information
    ServerInfo,

    /// Automation rule summary export
    #[command(subcommand)]
    Automation(AutomationCommands),

    /// Run one automation rule against an issue
    #[command(subcommand)]
    Rule(RuleCommands),

    /// Open the automation rules menu
    Rules,

    /// Walk through the main read endpoints
    Demo {
        /// Project key (default from config)
        #[arg(short, long)]
        project: Option<String>,

        /// Issue to show (default: <PROJECT>-1)
        #[arg(short, long)]
        issue: Option<String>,

        /// Also create and delete a test issue
        #[arg(long)]
        with_writes: bool,
    },
}

/// Fields for a new issue; omit `--summary` to run the wizard
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Project key (default from config)
    #[arg(short, long)]
    pub project: Option<String>,

    /// Issue summary (title)
    #[arg(short, long)]
    pub summary: Option<String>,

    /// Issue type name
    #[arg(short = 't', long = "type", default_value = "Task")]
    pub issue_type: String,

    /// Description; each line becomes a paragraph
    #[arg(short, long)]
    pub description: Option<String>,

    /// Priority name (Highest, High, Medium, Low, Lowest)
    #[arg(long)]
    pub priority: Option<String>,

    /// Comma-separated labels
    #[arg(short, long)]
    pub labels: Option<String>,

    /// Print the request payload without sending it
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Subcommand, Debug)]
pub enum IssueCommands {
    /// Show issue details
    Get {
        /// Issue key (e.g. KAN-123)
        key: String,

        /// Open the issue in the browser
        #[arg(long)]
        open: bool,
    },

    /// Create an issue
    Create(CreateArgs),

    /// Update issue fields
    Update {
        /// Issue key (e.g. KAN-123)
        key: String,

        /// New summary
        #[arg(short, long)]
        summary: Option<String>,

        /// New description
        #[arg(short, long)]
        description: Option<String>,

        /// New priority name
        #[arg(long)]
        priority: Option<String>,

        /// Replace labels (comma-separated)
        #[arg(short, long)]
        labels: Option<String>,

        /// Assignee account id
        #[arg(short, long)]
        assignee: Option<String>,
    },

    /// Delete an issue permanently
    Delete {
        /// Issue key (e.g. KAN-123)
        key: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Move an issue to another status
    Transition {
        /// Issue key (e.g. KAN-123)
        key: String,

        /// Transition id, transition name, or target status (prompts when omitted)
        #[arg(long)]
        to: Option<String>,
    },

    /// Add a comment
    Comment {
        /// Issue key (e.g. KAN-123)
        key: String,

        /// Comment text
        text: String,
    },

    /// List logged work
    Worklogs {
        /// Issue key (e.g. KAN-123)
        key: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ProjectCommands {
    /// Show project details
    Show {
        /// Project key (default from config)
        key: Option<String>,
    },

    /// List all visible projects
    List,
}

#[derive(Subcommand, Debug)]
pub enum AutomationCommands {
    /// Save the redacted rule summary as {PROJECT}_automation_rules.json
    Export {
        /// Project key used in the file name (default from config)
        #[arg(short, long)]
        project: Option<String>,

        /// Output directory (default from config)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
pub enum RuleCommands {
    /// Assign the issue to its reporter
    Assign {
        /// Issue key (e.g. KAN-123)
        key: String,
    },

    /// Move an assigned issue to In Progress
    Transition {
        /// Issue key (e.g. KAN-123)
        key: String,
    },

    /// Comment about a status change
    NotifyStatus {
        /// Issue key (e.g. KAN-123)
        key: String,

        /// Previous status
        #[arg(long, default_value = "")]
        old: String,

        /// New status
        #[arg(long, default_value = "")]
        new: String,
    },

    /// Label the issue by its type
    Label {
        /// Issue key (e.g. KAN-123)
        key: String,
    },

    /// Comment when priority is raised to High or above
    PriorityAlert {
        /// Issue key (e.g. KAN-123)
        key: String,

        /// Previous priority
        #[arg(long, default_value = "")]
        old: String,

        /// New priority
        #[arg(long, default_value = "")]
        new: String,
    },
}

impl Cli {
    /// `issue create --dry-run` with a summary; it never contacts Jira
    pub fn offline_create(&self) -> Option<&CreateArgs> {
        match &self.command {
            Some(Commands::Issue(IssueCommands::Create(args)))
                if args.dry_run && args.summary.is_some() =>
            {
                Some(args)
            }
            _ => None,
        }
    }
}

impl RuleCommands {
    /// Rule, issue key, and old/new values
    pub fn parts(&self) -> (Rule, &str, &str, &str) {
        match self {
            RuleCommands::Assign { key } => (Rule::AssignToReporter, key.as_str(), "", ""),
            RuleCommands::Transition { key } => {
                (Rule::TransitionOnAssignment, key.as_str(), "", "")
            }
            RuleCommands::NotifyStatus { key, old, new } => {
                (Rule::NotifyStatusChange, key.as_str(), old.as_str(), new.as_str())
            }
            RuleCommands::Label { key } => (Rule::LabelByIssueType, key.as_str(), "", ""),
            RuleCommands::PriorityAlert { key, old, new } => {
                (Rule::PriorityAlert, key.as_str(), old.as_str(), new.as_str())
            }
        }
    }
}
