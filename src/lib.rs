//! jira-ops - Jira Cloud issue operations and automation rules
//!
//! A CLI around the Jira Cloud REST v3 API: issue CRUD, transitions,
//! comments, worklogs, JQL search, bulk creation, project and user lookup,
//! plus five on-demand automation rules.
//!
//! # Architecture
//!
//! - **config**: Credentials (flags, environment, `.env`) and YAML settings
//! - **integrations**: Jira REST client, ADF, wire types, retry policy
//! - **automation**: The five rules, written against [`integrations::IssueApi`]
//! - **handlers**: One function per CLI action
//! - **interactive**: Menus, prompts and the issue wizard
//! - **display** / **style**: Plain-text rendering and terminal colors

// Core modules
pub mod config;
pub mod error;
pub mod integrations;

// Behavior
pub mod automation;
pub mod handlers;

// Presentation
pub mod commands;
pub mod display;
pub mod interactive;
pub mod logging;
pub mod style;

// Re-exports
pub use error::{JiraOpsError, Result};
