use super::Session;
use crate::automation::{self, RuleOutcome, RuleRequest};
use crate::integrations::{normalize_project_key, IssueKey};
use crate::style;
use crate::{JiraOpsError, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::info;

/// Account-identifying keys dropped from every exported rule
pub const REDACTED_RULE_KEYS: [&str; 3] = ["authorAccountId", "actorAccountId", "ruleScopeARIs"];

/// Strip [`REDACTED_RULE_KEYS`] from each `data[]` item; returns how many were removed
pub fn redact_rule_summary(summary: &mut Value) -> usize {
    let Some(rules) = summary.get_mut("data").and_then(Value::as_array_mut) else {
        return 0;
    };

    rules
        .iter_mut()
        .filter_map(Value::as_object_mut)
        .map(|rule| {
            REDACTED_RULE_KEYS
                .iter()
                .filter(|key| rule.remove(**key).is_some())
                .count()
        })
        .sum()
}

/// `{dir}/{PROJECT}_automation_rules.json`
pub fn export_path(dir: &Path, project: &str) -> PathBuf {
    dir.join(format!("{}_automation_rules.json", project))
}

/// Write the summary as pretty JSON, creating `dir` if needed
pub fn write_export(summary: &Value, dir: &Path, project: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = export_path(dir, project);
    std::fs::write(&path, serde_json::to_string_pretty(summary)?)?;
    Ok(path)
}

/// Fetch the rule summary, redact it, and save it to disk
pub async fn export(
    session: &Session,
    project: Option<&str>,
    output_dir: Option<&Path>,
) -> Result<()> {
    let cloud_id = session.credentials.require_cloud_id()?;
    let project =
        normalize_project_key(project.unwrap_or(session.settings.default_project.as_str()))?;
    let dir = output_dir.unwrap_or(session.settings.automation.output_dir.as_path());

    let mut summary = session.client.automation_rule_summary(cloud_id).await?;
    let rule_count = summary
        .get("data")
        .and_then(Value::as_array)
        .map_or(0, Vec::len);
    let removed = redact_rule_summary(&mut summary);

    let path = write_export(&summary, dir, &project)?;
    info!(path = %path.display(), rules = rule_count, removed, "Exported automation rules");

    println!(
        "{} Saved {} rule(s) to {}",
        style::success_mark(),
        rule_count,
        style::path(&path.display().to_string())
    );
    Ok(())
}

/// Run one rule and report its outcome; a skipped rule is an error
pub async fn run_rule(session: &Session, key: &IssueKey, request: &RuleRequest) -> Result<()> {
    let rule = request.rule();
    println!("{} {}: {}", rule.icon(), style::header(rule.title()), key);

    match automation::run_rule(&session.client, key, request).await? {
        RuleOutcome::Applied(message) => {
            println!("{} {}", style::success_mark(), message);
            Ok(())
        }
        RuleOutcome::NoChange(message) => {
            println!("{} {}", style::info_mark(), message);
            Ok(())
        }
        RuleOutcome::Skipped(message) => Err(JiraOpsError::RuleSkipped(message)),
    }
}
