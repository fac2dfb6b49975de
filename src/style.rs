//! Terminal styling utilities
//!
//! Consistent colors for Jira statuses, priorities and issue types.
//! Uses crossterm for cross-platform terminal colors.

use crossterm::style::{StyledContent, Stylize};

/// Width of section banners
const BANNER_WIDTH: usize = 70;

/// Priority colors
/// - Highest/Blocker/Critical: Red
/// - High: Orange-ish
/// - Medium: Yellow
/// - Low/Lowest: Dim
pub fn priority_style(priority: &str) -> StyledContent<String> {
    let label = priority.to_string();
    match priority.to_lowercase().as_str() {
        "highest" | "blocker" | "critical" => label.red().bold(),
        "high" => label.dark_yellow().bold(),
        "medium" => label.yellow(),
        "low" | "lowest" => label.dark_grey(),
        _ => label.white(),
    }
}

/// Issue type colors
pub fn type_style(issue_type: &str) -> StyledContent<String> {
    let label = format!("[{}]", issue_type);
    match issue_type.to_lowercase().as_str() {
        "epic" => label.magenta(),
        "story" => label.green(),
        "bug" => label.red(),
        "task" => label.cyan(),
        "sub-task" | "subtask" => label.dark_cyan(),
        _ => label.white(),
    }
}

/// Status colors, by name then by rough category
pub fn status_style(status: &str) -> StyledContent<String> {
    let label = status.to_string();
    let lower = status.to_lowercase();
    if matches!(lower.as_str(), "done" | "closed" | "resolved") {
        label.dark_grey()
    } else if lower.contains("progress") || lower.contains("review") {
        label.yellow()
    } else if lower.contains("block") {
        label.red()
    } else {
        label.white()
    }
}

/// Status indicator (circle)
pub fn status_indicator(status: &str) -> StyledContent<&'static str> {
    let lower = status.to_lowercase();
    if matches!(lower.as_str(), "done" | "closed" | "resolved") {
        "✓".dark_grey()
    } else if lower.contains("progress") || lower.contains("review") {
        "◐".yellow()
    } else if lower.contains("block") {
        "●".red()
    } else {
        "○".white()
    }
}

/// Section banner: rule, centered title, rule
pub fn banner(title: &str) -> String {
    let rule = "=".repeat(BANNER_WIDTH);
    format!("{rule}\n{title:^width$}\n{rule}", width = BANNER_WIDTH)
}

/// Section headers
pub fn header(text: &str) -> StyledContent<String> {
    text.to_string().bold()
}

/// Dim/muted text
pub fn dim(text: &str) -> StyledContent<String> {
    text.to_string().dark_grey()
}

/// Issue key styling
pub fn issue_key(key: &str) -> StyledContent<String> {
    key.to_string().cyan()
}

/// Highlight important text (yellow)
pub fn highlight(text: &str) -> StyledContent<String> {
    text.to_string().yellow()
}

/// URLs and paths
pub fn path(p: &str) -> StyledContent<String> {
    p.to_string().blue()
}

pub fn success_mark() -> StyledContent<&'static str> {
    "✓".green().bold()
}

pub fn failure_mark() -> StyledContent<&'static str> {
    "✗".red().bold()
}

pub fn warning_mark() -> StyledContent<&'static str> {
    "⚠".yellow().bold()
}

pub fn info_mark() -> StyledContent<&'static str> {
    "ℹ".blue()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner_layout() {
        let banner = banner("Issue Details");
        let lines: Vec<&str> = banner.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "=".repeat(70));
        assert_eq!(lines[1].len(), 70);
        assert_eq!(lines[1].trim(), "Issue Details");
    }

    #[test]
    fn test_style_content_is_kept() {
        assert_eq!(priority_style("High").content(), "High");
        assert_eq!(type_style("Bug").content(), "[Bug]");
        assert_eq!(status_style("In Progress").content(), "In Progress");
    }

    #[test]
    fn test_status_indicator() {
        assert_eq!(*status_indicator("Done").content(), "✓");
        assert_eq!(*status_indicator("In Progress").content(), "◐");
        assert_eq!(*status_indicator("To Do").content(), "○");
    }
}
