//! Comment text posted by the notification rules

use chrono::Local;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Local time in [`TIMESTAMP_FORMAT`]
pub fn now_timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

pub fn status_change_comment(old: &str, new: &str, assignee: &str, timestamp: &str) -> String {
    format!(
        "🔄 Status Update\n\n\
         Issue status changed from '{old}' to '{new}'\n\n\
         Assignee: {assignee}\n\
         Timestamp: {timestamp}\n\n\
         This is an automated notification from jira-ops."
    )
}

pub fn priority_alert_comment(
    icon: &str,
    old: &str,
    new: &str,
    assignee: &str,
    summary: &str,
    timestamp: &str,
) -> String {
    format!(
        "{icon} PRIORITY ALERT\n\n\
         This issue's priority has been changed from '{old}' to '{new}'.\n\n\
         Assignee: {assignee}\n\
         Summary: {summary}\n\
         Timestamp: {timestamp}\n\n\
         ⚠️ Please review this issue as soon as possible.\n\n\
         This is an automated alert from jira-ops."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    #[test]
    fn test_timestamp_format() {
        let ts = now_timestamp();
        assert_eq!(ts.len(), 19);
        assert!(NaiveDateTime::parse_from_str(&ts, TIMESTAMP_FORMAT).is_ok());
    }

    #[test]
    fn test_status_change_comment() {
        let text = status_change_comment("To Do", "Done", "Unassigned", "2024-01-02 03:04:05");
        assert!(text.starts_with("🔄 Status Update"));
        assert!(text.contains("changed from 'To Do' to 'Done'"));
        assert!(text.contains("Assignee: Unassigned\nTimestamp: 2024-01-02 03:04:05"));
    }

    #[test]
    fn test_priority_alert_comment() {
        let text = priority_alert_comment("🔴", "Low", "Blocker", "Ann", "Outage", "ts");
        assert!(text.starts_with("🔴 PRIORITY ALERT"));
        assert!(text.contains("from 'Low' to 'Blocker'."));
        assert!(text.contains("Summary: Outage"));
    }
}
