//! Logging configuration using tracing
//!
//! Log lines go to stderr so command output on stdout stays clean.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when RUST_LOG is unset
pub const DEFAULT_FILTER: &str = "warn";

/// Filter used for `-v/--verbose` when RUST_LOG is unset
pub const VERBOSE_FILTER: &str = "jira_ops=debug";

fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        VERBOSE_FILTER
    } else {
        DEFAULT_FILTER
    }
}

/// Initialize the tracing subscriber
///
/// RUST_LOG wins when set, e.g.
/// - `RUST_LOG=info` - requests and writes
/// - `RUST_LOG=jira_ops=trace,reqwest=debug` - everything including the HTTP stack
///
/// # Errors
/// Returns an error if the subscriber has already been initialized
pub fn init(verbose: bool) -> crate::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_line_number(verbose),
        )
        .try_init()
        .map_err(|e| {
            crate::JiraOpsError::Config(format!("Failed to initialize tracing: {}", e))
        })?;

    Ok(())
}

/// Initialize logging for tests (no-op if already initialized)
pub fn init_test() {
    let _ = init(true);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        assert_eq!(default_filter(false), "warn");
        assert_eq!(default_filter(true), "jira_ops=debug");
    }

    #[test]
    fn test_init_test_helper() {
        init_test();
        init_test();
    }

    #[test]
    fn test_logging_macros() {
        init_test();

        tracing::debug!(key = "KAN-1", "Fetching issue");
        tracing::info!(key = "KAN-1", status = 204, "Transitioned issue");
        tracing::warn!(attempt = 1, "Retrying request");
    }
}
