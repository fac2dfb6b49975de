//! Configuration system
//!
//! Two halves:
//! - [`Credentials`]: site URL, email and API token from flags, the
//!   environment, or a `.env` file
//! - [`Settings`]: everything else, from ~/.config/jira-ops/config.yaml

mod credentials;
mod settings;
pub mod validation;

pub use credentials::{
    Credentials, CLOUD_ID_VAR, EMAIL_VAR, TOKEN_HELP_URL, TOKEN_VAR, URL_VAR,
};
pub use settings::{AutomationSettings, HttpSettings, SearchSettings, Settings};
pub use validation::{
    validate_all, validate_credentials, validate_offline, validate_settings, ValidationError,
};
