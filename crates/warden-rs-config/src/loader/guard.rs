//! Presence check for variables that have no sensible default.

use crate::{ConfigError, EnvVars};
use log::{debug, warn};

/// Credentials and signing secrets every environment must provide.
pub const REQUIRED_VARIABLES: &[&str] = &[
    "DESCOPE_PROJECT_ID",
    "DESCOPE_MANAGEMENT_KEY",
    "GOOGLE_CLIENT_ID",
    "GOOGLE_CLIENT_SECRET",
    "SLACK_CLIENT_ID",
    "SLACK_CLIENT_SECRET",
    "NOTION_CLIENT_ID",
    "NOTION_CLIENT_SECRET",
    "REDIS_HOST",
    "JWT_SECRET",
    "SESSION_SECRET",
];

/// Fail with every name in `names` that is unset or blank, in list order.
pub fn check_required_variables(names: &[&str], env: &EnvVars) -> Result<(), ConfigError> {
    let missing: Vec<String> = names
        .iter()
        .filter(|name| !env.is_set(name))
        .map(|name| name.to_string())
        .collect();

    if missing.is_empty() {
        debug!("required environment variables present (count={})", names.len());
        return Ok(());
    }
    warn!(
        "required environment variables missing (missing={}, required={})",
        missing.len(),
        names.len()
    );
    Err(ConfigError::MissingEnvironmentVariables(missing))
}
