//! Error types for config assembly and validation.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Errors returned while assembling or validating config.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// One or more mandatory environment variables are unset or empty.
    #[error("missing required environment variables: {}", .0.join(", "))]
    MissingEnvironmentVariables(Vec<String>),
    /// The assembled tree failed schema validation.
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    /// Reading an override file failed.
    #[error("failed to read config {}: {source}", path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Parsing an override file failed.
    #[error("failed to parse config {}: {source}", path.display())]
    ParseFailed {
        path: PathBuf,
        #[source]
        source: json5::Error,
    },
    /// Converting the validated tree into typed config failed.
    #[error("failed to decode config: {0}")]
    DecodeFailed(#[from] serde_json::Error),
    /// Loading a `.env` file failed.
    #[error("failed to load .env: {0}")]
    DotenvFailed(#[from] dotenvy::Error),
    /// A redaction glob pattern did not compile.
    #[error("invalid redaction pattern: {0}")]
    InvalidPattern(#[from] globset::Error),
    /// An override file parsed but is not a usable layer.
    #[error("invalid override layer {}: {message}", path.display())]
    InvalidOverride { path: PathBuf, message: String },
    /// Generic failure.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// A single field-level schema violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Dotted path to the offending field (`root` for the tree itself).
    pub path: String,
    /// Human-readable reason.
    pub message: String,
}

impl Violation {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Every violation found in one validation pass, in schema order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("configuration validation failed: {}", render_violations(.violations))]
pub struct ValidationErrors {
    violations: Vec<Violation>,
}

impl ValidationErrors {
    /// Wrap collected violations; `None` when there is nothing to report.
    pub fn from_violations(violations: Vec<Violation>) -> Option<Self> {
        if violations.is_empty() {
            None
        } else {
            Some(Self { violations })
        }
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Never true for a value built by `from_violations`.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Paths of every violation, in report order.
    pub fn paths(&self) -> Vec<&str> {
        self.violations.iter().map(|v| v.path.as_str()).collect()
    }

    pub fn into_violations(self) -> Vec<Violation> {
        self.violations
    }
}

fn render_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
