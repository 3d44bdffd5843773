//! Secret redaction for printing or logging a configuration tree.

use crate::ConfigError;
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use serde_json::{Map, Value};

/// Default replacement marker for redacted fields.
pub const REDACTED: &str = "[REDACTED]";

/// Key patterns treated as secrets by [`RedactionPolicy::secrets`].
pub const DEFAULT_SECRET_PATTERNS: &[&str] =
    &["*secret*", "*password*", "*key", "*token*", "*credential*"];

/// Glob patterns over object keys whose values get replaced.
#[derive(Debug, Clone)]
pub struct RedactionPolicy {
    patterns: GlobSet,
    replacement: String,
}

impl RedactionPolicy {
    /// Compile case-insensitive key patterns.
    pub fn new<I, S>(patterns: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            builder.add(
                GlobBuilder::new(pattern.as_ref())
                    .case_insensitive(true)
                    .build()?,
            );
        }
        Ok(Self {
            patterns: builder.build()?,
            replacement: REDACTED.to_string(),
        })
    }

    /// Policy built from [`DEFAULT_SECRET_PATTERNS`].
    pub fn secrets() -> Result<Self, ConfigError> {
        Self::new(DEFAULT_SECRET_PATTERNS)
    }

    pub fn with_replacement(mut self, replacement: impl Into<String>) -> Self {
        self.replacement = replacement.into();
        self
    }

    pub fn is_secret_key(&self, key: &str) -> bool {
        self.patterns.is_match(key)
    }

    /// Copy of `value` with every non-null value under a matching key replaced.
    pub fn redact(&self, value: &Value) -> Value {
        match value {
            Value::Object(map) => {
                let redacted: Map<String, Value> = map
                    .iter()
                    .map(|(key, entry)| {
                        let entry = if self.is_secret_key(key) && !entry.is_null() {
                            Value::String(self.replacement.clone())
                        } else {
                            self.redact(entry)
                        };
                        (key.clone(), entry)
                    })
                    .collect();
                Value::Object(redacted)
            }
            Value::Array(items) => Value::Array(items.iter().map(|item| self.redact(item)).collect()),
            other => other.clone(),
        }
    }
}
