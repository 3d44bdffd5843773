//! Process environment snapshot and helpers for env-derived config leaves.

use crate::ConfigError;
use log::debug;
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;

/// Setting this variable (to anything) skips `.env` loading.
pub const DOTENV_DISABLED: &str = "DOTENV_DISABLED";

/// Immutable snapshot of environment variables. The pipeline never reads the
/// process environment directly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvVars {
    vars: HashMap<String, String>,
}

impl EnvVars {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the current process environment. Non-unicode entries are skipped.
    pub fn from_process() -> Self {
        let vars: HashMap<String, String> = std::env::vars_os()
            .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
            .collect();
        debug!("captured process environment (vars={})", vars.len());
        Self { vars }
    }

    /// Load `.env` from the working directory (or an ancestor) into the process
    /// environment, unless `DOTENV_DISABLED` is set.
    ///
    /// Returns the loaded path, or `None` when disabled or no file exists.
    pub fn load_dotenv() -> Result<Option<PathBuf>, ConfigError> {
        if std::env::var_os(DOTENV_DISABLED).is_some() {
            debug!("dotenv loading disabled via {DOTENV_DISABLED}");
            return Ok(None);
        }
        match dotenvy::dotenv() {
            Ok(path) => {
                debug!("loaded dotenv file (path={})", path.display());
                Ok(Some(path))
            }
            Err(err) if err.not_found() => {
                debug!("no dotenv file found");
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Builder-style insert, mostly for tests and embedders.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }

    /// Raw value, including empty strings.
    pub fn raw(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    /// Value when set and not blank.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.raw(name).filter(|value| !value.trim().is_empty())
    }

    pub fn is_set(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// String leaf; `null` when unset, which the validator treats as absent.
    pub fn text(&self, name: &str) -> Value {
        self.get(name)
            .map(|value| Value::String(value.to_string()))
            .unwrap_or(Value::Null)
    }

    pub fn text_or(&self, name: &str, default: &str) -> Value {
        Value::String(self.get(name).unwrap_or(default).to_string())
    }

    /// Integer leaf. A set value that does not parse is kept verbatim as a
    /// string so validation reports it at its path.
    pub fn integer_or(&self, name: &str, default: i64) -> Value {
        match self.get(name) {
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .map(Value::from)
                .unwrap_or_else(|_| Value::String(raw.to_string())),
            None => Value::from(default),
        }
    }

    /// Float leaf, same unparseable-value handling as `integer_or`.
    pub fn float_or(&self, name: &str, default: f64) -> Value {
        match self.get(name) {
            Some(raw) => raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .map(Value::from)
                .unwrap_or_else(|| Value::String(raw.to_string())),
            None => Value::from(default),
        }
    }

    /// True only for the literal `true`.
    pub fn flag(&self, name: &str) -> bool {
        self.get(name) == Some("true")
    }

    /// Comma-separated list leaf; blank entries are dropped.
    pub fn list_or(&self, name: &str, default: &[&str]) -> Value {
        let items: Vec<Value> = match self.get(name) {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(|item| Value::String(item.to_string()))
                .collect(),
            None => default
                .iter()
                .map(|item| Value::String(item.to_string()))
                .collect(),
        };
        Value::Array(items)
    }
}

impl<K, V> FromIterator<(K, V)> for EnvVars
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn blank_values_count_as_unset() {
        let env = EnvVars::new().with("EMPTY", "").with("BLANK", "  ");
        assert!(!env.is_set("EMPTY"));
        assert!(!env.is_set("BLANK"));
        assert_eq!(env.raw("EMPTY"), Some(""));
        assert_eq!(env.text("BLANK"), Value::Null);
    }

    #[test]
    fn unparseable_integer_is_kept_as_string() {
        let env = EnvVars::new().with("PORT", "eighty");
        assert_eq!(env.integer_or("PORT", 3000), json!("eighty"));
        assert_eq!(env.integer_or("OTHER_PORT", 3000), json!(3000));
    }

    #[test]
    fn float_parses_and_defaults() {
        let env = EnvVars::new().with("FACTOR", "1.5");
        assert_eq!(env.float_or("FACTOR", 2.0), json!(1.5));
        assert_eq!(env.float_or("MISSING", 2.0), json!(2.0));
    }

    #[test]
    fn list_splits_on_commas() {
        let env = EnvVars::new().with("ORIGINS", "https://a.example, https://b.example,");
        assert_eq!(
            env.list_or("ORIGINS", &["https://default.example"]),
            json!(["https://a.example", "https://b.example"])
        );
        assert_eq!(
            env.list_or("NONE", &["https://default.example"]),
            json!(["https://default.example"])
        );
    }

    #[test]
    fn flag_requires_literal_true() {
        let env = EnvVars::from_iter([("A", "true"), ("B", "1")]);
        assert!(env.flag("A"));
        assert!(!env.flag("B"));
        assert!(!env.flag("C"));
    }
}
