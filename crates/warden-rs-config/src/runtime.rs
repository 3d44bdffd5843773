//! Finished, immutable configuration snapshot handed to consumers.

use crate::{AppConfig, ConfigError, Environment, RedactionPolicy};
use serde_json::Value;
use std::sync::Arc;

/// Validated configuration plus the environment it was assembled for.
///
/// Cloning shares the same snapshot. There is no way to mutate it; build a
/// new one by running the assembler again.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    config: Arc<AppConfig>,
    tree: Arc<Value>,
    environment: Environment,
}

impl RuntimeConfig {
    pub(crate) fn new(config: AppConfig, tree: Value, environment: Environment) -> Self {
        Self {
            config: Arc::new(config),
            tree: Arc::new(tree),
            environment,
        }
    }

    /// Typed configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Shared handle to the typed configuration.
    pub fn shared(&self) -> Arc<AppConfig> {
        Arc::clone(&self.config)
    }

    /// Validated tree the typed config was decoded from.
    pub fn tree(&self) -> &Value {
        &self.tree
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    pub fn is_test(&self) -> bool {
        self.environment == Environment::Test
    }

    /// Look up a dotted path such as `server.cors.methods`.
    pub fn get(&self, path: &str) -> Option<&Value> {
        path.split('.')
            .try_fold(self.tree.as_ref(), |node, key| node.get(key))
    }

    /// Tree with secrets replaced according to `policy`.
    pub fn redacted_tree(&self, policy: &RedactionPolicy) -> Value {
        policy.redact(&self.tree)
    }

    /// Tree with the default secret patterns redacted.
    pub fn redacted(&self) -> Result<Value, ConfigError> {
        Ok(self.redacted_tree(&RedactionPolicy::secrets()?))
    }
}

impl PartialEq for RuntimeConfig {
    fn eq(&self, other: &Self) -> bool {
        self.environment == other.environment && self.tree == other.tree
    }
}
