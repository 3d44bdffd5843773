//! Runtime environment names and per-environment override layers.

use crate::{ConfigError, EnvVars, Layer, layers};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Variable holding the runtime environment name.
pub const NODE_ENV: &str = "NODE_ENV";

static EMPTY_LAYER: LazyLock<Layer> = LazyLock::new(|| Value::Object(Map::new()));

/// Closed set of runtime environments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
    Test,
}

impl Environment {
    pub const ALL: [Environment; 4] = [
        Environment::Development,
        Environment::Staging,
        Environment::Production,
        Environment::Test,
    ];

    /// Canonical lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
            Environment::Test => "test",
        }
    }

    /// Strict parse: only the exact lowercase names are recognized.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|env| env.as_str() == name)
    }

    /// Lenient parse: unrecognized names fall back to development.
    pub fn from_name(name: &str) -> Self {
        Self::parse(name).unwrap_or_else(|| {
            warn!("unrecognized environment name, falling back to development (name={name})");
            Environment::Development
        })
    }

    /// Resolve the environment from `NODE_ENV`, defaulting to development.
    pub fn resolve(env: &EnvVars) -> Self {
        match env.get(NODE_ENV) {
            Some(name) => Self::from_name(name),
            None => {
                debug!("{NODE_ENV} unset; using development");
                Environment::Development
            }
        }
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::parse(name)
            .ok_or_else(|| ConfigError::Invalid(format!("unknown environment `{name}`")))
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Override layers keyed by environment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvironmentLayers {
    layers: HashMap<Environment, Layer>,
}

impl EnvironmentLayers {
    pub fn new() -> Self {
        Self::default()
    }

    /// The shipped development, staging, production and test layers.
    pub fn compiled(env: &EnvVars) -> Self {
        Environment::ALL
            .into_iter()
            .fold(Self::new(), |compiled, environment| {
                compiled.with_layer(environment, layers::environment_layer(environment, env))
            })
    }

    pub fn with_layer(mut self, environment: Environment, layer: Layer) -> Self {
        self.insert(environment, layer);
        self
    }

    pub fn insert(&mut self, environment: Environment, layer: Layer) {
        self.layers.insert(environment, layer);
    }

    pub fn get(&self, environment: Environment) -> Option<&Layer> {
        self.layers.get(&environment)
    }
}

/// Pick the layer for `environment`, falling back to development, then to an
/// empty layer. Never fails.
pub fn select_layer(environment: Environment, layers: &EnvironmentLayers) -> &Layer {
    if let Some(layer) = layers.get(environment) {
        return layer;
    }
    warn!("no layer for environment, falling back to development (environment={environment})");
    layers
        .get(Environment::Development)
        .unwrap_or(&*EMPTY_LAYER)
}
