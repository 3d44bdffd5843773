//! Startup configuration assembly.
//!
//! Checks required variables, selects the environment layer, merges module
//! defaults with it and with any caller overrides, validates the result and
//! produces an immutable [`RuntimeConfig`].

mod guard;
mod merge;
mod overrides;

#[cfg(test)]
mod tests;

pub use guard::{REQUIRED_VARIABLES, check_required_variables};
pub use merge::{Layer, merge, merge_all};

use crate::environment::select_layer;
use crate::schema::{app_schema, validate};
use crate::{
    AppConfig, ConfigError, EnvVars, Environment, EnvironmentLayers, RuntimeConfig, layers,
};
use log::{debug, error, info};
use serde_json::Value;
use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// Progress of a single assembly run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssemblyState {
    Unloaded,
    VariablesChecked,
    LayersSelected(Environment),
    Merged,
    Validated,
    /// Assembly stopped; holds the rendered error.
    Failed(String),
}

/// Inputs for one assembly run.
#[derive(Debug, Clone)]
pub struct AssemblerOptions {
    /// Environment snapshot every env-derived value is read from.
    pub env: EnvVars,
    /// Explicit environment; `NODE_ENV` is used when unset.
    pub environment: Option<Environment>,
    /// Variables that must be present before anything is built.
    pub required_variables: &'static [&'static str],
    /// Base layer; the compiled module defaults when unset.
    pub defaults: Option<Layer>,
    /// Environment layers; the compiled layers when unset.
    pub layers: Option<EnvironmentLayers>,
    /// JSON5 override files, applied in order.
    pub override_paths: Vec<PathBuf>,
    /// Inline override layer, applied after the files.
    pub overrides: Option<Layer>,
}

impl AssemblerOptions {
    /// Create options over an environment snapshot with compiled layers.
    pub fn new(env: EnvVars) -> Self {
        Self {
            env,
            environment: None,
            required_variables: REQUIRED_VARIABLES,
            defaults: None,
            layers: None,
            override_paths: Vec::new(),
            overrides: None,
        }
    }

    /// Options over the current process environment.
    pub fn from_process() -> Self {
        Self::new(EnvVars::from_process())
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = Some(environment);
        self
    }

    pub fn with_required_variables(mut self, names: &'static [&'static str]) -> Self {
        self.required_variables = names;
        self
    }

    pub fn with_defaults(mut self, defaults: Layer) -> Self {
        self.defaults = Some(defaults);
        self
    }

    pub fn with_layers(mut self, layers: EnvironmentLayers) -> Self {
        self.layers = Some(layers);
        self
    }

    /// Add an override file that is applied after earlier ones.
    pub fn with_override_path(mut self, path: impl AsRef<Path>) -> Self {
        self.override_paths.push(path.as_ref().to_path_buf());
        self
    }

    pub fn with_overrides(mut self, overrides: Layer) -> Self {
        self.overrides = Some(overrides);
        self
    }
}

/// Runs the assembly pipeline exactly once.
#[derive(Debug)]
pub struct ConfigAssembler {
    options: AssemblerOptions,
    state: AssemblyState,
}

impl ConfigAssembler {
    pub fn new(options: AssemblerOptions) -> Self {
        Self {
            options,
            state: AssemblyState::Unloaded,
        }
    }

    pub fn state(&self) -> &AssemblyState {
        &self.state
    }

    /// Run the pipeline. A second call fails without doing any work.
    pub fn assemble(&mut self) -> Result<RuntimeConfig, ConfigError> {
        if self.state != AssemblyState::Unloaded {
            return Err(ConfigError::Invalid(format!(
                "assembler already ran (state={:?})",
                self.state
            )));
        }

        let Self { options, state } = self;
        match run_pipeline(options, state) {
            Ok(runtime) => {
                transition(state, AssemblyState::Validated);
                info!(
                    "configuration assembled (environment={})",
                    runtime.environment()
                );
                Ok(runtime)
            }
            Err(err) => {
                error!("configuration assembly failed: {err}");
                transition(state, AssemblyState::Failed(err.to_string()));
                Err(err)
            }
        }
    }
}

impl RuntimeConfig {
    /// Assemble from the current process environment using compiled layers.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with_options(AssemblerOptions::from_process())
    }

    pub fn load_with_options(options: AssemblerOptions) -> Result<Self, ConfigError> {
        ConfigAssembler::new(options).assemble()
    }
}

fn run_pipeline(
    options: &AssemblerOptions,
    state: &mut AssemblyState,
) -> Result<RuntimeConfig, ConfigError> {
    check_required_variables(options.required_variables, &options.env)?;
    transition(state, AssemblyState::VariablesChecked);

    let environment = options
        .environment
        .unwrap_or_else(|| Environment::resolve(&options.env));
    let available = match &options.layers {
        Some(available) => Cow::Borrowed(available),
        None => Cow::Owned(EnvironmentLayers::compiled(&options.env)),
    };
    let environment_layer = select_layer(environment, &available);
    transition(state, AssemblyState::LayersSelected(environment));

    let defaults = match &options.defaults {
        Some(defaults) => Cow::Borrowed(defaults),
        None => Cow::Owned(layers::module_defaults(&options.env, environment)),
    };
    let mut merged = merge(&defaults, environment_layer);
    if let Some(overrides) =
        overrides::caller_overrides(&options.override_paths, options.overrides.as_ref())?
    {
        merged = merge(&merged, &overrides);
    }
    pin_environment(&mut merged, environment);
    transition(state, AssemblyState::Merged);

    let tree = validate(&merged, app_schema())?;
    let config: AppConfig = serde_json::from_value(tree.clone())?;
    Ok(RuntimeConfig::new(config, tree, environment))
}

/// `server.nodeEnv` always reports the environment the tree was built for.
fn pin_environment(tree: &mut Value, environment: Environment) {
    if let Some(server) = tree.get_mut("server").and_then(Value::as_object_mut) {
        server.insert(
            "nodeEnv".to_string(),
            Value::String(environment.as_str().to_string()),
        );
    }
}

fn transition(state: &mut AssemblyState, next: AssemblyState) {
    debug!("config assembly transition ({:?} -> {:?})", state, next);
    *state = next;
}
