//! Layered startup configuration for the warden server.
//!
//! This crate owns the configuration schema, the environment variable guard,
//! layer merging and the one-shot assembly that produces an immutable
//! [`RuntimeConfig`] before the server starts.

mod env;
mod environment;
mod error;
mod layers;
mod loader;
mod model;
mod redact;
mod runtime;
pub mod schema;

/// Environment snapshot and `.env` loading.
pub use env::{DOTENV_DISABLED, EnvVars};
/// Environment names and override-layer selection.
pub use environment::{Environment, EnvironmentLayers, NODE_ENV, select_layer};
/// Public error types returned by assembly and validation.
pub use error::{ConfigError, ValidationErrors, Violation};
/// Compiled module defaults and environment layers.
pub use layers::{environment_layer, module_defaults};
/// Assembler, guard and merge primitives.
pub use loader::{
    AssemblerOptions, AssemblyState, ConfigAssembler, Layer, REQUIRED_VARIABLES,
    check_required_variables, merge, merge_all,
};
/// Configuration models.
pub use model::*;
/// Secret redaction.
pub use redact::{DEFAULT_SECRET_PATTERNS, REDACTED, RedactionPolicy};
/// Validated configuration snapshot.
pub use runtime::RuntimeConfig;
