//! Compiled configuration data: module defaults and environment layers.
//!
//! Values are read from an [`EnvVars`](crate::EnvVars) snapshot where a
//! deployment can override them; everything else is fixed data.

mod defaults;
mod environments;

pub use defaults::module_defaults;
pub use environments::environment_layer;
