//! Process entry surface for the warden server.
//!
//! Re-exports the configuration crate and provides the logging setup and
//! command handling used by the `warden` binary.

/// Re-export for convenience.
pub use warden_rs_config as config;

pub mod cli;

#[inline]
/// Initialize logging using env_logger.
///
/// Honors `RUST_LOG` and falls back to the `info` filter. Binaries are expected
/// to call this before assembling configuration so assembly logs are visible.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .try_init();
}
