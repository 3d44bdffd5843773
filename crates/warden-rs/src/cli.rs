//! Command-line interface for the `warden` binary.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use log::debug;
use std::path::PathBuf;
use warden_rs_config::{AssemblerOptions, EnvVars, Environment, RuntimeConfig};

/// Command-line options for the warden configuration tool.
#[derive(Debug, Parser)]
#[command(name = "warden", version, about = "Assemble and check warden startup configuration")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Supported subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Assemble the configuration and report whether it is valid
    Check {
        #[command(flatten)]
        args: AssembleArgs,
    },
    /// Assemble the configuration and print the final tree as JSON
    Print {
        #[command(flatten)]
        args: AssembleArgs,
        /// Print secrets instead of redacting them
        #[arg(long)]
        raw: bool,
    },
}

impl Command {
    /// Assembly arguments shared by every subcommand.
    pub fn args(&self) -> &AssembleArgs {
        match self {
            Self::Check { args } | Self::Print { args, .. } => args,
        }
    }
}

/// Options controlling a single assembly run.
#[derive(Debug, Clone, Default, Args)]
pub struct AssembleArgs {
    /// Environment to assemble for (defaults to NODE_ENV)
    #[arg(long = "env", value_name = "NAME", value_parser = parse_environment)]
    pub environment: Option<Environment>,
    /// JSON5 override file, applied after the environment layer (repeatable)
    #[arg(long = "override", value_name = "FILE")]
    pub overrides: Vec<PathBuf>,
    /// Do not load a .env file before reading the environment
    #[arg(long)]
    pub no_dotenv: bool,
}

impl AssembleArgs {
    /// Build assembler options over an environment snapshot.
    pub fn options(&self, env: EnvVars) -> AssemblerOptions {
        let mut options = AssemblerOptions::new(env);
        if let Some(environment) = self.environment {
            options = options.with_environment(environment);
        }
        self.overrides
            .iter()
            .fold(options, |options, path| options.with_override_path(path))
    }
}

/// Flag values ignore case but must name a known environment; only
/// `NODE_ENV` falls back to development.
fn parse_environment(name: &str) -> Result<Environment, String> {
    Environment::parse(&name.trim().to_ascii_lowercase()).ok_or_else(|| {
        let known: Vec<&str> = Environment::ALL.iter().map(|env| env.as_str()).collect();
        format!("unknown environment `{name}` (expected one of {})", known.join(", "))
    })
}

/// Run a parsed command against an environment snapshot and render its output.
pub fn execute(cli: &Cli, env: EnvVars) -> anyhow::Result<String> {
    let args = cli.command.args();
    debug!(
        "assembling configuration (environment={:?}, overrides={})",
        args.environment,
        args.overrides.len()
    );
    let runtime = RuntimeConfig::load_with_options(args.options(env))
        .context("failed to assemble configuration")?;

    match &cli.command {
        Command::Check { .. } => Ok(format!(
            "configuration ok (environment={})",
            runtime.environment()
        )),
        Command::Print { raw: true, .. } => {
            serde_json::to_string_pretty(runtime.tree()).context("failed to render configuration")
        }
        Command::Print { raw: false, .. } => {
            let redacted = runtime.redacted().context("failed to redact configuration")?;
            serde_json::to_string_pretty(&redacted).context("failed to render configuration")
        }
    }
}

/// Line written to stderr when a command fails, with the full context chain.
pub fn render_failure(err: &anyhow::Error) -> String {
    format!("error: {err:#}")
}
