//! `warden` binary: assemble the startup configuration and report on it.

use anyhow::Context;
use clap::Parser;
use log::{error, info};
use std::process::ExitCode;
use warden_rs::cli::{Cli, execute, render_failure};
use warden_rs::config::EnvVars;

fn main() -> ExitCode {
    warden_rs::init_logging();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{err:#}");
            eprintln!("{}", render_failure(&err));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<String> {
    if cli.command.args().no_dotenv {
        info!("skipping dotenv loading (--no-dotenv)");
    } else if let Some(path) = EnvVars::load_dotenv().context("failed to load .env")? {
        info!("loaded environment file (path={})", path.display());
    }
    execute(cli, EnvVars::from_process())
}
