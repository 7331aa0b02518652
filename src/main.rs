//! # paperup
//!
//! **paperup** keeps a Paper Minecraft server jar in sync with the latest
//! stable build published by the PaperMC download API, for one pinned
//! Minecraft version line, and repoints the server start script at the
//! freshly downloaded jar.
//!
//! One invocation checks, downloads if needed, and exits; run it from cron or
//! just before the server starts. Runs against the same server directory must
//! be serialized by the caller — there is no locking.
//!
//! This CLI is built with [clap](https://docs.rs/clap).

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use paperup::{
    DEFAULT_API_BASE, PaperApi, ScriptStatus, UpdateError, UpdateOptions, UpdateOutcome,
    load_config, run_update,
};
use std::path::PathBuf;
use std::process::ExitCode;

/// Command-line interface definition.
///
/// Parsed using `clap` derive macros.
#[derive(Parser, Debug)]
#[command(
    name = "paperup",
    version,
    about = "paperup - keep a Paper Minecraft server on the latest stable build"
)]
struct Cli {
    /// Full path to the directory where the server files reside
    #[arg(long, value_name = "DIR")]
    server_dir: String,

    /// Minecraft version line to track (e.g. 1.20.4); may also be pinned in
    /// paperup.toml inside the server dir
    #[arg(long, value_name = "VERSION")]
    minecraft_version: Option<String>,

    /// Name of the server start script inside the server dir, including its
    /// file extension [default: start_noupdate.sh]
    #[arg(long, value_name = "FILE")]
    start_script_name: Option<String>,

    /// Remove superseded jars of the tracked version line after a successful
    /// update
    #[arg(long)]
    prune: bool,

    /// Override the PaperMC API base URL
    #[arg(long, value_name = "URL", hide = true)]
    api_base: Option<String>,
}

/// CLI entry point.
///
/// Failure classes exit distinguishably: 2 transport, 3 no eligible build,
/// 4 filesystem, 1 anything else. A missing start script is a warning, not a
/// failure.
fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(outcome) => {
            report(&outcome);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{} {err:#}", "error:".red());
            ExitCode::from(exit_code(&err))
        }
    }
}

fn run(cli: Cli) -> Result<UpdateOutcome> {
    let server_dir = PathBuf::from(shellexpand::tilde(&cli.server_dir).into_owned());
    let cfg = load_config(&server_dir)?.unwrap_or_default();

    let version = cli
        .minecraft_version
        .or(cfg.minecraft_version)
        .context("--minecraft-version is required (or pin it in paperup.toml)")?;
    let start_script = cli
        .start_script_name
        .or(cfg.start_script_name)
        .unwrap_or_else(|| "start_noupdate.sh".to_string());

    let api = PaperApi::new(cli.api_base.as_deref().unwrap_or(DEFAULT_API_BASE))?;
    let opts = UpdateOptions { server_dir, version, start_script, prune: cli.prune };
    Ok(run_update(&api, &opts)?)
}

/// Final one-line summary; progress lines were already printed along the way.
fn report(outcome: &UpdateOutcome) {
    if let UpdateOutcome::Updated { installed, script, .. } = outcome {
        match script {
            ScriptStatus::Rewritten => {
                println!("{} updated to build {installed}", "✔".green());
            }
            ScriptStatus::Missing => {
                println!(
                    "{} updated to build {installed} (start script untouched)",
                    "!".yellow()
                );
            }
        }
    }
}

fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<UpdateError>() {
        Some(UpdateError::Transport(_)) | Some(UpdateError::MissingLength { .. }) => 2,
        Some(UpdateError::NoEligibleBuild { .. }) => 3,
        Some(UpdateError::Filesystem { .. }) => 4,
        Some(UpdateError::ScriptNotFound { .. }) => 5,
        None => 1,
    }
}
