mod api;
mod cleanup;
mod script;

pub use api::{DEFAULT_API_BASE, PaperApi, RemoteBuild};

use colored::Colorize;
use indicatif::{HumanBytes, ProgressBar};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::UpdateError;
use crate::progress::{bar_style, ok_style, spinner_style};
use crate::scan::latest_installed;

/// Inputs for one update run.
///
/// The server directory is assumed to be exclusively ours for the duration of
/// the run; concurrent runs against the same directory must be serialized by
/// the caller.
#[derive(Debug, Clone)]
pub struct UpdateOptions {
    pub server_dir: PathBuf,
    pub version: String,
    pub start_script: String,
    pub prune: bool,
}

/// What a run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The installed build is already the newest stable one; nothing was
    /// written.
    UpToDate { installed: u32 },
    /// A newer build was installed. `previous` is `None` on a fresh install.
    Updated {
        previous: Option<u32>,
        installed: u32,
        script: ScriptStatus,
    },
}

/// Whether the start script now references the new jar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptStatus {
    Rewritten,
    /// The script was not found; the jar install stands and the user has to
    /// repoint the script by hand.
    Missing,
}

/// Check for a newer stable build of `opts.version` and install it.
///
/// Process:
/// 1. Resolve the newest stable build from the remote listing.
/// 2. Scan the server directory for the newest installed build.
/// 3. If the remote build is not strictly newer, stop without writing
///    anything — a repeat run against an unchanged remote performs zero
///    filesystem mutation, and an equal build is never re-downloaded.
/// 4. Probe the declared download size, stream the jar into a temp file next
///    to its destination, and rename it into place.
/// 5. Repoint the start script at the new jar; a missing script is a warning,
///    not a failure (the installed jar is self-contained and stands).
/// 6. Optionally prune jars the new build supersedes.
pub fn run_update(api: &PaperApi, opts: &UpdateOptions) -> Result<UpdateOutcome, UpdateError> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(spinner_style());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb.set_message(format!("checking for updates to {}…", opts.version));

    let remote = api.resolve_latest(&opts.version)?;
    let installed = latest_installed(&opts.server_dir, &opts.version)?;

    if let Some(current) = installed
        && remote.build <= current
    {
        pb.set_style(ok_style());
        pb.finish_with_message(format!("no update available (current build: {current})"));
        return Ok(UpdateOutcome::UpToDate { installed: current });
    }

    // Probed only once an update is due, so a stale listing can never turn a
    // no-op run into a transport failure.
    let size = api.content_length(&remote)?;

    pb.set_style(ok_style());
    pb.finish_with_message(format!("update available: build {}", remote.build));
    println!("new build:       {}", remote.build);
    match installed {
        Some(b) => println!("installed build: {b}"),
        None => println!("installed build: none"),
    }
    println!("download size:   {}", HumanBytes(size));

    let jar_path = opts.server_dir.join(remote.jar_name());
    download_jar(api, &remote, size, &jar_path, &opts.server_dir)?;

    let script_path = opts.server_dir.join(&opts.start_script);
    let script = match script::repoint_script(&script_path, &remote.jar_name()) {
        Ok(()) => ScriptStatus::Rewritten,
        Err(UpdateError::ScriptNotFound { path }) => {
            eprintln!(
                "{} start script not found: {} (update it manually)",
                "!".yellow(),
                path.display()
            );
            ScriptStatus::Missing
        }
        Err(e) => return Err(e),
    };

    if opts.prune {
        let removed = cleanup::prune_old_jars(&opts.server_dir, &opts.version, remote.build)?;
        if removed > 0 {
            println!("pruned {removed} superseded jar(s)");
        }
    }

    Ok(UpdateOutcome::Updated { previous: installed, installed: remote.build, script })
}

/// Stream the jar into the server directory and rename it into place.
///
/// The temp file lives next to the destination, so the final rename is
/// atomic, and its name can never match the installed-jar pattern, so an
/// interrupted download is invisible to the scanner.
fn download_jar(
    api: &PaperApi,
    remote: &RemoteBuild,
    size: u64,
    jar_path: &Path,
    server_dir: &Path,
) -> Result<(), UpdateError> {
    let resp = api.download(remote)?;

    let pb = ProgressBar::new(size);
    pb.set_style(bar_style());
    pb.set_message(remote.jar_name());

    let mut tmp = tempfile::Builder::new()
        .prefix(".paper-")
        .suffix(".part")
        .tempfile_in(server_dir)
        .map_err(|e| UpdateError::fs(server_dir, e))?;

    io::copy(&mut pb.wrap_read(resp), &mut tmp.as_file())
        .map_err(|e| UpdateError::fs(jar_path, e))?;
    tmp.persist(jar_path).map_err(|e| UpdateError::fs(jar_path, e.error))?;

    pb.set_style(ok_style());
    pb.finish_with_message(format!("downloaded {}", remote.jar_name()));
    Ok(())
}
