use std::path::PathBuf;
use thiserror::Error;

/// Failure classes for an update run.
///
/// Resolution-phase failures (listing, size probe, directory scan) happen
/// before anything is written, so the server directory is left exactly as
/// found. Mutation-phase failures may leave an already installed jar in
/// place; it is never rolled back.
#[derive(Debug, Error)]
pub enum UpdateError {
    /// A remote request could not be completed or returned a non-success
    /// status.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The size probe gave no usable `Content-Length`.
    #[error("no content length declared for {url}")]
    MissingLength { url: String },

    /// The listing has zero stable-channel builds for the version line.
    #[error("no stable builds available for minecraft {version}")]
    NoEligibleBuild { version: String },

    /// The start script is missing. Non-fatal: the jar install stands and the
    /// caller reports this as a warning.
    #[error("start script not found: {}", path.display())]
    ScriptNotFound { path: PathBuf },

    #[error("filesystem error at {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl UpdateError {
    pub(crate) fn fs(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        UpdateError::Filesystem { path: path.into(), source }
    }
}
