//! Bundle tracked dotfiles into a zip archive.
//!
//! Archiving is two steps: stage one symlink per record inside a fresh
//! temporary directory, then run the external `zip` command over that
//! directory in the background. Staging failures are synchronous; the
//! subprocess result comes back through a completion channel so the event
//! loop never blocks on it.

use crate::store::DotfileRecord;
use std::io;
use std::os::unix::fs::symlink;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::sync::mpsc::Sender;
use thiserror::Error;
use tokio::runtime::Handle;
use tracing::{error, info};

/// Archive file name, placed under the user's home directory.
pub const ARCHIVE_FILE_NAME: &str = "dotfiles.zip";

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("failed to create a staging directory")]
    Staging(#[source] io::Error),
    #[error("failed to link {name} into the staging directory")]
    Link {
        name: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to launch the zip command")]
    Spawn(#[source] io::Error),
    #[error("zip exited with {status}: {stderr}")]
    Failed { status: ExitStatus, stderr: String },
}

/// Outcome of an archive job; carries the output path on success.
pub type ArchiveResult = Result<PathBuf, ArchiveError>;

/// Where the archive lands; overwritten on every successful run.
pub fn archive_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(ARCHIVE_FILE_NAME)
}

/// Create a staging directory holding one symlink per record.
///
/// The first link failure aborts the whole operation; the partial staging
/// directory is left behind. The directory is also kept on success since
/// the zip subprocess reads it after this call returns.
pub fn stage(records: &[DotfileRecord]) -> Result<PathBuf, ArchiveError> {
    let staging = tempfile::Builder::new()
        .prefix("dotzip-")
        .tempdir()
        .map_err(ArchiveError::Staging)?
        .keep();
    for record in records {
        let link = staging.join(&record.name);
        symlink(&record.path, &link).map_err(|source| ArchiveError::Link {
            name: record.name.clone(),
            source,
        })?;
    }
    Ok(staging)
}

/// Stage `records` and run the zip command in the background.
///
/// Staging failures are returned directly and no subprocess is launched.
/// Once launched, the job runs to completion and its result is sent to
/// `done`; there is no cancellation.
pub fn spawn(
    handle: &Handle,
    records: &[DotfileRecord],
    done: Sender<ArchiveResult>,
) -> Result<(), ArchiveError> {
    let staging = stage(records)?;
    let output = archive_path();
    info!(staging = %staging.display(), output = %output.display(), "archiving dotfiles");
    handle.spawn(async move {
        let result = match run_zip(&output, &staging).await {
            Ok(()) => Ok(output),
            Err(err) => {
                error!(%err, "archive job failed");
                Err(err)
            }
        };
        // The receiver only goes away when the app is shutting down.
        let _ = done.send(result);
    });
    Ok(())
}

async fn run_zip(output: &Path, staging: &Path) -> Result<(), ArchiveError> {
    // Output is captured rather than inherited so a failing zip does not
    // scribble over the full-screen frame; its stderr is replayed once the
    // app drops out of the alternate screen.
    let out = tokio::process::Command::new("zip")
        .arg("-r")
        .arg(output)
        .arg(staging)
        .output()
        .await
        .map_err(ArchiveError::Spawn)?;
    if out.status.success() {
        Ok(())
    } else {
        Err(ArchiveError::Failed {
            status: out.status,
            stderr: String::from_utf8_lossy(&out.stderr).trim().to_string(),
        })
    }
}
