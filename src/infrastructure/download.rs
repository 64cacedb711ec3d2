// SPDX-License-Identifier: MPL-2.0
//! Streams a download to disk through a temporary file.
//!
//! The body is staged in a [`NamedTempFile`] before the destination is asked
//! for. The staging file is removed on every exit path (write error, dialog
//! cancelled) and only persisted to the chosen destination on success.

use crate::application::port::DownloadResponse;
use crate::domain::download::{self, DownloadName};
use crate::error::{Error, Result};
use futures_util::StreamExt;
use std::future::Future;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// How a download ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved(PathBuf),
    /// The user dismissed the destination dialog. Nothing was written.
    Cancelled,
}

/// Stages `response`, asks `choose_destination` for a path given the
/// suggested file name, and moves the staged file there.
pub async fn save_download<F, Fut>(response: DownloadResponse, choose_destination: F) -> Result<SaveOutcome>
where
    F: FnOnce(String) -> Fut,
    Fut: Future<Output = Option<PathBuf>>,
{
    save_download_in(&std::env::temp_dir(), response, choose_destination).await
}

/// [`save_download`] with the staging file created under `staging_dir`.
pub(crate) async fn save_download_in<F, Fut>(
    staging_dir: &Path,
    response: DownloadResponse,
    choose_destination: F,
) -> Result<SaveOutcome>
where
    F: FnOnce(String) -> Fut,
    Fut: Future<Output = Option<PathBuf>>,
{
    let DownloadName {
        file_name,
        appended_extension,
    } = download::resolve(
        response.content_disposition.as_deref(),
        response.content_type.as_deref(),
    );
    if let Some(extension) = appended_extension {
        log::debug!("download name completed with {extension}");
    }

    let mut staged = NamedTempFile::new_in(staging_dir)?;
    let mut body = response.body;
    let mut written: u64 = 0;
    while let Some(chunk) = body.next().await {
        let chunk = chunk.map_err(Error::from)?;
        staged.write_all(&chunk)?;
        written += chunk.len() as u64;
    }
    staged.flush()?;
    log::debug!("staged {written} bytes for {file_name}");

    let Some(destination) = choose_destination(file_name).await else {
        return Ok(SaveOutcome::Cancelled);
    };

    match staged.persist(&destination) {
        Ok(_) => {}
        // Rename fails across filesystems; fall back to a copy.
        Err(err) => {
            log::debug!("persist failed ({}), copying instead", err.error);
            std::fs::copy(err.file.path(), &destination)?;
        }
    }
    log::info!("download saved to {}", destination.display());
    Ok(SaveOutcome::Saved(destination))
}
