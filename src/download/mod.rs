mod verify;

use crate::http::HttpClient;
use crate::runtime::Runtime;
use anyhow::{Context, Result};
use indicatif::ProgressBar;
use log::{info, warn};
use std::path::Path;

pub use verify::{Expected, verify_file};

/// Downloads a file from a URL to a temporary path.
#[tracing::instrument(skip(runtime, temp_path, http_client, progress))]
pub async fn download_file<R: Runtime>(
    runtime: &R,
    url: &str,
    temp_path: &Path,
    http_client: &HttpClient,
    progress: &ProgressBar,
) -> Result<u64> {
    info!("Downloading file from {}...", url);

    let bytes = http_client
        .download_file(url, progress, || {
            runtime
                .create_file(temp_path)
                .with_context(|| format!("Failed to create temporary file at {:?}", temp_path))
        })
        .await?;

    info!("Download complete.");
    Ok(bytes)
}

/// Download then verify. A partial download, or a file that fails
/// verification, is removed before the error is returned.
#[tracing::instrument(skip(runtime, temp_path, http_client, expected, progress))]
pub async fn download_verified<R: Runtime>(
    runtime: &R,
    url: &str,
    temp_path: &Path,
    http_client: &HttpClient,
    expected: &Expected,
    progress: &ProgressBar,
) -> Result<u64> {
    let result = match download_file(runtime, url, temp_path, http_client, progress).await {
        Ok(bytes) => verify_file(runtime, temp_path, expected).map(|()| bytes),
        Err(e) => Err(e),
    };

    if result.is_err() && runtime.exists(temp_path) {
        discard(runtime, temp_path);
    }
    result
}

/// Remove a temporary file, logging instead of failing.
pub fn discard<R: Runtime>(runtime: &R, temp_path: &Path) {
    if let Err(e) = runtime.remove_file(temp_path) {
        warn!("Failed to remove {:?}: {}", temp_path, e);
    }
}
