//! Boundary dataset download with bounded retry.
//!
//! Transient failures (connection errors, timeouts, HTTP 429 and 5xx) are
//! retried with exponential backoff. Other client errors fail immediately.
//! The file is streamed to a temporary path and renamed into place, so an
//! interrupted download never leaves a truncated archive behind.

use std::path::Path;
use std::time::Duration;

use futures::StreamExt as _;
use tokio::io::AsyncWriteExt as _;

use crate::BoundaryError;
use crate::progress::ProgressCallback;

const USER_AGENT: &str = concat!("residency-boundary/", env!("CARGO_PKG_VERSION"));

/// Download behaviour.
#[derive(Debug, Clone, Copy)]
pub struct DownloadOptions {
    /// Per-request timeout.
    pub timeout: Duration,
    /// Retries after the first attempt for transient failures.
    pub max_retries: u32,
}

/// Downloads `url` to `dest`, returning the number of bytes written.
///
/// # Errors
///
/// Returns [`BoundaryError`] if the request fails after all retries, the
/// server returns a permanent error status, or the file cannot be written.
pub async fn download_file(
    url: &str,
    dest: &Path,
    options: DownloadOptions,
    progress: &dyn ProgressCallback,
) -> Result<u64, BoundaryError> {
    log::info!("Downloading {url}");
    log::info!("  -> {}", dest.display());

    if let Some(parent) = dest.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| BoundaryError::io(parent, e))?;
    }

    let client = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(options.timeout)
        .build()?;

    let mut attempt = 0;
    loop {
        match download_once(&client, url, dest, progress).await {
            Ok(bytes) => return Ok(bytes),
            Err(e) if e.is_transient() && attempt < options.max_retries => {
                attempt += 1;
                let delay = Duration::from_secs(1u64 << attempt);
                log::warn!(
                    "  download failed ({e}), retry {attempt}/{} in {delay:?}...",
                    options.max_retries
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}

async fn download_once(
    client: &reqwest::Client,
    url: &str,
    dest: &Path,
    progress: &dyn ProgressCallback,
) -> Result<u64, BoundaryError> {
    let response = client.get(url).send().await?;

    if !response.status().is_success() {
        return Err(BoundaryError::HttpStatus {
            url: url.to_string(),
            status: response.status().as_u16(),
        });
    }

    if let Some(size) = response.content_length() {
        #[allow(clippy::cast_precision_loss)]
        let mb = size as f64 / 1_048_576.0;
        log::info!("  file size: {mb:.1} MB");
        progress.set_total(size);
    }
    progress.set_message("Downloading boundary".to_string());

    let tmp_path = dest.with_extension("part");
    let mut file = tokio::fs::File::create(&tmp_path)
        .await
        .map_err(|e| BoundaryError::io(&tmp_path, e))?;

    let mut stream = response.bytes_stream();
    let mut downloaded: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk)
            .await
            .map_err(|e| BoundaryError::io(&tmp_path, e))?;
        downloaded += chunk.len() as u64;
        progress.inc(chunk.len() as u64);
    }

    file.flush()
        .await
        .map_err(|e| BoundaryError::io(&tmp_path, e))?;
    drop(file);

    tokio::fs::rename(&tmp_path, dest)
        .await
        .map_err(|e| BoundaryError::io(dest, e))?;

    #[allow(clippy::cast_precision_loss)]
    let mb = downloaded as f64 / 1_048_576.0;
    log::info!("  download complete: {mb:.1} MB");
    progress.finish(format!("Downloaded {mb:.1} MB"));

    Ok(downloaded)
}
