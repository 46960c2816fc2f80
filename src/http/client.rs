//! HTTP client with error classification. Every request is a single attempt.

use anyhow::{Context, Result};
use indicatif::ProgressBar;
use log::debug;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::io::Write;

use super::error::classify_error;
use crate::error::InstallerError;

#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Creates a new HTTP client wrapping the given reqwest Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Performs a GET request and returns the body as text.
    /// An empty (or whitespace-only) body is an [`InstallerError::EmptyResponse`].
    #[tracing::instrument(skip(self))]
    pub async fn get_text(&self, url: &str) -> Result<String> {
        debug!("GET {}...", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", url))?;

        let response = response.error_for_status().map_err(classify_error)?;

        let body = response
            .text()
            .await
            .context("Failed to read response body")?;

        if body.trim().is_empty() {
            return Err(InstallerError::EmptyResponse(url.to_string()).into());
        }

        Ok(body)
    }

    /// Performs a GET request and deserializes the JSON response.
    #[tracing::instrument(skip(self))]
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let body = self.get_text(url).await?;
        serde_json::from_str(&body)
            .with_context(|| format!("Failed to parse JSON response from {}", url))
    }

    /// Downloads a URL into the writer produced by `create_writer`, advancing
    /// `progress` per chunk. The writer is only created once the server has
    /// answered successfully.
    #[tracing::instrument(skip(self, progress, create_writer))]
    pub async fn download_file<W, F>(
        &self,
        url: &str,
        progress: &ProgressBar,
        create_writer: F,
    ) -> Result<u64>
    where
        W: Write,
        F: FnOnce() -> Result<W>,
    {
        debug!("Downloading file from {}...", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to start download request")?;

        let mut response = response.error_for_status().map_err(classify_error)?;

        if let Some(len) = response.content_length() {
            progress.inc_length(len);
        }

        let mut writer = create_writer()?;
        let mut downloaded_bytes: u64 = 0;

        while let Some(chunk) = response
            .chunk()
            .await
            .context("Failed to read chunk from download stream")?
        {
            writer
                .write_all(&chunk)
                .context("Failed to write chunk to file")?;
            downloaded_bytes += chunk.len() as u64;
            progress.inc(chunk.len() as u64);
        }
        writer.flush().context("Failed to flush downloaded file")?;

        debug!(
            "Downloaded {:.2} MB",
            downloaded_bytes as f64 / (1024.0 * 1024.0)
        );

        Ok(downloaded_bytes)
    }
}
