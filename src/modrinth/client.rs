//! Modrinth API implementation of [`VersionSource`].

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;

use crate::http::HttpClient;

use super::{VersionRecord, VersionSource};

pub struct ModrinthSource {
    http_client: HttpClient,
    api_url: String,
}

impl ModrinthSource {
    /// Create from an existing HttpClient.
    pub fn from_http_client(http_client: HttpClient, api_url: &str) -> Self {
        Self {
            http_client,
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn versions_url(&self, project: &str) -> String {
        format!("{}/project/{}/version", self.api_url, project)
    }

    pub fn version_url(&self, id: &str) -> String {
        format!("{}/version/{}", self.api_url, id)
    }
}

#[async_trait]
impl VersionSource for ModrinthSource {
    #[tracing::instrument(skip(self))]
    async fn list_versions(&self, project: &str) -> Result<Vec<VersionRecord>> {
        let url = self.versions_url(project);
        debug!("Fetching versions from {}...", url);
        self.http_client
            .get_json(&url)
            .await
            .with_context(|| format!("Failed to fetch versions of {}", project))
    }

    #[tracing::instrument(skip(self))]
    async fn get_version(&self, id: &str) -> Result<VersionRecord> {
        let url = self.version_url(id);
        debug!("Fetching version detail from {}...", url);
        self.http_client
            .get_json(&url)
            .await
            .with_context(|| format!("Failed to fetch version {}", id))
    }
}
