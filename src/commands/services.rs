//! Construction of the HTTP client and the Modrinth source.

use anyhow::Result;
use log::debug;
use reqwest::Client;

use crate::{error::InstallerError, http::HttpClient, modrinth::ModrinthSource};

use super::config::Config;

/// `offinstaller/<version>`
pub fn user_agent() -> String {
    format!("offinstaller/{}", env!("OFFINSTALLER_VERSION"))
}

/// Build the HTTP client. Failing to set it up means the installer cannot work at all.
pub fn build_http_client() -> Result<HttpClient> {
    let client = Client::builder()
        .user_agent(user_agent())
        .build()
        .map_err(|e| InstallerError::MissingTool(format!("HTTP client ({})", e)))?;
    debug!("HTTP client ready");
    Ok(HttpClient::new(client))
}

pub struct Services {
    pub source: ModrinthSource,
    pub http_client: HttpClient,
}

impl Services {
    pub fn from_config(config: &Config) -> Result<Self> {
        let http_client = build_http_client()?;
        let source = ModrinthSource::from_http_client(http_client.clone(), &config.api_url);
        Ok(Self {
            source,
            http_client,
        })
    }
}
