//! Desktop integration: handing URIs to the platform opener.

use anyhow::{Context, Result};

use super::RealRuntime;

impl RealRuntime {
    #[tracing::instrument(skip(self))]
    pub(crate) fn open_uri_impl(&self, uri: &str) -> Result<()> {
        open::that(uri).with_context(|| format!("Failed to open {}", uri))
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn open_browser_impl(&self, url: &str) -> Result<()> {
        webbrowser::open(url).with_context(|| format!("Failed to open {} in a browser", url))
    }
}
