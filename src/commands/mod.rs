//! The interactive flows behind the platform menu.

use anyhow::Result;
use log::debug;

use crate::{probe::probe, runtime::Runtime, session::SessionLog};

pub mod config;
mod export;
mod install_local;
mod installer;
mod open_page;
pub mod services;

pub use installer::{Installer, Outcome};

use config::{Config, ConfigOverrides};
use services::Services;

/// Probe the environment, show the menu and run the chosen action.
#[tracing::instrument(skip(runtime, overrides))]
pub async fn run<R: Runtime>(runtime: R, overrides: ConfigOverrides) -> Result<Outcome> {
    let config = Config::load(&runtime, overrides)?;
    let services = Services::from_config(&config)?;
    debug!("Using API {}", config.api_url);

    let session = SessionLog::new();
    session.comment("Starting OptiFine for Fabric installer");
    let capabilities = probe(&runtime, config.fuzzy, &session);

    let installer = Installer::new(
        runtime,
        services.source,
        services.http_client,
        config,
        capabilities,
        session,
    );
    installer.run().await
}
