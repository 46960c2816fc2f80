use anyhow::{Context, Result};
use log::debug;
use std::path::PathBuf;
use std::time::Duration;

use crate::fabric;
use crate::modrinth::{DEFAULT_API_URL, PROJECT_SLUG};
use crate::runtime::Runtime;

/// Delay before exiting when the user declines the install.
pub const DECLINE_DELAY: Duration = Duration::from_secs(2);

/// Values given on the command line or through `OFFINSTALLER_*` variables.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub api_url: Option<String>,
    pub game_dir: Option<PathBuf>,
    pub downloads_dir: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
    pub fabric_installer_url: Option<String>,
    pub no_fuzzy: bool,
}

/// Resolved settings for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_url: String,
    pub project: String,
    /// Web page of the modpack.
    pub page_url: String,
    /// URI handled by the Modrinth desktop app.
    pub app_uri: String,
    /// Directory offered by the install prompt.
    pub default_game_dir: PathBuf,
    /// Parent folder of exported modpacks.
    pub downloads_dir: PathBuf,
    pub log_dir: PathBuf,
    /// Where the Fabric installer jar is downloaded from.
    pub fabric_installer_url: String,
    pub fuzzy: bool,
    pub decline_delay: Duration,
}

impl Config {
    #[tracing::instrument(skip(runtime))]
    pub fn load<R: Runtime>(runtime: &R, overrides: ConfigOverrides) -> Result<Self> {
        let home = runtime
            .home_dir()
            .context("Could not find home directory")?;

        let config = Self {
            api_url: overrides
                .api_url
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            project: PROJECT_SLUG.to_string(),
            page_url: format!("https://modrinth.com/modpack/{}", PROJECT_SLUG),
            app_uri: format!("modrinth://modpack/{}", PROJECT_SLUG),
            default_game_dir: overrides
                .game_dir
                .unwrap_or_else(|| home.join(".minecraft")),
            downloads_dir: overrides
                .downloads_dir
                .unwrap_or_else(|| home.join("Downloads")),
            log_dir: overrides
                .log_dir
                .unwrap_or_else(|| home.join("offinstaller-logs")),
            fabric_installer_url: overrides
                .fabric_installer_url
                .unwrap_or_else(fabric::installer_url),
            fuzzy: !overrides.no_fuzzy,
            decline_delay: DECLINE_DELAY,
        };
        debug!("Loaded config: {:?}", config);
        Ok(config)
    }
}
