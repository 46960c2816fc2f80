//! Modrinth project versions.
//!
//! The installer talks to two endpoints of the Modrinth v2 API: the list of
//! versions of a project and the detail record of a single version. Both
//! return the same record shape, modelled by [`VersionRecord`].

mod client;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use client::ModrinthSource;

/// Default Modrinth API root.
pub const DEFAULT_API_URL: &str = "https://api.modrinth.com/v2";

/// The one project this installer handles.
pub const PROJECT_SLUG: &str = "optifine-for-fabric";

/// Release channel of a version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum VersionChannel {
    #[default]
    Release,
    Beta,
    Alpha,
}

impl VersionChannel {
    /// Suffix appended to names and display lines; empty for releases.
    pub fn tag(&self) -> &'static str {
        match self {
            VersionChannel::Release => "",
            VersionChannel::Beta => " [Beta]",
            VersionChannel::Alpha => " [Alpha]",
        }
    }
}

impl fmt::Display for VersionChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionChannel::Release => write!(f, "release"),
            VersionChannel::Beta => write!(f, "beta"),
            VersionChannel::Alpha => write!(f, "alpha"),
        }
    }
}

/// Hashes Modrinth publishes for a file, hex encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct FileHashes {
    #[serde(default)]
    pub sha1: Option<String>,
    #[serde(default)]
    pub sha512: Option<String>,
}

/// A downloadable file attached to a version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionFile {
    pub url: String,
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub primary: bool,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub hashes: FileHashes,
}

/// One published version of the project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionRecord {
    pub id: String,
    pub version_number: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub version_type: VersionChannel,
    #[serde(default)]
    pub game_versions: Vec<String>,
    #[serde(default)]
    pub loaders: Vec<String>,
    #[serde(default)]
    pub files: Vec<VersionFile>,
}

impl VersionRecord {
    /// The first file of the record, which is the one the install flow places.
    pub fn first_file(&self) -> Option<&VersionFile> {
        self.files.first()
    }

    /// The modpack archive of the record, if it ships one.
    pub fn mrpack_file(&self) -> Option<&VersionFile> {
        self.files
            .iter()
            .find(|f| f.filename.to_lowercase().ends_with(".mrpack"))
    }
}

/// Read access to a project's versions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VersionSource: Send + Sync {
    /// Fetch every published version of a project.
    async fn list_versions(&self, project: &str) -> Result<Vec<VersionRecord>>;

    /// Fetch the detail record of one version.
    async fn get_version(&self, id: &str) -> Result<VersionRecord>;
}
