//! Modrinth modpack archives (`.mrpack`).
//!
//! A modpack is a zip file holding a `modrinth.index.json` manifest that
//! lists remote files, plus an optional `overrides/` tree copied as is.

mod extract;

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::download::Expected;
use crate::fabric::LoaderRequest;
use crate::modrinth::{FileHashes, VersionChannel};
use crate::runtime::Runtime;

pub use extract::{CopyReport, copy_overrides, extract_archive, find_index};

pub const INDEX_FILE_NAME: &str = "modrinth.index.json";
pub const OVERRIDES_DIR: &str = "overrides";

/// Dependency keys naming the Fabric loader version, in lookup order.
const LOADER_KEYS: &[&str] = &["fabric-loader", "fabric_loader", "loader"];
const MINECRAFT_KEYS: &[&str] = &["minecraft", "minecraft_version"];

/// Characters that are not allowed in folder names on common file systems.
const FORBIDDEN_NAME_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModpackIndex {
    #[serde(default)]
    pub format_version: Option<u32>,
    #[serde(default)]
    pub game: Option<String>,
    #[serde(default)]
    pub version_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub files: Vec<IndexFile>,
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexFile {
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub downloads: Vec<String>,
    #[serde(default)]
    pub hashes: FileHashes,
    #[serde(default)]
    pub file_size: Option<u64>,
}

/// A file of the index resolved against a destination folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedFile {
    pub url: String,
    pub relative: String,
    pub target: PathBuf,
    pub expected: Expected,
}

impl IndexFile {
    /// First mirror, or the plain `url` field some packs use instead.
    pub fn download_url(&self) -> Option<&str> {
        self.downloads
            .first()
            .map(String::as_str)
            .or(self.url.as_deref())
            .filter(|url| !url.is_empty())
    }

    /// `path`, else `filename`, else the last segment of the download URL.
    pub fn relative_path(&self) -> Option<String> {
        self.path
            .clone()
            .or_else(|| self.filename.clone())
            .or_else(|| {
                self.download_url()
                    .and_then(|url| url.rsplit('/').next())
                    .map(str::to_string)
            })
            .filter(|p| !p.is_empty())
    }
}

impl ModpackIndex {
    #[tracing::instrument(skip(runtime))]
    pub fn load<R: Runtime>(runtime: &R, path: &Path) -> Result<Self> {
        let contents = runtime
            .read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse modpack index {}", path.display()))
    }

    fn dependency(&self, keys: &[&str]) -> Option<&str> {
        keys.iter()
            .find_map(|key| self.dependencies.get(*key))
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// The Fabric loader the pack depends on, with its Minecraft version if listed.
    pub fn loader_request(&self) -> Option<LoaderRequest> {
        let loader = self.dependency(LOADER_KEYS)?;
        Some(LoaderRequest {
            loader: loader.to_string(),
            minecraft: self.dependency(MINECRAFT_KEYS).map(str::to_string),
        })
    }

    /// Files with a download URL and a path that stays inside `dest`.
    /// The second element lists the relative paths that were rejected.
    pub fn plan(&self, dest: &Path) -> (Vec<PlannedFile>, Vec<String>) {
        let mut planned = Vec::new();
        let mut skipped = Vec::new();

        for file in &self.files {
            let (Some(url), Some(relative)) = (file.download_url(), file.relative_path()) else {
                skipped.push(file.path.clone().unwrap_or_default());
                continue;
            };
            match safe_join(dest, &relative) {
                Some(target) => planned.push(PlannedFile {
                    url: url.to_string(),
                    relative,
                    target,
                    expected: Expected {
                        size: file.file_size,
                        hashes: file.hashes.clone(),
                    },
                }),
                None => skipped.push(relative),
            }
        }

        (planned, skipped)
    }
}

/// Join a relative, `/` or `\` separated path onto `base`.
/// Absolute paths, drive prefixes and `..` components give `None`.
pub fn safe_join(base: &Path, relative: &str) -> Option<PathBuf> {
    let normalized = relative.trim().replace('\\', "/");
    if normalized.starts_with('/') {
        return None;
    }

    let mut joined = base.to_path_buf();
    let mut pushed = false;
    for part in normalized.split('/') {
        match part {
            "" | "." => continue,
            ".." => return None,
            p if p.contains(':') => return None,
            p => {
                joined.push(p);
                pushed = true;
            }
        }
    }

    pushed.then_some(joined)
}

/// Remove characters that cannot appear in a folder name.
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .filter(|c| !FORBIDDEN_NAME_CHARS.contains(c))
        .collect::<String>()
        .trim()
        .to_string()
}

/// The modpack's own version: what follows the last `+` of the version number.
pub fn format_modpack_version(version_number: &str) -> String {
    let version = version_number.trim();
    if version.is_empty() {
        return "unknown".to_string();
    }
    version
        .rsplit('+')
        .next()
        .unwrap_or(version)
        .trim()
        .to_string()
}

/// Folder name for an exported modpack version.
pub fn display_name(
    version_number: &str,
    game_versions: &[String],
    channel: VersionChannel,
) -> String {
    let name = format!(
        "OptiFine for Fabric {} [Minecraft {}]{}",
        format_modpack_version(version_number),
        game_versions.join(","),
        channel.tag()
    );
    sanitize_name(&name)
}
