//! Install target layout and file placement.

use anyhow::{Context, Result, anyhow};
use log::{debug, warn};
use std::path::{Path, PathBuf};
use url::Url;

use crate::runtime::Runtime;

/// Placeholder state directory created inside the install target.
pub const STATE_DIR_NAME: &str = ".optifine-installer";

/// Files the official launcher leaves in a game directory.
const LAUNCHER_MARKERS: &[&str] = &[
    "launcher_profiles.json",
    "launcher_accounts.json",
    "launcher_profiles.json.old",
];

/// A game directory the installer places files into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallTarget {
    root: PathBuf,
}

impl InstallTarget {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn mods_dir(&self) -> PathBuf {
        self.root.join("mods")
    }

    pub fn state_dir(&self) -> PathBuf {
        self.root.join(STATE_DIR_NAME)
    }

    /// Create `mods` and the state directory if absent.
    #[tracing::instrument(skip(runtime))]
    pub fn prepare<R: Runtime>(&self, runtime: &R) -> Result<()> {
        for dir in [self.mods_dir(), self.state_dir()] {
            runtime
                .create_dir_all(&dir)
                .with_context(|| format!("Could not create {}", dir.display()))?;
        }
        Ok(())
    }

    /// Whether the official launcher has been run against this directory.
    pub fn has_launcher<R: Runtime>(&self, runtime: &R) -> bool {
        LAUNCHER_MARKERS
            .iter()
            .any(|marker| runtime.exists(&self.root.join(marker)))
    }
}

/// A downloadable file and the name it is stored under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub url: String,
    pub name: String,
}

impl Artifact {
    /// Derive the file name from the last path segment of `url`.
    pub fn from_url(url: &str) -> Result<Self> {
        let parsed = Url::parse(url).with_context(|| format!("Invalid file URL: {}", url))?;
        let name = parsed
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .filter(|segment| !segment.is_empty())
            .ok_or_else(|| anyhow!("File URL has no file name: {}", url))?;

        Ok(Self {
            url: url.to_string(),
            name: name.to_string(),
        })
    }

    /// Where the artifact ends up for a given target.
    pub fn destination(&self, target: &InstallTarget) -> PathBuf {
        target.mods_dir().join(&self.name)
    }
}

/// Move `from` to `to`, falling back to copy + delete when a rename is not possible
/// (e.g. the temporary directory is on another file system).
#[tracing::instrument(skip(runtime))]
pub fn place_file<R: Runtime>(runtime: &R, from: &Path, to: &Path) -> Result<()> {
    if let Err(e) = runtime.rename(from, to) {
        debug!("Rename failed ({}), copying instead", e);
        runtime
            .copy(from, to)
            .with_context(|| format!("Failed to move {} to {}", from.display(), to.display()))?;
        if let Err(e) = runtime.remove_file(from) {
            warn!("Failed to remove temporary file {:?}: {}", from, e);
        }
    }
    Ok(())
}

/// Turn user input into a directory path: empty means `default`, a leading `~`
/// is the home directory.
pub fn resolve_dir_input<R: Runtime>(runtime: &R, input: &str, default: &Path) -> PathBuf {
    let input = input.trim();
    if input.is_empty() {
        return default.to_path_buf();
    }

    if input == "~" {
        if let Some(home) = runtime.home_dir() {
            return home;
        }
    } else if let Some(rest) = input
        .strip_prefix("~/")
        .or_else(|| input.strip_prefix("~\\"))
        && let Some(home) = runtime.home_dir()
    {
        return home.join(rest);
    }

    PathBuf::from(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MockRuntime;
    use crate::test_utils::{test_home, test_target};
    use mockall::predicate::eq;

    #[test]
    fn test_artifact_name_from_url() {
        let artifact =
            Artifact::from_url("https://cdn.modrinth.com/data/x/versions/y/artifact-1.2.3.jar")
                .unwrap();
        assert_eq!(artifact.name, "artifact-1.2.3.jar");

        let target = InstallTarget::new(test_target());
        assert_eq!(
            artifact.destination(&target),
            test_target().join("mods").join("artifact-1.2.3.jar")
        );
    }

    #[test]
    fn test_artifact_ignores_query_string() {
        let artifact = Artifact::from_url("https://cdn.example/a/pack.mrpack?token=1").unwrap();
        assert_eq!(artifact.name, "pack.mrpack");
    }

    #[test]
    fn test_artifact_without_file_name() {
        assert!(Artifact::from_url("https://cdn.example/").is_err());
        assert!(Artifact::from_url("https://cdn.example/dir/").is_err());
        assert!(Artifact::from_url("not a url").is_err());
    }

    #[test]
    fn test_target_layout() {
        let target = InstallTarget::new(test_target());
        assert_eq!(target.mods_dir(), test_target().join("mods"));
        assert_eq!(target.state_dir(), test_target().join(".optifine-installer"));
    }

    #[test]
    fn test_prepare_creates_both_directories() {
        let target = InstallTarget::new(test_target());
        let mut runtime = MockRuntime::new();
        runtime
            .expect_create_dir_all()
            .with(eq(test_target().join("mods")))
            .times(1)
            .returning(|_| Ok(()));
        runtime
            .expect_create_dir_all()
            .with(eq(test_target().join(".optifine-installer")))
            .times(1)
            .returning(|_| Ok(()));

        target.prepare(&runtime).unwrap();
    }

    #[test]
    fn test_has_launcher() {
        let target = InstallTarget::new(test_target());
        let mut runtime = MockRuntime::new();
        let marker = test_target().join("launcher_accounts.json");
        runtime.expect_exists().returning(move |p| p == marker);

        assert!(target.has_launcher(&runtime));

        let mut empty = MockRuntime::new();
        empty.expect_exists().returning(|_| false);
        assert!(!target.has_launcher(&empty));
    }

    #[test]
    fn test_place_file_falls_back_to_copy() {
        let from = PathBuf::from("/tmp/a.jar.part");
        let to = test_target().join("mods/a.jar");
        let mut runtime = MockRuntime::new();
        runtime
            .expect_rename()
            .times(1)
            .returning(|_, _| Err(anyhow!("cross-device link")));
        runtime
            .expect_copy()
            .with(eq(from.clone()), eq(to.clone()))
            .times(1)
            .returning(|_, _| Ok(5));
        runtime
            .expect_remove_file()
            .with(eq(from.clone()))
            .times(1)
            .returning(|_| Ok(()));

        place_file(&runtime, &from, &to).unwrap();
    }

    #[test]
    fn test_resolve_dir_input() {
        let mut runtime = MockRuntime::new();
        runtime.expect_home_dir().returning(|| Some(test_home()));
        let default = test_home().join(".minecraft");

        assert_eq!(resolve_dir_input(&runtime, "", &default), default);
        assert_eq!(resolve_dir_input(&runtime, "   ", &default), default);
        assert_eq!(resolve_dir_input(&runtime, "~", &default), test_home());
        assert_eq!(
            resolve_dir_input(&runtime, "~/games/mc", &default),
            test_home().join("games/mc")
        );
        assert_eq!(
            resolve_dir_input(&runtime, " /srv/mc ", &default),
            PathBuf::from("/srv/mc")
        );
    }
}
