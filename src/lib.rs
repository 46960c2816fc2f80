pub mod cleanup;
pub mod commands;
pub mod download;
pub mod error;
pub mod fabric;
pub mod http;
pub mod install;
pub mod menu;
pub mod modpack;
pub mod modrinth;
pub mod probe;
pub mod progress;
pub mod runtime;
pub mod select;
pub mod session;

/// Test utilities for cross-platform paths and common fixtures.
#[cfg(test)]
pub mod test_utils {
    use crate::commands::config::{Config, ConfigOverrides};
    use crate::modrinth::{FileHashes, VersionChannel, VersionFile, VersionRecord};
    use crate::runtime::{MockRuntime, RealRuntime, Runtime};
    use std::path::PathBuf;
    use std::time::Duration;

    /// Returns a test home directory path based on the platform.
    /// - Unix: `/home/user`
    /// - Windows: `C:\Users\user`
    pub fn test_home() -> PathBuf {
        #[cfg(not(windows))]
        {
            PathBuf::from("/home/user")
        }
        #[cfg(windows)]
        {
            PathBuf::from(r"C:\Users\user")
        }
    }

    /// Returns a test game directory based on the platform.
    /// - Unix: `/home/user/.minecraft`
    /// - Windows: `C:\Users\user\.minecraft`
    pub fn test_target() -> PathBuf {
        test_home().join(".minecraft")
    }

    /// Default configuration rooted at [`test_home`], without the decline delay.
    pub fn test_config() -> Config {
        let mut runtime = MockRuntime::new();
        runtime.expect_home_dir().returning(|| Some(test_home()));
        let mut config = Config::load(&runtime, ConfigOverrides::default())
            .expect("test config should load");
        config.decline_delay = Duration::ZERO;
        config
    }

    /// A release record with one file at `url`, named after its last path segment.
    pub fn record_with_file(id: &str, url: &str) -> VersionRecord {
        VersionRecord {
            id: id.to_string(),
            version_number: format!("1.21.1+{}", id),
            name: None,
            version_type: VersionChannel::Release,
            game_versions: vec!["1.21.1".to_string()],
            loaders: vec!["fabric".to_string()],
            files: vec![VersionFile {
                url: url.to_string(),
                filename: url.rsplit('/').next().unwrap_or_default().to_string(),
                primary: true,
                size: None,
                hashes: FileHashes::default(),
            }],
        }
    }

    /// Route the file system methods of a mock runtime to the real file system.
    /// Use with a `tempfile` directory.
    pub fn configure_mock_runtime_fs(runtime: &mut MockRuntime) {
        runtime
            .expect_write()
            .returning(|p, c| RealRuntime.write(p, c));
        runtime
            .expect_read_to_string()
            .returning(|p| RealRuntime.read_to_string(p));
        runtime
            .expect_rename()
            .returning(|from, to| RealRuntime.rename(from, to));
        runtime
            .expect_copy()
            .returning(|from, to| RealRuntime.copy(from, to));
        runtime
            .expect_create_dir_all()
            .returning(|p| RealRuntime.create_dir_all(p));
        runtime
            .expect_remove_file()
            .returning(|p| RealRuntime.remove_file(p));
        runtime
            .expect_remove_dir_all()
            .returning(|p| RealRuntime.remove_dir_all(p));
        runtime.expect_exists().returning(|p| RealRuntime.exists(p));
        runtime.expect_is_dir().returning(|p| RealRuntime.is_dir(p));
        runtime
            .expect_read_dir()
            .returning(|p| RealRuntime.read_dir(p));
        runtime
            .expect_file_size()
            .returning(|p| RealRuntime.file_size(p));
        runtime
            .expect_create_file()
            .returning(|p| RealRuntime.create_file(p));
        runtime.expect_open().returning(|p| RealRuntime.open(p));
    }
}
