//! Environment and system information operations.

use std::env;
use std::path::PathBuf;

use super::{RealRuntime, Runtime};

impl RealRuntime {
    #[tracing::instrument(skip(self))]
    pub(crate) fn env_var_impl(&self, key: &str) -> Result<String, env::VarError> {
        env::var(key)
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn home_dir_impl(&self) -> Option<PathBuf> {
        dirs::home_dir()
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn temp_dir_impl(&self) -> PathBuf {
        env::temp_dir()
    }
}

/// Search the directories listed in `PATH` for the first executable named in `names`.
pub fn find_in_path<R: Runtime + ?Sized>(runtime: &R, names: &[&str]) -> Option<PathBuf> {
    let path_var = runtime.env_var("PATH").ok()?;
    let dirs: Vec<PathBuf> = env::split_paths(&path_var).collect();

    names.iter().find_map(|name| {
        dirs.iter()
            .map(|dir| dir.join(name))
            .find(|candidate| runtime.exists(candidate))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MockRuntime;
    use mockall::predicate::eq;
    use std::path::Path;

    #[test]
    fn test_real_runtime_env_and_dirs() {
        let runtime = RealRuntime;

        // PATH should exist on all systems
        assert!(runtime.env_var("PATH").is_ok());

        let home = runtime.home_dir();
        assert!(home.is_some() || cfg!(target_os = "linux")); // CI might not have home

        let temp = runtime.temp_dir();
        assert!(temp.is_absolute() || cfg!(windows));
    }

    #[cfg(not(windows))]
    #[test]
    fn test_find_in_path_returns_first_match() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_env_var()
            .with(eq("PATH"))
            .returning(|_| Ok("/usr/local/bin:/usr/bin".to_string()));
        runtime
            .expect_exists()
            .returning(|p| p == Path::new("/usr/bin/gio"));

        let found = find_in_path(&runtime, &["xdg-open", "gio"]);

        assert_eq!(found, Some(PathBuf::from("/usr/bin/gio")));
    }

    #[test]
    fn test_find_in_path_without_path_variable() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_env_var()
            .with(eq("PATH"))
            .returning(|_| Err(env::VarError::NotPresent));

        assert_eq!(find_in_path(&runtime, &["xdg-open"]), None);
    }

    #[test]
    fn test_find_in_path_no_match() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_env_var()
            .with(eq("PATH"))
            .returning(|_| Ok("/bin".to_string()));
        runtime.expect_exists().returning(|_| false);

        assert_eq!(find_in_path(&runtime, &["xdg-open", "gio"]), None);
    }
}
