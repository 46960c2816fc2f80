use anyhow::Result;
use indicatif::ProgressBar;
use log::{debug, warn};
use std::path::Path;
use std::sync::Arc;

use crate::{
    cleanup::{CleanupGuard, SharedCleanupContext, new_shared, spawn_interrupt_watcher},
    download::{Expected, download_verified},
    error::InstallerError,
    http::HttpClient,
    menu::{PlatformChoice, choose_platform},
    modrinth::{VersionRecord, VersionSource},
    probe::Capabilities,
    runtime::Runtime,
    select::select_version,
    session::{SessionLog, pluralize},
};

use super::config::Config;

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

impl From<Outcome> for std::process::ExitCode {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Success => std::process::ExitCode::SUCCESS,
            Outcome::Failure => std::process::ExitCode::FAILURE,
        }
    }
}

/// Everything one interactive run needs.
pub struct Installer<R: Runtime, S: VersionSource> {
    pub(super) runtime: R,
    pub(super) source: S,
    pub(super) http_client: HttpClient,
    pub(super) config: Config,
    pub(super) capabilities: Capabilities,
    pub(super) session: SessionLog,
}

impl<R: Runtime, S: VersionSource> Installer<R, S> {
    pub fn new(
        runtime: R,
        source: S,
        http_client: HttpClient,
        config: Config,
        capabilities: Capabilities,
        session: SessionLog,
    ) -> Self {
        Self {
            runtime,
            source,
            http_client,
            config,
            capabilities,
            session,
        }
    }

    pub fn session(&self) -> &SessionLog {
        &self.session
    }

    /// Show the menu and run the chosen action.
    #[tracing::instrument(skip(self))]
    pub async fn run(&self) -> Result<Outcome> {
        let choice = choose_platform(&self.runtime, &self.session)?;
        debug!("Platform choice: {:?}", choice);

        match choice {
            PlatformChoice::Quit => {
                self.session.comment("Nothing to do; bye");
                Ok(Outcome::Success)
            }
            PlatformChoice::OpenPage => {
                self.open_page();
                Ok(Outcome::Success)
            }
            PlatformChoice::Install => {
                let result = self.install().await;
                Ok(self.finish(result))
            }
            PlatformChoice::DownloadModpack => {
                let result = self.download_modpack().await;
                Ok(self.finish(result))
            }
        }
    }

    /// Record the result of an install or export run and save the session log.
    /// A declined install leaves no trace on disk, the log included.
    fn finish(&self, result: Result<()>) -> Outcome {
        let outcome = match &result {
            Ok(()) => Outcome::Success,
            Err(e) => {
                self.session.critical(format!("{:#}", e));
                Outcome::Failure
            }
        };

        if let Err(e) = &result
            && matches!(
                e.downcast_ref::<InstallerError>(),
                Some(InstallerError::Declined)
            )
        {
            debug!("Declined; not saving the session log");
            return outcome;
        }

        match self.session.save(&self.runtime, &self.config.log_dir) {
            Ok(path) => self
                .session
                .ok(format!("Saved log to: {}", path.display())),
            Err(e) => {
                warn!("Failed to save session log: {:#}", e);
                self.session.warn(format!("Could not save log: {:#}", e));
            }
        }
        outcome
    }

    /// Fetch the version list, let the user pick one and return its detail record.
    pub(super) async fn pick_version(&self) -> Result<VersionRecord> {
        self.session
            .comment("Fetching available versions from Modrinth");
        let versions = self.source.list_versions(&self.config.project).await?;
        self.session.ok(format!(
            "Fetched {} from Modrinth",
            pluralize(versions.len(), "version")
        ));

        let id = select_version(&self.runtime, &self.capabilities, &versions, &self.session)?;
        self.source.get_version(&id).await
    }

    /// Download `url` to `path` and verify it. The path is removed if the user
    /// interrupts the download.
    pub(super) async fn download_guarded(
        &self,
        ctx: &SharedCleanupContext,
        url: &str,
        path: &Path,
        expected: &Expected,
        progress: &ProgressBar,
    ) -> Result<u64> {
        let guard = CleanupGuard::new(Arc::clone(ctx), path.to_path_buf());
        let bytes = download_verified(
            &self.runtime,
            url,
            path,
            &self.http_client,
            expected,
            progress,
        )
        .await?;
        guard.success();
        Ok(bytes)
    }

    /// Run `f` with a Ctrl-C watcher active for the registered paths.
    pub(super) async fn with_interrupt_watcher<T, F, Fut>(&self, f: F) -> Result<T>
    where
        F: FnOnce(SharedCleanupContext) -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let ctx = new_shared();
        let watcher = spawn_interrupt_watcher(Arc::clone(&ctx));
        let result = f(ctx).await;
        watcher.abort();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InstallerError;
    use crate::modrinth::MockVersionSource;
    use crate::runtime::MockRuntime;
    use crate::session::Level;
    use crate::test_utils::{record_with_file, test_config};
    use mockall::Sequence;
    use reqwest::Client;

    fn installer(
        runtime: MockRuntime,
        source: MockVersionSource,
    ) -> Installer<MockRuntime, MockVersionSource> {
        Installer::new(
            runtime,
            source,
            HttpClient::new(Client::new()),
            test_config(),
            Capabilities::default(),
            SessionLog::quiet(),
        )
    }

    #[tokio::test]
    async fn test_quit_does_nothing() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_prompt()
            .times(1)
            .returning(|_| Ok(Some("3".into())));
        // No source expectations: any API call would panic.
        let installer = installer(runtime, MockVersionSource::new());

        assert_eq!(installer.run().await.unwrap(), Outcome::Success);
    }

    #[tokio::test]
    async fn test_menu_input_closed_is_an_error() {
        let mut runtime = MockRuntime::new();
        runtime.expect_prompt().times(1).returning(|_| Ok(None));
        let installer = installer(runtime, MockVersionSource::new());

        let err = installer.run().await.unwrap_err();

        assert_eq!(
            err.downcast_ref::<InstallerError>(),
            Some(&InstallerError::InputClosed)
        );
    }

    #[tokio::test]
    async fn test_pick_version_fetches_detail_of_selection() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_prompt()
            .times(1)
            .returning(|_| Ok(Some("2".into())));

        let mut source = MockVersionSource::new();
        let mut seq = Sequence::new();
        source
            .expect_list_versions()
            .withf(|project| project == "optifine-for-fabric")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| {
                Ok(vec![
                    record_with_file("v1", "https://cdn.test/a-1.jar"),
                    record_with_file("v2", "https://cdn.test/a-2.jar"),
                ])
            });
        source
            .expect_get_version()
            .withf(|id| id == "v2")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|id| Ok(record_with_file(id, "https://cdn.test/a-2.jar")));

        let installer = installer(runtime, source);
        let record = installer.pick_version().await.unwrap();

        assert_eq!(record.id, "v2");
        let ok_entries = installer
            .session()
            .entries()
            .iter()
            .filter(|e| e.level == Level::Ok)
            .count();
        assert_eq!(ok_entries, 1);
    }

    #[tokio::test]
    async fn test_empty_version_list_is_fatal() {
        let runtime = MockRuntime::new();
        let mut source = MockVersionSource::new();
        source.expect_list_versions().returning(|_| Ok(vec![]));
        source.expect_get_version().never();

        let installer = installer(runtime, source);
        let err = installer.pick_version().await.unwrap_err();

        assert_eq!(
            err.downcast_ref::<InstallerError>(),
            Some(&InstallerError::NoVersions)
        );
    }

    #[test]
    fn test_declined_run_saves_no_log() {
        let dir = tempfile::tempdir().unwrap();
        let mut installer = installer(MockRuntime::new(), MockVersionSource::new());
        installer.config.log_dir = dir.path().join("logs");

        let outcome = installer.finish(Err(InstallerError::Declined.into()));

        assert_eq!(outcome, Outcome::Failure);
        assert!(!dir.path().join("logs").exists());
        assert!(installer
            .session()
            .entries()
            .iter()
            .any(|e| e.level == Level::Critical && e.message == "Installation cancelled by user"));
    }

    #[test]
    fn test_outcome_exit_codes() {
        assert_eq!(
            format!("{:?}", std::process::ExitCode::from(Outcome::Success)),
            format!("{:?}", std::process::ExitCode::SUCCESS)
        );
        assert_eq!(
            format!("{:?}", std::process::ExitCode::from(Outcome::Failure)),
            format!("{:?}", std::process::ExitCode::FAILURE)
        );
    }
}
