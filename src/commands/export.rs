use anyhow::{Context, Result};
use log::{debug, warn};
use std::path::Path;

use crate::{
    cleanup::{SharedCleanupContext, register},
    download::{Expected, discard},
    error::InstallerError,
    fabric::{self, JAVA_NAMES, LoaderRequest},
    install::{Artifact, InstallTarget},
    modpack::{ModpackIndex, copy_overrides, display_name, extract_archive, find_index},
    modrinth::VersionSource,
    progress::{download_bar, spinner},
    runtime::{Runtime, find_in_path},
    session::pluralize,
};

use super::installer::Installer;

impl<R: Runtime, S: VersionSource> Installer<R, S> {
    /// Download the `.mrpack` of a chosen version and lay its files out in
    /// `<downloads>/<display name>`.
    #[tracing::instrument(skip(self))]
    pub async fn download_modpack(&self) -> Result<()> {
        let record = self.pick_version().await?;
        let pack = record
            .mrpack_file()
            .ok_or_else(|| InstallerError::NoDownloadableFile(record.id.clone()))?;
        let artifact = Artifact::from_url(&pack.url)?;
        let name = display_name(
            &record.version_number,
            &record.game_versions,
            record.version_type,
        );
        debug!("Export folder name: {}", name);

        let temp_dir = self.runtime.temp_dir();
        let temp_pack = temp_dir.join(format!("offinstaller-{}.part", artifact.name));
        let extract_dir = temp_dir.join(format!("offinstaller-{}-extract", record.id));
        let dest = self.config.downloads_dir.join(&name);
        let expected = Expected {
            size: pack.size,
            hashes: pack.hashes.clone(),
        };

        let (url, pack_name) = (&artifact.url, &artifact.name);
        let (pack_path, extract_path, dest_path) = (&temp_pack, &extract_dir, &dest);
        let result = self
            .with_interrupt_watcher(|ctx| async move {
                self.session.comment(format!("Downloading package {}", url));
                let progress = download_bar("Downloading package");
                let downloaded = self
                    .download_guarded(&ctx, url, pack_path, &expected, &progress)
                    .await;
                progress.finish_and_clear();
                downloaded?;
                self.session
                    .ok(format!("Downloaded package: {}", pack_name));

                register(&ctx, extract_path.clone());
                self.session
                    .comment(format!("Extracting package to {}", extract_path.display()));
                extract_archive(&self.runtime, pack_path, extract_path)?;
                self.session.ok("Extraction complete");

                let index_path = find_index(&self.runtime, extract_path)?;
                let index = ModpackIndex::load(&self.runtime, &index_path)?;
                let pack_root = index_path.parent().unwrap_or(extract_path.as_path());

                self.prepare_destination(dest_path)?;
                self.fetch_index_files(&ctx, &index, dest_path).await;
                self.apply_overrides(pack_root, dest_path)?;
                self.install_loader(&ctx, &index).await;
                Ok::<(), anyhow::Error>(())
            })
            .await;

        self.remove_temporary(&temp_pack, &extract_dir);
        result?;

        self.session.ok("All files downloaded and organized");
        self.session
            .comment(format!("Files are available in: {}", dest.display()));
        Ok(())
    }

    /// Create `dest`, or ask whether an existing one should be wiped.
    fn prepare_destination(&self, dest: &Path) -> Result<()> {
        if self.runtime.exists(dest) {
            let overwrite = self
                .runtime
                .confirm(&format!("Destination folder {} exists. Overwrite?", dest.display()))?;
            self.session.user(format!(
                "Destination prompt answered: {}",
                if overwrite { "overwrite" } else { "use existing" }
            ));
            if !overwrite {
                return Ok(());
            }
            self.runtime
                .remove_dir_all(dest)
                .with_context(|| format!("Failed to clear {}", dest.display()))?;
        }

        self.runtime
            .create_dir_all(dest)
            .with_context(|| format!("Failed to create {}", dest.display()))?;
        self.session
            .ok(format!("Destination prepared: {}", dest.display()));
        Ok(())
    }

    /// Download every index file into `dest`. Failures are counted and reported.
    async fn fetch_index_files(
        &self,
        ctx: &SharedCleanupContext,
        index: &ModpackIndex,
        dest: &Path,
    ) {
        let (planned, skipped) = index.plan(dest);
        for path in &skipped {
            self.session
                .warn(format!("Skipping unsafe or unusable entry {:?}", path));
        }
        if planned.is_empty() {
            self.session.comment("The modpack index lists no files to download");
            return;
        }

        let total = planned.len();
        self.session.comment(format!(
            "Downloading {} to {}",
            pluralize(total, "file"),
            dest.display()
        ));

        let progress = download_bar(format!("Downloading {}", pluralize(total, "file")));
        let mut received = 0;
        for file in &planned {
            let result = match file.target.parent() {
                Some(parent) => self.runtime.create_dir_all(parent),
                None => Ok(()),
            };
            let result = match result {
                Ok(()) => {
                    self.download_guarded(
                        ctx,
                        &file.url,
                        &file.target,
                        &file.expected,
                        &progress,
                    )
                    .await
                }
                Err(e) => Err(e),
            };
            match result {
                Ok(_) => received += 1,
                Err(e) => self
                    .session
                    .error(format!("Failed to receive {}: {:#}", file.relative, e)),
            }
        }

        progress.finish_and_clear();

        let failed = total - received;
        let summary = format!("Received {}/{}", received, pluralize(total, "file"));
        if failed == 0 {
            self.session.ok(summary);
        } else {
            self.session.warn(summary);
            self.session
                .warn(format!("Failed to receive {}", pluralize(failed, "file")));
        }
    }

    fn apply_overrides(&self, pack_root: &Path, dest: &Path) -> Result<()> {
        match copy_overrides(&self.runtime, pack_root, dest)? {
            None => self.session.comment("No overrides directory present"),
            Some(report) => {
                let total = report.copied + report.failed;
                let summary = format!("Copied {}/{}", report.copied, pluralize(total, "file"));
                if report.failed == 0 {
                    self.session.ok(summary);
                } else {
                    self.session.warn(summary);
                    self.session
                        .warn(format!("Failed to copy {}", pluralize(report.failed, "file")));
                }
            }
        }
        Ok(())
    }

    /// Run the Fabric installer for the loader the pack depends on, when the
    /// default game directory belongs to the official launcher. Problems are
    /// reported and never fail the export.
    async fn install_loader(&self, ctx: &SharedCleanupContext, index: &ModpackIndex) {
        let Some(request) = index.loader_request() else {
            self.session.warn(
                "No fabric-loader version found in the modpack index; \
                 skipping automatic loader install",
            );
            return;
        };
        let target = InstallTarget::new(self.config.default_game_dir.clone());
        if !target.has_launcher(&self.runtime) {
            self.session.warn(format!(
                "Official launcher not detected in {}; skipping automatic loader install",
                target.root().display()
            ));
            return;
        }
        let Some(java) = find_in_path(&self.runtime, JAVA_NAMES) else {
            self.session
                .warn("Java not found on PATH; skipping automatic loader install");
            return;
        };

        let minecraft = request.minecraft.as_deref().unwrap_or("unknown");
        let question = format!(
            "Install Fabric loader {} for Minecraft {} into {}?",
            request.loader,
            minecraft,
            target.root().display()
        );
        match self.runtime.confirm(&question) {
            Ok(true) => {}
            Ok(false) => {
                self.session.user("Fabric loader install skipped");
                return;
            }
            Err(e) => {
                self.session
                    .warn(format!("Fabric loader install skipped: {:#}", e));
                return;
            }
        }

        self.session.user(format!(
            "Installing Fabric loader {} for Minecraft {}",
            request.loader, minecraft
        ));
        match self.run_fabric_installer(ctx, &java, &target, &request).await {
            Ok(()) => self.session.ok("Fabric loader installed successfully"),
            Err(e) => self
                .session
                .error(format!("Fabric loader install failed: {:#}", e)),
        }
    }

    async fn run_fabric_installer(
        &self,
        ctx: &SharedCleanupContext,
        java: &Path,
        target: &InstallTarget,
        request: &LoaderRequest,
    ) -> Result<()> {
        let jar = self.runtime.temp_dir().join(fabric::installer_file_name());
        let url = &self.config.fabric_installer_url;
        self.session
            .comment(format!("Downloading Fabric installer to {}", jar.display()));

        let progress = download_bar("Downloading Fabric installer");
        let downloaded = self
            .download_guarded(ctx, url, &jar, &Expected::default(), &progress)
            .await;
        progress.finish_and_clear();
        downloaded.context("Failed to download the Fabric installer")?;

        let args = request.installer_args(&jar, target.root());
        debug!("Running {:?} {:?}", java, args);
        let spinner = spinner("Installing Fabric loader");
        let result = self.runtime.run_command(java, &args);
        spinner.finish_and_clear();

        discard(&self.runtime, &jar);
        result
    }

    fn remove_temporary(&self, temp_pack: &Path, extract_dir: &Path) {
        if self.runtime.exists(temp_pack) && self.runtime.remove_file(temp_pack).is_err() {
            self.session.warn(format!(
                "Could not remove temporary package {}",
                temp_pack.display()
            ));
        }
        if self.runtime.exists(extract_dir)
            && let Err(e) = self.runtime.remove_dir_all(extract_dir)
        {
            warn!("Failed to remove {:?}: {}", extract_dir, e);
        }
    }
}
