use anyhow::Result;
use log::{debug, info};

use crate::{
    download::{Expected, discard},
    error::InstallerError,
    install::{Artifact, InstallTarget, place_file, resolve_dir_input},
    modrinth::VersionSource,
    progress::download_bar,
    runtime::Runtime,
};

use super::installer::Installer;

impl<R: Runtime, S: VersionSource> Installer<R, S> {
    /// Install the first file of a chosen version into `<game dir>/mods`.
    #[tracing::instrument(skip(self))]
    pub async fn install(&self) -> Result<()> {
        let default = &self.config.default_game_dir;
        let input = self
            .runtime
            .prompt(&format!(
                "Minecraft directory (leave empty for {}): ",
                default.display()
            ))?
            .ok_or(InstallerError::InputClosed)?;
        let target = InstallTarget::new(resolve_dir_input(&self.runtime, &input, default));
        self.session.user(format!(
            "Minecraft directory chosen: {}",
            target.root().display()
        ));

        let question = format!(
            "Install OptiFine for Fabric into {}?",
            target.root().display()
        );
        if !self.runtime.confirm(&question)? {
            self.session.user("Installation declined");
            tokio::time::sleep(self.config.decline_delay).await;
            return Err(InstallerError::Declined.into());
        }

        target.prepare(&self.runtime)?;
        self.session.ok(format!(
            "Prepared {} and {}",
            target.mods_dir().display(),
            target.state_dir().display()
        ));
        if !target.has_launcher(&self.runtime) {
            self.session.warn(format!(
                "Official Minecraft launcher not detected in {}",
                target.root().display()
            ));
        }

        let record = self.pick_version().await?;
        let file = record
            .first_file()
            .ok_or_else(|| InstallerError::NoDownloadableFile(record.id.clone()))?;
        let artifact = Artifact::from_url(&file.url)?;
        debug!("Artifact: {:?}", artifact);

        let temp_path = self
            .runtime
            .temp_dir()
            .join(format!("offinstaller-{}.part", artifact.name));
        let destination = artifact.destination(&target);
        let expected = Expected {
            size: file.size,
            hashes: file.hashes.clone(),
        };

        self.session
            .comment(format!("Downloading {}", artifact.url));
        let (url, temp) = (&artifact.url, &temp_path);
        let progress = download_bar(format!("Downloading {}", artifact.name));
        let bar = &progress;
        let result = self
            .with_interrupt_watcher(|ctx| async move {
                self.download_guarded(&ctx, url, temp, &expected, bar).await
            })
            .await;
        progress.finish_and_clear();
        let bytes = result?;
        info!("Downloaded {} bytes", bytes);

        if let Err(e) = place_file(&self.runtime, &temp_path, &destination) {
            if self.runtime.exists(&temp_path) {
                discard(&self.runtime, &temp_path);
            }
            return Err(e);
        }
        self.session.ok(format!(
            "Installed {} to {}",
            artifact.name,
            destination.display()
        ));
        self.session.comment(format!(
            "Launch Minecraft {} with the Fabric loader to use it",
            record.game_versions.join(", ")
        ));
        Ok(())
    }
}
