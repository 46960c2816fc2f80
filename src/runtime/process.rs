//! Running external programs.

use anyhow::{Context, Result, bail};
use log::debug;
use std::path::Path;
use std::process::Command;

use super::RealRuntime;

impl RealRuntime {
    #[tracing::instrument(skip(self))]
    pub(crate) fn run_command_impl(&self, program: &Path, args: &[String]) -> Result<()> {
        let output = Command::new(program)
            .args(args)
            .output()
            .with_context(|| format!("Failed to run {}", program.display()))?;

        debug!("{} stdout: {}", program.display(), String::from_utf8_lossy(&output.stdout));
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "{} exited with {}: {}",
                program.display(),
                output.status,
                stderr.trim()
            );
        }
        Ok(())
    }
}
