//! Removal of temporary download paths when the user interrupts a run.

use log::debug;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::task::JoinHandle;

/// Temporary paths to delete if the process is interrupted.
#[derive(Debug, Default)]
pub struct CleanupContext {
    paths: Vec<PathBuf>,
}

impl CleanupContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, path: PathBuf) {
        self.paths.push(path);
    }

    pub fn remove(&mut self, path: &Path) {
        self.paths.retain(|p| p != path);
    }

    /// Delete every registered path that still exists.
    pub fn cleanup(&self) {
        for path in &self.paths {
            debug!("Cleaning up: {:?}", path);
            let result = if path.is_dir() {
                std::fs::remove_dir_all(path)
            } else {
                std::fs::remove_file(path)
            };
            if let Err(e) = result {
                debug!("Could not remove {:?}: {}", path, e);
            }
        }
    }
}

pub type SharedCleanupContext = Arc<Mutex<CleanupContext>>;

pub fn new_shared() -> SharedCleanupContext {
    Arc::new(Mutex::new(CleanupContext::new()))
}

fn lock(ctx: &SharedCleanupContext) -> MutexGuard<'_, CleanupContext> {
    ctx.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Register `path` for removal on interrupt until the run ends.
pub fn register(ctx: &SharedCleanupContext, path: PathBuf) {
    lock(ctx).add(path);
}

/// Keeps a path registered until [`CleanupGuard::success`] is called.
pub struct CleanupGuard {
    ctx: SharedCleanupContext,
    path: PathBuf,
}

impl CleanupGuard {
    pub fn new(ctx: SharedCleanupContext, path: PathBuf) -> Self {
        lock(&ctx).add(path.clone());
        Self { ctx, path }
    }

    /// The path no longer needs cleaning up (it was moved or removed).
    pub fn success(self) {
        lock(&self.ctx).remove(&self.path);
    }
}

/// Watch for Ctrl-C while a download runs. On interrupt, remove the registered
/// paths, print `Cancelled.` and exit with status 1. Abort the handle once the
/// download is over.
pub fn spawn_interrupt_watcher(ctx: SharedCleanupContext) -> JoinHandle<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            println!();
            crate::session::print_fatal(&anyhow::anyhow!("Cancelled."));
            lock(&ctx).cleanup();
            std::process::exit(1);
        }
    })
}
