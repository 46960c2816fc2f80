//! Integrity checks for downloaded files.

use anyhow::{Context, Result};
use log::debug;
use sha1::Sha1;
use sha2::{Digest, Sha512};
use std::path::Path;

use crate::error::InstallerError;
use crate::modrinth::FileHashes;
use crate::runtime::Runtime;

/// What a downloaded file is expected to look like.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Expected {
    pub size: Option<u64>,
    pub hashes: FileHashes,
}

/// Check that `path` is non-empty and matches the advertised size and hash.
/// sha512 is preferred over sha1 when both are known.
#[tracing::instrument(skip(runtime, expected))]
pub fn verify_file<R: Runtime>(runtime: &R, path: &Path, expected: &Expected) -> Result<()> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());
    let fail = |reason: String| InstallerError::IntegrityCheckFailed {
        file: name.clone(),
        reason,
    };

    let size = runtime
        .file_size(path)
        .with_context(|| format!("Failed to inspect {}", path.display()))?;
    if size == 0 {
        return Err(fail("file is empty".to_string()).into());
    }
    if let Some(expected_size) = expected.size
        && expected_size != size
    {
        return Err(fail(format!("expected {} bytes, got {}", expected_size, size)).into());
    }

    if let Some(sha512) = &expected.hashes.sha512 {
        let actual = hash_file::<R, Sha512>(runtime, path)?;
        if !actual.eq_ignore_ascii_case(sha512) {
            return Err(fail("sha512 mismatch".to_string()).into());
        }
        debug!("sha512 verified for {}", name);
    } else if let Some(sha1) = &expected.hashes.sha1 {
        let actual = hash_file::<R, Sha1>(runtime, path)?;
        if !actual.eq_ignore_ascii_case(sha1) {
            return Err(fail("sha1 mismatch".to_string()).into());
        }
        debug!("sha1 verified for {}", name);
    }

    Ok(())
}

fn hash_file<R: Runtime, D: Digest + std::io::Write>(runtime: &R, path: &Path) -> Result<String> {
    let mut reader = runtime
        .open(path)
        .with_context(|| format!("Failed to open {} for hashing", path.display()))?;
    let mut hasher = D::new();
    std::io::copy(&mut reader, &mut hasher)
        .with_context(|| format!("Failed to hash {}", path.display()))?;
    Ok(hex::encode(hasher.finalize()))
}
