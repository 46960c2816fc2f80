use anyhow::{Context, Result};
use log::{debug, warn};
use std::io::Read;
use std::path::{Path, PathBuf};
use zip::ZipArchive;

use crate::error::InstallerError;
use crate::runtime::Runtime;

use super::{INDEX_FILE_NAME, OVERRIDES_DIR};

/// Unpack a `.mrpack` into `extract_to`. Entries that would land outside it are skipped.
/// Returns the number of files written.
#[tracing::instrument(skip(runtime))]
pub fn extract_archive<R: Runtime>(
    runtime: &R,
    archive_path: &Path,
    extract_to: &Path,
) -> Result<usize> {
    debug!("Extracting {:?} to {:?}...", archive_path, extract_to);
    let mut reader = runtime
        .open(archive_path)
        .with_context(|| format!("Failed to open archive at {:?}", archive_path))?;

    // ZipArchive needs Read + Seek
    let mut buffer = Vec::new();
    reader
        .read_to_end(&mut buffer)
        .with_context(|| format!("Failed to read archive {:?}", archive_path))?;
    let mut archive = ZipArchive::new(std::io::Cursor::new(buffer))
        .with_context(|| format!("Failed to parse modpack archive {:?}", archive_path))?;

    runtime.create_dir_all(extract_to)?;

    let mut written = 0;
    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .with_context(|| format!("Failed to read archive entry {}", i))?;

        let Some(entry_path) = entry.enclosed_name() else {
            warn!("Skipping archive entry with unsafe path: {}", entry.name());
            continue;
        };
        let full_path = extract_to.join(entry_path);

        if entry.is_dir() {
            runtime.create_dir_all(&full_path)?;
            continue;
        }

        if let Some(parent) = full_path.parent() {
            runtime.create_dir_all(parent)?;
        }
        let mut dest_file = runtime.create_file(&full_path)?;
        std::io::copy(&mut entry, &mut dest_file)
            .with_context(|| format!("Failed to extract file {:?}", full_path))?;
        written += 1;
    }

    debug!("Extracted {} files", written);
    Ok(written)
}

/// Search `root` depth-first for the modpack index.
pub fn find_index<R: Runtime>(runtime: &R, root: &Path) -> Result<PathBuf> {
    find_file(runtime, root, INDEX_FILE_NAME)?
        .ok_or_else(|| InstallerError::MissingModpackIndex(root.to_path_buf()).into())
}

fn find_file<R: Runtime>(runtime: &R, dir: &Path, name: &str) -> Result<Option<PathBuf>> {
    let candidate = dir.join(name);
    if runtime.exists(&candidate) && !runtime.is_dir(&candidate) {
        return Ok(Some(candidate));
    }

    let mut entries = runtime.read_dir(dir)?;
    entries.sort();
    for entry in entries {
        if runtime.is_dir(&entry)
            && let Some(found) = find_file(runtime, &entry, name)?
        {
            return Ok(Some(found));
        }
    }
    Ok(None)
}

/// Outcome of copying the overrides tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyReport {
    pub copied: usize,
    pub failed: usize,
}

/// Copy `<pack_root>/overrides/**` into `dest`, keeping relative paths.
/// Individual copy failures are counted, not returned.
#[tracing::instrument(skip(runtime))]
pub fn copy_overrides<R: Runtime>(
    runtime: &R,
    pack_root: &Path,
    dest: &Path,
) -> Result<Option<CopyReport>> {
    let overrides = pack_root.join(OVERRIDES_DIR);
    if !runtime.is_dir(&overrides) {
        return Ok(None);
    }

    let mut files = Vec::new();
    collect_files(runtime, &overrides, &mut files)?;

    let mut report = CopyReport::default();
    for source in files {
        let Ok(relative) = source.strip_prefix(&overrides) else {
            continue;
        };
        let target = dest.join(relative);
        let result = match target.parent() {
            Some(parent) => runtime.create_dir_all(parent),
            None => Ok(()),
        }
        .and_then(|_| runtime.copy(&source, &target));

        match result {
            Ok(_) => report.copied += 1,
            Err(e) => {
                warn!("Failed to copy {:?}: {}", relative, e);
                report.failed += 1;
            }
        }
    }
    Ok(Some(report))
}

fn collect_files<R: Runtime>(runtime: &R, dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    let mut entries = runtime.read_dir(dir)?;
    entries.sort();
    for entry in entries {
        if runtime.is_dir(&entry) {
            collect_files(runtime, &entry, out)?;
        } else {
            out.push(entry);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::RealRuntime;
    use std::fs;
    use std::io::Write;
    use tempfile::tempdir;
    use zip::write::SimpleFileOptions;

    fn write_pack(path: &Path, entries: &[(&str, &str)]) {
        let file = fs::File::create(path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        let options = SimpleFileOptions::default();
        for (name, contents) in entries {
            zip.start_file(*name, options).unwrap();
            zip.write_all(contents.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
    }

    #[test]
    fn test_extract_and_find_index() {
        let dir = tempdir().unwrap();
        let pack = dir.path().join("pack.mrpack");
        write_pack(
            &pack,
            &[
                ("modrinth.index.json", r#"{"files": []}"#),
                ("overrides/config/opt.txt", "on"),
            ],
        );
        let out = dir.path().join("out");

        let written = extract_archive(&RealRuntime, &pack, &out).unwrap();

        assert_eq!(written, 2);
        assert_eq!(
            fs::read_to_string(out.join("overrides/config/opt.txt")).unwrap(),
            "on"
        );
        assert_eq!(
            find_index(&RealRuntime, &out).unwrap(),
            out.join("modrinth.index.json")
        );
    }

    #[test]
    fn test_extract_skips_escaping_entries() {
        let dir = tempdir().unwrap();
        let pack = dir.path().join("evil.mrpack");
        write_pack(&pack, &[("../evil.txt", "x"), ("ok.txt", "y")]);
        let out = dir.path().join("out");

        let written = extract_archive(&RealRuntime, &pack, &out).unwrap();

        assert_eq!(written, 1);
        assert!(!dir.path().join("evil.txt").exists());
        assert!(out.join("ok.txt").exists());
    }

    #[test]
    fn test_find_index_in_subdirectory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("modrinth.index.json"), "{}").unwrap();

        assert_eq!(
            find_index(&RealRuntime, dir.path()).unwrap(),
            nested.join("modrinth.index.json")
        );
    }

    #[test]
    fn test_find_index_missing() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("other.json"), "{}").unwrap();

        let err = find_index(&RealRuntime, dir.path()).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<InstallerError>(),
            Some(InstallerError::MissingModpackIndex(_))
        ));
    }

    #[test]
    fn test_copy_overrides() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("pack");
        fs::create_dir_all(root.join("overrides/config/sub")).unwrap();
        fs::write(root.join("overrides/options.txt"), "a").unwrap();
        fs::write(root.join("overrides/config/sub/b.json"), "b").unwrap();
        let dest = dir.path().join("dest");

        let report = copy_overrides(&RealRuntime, &root, &dest).unwrap().unwrap();

        assert_eq!(report, CopyReport { copied: 2, failed: 0 });
        assert_eq!(fs::read_to_string(dest.join("options.txt")).unwrap(), "a");
        assert_eq!(
            fs::read_to_string(dest.join("config/sub/b.json")).unwrap(),
            "b"
        );
    }

    #[test]
    fn test_copy_overrides_absent() {
        let dir = tempdir().unwrap();
        assert_eq!(
            copy_overrides(&RealRuntime, dir.path(), &dir.path().join("dest")).unwrap(),
            None
        );
    }
}
