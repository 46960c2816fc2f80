//! Version selection: fuzzy picker or numbered prompt.

use anyhow::Result;
use log::debug;

use crate::error::InstallerError;
use crate::modrinth::VersionRecord;
use crate::probe::Capabilities;
use crate::runtime::Runtime;
use crate::session::SessionLog;

/// Separator between the fields of a display line.
pub const FIELD_SEPARATOR: char = '|';

/// `{id} | {version} | {game versions} | {loaders}` plus the channel tag.
pub fn display_line(record: &VersionRecord) -> String {
    format!(
        "{id} {sep} {version} {sep} {games} {sep} {loaders}{tag}",
        id = record.id,
        version = record.version_number,
        games = record.game_versions.join(", "),
        loaders = record.loaders.join(", "),
        tag = record.version_type.tag(),
        sep = FIELD_SEPARATOR,
    )
}

/// The leading id field of a display line.
pub fn resolve_id(line: &str) -> Option<String> {
    let id = line.split(FIELD_SEPARATOR).next()?.trim();
    if id.is_empty() {
        None
    } else {
        Some(id.to_string())
    }
}

/// Parse a 1-based index typed by the user into a 0-based one.
pub fn parse_index(input: &str, len: usize) -> Option<usize> {
    let n: usize = input.trim().parse().ok()?;
    if n >= 1 && n <= len { Some(n - 1) } else { None }
}

/// Let the user pick a version and return its id.
#[tracing::instrument(skip(runtime, capabilities, versions, session))]
pub fn select_version<R: Runtime>(
    runtime: &R,
    capabilities: &Capabilities,
    versions: &[VersionRecord],
    session: &SessionLog,
) -> Result<String> {
    if versions.is_empty() {
        return Err(InstallerError::NoVersions.into());
    }

    let lines: Vec<String> = versions.iter().map(display_line).collect();

    let chosen = if capabilities.fuzzy_picker {
        runtime
            .fuzzy_select("Select a version (type to filter)", &lines)?
            .and_then(|index| lines.get(index))
    } else {
        println!();
        for (i, line) in lines.iter().enumerate() {
            println!("  {:>3}) {}", i + 1, line);
        }
        let input = runtime.prompt(&format!("Select a version [1-{}]: ", lines.len()))?;
        debug!("Numbered prompt input: {:?}", input);
        input
            .as_deref()
            .and_then(|s| parse_index(s, lines.len()))
            .map(|index| &lines[index])
    };

    let id = chosen
        .and_then(|line| resolve_id(line))
        .filter(|id| versions.iter().any(|v| &v.id == id))
        .ok_or(InstallerError::NoSelection)?;

    if let Some(record) = versions.iter().find(|v| v.id == id) {
        session.user(format!(
            "Selected version: {} ({}) for {}",
            record.version_number,
            record.version_type,
            record.game_versions.join(",")
        ));
    }

    Ok(id)
}
