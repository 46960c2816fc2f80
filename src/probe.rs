//! Environment capability detection.
//!
//! Probing happens once at start-up; the rest of the installer branches on
//! the returned [`Capabilities`] and never probes again.

use log::debug;

use crate::runtime::Runtime;
#[cfg(not(windows))]
use crate::runtime::find_in_path;
use crate::session::SessionLog;

#[cfg(target_os = "macos")]
const URI_OPENERS: &[&str] = &["open"];

#[cfg(not(any(target_os = "macos", windows)))]
const URI_OPENERS: &[&str] = &["xdg-open", "gio", "gnome-open", "kde-open"];

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Capabilities {
    /// An interactive fuzzy picker can be shown.
    pub fuzzy_picker: bool,
    /// A platform program can hand custom URI schemes to applications.
    pub uri_opener: bool,
}

/// Detect optional capabilities, printing a warning for each missing one.
#[tracing::instrument(skip(runtime, session))]
pub fn probe<R: Runtime>(runtime: &R, allow_fuzzy: bool, session: &SessionLog) -> Capabilities {
    let fuzzy_picker = allow_fuzzy && runtime.is_interactive();
    if !fuzzy_picker {
        session.warn("Fuzzy picker unavailable; falling back to a numbered prompt");
    }

    let uri_opener = has_uri_opener(runtime);
    if !uri_opener {
        session.warn("No URI opener found; the Modrinth app cannot be launched directly");
    }

    let capabilities = Capabilities {
        fuzzy_picker,
        uri_opener,
    };
    debug!("Detected capabilities: {:?}", capabilities);
    capabilities
}

#[cfg(windows)]
fn has_uri_opener<R: Runtime>(_runtime: &R) -> bool {
    // ShellExecute is always there.
    true
}

#[cfg(not(windows))]
fn has_uri_opener<R: Runtime>(runtime: &R) -> bool {
    match find_in_path(runtime, URI_OPENERS) {
        Some(opener) => {
            debug!("URI opener: {:?}", opener);
            true
        }
        None => false,
    }
}
