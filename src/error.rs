//! Fatal installer errors.
//!
//! Each variant is one branch of the error taxonomy: all of them end the
//! process with exit code 1. They travel inside `anyhow::Error` and are
//! recovered with `downcast_ref` where a caller needs to tell them apart.

use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallerError {
    /// A required capability could not be set up.
    MissingTool(String),
    /// The API answered with an empty body.
    EmptyResponse(String),
    /// The project has no published versions.
    NoVersions,
    /// The user declined the install confirmation.
    Declined,
    /// No version was picked (empty input, cancelled picker, bad index).
    NoSelection,
    /// The selected version carries no file the flow can use.
    NoDownloadableFile(String),
    /// A downloaded file failed its size or hash check.
    IntegrityCheckFailed { file: String, reason: String },
    /// Stdin closed while a prompt was waiting.
    InputClosed,
    /// The `.mrpack` archive has no `modrinth.index.json`.
    MissingModpackIndex(PathBuf),
}

impl fmt::Display for InstallerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstallerError::MissingTool(tool) => {
                write!(f, "Required tool unavailable: {}", tool)
            }
            InstallerError::EmptyResponse(url) => {
                write!(f, "Empty response from {}", url)
            }
            InstallerError::NoVersions => write!(f, "No versions found; aborting"),
            InstallerError::Declined => write!(f, "Installation cancelled by user"),
            InstallerError::NoSelection => write!(f, "No version selected; aborting"),
            InstallerError::NoDownloadableFile(version) => {
                write!(f, "No downloadable file found for version {}", version)
            }
            InstallerError::IntegrityCheckFailed { file, reason } => {
                write!(f, "Integrity check failed for {}: {}", file, reason)
            }
            InstallerError::InputClosed => write!(f, "No input received"),
            InstallerError::MissingModpackIndex(dir) => {
                write!(f, "No modrinth.index.json found in {}", dir.display())
            }
        }
    }
}

impl std::error::Error for InstallerError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            InstallerError::EmptyResponse("https://api.test/v".into()).to_string(),
            "Empty response from https://api.test/v"
        );
        assert!(InstallerError::NoDownloadableFile("abc".into())
            .to_string()
            .contains("abc"));
        assert!(InstallerError::IntegrityCheckFailed {
            file: "a.jar".into(),
            reason: "file is empty".into()
        }
        .to_string()
        .contains("a.jar: file is empty"));
    }

    #[test]
    fn test_downcast_through_anyhow() {
        let err = anyhow::Error::from(InstallerError::Declined);
        assert_eq!(
            err.downcast_ref::<InstallerError>(),
            Some(&InstallerError::Declined)
        );
    }
}
