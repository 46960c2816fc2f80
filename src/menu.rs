//! Platform menu.

use anyhow::Result;
use std::fmt;
use std::str::FromStr;

use crate::error::InstallerError;
use crate::runtime::Runtime;
use crate::session::SessionLog;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformChoice {
    /// Open the modpack page in the Modrinth app or a browser.
    OpenPage,
    /// Install the version's file into a local game directory.
    Install,
    Quit,
    /// Download the modpack archive and lay out its files in a folder.
    DownloadModpack,
}

impl PlatformChoice {
    pub const ALL: [PlatformChoice; 4] = [
        PlatformChoice::OpenPage,
        PlatformChoice::Install,
        PlatformChoice::Quit,
        PlatformChoice::DownloadModpack,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            PlatformChoice::OpenPage => "1",
            PlatformChoice::Install => "2",
            PlatformChoice::Quit => "3",
            PlatformChoice::DownloadModpack => "4",
        }
    }
}

impl fmt::Display for PlatformChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformChoice::OpenPage => {
                write!(f, "Open the modpack page (Modrinth app or browser)")
            }
            PlatformChoice::Install => write!(f, "Install to a local Minecraft directory"),
            PlatformChoice::Quit => write!(f, "Quit"),
            PlatformChoice::DownloadModpack => write!(f, "Download and parse modpack files"),
        }
    }
}

impl FromStr for PlatformChoice {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1" | "open" => Ok(PlatformChoice::OpenPage),
            "2" | "install" => Ok(PlatformChoice::Install),
            "3" | "q" | "quit" | "exit" => Ok(PlatformChoice::Quit),
            "4" | "download" => Ok(PlatformChoice::DownloadModpack),
            other => anyhow::bail!("Invalid choice: {:?}", other),
        }
    }
}

/// Show the menu until a valid choice is entered.
#[tracing::instrument(skip(runtime, session))]
pub fn choose_platform<R: Runtime>(runtime: &R, session: &SessionLog) -> Result<PlatformChoice> {
    loop {
        println!();
        println!("Choose an action:");
        for choice in PlatformChoice::ALL {
            println!("  {}) {}", choice.key(), choice);
        }

        let Some(input) = runtime.prompt("Enter choice [1-4]: ")? else {
            return Err(InstallerError::InputClosed.into());
        };

        match input.parse::<PlatformChoice>() {
            Ok(choice) => {
                session.user(format!("Action chosen: {}", choice));
                return Ok(choice);
            }
            Err(_) => session.warn(format!("Invalid choice {:?}; try again", input.trim())),
        }
    }
}
