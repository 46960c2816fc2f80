use clap::Parser;
use offinstaller::commands::{self, config::ConfigOverrides};
use offinstaller::session::print_fatal;
use std::path::PathBuf;
use std::process::ExitCode;

/// offinstaller - OptiFine for Fabric installer
///
/// Interactive installer for the "OptiFine for Fabric" modpack published on
/// Modrinth. Run without arguments and follow the prompts.
///
/// Examples:
///   offinstaller                       # Interactive menu
///   offinstaller --game-dir ~/mc       # Offer ~/mc as the install directory
#[derive(Parser, Debug)]
#[command(author, version = env!("OFFINSTALLER_VERSION"), about)]
struct Cli {
    /// Modrinth API URL (defaults to https://api.modrinth.com/v2)
    #[arg(long = "api-url", env = "OFFINSTALLER_API_URL", value_name = "URL")]
    pub api_url: Option<String>,

    /// Minecraft directory offered by the install prompt (defaults to ~/.minecraft)
    #[arg(long = "game-dir", env = "OFFINSTALLER_GAME_DIR", value_name = "PATH")]
    pub game_dir: Option<PathBuf>,

    /// Folder receiving exported modpacks (defaults to ~/Downloads)
    #[arg(
        long = "downloads-dir",
        env = "OFFINSTALLER_DOWNLOADS_DIR",
        value_name = "PATH"
    )]
    pub downloads_dir: Option<PathBuf>,

    /// Folder for session logs (defaults to ~/offinstaller-logs)
    #[arg(long = "log-dir", env = "OFFINSTALLER_LOG_DIR", value_name = "PATH")]
    pub log_dir: Option<PathBuf>,

    /// Fabric installer jar used for the loader install (defaults to Fabric's maven)
    #[arg(
        long = "fabric-installer-url",
        env = "OFFINSTALLER_FABRIC_INSTALLER_URL",
        value_name = "URL"
    )]
    pub fabric_installer_url: Option<String>,

    /// Always use the numbered version prompt
    #[arg(long = "no-fuzzy")]
    pub no_fuzzy: bool,
}

impl From<Cli> for ConfigOverrides {
    fn from(cli: Cli) -> Self {
        ConfigOverrides {
            api_url: cli.api_url,
            game_dir: cli.game_dir,
            downloads_dir: cli.downloads_dir,
            log_dir: cli.log_dir,
            fabric_installer_url: cli.fabric_installer_url,
            no_fuzzy: cli.no_fuzzy,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let runtime = offinstaller::runtime::RealRuntime;

    match commands::run(runtime, cli.into()).await {
        Ok(outcome) => outcome.into(),
        Err(e) => {
            print_fatal(&e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_no_arguments() {
        let cli = Cli::try_parse_from(["offinstaller"]).unwrap();
        assert_eq!(cli.game_dir, None);
        assert!(!cli.no_fuzzy);
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::try_parse_from([
            "offinstaller",
            "--api-url",
            "http://localhost:1234",
            "--game-dir",
            "/tmp/mc",
            "--log-dir",
            "/tmp/logs",
            "--no-fuzzy",
        ])
        .unwrap();
        let overrides: ConfigOverrides = cli.into();
        assert_eq!(overrides.api_url.as_deref(), Some("http://localhost:1234"));
        assert_eq!(overrides.game_dir, Some(PathBuf::from("/tmp/mc")));
        assert_eq!(overrides.log_dir, Some(PathBuf::from("/tmp/logs")));
        assert_eq!(overrides.downloads_dir, None);
        assert_eq!(overrides.fabric_installer_url, None);
        assert!(overrides.no_fuzzy);
    }

    #[test]
    fn test_cli_rejects_positional_arguments() {
        let result = Cli::try_parse_from(["offinstaller", "install"]);
        assert!(result.is_err());
    }
}
