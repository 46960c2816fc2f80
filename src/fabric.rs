//! Running the official Fabric installer against a game directory.

use std::path::Path;

/// Fabric installer release used for the loader install.
pub const INSTALLER_VERSION: &str = "0.11.2";

#[cfg(windows)]
pub const JAVA_NAMES: &[&str] = &["java.exe", "javaw.exe"];

#[cfg(not(windows))]
pub const JAVA_NAMES: &[&str] = &["java"];

/// Maven URL of the installer jar.
pub fn installer_url() -> String {
    format!(
        "https://maven.fabricmc.net/net/fabricmc/fabric-installer/{v}/fabric-installer-{v}.jar",
        v = INSTALLER_VERSION
    )
}

/// File name the installer jar is downloaded under.
pub fn installer_file_name() -> String {
    format!("fabric-installer-{}.jar", INSTALLER_VERSION)
}

/// Loader version and game version a modpack asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderRequest {
    pub loader: String,
    pub minecraft: Option<String>,
}

impl LoaderRequest {
    /// Arguments for `java`: `-jar <installer> client -dir <game> -loader <v> [-mcversion <v>]`.
    pub fn installer_args(&self, jar: &Path, game_dir: &Path) -> Vec<String> {
        let mut args = vec![
            "-jar".to_string(),
            jar.to_string_lossy().to_string(),
            "client".to_string(),
            "-dir".to_string(),
            game_dir.to_string_lossy().to_string(),
            "-loader".to_string(),
            self.loader.clone(),
        ];
        if let Some(minecraft) = &self.minecraft {
            args.push("-mcversion".to_string());
            args.push(minecraft.clone());
        }
        args
    }
}
