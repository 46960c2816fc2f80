use log::debug;

use crate::{modrinth::VersionSource, runtime::Runtime};

use super::installer::Installer;

impl<R: Runtime, S: VersionSource> Installer<R, S> {
    /// Point the user at the modpack page: the Modrinth app first when a URI
    /// opener exists, else the browser, else the plain URL. Never fails.
    #[tracing::instrument(skip(self))]
    pub fn open_page(&self) {
        let app_uri = &self.config.app_uri;
        let page_url = &self.config.page_url;

        if self.capabilities.uri_opener {
            debug!("Opening {}", app_uri);
            match self.runtime.open_uri(app_uri) {
                Ok(()) => {
                    self.session.ok("Opened the modpack in the Modrinth app");
                    return;
                }
                Err(e) => self
                    .session
                    .warn(format!("Could not open the Modrinth app: {:#}", e)),
            }
        }

        match self.runtime.open_browser(page_url) {
            Ok(()) => self.session.ok("Opened the modpack page in your browser"),
            Err(e) => {
                self.session
                    .warn(format!("Could not open a browser: {:#}", e));
                self.session.comment(format!("Modpack page: {}", page_url));
            }
        }
    }
}
