//! Login session shared by every download of a run.

use log::{debug, info, warn};

use crate::downloader::{Downloader, ProcessStatus};
use crate::error::Result;

/// The account downloads are made with.
///
/// Credentials are cached once, before the first download, by a single
/// login through the downloader. The exit status of that login is only
/// logged: a failed login shows up later as failing downloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    username: String,
    credentials_cached: bool,
}

impl Session {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            credentials_cached: false,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn credentials_cached(&self) -> bool {
        self.credentials_cached
    }

    /// Log in through `downloader` so later downloads reuse the credentials.
    ///
    /// Only fails when the downloader cannot be started. Calling it again
    /// after a successful call does nothing.
    pub fn cache_credentials(&mut self, downloader: &mut dyn Downloader) -> Result<()> {
        if self.credentials_cached {
            debug!("Credentials for {} already cached", self.username);
            return Ok(());
        }

        info!("Caching your credentials in {}...", downloader.name());
        let status = downloader.cache_credentials(&self.username)?;
        match status {
            ProcessStatus::Exited(0) => debug!("Login for {} finished", self.username),
            other => warn!(
                "Login for {} ended with {}, downloads may fail",
                self.username, other
            ),
        }

        self.credentials_cached = true;
        Ok(())
    }
}
