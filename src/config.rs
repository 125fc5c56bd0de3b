//! Run configuration for the download pipeline.
//!
//! A [`RunConfig`] carries everything the pipeline needs that is not the
//! downloader itself. The CLI builds one from its flags; library users can
//! build one directly.

use std::path::PathBuf;

use crate::defaults::ARMA3_APP_ID;
use crate::retry::RetryPolicy;

/// Settings of a single pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    /// Manifest listing the mods to download
    pub manifest_path: PathBuf,
    /// Install root handed to the downloader
    pub install_dir: PathBuf,
    /// Account used to log in
    pub username: String,
    /// Application the workshop items belong to
    pub app_id: u32,
    /// How failed downloads are retried
    pub retry: RetryPolicy,
    /// Only report what would be done
    pub dry_run: bool,
}

impl RunConfig {
    /// Configuration with default app id, unbounded retries and no dry run.
    pub fn new(
        manifest_path: impl Into<PathBuf>,
        install_dir: impl Into<PathBuf>,
        username: impl Into<String>,
    ) -> Self {
        Self {
            manifest_path: manifest_path.into(),
            install_dir: install_dir.into(),
            username: username.into(),
            app_id: ARMA3_APP_ID,
            retry: RetryPolicy::default(),
            dry_run: false,
        }
    }

    pub fn with_app_id(mut self, app_id: u32) -> Self {
        self.app_id = app_id;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}
