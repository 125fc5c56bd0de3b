//! Fetch driver: download one manifest entry, retrying until it succeeds.
//!
//! Each attempt runs the downloader to completion and asks it whether the
//! process ending counts as success. Failed attempts are announced as
//! warnings and retried right away unless the [`RetryPolicy`] says
//! otherwise. With the default policy an entry is retried forever.

use std::path::PathBuf;

use log::{info, warn};

use crate::downloader::{AttemptOutcome, DownloadRequest, Downloader, ProcessStatus};
use crate::error::{Error, Result};
use crate::layout::InstallLayout;
use crate::manifest::ManifestEntry;
use crate::retry::{Attempt, RetryPolicy};
use crate::session::Session;

/// A successfully downloaded workshop item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedItem {
    pub item_id: String,
    /// Where the downloader put the content.
    pub content_path: PathBuf,
    /// Number of downloader runs it took, including the successful one.
    pub attempts: u32,
    /// Status of the successful run.
    pub status: ProcessStatus,
}

/// Drives the downloader for one entry at a time.
pub struct FetchDriver<'a> {
    downloader: &'a mut dyn Downloader,
    policy: RetryPolicy,
    app_id: u32,
}

impl<'a> FetchDriver<'a> {
    pub fn new(downloader: &'a mut dyn Downloader, policy: RetryPolicy, app_id: u32) -> Self {
        Self {
            downloader,
            policy,
            app_id,
        }
    }

    /// Download `entry` into the install root of `layout`.
    ///
    /// Fails with [`Error::MalformedReference`] before running anything when
    /// the entry has no item id, with [`Error::DownloaderSpawn`] when the
    /// downloader cannot be started and, in bounded retry mode only, with
    /// [`Error::RetriesExhausted`].
    pub fn fetch(
        &mut self,
        entry: &ManifestEntry,
        session: &Session,
        layout: &InstallLayout,
    ) -> Result<FetchedItem> {
        let item_id = entry.item_id()?;
        let request = DownloadRequest {
            install_root: layout.install_root(),
            username: session.username(),
            app_id: self.app_id,
            item_id,
        };

        let downloader = &mut *self.downloader;
        let retried = self.policy.run(|_| {
            info!("Downloading {}...", entry.display_name());
            let status = downloader.download_item(&request)?;
            match downloader.classify(status) {
                AttemptOutcome::Success => Ok::<_, Error>(Attempt::Done(status)),
                AttemptOutcome::RetryableFailure(status) => {
                    warn!(
                        "Something went wrong with {}, attempting the download again ({})",
                        downloader.name(),
                        status
                    );
                    Ok(Attempt::Retry(status))
                }
            }
        })?;

        if retried.exhausted {
            return Err(Error::RetriesExhausted {
                name: entry.display_name().to_string(),
                item_id: item_id.to_string(),
                attempts: retried.attempts,
                last_status: retried.value.to_string(),
            });
        }

        info!("Downloaded {} ({})", entry.display_name(), item_id);
        Ok(FetchedItem {
            item_id: item_id.to_string(),
            content_path: self.downloader.content_path(&request),
            attempts: retried.attempts,
            status: retried.value,
        })
    }
}
