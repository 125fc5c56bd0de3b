//! Shared test helpers: a scripted downloader that never spawns a process.

use std::collections::VecDeque;
use std::path::PathBuf;

use crate::downloader::{
    classify_steamcmd_exit, AttemptOutcome, DownloadRequest, Downloader, ProcessStatus,
};
use crate::error::Result;

/// Downloader returning queued exit codes and recording every call.
///
/// Once the script is used up every further download exits with 0.
#[derive(Debug, Default)]
pub(crate) struct ScriptedDownloader {
    codes: VecDeque<i32>,
    pub(crate) logins: Vec<String>,
    pub(crate) downloads: Vec<String>,
}

impl ScriptedDownloader {
    pub(crate) fn new(codes: &[i32]) -> Self {
        Self {
            codes: codes.iter().copied().collect(),
            ..Self::default()
        }
    }

    pub(crate) fn succeeding() -> Self {
        Self::new(&[])
    }
}

impl Downloader for ScriptedDownloader {
    fn name(&self) -> &str {
        "scripted"
    }

    fn cache_credentials(&mut self, username: &str) -> Result<ProcessStatus> {
        self.logins.push(username.to_string());
        Ok(ProcessStatus::Exited(0))
    }

    fn download_item(&mut self, request: &DownloadRequest<'_>) -> Result<ProcessStatus> {
        self.downloads.push(request.item_id.to_string());
        Ok(ProcessStatus::Exited(self.codes.pop_front().unwrap_or(0)))
    }

    fn content_path(&self, request: &DownloadRequest<'_>) -> PathBuf {
        request
            .install_root
            .join("content")
            .join(request.app_id.to_string())
            .join(request.item_id)
    }

    fn classify(&self, status: ProcessStatus) -> AttemptOutcome {
        classify_steamcmd_exit(status)
    }
}
