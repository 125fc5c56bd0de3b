//! # Download Pipeline
//!
//! The controller runs a whole sync, one step at a time:
//!
//! 1.  **Manifest**: parse the mod list into an ordered work list.
//! 2.  **Layout**: make sure the install root and `Workshop` directory exist.
//! 3.  **Login**: cache the credentials with a single downloader login.
//! 4.  **Per mod**, in manifest order: fetch it (retrying as configured),
//!     then publish it with a link.
//!
//! A failure in steps 1-3 aborts the run before anything is downloaded.
//! Failures of a single mod are logged and recorded in the [`RunSummary`],
//! and the next mod is processed. A failed publish never fails its mod.
//!
//! In dry-run mode the controller stops after step 2 and only reports what
//! it would download and link.

use std::fmt;
use std::path::PathBuf;

use log::{error, info, warn};

use crate::config::RunConfig;
use crate::downloader::{DownloadRequest, Downloader};
use crate::error::{Error, Result};
use crate::fetch::{FetchDriver, FetchedItem};
use crate::layout::InstallLayout;
use crate::manifest::{Manifest, ManifestEntry};
use crate::publish::publish;
use crate::session::Session;

/// Where the controller is in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    ManifestLoaded,
    LayoutReady,
    AuthCached,
    /// Fetching the entry at this 0-based position
    Fetching(usize),
    /// Publishing the entry at this 0-based position
    Publishing(usize),
    Done,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineState::Idle => write!(f, "idle"),
            PipelineState::ManifestLoaded => write!(f, "manifest loaded"),
            PipelineState::LayoutReady => write!(f, "layout ready"),
            PipelineState::AuthCached => write!(f, "credentials cached"),
            PipelineState::Fetching(index) => write!(f, "fetching mod {}", index + 1),
            PipelineState::Publishing(index) => write!(f, "publishing mod {}", index + 1),
            PipelineState::Done => write!(f, "done"),
        }
    }
}

/// What happened to one manifest entry.
#[derive(Debug)]
pub enum EntryResult {
    /// Downloaded; `published` tells whether the link was created.
    Fetched { item: FetchedItem, published: bool },
    /// Dry run: what would have been downloaded and linked.
    Planned {
        item_id: String,
        content_path: PathBuf,
        link_path: PathBuf,
    },
    /// The entry could not be downloaded.
    Failed { error: Error },
}

/// Per-entry line of the run summary.
#[derive(Debug)]
pub struct EntryReport {
    /// 1-based position in the manifest
    pub position: usize,
    pub display_name: String,
    pub result: EntryResult,
}

/// Outcome of a whole pipeline run.
#[derive(Debug)]
pub struct RunSummary {
    /// Reports for the entries that were processed, in manifest order
    pub entries: Vec<EntryReport>,
    /// Error that aborted the run before the per-entry loop, if any
    pub fatal: Option<Error>,
    /// Every state the controller went through, starting with `Idle`
    pub states: Vec<PipelineState>,
}

impl RunSummary {
    /// True when the run was not aborted and no entry failed.
    ///
    /// Publish failures do not count as failures.
    pub fn is_success(&self) -> bool {
        self.fatal.is_none() && self.failed() == 0
    }

    pub fn final_state(&self) -> PipelineState {
        self.states.last().copied().unwrap_or(PipelineState::Idle)
    }

    pub fn fetched(&self) -> usize {
        self.count(|result| matches!(result, EntryResult::Fetched { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|result| matches!(result, EntryResult::Failed { .. }))
    }

    pub fn published(&self) -> usize {
        self.count(|result| {
            matches!(
                result,
                EntryResult::Fetched {
                    published: true,
                    ..
                }
            )
        })
    }

    /// Number of publish steps that ran; one per fetched entry.
    pub fn publish_attempts(&self) -> usize {
        self.states
            .iter()
            .filter(|state| matches!(state, PipelineState::Publishing(_)))
            .count()
    }

    /// Total downloader runs across all fetched entries.
    pub fn fetch_attempts(&self) -> u32 {
        self.entries
            .iter()
            .filter_map(|report| match &report.result {
                EntryResult::Fetched { item, .. } => Some(item.attempts),
                _ => None,
            })
            .sum()
    }

    fn count(&self, predicate: impl Fn(&EntryResult) -> bool) -> usize {
        self.entries
            .iter()
            .filter(|report| predicate(&report.result))
            .count()
    }
}

/// Runs the manifest -> layout -> login -> fetch/publish sequence.
pub struct PipelineController<'a> {
    config: RunConfig,
    downloader: &'a mut dyn Downloader,
    states: Vec<PipelineState>,
}

impl<'a> PipelineController<'a> {
    pub fn new(config: RunConfig, downloader: &'a mut dyn Downloader) -> Self {
        Self {
            config,
            downloader,
            states: vec![PipelineState::Idle],
        }
    }

    pub fn state(&self) -> PipelineState {
        self.states.last().copied().unwrap_or(PipelineState::Idle)
    }

    /// Run the pipeline to completion.
    ///
    /// Never fails: setup errors end up in [`RunSummary::fatal`] and entry
    /// errors in the entry reports.
    pub fn run(mut self) -> RunSummary {
        let mut entries = Vec::new();
        let fatal = self.execute(&mut entries).err();
        match &fatal {
            Some(e) if e.is_manifest_error() => error!("{}", e),
            Some(e) => crate::critical!("{}", e),
            None => {}
        }
        self.enter(PipelineState::Done);

        let summary = RunSummary {
            entries,
            fatal,
            states: self.states,
        };
        if summary.fatal.is_none() && !self.config.dry_run {
            let message = format!(
                "Finished: {} of {} mods downloaded, {} linked, {} failed",
                summary.fetched(),
                summary.entries.len(),
                summary.published(),
                summary.failed()
            );
            if summary.is_success() {
                info!("{}", message);
            } else {
                warn!("{}", message);
            }
        }
        summary
    }

    fn enter(&mut self, state: PipelineState) {
        log::trace!("Pipeline state: {} -> {}", self.state(), state);
        self.states.push(state);
    }

    fn execute(&mut self, reports: &mut Vec<EntryReport>) -> Result<()> {
        let manifest = Manifest::from_file(&self.config.manifest_path)?;
        info!(
            "Loaded {} mods from {}",
            manifest.len(),
            self.config.manifest_path.display()
        );
        self.enter(PipelineState::ManifestLoaded);

        let layout = InstallLayout::resolve(&self.config.install_dir)?;
        info!("Install directory: {}", layout.install_root().display());
        info!("Workshop directory: {}", layout.publish_root().display());
        self.enter(PipelineState::LayoutReady);

        if self.config.dry_run {
            self.plan(&manifest, &layout, reports);
            return Ok(());
        }

        let mut session = Session::new(self.config.username.as_str());
        session.cache_credentials(&mut *self.downloader)?;
        self.enter(PipelineState::AuthCached);

        let total = manifest.len();
        for (index, entry) in manifest.iter().enumerate() {
            info!(
                "Processing mod {} of {}: {}",
                index + 1,
                total,
                entry.display_name()
            );
            self.enter(PipelineState::Fetching(index));

            let fetched = FetchDriver::new(
                &mut *self.downloader,
                self.config.retry.clone(),
                self.config.app_id,
            )
            .fetch(entry, &session, &layout);

            let result = match fetched {
                Ok(item) => {
                    self.enter(PipelineState::Publishing(index));
                    let published = publish(entry.display_name(), &item.content_path, &layout);
                    EntryResult::Fetched { item, published }
                }
                Err(error) => {
                    error!("Skipping {}: {}", entry.display_name(), error);
                    EntryResult::Failed { error }
                }
            };
            reports.push(report(index, entry, result));
        }

        Ok(())
    }

    fn plan(&self, manifest: &Manifest, layout: &InstallLayout, reports: &mut Vec<EntryReport>) {
        info!("Dry run: nothing will be downloaded or linked");
        for (index, entry) in manifest.iter().enumerate() {
            let result = match entry.item_id() {
                Ok(item_id) => {
                    let request = DownloadRequest {
                        install_root: layout.install_root(),
                        username: &self.config.username,
                        app_id: self.config.app_id,
                        item_id,
                    };
                    let content_path = self.downloader.content_path(&request);
                    let link_path = layout.link_path(entry.display_name());
                    info!(
                        "Would download {} ({}) to {} and link it as {}",
                        entry.display_name(),
                        item_id,
                        content_path.display(),
                        link_path.display()
                    );
                    EntryResult::Planned {
                        item_id: item_id.to_string(),
                        content_path,
                        link_path,
                    }
                }
                Err(error) => {
                    error!("Skipping {}: {}", entry.display_name(), error);
                    EntryResult::Failed { error }
                }
            };
            reports.push(report(index, entry, result));
        }
    }
}

fn report(index: usize, entry: &ManifestEntry, result: EntryResult) -> EntryReport {
    EntryReport {
        position: index + 1,
        display_name: entry.display_name().to_string(),
        result,
    }
}
