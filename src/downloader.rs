//! External downloader integration.
//!
//! Workshop content is fetched by an external tool, one process per attempt.
//! The [`Downloader`] trait is the seam between the pipeline and that tool:
//! it starts the process, reports how it ended, says where the content
//! lands on disk and decides which endings count as success.
//!
//! [`SteamCmd`] is the implementation for Valve's `steamcmd`. It runs
//! commands of the form
//!
//! ```text
//! steamcmd +force_install_dir <dir> +login <user> +workshop_download_item <app> <item> +quit
//! ```
//!
//! and treats exit codes `0` and `10` as success.

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus};
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, warn};

use crate::defaults::{STEAMCMD_SUCCESS_CODES, WORKSHOP_CONTENT_DIR};
use crate::error::{Error, Result};

/// How often a process running under a timeout is polled.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// How a downloader process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessStatus {
    /// The process exited with this code.
    Exited(i32),
    /// The process was terminated without an exit code (e.g. by a signal).
    Terminated,
    /// The process ran past the configured timeout and was killed.
    TimedOut,
}

impl From<ExitStatus> for ProcessStatus {
    fn from(status: ExitStatus) -> Self {
        match status.code() {
            Some(code) => ProcessStatus::Exited(code),
            None => ProcessStatus::Terminated,
        }
    }
}

impl fmt::Display for ProcessStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessStatus::Exited(code) => write!(f, "exit code {}", code),
            ProcessStatus::Terminated => write!(f, "terminated"),
            ProcessStatus::TimedOut => write!(f, "timed out"),
        }
    }
}

/// Result of a single download attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    Success,
    RetryableFailure(ProcessStatus),
}

/// Parameters of one workshop item download.
#[derive(Debug, Clone, Copy)]
pub struct DownloadRequest<'a> {
    pub install_root: &'a Path,
    pub username: &'a str,
    pub app_id: u32,
    pub item_id: &'a str,
}

/// An external tool able to download workshop items.
pub trait Downloader {
    /// Short name used in log messages.
    fn name(&self) -> &str;

    /// Log in once so later downloads can reuse the cached credentials.
    fn cache_credentials(&mut self, username: &str) -> Result<ProcessStatus>;

    /// Run one download attempt and wait for it to finish.
    fn download_item(&mut self, request: &DownloadRequest<'_>) -> Result<ProcessStatus>;

    /// Where the content of a successful download ends up.
    fn content_path(&self, request: &DownloadRequest<'_>) -> PathBuf;

    /// Decide whether a finished attempt succeeded.
    fn classify(&self, status: ProcessStatus) -> AttemptOutcome;
}

/// Interpret a steamcmd process status.
///
/// Only exit codes listed in [`STEAMCMD_SUCCESS_CODES`] are successes; every
/// other ending, including timeouts and signals, is retryable.
pub fn classify_steamcmd_exit(status: ProcessStatus) -> AttemptOutcome {
    match status {
        ProcessStatus::Exited(code) if STEAMCMD_SUCCESS_CODES.contains(&code) => {
            AttemptOutcome::Success
        }
        other => AttemptOutcome::RetryableFailure(other),
    }
}

/// [`Downloader`] backed by the `steamcmd` binary.
#[derive(Debug, Clone)]
pub struct SteamCmd {
    program: PathBuf,
    timeout: Option<Duration>,
}

impl SteamCmd {
    /// Create a downloader running `program`, with no timeout.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            timeout: None,
        }
    }

    /// Kill any steamcmd process that runs longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Arguments for a single workshop item download.
    pub fn download_args(request: &DownloadRequest<'_>) -> Vec<OsString> {
        vec![
            "+force_install_dir".into(),
            request.install_root.as_os_str().to_os_string(),
            "+login".into(),
            request.username.into(),
            "+workshop_download_item".into(),
            request.app_id.to_string().into(),
            request.item_id.into(),
            "+quit".into(),
        ]
    }

    /// Arguments for caching the login credentials.
    pub fn login_args(username: &str) -> Vec<OsString> {
        vec!["+login".into(), username.into(), "+quit".into()]
    }

    fn run(&self, args: Vec<OsString>) -> Result<ProcessStatus> {
        debug!("Running {} {:?}", self.program.display(), args);

        // stdio stays inherited so steamcmd can prompt for a password or Steam Guard code
        let mut child = Command::new(&self.program)
            .args(&args)
            .spawn()
            .map_err(|source| Error::DownloaderSpawn {
                program: self.program.clone(),
                source,
            })?;

        match self.timeout {
            None => Ok(child.wait()?.into()),
            Some(timeout) => wait_with_timeout(&mut child, timeout),
        }
    }
}

impl Downloader for SteamCmd {
    fn name(&self) -> &str {
        "SteamCMD"
    }

    fn cache_credentials(&mut self, username: &str) -> Result<ProcessStatus> {
        self.run(Self::login_args(username))
    }

    fn download_item(&mut self, request: &DownloadRequest<'_>) -> Result<ProcessStatus> {
        self.run(Self::download_args(request))
    }

    fn content_path(&self, request: &DownloadRequest<'_>) -> PathBuf {
        let mut path = request.install_root.to_path_buf();
        path.extend(WORKSHOP_CONTENT_DIR);
        path.join(request.app_id.to_string()).join(request.item_id)
    }

    fn classify(&self, status: ProcessStatus) -> AttemptOutcome {
        classify_steamcmd_exit(status)
    }
}

fn wait_with_timeout(child: &mut Child, timeout: Duration) -> Result<ProcessStatus> {
    // a timeout past the end of the clock never expires
    let Some(deadline) = Instant::now().checked_add(timeout) else {
        return Ok(child.wait()?.into());
    };
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(status.into());
        }

        let now = Instant::now();
        if now >= deadline {
            warn!("Downloader still running after {:?}, killing it", timeout);
            if let Err(e) = child.kill() {
                // the process may have exited between try_wait and kill
                debug!("Failed to kill downloader: {}", e);
            }
            child.wait()?;
            return Ok(ProcessStatus::TimedOut);
        }

        thread::sleep(POLL_INTERVAL.min(deadline - now));
    }
}
