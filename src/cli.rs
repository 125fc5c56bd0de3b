//! CLI argument parsing and run setup

use std::ffi::OsString;
use std::num::NonZeroU32;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, LevelFilter};

use workshop_sync::config::RunConfig;
use workshop_sync::defaults::{steamcmd_program, ARMA3_APP_ID};
use workshop_sync::downloader::SteamCmd;
use workshop_sync::exit_codes;
use workshop_sync::logging::{self, ColorChoice};
use workshop_sync::pipeline::PipelineController;
use workshop_sync::retry::RetryPolicy;

/// Single-dash long flags accepted for compatibility, and their clap spelling.
const LEGACY_FLAGS: [(&str, &str); 3] = [
    ("-install_dir", "--install-dir"),
    ("-steam_web_api_key", "--steam-web-api-key"),
    ("-steam_cmd_dir", "--steam-cmd-dir"),
];

/// Workshop Sync - Download Steam Workshop mods from a launcher preset and link them into a server
#[derive(Parser, Debug)]
#[command(name = "workshop-sync")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Launcher preset (XML export) listing the mods to download
    #[arg(short = 'f', long = "manifest", value_name = "PATH")]
    manifest: PathBuf,

    /// Steam account name
    #[arg(short = 'l', long = "login", value_name = "NAME", env = "STEAM_USERNAME")]
    username: String,

    /// Server install directory
    #[arg(long, value_name = "PATH")]
    install_dir: PathBuf,

    /// Steam Web API key (accepted for compatibility, not used)
    #[arg(long, value_name = "KEY", env = "STEAM_WEB_API_KEY", hide_env_values = true)]
    steam_web_api_key: Option<String>,

    /// Directory containing steamcmd (defaults to looking it up on PATH)
    #[arg(long, value_name = "PATH", env = "STEAMCMD_DIR")]
    steam_cmd_dir: Option<PathBuf>,

    /// Steam application id the workshop items belong to
    #[arg(long, value_name = "ID", default_value_t = ARMA3_APP_ID)]
    app_id: u32,

    /// Give up on a mod after this many download attempts (default: retry forever)
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    max_attempts: Option<u32>,

    /// Seconds to wait before retrying a failed download, doubling on each failure
    #[arg(long, value_name = "SECONDS", default_value_t = 0)]
    retry_delay: u64,

    /// Kill steamcmd runs that take longer than this many seconds
    #[arg(long, value_name = "SECONDS", value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,

    /// Show what would be downloaded and linked without doing it
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Colorize output (always, never, auto)
    #[arg(long, value_name = "WHEN", value_enum, default_value_t = ColorChoice::Auto)]
    color: ColorChoice,

    /// Set log level (off, error, warn, info, debug, trace)
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    log_level: LevelFilter,
}

/// Rewrite legacy single-dash long flags into the form clap understands.
pub fn normalize_legacy_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| {
            LEGACY_FLAGS
                .iter()
                .find(|(legacy, _)| arg.to_str() == Some(*legacy))
                .map(|(_, modern)| OsString::from(*modern))
                .unwrap_or(arg)
        })
        .collect()
}

impl Cli {
    /// Run the sync and map its outcome to a process exit code
    pub fn execute(self) -> Result<ExitCode> {
        logging::init(self.log_level, self.color).context("Failed to set up logging")?;

        if self.steam_web_api_key.is_some() {
            debug!("A Steam Web API key was given; it is not used for downloads");
        }

        let downloader_program = steamcmd_program(self.steam_cmd_dir.as_deref());
        let mut downloader =
            SteamCmd::new(downloader_program).with_timeout(self.timeout.map(Duration::from_secs));
        debug!("Using downloader {}", downloader.program().display());

        let summary = PipelineController::new(self.run_config(), &mut downloader).run();

        Ok(if summary.is_success() {
            ExitCode::from(exit_codes::SUCCESS)
        } else {
            ExitCode::from(exit_codes::FAILURE)
        })
    }

    fn run_config(&self) -> RunConfig {
        let retry = match self.max_attempts.and_then(NonZeroU32::new) {
            Some(max) => RetryPolicy::bounded(max),
            None => RetryPolicy::unbounded(),
        }
        .with_initial_delay(Duration::from_secs(self.retry_delay));

        RunConfig::new(&self.manifest, &self.install_dir, self.username.as_str())
            .with_app_id(self.app_id)
            .with_retry(retry)
            .with_dry_run(self.dry_run)
    }
}
