//! Default values for workshop-sync.
//!
//! This module centralizes the fixed names and identifiers of the Steam
//! Workshop layout so that the manifest, layout and downloader modules agree
//! on them.

use std::path::{Path, PathBuf};

/// Steam application id the workshop items are downloaded for (Arma 3).
pub const ARMA3_APP_ID: u32 = 107410;

/// Name of the publish directory created inside the install root.
pub const PUBLISH_DIR_NAME: &str = "Workshop";

/// Prefix the game expects on mod folder names.
pub const LINK_PREFIX: &str = "@";

/// Path, relative to the install root, where steamcmd stores workshop content.
pub const WORKSHOP_CONTENT_DIR: [&str; 3] = ["steamapps", "workshop", "content"];

/// Exit codes steamcmd reports for a completed workshop download.
///
/// steamcmd returns 10 on downloads that otherwise completed fine.
pub const STEAMCMD_SUCCESS_CODES: [i32; 2] = [0, 10];

/// Name of the steamcmd executable on this platform.
pub fn steamcmd_program_name() -> &'static str {
    if cfg!(windows) {
        "steamcmd.exe"
    } else {
        "steamcmd"
    }
}

/// Returns the steamcmd program to run.
///
/// With a steamcmd directory the executable inside it is used, otherwise the
/// bare program name is resolved through `PATH` when it is spawned.
pub fn steamcmd_program(steam_cmd_dir: Option<&Path>) -> PathBuf {
    match steam_cmd_dir {
        Some(dir) => dir.join(steamcmd_program_name()),
        None => PathBuf::from(steamcmd_program_name()),
    }
}
