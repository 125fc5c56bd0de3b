//! Process exit codes of the `workshop-sync` binary.
//!
//! - `0`: every mod was downloaded (publish failures are only warnings)
//! - `1`: the run was aborted, or at least one mod was never downloaded
//! - `2`: invalid command-line usage, reported by clap

/// Every mod in the manifest was downloaded.
pub const SUCCESS: u8 = 0;

/// The run aborted during setup or at least one mod failed.
pub const FAILURE: u8 = 1;

/// Missing or invalid command-line arguments.
pub const USAGE: u8 = 2;
