//! # Workshop Sync CLI
//!
//! This is the binary entry point for the `workshop-sync` command-line tool.
//!
//! It normalizes the legacy single-dash flags, parses the command line with
//! `clap` and hands off to the library pipeline. The exit code reports whether
//! every mod in the manifest was downloaded.

mod cli;

use std::env;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<ExitCode> {
    let cli = cli::Cli::parse_from(cli::normalize_legacy_args(env::args_os()));
    cli.execute()
}
