//! # Workshop Sync Library
//!
//! This library downloads the Steam Workshop mods listed in a launcher preset
//! into a dedicated server install and exposes each mod under the server's
//! `Workshop` directory as an `@<name>` link. It is used by the
//! `workshop-sync` command-line tool but the pipeline can be driven from any
//! application that provides its own [`downloader::Downloader`].
//!
//! ## Quick Example
//!
//! ```
//! use workshop_sync::manifest::Manifest;
//!
//! let manifest = Manifest::parse(
//!     r#"<addons-presets>
//!          <mod>
//!            <modname>CBA_A3</modname>
//!            <link>https://steamcommunity.com/sharedfiles/filedetails/?id=450814997</link>
//!          </mod>
//!        </addons-presets>"#,
//! )
//! .unwrap();
//!
//! assert_eq!(manifest.len(), 1);
//! assert_eq!(manifest.entries()[0].item_id().unwrap(), "450814997");
//! ```
//!
//! ## Core Concepts
//!
//! - **Manifest (`manifest`)**: the ordered list of mods to download, parsed
//!   from the launcher's XML export.
//! - **Layout (`layout`)**: the install root and its `Workshop` publish
//!   directory.
//! - **Downloader (`downloader`)**: the external tool doing the actual
//!   download, `steamcmd` by default, and the rules for reading its exit codes.
//! - **Fetching (`fetch`, `retry`)**: one entry at a time, retried until the
//!   downloader reports success.
//! - **Publishing (`publish`)**: best-effort links from `Workshop/@<name>` to
//!   the downloaded content.
//! - **Pipeline (`pipeline`)**: ties everything together and reports a
//!   [`pipeline::RunSummary`].

pub mod config;
pub mod defaults;
pub mod downloader;
pub mod error;
pub mod exit_codes;
pub mod fetch;
pub mod layout;
pub mod logging;
pub mod manifest;
pub mod pipeline;
pub mod publish;
pub mod retry;
pub mod session;

#[cfg(test)]
mod manifest_proptest;
#[cfg(test)]
pub(crate) mod test_helpers;
