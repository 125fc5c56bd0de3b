//! # Error Handling
//!
//! This module defines the centralized error type for `workshop-sync`. It uses
//! `thiserror` to build a single `Error` enum covering every failure the
//! download pipeline can run into, each with enough context to produce a
//! useful message on the console.
//!
//! The variants fall into three groups:
//!
//! - **Setup errors** abort the run before any download starts: the manifest
//!   cannot be read ([`Error::ManifestRead`]), is not well-formed
//!   ([`Error::ManifestParse`]) or has a record without a required field
//!   ([`Error::ManifestField`]); the install layout cannot be created
//!   ([`Error::InstallDir`]).
//! - **Per-entry errors** fail a single mod and let the pipeline move on:
//!   [`Error::MalformedReference`], [`Error::RetriesExhausted`] and
//!   [`Error::DownloaderSpawn`].
//! - **Publish errors** ([`Error::Publish`]) are only ever logged as warnings.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for workshop-sync operations
#[derive(Error, Debug)]
pub enum Error {
    /// The manifest file could not be read from disk.
    #[error("Cannot read manifest {}: {source}", path.display())]
    ManifestRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The manifest is not a well-formed XML document.
    #[error("Manifest parsing error: {message}")]
    ManifestParse { message: String },

    /// A manifest record is missing one of its required fields.
    ///
    /// `record` is 1-based and counts element records only.
    #[error("Manifest record {record} is missing the <{field}> field")]
    ManifestField { record: usize, field: &'static str },

    /// The install root or its publish subdirectory can neither be found nor created.
    #[error("Install directory error for {}: {message}", path.display())]
    InstallDir { path: PathBuf, message: String },

    /// The source reference of a mod does not carry a workshop item id.
    #[error("Malformed reference for {name}: '{reference}' has no item id after '='")]
    MalformedReference { name: String, reference: String },

    /// The publish link for a downloaded mod could not be created.
    #[error("Cannot link {} -> {}: {message}", link.display(), target.display())]
    Publish {
        link: PathBuf,
        target: PathBuf,
        message: String,
    },

    /// The external downloader could not be started at all.
    #[error("Failed to start downloader {}: {source}", program.display())]
    DownloaderSpawn {
        program: PathBuf,
        source: std::io::Error,
    },

    /// Bounded retry mode gave up on an item.
    #[error("Giving up on {name} ({item_id}) after {attempts} attempts, last status: {last_status}")]
    RetriesExhausted {
        name: String,
        item_id: String,
        attempts: u32,
        last_status: String,
    },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error means the manifest could not be turned into a work list.
    pub fn is_manifest_error(&self) -> bool {
        matches!(
            self,
            Error::ManifestRead { .. } | Error::ManifestParse { .. } | Error::ManifestField { .. }
        )
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
