//! Install directory layout.
//!
//! The install root is where steamcmd downloads workshop content. Inside it a
//! fixed `Workshop` directory (the publish root) holds one `@<name>` link per
//! mod, pointing at the downloaded content.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;

use crate::defaults::{LINK_PREFIX, PUBLISH_DIR_NAME};
use crate::error::{Error, Result};

/// Resolved install and publish directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallLayout {
    install_root: PathBuf,
    publish_root: PathBuf,
}

impl InstallLayout {
    /// Make sure the install root and its publish directory exist.
    ///
    /// Creation is attempted first; if it fails the directory is checked
    /// again and an existing directory counts as success, so resolving the
    /// same root twice is harmless. The install root is made absolute since
    /// steamcmd does not accept relative install directories.
    pub fn resolve(root: &Path) -> Result<Self> {
        let install_root = std::path::absolute(root).map_err(|e| install_dir_error(root, &e))?;
        fs::create_dir_all(&install_root).map_err(|e| install_dir_error(&install_root, &e))?;
        if !install_root.is_dir() {
            return Err(Error::InstallDir {
                path: install_root,
                message: "not a directory".to_string(),
            });
        }

        let publish_root = install_root.join(PUBLISH_DIR_NAME);
        match fs::create_dir(&publish_root) {
            Ok(()) => debug!("Created publish directory {}", publish_root.display()),
            Err(_) if publish_root.is_dir() => {
                debug!("Using existing publish directory {}", publish_root.display())
            }
            Err(e) => return Err(install_dir_error(&publish_root, &e)),
        }

        Ok(Self {
            install_root,
            publish_root,
        })
    }

    pub fn install_root(&self) -> &Path {
        &self.install_root
    }

    pub fn publish_root(&self) -> &Path {
        &self.publish_root
    }

    /// Where the published link for a mod lives.
    pub fn link_path(&self, display_name: &str) -> PathBuf {
        self.publish_root.join(format!("{}{}", LINK_PREFIX, display_name))
    }
}

fn install_dir_error(path: &Path, error: &io::Error) -> Error {
    Error::InstallDir {
        path: path.to_path_buf(),
        message: error.to_string(),
    }
}
