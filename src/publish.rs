//! Publish downloaded mods into the `Workshop` directory.
//!
//! Publishing creates a directory symlink `Workshop/@<name>` pointing at the
//! downloaded content. It is best effort: a link that cannot be created is
//! reported as a warning and the run carries on, since the content itself
//! is already on disk.

use std::io;
use std::path::{Component, Path, PathBuf};

use log::{info, warn};

use crate::error::{Error, Result};
use crate::layout::InstallLayout;

/// Create the publish link for a downloaded mod, reporting the outcome.
///
/// Returns `true` when the link was created. Failures are logged as warnings
/// and never propagated.
pub fn publish(display_name: &str, content_path: &Path, layout: &InstallLayout) -> bool {
    info!("Attempting to link {} into the workshop folder...", display_name);
    match try_publish(display_name, content_path, layout) {
        Ok(link) => {
            info!("Link creation successful: {}", link.display());
            true
        }
        Err(e) => {
            warn!(
                "{}. Does the process have permission to create symlinks, or does the link already exist?",
                e
            );
            false
        }
    }
}

/// Create the publish link for a mod and return its path.
pub fn try_publish(
    display_name: &str,
    content_path: &Path,
    layout: &InstallLayout,
) -> Result<PathBuf> {
    let link = layout.link_path(display_name);
    let publish_error = |message: String| Error::Publish {
        link: link.clone(),
        target: content_path.to_path_buf(),
        message,
    };

    if !is_plain_name(display_name) {
        return Err(publish_error(format!(
            "'{}' cannot be used as a folder name",
            display_name
        )));
    }

    create_dir_link(content_path, &link).map_err(|e| publish_error(e.to_string()))?;
    Ok(link)
}

/// Whether `name` stays a single component once joined onto the publish root.
fn is_plain_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !name.contains(['/', '\\'])
}

#[cfg(unix)]
fn create_dir_link(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn create_dir_link(target: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_dir(target, link)
}

#[cfg(not(any(unix, windows)))]
fn create_dir_link(_target: &Path, _link: &Path) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "symbolic links are not supported on this platform",
    ))
}
