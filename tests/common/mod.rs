//! Shared test utilities for integration and E2E tests.
//!
//! This module provides common fixtures, helper functions, and manifests
//! to reduce duplication across test files.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new()
//!         .with_manifest(manifests::TWO_MODS)
//!         .with_fake_steamcmd(&[]);
//!     fixture.command().assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::manifests;
    pub use super::TestFixture;
}

/// Launcher preset snippets for testing.
#[allow(dead_code)]
pub mod manifests {
    /// Two well-formed mods.
    pub const TWO_MODS: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<addons-presets>
  <mod>
    <modname>CBA_A3</modname>
    <link>https://steamcommunity.com/sharedfiles/filedetails/?id=450814997</link>
  </mod>
  <mod>
    <modname>ace</modname>
    <link>https://steamcommunity.com/sharedfiles/filedetails/?id=463939057</link>
  </mod>
</addons-presets>
"#;

    /// A single mod.
    pub const ONE_MOD: &str = r#"<addons-presets>
  <mod>
    <modname>CBA_A3</modname>
    <link>https://steamcommunity.com/sharedfiles/filedetails/?id=450814997</link>
  </mod>
</addons-presets>
"#;

    /// The first link carries no item id, the second is fine.
    pub const MALFORMED_FIRST: &str = r#"<addons-presets>
  <mod>
    <modname>broken</modname>
    <link>https://steamcommunity.com/sharedfiles/filedetails/</link>
  </mod>
  <mod>
    <modname>ace</modname>
    <link>https://steamcommunity.com/sharedfiles/filedetails/?id=463939057</link>
  </mod>
</addons-presets>
"#;

    /// An entry without a link element.
    pub const MISSING_LINK: &str = r#"<addons-presets>
  <mod>
    <modname>CBA_A3</modname>
  </mod>
</addons-presets>
"#;

    /// Not XML at all.
    pub const NOT_XML: &str = "modname=CBA_A3\n";
}

/// Shell script standing in for steamcmd.
///
/// Every invocation appends its arguments to `calls.log`. Download calls pop
/// the next step from `codes` (0 once it is empty) and create the content
/// directory on success, the way steamcmd lays it out. A `hang` step replaces
/// the script with a long `sleep`, so killing it leaves nothing behind.
#[cfg(unix)]
const FAKE_STEAMCMD: &str = r#"#!/bin/sh
dir="$(dirname "$0")"
echo "$*" >> "$dir/calls.log"
case "$*" in
  *workshop_download_item*) ;;
  *) exit 0 ;;
esac
code=0
if [ -s "$dir/codes" ]; then
  code=$(head -n 1 "$dir/codes")
  tail -n +2 "$dir/codes" > "$dir/codes.next"
  mv "$dir/codes.next" "$dir/codes"
fi
if [ "$code" = "hang" ]; then
  exec sleep 30
fi
if [ "$code" = "0" ] || [ "$code" = "10" ]; then
  mkdir -p "$2/steamapps/workshop/content/$6/$7"
fi
exit "$code"
"#;

/// Account name passed by [`TestFixture::command`].
pub const USERNAME: &str = "server_admin";

/// A test fixture that provides a temporary directory holding a manifest,
/// an install directory and, on unix, a fake steamcmd.
///
/// # Example
///
/// ```rust,ignore
/// let fixture = TestFixture::new()
///     .with_manifest(manifests::ONE_MOD)
///     .with_fake_steamcmd(&[7, 10]);
///
/// fixture.command().assert().success();
/// assert_eq!(fixture.download_calls().len(), 2);
/// ```
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Write `preset.xml` with the given content.
    pub fn with_manifest(self, content: &str) -> Self {
        self.temp_dir
            .child("preset.xml")
            .write_str(content)
            .expect("Failed to write manifest");
        self
    }

    /// Install the fake steamcmd, failing download calls with `codes` in order.
    #[cfg(unix)]
    #[allow(dead_code)]
    pub fn with_fake_steamcmd(self, codes: &[i32]) -> Self {
        let steps: Vec<String> = codes.iter().map(i32::to_string).collect();
        let steps: Vec<&str> = steps.iter().map(String::as_str).collect();
        self.with_fake_steamcmd_steps(&steps)
    }

    /// Install the fake steamcmd with raw download steps: exit codes or `hang`.
    #[cfg(unix)]
    #[allow(dead_code)]
    pub fn with_fake_steamcmd_steps(self, steps: &[&str]) -> Self {
        use std::os::unix::fs::PermissionsExt;

        let script = self.temp_dir.child("steamcmd/steamcmd");
        script
            .write_str(FAKE_STEAMCMD)
            .expect("Failed to write fake steamcmd");
        std::fs::set_permissions(script.path(), std::fs::Permissions::from_mode(0o755))
            .expect("Failed to make fake steamcmd executable");

        let codes: String = steps.iter().map(|step| format!("{}\n", step)).collect();
        self.temp_dir
            .child("steamcmd/codes")
            .write_str(&codes)
            .expect("Failed to write exit codes");
        self
    }

    /// Add a file with the given path and content.
    #[allow(dead_code)]
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Get the path to the manifest.
    pub fn manifest_path(&self) -> PathBuf {
        self.path().join("preset.xml")
    }

    /// Get the install directory handed to the tool.
    pub fn install_dir(&self) -> PathBuf {
        self.path().join("server")
    }

    /// Get the directory holding the fake steamcmd.
    pub fn steamcmd_dir(&self) -> PathBuf {
        self.path().join("steamcmd")
    }

    /// Get the path a mod link is published at.
    #[allow(dead_code)]
    pub fn link_path(&self, display_name: &str) -> PathBuf {
        self.install_dir()
            .join("Workshop")
            .join(format!("@{}", display_name))
    }

    /// Get the path steamcmd downloads an Arma 3 item to.
    #[allow(dead_code)]
    pub fn content_path(&self, item_id: &str) -> PathBuf {
        self.install_dir()
            .join("steamapps/workshop/content/107410")
            .join(item_id)
    }

    /// Every recorded steamcmd invocation, in order.
    #[allow(dead_code)]
    pub fn steamcmd_calls(&self) -> Vec<String> {
        std::fs::read_to_string(self.steamcmd_dir().join("calls.log"))
            .map(|log| log.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// Recorded steamcmd invocations that downloaded an item.
    #[allow(dead_code)]
    pub fn download_calls(&self) -> Vec<String> {
        self.steamcmd_calls()
            .into_iter()
            .filter(|call| call.contains("+workshop_download_item"))
            .collect()
    }

    /// Get access to the underlying TempDir for advanced usage.
    #[allow(dead_code)]
    pub fn temp_dir(&self) -> &assert_fs::TempDir {
        &self.temp_dir
    }

    /// Create a child path in the temp directory.
    #[allow(dead_code)]
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl TestFixture {
    /// Create a command running the full sync against this fixture.
    ///
    /// Logging is uncolored and environment overrides are cleared so the
    /// assertions only see the flags given here.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("workshop-sync");
        cmd.current_dir(self.path())
            .env_remove("STEAM_USERNAME")
            .env_remove("STEAM_WEB_API_KEY")
            .env_remove("STEAMCMD_DIR")
            .env("NO_COLOR", "1")
            .arg("-l")
            .arg(USERNAME)
            .arg("-f")
            .arg(self.manifest_path())
            .arg("-install_dir")
            .arg(self.install_dir())
            .arg("-steam_cmd_dir")
            .arg(self.steamcmd_dir());
        cmd
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_creates_temp_dir() {
        let fixture = TestFixture::new();
        assert!(fixture.path().exists());
    }

    #[test]
    fn test_fixture_with_manifest() {
        let fixture = TestFixture::new().with_manifest(manifests::ONE_MOD);
        assert!(fixture.manifest_path().exists());
    }

    #[test]
    fn test_no_calls_before_running() {
        let fixture = TestFixture::new();
        assert!(fixture.steamcmd_calls().is_empty());
    }
}
