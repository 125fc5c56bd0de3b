//! # Mod Manifest
//!
//! Parses the mod list exported by the game launcher into an ordered work
//! list. The export is an XML document whose root element holds one record
//! per mod:
//!
//! ```xml
//! <addons-presets>
//!   <mod>
//!     <modname>CBA_A3</modname>
//!     <link>https://steamcommunity.com/sharedfiles/filedetails/?id=450814997</link>
//!   </mod>
//! </addons-presets>
//! ```
//!
//! Records are read in document order, which is also the download order.
//! Field text is taken as-is apart from trimming surrounding whitespace: the
//! link is not validated as a URL and duplicate records are kept.

use std::fs;
use std::path::Path;

use xot::{NameId, Node, Xot};

use crate::error::{Error, Result};

/// Element holding the display name of a mod.
pub const NAME_FIELD: &str = "modname";

/// Element holding the source reference (workshop link) of a mod.
pub const LINK_FIELD: &str = "link";

/// One mod to download, as listed in the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    display_name: String,
    source_reference: String,
}

impl ManifestEntry {
    /// Create an entry from its display name and source reference.
    pub fn new(display_name: impl Into<String>, source_reference: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            source_reference: source_reference.into(),
        }
    }

    /// Name shown to the user and used for the published link.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Opaque reference string, usually a workshop URL.
    pub fn source_reference(&self) -> &str {
        &self.source_reference
    }

    /// Extract the numeric workshop item id from the source reference.
    ///
    /// The id is the second `=`-delimited token of the reference, cut at any
    /// following query (`&`) or fragment (`#`) part. A reference without a
    /// `=` or with a non-numeric id fails with [`Error::MalformedReference`].
    pub fn item_id(&self) -> Result<&str> {
        let id = self
            .source_reference
            .split('=')
            .nth(1)
            .and_then(|token| token.split(['&', '#']).next())
            .map(str::trim)
            .filter(|id| !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()));

        id.ok_or_else(|| Error::MalformedReference {
            name: self.display_name.clone(),
            reference: self.source_reference.clone(),
        })
    }
}

/// Ordered list of mods parsed from a manifest document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    entries: Vec<ManifestEntry>,
}

impl Manifest {
    /// Build a manifest from already known entries, keeping their order.
    pub fn from_entries(entries: Vec<ManifestEntry>) -> Self {
        Self { entries }
    }

    /// Load and parse a manifest file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path).map_err(|source| Error::ManifestRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&source)
    }

    /// Parse a manifest document.
    ///
    /// Every element child of the root is a record and must contain a
    /// non-empty `<modname>` and `<link>` element. Comments and whitespace
    /// between records are ignored. Nothing is returned for a partially
    /// valid document: the first bad record fails the whole parse.
    pub fn parse(source: &str) -> Result<Self> {
        let mut xot = Xot::new();
        let name_field = xot.add_name(NAME_FIELD);
        let link_field = xot.add_name(LINK_FIELD);

        let root = xot.parse(source).map_err(|e| Error::ManifestParse {
            message: e.to_string(),
        })?;
        let document = xot.document_element(root).map_err(|e| Error::ManifestParse {
            message: e.to_string(),
        })?;

        let mut entries = Vec::new();
        let records = xot.children(document).filter(|node| xot.is_element(*node));
        for (index, record) in records.enumerate() {
            let display_name =
                field_text(&xot, record, name_field).ok_or(Error::ManifestField {
                    record: index + 1,
                    field: NAME_FIELD,
                })?;
            let source_reference =
                field_text(&xot, record, link_field).ok_or(Error::ManifestField {
                    record: index + 1,
                    field: LINK_FIELD,
                })?;
            entries.push(ManifestEntry {
                display_name,
                source_reference,
            });
        }

        Ok(Self { entries })
    }

    /// Entries in download order.
    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ManifestEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a Manifest {
    type Item = &'a ManifestEntry;
    type IntoIter = std::slice::Iter<'a, ManifestEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Trimmed text of the first child element named `field`, if non-empty.
fn field_text(xot: &Xot, record: Node, field: NameId) -> Option<String> {
    xot.children(record)
        .find(|child| {
            xot.element(*child)
                .is_some_and(|element| element.name() == field)
        })
        .map(|child| xot.string_value(child).trim().to_string())
        .filter(|text| !text.is_empty())
}
