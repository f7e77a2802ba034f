//! Zip package model for document templates.
//!
//! A [`Package`] holds every entry of a zip-structured document (for example a
//! `.docx` file) in source order. Entries stay as raw bytes until something
//! asks for their tree through [`Package::xml_mut`], at which point the part is
//! parsed once and the tree is cached in place. Entries that are never parsed
//! are written back byte-for-byte.
//!
//! # Example
//!
//! ```
//! use dxt_package::{Package, PartContent};
//!
//! let mut package = Package::new();
//! package.set_part("word/document.xml", PartContent::Raw(b"<w:document/>".to_vec()));
//! let bytes = package.to_bytes()?;
//!
//! let mut reopened = Package::from_bytes(&bytes)?;
//! assert_eq!(reopened.xml_mut("word/document.xml")?.root.tag, "w:document");
//! # Ok::<(), dxt_package::PackageError>(())
//! ```

mod error;
mod writer;

use std::borrow::Cow;
use std::io::{Cursor, Read, Seek};
use std::path::Path;

use dxt_xml::XmlDocument;

pub use error::PackageError;

/// Content of a package entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartContent {
    /// Unparsed bytes, written back verbatim.
    Raw(Vec<u8>),
    /// Parsed tree, serialized without inserted whitespace.
    Xml(XmlDocument),
}

impl PartContent {
    /// Bytes this content serializes to.
    #[must_use]
    pub fn to_bytes(&self) -> Cow<'_, [u8]> {
        match self {
            Self::Raw(bytes) => Cow::Borrowed(bytes),
            Self::Xml(doc) => Cow::Owned(doc.to_bytes()),
        }
    }

    /// Whether the content has been parsed.
    #[must_use]
    pub fn is_parsed(&self) -> bool {
        matches!(self, Self::Xml(_))
    }
}

#[derive(Debug, Clone)]
struct Part {
    name: String,
    content: PartContent,
}

/// In-memory set of package entries, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct Package {
    parts: Vec<Part>,
}

impl Package {
    /// Create an empty package.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a package from a file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PackageError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| PackageError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), size = bytes.len(), "Read package");
        Self::from_bytes(&bytes)
    }

    /// Read a package from an in-memory archive.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PackageError> {
        Self::from_reader(Cursor::new(bytes))
    }

    /// Read a package from any seekable archive source.
    ///
    /// Directory records are skipped; [`Package::to_bytes`] recreates them.
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self, PackageError> {
        let mut archive = zip::ZipArchive::new(reader)?;
        let mut package = Self::new();

        for index in 0..archive.len() {
            let mut file = archive.by_index(index)?;
            if file.is_dir() {
                continue;
            }
            let name = file.name().to_owned();
            let mut bytes = Vec::with_capacity(usize::try_from(file.size()).unwrap_or(0));
            file.read_to_end(&mut bytes)
                .map_err(|source| PackageError::Entry {
                    part: name.clone(),
                    source,
                })?;
            package.set_part(name, PartContent::Raw(bytes));
        }

        tracing::debug!(parts = package.len(), "Loaded package entries");
        Ok(package)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Whether the package has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Whether an entry with this name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.parts.iter().any(|part| part.name == name)
    }

    /// Entry names in insertion order.
    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().map(|part| part.name.as_str())
    }

    /// Content of an entry.
    #[must_use]
    pub fn part(&self, name: &str) -> Option<&PartContent> {
        self.parts
            .iter()
            .find(|part| part.name == name)
            .map(|part| &part.content)
    }

    /// Replace an entry's content, appending a new entry if the name is unknown.
    pub fn set_part(&mut self, name: impl Into<String>, content: PartContent) {
        let name = name.into();
        if let Some(part) = self.parts.iter_mut().find(|part| part.name == name) {
            part.content = content;
        } else {
            self.parts.push(Part { name, content });
        }
    }

    /// Parsed tree of an entry, parsing and caching it on first access.
    pub fn xml_mut(&mut self, name: &str) -> Result<&mut XmlDocument, PackageError> {
        let part = self
            .parts
            .iter_mut()
            .find(|part| part.name == name)
            .ok_or_else(|| PackageError::MissingPart(name.to_owned()))?;

        // Raw content is replaced by its parsed tree, so the loop runs at most twice.
        loop {
            match part.content {
                PartContent::Xml(ref mut doc) => return Ok(doc),
                PartContent::Raw(ref bytes) => {
                    let doc = XmlDocument::parse(bytes).map_err(|source| PackageError::Xml {
                        part: name.to_owned(),
                        source,
                    })?;
                    tracing::trace!(part = name, "Parsed part");
                    part.content = PartContent::Xml(doc);
                }
            }
        }
    }

    /// Serialize every entry into a zip archive.
    ///
    /// Parent directory records are written once each, before the first entry
    /// beneath them. The model is left unchanged and can be serialized again.
    pub fn to_bytes(&self) -> Result<Vec<u8>, PackageError> {
        let entries = self
            .parts
            .iter()
            .map(|part| (part.name.as_str(), part.content.to_bytes()));
        writer::write_archive(entries)
    }

    /// Serialize into a file at `path`.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<(), PackageError> {
        let path = path.as_ref();
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes).map_err(|source| PackageError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
