//! Error types for package reading and writing.

use std::path::PathBuf;

/// Error reading or writing a package.
#[derive(Debug, thiserror::Error)]
pub enum PackageError {
    /// File could not be read or written.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// File being accessed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Archive container error (not a zip file, corrupt directory, ...).
    #[error("archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Entry data could not be read or written.
    #[error("failed to transfer entry {part}: {source}")]
    Entry {
        /// Entry name.
        part: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Entry is not well-formed markup.
    #[error("failed to parse {part}: {source}")]
    Xml {
        /// Entry name.
        part: String,
        /// Underlying error.
        #[source]
        source: dxt_xml::XmlError,
    },

    /// Requested entry does not exist.
    #[error("package has no entry named {0}")]
    MissingPart(String),
}
