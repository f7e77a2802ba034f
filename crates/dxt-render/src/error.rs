//! Error types for rendering.

use std::path::PathBuf;

use dxt_package::PackageError;

use crate::processor::ProcessorError;

/// Error returned by a render call.
///
/// Rendering is all-or-nothing: when any of these is returned, no output
/// package was produced (except for [`RenderError::Write`], which carries the
/// finished bytes so the caller can retry the write).
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Template package could not be read, parsed or serialized.
    #[error("{0}")]
    Package(#[from] PackageError),

    /// A processor failed.
    #[error("processor `{processor}` failed on {part}: {source}")]
    Processor {
        /// Processor name.
        processor: String,
        /// Part being processed.
        part: String,
        /// Processor error.
        #[source]
        source: ProcessorError,
    },

    /// Primary part does not have the structure multi-context rendering needs.
    #[error("{0}")]
    Structure(#[from] StructureError),

    /// Render was called with an empty context sequence.
    #[error("no render contexts supplied")]
    NoContexts,

    /// Rendered output could not be written.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        /// Destination path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
        /// Rendered package bytes.
        bytes: Vec<u8>,
    },
}

/// Structural precondition violated while merging contexts.
#[derive(Debug, thiserror::Error)]
pub enum StructureError {
    /// Root element has no `body` child.
    #[error("{part} has no body element")]
    MissingBody {
        /// Part name.
        part: String,
    },

    /// Body does not end a section exactly once.
    #[error("{part} body has {count} section properties, expected exactly one")]
    SectionCount {
        /// Part name.
        part: String,
        /// Number of body-level section property elements found.
        count: usize,
    },
}
