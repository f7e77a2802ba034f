//! Processor plug-in interface.

use dxt_xml::XmlDocument;

use crate::environment::RenderEnv;

/// A unit of work run against one parsed part.
///
/// Processors are registered against part-name patterns in a
/// [`ProcessorRegistry`](crate::ProcessorRegistry) and invoked in
/// registration order. They mutate the tree in place.
pub trait PartProcessor: Send + Sync {
    /// Short name used in logs and errors.
    fn name(&self) -> &str;

    /// Process a part.
    fn process(&self, part: &mut XmlDocument, env: &mut RenderEnv<'_>)
    -> Result<(), ProcessorError>;
}

/// Failure raised by a processor.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ProcessorError {
    /// Context has no value at the referenced path.
    #[error("no value for `{0}` in render context")]
    MissingValue(String),

    /// Expression could not be understood.
    #[error("malformed expression `{0}`")]
    Malformed(String),

    /// Value at the path is a sequence or mapping where text was expected.
    #[error("value for `{0}` is not a scalar")]
    NotScalar(String),

    /// Layout option has an unusable value.
    #[error("invalid layout option {name}={value}: {reason}")]
    InvalidOption {
        /// Option name.
        name: String,
        /// Offending value.
        value: String,
        /// What was expected.
        reason: String,
    },

    /// Error from a third-party processor.
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}
