//! Error types for part parsing.

/// Error raised while parsing a part.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum XmlError {
    /// XML parsing error.
    #[error("XML parse error: {0}")]
    Parse(#[from] quick_xml::Error),

    /// XML attribute error.
    #[error("XML attribute error: {0}")]
    Attr(#[from] quick_xml::events::attributes::AttrError),

    /// Encoding error during XML parsing.
    #[error("encoding error: {0}")]
    Encoding(#[from] quick_xml::encoding::EncodingError),

    /// Input contains no root element.
    #[error("document has no root element")]
    NoRoot,

    /// A second top-level element follows the root.
    #[error("unexpected second root element <{0}>")]
    MultipleRoots(String),

    /// Closing tag without a matching opening tag.
    #[error("unexpected closing tag </{0}>")]
    UnexpectedEnd(String),

    /// Input ended inside an element.
    #[error("element <{0}> is not closed")]
    Unclosed(String),
}
