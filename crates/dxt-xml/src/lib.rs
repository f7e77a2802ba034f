//! Element tree for word-processing package parts.
//!
//! Parts are parsed into an owned [`XmlDocument`] whose nodes follow the
//! element-tree text model (`text` before the first child, `tail` after the
//! closing tag). Trees are plain owned values: `Clone` is a deep copy, which
//! is what the renderer relies on to keep an untouched copy of a part while
//! rendering another.
//!
//! # Example
//!
//! ```
//! use dxt_xml::XmlDocument;
//!
//! let mut doc = XmlDocument::parse(b"<w:document><w:body/></w:document>")?;
//! doc.body_mut().unwrap().children.push(dxt_xml::XmlNode::new("w:p"));
//! assert_eq!(doc.to_bytes(), b"<w:document><w:body><w:p/></w:body></w:document>");
//! # Ok::<(), dxt_xml::XmlError>(())
//! ```

mod error;
mod node;
mod parser;
mod serializer;

pub use error::XmlError;
pub use node::{XmlNode, local_name};
pub use parser::parse;
pub use serializer::serialize;

/// A parsed part: optional prolog declaration plus the root element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDocument {
    /// Content of the `<?xml ...?>` declaration, without the delimiters.
    pub declaration: Option<String>,
    /// Root element.
    pub root: XmlNode,
}

impl XmlDocument {
    /// Create a document without a declaration.
    #[must_use]
    pub fn new(root: XmlNode) -> Self {
        Self {
            declaration: None,
            root,
        }
    }

    /// Parse a part from bytes.
    pub fn parse(bytes: &[u8]) -> Result<Self, XmlError> {
        parse(bytes)
    }

    /// Serialize without inserted whitespace.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        serialize(self)
    }

    /// The `body` element directly under the root, if any.
    #[must_use]
    pub fn body(&self) -> Option<&XmlNode> {
        self.root
            .children
            .iter()
            .find(|child| child.local_name() == "body")
    }

    /// The `body` element directly under the root, if any.
    pub fn body_mut(&mut self) -> Option<&mut XmlNode> {
        self.root
            .children
            .iter_mut()
            .find(|child| child.local_name() == "body")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_lookup_ignores_prefix() {
        let doc = XmlDocument::new(
            XmlNode::new("document").with_child(XmlNode::new("x:body").with_text("b")),
        );
        assert_eq!(doc.body().map(|b| b.text.as_str()), Some("b"));
    }

    #[test]
    fn test_body_missing() {
        let doc = XmlDocument::new(XmlNode::new("w:hdr"));
        assert!(doc.body().is_none());
    }
}
