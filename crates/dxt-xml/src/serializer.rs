//! Compact serializer for document trees.

use crate::{XmlDocument, XmlNode};

/// Serialize a document back to bytes.
///
/// No indentation or separator whitespace is inserted; the only character
/// data written is what the tree holds in `text` and `tail`.
pub fn serialize(doc: &XmlDocument) -> Vec<u8> {
    let mut out = String::with_capacity(4096);

    if let Some(declaration) = &doc.declaration {
        out.push_str("<?");
        out.push_str(declaration);
        out.push_str("?>");
    }
    serialize_node(&doc.root, &mut out);

    out.into_bytes()
}

/// Serialize a single node recursively.
fn serialize_node(node: &XmlNode, out: &mut String) {
    out.push('<');
    out.push_str(&node.tag);

    for (key, value) in &node.attrs {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        escape_into(value, true, out);
        out.push('"');
    }

    if node.children.is_empty() && node.text.is_empty() {
        out.push_str("/>");
    } else {
        out.push('>');
        escape_into(&node.text, false, out);
        for child in &node.children {
            serialize_node(child, out);
        }
        out.push_str("</");
        out.push_str(&node.tag);
        out.push('>');
    }

    escape_into(&node.tail, false, out);
}

/// Escape XML special characters.
fn escape_into(text: &str, in_attribute: bool, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if in_attribute => out.push_str("&quot;"),
            '\'' if in_attribute => out.push_str("&apos;"),
            '\n' if in_attribute => out.push_str("&#10;"),
            '\t' if in_attribute => out.push_str("&#9;"),
            '\r' if in_attribute => out.push_str("&#13;"),
            _ => out.push(ch),
        }
    }
}
