//! Minimal word-processing packages for tests.

use dxt_package::{Package, PartContent};
use dxt_xml::XmlDocument;

pub(crate) const SECTION: &str = r#"<w:sectPr><w:pgSz w:w="12240" w:h="15840"/></w:sectPr>"#;

pub(crate) const DOCUMENT_RELS: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    "\r\n",
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    r#"<Relationship Id="rId7" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/header" Target="header1.xml"/>"#,
    "</Relationships>",
);

const CONTENT_TYPES: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
    r#"<Default Extension="xml" ContentType="application/xml"/>"#,
    "</Types>",
);

const STYLES: &str = "<w:styles xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\n  <w:style w:styleId=\"Normal\"/>\n</w:styles>";

const HEADER: &str = concat!(
    r#"<w:hdr xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">"#,
    "<w:p><w:r><w:t>{{name}}</w:t></w:r></w:p></w:hdr>",
);

/// Primary part with the given body markup.
pub(crate) fn document_xml(body: &str) -> String {
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" "#,
            r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
            "<w:body>{}</w:body></w:document>",
        ),
        body
    )
}

/// Single-run paragraph.
pub(crate) fn paragraph(text: &str) -> String {
    format!("<w:p><w:r><w:t>{text}</w:t></w:r></w:p>")
}

/// Package with the given primary part plus typical supporting entries.
pub(crate) fn sample_package(document: &str) -> Package {
    let mut package = Package::new();
    let parts: [(&str, &[u8]); 6] = [
        ("[Content_Types].xml", CONTENT_TYPES.as_bytes()),
        ("word/document.xml", document.as_bytes()),
        ("word/_rels/document.xml.rels", DOCUMENT_RELS.as_bytes()),
        ("word/styles.xml", STYLES.as_bytes()),
        ("word/header1.xml", HEADER.as_bytes()),
        ("word/media/image1.png", &[0x89, b'P', b'N', b'G', 0x00, 0xff]),
    ];
    for (name, bytes) in parts {
        package.set_part(name, PartContent::Raw(bytes.to_vec()));
    }
    package
}

/// Serialized body children of a primary part.
pub(crate) fn body_of(doc: &XmlDocument) -> String {
    doc.body()
        .expect("document has a body")
        .children
        .iter()
        .map(|child| String::from_utf8(XmlDocument::new(child.clone()).to_bytes()).unwrap())
        .collect()
}
