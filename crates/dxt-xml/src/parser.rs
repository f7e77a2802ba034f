//! Part parser built on `quick-xml` events.

use std::borrow::Cow;
use std::io::BufRead;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::XmlError;
use crate::{XmlDocument, XmlNode};

/// Parse a part's bytes into a document tree.
///
/// Namespace prefixes are kept as written; `xmlns` declarations are retained
/// as ordinary attributes so the tree serializes back to an equivalent part.
pub fn parse(bytes: &[u8]) -> Result<XmlDocument, XmlError> {
    let mut reader = Reader::from_reader(bytes);
    reader.config_mut().trim_text(false);

    let mut buf = Vec::new();
    let mut declaration = None;
    let mut stack: Vec<XmlNode> = Vec::new();
    let mut root: Option<XmlNode> = None;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Decl(e) => {
                declaration = Some(reader.decoder().decode(&e)?.into_owned());
            }
            Event::Start(e) => {
                stack.push(element(&reader, &e)?);
            }
            Event::Empty(e) => {
                let node = element(&reader, &e)?;
                attach(&mut stack, &mut root, node)?;
            }
            Event::End(e) => {
                let node = stack.pop().ok_or_else(|| {
                    XmlError::UnexpectedEnd(String::from_utf8_lossy(e.name().as_ref()).into_owned())
                })?;
                attach(&mut stack, &mut root, node)?;
            }
            Event::Text(e) => {
                if let Some(parent) = stack.last_mut() {
                    let text = reader.decoder().decode(&e)?;
                    append_text(parent, &text);
                }
            }
            Event::GeneralRef(e) => {
                if let Some(parent) = stack.last_mut() {
                    let entity = reader.decoder().decode(&e)?;
                    append_text(parent, &decode_entity(&entity));
                }
            }
            Event::CData(e) => {
                if let Some(parent) = stack.last_mut() {
                    append_text(parent, &String::from_utf8_lossy(&e));
                }
            }
            Event::Eof => break,
            Event::Comment(_) | Event::PI(_) | Event::DocType(_) => {}
        }
        buf.clear();
    }

    if let Some(open) = stack.pop() {
        return Err(XmlError::Unclosed(open.tag));
    }
    let root = root.ok_or(XmlError::NoRoot)?;

    Ok(XmlDocument { declaration, root })
}

/// Build an element (without children) from a start or empty tag.
fn element<R: BufRead>(reader: &Reader<R>, e: &BytesStart) -> Result<XmlNode, XmlError> {
    let tag = decode_lossy(reader, e.name().as_ref());
    let mut node = XmlNode::new(tag);
    for attr in e.attributes() {
        let attr = attr?;
        let key = decode_lossy(reader, attr.key.as_ref());
        let raw = decode_lossy(reader, &attr.value);
        let raw = normalize_whitespace(&raw);
        let value = quick_xml::escape::unescape(&raw)
            .map_or_else(|_| raw.clone().into_owned(), Cow::into_owned);
        node.attrs.push((key, value));
    }
    Ok(node)
}

fn decode_lossy<R: BufRead>(reader: &Reader<R>, bytes: &[u8]) -> String {
    reader.decoder().decode(bytes).map_or_else(
        |_| String::from_utf8_lossy(bytes).into_owned(),
        Cow::into_owned,
    )
}

/// Literal line breaks and tabs in an attribute value read as spaces.
///
/// Character references are expanded afterwards, so `&#10;` still yields a
/// newline.
fn normalize_whitespace(raw: &str) -> Cow<'_, str> {
    if raw.contains(['\n', '\r', '\t']) {
        Cow::Owned(raw.replace("\r\n", " ").replace(['\n', '\r', '\t'], " "))
    } else {
        Cow::Borrowed(raw)
    }
}

/// Hand a finished element to its parent, or make it the document root.
fn attach(
    stack: &mut [XmlNode],
    root: &mut Option<XmlNode>,
    node: XmlNode,
) -> Result<(), XmlError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(node);
    } else if root.is_some() {
        return Err(XmlError::MultipleRoots(node.tag));
    } else {
        *root = Some(node);
    }
    Ok(())
}

/// Append text to node's text or last child's tail.
fn append_text(node: &mut XmlNode, text: &str) {
    if let Some(last_child) = node.children.last_mut() {
        last_child.tail.push_str(text);
    } else {
        node.text.push_str(text);
    }
}

/// Decode XML entity references to their character values.
fn decode_entity(entity: &str) -> String {
    match entity {
        "lt" => "<".to_owned(),
        "gt" => ">".to_owned(),
        "amp" => "&".to_owned(),
        "apos" => "'".to_owned(),
        "quot" => "\"".to_owned(),
        s if s.starts_with('#') => {
            let code = if s.starts_with("#x") || s.starts_with("#X") {
                u32::from_str_radix(&s[2..], 16).ok()
            } else {
                s[1..].parse::<u32>().ok()
            };
            code.and_then(char::from_u32)
                .map_or_else(|| format!("&{entity};"), |c| c.to_string())
        }
        // Unknown entity - preserve as-is
        _ => format!("&{entity};"),
    }
}
