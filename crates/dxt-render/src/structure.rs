//! Body splicing for multi-context renders.

use dxt_xml::{XmlDocument, XmlNode};

use crate::error::StructureError;

/// Move the body-level section properties into a trailing empty paragraph.
///
/// The body must hold exactly one direct `sectPr` child. It is detached and
/// appended as `<p><pPr><sectPr/></pPr></p>`, which ends the section at that
/// paragraph, so content appended afterwards starts a new section.
pub(crate) fn relocate_section(doc: &mut XmlDocument, part: &str) -> Result<(), StructureError> {
    let body = doc.body_mut().ok_or_else(|| StructureError::MissingBody {
        part: part.to_owned(),
    })?;

    let positions: Vec<usize> = body
        .children
        .iter()
        .enumerate()
        .filter(|(_, child)| child.local_name() == "sectPr")
        .map(|(index, _)| index)
        .collect();
    let &[index] = positions.as_slice() else {
        return Err(StructureError::SectionCount {
            part: part.to_owned(),
            count: positions.len(),
        });
    };

    let mut section = body.children.remove(index);
    let tail = std::mem::take(&mut section.tail);
    if let Some(previous) = index.checked_sub(1).and_then(|i| body.children.get_mut(i)) {
        previous.tail.push_str(&tail);
    } else {
        body.text.push_str(&tail);
    }

    let prefix = prefix_of(&section.tag).to_owned();
    let properties = XmlNode::new(format!("{prefix}pPr")).with_child(section);
    body.children
        .push(XmlNode::new(format!("{prefix}p")).with_child(properties));

    Ok(())
}

/// Append every body child of `source` to the body of `target`, in order.
pub(crate) fn append_body(
    target: &mut XmlDocument,
    mut source: XmlDocument,
    part: &str,
) -> Result<usize, StructureError> {
    let missing = || StructureError::MissingBody {
        part: part.to_owned(),
    };
    let children = std::mem::take(&mut source.body_mut().ok_or_else(missing)?.children);
    let count = children.len();
    target.body_mut().ok_or_else(missing)?.children.extend(children);
    Ok(count)
}

/// Namespace prefix of a qualified name including the colon, or `""`.
pub(crate) fn prefix_of(tag: &str) -> &str {
    tag.rfind(':').map_or("", |i| &tag[..=i])
}
