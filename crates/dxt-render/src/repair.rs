//! Compatibility fixes applied after rendering.

use std::sync::LazyLock;

use dxt_package::{Package, PackageError, PartContent};
use dxt_xml::XmlDocument;

use crate::registry::PartPattern;

/// Namespace bound to the `r:` prefix in word-processing parts.
const RELATIONSHIPS_NS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Header and footer part names.
const HEADER_FOOTER_PATTERN: &str = r"word/(header|footer)\d*\.xml";

pub(crate) static HEADER_FOOTER_PART: LazyLock<PartPattern> = LazyLock::new(|| {
    PartPattern::regex(HEADER_FOOTER_PATTERN).expect("invalid header/footer pattern")
});

/// Repair the primary part and any header or footer parts.
///
/// Raw header/footer parts that never mention a reference element are left
/// unparsed so their bytes pass through untouched.
pub(crate) fn repair_parts(package: &mut Package, primary: &str) -> Result<(), PackageError> {
    let targets: Vec<String> = package
        .part_names()
        .filter(|name| *name == primary || HEADER_FOOTER_PART.matches(name))
        .map(str::to_owned)
        .collect();

    for name in targets {
        if !may_need_repair(package.part(&name)) {
            continue;
        }
        let fixed = repair_reference_ids(package.xml_mut(&name)?);
        if fixed > 0 {
            tracing::warn!(part = %name, fixed, "Rewrote plain id on header/footer references");
        }
    }
    Ok(())
}

fn may_need_repair(content: Option<&PartContent>) -> bool {
    match content {
        Some(PartContent::Xml(_)) => true,
        Some(PartContent::Raw(bytes)) => {
            contains(bytes, b"headerReference") || contains(bytes, b"footerReference")
        }
        None => false,
    }
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|window| window == needle)
}

/// Move a plain `id` attribute on header/footer references to `r:id`.
///
/// Some producers write `<w:headerReference id="rId7"/>` where the format
/// requires the relationship-namespaced `r:id`. Only elements without an
/// `r:id` are changed. If anything was rewritten and the root does not bind
/// the `r` prefix, the relationships namespace is declared on the root.
///
/// Returns the number of elements rewritten.
pub fn repair_reference_ids(doc: &mut XmlDocument) -> usize {
    let mut fixed = 0;
    doc.root.walk_mut(&mut |node| {
        if !matches!(node.local_name(), "headerReference" | "footerReference")
            || node.attr("r:id").is_some()
        {
            return;
        }
        if let Some(id) = node.remove_attr("id") {
            node.set_attr("r:id", id);
            fixed += 1;
        }
    });

    if fixed > 0 && doc.root.attr("xmlns:r").is_none() {
        doc.root.set_attr("xmlns:r", RELATIONSHIPS_NS);
    }
    fixed
}
