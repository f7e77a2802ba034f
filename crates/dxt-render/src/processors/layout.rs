//! Layout options applied to section properties.

use dxt_xml::{XmlDocument, XmlNode};

use crate::environment::RenderEnv;
use crate::options::LayoutOptions;
use crate::processor::{PartProcessor, ProcessorError};
use crate::structure::prefix_of;

/// How each rendered section starts: `nextPage`, `continuous`, `evenPage`,
/// `oddPage` or `nextColumn`.
pub const SECTION_START: &str = "section_start";

/// Whether page numbering restarts at 1 in each section.
pub const RESTART_PAGE_NUMBERING: &str = "restart_page_numbering";

const SECTION_START_VALUES: &[&str] = &["nextPage", "continuous", "evenPage", "oddPage", "nextColumn"];

/// Child order of a section properties element.
const SECTION_CHILD_ORDER: &[&str] = &[
    "headerReference",
    "footerReference",
    "footnotePr",
    "endnotePr",
    "type",
    "pgSz",
    "pgMar",
    "paperSrc",
    "pgBorders",
    "lnNumType",
    "pgNumType",
    "cols",
    "formProt",
    "vAlign",
    "noEndnote",
    "titlePg",
    "textDirection",
    "bidi",
    "rtlGutter",
    "docGrid",
    "printerSettings",
    "sectPrChange",
];

/// Fills in layout options the caller left unset.
///
/// The filled-in set replaces the environment's layout, so processors later
/// in the list, and later contexts, see the defaults.
#[derive(Debug, Clone)]
pub struct LayoutDefaults {
    defaults: LayoutOptions,
}

impl Default for LayoutDefaults {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutDefaults {
    /// Defaults that start every rendered section on a new page.
    #[must_use]
    pub fn new() -> Self {
        Self {
            defaults: LayoutOptions::new().with(SECTION_START, "nextPage"),
        }
    }

    /// Add or override a default.
    #[must_use]
    pub fn with_default(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.defaults.set(name, value);
        self
    }
}

impl PartProcessor for LayoutDefaults {
    fn name(&self) -> &str {
        "layout-defaults"
    }

    fn process(&self, _: &mut XmlDocument, env: &mut RenderEnv<'_>) -> Result<(), ProcessorError> {
        let layout = env.layout_mut();
        for (name, value) in self.defaults.iter() {
            if !layout.contains(name) {
                tracing::debug!(option = name, value, "Applying layout default");
                layout.set(name, value);
            }
        }
        Ok(())
    }
}

/// Applies [`SECTION_START`] and [`RESTART_PAGE_NUMBERING`] to every section
/// properties element of a part.
#[derive(Debug, Clone, Copy, Default)]
pub struct SectionLayoutProcessor;

impl PartProcessor for SectionLayoutProcessor {
    fn name(&self) -> &str {
        "section-layout"
    }

    fn process(
        &self,
        part: &mut XmlDocument,
        env: &mut RenderEnv<'_>,
    ) -> Result<(), ProcessorError> {
        let layout = env.layout();

        let start = match layout.get(SECTION_START) {
            Some(value) if SECTION_START_VALUES.contains(&value) => Some(value),
            Some(value) => {
                return Err(invalid_option(
                    SECTION_START,
                    value,
                    format!("expected one of {}", SECTION_START_VALUES.join(", ")),
                ));
            }
            None => None,
        };
        let restart = match layout.get(RESTART_PAGE_NUMBERING) {
            Some(value) => parse_flag(value)
                .ok_or_else(|| invalid_option(RESTART_PAGE_NUMBERING, value, "expected a boolean"))?,
            None => false,
        };

        if start.is_none() && !restart {
            return Ok(());
        }

        let mut sections = 0usize;
        part.root.walk_mut(&mut |node| {
            if node.local_name() != "sectPr" {
                return;
            }
            let prefix = prefix_of(&node.tag).to_owned();
            if let Some(start) = start {
                section_child(node, &prefix, "type").set_attr(format!("{prefix}val"), start);
            }
            if restart {
                section_child(node, &prefix, "pgNumType").set_attr(format!("{prefix}start"), "1");
            }
            sections += 1;
        });

        tracing::debug!(sections, start, restart, "Applied section layout");
        Ok(())
    }
}

fn invalid_option(name: &str, value: &str, reason: impl Into<String>) -> ProcessorError {
    ProcessorError::InvalidOption {
        name: name.to_owned(),
        value: value.to_owned(),
        reason: reason.into(),
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

fn child_rank(local: &str) -> Option<usize> {
    SECTION_CHILD_ORDER.iter().position(|name| *name == local)
}

/// Existing child of a section with the given local name, or a new one
/// inserted at its schema position.
fn section_child<'a>(section: &'a mut XmlNode, prefix: &str, local: &str) -> &'a mut XmlNode {
    let tag = format!("{prefix}{local}");
    if let Some(index) = section.children.iter().position(|c| c.tag == tag) {
        return &mut section.children[index];
    }

    let rank = child_rank(local);
    let index = section
        .children
        .iter()
        .position(|c| match (child_rank(c.local_name()), rank) {
            (Some(existing), Some(new)) => existing > new,
            _ => false,
        })
        .unwrap_or(section.children.len());

    section.children.insert(index, XmlNode::new(tag));
    &mut section.children[index]
}
