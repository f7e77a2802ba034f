//! Built-in processors.
//!
//! - [`PlaceholderProcessor`]: substitutes `{{ path }}` expressions in text runs
//! - [`LayoutDefaults`]: fills in default layout options
//! - [`SectionLayoutProcessor`]: applies layout options to section properties
//!
//! [`ProcessorRegistry::standard`] wires them to the parts of a
//! word-processing document.

mod layout;
mod placeholder;

pub use layout::{LayoutDefaults, RESTART_PAGE_NUMBERING, SECTION_START, SectionLayoutProcessor};
pub use placeholder::PlaceholderProcessor;

use crate::registry::{PartPattern, ProcessorRegistry};
use crate::repair::HEADER_FOOTER_PART;
use crate::template::PRIMARY_PART;

impl ProcessorRegistry {
    /// Registry with the built-in processors and strict placeholders.
    #[must_use]
    pub fn standard() -> Self {
        Self::standard_with(PlaceholderProcessor::new())
    }

    /// Registry with the built-in processors and the given placeholder settings.
    ///
    /// The primary part gets placeholder substitution, layout defaults and
    /// section layout, in that order; header and footer parts get
    /// placeholder substitution only.
    #[must_use]
    pub fn standard_with(placeholders: PlaceholderProcessor) -> Self {
        Self::standard_for(PRIMARY_PART, placeholders)
    }

    /// Registry with the built-in processors for a template whose primary
    /// part is not at the conventional location.
    #[must_use]
    pub fn standard_for(primary_part: &str, placeholders: PlaceholderProcessor) -> Self {
        let mut registry = Self::new();
        let primary = PartPattern::exact(primary_part);
        registry.register(primary.clone(), placeholders.clone(), false);
        registry.register(primary.clone(), LayoutDefaults::new(), false);
        registry.register(primary, SectionLayoutProcessor, false);

        registry.register(HEADER_FOOTER_PART.clone(), placeholders, false);
        registry
    }
}
