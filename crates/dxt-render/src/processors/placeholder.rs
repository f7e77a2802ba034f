//! `{{ path }}` substitution in text runs.

use std::sync::LazyLock;

use dxt_xml::XmlDocument;
use regex::Regex;

use crate::environment::RenderEnv;
use crate::processor::{PartProcessor, ProcessorError};
use crate::value::ContextValue;

/// Any `{{ ... }}` expression within a single text node.
static EXPRESSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{(.*?)\}\}").expect("invalid expression regex"));

/// Dotted value path: `name`, `customer.name`, `items.0.price`.
static VALUE_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(?:\.[A-Za-z0-9_]+)*$").expect("invalid path regex")
});

/// Replaces `{{ path }}` expressions inside `t` (text) elements with values
/// from the render context.
///
/// Expressions are matched within one text element; an expression split
/// across runs by the editor is left as is.
#[derive(Debug, Clone)]
pub struct PlaceholderProcessor {
    strict: bool,
}

impl Default for PlaceholderProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaceholderProcessor {
    /// Create a processor that fails on values missing from the context.
    #[must_use]
    pub fn new() -> Self {
        Self { strict: true }
    }

    /// Create a processor that renders missing values as empty text.
    #[must_use]
    pub fn lenient() -> Self {
        Self { strict: false }
    }

    /// Substitute every expression in `text`.
    fn substitute(&self, text: &str, context: &ContextValue) -> Result<String, ProcessorError> {
        let mut out = String::with_capacity(text.len());
        let mut last = 0;

        for found in EXPRESSION.find_iter(text) {
            out.push_str(&text[last..found.start()]);
            last = found.end();

            let raw = found.as_str();
            let path = raw[2..raw.len() - 2].trim();
            if !VALUE_PATH.is_match(path) {
                return Err(ProcessorError::Malformed(raw.to_owned()));
            }

            match context.lookup(path) {
                Some(value) => {
                    let rendered = value
                        .as_text()
                        .ok_or_else(|| ProcessorError::NotScalar(path.to_owned()))?;
                    out.push_str(&rendered);
                }
                None if self.strict => return Err(ProcessorError::MissingValue(path.to_owned())),
                None => {}
            }
        }

        out.push_str(&text[last..]);
        Ok(out)
    }
}

impl PartProcessor for PlaceholderProcessor {
    fn name(&self) -> &str {
        "placeholder"
    }

    fn process(
        &self,
        part: &mut XmlDocument,
        env: &mut RenderEnv<'_>,
    ) -> Result<(), ProcessorError> {
        let context = env.context();
        let mut result = Ok(());
        let mut replaced = 0usize;

        part.root.walk_mut(&mut |node| {
            if result.is_err() || node.local_name() != "t" || !node.text.contains("{{") {
                return;
            }
            match self.substitute(&node.text, context) {
                Ok(text) => {
                    if text.starts_with(char::is_whitespace) || text.ends_with(char::is_whitespace) {
                        node.set_attr("xml:space", "preserve");
                    }
                    node.text = text;
                    replaced += 1;
                }
                Err(e) => result = Err(e),
            }
        });

        tracing::trace!(nodes = replaced, "Substituted placeholders");
        result
    }
}
