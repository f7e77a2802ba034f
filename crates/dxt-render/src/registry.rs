//! Pattern-keyed processor registry.

use std::fmt;
use std::sync::Arc;

use regex::Regex;

use crate::processor::PartProcessor;

/// Part-name matcher a processor list is registered under.
#[derive(Clone)]
pub enum PartPattern {
    /// Matches one part name exactly.
    Exact(String),
    /// Matches part names against a regular expression (whole name).
    Regex {
        /// Expression as supplied by the caller.
        source: String,
        /// Anchored compiled form.
        compiled: Regex,
    },
}

impl PartPattern {
    /// Pattern matching a single part name.
    #[must_use]
    pub fn exact(name: impl Into<String>) -> Self {
        Self::Exact(name.into())
    }

    /// Pattern matching part names by regular expression.
    ///
    /// The expression must match the whole name: `word/header\d*\.xml`
    /// matches `word/header1.xml` but not `word/header1.xml.rels`.
    pub fn regex(pattern: &str) -> Result<Self, regex::Error> {
        let compiled = Regex::new(&format!("^(?:{pattern})$"))?;
        Ok(Self::Regex {
            source: pattern.to_owned(),
            compiled,
        })
    }

    /// Whether a part name matches.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        match self {
            Self::Exact(exact) => exact == name,
            Self::Regex { compiled, .. } => compiled.is_match(name),
        }
    }

    /// Pattern text as supplied.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Exact(exact) => exact,
            Self::Regex { source, .. } => source,
        }
    }
}

impl PartialEq for PartPattern {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Exact(a), Self::Exact(b)) => a == b,
            (Self::Regex { source: a, .. }, Self::Regex { source: b, .. }) => a == b,
            _ => false,
        }
    }
}

impl Eq for PartPattern {}

impl fmt::Debug for PartPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(exact) => f.debug_tuple("Exact").field(exact).finish(),
            Self::Regex { source, .. } => f.debug_tuple("Regex").field(source).finish(),
        }
    }
}

impl fmt::Display for PartPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(exact) => f.write_str(exact),
            Self::Regex { source, .. } => write!(f, "/{source}/"),
        }
    }
}

#[derive(Clone)]
struct Registration {
    pattern: PartPattern,
    processors: Vec<Arc<dyn PartProcessor>>,
}

/// Ordered table of part patterns and the processors registered for them.
///
/// Registering appends: the same processor registered twice for a pattern
/// runs twice. A pattern's list is only cleared when a registration asks
/// for `replace_all`. Lookups use the first pattern (in the order patterns
/// were first registered) that matches a part name; lists of different
/// patterns are never merged.
///
/// A registry is built once at startup and shared read-only (usually behind
/// an `Arc`) by every template rendered with it.
#[derive(Clone, Default)]
pub struct ProcessorRegistry {
    entries: Vec<Registration>,
}

impl ProcessorRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a processor for a pattern.
    ///
    /// With `replace_all`, processors previously registered for the same
    /// pattern are dropped first.
    pub fn register<P: PartProcessor + 'static>(
        &mut self,
        pattern: PartPattern,
        processor: P,
        replace_all: bool,
    ) {
        self.register_shared(pattern, Arc::new(processor), replace_all);
    }

    /// Register an already shared processor for a pattern.
    pub fn register_shared(
        &mut self,
        pattern: PartPattern,
        processor: Arc<dyn PartProcessor>,
        replace_all: bool,
    ) {
        tracing::debug!(
            pattern = %pattern,
            processor = processor.name(),
            replace_all,
            "Registering processor"
        );

        if let Some(entry) = self.entries.iter_mut().find(|e| e.pattern == pattern) {
            if replace_all {
                entry.processors.clear();
            }
            entry.processors.push(processor);
        } else {
            self.entries.push(Registration {
                pattern,
                processors: vec![processor],
            });
        }
    }

    /// Processors to run for a part, in registration order.
    ///
    /// Returns an empty slice when no pattern matches.
    #[must_use]
    pub fn resolve(&self, part: &str) -> &[Arc<dyn PartProcessor>] {
        self.entries
            .iter()
            .find(|entry| entry.pattern.matches(part))
            .map(|entry| entry.processors.as_slice())
            .unwrap_or_default()
    }

    /// Registered patterns in registration order.
    pub fn patterns(&self) -> impl Iterator<Item = &PartPattern> {
        self.entries.iter().map(|entry| &entry.pattern)
    }

    /// Whether nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for ProcessorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|entry| {
                let names: Vec<&str> = entry.processors.iter().map(|p| p.name()).collect();
                (entry.pattern.to_string(), names)
            }))
            .finish()
    }
}
