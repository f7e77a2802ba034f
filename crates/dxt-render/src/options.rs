//! Named layout options.

use std::collections::BTreeMap;

/// Named layout options passed to every processor through the render
/// environment.
///
/// The core does not interpret these; which names are recognized is up to
/// the layout processors that read them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayoutOptions(BTreeMap<String, String>);

impl LayoutOptions {
    /// Create an empty option set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an option, returning the updated set.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    /// Set an option.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    /// Value of an option.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Whether an option is set.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Whether no options are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Options in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for LayoutOptions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl From<BTreeMap<String, String>> for LayoutOptions {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}
