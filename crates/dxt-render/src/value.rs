//! Render context values.

use std::borrow::Cow;
use std::collections::BTreeMap;

/// Data a template is rendered against.
///
/// Contexts are trees of scalars, sequences and mappings. Processors look
/// values up by dotted path (see [`ContextValue::lookup`]).
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ContextValue {
    /// Absent value; renders as empty text.
    #[default]
    Null,
    /// Boolean.
    Bool(bool),
    /// Number.
    Number(f64),
    /// String.
    String(String),
    /// Ordered list of values.
    Sequence(Vec<ContextValue>),
    /// Named values.
    Mapping(BTreeMap<String, ContextValue>),
}

impl ContextValue {
    /// Build a mapping from key-value pairs.
    #[must_use]
    pub fn mapping<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<ContextValue>,
    {
        Self::Mapping(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }

    /// Resolve a dotted path such as `customer.name` or `items.0.price`.
    ///
    /// Mapping segments are matched by key and sequence segments by
    /// zero-based index. An empty path resolves to the value itself.
    #[must_use]
    pub fn lookup(&self, path: &str) -> Option<&ContextValue> {
        if path.is_empty() {
            return Some(self);
        }
        path.split('.').try_fold(self, |current, segment| match current {
            Self::Mapping(map) => map.get(segment),
            Self::Sequence(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
    }

    /// Text for a scalar value, `None` for sequences and mappings.
    ///
    /// Whole numbers are written without a fractional part.
    #[must_use]
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Self::Null => Some(Cow::Borrowed("")),
            Self::Bool(value) => Some(Cow::Owned(value.to_string())),
            Self::Number(value) => Some(Cow::Owned(format_number(*value))),
            Self::String(value) => Some(Cow::Borrowed(value)),
            Self::Sequence(_) | Self::Mapping(_) => None,
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
fn format_number(value: f64) -> String {
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;
    if value.fract() == 0.0 && value.abs() < MAX_EXACT {
        (value as i64).to_string()
    } else {
        value.to_string()
    }
}

impl From<&str> for ContextValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for ContextValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for ContextValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for ContextValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for ContextValue {
    #[allow(clippy::cast_precision_loss)]
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<Vec<ContextValue>> for ContextValue {
    fn from(value: Vec<ContextValue>) -> Self {
        Self::Sequence(value)
    }
}

impl From<serde_json::Value> for ContextValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => n.as_f64().map_or(Self::Null, Self::Number),
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => {
                Self::Sequence(items.into_iter().map(Self::from).collect())
            }
            serde_json::Value::Object(map) => {
                Self::Mapping(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn customer() -> ContextValue {
        ContextValue::from(json!({
            "customer": {"name": "Ada", "age": 36},
            "items": [{"sku": "A-1", "price": 9.5}, {"sku": "B-2", "price": 12}],
            "vip": true,
            "note": null,
        }))
    }

    #[test]
    fn test_lookup_nested_mapping() {
        assert_eq!(
            customer().lookup("customer.name"),
            Some(&ContextValue::from("Ada"))
        );
    }

    #[test]
    fn test_lookup_sequence_index() {
        let ctx = customer();
        assert_eq!(
            ctx.lookup("items.1.sku").and_then(ContextValue::as_text).as_deref(),
            Some("B-2")
        );
        assert_eq!(ctx.lookup("items.5.sku"), None);
        assert_eq!(ctx.lookup("items.x"), None);
    }

    #[test]
    fn test_lookup_missing() {
        assert_eq!(customer().lookup("customer.email"), None);
        assert_eq!(customer().lookup("vip.flag"), None);
    }

    #[test]
    fn test_as_text_scalars() {
        let ctx = customer();
        let text = |path: &str| ctx.lookup(path).and_then(ContextValue::as_text).map(Cow::into_owned);

        assert_eq!(text("customer.age"), Some("36".to_owned()));
        assert_eq!(text("items.0.price"), Some("9.5".to_owned()));
        assert_eq!(text("vip"), Some("true".to_owned()));
        assert_eq!(text("note"), Some(String::new()));
        assert_eq!(text("customer"), None);
        assert_eq!(text("items"), None);
    }

    #[test]
    fn test_mapping_builder() {
        let ctx = ContextValue::mapping([("name", "A")]);
        assert_eq!(ctx.lookup("name"), Some(&ContextValue::String("A".to_owned())));
    }
}
