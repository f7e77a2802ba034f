//! Element tree node.

/// Element in a parsed part.
///
/// Text follows the element-tree convention: `text` holds the character data
/// before the first child and `tail` the character data after this element's
/// closing tag, up to the next sibling.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlNode {
    /// Qualified tag name as written in the source (e.g. `w:body`).
    pub tag: String,
    /// Direct text content.
    pub text: String,
    /// Text after element.
    pub tail: String,
    /// Attributes in source order, namespace declarations included.
    pub attrs: Vec<(String, String)>,
    /// Child elements.
    pub children: Vec<XmlNode>,
}

impl XmlNode {
    /// Create a new node with the given tag.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    /// Set text content.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Set tail content.
    #[must_use]
    pub fn with_tail(mut self, tail: impl Into<String>) -> Self {
        self.tail = tail.into();
        self
    }

    /// Add an attribute.
    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Set children.
    #[must_use]
    pub fn with_children(mut self, children: Vec<XmlNode>) -> Self {
        self.children = children;
        self
    }

    /// Append a single child.
    #[must_use]
    pub fn with_child(mut self, child: XmlNode) -> Self {
        self.children.push(child);
        self
    }

    /// Tag name without its namespace prefix.
    #[must_use]
    pub fn local_name(&self) -> &str {
        local_name(&self.tag)
    }

    /// Look up an attribute by qualified name.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Set an attribute, replacing the value in place if it already exists.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some(slot) = self.attrs.iter_mut().find(|(key, _)| *key == name) {
            slot.1 = value;
        } else {
            self.attrs.push((name, value));
        }
    }

    /// Remove an attribute, returning its value.
    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let index = self.attrs.iter().position(|(key, _)| key == name)?;
        Some(self.attrs.remove(index).1)
    }

    /// First direct child with the given qualified tag.
    #[must_use]
    pub fn child(&self, tag: &str) -> Option<&XmlNode> {
        self.children.iter().find(|child| child.tag == tag)
    }

    /// Visit this node and every descendant depth-first, parents before children.
    pub fn walk_mut<F>(&mut self, f: &mut F)
    where
        F: FnMut(&mut XmlNode),
    {
        f(self);
        for child in &mut self.children {
            child.walk_mut(f);
        }
    }

    /// Visit this node and every descendant depth-first.
    pub fn walk<F>(&self, f: &mut F)
    where
        F: FnMut(&XmlNode),
    {
        f(self);
        for child in &self.children {
            child.walk(f);
        }
    }

    /// Concatenated character data of this element and its descendants.
    ///
    /// The element's own tail is not included.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = self.text.clone();
        for child in &self.children {
            out.push_str(&child.text_content());
            out.push_str(&child.tail);
        }
        out
    }
}

/// Strip the namespace prefix from a qualified name.
#[must_use]
pub fn local_name(qualified: &str) -> &str {
    qualified
        .rsplit_once(':')
        .map_or(qualified, |(_, local)| local)
}
