//! Owned, read-only XML element tree used as the load cursor.
//!
//! Every loader receives an [`XmlElement`] positioned on the element that
//! represents the entity. The tree keeps attributes in document order,
//! including repeated names, so first-occurrence rules can be applied by the
//! loaders rather than by the parser.

/// A namespace-resolved XML name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlName {
    /// Namespace URI the name is bound to, if any.
    pub namespace: Option<String>,
    /// Prefix used in the source document, if any.
    pub prefix: Option<String>,
    /// Local part of the name.
    pub local: String,
}

impl XmlName {
    /// Create a name without namespace.
    #[must_use]
    pub fn local(local: impl Into<String>) -> Self {
        Self {
            namespace: None,
            prefix: None,
            local: local.into(),
        }
    }

    /// Create a namespaced name.
    #[must_use]
    pub fn qualified(
        prefix: Option<&str>,
        local: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Self {
        Self {
            namespace: Some(namespace.into()),
            prefix: prefix.map(str::to_string),
            local: local.into(),
        }
    }

    /// Namespace URI, or `None` for unqualified names.
    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Whether the name has neither namespace nor prefix.
    #[must_use]
    pub fn is_unqualified(&self) -> bool {
        self.namespace.is_none() && self.prefix.as_deref().is_none_or(str::is_empty)
    }

    /// Name as written in the source (`prefix:local` or `local`).
    #[must_use]
    pub fn qualified_name(&self) -> String {
        match &self.prefix {
            Some(prefix) if !prefix.is_empty() => format!("{prefix}:{}", self.local),
            _ => self.local.clone(),
        }
    }
}

/// An attribute of an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlAttribute {
    pub name: XmlName,
    pub value: String,
}

impl XmlAttribute {
    /// Create an unqualified attribute.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: XmlName::local(name),
            value: value.into(),
        }
    }
}

/// Child content of an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
}

/// An element with its attributes and children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    name: XmlName,
    attributes: Vec<XmlAttribute>,
    children: Vec<XmlNode>,
}

impl XmlElement {
    /// Create an empty element.
    #[must_use]
    pub fn new(name: XmlName) -> Self {
        Self {
            name,
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// The resolved element name.
    #[must_use]
    pub fn name(&self) -> &XmlName {
        &self.name
    }

    /// Local name without prefix.
    #[must_use]
    pub fn local_name(&self) -> &str {
        &self.name.local
    }

    /// Namespace URI of the element.
    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        self.name.namespace()
    }

    /// All attributes in document order, repeated names included.
    #[must_use]
    pub fn attributes(&self) -> &[XmlAttribute] {
        &self.attributes
    }

    /// Whether the element carries any attribute.
    #[must_use]
    pub fn has_attributes(&self) -> bool {
        !self.attributes.is_empty()
    }

    /// Child nodes in document order.
    #[must_use]
    pub fn nodes(&self) -> &[XmlNode] {
        &self.children
    }

    /// Child elements in document order.
    pub fn children(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(element) => Some(element),
            XmlNode::Text(_) => None,
        })
    }

    /// Whether the element has at least one child element.
    #[must_use]
    pub fn has_children(&self) -> bool {
        self.children().next().is_some()
    }

    /// Concatenated direct text content, or `None` when there is none.
    #[must_use]
    pub fn text(&self) -> Option<String> {
        let mut text: Option<String> = None;
        for node in &self.children {
            if let XmlNode::Text(value) = node {
                text.get_or_insert_with(String::new).push_str(value);
            }
        }
        text
    }

    /// Whether any attribute or child element is bound to `namespace`.
    #[must_use]
    pub fn has_namespace_content(&self, namespace: &str) -> bool {
        self.attributes
            .iter()
            .any(|a| a.name.namespace() == Some(namespace))
            || self.children().any(|c| c.namespace() == Some(namespace))
    }

    /// Append an attribute.
    pub fn push_attribute(&mut self, attribute: XmlAttribute) {
        self.attributes.push(attribute);
    }

    /// Append a child element.
    pub fn push_element(&mut self, element: XmlElement) {
        self.children.push(XmlNode::Element(element));
    }

    /// Append text, merging with a preceding text node.
    pub fn push_text(&mut self, text: &str) {
        if let Some(XmlNode::Text(existing)) = self.children.last_mut() {
            existing.push_str(text);
        } else {
            self.children.push(XmlNode::Text(text.to_string()));
        }
    }

    /// Drop text nodes that only contain whitespace.
    pub(crate) fn strip_whitespace_text(&mut self) {
        self.children.retain(|node| match node {
            XmlNode::Text(text) => !text.trim().is_empty(),
            XmlNode::Element(_) => true,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualified_name() {
        let name = XmlName::qualified(Some("dc"), "creator", "http://purl.org/dc/elements/1.1/");
        assert_eq!(name.qualified_name(), "dc:creator");
        assert_eq!(XmlName::local("outline").qualified_name(), "outline");
    }

    #[test]
    fn test_push_text_merges() {
        let mut element = XmlElement::new(XmlName::local("title"));
        element.push_text("Fish ");
        element.push_text("& Chips");
        assert_eq!(element.text().as_deref(), Some("Fish & Chips"));
        assert_eq!(element.nodes().len(), 1);
    }

    #[test]
    fn test_children_skips_text() {
        let mut element = XmlElement::new(XmlName::local("body"));
        element.push_text("  ");
        element.push_element(XmlElement::new(XmlName::local("outline")));
        assert_eq!(element.children().count(), 1);
        element.strip_whitespace_text();
        assert_eq!(element.nodes().len(), 1);
        assert!(element.text().is_none());
    }

    #[test]
    fn test_has_namespace_content() {
        let mut element = XmlElement::new(XmlName::local("outline"));
        element.push_attribute(XmlAttribute {
            name: XmlName::qualified(Some("x"), "flag", "urn:x"),
            value: "1".to_string(),
        });
        assert!(element.has_namespace_content("urn:x"));
        assert!(!element.has_namespace_content("urn:y"));
    }
}
