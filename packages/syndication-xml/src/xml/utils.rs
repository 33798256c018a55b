//! Utility functions for navigating and extracting data from element trees.

use super::element::XmlElement;

/// Get the tag name without namespace prefix.
///
/// # Examples
/// ```
/// use syndication_xml::xml::{get_tag_name, parse_str};
///
/// let root = parse_str(r#"<dc:title xmlns:dc="http://purl.org/dc/elements/1.1/"/>"#).unwrap();
/// assert_eq!(get_tag_name(&root), "title");
/// ```
#[must_use]
pub fn get_tag_name(element: &XmlElement) -> &str {
    element.local_name()
}

/// Find the first child element with the given tag name in `namespace`.
///
/// Children in any other namespace never match, so extension elements with
/// a clashing local name are ignored.
///
/// # Arguments
/// * `element` - Parent element to search in
/// * `tag` - Local name to search for
/// * `namespace` - Required namespace (`None` for unqualified children)
///
/// # Examples
/// ```
/// use syndication_xml::xml::{find_child, parse_str};
///
/// let root = parse_str(r#"<head xmlns:dc="urn:dc"><dc:title>x</dc:title><title>y</title></head>"#).unwrap();
/// assert_eq!(find_child(&root, "title", None).and_then(|t| t.text()).as_deref(), Some("y"));
/// assert!(find_child(&root, "missing", None).is_none());
/// ```
#[must_use]
pub fn find_child<'a>(element: &'a XmlElement, tag: &str, namespace: Option<&str>) -> Option<&'a XmlElement> {
    element
        .children()
        .find(|child| has_tag(child, tag, namespace))
}

/// Find all child elements with the given tag name in `namespace`.
pub fn find_children<'a>(
    element: &'a XmlElement,
    tag: &'a str,
    namespace: Option<&'a str>,
) -> impl Iterator<Item = &'a XmlElement> {
    element
        .children()
        .filter(move |child| has_tag(child, tag, namespace))
}

/// Find a descendant element matching a slash-separated path of tag names,
/// every step in `namespace`.
///
/// # Examples
/// ```
/// use syndication_xml::xml::{find_by_path, parse_str};
///
/// let root = parse_str("<api><settings><notes>n</notes></settings></api>").unwrap();
/// assert!(find_by_path(&root, "settings/notes", None).is_some());
/// ```
#[must_use]
pub fn find_by_path<'a>(element: &'a XmlElement, path: &str, namespace: Option<&str>) -> Option<&'a XmlElement> {
    let mut current = element;
    for part in path.split('/') {
        current = find_child(current, part, namespace)?;
    }
    Some(current)
}

/// Get the text content of an element, trimmed.
///
/// # Returns
/// Trimmed text content, or empty string if no text
#[must_use]
pub fn get_text(element: &XmlElement) -> String {
    element
        .text()
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

/// Get an unqualified attribute value, matching the name case-insensitively.
///
/// When the name is repeated the last occurrence is returned.
#[must_use]
pub fn get_attribute<'a>(element: &'a XmlElement, name: &str) -> Option<&'a str> {
    element
        .attributes()
        .iter()
        .rev()
        .find(|a| a.name.is_unqualified() && a.name.local.eq_ignore_ascii_case(name))
        .map(|a| a.value.as_str())
}

/// Check if an element has a specific local name and namespace.
#[must_use]
pub fn has_tag(element: &XmlElement, tag: &str, namespace: Option<&str>) -> bool {
    element.local_name() == tag && element.namespace() == namespace
}

/// Get all element children of an element.
pub fn element_children(element: &XmlElement) -> impl Iterator<Item = &XmlElement> {
    element.children()
}
