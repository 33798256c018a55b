//! Tolerant XML reader producing [`XmlElement`] trees.
//!
//! Namespaces are resolved while reading. Attribute uniqueness is not
//! enforced, so an element such as `<outline x="1" x="2"/>` keeps both
//! attributes in document order and the loaders decide which one wins.

use encoding_rs::{Encoding, UTF_8};
use quick_xml::escape::{resolve_predefined_entity, unescape};
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use quick_xml::reader::NsReader;

use super::element::{XmlAttribute, XmlElement, XmlName};
use crate::error::{Result, SyndicationError};

/// Number of leading bytes inspected for an XML encoding declaration.
const DECLARATION_SNIFF_LEN: usize = 512;

/// Parse an XML string into its root element.
///
/// # Errors
/// Returns `XmlParse` when the input is not well-formed or has no root element.
///
/// # Examples
/// ```
/// use syndication_xml::xml::parse_str;
///
/// let root = parse_str(r#"<opml version="2.0"><head/></opml>"#).unwrap();
/// assert_eq!(root.local_name(), "opml");
/// assert_eq!(root.children().count(), 1);
/// ```
pub fn parse_str(xml: &str) -> Result<XmlElement> {
    let mut reader = NsReader::from_reader(xml.as_bytes());
    reader.config_mut().trim_text(false);

    let mut buf = Vec::new();
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|e| parse_error(e.to_string(), reader.buffer_position() as u64))?;
        let position = reader.buffer_position() as u64;

        match event {
            Event::Start(start) => {
                let element = start_element(&reader, &start, position)?;
                stack.push(element);
            }
            Event::Empty(start) => {
                let element = start_element(&reader, &start, position)?;
                attach(&mut stack, &mut root, element, position)?;
            }
            Event::End(_) => {
                let mut element = stack
                    .pop()
                    .ok_or_else(|| parse_error("unexpected end tag", position))?;
                element.strip_whitespace_text();
                attach(&mut stack, &mut root, element, position)?;
            }
            Event::Text(text) => {
                if let Some(current) = stack.last_mut() {
                    let raw = utf8(text.as_ref(), position)?;
                    let value = unescape(raw).map_err(|e| parse_error(e.to_string(), position))?;
                    current.push_text(&value);
                }
            }
            Event::CData(data) => {
                if let Some(current) = stack.last_mut() {
                    let bytes = data.into_inner();
                    current.push_text(utf8(&bytes, position)?);
                }
            }
            Event::GeneralRef(reference) => {
                if let Some(current) = stack.last_mut() {
                    let name = utf8(reference.as_ref(), position)?;
                    match resolve_reference(name) {
                        Some(value) => current.push_text(&value),
                        None => tracing::debug!(entity = %name, "Unresolved entity reference, skipping"),
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }

        buf.clear();
    }

    if !stack.is_empty() {
        return Err(parse_error(
            "unexpected end of input inside an element",
            reader.buffer_position() as u64,
        ));
    }

    root.ok_or_else(|| parse_error("document has no root element", 0))
}

/// Decode raw bytes and parse them.
///
/// The encoding is `encoding` when given, otherwise taken from a byte order
/// mark or the XML declaration, falling back to UTF-8.
pub fn parse_bytes(bytes: &[u8], encoding: Option<&'static Encoding>) -> Result<XmlElement> {
    let text = decode_bytes(bytes, encoding);
    parse_str(&text)
}

/// Decode raw bytes to a string.
///
/// A byte order mark always takes precedence over the requested encoding.
/// Malformed sequences are replaced and logged.
pub fn decode_bytes(bytes: &[u8], encoding: Option<&'static Encoding>) -> String {
    let encoding = encoding.unwrap_or_else(|| sniff_encoding(bytes));
    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        tracing::warn!(
            encoding = used.name(),
            "Malformed byte sequences replaced while decoding"
        );
    }
    text.into_owned()
}

/// Detect the encoding of an XML byte stream.
pub fn sniff_encoding(bytes: &[u8]) -> &'static Encoding {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return encoding;
    }

    let head = &bytes[..bytes.len().min(DECLARATION_SNIFF_LEN)];
    let head = String::from_utf8_lossy(head);
    if !head.trim_start().starts_with("<?xml") {
        return UTF_8;
    }

    let Some(declaration_end) = head.find("?>") else {
        return UTF_8;
    };
    let declaration = &head[..declaration_end];
    declaration
        .find("encoding")
        .and_then(|start| {
            let rest = declaration[start + "encoding".len()..].trim_start();
            let rest = rest.strip_prefix('=')?.trim_start();
            let quote = rest.chars().next().filter(|c| *c == '"' || *c == '\'')?;
            let rest = &rest[1..];
            let end = rest.find(quote)?;
            Encoding::for_label(rest[..end].trim().as_bytes())
        })
        .unwrap_or(UTF_8)
}

/// Convert a pre-parsed `roxmltree` node into an owned element.
///
/// Returns `None` when the node is not an element.
///
/// # Examples
/// ```
/// use syndication_xml::xml::from_node;
///
/// let doc = roxmltree::Document::parse(r#"<rsd version="1.0"><service/></rsd>"#).unwrap();
/// let root = from_node(doc.root_element()).unwrap();
/// assert_eq!(root.local_name(), "rsd");
/// ```
pub fn from_node(node: roxmltree::Node<'_, '_>) -> Option<XmlElement> {
    if !node.is_element() {
        return None;
    }

    let tag = node.tag_name();
    let mut element = XmlElement::new(resolved_name(node, tag.namespace(), tag.name()));

    for attribute in node.attributes() {
        element.push_attribute(XmlAttribute {
            name: resolved_name(node, attribute.namespace(), attribute.name()),
            value: attribute.value().to_string(),
        });
    }

    for child in node.children() {
        if child.is_element() {
            if let Some(converted) = from_node(child) {
                element.push_element(converted);
            }
        } else if child.is_text() {
            if let Some(text) = child.text() {
                element.push_text(text);
            }
        }
    }

    element.strip_whitespace_text();
    Some(element)
}

fn resolved_name(node: roxmltree::Node<'_, '_>, namespace: Option<&str>, local: &str) -> XmlName {
    match namespace {
        Some(uri) if !uri.is_empty() => {
            let prefix = node.lookup_prefix(uri).filter(|p| !p.is_empty());
            XmlName::qualified(prefix, local, uri)
        }
        _ => XmlName::local(local),
    }
}

fn start_element<R>(reader: &NsReader<R>, start: &BytesStart<'_>, position: u64) -> Result<XmlElement> {
    let qualified = start.name();
    let (resolved, local) = reader.resolver().resolve_element(qualified);
    let mut element = XmlElement::new(XmlName {
        namespace: namespace_uri(resolved),
        prefix: split_prefix(utf8(qualified.as_ref(), position)?),
        local: utf8(local.as_ref(), position)?.to_string(),
    });

    let mut attributes = start.attributes();
    attributes.with_checks(false);
    for attribute in attributes {
        let attribute = attribute.map_err(|e| parse_error(e.to_string(), position))?;
        let key = attribute.key.as_ref();
        if key == b"xmlns" || key.starts_with(b"xmlns:") {
            continue;
        }

        let (resolved, local) = reader.resolver().resolve_attribute(attribute.key);
        let raw = normalize_attribute_whitespace(utf8(attribute.value.as_ref(), position)?);
        let value = unescape(&raw).map_err(|e| parse_error(e.to_string(), position))?;
        element.push_attribute(XmlAttribute {
            name: XmlName {
                namespace: namespace_uri(resolved),
                prefix: split_prefix(utf8(key, position)?),
                local: utf8(local.as_ref(), position)?.to_string(),
            },
            value: value.into_owned(),
        });
    }

    Ok(element)
}

/// Attribute-value normalization of XML 1.0: literal line breaks and tabs
/// become spaces. Character references are untouched, so `&#10;` still
/// yields a newline after unescaping.
fn normalize_attribute_whitespace(raw: &str) -> std::borrow::Cow<'_, str> {
    if !raw.contains(['\t', '\n', '\r']) {
        return std::borrow::Cow::Borrowed(raw);
    }
    std::borrow::Cow::Owned(
        raw.replace("\r\n", " ")
            .replace(['\t', '\n', '\r'], " "),
    )
}

fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
    position: u64,
) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.push_element(element);
        return Ok(());
    }
    if root.is_some() {
        return Err(parse_error("multiple root elements", position));
    }
    *root = Some(element);
    Ok(())
}

fn namespace_uri(result: ResolveResult<'_>) -> Option<String> {
    match result {
        ResolveResult::Bound(namespace) => {
            let uri = String::from_utf8_lossy(namespace.as_ref()).into_owned();
            (!uri.is_empty()).then_some(uri)
        }
        _ => None,
    }
}

fn split_prefix(qualified: &str) -> Option<String> {
    qualified
        .split_once(':')
        .map(|(prefix, _)| prefix.to_string())
}

fn resolve_reference(name: &str) -> Option<String> {
    if let Some(code) = name.strip_prefix('#') {
        let value = match code.strip_prefix('x').or_else(|| code.strip_prefix('X')) {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => code.parse().ok(),
        };
        return value.and_then(char::from_u32).map(String::from);
    }
    resolve_predefined_entity(name).map(str::to_string)
}

fn utf8(bytes: &[u8], position: u64) -> Result<&str> {
    std::str::from_utf8(bytes).map_err(|e| parse_error(e.to_string(), position))
}

fn parse_error(message: impl Into<String>, position: u64) -> SyndicationError {
    SyndicationError::XmlParse {
        message: message.into(),
        position,
    }
}
