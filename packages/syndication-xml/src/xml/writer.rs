//! Streaming XML writer with on-demand namespace declarations.
//!
//! A start tag stays pending until the first child, text or end event so that
//! attributes (and namespace declarations needed by them) can still be added.
//! Elements closed while pending are written as empty elements.

use std::io::Write;

use encoding_rs::{Encoding, UTF_8};
use quick_xml::escape::escape;
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use super::element::{XmlElement, XmlNode};
use crate::config::XML_NAMESPACE;
use crate::error::{Result, SyndicationError};

/// Output sink used by every entity writer.
pub struct XmlWriter<'w> {
    inner: Writer<&'w mut dyn Write>,
    pending: Option<BytesStart<'static>>,
    open: Vec<String>,
    scopes: Vec<Vec<(String, String)>>,
    root_namespaces: Vec<(String, String)>,
    generated_prefixes: usize,
    encoding: &'static Encoding,
}

impl<'w> XmlWriter<'w> {
    /// Create a writer producing compact output.
    #[must_use]
    pub fn new(output: &'w mut dyn Write) -> Self {
        Self::from_inner(Writer::new(output))
    }

    /// Create a writer indenting nested elements by `width` spaces.
    ///
    /// A width of zero produces compact output.
    #[must_use]
    pub fn with_indent(output: &'w mut dyn Write, width: usize) -> Self {
        if width == 0 {
            return Self::new(output);
        }
        Self::from_inner(Writer::new_with_indent(output, b' ', width))
    }

    fn from_inner(inner: Writer<&'w mut dyn Write>) -> Self {
        Self {
            inner,
            pending: None,
            open: Vec::new(),
            scopes: vec![vec![("xml".to_string(), XML_NAMESPACE.to_string())]],
            root_namespaces: Vec::new(),
            generated_prefixes: 0,
            encoding: UTF_8,
        }
    }

    /// Target encoding of the serialized output.
    ///
    /// CDATA sections holding characters the encoding cannot represent are
    /// written as escaped text, where character references stay valid.
    #[must_use]
    pub fn with_output_encoding(mut self, encoding: &'static Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Write the `<?xml ...?>` declaration.
    pub fn write_declaration(&mut self, encoding: &str) -> Result<()> {
        if !self.open.is_empty() || self.pending.is_some() {
            return Err(SyndicationError::XmlWrite(
                "declaration must precede the root element".to_string(),
            ));
        }
        self.emit(Event::Decl(BytesDecl::new("1.0", Some(encoding), None)))
    }

    /// Queue a namespace declaration for the root element.
    ///
    /// Declarations whose prefix is already queued are dropped; the writer
    /// then declares that namespace locally where it is used.
    pub fn declare_on_root(&mut self, prefix: &str, namespace: &str) {
        if prefix.is_empty() || self.root_namespaces.iter().any(|(p, _)| p == prefix) {
            return;
        }
        self.root_namespaces
            .push((prefix.to_string(), namespace.to_string()));
    }

    /// Open an element whose name is written as given.
    pub fn start_element(&mut self, name: &str) -> Result<()> {
        self.flush_pending()?;
        let is_root = self.open.is_empty();
        self.pending = Some(BytesStart::new(name.to_string()));
        self.open.push(name.to_string());
        self.scopes.push(Vec::new());
        if is_root {
            for (prefix, namespace) in std::mem::take(&mut self.root_namespaces) {
                self.bind(&prefix, &namespace)?;
            }
        }
        Ok(())
    }

    /// Open an element in `namespace`.
    ///
    /// With `prefix == None` the element is written in the default namespace.
    /// Otherwise a prefix already bound to `namespace` is reused, and the
    /// namespace is declared on the element when it is not in scope.
    pub fn start_element_ns(&mut self, prefix: Option<&str>, local: &str, namespace: &str) -> Result<()> {
        match prefix.filter(|p| !p.is_empty()) {
            None => {
                self.start_element(local)?;
                if self.lookup_namespace("") != Some(namespace) {
                    self.bind("", namespace)?;
                }
            }
            Some(prefix) => {
                let bound = self.prefix_for(namespace, prefix);
                let chosen = bound.clone().unwrap_or_else(|| prefix.to_string());
                self.start_element(&format!("{chosen}:{local}"))?;
                if bound.is_none() {
                    self.bind(&chosen, namespace)?;
                }
            }
        }
        Ok(())
    }

    /// Add an attribute to the pending start tag.
    ///
    /// Line breaks and tabs are written as character references so that
    /// attribute-value normalization on reload keeps them.
    pub fn attribute(&mut self, name: &str, value: &str) -> Result<()> {
        let escaped = escape(value)
            .replace('\n', "&#10;")
            .replace('\r', "&#13;")
            .replace('\t', "&#9;");
        let pending = self.pending_mut()?;
        pending.push_attribute((name.as_bytes(), escaped.as_bytes()));
        Ok(())
    }

    /// Add a namespaced attribute to the pending start tag.
    ///
    /// The namespace is declared on the element when no prefix is bound to it.
    pub fn attribute_ns(&mut self, prefix: &str, local: &str, namespace: &str, value: &str) -> Result<()> {
        self.pending_mut()?;
        let chosen = match self.prefix_for(namespace, prefix) {
            Some(bound) => bound,
            None => {
                let chosen = if prefix.is_empty() {
                    self.generate_prefix()
                } else {
                    prefix.to_string()
                };
                self.bind(&chosen, namespace)?;
                chosen
            }
        };
        self.attribute(&format!("{chosen}:{local}"), value)
    }

    /// Declare `namespace` on the pending element unless it is already in scope.
    pub fn declare_namespace(&mut self, prefix: Option<&str>, namespace: &str) -> Result<()> {
        let prefix = prefix.unwrap_or_default();
        if self.lookup_namespace(prefix) == Some(namespace) {
            return Ok(());
        }
        self.pending_mut()?;
        self.bind(prefix, namespace)
    }

    /// Write escaped character data.
    pub fn text(&mut self, text: &str) -> Result<()> {
        self.flush_pending()?;
        self.emit(Event::Text(BytesText::new(text)))
    }

    /// Write a CDATA section, falling back to escaped text when `text`
    /// contains `]]>` or characters the output encoding cannot represent.
    pub fn cdata(&mut self, text: &str) -> Result<()> {
        if text.contains("]]>") || !self.can_encode(text) {
            return self.text(text);
        }
        self.flush_pending()?;
        self.emit(Event::CData(BytesCData::new(text)))
    }

    /// Close the innermost open element.
    pub fn end_element(&mut self) -> Result<()> {
        let name = self
            .open
            .pop()
            .ok_or_else(|| SyndicationError::XmlWrite("no open element to close".to_string()))?;
        self.scopes.pop();

        match self.pending.take() {
            Some(start) => self.emit(Event::Empty(start)),
            None => self.emit(Event::End(BytesEnd::new(name))),
        }
    }

    /// Write `<name>text</name>`.
    pub fn element_text(&mut self, name: &str, text: &str) -> Result<()> {
        self.start_element(name)?;
        self.text(text)?;
        self.end_element()
    }

    /// Write `<prefix:local>text</prefix:local>` in `namespace`.
    pub fn element_text_ns(&mut self, prefix: Option<&str>, local: &str, namespace: &str, text: &str) -> Result<()> {
        self.start_element_ns(prefix, local, namespace)?;
        self.text(text)?;
        self.end_element()
    }

    /// Write a captured element tree, re-declaring namespaces as needed.
    pub fn write_tree(&mut self, element: &XmlElement) -> Result<()> {
        let name = element.name();
        match name.namespace() {
            Some(namespace) => {
                let prefix = match name.prefix.as_deref().filter(|p| !p.is_empty()) {
                    Some(prefix) => Some(prefix.to_string()),
                    None if self.lookup_namespace("") == Some(namespace) => None,
                    None => Some(
                        self.any_prefix_for(namespace)
                            .unwrap_or_else(|| self.generate_prefix()),
                    ),
                };
                self.start_element_ns(prefix.as_deref(), &name.local, namespace)?;
            }
            None => {
                self.start_element(&name.local)?;
                if self.lookup_namespace("").is_some_and(|ns| !ns.is_empty()) {
                    self.bind("", "")?;
                }
            }
        }

        for attribute in element.attributes() {
            match attribute.name.namespace() {
                Some(namespace) => {
                    let prefix = attribute.name.prefix.as_deref().unwrap_or_default();
                    self.attribute_ns(prefix, &attribute.name.local, namespace, &attribute.value)?;
                }
                None => self.attribute(&attribute.name.local, &attribute.value)?,
            }
        }

        for node in element.nodes() {
            match node {
                XmlNode::Element(child) => self.write_tree(child)?,
                XmlNode::Text(text) => self.text(text)?,
            }
        }

        self.end_element()
    }

    /// Check that every element was closed and flush the output.
    pub fn finish(mut self) -> Result<()> {
        if let Some(name) = self.open.last() {
            return Err(SyndicationError::XmlWrite(format!(
                "element <{name}> was never closed"
            )));
        }
        self.inner
            .get_mut()
            .flush()
            .map_err(SyndicationError::Io)
    }

    /// Namespace currently bound to `prefix` (`""` for the default namespace).
    #[must_use]
    pub fn lookup_namespace(&self, prefix: &str) -> Option<&str> {
        self.scopes
            .iter()
            .rev()
            .flat_map(|scope| scope.iter().rev())
            .find(|(p, _)| p == prefix)
            .map(|(_, ns)| ns.as_str())
    }

    /// Number of elements currently open.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    fn can_encode(&self, text: &str) -> bool {
        if self.encoding == UTF_8 || text.is_ascii() {
            return true;
        }
        let (_, _, unmappable) = self.encoding.encode(text);
        !unmappable
    }

    fn prefix_for(&self, namespace: &str, preferred: &str) -> Option<String> {
        if !preferred.is_empty() && self.lookup_namespace(preferred) == Some(namespace) {
            return Some(preferred.to_string());
        }
        self.any_prefix_for(namespace)
    }

    fn any_prefix_for(&self, namespace: &str) -> Option<String> {
        self.scopes
            .iter()
            .rev()
            .flat_map(|scope| scope.iter().rev())
            .filter(|(prefix, ns)| !prefix.is_empty() && ns == namespace)
            .map(|(prefix, _)| prefix)
            .find(|prefix| self.lookup_namespace(prefix) == Some(namespace))
            .cloned()
    }

    fn generate_prefix(&mut self) -> String {
        loop {
            let candidate = format!("ns{}", self.generated_prefixes);
            self.generated_prefixes += 1;
            if self.lookup_namespace(&candidate).is_none() {
                return candidate;
            }
        }
    }

    fn bind(&mut self, prefix: &str, namespace: &str) -> Result<()> {
        let attribute = if prefix.is_empty() {
            "xmlns".to_string()
        } else {
            format!("xmlns:{prefix}")
        };
        self.pending_mut()?
            .push_attribute((attribute.as_str(), namespace));
        if let Some(scope) = self.scopes.last_mut() {
            scope.push((prefix.to_string(), namespace.to_string()));
        }
        Ok(())
    }

    fn pending_mut(&mut self) -> Result<&mut BytesStart<'static>> {
        self.pending
            .as_mut()
            .ok_or_else(|| SyndicationError::XmlWrite("no start tag is open for attributes".to_string()))
    }

    fn flush_pending(&mut self) -> Result<()> {
        match self.pending.take() {
            Some(start) => self.emit(Event::Start(start)),
            None => Ok(()),
        }
    }

    fn emit(&mut self, event: Event<'_>) -> Result<()> {
        self.inner
            .write_event(event)
            .map_err(|e| SyndicationError::XmlWrite(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::parse_str;

    fn render(f: impl FnOnce(&mut XmlWriter<'_>) -> Result<()>) -> String {
        let mut buffer = Vec::new();
        {
            let mut writer = XmlWriter::new(&mut buffer);
            f(&mut writer).unwrap();
            writer.finish().unwrap();
        }
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_empty_element_is_self_closing() {
        let xml = render(|w| {
            w.start_element("outline")?;
            w.attribute("text", "a & b")?;
            w.end_element()
        });
        assert_eq!(xml, r#"<outline text="a &amp; b"/>"#);
    }

    #[test]
    fn test_text_is_escaped() {
        let xml = render(|w| w.element_text("title", "Fish & <Chips>"));
        assert_eq!(xml, "<title>Fish &amp; &lt;Chips&gt;</title>");
    }

    #[test]
    fn test_cdata_falls_back_to_text() {
        let xml = render(|w| {
            w.start_element("content")?;
            w.cdata("a]]>b")?;
            w.end_element()
        });
        assert_eq!(xml, "<content>a]]&gt;b</content>");
    }

    #[test]
    fn test_cdata_unmappable_in_output_encoding_becomes_text() {
        let windows_1252 = Encoding::for_label(b"windows-1252").unwrap();
        let mut buffer = Vec::new();
        {
            let mut writer = XmlWriter::new(&mut buffer).with_output_encoding(windows_1252);
            writer.start_element("title").unwrap();
            writer.cdata("Café ☃").unwrap();
            writer.end_element().unwrap();
            writer.start_element("name").unwrap();
            writer.cdata("Café").unwrap();
            writer.end_element().unwrap();
            writer.finish().unwrap();
        }
        let xml = String::from_utf8(buffer).unwrap();
        assert_eq!(xml, "<title>Café ☃</title><name><![CDATA[Café]]></name>");
    }

    #[test]
    fn test_attribute_line_breaks_are_references() {
        let xml = render(|w| {
            w.start_element("outline")?;
            w.attribute("note", "a\nb\tc \"d\"")?;
            w.end_element()
        });
        assert_eq!(xml, r#"<outline note="a&#10;b&#9;c &quot;d&quot;"/>"#);
        let root = parse_str(&xml).unwrap();
        assert_eq!(crate::xml::get_attribute(&root, "note"), Some("a\nb\tc \"d\""));
    }

    #[test]
    fn test_namespace_declared_once() {
        let xml = render(|w| {
            w.start_element("head")?;
            w.declare_namespace(Some("dc"), "urn:dc")?;
            w.element_text_ns(Some("dc"), "creator", "urn:dc", "Ann")?;
            w.element_text_ns(Some("other"), "rights", "urn:dc", "CC")?;
            w.end_element()
        });
        assert_eq!(
            xml,
            r#"<head xmlns:dc="urn:dc"><dc:creator>Ann</dc:creator><dc:rights>CC</dc:rights></head>"#
        );
    }

    #[test]
    fn test_unbound_namespace_declared_locally() {
        let xml = render(|w| {
            w.start_element("outline")?;
            w.attribute_ns("x", "flag", "urn:x", "1")?;
            w.end_element()
        });
        assert_eq!(xml, r#"<outline xmlns:x="urn:x" x:flag="1"/>"#);
    }

    #[test]
    fn test_default_namespace_inherited() {
        let xml = render(|w| {
            w.start_element_ns(None, "rsd", "urn:rsd")?;
            w.start_element_ns(None, "service", "urn:rsd")?;
            w.end_element()?;
            w.end_element()
        });
        assert_eq!(xml, r#"<rsd xmlns="urn:rsd"><service/></rsd>"#);
    }

    #[test]
    fn test_root_declarations_are_hoisted() {
        let xml = render(|w| {
            w.declare_on_root("dc", "urn:dc");
            w.declare_on_root("dc", "urn:other");
            w.start_element("opml")?;
            w.start_element("head")?;
            w.element_text_ns(Some("dc"), "creator", "urn:dc", "Ann")?;
            w.end_element()?;
            w.end_element()
        });
        assert_eq!(
            xml,
            r#"<opml xmlns:dc="urn:dc"><head><dc:creator>Ann</dc:creator></head></opml>"#
        );
    }

    #[test]
    fn test_attribute_without_start_tag_fails() {
        let mut buffer = Vec::new();
        let mut writer = XmlWriter::new(&mut buffer);
        assert!(writer.attribute("a", "b").is_err());
    }

    #[test]
    fn test_unclosed_element_fails_finish() {
        let mut buffer = Vec::new();
        let mut writer = XmlWriter::new(&mut buffer);
        writer.start_element("opml").unwrap();
        assert!(writer.finish().is_err());
    }

    #[test]
    fn test_write_tree_round_trips() {
        let source = parse_str(
            r#"<x:meta xmlns:x="urn:x" x:level="2"><x:item>one</x:item><plain>two</plain></x:meta>"#,
        )
        .unwrap();
        let xml = render(|w| w.write_tree(&source));
        assert_eq!(parse_str(&xml).unwrap(), source);
    }
}
