//! BlogML text constructs.

use std::cmp::Ordering;
use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::compare::{compare_text, impl_structural_ord};
use crate::config::BLOGML_NAMESPACE;
use crate::error::Result;
use crate::xml::{get_attribute, XmlElement, XmlWriter};

/// How the content of a text construct is encoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BlogMlContentType {
    #[default]
    Text,
    Html,
    Xhtml,
    Base64,
}

impl BlogMlContentType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Html => "html",
            Self::Xhtml => "xhtml",
            Self::Base64 => "base64",
        }
    }

    /// Parse a `type` attribute value, ignoring case.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "text" => Some(Self::Text),
            "html" => Some(Self::Html),
            "xhtml" => Some(Self::Xhtml),
            "base64" => Some(Self::Base64),
            _ => None,
        }
    }
}

impl fmt::Display for BlogMlContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed character content written as a CDATA section.
///
/// # Examples
/// ```
/// use syndication_xml::blogml::{BlogMlContentType, BlogMlTextConstruct};
///
/// let text = BlogMlTextConstruct::html("<p>Hello</p>");
/// assert_eq!(text.content_type(), BlogMlContentType::Html);
///
/// let encoded = BlogMlTextConstruct::base64(b"raw");
/// assert_eq!(encoded.content(), "cmF3");
/// assert_eq!(encoded.decoded().unwrap(), b"raw");
/// ```
#[derive(Debug, Clone, Default)]
pub struct BlogMlTextConstruct {
    content: String,
    content_type: BlogMlContentType,
}

impl BlogMlTextConstruct {
    /// Create a construct with explicit content type.
    #[must_use]
    pub fn new(content: impl Into<String>, content_type: BlogMlContentType) -> Self {
        Self {
            content: content.into(),
            content_type,
        }
    }

    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self::new(content, BlogMlContentType::Text)
    }

    #[must_use]
    pub fn html(content: impl Into<String>) -> Self {
        Self::new(content, BlogMlContentType::Html)
    }

    /// Create a base64 construct from raw bytes.
    #[must_use]
    pub fn base64(bytes: &[u8]) -> Self {
        Self::new(STANDARD.encode(bytes), BlogMlContentType::Base64)
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    #[must_use]
    pub fn content_type(&self) -> BlogMlContentType {
        self.content_type
    }

    /// Decode base64 content. Returns `None` for other content types or
    /// malformed data.
    #[must_use]
    pub fn decoded(&self) -> Option<Vec<u8>> {
        if self.content_type != BlogMlContentType::Base64 {
            return None;
        }
        STANDARD.decode(self.content.trim()).ok()
    }

    /// Read a construct from an element. Whitespace-only content yields `None`.
    pub(crate) fn from_element(element: &XmlElement) -> Option<Self> {
        let content = element.text().filter(|c| !c.trim().is_empty())?;
        let content_type = get_attribute(element, "type")
            .and_then(BlogMlContentType::parse)
            .unwrap_or_default();
        Some(Self { content, content_type })
    }

    /// Write the construct as `<local type="...">` in the BlogML namespace.
    pub(crate) fn write(&self, writer: &mut XmlWriter<'_>, local: &str) -> Result<()> {
        writer.start_element_ns(None, local, BLOGML_NAMESPACE)?;
        writer.attribute("type", self.content_type.as_str())?;
        writer.cdata(&self.content)?;
        writer.end_element()
    }

    /// Content compares case-insensitively.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Ordering {
        compare_text(&self.content, &other.content, true).then_with(|| self.content_type.cmp(&other.content_type))
    }
}

impl_structural_ord!(BlogMlTextConstruct);

impl fmt::Display for BlogMlTextConstruct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::parse_str;

    #[test]
    fn test_from_element_reads_cdata() {
        let element = parse_str(r#"<content type="HTML"><![CDATA[<b>bold</b>]]></content>"#).unwrap();
        let text = BlogMlTextConstruct::from_element(&element).unwrap();
        assert_eq!(text.content(), "<b>bold</b>");
        assert_eq!(text.content_type(), BlogMlContentType::Html);
    }

    #[test]
    fn test_unknown_type_falls_back_to_text() {
        let element = parse_str(r#"<title type="rtf">x</title>"#).unwrap();
        assert_eq!(
            BlogMlTextConstruct::from_element(&element).unwrap().content_type(),
            BlogMlContentType::Text
        );
        assert!(BlogMlTextConstruct::from_element(&parse_str("<title>  </title>").unwrap()).is_none());
    }

    #[test]
    fn test_write_escapes_cdata_terminator() {
        let mut buffer = Vec::new();
        {
            let mut writer = XmlWriter::new(&mut buffer);
            BlogMlTextConstruct::text("a]]>b").write(&mut writer, "title").unwrap();
            writer.finish().unwrap();
        }
        let xml = String::from_utf8(buffer).unwrap();
        assert!(!xml.contains("<![CDATA["));
        assert!(xml.contains("a]]&gt;b"));
    }

    #[test]
    fn test_decoded_requires_base64_type() {
        assert!(BlogMlTextConstruct::text("cmF3").decoded().is_none());
    }
}
