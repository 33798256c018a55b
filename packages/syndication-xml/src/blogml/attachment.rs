//! Post attachments.

use std::cmp::Ordering;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use url::Url;

use super::common::start;
use crate::compare::{compare_extensions, compare_optional_text, impl_structural_ord};
use crate::entity::{Extensible, SyndicationEntity};
use crate::error::Result;
use crate::options::LoadOptions;
use crate::registry::ExtensionList;
use crate::values::{format_bool, normalize, parse_bool, parse_u64, parse_url};
use crate::xml::{get_attribute, get_text, XmlElement, XmlWriter};

/// A file attached to a post, either embedded as base64 or referenced.
///
/// # Examples
/// ```
/// use syndication_xml::blogml::BlogMlAttachment;
///
/// let mut attachment = BlogMlAttachment::new();
/// attachment.set_mime_type("image/png");
/// attachment.embed(vec![0x89, b'P', b'N', b'G']);
/// assert!(attachment.is_embedded());
/// assert_eq!(attachment.size(), Some(4));
/// ```
#[derive(Debug, Clone, Default)]
pub struct BlogMlAttachment {
    embedded: bool,
    mime_type: Option<String>,
    external_uri: Option<Url>,
    url: Option<String>,
    size: Option<u64>,
    data: Vec<u8>,
    extensions: ExtensionList,
}

impl BlogMlAttachment {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_embedded(&self) -> bool {
        self.embedded
    }

    #[must_use]
    pub fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }

    pub fn set_mime_type(&mut self, mime_type: &str) {
        self.mime_type = normalize(mime_type);
    }

    /// Location the file was originally published at.
    #[must_use]
    pub fn external_uri(&self) -> Option<&Url> {
        self.external_uri.as_ref()
    }

    pub fn set_external_uri(&mut self, uri: Option<Url>) {
        self.external_uri = uri;
    }

    /// Path the post content refers to. May be relative.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn set_url(&mut self, url: &str) {
        self.url = normalize(url);
    }

    #[must_use]
    pub fn size(&self) -> Option<u64> {
        self.size
    }

    pub fn set_size(&mut self, size: Option<u64>) {
        self.size = size;
    }

    /// Embedded file content. Empty for referenced attachments.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Embed `data`, updating the size.
    pub fn embed(&mut self, data: Vec<u8>) {
        self.size = u64::try_from(data.len()).ok();
        self.data = data;
        self.embedded = true;
    }

    #[must_use]
    pub fn compare(&self, other: &Self) -> Ordering {
        self.embedded
            .cmp(&other.embedded)
            .then_with(|| compare_optional_text(self.mime_type(), other.mime_type()))
            .then_with(|| {
                compare_optional_text(
                    self.external_uri.as_ref().map(Url::as_str),
                    other.external_uri.as_ref().map(Url::as_str),
                )
            })
            .then_with(|| compare_optional_text(self.url(), other.url()))
            .then_with(|| self.size.cmp(&other.size))
            .then_with(|| self.data.len().cmp(&other.data.len()))
            .then_with(|| self.data.cmp(&other.data))
            .then_with(|| compare_extensions(&self.extensions, &other.extensions))
    }
}

impl_structural_ord!(BlogMlAttachment);

impl Extensible for BlogMlAttachment {
    fn extensions(&self) -> &ExtensionList {
        &self.extensions
    }

    fn extensions_mut(&mut self) -> &mut ExtensionList {
        &mut self.extensions
    }
}

impl SyndicationEntity for BlogMlAttachment {
    fn load_fields(&mut self, source: &XmlElement, _options: Option<&LoadOptions>) -> bool {
        let mut found = false;
        if let Some(embedded) = get_attribute(source, "embedded").and_then(parse_bool) {
            self.embedded = embedded;
            found = true;
        }
        if let Some(mime_type) = get_attribute(source, "mime-type").and_then(normalize) {
            self.mime_type = Some(mime_type);
            found = true;
        }
        if let Some(uri) = get_attribute(source, "external-uri").and_then(parse_url) {
            self.external_uri = Some(uri);
            found = true;
        }
        if let Some(url) = get_attribute(source, "url").and_then(normalize) {
            self.url = Some(url);
            found = true;
        }
        if let Some(size) = get_attribute(source, "size").and_then(parse_u64) {
            self.size = Some(size);
            found = true;
        }

        let encoded: String = get_text(source).split_whitespace().collect();
        if self.embedded && !encoded.is_empty() {
            match STANDARD.decode(encoded.as_bytes()) {
                Ok(data) => {
                    self.data = data;
                    found = true;
                }
                Err(e) => tracing::trace!(error = %e, "Attachment content is not valid base64, skipping"),
            }
        }
        found
    }

    fn write_to(&self, writer: &mut XmlWriter<'_>) -> Result<()> {
        start(writer, "attachment")?;
        writer.attribute("embedded", format_bool(self.embedded))?;
        if let Some(mime_type) = &self.mime_type {
            writer.attribute("mime-type", mime_type)?;
        }
        if let Some(uri) = &self.external_uri {
            writer.attribute("external-uri", uri.as_str())?;
        }
        if let Some(url) = &self.url {
            writer.attribute("url", url)?;
        }
        if let Some(size) = self.size {
            writer.attribute("size", &size.to_string())?;
        }
        self.extensions.write_attributes(writer)?;

        if self.embedded && !self.data.is_empty() {
            writer.text(&STANDARD.encode(&self.data))?;
        }

        self.extensions.write_elements(writer)?;
        writer.end_element()
    }
}
