//! Document-level load and save entry points shared by all formats.

use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use encoding_rs::{Encoding, UTF_8};
use url::Url;

use crate::blogml::BlogMlDocument;
use crate::config::{BLOGML_NAMESPACE, BLOGML_VERSION, OPML_VERSION, RSD_NAMESPACE, RSD_VERSION};
use crate::entity::SyndicationEntity;
use crate::error::{Result, SyndicationError};
use crate::http::{fetch, FetchRequest};
use crate::opml::OpmlDocument;
use crate::options::{LoadOptions, SaveOptions};
use crate::rsd::RsdDocument;
use crate::xml::{from_node, parse_bytes, parse_str, XmlElement, XmlWriter};

/// The supported document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyndicationFormat {
    Opml,
    Rsd,
    BlogMl,
}

impl SyndicationFormat {
    pub const ALL: [Self; 3] = [Self::Opml, Self::Rsd, Self::BlogMl];

    /// Local name of the root element.
    #[must_use]
    pub fn root_name(self) -> &'static str {
        match self {
            Self::Opml => "opml",
            Self::Rsd => "rsd",
            Self::BlogMl => "blog",
        }
    }

    /// Version written by this crate.
    #[must_use]
    pub fn version(self) -> &'static str {
        match self {
            Self::Opml => OPML_VERSION,
            Self::Rsd => RSD_VERSION,
            Self::BlogMl => BLOGML_VERSION,
        }
    }

    /// Namespace of the format's elements, if it has one.
    #[must_use]
    pub fn namespace(self) -> Option<&'static str> {
        match self {
            Self::Opml => None,
            Self::Rsd => Some(RSD_NAMESPACE),
            Self::BlogMl => Some(BLOGML_NAMESPACE),
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Opml => "OPML",
            Self::Rsd => "RSD",
            Self::BlogMl => "BlogML",
        }
    }

    /// Detect the format from a root element's local name.
    ///
    /// # Examples
    /// ```
    /// use syndication_xml::{xml::parse_str, SyndicationFormat};
    ///
    /// let root = parse_str(r#"<rsd version="1.0"/>"#).unwrap();
    /// assert_eq!(SyndicationFormat::detect(&root), Some(SyndicationFormat::Rsd));
    /// ```
    #[must_use]
    pub fn detect(root: &XmlElement) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|format| format.root_name() == root.local_name())
    }
}

impl fmt::Display for SyndicationFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a loaded document came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    Element,
    Text,
    Bytes,
    Reader,
    File(PathBuf),
    Node,
    Url(Url),
}

/// Event passed to load-completed listeners.
#[derive(Debug, Clone)]
pub struct DocumentLoaded {
    pub format: SyndicationFormat,
    pub source: DocumentSource,
    pub data_found: bool,
}

/// Callback invoked after a document instance finished loading.
pub type LoadListener = Arc<dyn Fn(&DocumentLoaded) + Send + Sync>;

/// Load-completed listeners of a document.
///
/// Listeners are not part of a document's structural identity.
#[derive(Clone, Default)]
pub struct LoadListeners {
    listeners: Vec<LoadListener>,
}

impl LoadListeners {
    pub fn add(&mut self, listener: LoadListener) {
        self.listeners.push(listener);
    }

    /// Invoke every listener in registration order.
    pub fn notify(&self, event: &DocumentLoaded) {
        for listener in &self.listeners {
            listener(event);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn clear(&mut self) {
        self.listeners.clear();
    }
}

impl fmt::Debug for LoadListeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadListeners")
            .field("count", &self.listeners.len())
            .finish()
    }
}

/// Trait for format root documents.
///
/// Provides loading from every supported source, load-completed
/// notification and saving.
pub trait SyndicationDocument: SyndicationEntity + Default + Sized {
    const FORMAT: SyndicationFormat;

    fn listeners(&self) -> &LoadListeners;

    fn listeners_mut(&mut self) -> &mut LoadListeners;

    /// Version written into saved documents.
    fn version(&self) -> &'static str {
        Self::FORMAT.version()
    }

    /// Local name of the root element.
    fn root_name(&self) -> &'static str {
        Self::FORMAT.root_name()
    }

    /// Register a load-completed listener.
    fn on_loaded(&mut self, listener: impl Fn(&DocumentLoaded) + Send + Sync + 'static) {
        self.listeners_mut().add(Arc::new(listener));
    }

    /// Reset all content to the default state, keeping listeners.
    fn reset(&mut self) {
        let listeners = std::mem::take(self.listeners_mut());
        *self = Self::default();
        *self.listeners_mut() = listeners;
    }

    /// Load from a root element, reporting `source` to listeners.
    ///
    /// # Errors
    /// Returns `UnexpectedRoot` when the root element does not belong to the
    /// format. The document is left untouched in that case.
    fn load_element_from(
        &mut self,
        root: &XmlElement,
        options: &LoadOptions,
        source: DocumentSource,
    ) -> Result<bool> {
        let expected = Self::FORMAT.root_name();
        if root.local_name() != expected {
            return Err(SyndicationError::UnexpectedRoot {
                expected,
                found: root.name().qualified_name(),
            });
        }

        self.reset();
        let data_found = self.load_with_options(root, options);
        tracing::debug!(format = %Self::FORMAT, data_found, "Document loaded");

        self.listeners().notify(&DocumentLoaded {
            format: Self::FORMAT,
            source,
            data_found,
        });
        Ok(data_found)
    }

    /// Load from a root element.
    fn load_element(&mut self, root: &XmlElement, options: &LoadOptions) -> Result<bool> {
        self.load_element_from(root, options, DocumentSource::Element)
    }

    /// Load from an XML string.
    fn load_str(&mut self, xml: &str, options: &LoadOptions) -> Result<bool> {
        let root = parse_str(xml)?;
        self.load_element_from(&root, options, DocumentSource::Text)
    }

    /// Load from raw bytes, decoding with the encoding of `options` or the
    /// detected one.
    fn load_bytes(&mut self, bytes: &[u8], options: &LoadOptions) -> Result<bool> {
        let root = parse_bytes(bytes, options.encoding)?;
        self.load_element_from(&root, options, DocumentSource::Bytes)
    }

    /// Load from a reader.
    fn load_reader(&mut self, reader: &mut dyn Read, options: &LoadOptions) -> Result<bool> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        let root = parse_bytes(&bytes, options.encoding)?;
        self.load_element_from(&root, options, DocumentSource::Reader)
    }

    /// Load from a file.
    fn load_file(&mut self, path: impl AsRef<Path>, options: &LoadOptions) -> Result<bool> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let root = parse_bytes(&bytes, options.encoding)?;
        self.load_element_from(&root, options, DocumentSource::File(path.to_path_buf()))
    }

    /// Load from a pre-parsed `roxmltree` element.
    fn load_node(&mut self, node: roxmltree::Node<'_, '_>, options: &LoadOptions) -> Result<bool> {
        let root = from_node(node).ok_or_else(|| SyndicationError::InvalidArgument {
            name: "node",
            reason: "not an element node".to_string(),
        })?;
        self.load_element_from(&root, options, DocumentSource::Node)
    }

    /// Fetch and load a document described by `request`.
    ///
    /// The exclusive borrow keeps at most one request in flight per document.
    fn load_request(&mut self, request: &FetchRequest, options: &LoadOptions) -> Result<bool> {
        let bytes = fetch(request)?;
        let root = parse_bytes(&bytes, options.encoding)?;
        self.load_element_from(&root, options, DocumentSource::Url(request.url().clone()))
    }

    /// Fetch and load a document from a URL.
    fn load_url(&mut self, url: &str, options: &LoadOptions) -> Result<bool> {
        let request = FetchRequest::from_options(url, options)?;
        self.load_request(&request, options)
    }

    /// Parse a document from an XML string with default options.
    fn parse(xml: &str) -> Result<Self> {
        let mut document = Self::default();
        document.load_str(xml, &LoadOptions::default())?;
        Ok(document)
    }

    /// Open a document file with default options.
    fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut document = Self::default();
        document.load_file(path, &LoadOptions::default())?;
        Ok(document)
    }

    /// Write the document to `output` in the encoding of `options`.
    fn save(&self, output: &mut dyn Write, options: &SaveOptions) -> Result<()> {
        let bytes = render(self, options, options.encoding)?;
        if options.encoding == UTF_8 {
            output.write_all(&bytes)?;
            return Ok(());
        }

        let text = String::from_utf8(bytes).map_err(|e| SyndicationError::XmlWrite(e.to_string()))?;
        let (encoded, _, unmappable) = options.encoding.encode(&text);
        if unmappable {
            tracing::warn!(
                encoding = options.encoding.name(),
                "Characters not representable in the output encoding were written as character references"
            );
        }
        output.write_all(&encoded)?;
        Ok(())
    }

    /// Serialize with default options.
    fn to_xml(&self) -> Result<String> {
        self.to_xml_with(&SaveOptions::default())
    }

    /// Serialize to a UTF-8 string.
    fn to_xml_with(&self, options: &SaveOptions) -> Result<String> {
        let bytes = render(self, options, UTF_8)?;
        String::from_utf8(bytes).map_err(|e| SyndicationError::XmlWrite(e.to_string()))
    }

    /// Write the document to a file.
    fn save_file(&self, path: impl AsRef<Path>, options: &SaveOptions) -> Result<()> {
        let file = File::create(path)?;
        let mut output = BufWriter::new(file);
        self.save(&mut output, options)?;
        output.flush()?;
        Ok(())
    }
}

/// Namespace declarations hoisted onto the root element.
///
/// With auto-detection every extension namespace in the graph is declared,
/// in visiting order. Otherwise the supported extensions are declared.
#[must_use]
pub fn root_namespace_declarations(
    entity: &dyn SyndicationEntity,
    options: &SaveOptions,
) -> Vec<(String, String)> {
    if !options.auto_detect_extensions {
        return options
            .supported_extensions
            .declarations()
            .into_iter()
            .map(|(prefix, namespace)| (prefix.to_string(), namespace.to_string()))
            .collect();
    }

    let mut declarations: Vec<(String, String)> = Vec::new();
    entity.visit_extensions(&mut |extension| {
        if !declarations.iter().any(|(_, ns)| ns == extension.namespace()) {
            declarations.push((extension.prefix().to_string(), extension.namespace().to_string()));
        }
    });
    declarations
}

fn render<D: SyndicationDocument>(document: &D, options: &SaveOptions, encoding: &'static Encoding) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    {
        let mut writer =
            XmlWriter::with_indent(&mut buffer, options.effective_indent()).with_output_encoding(encoding);
        if options.include_declaration {
            writer.write_declaration(encoding.name())?;
        }
        for (prefix, namespace) in root_namespace_declarations(document, options) {
            writer.declare_on_root(&prefix, &namespace);
        }
        document.write_to(&mut writer)?;
        writer.finish()?;
    }
    Ok(buffer)
}

/// A loaded document of any supported format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyndicationResource {
    Opml(OpmlDocument),
    Rsd(RsdDocument),
    BlogMl(BlogMlDocument),
}

impl SyndicationResource {
    /// Parse an XML string, detecting the format from the root element.
    ///
    /// # Errors
    /// Returns `UnknownFormat` when no format matches the root element.
    pub fn parse(xml: &str) -> Result<Self> {
        Self::parse_with(xml, &LoadOptions::default())
    }

    pub fn parse_with(xml: &str, options: &LoadOptions) -> Result<Self> {
        Self::from_element(&parse_str(xml)?, options)
    }

    pub fn from_bytes(bytes: &[u8], options: &LoadOptions) -> Result<Self> {
        Self::from_element(&parse_bytes(bytes, options.encoding)?, options)
    }

    pub fn open(path: impl AsRef<Path>, options: &LoadOptions) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes, options)
    }

    pub fn fetch(request: &FetchRequest, options: &LoadOptions) -> Result<Self> {
        let bytes = fetch(request)?;
        Self::from_bytes(&bytes, options)
    }

    /// Load the format matching `root`.
    pub fn from_element(root: &XmlElement, options: &LoadOptions) -> Result<Self> {
        let format = SyndicationFormat::detect(root)
            .ok_or_else(|| SyndicationError::UnknownFormat(root.name().qualified_name()))?;
        Ok(match format {
            SyndicationFormat::Opml => Self::Opml(load_document(root, options)?),
            SyndicationFormat::Rsd => Self::Rsd(load_document(root, options)?),
            SyndicationFormat::BlogMl => Self::BlogMl(load_document(root, options)?),
        })
    }

    #[must_use]
    pub fn format(&self) -> SyndicationFormat {
        match self {
            Self::Opml(_) => SyndicationFormat::Opml,
            Self::Rsd(_) => SyndicationFormat::Rsd,
            Self::BlogMl(_) => SyndicationFormat::BlogMl,
        }
    }

    /// The loaded document as an entity.
    #[must_use]
    pub fn as_entity(&self) -> &dyn SyndicationEntity {
        match self {
            Self::Opml(document) => document,
            Self::Rsd(document) => document,
            Self::BlogMl(document) => document,
        }
    }

    pub fn save(&self, output: &mut dyn Write, options: &SaveOptions) -> Result<()> {
        match self {
            Self::Opml(document) => document.save(output, options),
            Self::Rsd(document) => document.save(output, options),
            Self::BlogMl(document) => document.save(output, options),
        }
    }

    pub fn to_xml_with(&self, options: &SaveOptions) -> Result<String> {
        match self {
            Self::Opml(document) => document.to_xml_with(options),
            Self::Rsd(document) => document.to_xml_with(options),
            Self::BlogMl(document) => document.to_xml_with(options),
        }
    }

    pub fn save_file(&self, path: impl AsRef<Path>, options: &SaveOptions) -> Result<()> {
        match self {
            Self::Opml(document) => document.save_file(path, options),
            Self::Rsd(document) => document.save_file(path, options),
            Self::BlogMl(document) => document.save_file(path, options),
        }
    }
}

fn load_document<D: SyndicationDocument>(root: &XmlElement, options: &LoadOptions) -> Result<D> {
    let mut document = D::default();
    document.load_element(root, options)?;
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_detect_format() {
        let root = parse_str("<blog/>").unwrap();
        assert_eq!(SyndicationFormat::detect(&root), Some(SyndicationFormat::BlogMl));
        let root = parse_str("<rss/>").unwrap();
        assert_eq!(SyndicationFormat::detect(&root), None);
    }

    #[test]
    fn test_unexpected_root_leaves_document_untouched() {
        let mut document = OpmlDocument::parse(
            r#"<opml version="2.0"><body><outline text="keep"/></body></opml>"#,
        )
        .unwrap();

        let result = document.load_str("<rsd/>", &LoadOptions::default());
        assert!(matches!(
            result,
            Err(SyndicationError::UnexpectedRoot { expected: "opml", .. })
        ));
        assert_eq!(document.outlines().len(), 1);
    }

    #[test]
    fn test_listener_fires_once_per_load() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let mut document = RsdDocument::default();
        document.on_loaded(move |event| {
            assert_eq!(event.format, SyndicationFormat::Rsd);
            assert_eq!(event.source, DocumentSource::Text);
            counter.fetch_add(1, Ordering::SeqCst);
        });

        document
            .load_str(r#"<rsd version="1.0"><service><engineName>X</engineName></service></rsd>"#, &LoadOptions::default())
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        document.load_str("<rsd/>", &LoadOptions::default()).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(document.listeners().len(), 1);
    }

    #[test]
    fn test_resource_detects_format() {
        let resource = SyndicationResource::parse(r#"<opml version="1.1"><head/><body/></opml>"#).unwrap();
        assert_eq!(resource.format(), SyndicationFormat::Opml);
        assert!(matches!(
            SyndicationResource::parse("<rss/>"),
            Err(SyndicationError::UnknownFormat(_))
        ));
    }

    #[test]
    fn test_load_node() {
        let doc = roxmltree::Document::parse(
            r#"<opml version="2.0"><head><title>T</title></head><body/></opml>"#,
        )
        .unwrap();
        let mut document = OpmlDocument::default();
        assert!(document.load_node(doc.root_element(), &LoadOptions::default()).unwrap());
        assert_eq!(document.head().title(), Some("T"));
    }
}
