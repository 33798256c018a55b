//! OPML root document.

use std::cmp::Ordering;

use super::head::OpmlHead;
use super::outline::OpmlOutline;
use crate::compare::{compare_entities, compare_extensions, impl_structural_ord};
use crate::document::{LoadListeners, SyndicationDocument, SyndicationFormat};
use crate::entity::{load_child, load_children, Extensible, SyndicationEntity};
use crate::error::Result;
use crate::options::LoadOptions;
use crate::registry::{ExtensionList, SyndicationExtension};
use crate::xml::{find_child, find_children, XmlElement, XmlWriter};

/// An Outline Processor Markup Language document.
///
/// Any `version` is accepted on load; saved documents always declare
/// version 2.0.
///
/// # Examples
/// ```
/// use syndication_xml::opml::{OpmlDocument, OpmlOutline};
/// use syndication_xml::SyndicationDocument;
///
/// let mut document = OpmlDocument::new();
/// document.head_mut().set_title("Subscriptions");
/// document.add_outline(OpmlOutline::new("News").unwrap());
///
/// let xml = document.to_xml().unwrap();
/// let reloaded = OpmlDocument::parse(&xml).unwrap();
/// assert_eq!(reloaded, document);
/// ```
#[derive(Debug, Clone, Default)]
pub struct OpmlDocument {
    head: OpmlHead,
    outlines: Vec<OpmlOutline>,
    extensions: ExtensionList,
    listeners: LoadListeners,
}

impl OpmlDocument {
    /// Create a new empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn head(&self) -> &OpmlHead {
        &self.head
    }

    pub fn head_mut(&mut self) -> &mut OpmlHead {
        &mut self.head
    }

    /// Top-level outlines of `<body>`.
    #[must_use]
    pub fn outlines(&self) -> &[OpmlOutline] {
        &self.outlines
    }

    pub fn outlines_mut(&mut self) -> &mut Vec<OpmlOutline> {
        &mut self.outlines
    }

    pub fn add_outline(&mut self, outline: OpmlOutline) {
        self.outlines.push(outline);
    }

    /// Structural comparison; load listeners are ignored.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Ordering {
        self.head
            .cmp(&other.head)
            .then_with(|| compare_entities(&self.outlines, &other.outlines))
            .then_with(|| compare_extensions(&self.extensions, &other.extensions))
    }
}

impl_structural_ord!(OpmlDocument);

impl Extensible for OpmlDocument {
    fn extensions(&self) -> &ExtensionList {
        &self.extensions
    }

    fn extensions_mut(&mut self) -> &mut ExtensionList {
        &mut self.extensions
    }
}

impl SyndicationEntity for OpmlDocument {
    fn load_fields(&mut self, source: &XmlElement, options: Option<&LoadOptions>) -> bool {
        let namespace = source.namespace();
        let mut found = false;

        if let Some(head) = find_child(source, "head", namespace) {
            found |= load_child(&mut self.head, head, options);
        }
        if let Some(body) = find_child(source, "body", namespace) {
            let outlines: Vec<OpmlOutline> =
                load_children(find_children(body, "outline", namespace), options);
            found |= !outlines.is_empty();
            self.outlines.extend(outlines);
        }

        found
    }

    fn write_to(&self, writer: &mut XmlWriter<'_>) -> Result<()> {
        writer.start_element(Self::FORMAT.root_name())?;
        writer.attribute("version", self.version())?;
        self.extensions.write_attributes(writer)?;

        self.head.write_to(writer)?;

        writer.start_element("body")?;
        for outline in &self.outlines {
            outline.write_to(writer)?;
        }
        writer.end_element()?;

        self.extensions.write_elements(writer)?;
        writer.end_element()
    }

    fn visit_extensions(&self, visitor: &mut dyn FnMut(&dyn SyndicationExtension)) {
        for extension in self.extensions.iter() {
            visitor(extension);
        }
        self.head.visit_extensions(visitor);
        for outline in &self.outlines {
            outline.visit_extensions(visitor);
        }
    }
}

impl SyndicationDocument for OpmlDocument {
    const FORMAT: SyndicationFormat = SyndicationFormat::Opml;

    fn listeners(&self) -> &LoadListeners {
        &self.listeners
    }

    fn listeners_mut(&mut self) -> &mut LoadListeners {
        &mut self.listeners
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::SaveOptions;
    use crate::registry::DublinCoreExtension;
    use pretty_assertions::assert_eq;

    const SUBSCRIPTIONS: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<opml version="1.1" xmlns:dc="http://purl.org/dc/elements/1.1/">
  <head>
    <title>mySubscriptions</title>
    <dc:creator>Jane</dc:creator>
  </head>
  <body>
    <outline text="CNET News.com" type="rss" xmlUrl="http://news.com.com/2547-1_3-0-5.xml"/>
    <outline text="Tech">
      <outline text="Slashdot" type="rss" xmlUrl="http://rss.slashdot.org/Slashdot/slashdot"/>
    </outline>
  </body>
</opml>"#;

    #[test]
    fn test_parse_subscription_list() {
        let document = OpmlDocument::parse(SUBSCRIPTIONS).unwrap();
        assert_eq!(document.head().title(), Some("mySubscriptions"));
        assert_eq!(document.outlines().len(), 2);
        assert_eq!(document.outlines()[1].outlines()[0].text(), "Slashdot");
        assert_eq!(
            document.outlines()[0].attribute("xmlUrl"),
            Some("http://news.com.com/2547-1_3-0-5.xml")
        );

        let dc = document.head().extensions().get::<DublinCoreExtension>().unwrap();
        assert_eq!(dc.creator.as_deref(), Some("Jane"));
    }

    #[test]
    fn test_saves_version_two() {
        let document = OpmlDocument::parse(SUBSCRIPTIONS).unwrap();
        let xml = document.to_xml_with(&SaveOptions::compact()).unwrap();
        assert!(xml.starts_with(r#"<opml xmlns:dc="http://purl.org/dc/elements/1.1/" version="2.0">"#));
        assert!(xml.contains("<dc:creator>Jane</dc:creator>"));
    }

    #[test]
    fn test_resave_is_idempotent() {
        let first = OpmlDocument::parse(SUBSCRIPTIONS).unwrap().to_xml().unwrap();
        let second = OpmlDocument::parse(&first).unwrap().to_xml().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_document_writes_head_and_body() {
        let xml = OpmlDocument::new()
            .to_xml_with(&SaveOptions::compact().with_declaration(false))
            .unwrap();
        assert_eq!(xml, r#"<opml version="2.0"><head/><body/></opml>"#);
    }

    #[test]
    fn test_nothing_recognized() {
        let mut document = OpmlDocument::new();
        let found = document
            .load_str(r#"<opml><body><outline/></body></opml>"#, &LoadOptions::default())
            .unwrap();
        assert!(!found);
        assert_eq!(document, OpmlDocument::new());
    }
}
