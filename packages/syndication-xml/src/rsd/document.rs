//! RSD root document.

use std::cmp::Ordering;

use url::Url;

use super::interface::RsdApplicationInterface;
use crate::compare::{compare_entities, compare_extensions, compare_optional_text, impl_structural_ord};
use crate::config::RSD_NAMESPACE;
use crate::document::{LoadListeners, SyndicationDocument, SyndicationFormat};
use crate::entity::{load_children, Extensible, SyndicationEntity};
use crate::error::Result;
use crate::options::LoadOptions;
use crate::registry::{ExtensionList, SyndicationExtension};
use crate::values::{normalize, parse_url};
use crate::xml::{find_child, find_children, get_text, XmlElement, XmlWriter};

/// A Really Simple Discovery document describing a blog engine and its APIs.
///
/// Saved documents always use the RSD default namespace and version 1.0.
#[derive(Debug, Clone, Default)]
pub struct RsdDocument {
    engine_name: Option<String>,
    engine_link: Option<Url>,
    homepage_link: Option<Url>,
    interfaces: Vec<RsdApplicationInterface>,
    extensions: ExtensionList,
    listeners: LoadListeners,
}

impl RsdDocument {
    /// Create a new empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn engine_name(&self) -> Option<&str> {
        self.engine_name.as_deref()
    }

    /// Set the engine name. Empty input clears it.
    pub fn set_engine_name(&mut self, name: &str) {
        self.engine_name = normalize(name);
    }

    #[must_use]
    pub fn engine_link(&self) -> Option<&Url> {
        self.engine_link.as_ref()
    }

    pub fn set_engine_link(&mut self, link: Option<Url>) {
        self.engine_link = link;
    }

    #[must_use]
    pub fn homepage_link(&self) -> Option<&Url> {
        self.homepage_link.as_ref()
    }

    pub fn set_homepage_link(&mut self, link: Option<Url>) {
        self.homepage_link = link;
    }

    #[must_use]
    pub fn interfaces(&self) -> &[RsdApplicationInterface] {
        &self.interfaces
    }

    pub fn interfaces_mut(&mut self) -> &mut Vec<RsdApplicationInterface> {
        &mut self.interfaces
    }

    pub fn add_interface(&mut self, interface: RsdApplicationInterface) {
        self.interfaces.push(interface);
    }

    /// First interface marked as preferred.
    ///
    /// # Examples
    /// ```
    /// use syndication_xml::rsd::{RsdApplicationInterface, RsdDocument};
    ///
    /// let mut document = RsdDocument::new();
    /// document.add_interface(RsdApplicationInterface::new("Blogger").unwrap());
    /// assert!(document.preferred_interface().is_none());
    ///
    /// let mut preferred = RsdApplicationInterface::new("MetaWeblog").unwrap();
    /// preferred.set_preferred(true);
    /// document.add_interface(preferred);
    /// assert_eq!(document.preferred_interface().unwrap().name(), "MetaWeblog");
    /// ```
    #[must_use]
    pub fn preferred_interface(&self) -> Option<&RsdApplicationInterface> {
        self.interfaces.iter().find(|i| i.is_preferred())
    }

    /// Structural comparison; load listeners are ignored.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Ordering {
        compare_optional_text(self.engine_name(), other.engine_name())
            .then_with(|| {
                compare_optional_text(
                    self.engine_link.as_ref().map(Url::as_str),
                    other.engine_link.as_ref().map(Url::as_str),
                )
            })
            .then_with(|| {
                compare_optional_text(
                    self.homepage_link.as_ref().map(Url::as_str),
                    other.homepage_link.as_ref().map(Url::as_str),
                )
            })
            .then_with(|| compare_entities(&self.interfaces, &other.interfaces))
            .then_with(|| compare_extensions(&self.extensions, &other.extensions))
    }

    fn load_service(&mut self, service: &XmlElement, options: Option<&LoadOptions>) -> bool {
        let namespace = service.namespace();
        let mut found = false;

        if let Some(name) = find_child(service, "engineName", namespace).and_then(|e| normalize(&get_text(e))) {
            self.engine_name = Some(name);
            found = true;
        }
        if let Some(link) = find_child(service, "engineLink", namespace).and_then(|e| parse_url(&get_text(e))) {
            self.engine_link = Some(link);
            found = true;
        }
        if let Some(link) = find_child(service, "homePageLink", namespace).and_then(|e| parse_url(&get_text(e))) {
            self.homepage_link = Some(link);
            found = true;
        }
        if let Some(apis) = find_child(service, "apis", namespace) {
            let interfaces: Vec<RsdApplicationInterface> =
                load_children(find_children(apis, "api", namespace), options);
            found |= !interfaces.is_empty();
            self.interfaces.extend(interfaces);
        }
        found
    }
}

impl_structural_ord!(RsdDocument);

impl Extensible for RsdDocument {
    fn extensions(&self) -> &ExtensionList {
        &self.extensions
    }

    fn extensions_mut(&mut self) -> &mut ExtensionList {
        &mut self.extensions
    }
}

impl SyndicationEntity for RsdDocument {
    fn load_fields(&mut self, source: &XmlElement, options: Option<&LoadOptions>) -> bool {
        match find_child(source, "service", source.namespace()) {
            Some(service) => self.load_service(service, options),
            None => false,
        }
    }

    fn write_to(&self, writer: &mut XmlWriter<'_>) -> Result<()> {
        writer.start_element_ns(None, Self::FORMAT.root_name(), RSD_NAMESPACE)?;
        writer.attribute("version", self.version())?;
        self.extensions.write_attributes(writer)?;

        writer.start_element_ns(None, "service", RSD_NAMESPACE)?;
        if let Some(name) = &self.engine_name {
            writer.element_text_ns(None, "engineName", RSD_NAMESPACE, name)?;
        }
        if let Some(link) = &self.engine_link {
            writer.element_text_ns(None, "engineLink", RSD_NAMESPACE, link.as_str())?;
        }
        if let Some(link) = &self.homepage_link {
            writer.element_text_ns(None, "homePageLink", RSD_NAMESPACE, link.as_str())?;
        }
        if !self.interfaces.is_empty() {
            writer.start_element_ns(None, "apis", RSD_NAMESPACE)?;
            for interface in &self.interfaces {
                interface.write_to(writer)?;
            }
            writer.end_element()?;
        }
        writer.end_element()?;

        self.extensions.write_elements(writer)?;
        writer.end_element()
    }

    fn visit_extensions(&self, visitor: &mut dyn FnMut(&dyn SyndicationExtension)) {
        for extension in self.extensions.iter() {
            visitor(extension);
        }
        for interface in &self.interfaces {
            interface.visit_extensions(visitor);
        }
    }
}

impl SyndicationDocument for RsdDocument {
    const FORMAT: SyndicationFormat = SyndicationFormat::Rsd;

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
    use pretty_assertions::assert_eq;

    const DISCOVERY: &str = r#"<?xml version="1.0" ?>
<rsd version="1.0" xmlns="http://archipelago.phrasewise.com/rsd">
  <service>
    <engineName>Blog Munging CMS</engineName>
    <engineLink>http://www.blogmunging.com/</engineLink>
    <homePageLink>http://www.userdomain.com/</homePageLink>
    <apis>
      <api name="MetaWeblog" preferred="true" apiLink="http://example.com/xml/rpc/url" blogID="123abc"/>
      <api name="Blogger" preferred="false" apiLink="http://example.com/xml/rpc/url" blogID="123abc"/>
      <api preferred="maybe"/>
    </apis>
  </service>
</rsd>"#;

    #[test]
    fn test_parse_discovery_document() {
        let document = RsdDocument::parse(DISCOVERY).unwrap();
        assert_eq!(document.engine_name(), Some("Blog Munging CMS"));
        assert_eq!(
            document.homepage_link().map(Url::as_str),
            Some("http://www.userdomain.com/")
        );
        assert_eq!(document.interfaces().len(), 2);
        assert_eq!(document.preferred_interface().unwrap().name(), "MetaWeblog");
    }

    #[test]
    fn test_accepts_missing_namespace() {
        let document =
            RsdDocument::parse(r#"<rsd version="0.6"><service><engineName>X</engineName></service></rsd>"#).unwrap();
        assert_eq!(document.engine_name(), Some("X"));
    }

    #[test]
    fn test_writes_default_namespace_once() {
        let mut document = RsdDocument::new();
        document.set_engine_name("Engine");
        document.add_interface(RsdApplicationInterface::new("Atom").unwrap());
        let xml = document.to_xml_with(&SaveOptions::compact()).unwrap();
        assert_eq!(
            xml,
            concat!(
                r#"<rsd xmlns="http://archipelago.phrasewise.com/rsd" version="1.0">"#,
                "<service><engineName>Engine</engineName>",
                r#"<apis><api name="Atom" preferred="false" blogID=""/></apis>"#,
                "</service></rsd>"
            )
        );
    }

    #[test]
    fn test_round_trip() {
        let document = RsdDocument::parse(DISCOVERY).unwrap();
        let reloaded = RsdDocument::parse(&document.to_xml().unwrap()).unwrap();
        assert_eq!(reloaded, document);
    }
}
