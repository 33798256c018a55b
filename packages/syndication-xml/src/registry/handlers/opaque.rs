//! Verbatim capture of namespaces without a registered extension.

use crate::error::Result;
use crate::registry::SyndicationExtension;
use crate::xml::{XmlAttribute, XmlElement, XmlWriter};

/// Attributes and elements of one namespace, kept as read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpaqueExtension {
    namespace: String,
    prefix: String,
    attributes: Vec<XmlAttribute>,
    elements: Vec<XmlElement>,
}

impl OpaqueExtension {
    /// Create an empty capture for `namespace`.
    #[must_use]
    pub fn new(namespace: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            prefix: prefix.into(),
            attributes: Vec::new(),
            elements: Vec::new(),
        }
    }

    /// Captured host attributes in the namespace.
    #[must_use]
    pub fn attributes(&self) -> &[XmlAttribute] {
        &self.attributes
    }

    /// Captured child elements in the namespace.
    #[must_use]
    pub fn elements(&self) -> &[XmlElement] {
        &self.elements
    }
}

impl SyndicationExtension for OpaqueExtension {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn prefix(&self) -> &str {
        &self.prefix
    }

    fn load(&mut self, source: &XmlElement) -> bool {
        let namespace = Some(self.namespace.as_str());
        self.attributes.extend(
            source
                .attributes()
                .iter()
                .filter(|a| a.name.namespace() == namespace)
                .cloned(),
        );
        self.elements.extend(
            source
                .children()
                .filter(|c| c.namespace() == namespace)
                .cloned(),
        );
        !self.attributes.is_empty() || !self.elements.is_empty()
    }

    fn write_attributes(&self, writer: &mut XmlWriter<'_>) -> Result<()> {
        for attribute in &self.attributes {
            writer.attribute_ns(&self.prefix, &attribute.name.local, &self.namespace, &attribute.value)?;
        }
        Ok(())
    }

    fn write_elements(&self, writer: &mut XmlWriter<'_>) -> Result<()> {
        for element in &self.elements {
            writer.write_tree(element)?;
        }
        Ok(())
    }

    fn clone_box(&self) -> Box<dyn SyndicationExtension> {
        Box::new(self.clone())
    }
}
