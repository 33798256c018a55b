//! Ordered per-entity extension list.

use super::extension::SyndicationExtension;
use crate::error::Result;
use crate::xml::XmlWriter;

/// Extensions attached to one entity, at most one per namespace.
///
/// Insertion order is kept and used when writing.
#[derive(Debug, Clone, Default)]
pub struct ExtensionList {
    items: Vec<Box<dyn SyndicationExtension>>,
}

impl ExtensionList {
    /// Create a new empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an extension unless its namespace is already present.
    pub fn add(&mut self, extension: Box<dyn SyndicationExtension>) -> bool {
        if self.contains(extension.namespace()) {
            tracing::debug!(
                namespace = extension.namespace(),
                "Extension namespace already attached, ignoring"
            );
            return false;
        }
        self.items.push(extension);
        true
    }

    /// Remove the extension for `namespace`.
    pub fn remove(&mut self, namespace: &str) -> Option<Box<dyn SyndicationExtension>> {
        let index = self
            .items
            .iter()
            .position(|e| e.namespace() == namespace)?;
        Some(self.items.remove(index))
    }

    /// Check if an extension for `namespace` is attached.
    #[must_use]
    pub fn contains(&self, namespace: &str) -> bool {
        self.items.iter().any(|e| e.namespace() == namespace)
    }

    /// Get the extension for `namespace`.
    #[must_use]
    pub fn by_namespace(&self, namespace: &str) -> Option<&dyn SyndicationExtension> {
        self.find(&|e| e.namespace() == namespace)
    }

    /// First extension matching `predicate`, in insertion order.
    #[must_use]
    pub fn find(
        &self,
        predicate: &dyn Fn(&dyn SyndicationExtension) -> bool,
    ) -> Option<&dyn SyndicationExtension> {
        self.items
            .iter()
            .map(|e| &**e)
            .find(|e| predicate(*e))
    }

    /// Get the first extension of type `T`.
    ///
    /// # Examples
    /// ```
    /// use syndication_xml::registry::{DublinCoreExtension, ExtensionList};
    ///
    /// let mut list = ExtensionList::new();
    /// let mut dc = DublinCoreExtension::default();
    /// dc.creator = Some("Ann".to_string());
    /// list.add(Box::new(dc));
    ///
    /// let found = list.get::<DublinCoreExtension>().unwrap();
    /// assert_eq!(found.creator.as_deref(), Some("Ann"));
    /// ```
    #[must_use]
    pub fn get<T: SyndicationExtension>(&self) -> Option<&T> {
        self.items
            .iter()
            .find_map(|e| (**e).as_any().downcast_ref::<T>())
    }

    /// Get the first extension of type `T` mutably.
    pub fn get_mut<T: SyndicationExtension>(&mut self) -> Option<&mut T> {
        self.items
            .iter_mut()
            .find_map(|e| (**e).as_any_mut().downcast_mut::<T>())
    }

    /// Extensions in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn SyndicationExtension> {
        self.items.iter().map(|e| &**e)
    }

    /// Namespace URIs of the attached extensions, sorted.
    #[must_use]
    pub fn namespaces(&self) -> Vec<&str> {
        let mut namespaces: Vec<&str> = self.items.iter().map(|e| e.namespace()).collect();
        namespaces.sort_unstable();
        namespaces
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Write the attribute phase of every extension.
    pub fn write_attributes(&self, writer: &mut XmlWriter<'_>) -> Result<()> {
        for extension in &self.items {
            extension.write_attributes(writer)?;
        }
        Ok(())
    }

    /// Write the element phase of every extension.
    pub fn write_elements(&self, writer: &mut XmlWriter<'_>) -> Result<()> {
        for extension in &self.items {
            extension.write_elements(writer)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{CreativeCommonsExtension, DublinCoreExtension};

    #[test]
    fn test_add_rejects_duplicate_namespace() {
        let mut list = ExtensionList::new();
        assert!(list.add(Box::new(DublinCoreExtension::default())));
        assert!(!list.add(Box::new(DublinCoreExtension::default())));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_find_returns_first_in_insertion_order() {
        let mut list = ExtensionList::new();
        list.add(Box::new(CreativeCommonsExtension::default()));
        list.add(Box::new(DublinCoreExtension::default()));

        let first = list.find(&|_| true).unwrap();
        assert_eq!(first.prefix(), "creativeCommons");
        assert!(list.find(&|e| e.namespace() == "urn:none").is_none());
    }

    #[test]
    fn test_remove_and_typed_lookup() {
        let mut list = ExtensionList::new();
        list.add(Box::new(DublinCoreExtension::default()));
        assert!(list.get::<DublinCoreExtension>().is_some());
        assert!(list.get::<CreativeCommonsExtension>().is_none());

        let removed = list.remove(crate::config::DUBLIN_CORE_NAMESPACE);
        assert!(removed.is_some());
        assert!(list.is_empty());
    }

    #[test]
    fn test_namespaces_sorted() {
        let mut list = ExtensionList::new();
        list.add(Box::new(DublinCoreExtension::default()));
        list.add(Box::new(CreativeCommonsExtension::default()));
        assert_eq!(
            list.namespaces(),
            vec![
                crate::config::CREATIVE_COMMONS_NAMESPACE,
                crate::config::DUBLIN_CORE_NAMESPACE
            ]
        );
    }
}
