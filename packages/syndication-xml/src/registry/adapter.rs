//! Binds a source element and load options to an entity's extension list.

use super::config::default_registry;
use super::extension::SyndicationExtension;
use super::handlers::OpaqueExtension;
use super::list::ExtensionList;
use crate::options::LoadOptions;
use crate::xml::XmlElement;

/// Fallback prefix for captured namespaces that were declared as default.
const FALLBACK_PREFIX: &str = "ext";

/// Fills extension lists from a host element.
pub struct ExtensionAdapter<'a> {
    source: &'a XmlElement,
    options: &'a LoadOptions,
}

impl<'a> ExtensionAdapter<'a> {
    /// Create an adapter for `source`.
    #[must_use]
    pub fn new(source: &'a XmlElement, options: &'a LoadOptions) -> Self {
        Self { source, options }
    }

    /// Distinct extension namespaces on the host, in document order.
    ///
    /// The host's own namespace and ignored namespaces are skipped.
    #[must_use]
    pub fn namespaces(&self) -> Vec<&'a str> {
        let own = self.source.namespace();
        let attributes = self
            .source
            .attributes()
            .iter()
            .filter_map(|a| a.name.namespace());
        let children = self.source.children().filter_map(XmlElement::namespace);

        let mut namespaces: Vec<&'a str> = Vec::new();
        for namespace in attributes.chain(children) {
            if Some(namespace) == own || namespaces.contains(&namespace) || self.is_ignored(namespace) {
                continue;
            }
            namespaces.push(namespace);
        }
        namespaces
    }

    /// Load every resolvable extension into `list`.
    ///
    /// Returns `true` when at least one extension was added.
    pub fn fill(&self, list: &mut ExtensionList) -> bool {
        let mut found = false;
        for namespace in self.namespaces() {
            if list.contains(namespace) {
                continue;
            }
            let Some(mut extension) = self.resolve(namespace) else {
                tracing::trace!(namespace, "No extension for namespace, skipping");
                continue;
            };
            if !extension.matches(self.source) || !extension.load(self.source) {
                tracing::debug!(namespace, "Extension failed to load, skipping");
                continue;
            }
            found |= list.add(extension);
        }
        found
    }

    fn resolve(&self, namespace: &str) -> Option<Box<dyn SyndicationExtension>> {
        if let Some(extension) = self.options.supported_extensions.create(namespace) {
            return Some(extension);
        }
        if self.options.auto_detect_extensions {
            if let Some(extension) = default_registry().create(namespace) {
                return Some(extension);
            }
        }
        if self.options.preserve_unknown_extensions {
            return Some(Box::new(OpaqueExtension::new(namespace, self.prefix_hint(namespace))));
        }
        None
    }

    fn is_ignored(&self, namespace: &str) -> bool {
        self.options.supported_extensions.is_ignored(namespace)
            || default_registry().is_ignored(namespace)
    }

    /// Prefix used for `namespace` in the source, if any.
    fn prefix_hint(&self, namespace: &str) -> String {
        let attributes = self.source.attributes().iter().map(|a| &a.name);
        let children = self.source.children().map(XmlElement::name);
        attributes
            .chain(children)
            .filter(|name| name.namespace() == Some(namespace))
            .find_map(|name| name.prefix.clone().filter(|p| !p.is_empty()))
            .unwrap_or_else(|| FALLBACK_PREFIX.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DUBLIN_CORE_NAMESPACE;
    use crate::registry::DublinCoreExtension;
    use crate::xml::parse_str;

    const HOST: &str = r#"<outline xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:z="urn:z"
        xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"
        text="x" z:flag="1" xsi:type="t"><dc:creator>Ann</dc:creator></outline>"#;

    #[test]
    fn test_namespaces_in_document_order() {
        let source = parse_str(HOST).unwrap();
        let options = LoadOptions::default();
        let adapter = ExtensionAdapter::new(&source, &options);
        assert_eq!(adapter.namespaces(), vec!["urn:z", DUBLIN_CORE_NAMESPACE]);
    }

    #[test]
    fn test_fill_uses_default_registry() {
        let source = parse_str(HOST).unwrap();
        let options = LoadOptions::default();
        let mut list = ExtensionList::new();

        assert!(ExtensionAdapter::new(&source, &options).fill(&mut list));
        assert_eq!(list.len(), 1);
        assert!(list.get::<DublinCoreExtension>().is_some());
    }

    #[test]
    fn test_fill_without_auto_detect_finds_nothing() {
        let source = parse_str(HOST).unwrap();
        let options = LoadOptions::default().with_auto_detect_extensions(false);
        let mut list = ExtensionList::new();

        assert!(!ExtensionAdapter::new(&source, &options).fill(&mut list));
        assert!(list.is_empty());
    }

    #[test]
    fn test_fill_supported_extension_without_auto_detect() {
        let source = parse_str(HOST).unwrap();
        let options = LoadOptions::default()
            .with_auto_detect_extensions(false)
            .with_extension::<DublinCoreExtension>();
        let mut list = ExtensionList::new();

        assert!(ExtensionAdapter::new(&source, &options).fill(&mut list));
        assert_eq!(list.namespaces(), vec![DUBLIN_CORE_NAMESPACE]);
    }

    #[test]
    fn test_fill_preserves_unknown() {
        let source = parse_str(HOST).unwrap();
        let options = LoadOptions::default().with_preserve_unknown_extensions(true);
        let mut list = ExtensionList::new();

        ExtensionAdapter::new(&source, &options).fill(&mut list);
        let opaque = list.get::<OpaqueExtension>().unwrap();
        assert_eq!(opaque.namespace(), "urn:z");
        assert_eq!(opaque.prefix(), "z");
    }
}
