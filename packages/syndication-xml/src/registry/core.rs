//! Extension registry for mapping namespaces to extension factories.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use super::extension::SyndicationExtension;

/// Factory creating an empty extension instance.
pub type ExtensionFactory = Arc<dyn Fn() -> Box<dyn SyndicationExtension> + Send + Sync>;

/// Registered extension: preferred prefix and factory.
#[derive(Clone)]
pub struct ExtensionDescriptor {
    pub prefix: String,
    factory: ExtensionFactory,
}

impl ExtensionDescriptor {
    /// Create a fresh extension instance.
    #[must_use]
    pub fn create(&self) -> Box<dyn SyndicationExtension> {
        (self.factory)()
    }
}

impl fmt::Debug for ExtensionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtensionDescriptor")
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}

/// Registry mapping namespace URIs to extension factories.
///
/// The registry allows registering extensions for specific namespaces,
/// as well as marking namespaces to be ignored entirely.
#[derive(Debug, Clone, Default)]
pub struct ExtensionRegistry {
    extensions: HashMap<String, ExtensionDescriptor>,
    ignored: HashSet<String>,
}

impl ExtensionRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory for a namespace, replacing any previous one.
    pub fn register(
        &mut self,
        namespace: impl Into<String>,
        prefix: impl Into<String>,
        factory: impl Fn() -> Box<dyn SyndicationExtension> + Send + Sync + 'static,
    ) {
        self.extensions.insert(
            namespace.into(),
            ExtensionDescriptor {
                prefix: prefix.into(),
                factory: Arc::new(factory),
            },
        );
    }

    /// Register an extension type under the namespace its default instance reports.
    pub fn register_default<E: SyndicationExtension + Default>(&mut self) {
        let sample = E::default();
        self.register(sample.namespace(), sample.prefix(), || {
            Box::new(E::default()) as Box<dyn SyndicationExtension>
        });
    }

    /// Mark namespaces as ignored (never treated as extensions).
    pub fn ignore(&mut self, namespaces: impl IntoIterator<Item = impl Into<String>>) {
        for namespace in namespaces {
            self.ignored.insert(namespace.into());
        }
    }

    /// Get the descriptor registered for a namespace.
    ///
    /// Returns `None` if the namespace is ignored or has no extension.
    #[must_use]
    pub fn get(&self, namespace: &str) -> Option<&ExtensionDescriptor> {
        if self.ignored.contains(namespace) {
            return None;
        }
        self.extensions.get(namespace)
    }

    /// Create an extension instance for a namespace.
    #[must_use]
    pub fn create(&self, namespace: &str) -> Option<Box<dyn SyndicationExtension>> {
        self.get(namespace).map(ExtensionDescriptor::create)
    }

    /// Check if a namespace should be ignored.
    #[must_use]
    pub fn is_ignored(&self, namespace: &str) -> bool {
        self.ignored.contains(namespace)
    }

    /// Check if an extension is registered for a namespace.
    #[must_use]
    pub fn has_extension(&self, namespace: &str) -> bool {
        self.extensions.contains_key(namespace)
    }

    /// Return set of all registered namespaces.
    #[must_use]
    pub fn registered_namespaces(&self) -> HashSet<&str> {
        self.extensions.keys().map(String::as_str).collect()
    }

    /// Return set of all ignored namespaces.
    #[must_use]
    pub fn ignored_namespaces(&self) -> HashSet<&str> {
        self.ignored.iter().map(String::as_str).collect()
    }

    /// Registered `(prefix, namespace)` pairs sorted by namespace.
    #[must_use]
    pub fn declarations(&self) -> Vec<(&str, &str)> {
        let mut pairs: Vec<(&str, &str)> = self
            .extensions
            .iter()
            .map(|(namespace, descriptor)| (descriptor.prefix.as_str(), namespace.as_str()))
            .collect();
        pairs.sort_by(|a, b| a.1.cmp(b.1));
        pairs
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{DublinCoreExtension, OpaqueExtension};

    #[test]
    fn test_registry_register_and_create() {
        let mut registry = ExtensionRegistry::new();
        registry.register("urn:test", "t", || {
            Box::new(OpaqueExtension::new("urn:test", "t")) as Box<dyn SyndicationExtension>
        });

        let extension = registry.create("urn:test").unwrap();
        assert_eq!(extension.namespace(), "urn:test");
        assert!(registry.create("urn:missing").is_none());
    }

    #[test]
    fn test_registry_ignore() {
        let mut registry = ExtensionRegistry::new();
        registry.register_default::<DublinCoreExtension>();
        registry.ignore([crate::config::DUBLIN_CORE_NAMESPACE]);

        assert!(registry.is_ignored(crate::config::DUBLIN_CORE_NAMESPACE));
        assert!(registry.has_extension(crate::config::DUBLIN_CORE_NAMESPACE));
        assert!(registry.get(crate::config::DUBLIN_CORE_NAMESPACE).is_none());
    }

    #[test]
    fn test_registry_declarations() {
        let mut registry = ExtensionRegistry::new();
        registry.register_default::<DublinCoreExtension>();
        assert_eq!(
            registry.declarations(),
            vec![("dc", crate::config::DUBLIN_CORE_NAMESPACE)]
        );
        assert_eq!(registry.registered_namespaces().len(), 1);
    }
}
