//! Default extension registry configuration.

use std::sync::LazyLock;

use super::core::ExtensionRegistry;
use super::handlers::{CreativeCommonsExtension, DublinCoreExtension};
use crate::config::{XML_NAMESPACE, XMLNS_NAMESPACE, XSI_NAMESPACE};

static DEFAULT_REGISTRY: LazyLock<ExtensionRegistry> = LazyLock::new(create_default_registry);

/// Create a registry with the built-in extensions.
///
/// Dublin Core and Creative Commons are registered. The XML, XMLNS and
/// XML Schema instance namespaces are structural and never treated as
/// extensions.
#[must_use]
pub fn create_default_registry() -> ExtensionRegistry {
    let mut registry = ExtensionRegistry::new();

    registry.register_default::<DublinCoreExtension>();
    registry.register_default::<CreativeCommonsExtension>();

    registry.ignore([XML_NAMESPACE, XMLNS_NAMESPACE, XSI_NAMESPACE]);

    registry
}

/// Shared registry consulted when extension auto-detection is on.
#[must_use]
pub fn default_registry() -> &'static ExtensionRegistry {
    &DEFAULT_REGISTRY
}
