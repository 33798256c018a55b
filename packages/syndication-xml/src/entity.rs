//! Load/save contract shared by every document and sub-entity.

use std::any::Any;
use std::fmt::Debug;

use crate::error::Result;
use crate::options::LoadOptions;
use crate::registry::{ExtensionAdapter, ExtensionList, SyndicationExtension};
use crate::xml::{XmlElement, XmlWriter};

/// Access to the concrete type behind a trait object.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// An entity carrying namespace-identified extensions.
pub trait Extensible {
    fn extensions(&self) -> &ExtensionList;

    fn extensions_mut(&mut self) -> &mut ExtensionList;

    /// Whether at least one extension is attached.
    fn has_extensions(&self) -> bool {
        !self.extensions().is_empty()
    }

    /// Attach an extension.
    ///
    /// Returns `false` and leaves the list unchanged when an extension for the
    /// same namespace is already attached.
    fn add_extension(&mut self, extension: Box<dyn SyndicationExtension>) -> bool {
        self.extensions_mut().add(extension)
    }

    /// Detach the extension for `namespace`.
    fn remove_extension(&mut self, namespace: &str) -> Option<Box<dyn SyndicationExtension>> {
        self.extensions_mut().remove(namespace)
    }

    /// First extension, in insertion order, matching `predicate`.
    fn find_extension(
        &self,
        predicate: &dyn Fn(&dyn SyndicationExtension) -> bool,
    ) -> Option<&dyn SyndicationExtension> {
        self.extensions().find(predicate)
    }
}

/// Trait implemented by every loadable and writable entity.
///
/// Implementors provide [`load_fields`](Self::load_fields) for their fixed
/// schema and [`write_to`](Self::write_to) for serialization. Extension
/// handling is layered on top by the provided methods.
pub trait SyndicationEntity: Extensible + AsAny + Debug {
    /// Fill fixed-schema fields and children from `source`.
    ///
    /// `options` is forwarded to children so that nested entities load their
    /// extensions too. Returns `true` when any data was found.
    fn load_fields(&mut self, source: &XmlElement, options: Option<&LoadOptions>) -> bool;

    /// Write the entity as an element.
    ///
    /// # Errors
    /// Returns `XmlWrite` when the writer rejects an event.
    fn write_to(&self, writer: &mut XmlWriter<'_>) -> Result<()>;

    /// Load fixed-schema data only.
    fn load(&mut self, source: &XmlElement) -> bool {
        self.load_fields(source, None)
    }

    /// Load fixed-schema data, then extensions according to `options`.
    fn load_with_options(&mut self, source: &XmlElement, options: &LoadOptions) -> bool {
        let found = self.load_fields(source, Some(options));
        let extended = ExtensionAdapter::new(source, options).fill(self.extensions_mut());
        found || extended
    }

    /// Visit the extensions of this entity and of every nested entity.
    fn visit_extensions(&self, visitor: &mut dyn FnMut(&dyn SyndicationExtension)) {
        for extension in self.extensions().iter() {
            visitor(extension);
        }
    }

    /// Short type name used in diagnostics.
    fn entity_name(&self) -> &'static str {
        let full = std::any::type_name::<Self>();
        full.rsplit("::").next().unwrap_or(full)
    }
}

/// Load a child entity, forwarding `options` when present.
pub(crate) fn load_child<E: SyndicationEntity>(
    child: &mut E,
    source: &XmlElement,
    options: Option<&LoadOptions>,
) -> bool {
    match options {
        Some(options) => child.load_with_options(source, options),
        None => child.load(source),
    }
}

/// Load every matching element into a fresh entity, keeping those that
/// reported data.
pub(crate) fn load_children<'a, E: SyndicationEntity + Default>(
    sources: impl Iterator<Item = &'a XmlElement>,
    options: Option<&LoadOptions>,
) -> Vec<E> {
    sources
        .filter_map(|source| {
            let mut child = E::default();
            load_child(&mut child, source, options).then_some(child)
        })
        .collect()
}
