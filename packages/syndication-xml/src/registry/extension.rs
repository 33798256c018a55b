//! Extension trait definition.

use std::cmp::Ordering;
use std::fmt::Debug;

use crate::compare::extension_fragment;
use crate::entity::AsAny;
use crate::error::Result;
use crate::xml::{XmlElement, XmlWriter};

/// Trait for namespace-identified extensions attached to an entity.
///
/// An extension owns everything in its namespace on the host element: the
/// namespaced attributes of the host and its namespaced child elements. It
/// never sees or writes content in other namespaces.
pub trait SyndicationExtension: AsAny + Debug + Send + Sync {
    /// Namespace URI identifying the extension.
    fn namespace(&self) -> &str;

    /// Preferred prefix for the namespace.
    fn prefix(&self) -> &str;

    /// Human-readable name.
    ///
    /// Default implementation returns the prefix.
    fn name(&self) -> &str {
        self.prefix()
    }

    /// Check if the host element carries content for this extension.
    ///
    /// Default implementation looks for any attribute or child element in
    /// the extension namespace.
    fn matches(&self, source: &XmlElement) -> bool {
        source.has_namespace_content(self.namespace())
    }

    /// Load extension data from the host element.
    ///
    /// Returns `true` when any data was found.
    fn load(&mut self, source: &XmlElement) -> bool;

    /// Write namespaced attributes onto the host's open start tag.
    ///
    /// Default implementation writes nothing.
    fn write_attributes(&self, _writer: &mut XmlWriter<'_>) -> Result<()> {
        Ok(())
    }

    /// Write namespaced child elements after the host's own children.
    fn write_elements(&self, writer: &mut XmlWriter<'_>) -> Result<()>;

    /// Compare content with another extension of the same namespace.
    ///
    /// Default implementation compares the serialized content.
    fn compare_content(&self, other: &dyn SyndicationExtension) -> Ordering {
        extension_fragment(self).cmp(&extension_fragment(other))
    }

    /// Clone into a new box.
    fn clone_box(&self) -> Box<dyn SyndicationExtension>;
}

impl Clone for Box<dyn SyndicationExtension> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}
