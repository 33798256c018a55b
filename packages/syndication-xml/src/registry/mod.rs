//! Extension registry system for namespace-identified XML extensions.
//!
//! Extensions are registered per namespace URI. During load, the adapter
//! resolves each foreign namespace on a host element to an extension and
//! attaches it to the entity's extension list.

mod adapter;
mod config;
mod core;
mod extension;
pub mod handlers;
mod list;

pub use adapter::ExtensionAdapter;
pub use config::{create_default_registry, default_registry};
pub use core::{ExtensionDescriptor, ExtensionFactory, ExtensionRegistry};
pub use extension::SyndicationExtension;
pub use handlers::{CreativeCommonsExtension, DublinCoreExtension, OpaqueExtension};
pub use list::ExtensionList;
