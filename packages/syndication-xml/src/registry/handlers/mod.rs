//! Built-in extensions.

mod creative_commons;
mod dublin_core;
mod opaque;

pub use creative_commons::CreativeCommonsExtension;
pub use dublin_core::DublinCoreExtension;
pub use opaque::OpaqueExtension;
