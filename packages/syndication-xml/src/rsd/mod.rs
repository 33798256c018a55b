//! Really Simple Discovery (RSD) 1.0 object model.

mod document;
mod interface;

pub use document::RsdDocument;
pub use interface::RsdApplicationInterface;
