//! Outline Processor Markup Language (OPML) 2.0 object model.
//!
//! - [`OpmlDocument`]: root with head, body outlines and extensions
//! - [`OpmlHead`]: document metadata, owning [`OpmlOwner`] and [`OpmlWindow`]
//! - [`OpmlOutline`]: recursive outline tree with pass-through attributes

mod document;
mod head;
mod outline;
mod owner;
mod window;

pub use document::OpmlDocument;
pub use head::OpmlHead;
pub use outline::OpmlOutline;
pub use owner::OpmlOwner;
pub use window::OpmlWindow;
