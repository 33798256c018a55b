//! BlogML 2.0 blog archive object model.
//!
//! Dates are written as RFC 3339. Text constructs are written as CDATA
//! sections carrying a `type` attribute.

mod attachment;
mod author;
mod category;
mod comment;
mod common;
mod document;
mod post;
mod text;
mod trackback;

pub use attachment::BlogMlAttachment;
pub use author::BlogMlAuthor;
pub use category::BlogMlCategory;
pub use comment::BlogMlComment;
pub use common::BlogMlCommon;
pub use document::BlogMlDocument;
pub use post::{BlogMlPost, BlogMlPostType};
pub use text::{BlogMlContentType, BlogMlTextConstruct};
pub use trackback::BlogMlTrackback;
