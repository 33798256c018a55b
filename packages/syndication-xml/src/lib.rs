//! syndication-xml - object models for OPML, RSD and BlogML documents.
//!
//! Every format is built on one load/save pipeline: entities read their fixed
//! schema from a parsed element tree, namespaced content outside that schema
//! is handed to registered extensions, and writers emit the entity back with
//! its extensions in place.
//!
//! # Example
//!
//! ```
//! use syndication_xml::opml::OpmlDocument;
//! use syndication_xml::{SyndicationDocument, SyndicationFormat, SyndicationResource};
//!
//! let xml = r#"<opml version="2.0">
//!   <head><title>Feeds</title></head>
//!   <body><outline text="Example" type="rss" xmlUrl="https://example.com/rss"/></body>
//! </opml>"#;
//!
//! let document = OpmlDocument::parse(xml).unwrap();
//! assert_eq!(document.head().title(), Some("Feeds"));
//! assert_eq!(document.outlines()[0].attribute("xmlUrl"), Some("https://example.com/rss"));
//!
//! let resource = SyndicationResource::parse(xml).unwrap();
//! assert_eq!(resource.format(), SyndicationFormat::Opml);
//! ```
//!
//! # Architecture
//!
//! - [`xml`]: element tree, reader and namespace-aware writer
//! - [`entity`]: the load/write contract shared by all entities
//! - [`registry`]: extension trait, registry and built-in extensions
//! - [`compare`]: structural comparison and fingerprints
//! - [`document`]: document-level load and save entry points
//! - [`opml`], [`rsd`], [`blogml`]: format object models
//! - [`http`]: document fetching
//! - [`config`], [`options`]: constants and load/save options
//! - [`cli`]: command-line interface

pub mod attributes;
pub mod blogml;
pub mod cli;
pub mod compare;
pub mod config;
pub mod document;
pub mod entity;
pub mod error;
pub mod http;
pub mod opml;
pub mod options;
pub mod registry;
pub mod rsd;
pub mod values;
pub mod xml;

// Re-export commonly used items
pub use attributes::AttributeMap;
pub use compare::{compare_entity, fingerprint};
pub use document::{
    DocumentLoaded, DocumentSource, LoadListener, SyndicationDocument, SyndicationFormat,
    SyndicationResource,
};
pub use entity::{Extensible, SyndicationEntity};
pub use error::{Result, SyndicationError};
pub use http::{CancellationHandle, FetchRequest};
pub use options::{LoadOptions, SaveOptions};
pub use registry::{ExtensionRegistry, SyndicationExtension};
