//! End-to-end tests for loading and saving the fixture documents.
//!
//! Each fixture is a realistic document of one format, including extension
//! content and malformed values that must be skipped.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;

use syndication_xml::blogml::{BlogMlContentType, BlogMlDocument, BlogMlPostType, BlogMlTextConstruct};
use syndication_xml::opml::OpmlDocument;
use syndication_xml::registry::{CreativeCommonsExtension, DublinCoreExtension, OpaqueExtension};
use syndication_xml::rsd::RsdDocument;
use syndication_xml::{
    compare_entity, fingerprint, DocumentSource, Extensible, LoadOptions, SaveOptions, SyndicationDocument,
    SyndicationError, SyndicationExtension, SyndicationFormat, SyndicationResource,
};

fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Load fixture file content.
fn load_fixture(name: &str) -> String {
    let path = fixture_path(name);
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to load {}: {}", path.display(), e))
}

// =============================================================================
// OPML
// =============================================================================

#[test]
fn test_opml_head() {
    let document = OpmlDocument::parse(&load_fixture("subscriptions.opml")).unwrap();
    let head = document.head();

    assert_eq!(head.title(), Some("Subscriptions"));
    assert_eq!(
        head.created_on(),
        Some(Utc.with_ymd_and_hms(2008, 1, 14, 9, 30, 0).unwrap())
    );
    assert_eq!(
        head.modified_on(),
        Some(Utc.with_ymd_and_hms(2008, 1, 15, 17, 2, 11).unwrap())
    );
    assert_eq!(head.owner().email(), Some("jane@example.com"));
    assert_eq!(head.expansion_state(), &[1, 3]);
    assert_eq!(head.window().bottom, Some(600));
}

#[test]
fn test_opml_outline_tree() {
    let document = OpmlDocument::parse(&load_fixture("subscriptions.opml")).unwrap();
    let outlines = document.outlines();

    assert_eq!(outlines.len(), 4);
    assert_eq!(outlines[0].categories(), &["/tech", "/news"]);
    assert_eq!(outlines[0].outlines().len(), 2);

    let slashdot = &outlines[0].outlines()[0];
    assert_eq!(slashdot.outline_type(), Some("rss"));
    assert_eq!(slashdot.attribute("htmlUrl"), Some("http://slashdot.org/"));
    assert_eq!(
        slashdot.created_on(),
        Some(Utc.with_ymd_and_hms(2008, 1, 2, 12, 0, 0).unwrap())
    );

    assert!(outlines[1].is_comment());
    assert_eq!(outlines[2].outline_type(), Some("include"));
}

#[test]
fn test_opml_first_occurrence_wins() {
    let document = OpmlDocument::parse(&load_fixture("subscriptions.opml")).unwrap();
    let duplicates = &document.outlines()[3];

    assert_eq!(duplicates.text(), "Duplicates");
    assert_eq!(duplicates.attribute("x"), Some("1"));
}

#[test]
fn test_opml_extensions_do_not_leak_into_schema_fields() {
    let document = OpmlDocument::parse(&load_fixture("subscriptions.opml")).unwrap();
    let head = document.head();

    let dc = head.extensions().get::<DublinCoreExtension>().unwrap();
    assert_eq!(dc.creator.as_deref(), Some("Jane Reader"));
    assert_eq!(dc.title.as_deref(), Some("Not the head title"));
    assert_eq!(head.title(), Some("Subscriptions"));

    let cc = head.extensions().get::<CreativeCommonsExtension>().unwrap();
    assert_eq!(cc.licenses.len(), 1);
    assert_eq!(cc.licenses[0].as_str(), "http://creativecommons.org/licenses/by/2.0/");
}

#[test]
fn test_opml_round_trip_and_idempotent_resave() {
    let document = OpmlDocument::parse(&load_fixture("subscriptions.opml")).unwrap();

    let first = document.to_xml().unwrap();
    let reloaded = OpmlDocument::parse(&first).unwrap();
    assert_eq!(reloaded, document);

    let second = reloaded.to_xml().unwrap();
    assert_eq!(first, second);
    assert!(first.contains(r#"version="2.0""#));
    assert!(first.contains(r#"xmlns:dc="http://purl.org/dc/elements/1.1/""#));
}

#[test]
fn test_opml_unknown_namespaces_dropped_by_default() {
    let document = OpmlDocument::parse(&load_fixture("subscriptions.opml")).unwrap();
    let xml = document.to_xml().unwrap();

    assert!(!xml.contains("app:"));
    assert!(!xml.contains("urn:example:reader"));
}

#[test]
fn test_opml_preserve_unknown_extensions() {
    let options = LoadOptions::default().with_preserve_unknown_extensions(true);
    let mut document = OpmlDocument::new();
    assert!(document
        .load_file(fixture_path("subscriptions.opml"), &options)
        .unwrap());

    let slashdot = &document.outlines()[0].outlines()[0];
    let captured = slashdot.extensions().get::<OpaqueExtension>().unwrap();
    assert_eq!(captured.namespace(), "urn:example:reader");
    assert_eq!(captured.attributes().len(), 1);
    assert_eq!(captured.elements().len(), 1);

    let xml = document.to_xml_with(&SaveOptions::compact()).unwrap();
    assert!(xml.contains(r#"xmlns:app="urn:example:reader""#));
    assert!(xml.contains(r#"app:unread="12""#));
    assert!(xml.contains("<app:note>Read daily</app:note>"));

    let mut reloaded = OpmlDocument::new();
    reloaded.load_str(&xml, &options).unwrap();
    assert_eq!(reloaded.to_xml_with(&SaveOptions::compact()).unwrap(), xml);
}

#[test]
fn test_opml_save_and_open_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.opml");

    let document = OpmlDocument::parse(&load_fixture("subscriptions.opml")).unwrap();
    document.save_file(&path, &SaveOptions::default()).unwrap();

    let reopened = OpmlDocument::open(&path).unwrap();
    assert_eq!(reopened, document);
}

#[test]
fn test_save_in_single_byte_encoding() {
    let mut document = OpmlDocument::new();
    document.head_mut().set_title("Café");

    let options = SaveOptions::compact()
        .with_declaration(true)
        .with_encoding("iso-8859-1")
        .unwrap();
    let mut bytes = Vec::new();
    document.save(&mut bytes, &options).unwrap();

    assert!(bytes.starts_with(br#"<?xml version="1.0" encoding="windows-1252"?>"#));
    assert!(bytes.contains(&0xE9));

    let mut reloaded = OpmlDocument::new();
    reloaded.load_bytes(&bytes, &LoadOptions::default()).unwrap();
    assert_eq!(reloaded.head().title(), Some("Café"));
}

#[test]
fn test_blogml_cdata_survives_single_byte_encoding() {
    let mut blog = BlogMlDocument::new();
    blog.set_title(Some(BlogMlTextConstruct::text("Snowman ☃")));
    blog.set_subtitle(Some(BlogMlTextConstruct::text("Café")));
    blog.set_extended_property("Mood", "line one\nline two").unwrap();
    let mut dc = DublinCoreExtension::new();
    dc.creator = Some("Zoë".to_string());
    blog.add_extension(Box::new(dc));

    let options = SaveOptions::compact()
        .with_declaration(true)
        .with_encoding("iso-8859-1")
        .unwrap();
    let mut bytes = Vec::new();
    blog.save(&mut bytes, &options).unwrap();
    let needle = b"<![CDATA[Snowman";
    assert!(!bytes.windows(needle.len()).any(|w| w == needle));

    let mut reloaded = BlogMlDocument::new();
    reloaded.load_bytes(&bytes, &LoadOptions::default()).unwrap();
    assert_eq!(reloaded.title().map(BlogMlTextConstruct::content), Some("Snowman ☃"));
    assert_eq!(reloaded.subtitle().map(BlogMlTextConstruct::content), Some("Café"));
    assert_eq!(
        reloaded.extensions().get::<DublinCoreExtension>().and_then(|dc| dc.creator.as_deref()),
        Some("Zoë")
    );
    assert_eq!(reloaded, blog);
}

#[test]
fn test_load_listener_reports_file_source() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);

    let mut document = OpmlDocument::new();
    document.on_loaded(move |event| sink.lock().unwrap().push(event.clone()));
    let path = fixture_path("subscriptions.opml");
    document.load_file(&path, &LoadOptions::default()).unwrap();

    let events = events.lock().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].format, SyndicationFormat::Opml);
    assert_eq!(events[0].source, DocumentSource::File(path));
    assert!(events[0].data_found);
}

// =============================================================================
// RSD
// =============================================================================

#[test]
fn test_rsd_fixture() {
    let document = RsdDocument::parse(&load_fixture("discovery.rsd")).unwrap();

    assert_eq!(document.engine_name(), Some("Blog Munging CMS"));
    assert_eq!(document.interfaces().len(), 3);

    let preferred = document.preferred_interface().unwrap();
    assert_eq!(preferred.name(), "MetaWeblog");
    assert_eq!(preferred.blog_id(), "123abc");
    assert_eq!(preferred.notes(), Some("Preferred entry point"));
    assert_eq!(preferred.settings().get("supportsCategories"), Some("true"));

    assert_eq!(document.interfaces()[2].blog_id(), "");
}

#[test]
fn test_rsd_round_trip() {
    let document = RsdDocument::parse(&load_fixture("discovery.rsd")).unwrap();
    let xml = document.to_xml().unwrap();

    assert!(xml.contains(r#"<rsd xmlns="http://archipelago.phrasewise.com/rsd" version="1.0">"#));
    assert_eq!(RsdDocument::parse(&xml).unwrap(), document);
    assert_eq!(RsdDocument::parse(&xml).unwrap().to_xml().unwrap(), xml);
}

// =============================================================================
// BlogML
// =============================================================================

#[test]
fn test_blogml_fixture() {
    let blog = BlogMlDocument::parse(&load_fixture("blog.xml")).unwrap();

    assert_eq!(blog.root_url().map(|u| u.as_str()), Some("http://blog.example.com/"));
    assert_eq!(blog.subtitle().map(|t| t.content()), Some("Notes & essays"));
    assert_eq!(blog.extended_properties().len(), 2);
    assert_eq!(blog.authors().len(), 1);
    assert_eq!(blog.categories().len(), 1);

    let post = &blog.posts()[0];
    assert_eq!(post.post_type(), Some(BlogMlPostType::Normal));
    assert_eq!(post.views(), Some(42));
    assert_eq!(post.content().map(|c| c.content_type()), Some(BlogMlContentType::Html));
    assert_eq!(post.comments()[0].common().approved(), Some(false));
    assert_eq!(post.trackbacks()[0].url().map(|u| u.as_str()), Some("http://other.example.org/linking-post"));
    assert_eq!(post.attachments()[0].data(), b"hello");
    assert!(post.attachments()[1].data().is_empty());
}

#[test]
fn test_blogml_round_trip() {
    let blog = BlogMlDocument::parse(&load_fixture("blog.xml")).unwrap();
    let xml = blog.to_xml().unwrap();
    let reloaded = BlogMlDocument::parse(&xml).unwrap();

    assert_eq!(reloaded, blog);
    assert_eq!(reloaded.to_xml().unwrap(), xml);
    assert!(xml.contains(r#"date-created="2006-09-05T11:50:07Z""#));
}

// =============================================================================
// Format detection and comparison
// =============================================================================

#[test]
fn test_resource_detects_every_fixture() {
    let options = LoadOptions::default();
    let cases = [
        ("subscriptions.opml", SyndicationFormat::Opml),
        ("discovery.rsd", SyndicationFormat::Rsd),
        ("blog.xml", SyndicationFormat::BlogMl),
    ];
    for (name, format) in cases {
        let resource = SyndicationResource::open(fixture_path(name), &options).unwrap();
        assert_eq!(resource.format(), format, "{name}");
    }
}

#[test]
fn test_wrong_root_is_rejected() {
    let mut document = RsdDocument::new();
    let result = document.load_str(&load_fixture("subscriptions.opml"), &LoadOptions::default());
    assert!(matches!(
        result,
        Err(SyndicationError::UnexpectedRoot { expected: "rsd", .. })
    ));
}

#[test]
fn test_malformed_xml_is_reported() {
    let result = OpmlDocument::parse("<opml><head></opml>");
    assert!(matches!(result, Err(SyndicationError::XmlParse { .. })));
}

#[test]
fn test_fingerprint_follows_structure() {
    let a = OpmlDocument::parse(&load_fixture("subscriptions.opml")).unwrap();
    let b = OpmlDocument::parse(&a.to_xml().unwrap()).unwrap();
    assert_eq!(fingerprint(&a).unwrap(), fingerprint(&b).unwrap());

    let mut c = b.clone();
    c.head_mut().set_title("Other");
    assert_ne!(fingerprint(&a).unwrap(), fingerprint(&c).unwrap());
    assert_ne!(a, c);
}

#[test]
fn test_compare_entity_rejects_other_types() {
    let opml = OpmlDocument::parse(&load_fixture("subscriptions.opml")).unwrap();
    let rsd = RsdDocument::parse(&load_fixture("discovery.rsd")).unwrap();

    assert!(matches!(
        compare_entity(&opml, &rsd),
        Err(SyndicationError::TypeMismatch { .. })
    ));
    assert!(compare_entity(&opml, &opml.clone()).unwrap().is_eq());
}
