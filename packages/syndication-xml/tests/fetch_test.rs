//! HTTP fetch tests against a mock server.
//!
//! The blocking client runs on the blocking thread pool so that the mock
//! server keeps serving on the async runtime.

use std::time::Duration;

use syndication_xml::rsd::RsdDocument;
use syndication_xml::{
    FetchRequest, LoadOptions, SyndicationDocument, SyndicationError, SyndicationFormat, SyndicationResource,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const RSD: &str = r#"<?xml version="1.0"?>
<rsd version="1.0" xmlns="http://archipelago.phrasewise.com/rsd">
  <service>
    <engineName>WordPress</engineName>
    <apis><api name="WordPress" preferred="true" apiLink="http://example.com/xmlrpc.php" blogID="1"/></apis>
  </service>
</rsd>"#;

async fn run_blocking<T: Send + 'static>(f: impl FnOnce() -> T + Send + 'static) -> T {
    tokio::task::spawn_blocking(f).await.unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn test_load_url() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rsd.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(RSD))
        .expect(1)
        .mount(&mock_server)
        .await;

    let url = format!("{}/rsd.xml", mock_server.uri());
    let document = run_blocking(move || {
        let mut document = RsdDocument::new();
        document.load_url(&url, &LoadOptions::default()).map(|found| (found, document))
    })
    .await;

    let (found, document) = document.unwrap();
    assert!(found);
    assert_eq!(document.engine_name(), Some("WordPress"));
    assert_eq!(document.preferred_interface().unwrap().blog_id(), "1");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_resource_fetch_detects_format() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rsd.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(RSD))
        .mount(&mock_server)
        .await;

    let url = format!("{}/rsd.xml", mock_server.uri());
    let resource = run_blocking(move || {
        let request = FetchRequest::new(&url)?;
        SyndicationResource::fetch(&request, &LoadOptions::default())
    })
    .await
    .unwrap();

    assert_eq!(resource.format(), SyndicationFormat::Rsd);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_client_error_is_not_retried() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing.opml"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let url = format!("{}/missing.opml", mock_server.uri());
    let result = run_blocking(move || {
        let mut document = RsdDocument::new();
        document.load_url(&url, &LoadOptions::default())
    })
    .await;

    assert!(matches!(result, Err(SyndicationError::Fetch { .. })));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_server_errors_exhaust_retries() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .expect(2)
        .mount(&mock_server)
        .await;

    let url = format!("{}/rsd.xml", mock_server.uri());
    let result = run_blocking(move || {
        let request = FetchRequest::new(&url)?.with_max_retries(2);
        syndication_xml::http::fetch(&request)
    })
    .await;

    assert!(matches!(
        result,
        Err(SyndicationError::RetriesExhausted { attempts: 2, .. })
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_response_size_limit() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(RSD))
        .mount(&mock_server)
        .await;

    let url = format!("{}/rsd.xml", mock_server.uri());
    let result = run_blocking(move || {
        let options = LoadOptions::default()
            .with_max_response_size(16)
            .with_timeout(Duration::from_secs(5));
        let mut document = RsdDocument::new();
        document.load_url(&url, &options)
    })
    .await;

    assert!(matches!(
        result,
        Err(SyndicationError::ResponseTooLarge { limit: 16, .. })
    ));
}
