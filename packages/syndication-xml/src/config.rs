//! Configuration constants for the syndication formats and the fetch layer.

use url::Url;

use crate::error::{Result, SyndicationError};

/// Version written into every OPML document.
pub const OPML_VERSION: &str = "2.0";

/// Version written into every RSD document.
pub const RSD_VERSION: &str = "1.0";

/// Version of the BlogML schema implemented by this crate.
pub const BLOGML_VERSION: &str = "2.0";

/// XML namespace of RSD documents.
pub const RSD_NAMESPACE: &str = "http://archipelago.phrasewise.com/rsd";

/// XML namespace of BlogML documents.
pub const BLOGML_NAMESPACE: &str = "http://www.blogml.com/2006/09/BlogML";

/// Namespace bound to the reserved `xml` prefix.
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// Namespace of `xmlns` declarations.
pub const XMLNS_NAMESPACE: &str = "http://www.w3.org/2000/xmlns/";

/// XML Schema instance namespace (`xsi:` attributes).
pub const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// Dublin Core element set namespace.
pub const DUBLIN_CORE_NAMESPACE: &str = "http://purl.org/dc/elements/1.1/";

/// Creative Commons RSS module namespace.
pub const CREATIVE_COMMONS_NAMESPACE: &str = "http://backend.userland.com/creativeCommonsRssModule";

/// Indentation width used when output is not minimized.
pub const DEFAULT_INDENT_WIDTH: usize = 2;

/// HTTP timeout in seconds.
///
/// Syndication metadata documents are small; 30 seconds covers slow hosts.
pub const HTTP_TIMEOUT_SECS: u64 = 30;

/// Default maximum HTTP response size in bytes (10 MB).
pub const DEFAULT_MAX_RESPONSE_SIZE: u64 = 10 * 1024 * 1024;

/// Maximum number of retry attempts for transient failures.
pub const MAX_RETRIES: u32 = 3;

/// Base delay for exponential backoff (milliseconds).
pub const RETRY_BASE_DELAY_MS: u64 = 500;

/// User agent string identifying this library.
pub const USER_AGENT: &str = concat!("syndication-xml/", env!("CARGO_PKG_VERSION"));

/// Environment variable overriding the fetch timeout in seconds.
pub const ENV_TIMEOUT_SECS: &str = "SYNDICATION_TIMEOUT_SECS";

/// Environment variable overriding the maximum response size in bytes.
pub const ENV_MAX_RESPONSE_BYTES: &str = "SYNDICATION_MAX_RESPONSE_BYTES";

/// Environment variable enabling capture of unknown extension namespaces.
pub const ENV_PRESERVE_UNKNOWN_EXTENSIONS: &str = "SYNDICATION_PRESERVE_UNKNOWN_EXTENSIONS";

/// Validate that a fetch target is an absolute HTTP(S) URL.
///
/// # Examples
/// ```
/// use syndication_xml::config::validate_fetch_url;
///
/// assert!(validate_fetch_url("https://example.com/rsd.xml").is_ok());
/// assert!(validate_fetch_url("ftp://example.com/rsd.xml").is_err());
/// assert!(validate_fetch_url("not a url").is_err());
/// ```
pub fn validate_fetch_url(url: &str) -> Result<Url> {
    let parsed = Url::parse(url.trim()).map_err(|e| SyndicationError::InvalidUrl(format!("{url}: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(SyndicationError::InvalidUrl(format!(
            "{url}: unsupported scheme '{scheme}'"
        ))),
    }
}

/// Read a boolean flag from the environment.
///
/// Accepts `1`, `true`, `yes` and `on` (case-insensitive) as true.
pub(crate) fn env_flag(name: &str) -> Option<bool> {
    std::env::var(name).ok().map(|value| {
        matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        )
    })
}

/// Read a numeric value from the environment, ignoring unparsable input.
pub(crate) fn env_u64(name: &str) -> Option<u64> {
    std::env::var(name).ok().and_then(|v| v.trim().parse().ok())
}
