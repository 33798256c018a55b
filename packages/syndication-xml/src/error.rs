//! Error types for syndication document handling.
//!
//! Only contract violations, malformed XML and transport failures are errors.
//! Unparsable scalar values and unrecognized content are skipped during load
//! and never surface here.

use thiserror::Error;

/// Main error type for the syndication library.
#[derive(Debug, Error)]
pub enum SyndicationError {
    /// A required argument was empty after normalization.
    #[error("Argument '{name}' must not be empty")]
    EmptyArgument { name: &'static str },

    /// An argument was rejected for another reason.
    #[error("Invalid argument '{name}': {reason}")]
    InvalidArgument { name: &'static str, reason: String },

    /// The XML source is not well-formed.
    #[error("XML parsing failed at byte {position}: {message}")]
    XmlParse { message: String, position: u64 },

    /// The document root does not belong to the requested format.
    #[error("Unexpected root element <{found}>, expected <{expected}>")]
    UnexpectedRoot {
        expected: &'static str,
        found: String,
    },

    /// No supported format matches the document root.
    #[error("Unrecognized syndication format with root element <{0}>")]
    UnknownFormat(String),

    /// Two entities of different types were compared.
    #[error("Type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    /// The XML writer rejected an event.
    #[error("XML writing failed: {0}")]
    XmlWrite(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The requested character encoding label is unknown.
    #[error("Unsupported character encoding: '{0}'")]
    UnsupportedEncoding(String),

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Failed to fetch a document.
    #[error("Failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// All retry attempts failed.
    #[error("Request failed after {attempts} attempts: {message}")]
    RetriesExhausted { attempts: u32, message: String },

    /// The response body exceeds the configured limit.
    #[error("Response of {size} bytes exceeds the limit of {limit} bytes")]
    ResponseTooLarge { size: u64, limit: u64 },

    /// The caller cancelled the request.
    #[error("Request for {url} was cancelled")]
    Cancelled { url: String },

    /// The URL could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Result type alias for syndication operations.
pub type Result<T> = std::result::Result<T, SyndicationError>;
