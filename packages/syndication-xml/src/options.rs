//! Load and save options.

use std::time::Duration;

use encoding_rs::{Encoding, UTF_8};

use crate::config::{
    env_flag, env_u64, DEFAULT_INDENT_WIDTH, DEFAULT_MAX_RESPONSE_SIZE, ENV_MAX_RESPONSE_BYTES,
    ENV_PRESERVE_UNKNOWN_EXTENSIONS, ENV_TIMEOUT_SECS, HTTP_TIMEOUT_SECS,
};
use crate::error::{Result, SyndicationError};
use crate::registry::{ExtensionRegistry, SyndicationExtension};

/// Resolve an encoding label such as `UTF-8` or `ISO-8859-1`.
///
/// # Errors
/// Returns `UnsupportedEncoding` for unknown labels.
pub fn resolve_encoding(label: &str) -> Result<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| SyndicationError::UnsupportedEncoding(label.to_string()))
}

/// Options controlling how documents and entities are loaded.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Resolve extension namespaces against the default registry.
    pub auto_detect_extensions: bool,
    /// Capture namespaces without a registered extension verbatim.
    pub preserve_unknown_extensions: bool,
    /// Extensions consulted before the default registry.
    pub supported_extensions: ExtensionRegistry,
    /// Character encoding of byte input; detected when `None`.
    pub encoding: Option<&'static Encoding>,
    /// Timeout for URL loads.
    pub timeout: Duration,
    /// Maximum accepted response size for URL loads.
    pub max_response_size: u64,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            auto_detect_extensions: true,
            preserve_unknown_extensions: false,
            supported_extensions: ExtensionRegistry::new(),
            encoding: None,
            timeout: Duration::from_secs(HTTP_TIMEOUT_SECS),
            max_response_size: DEFAULT_MAX_RESPONSE_SIZE,
        }
    }
}

impl LoadOptions {
    /// Create options with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create options with defaults overridden from the environment.
    ///
    /// Reads `SYNDICATION_TIMEOUT_SECS`, `SYNDICATION_MAX_RESPONSE_BYTES` and
    /// `SYNDICATION_PRESERVE_UNKNOWN_EXTENSIONS`. Unparsable values are ignored.
    #[must_use]
    pub fn from_env() -> Self {
        let mut options = Self::default();
        if let Some(secs) = env_u64(ENV_TIMEOUT_SECS) {
            options.timeout = Duration::from_secs(secs);
        }
        if let Some(bytes) = env_u64(ENV_MAX_RESPONSE_BYTES) {
            options.max_response_size = bytes;
        }
        if let Some(preserve) = env_flag(ENV_PRESERVE_UNKNOWN_EXTENSIONS) {
            options.preserve_unknown_extensions = preserve;
        }
        options
    }

    #[must_use]
    pub fn with_auto_detect_extensions(mut self, enabled: bool) -> Self {
        self.auto_detect_extensions = enabled;
        self
    }

    #[must_use]
    pub fn with_preserve_unknown_extensions(mut self, enabled: bool) -> Self {
        self.preserve_unknown_extensions = enabled;
        self
    }

    /// Add an extension type to the supported set.
    #[must_use]
    pub fn with_extension<E: SyndicationExtension + Default>(mut self) -> Self {
        self.supported_extensions.register_default::<E>();
        self
    }

    #[must_use]
    pub fn with_supported_extensions(mut self, registry: ExtensionRegistry) -> Self {
        self.supported_extensions = registry;
        self
    }

    /// Force the encoding of byte input.
    ///
    /// # Errors
    /// Returns `UnsupportedEncoding` for unknown labels.
    pub fn with_encoding(mut self, label: &str) -> Result<Self> {
        self.encoding = Some(resolve_encoding(label)?);
        Ok(self)
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_max_response_size(mut self, bytes: u64) -> Self {
        self.max_response_size = bytes;
        self
    }
}

/// Options controlling how documents are written.
#[derive(Debug, Clone)]
pub struct SaveOptions {
    /// Declare every extension namespace found in the graph on the root.
    pub auto_detect_extensions: bool,
    /// Namespaces declared on the root when auto-detection is off.
    pub supported_extensions: ExtensionRegistry,
    /// Write without indentation.
    pub minimize: bool,
    /// Indentation width when not minimized.
    pub indent_width: usize,
    /// Emit the `<?xml ...?>` declaration.
    pub include_declaration: bool,
    /// Output character encoding.
    pub encoding: &'static Encoding,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self {
            auto_detect_extensions: true,
            supported_extensions: ExtensionRegistry::new(),
            minimize: false,
            indent_width: DEFAULT_INDENT_WIDTH,
            include_declaration: true,
            encoding: UTF_8,
        }
    }
}

impl SaveOptions {
    /// Create options with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Options producing compact output without declaration.
    #[must_use]
    pub fn compact() -> Self {
        Self {
            minimize: true,
            include_declaration: false,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_auto_detect_extensions(mut self, enabled: bool) -> Self {
        self.auto_detect_extensions = enabled;
        self
    }

    /// Add an extension type whose namespace is declared on the root.
    #[must_use]
    pub fn with_extension<E: SyndicationExtension + Default>(mut self) -> Self {
        self.supported_extensions.register_default::<E>();
        self
    }

    #[must_use]
    pub fn with_minimize(mut self, minimize: bool) -> Self {
        self.minimize = minimize;
        self
    }

    #[must_use]
    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.indent_width = width;
        self
    }

    #[must_use]
    pub fn with_declaration(mut self, include: bool) -> Self {
        self.include_declaration = include;
        self
    }

    /// Set the output encoding.
    ///
    /// # Errors
    /// Returns `UnsupportedEncoding` for unknown labels and for encodings that
    /// cannot be produced (UTF-16).
    pub fn with_encoding(mut self, label: &str) -> Result<Self> {
        let encoding = resolve_encoding(label)?;
        if encoding.output_encoding() != encoding {
            return Err(SyndicationError::UnsupportedEncoding(format!(
                "{label} is not supported for output"
            )));
        }
        self.encoding = encoding;
        Ok(self)
    }

    /// Indentation width passed to the writer.
    #[must_use]
    pub fn effective_indent(&self) -> usize {
        if self.minimize {
            0
        } else {
            self.indent_width
        }
    }
}
