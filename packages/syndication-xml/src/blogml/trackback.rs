//! Post trackbacks.

use std::cmp::Ordering;

use url::Url;

use super::common::{start, BlogMlCommon};
use crate::compare::{compare_extensions, compare_optional_text, impl_structural_ord};
use crate::entity::{Extensible, SyndicationEntity};
use crate::error::Result;
use crate::options::LoadOptions;
use crate::registry::ExtensionList;
use crate::values::parse_url;
use crate::xml::{get_attribute, XmlElement, XmlWriter};

/// A trackback ping received by a post.
#[derive(Debug, Clone, Default)]
pub struct BlogMlTrackback {
    common: BlogMlCommon,
    url: Option<Url>,
    extensions: ExtensionList,
}

impl BlogMlTrackback {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn common(&self) -> &BlogMlCommon {
        &self.common
    }

    pub fn common_mut(&mut self) -> &mut BlogMlCommon {
        &mut self.common
    }

    /// Page that sent the ping.
    #[must_use]
    pub fn url(&self) -> Option<&Url> {
        self.url.as_ref()
    }

    pub fn set_url(&mut self, url: Option<Url>) {
        self.url = url;
    }

    #[must_use]
    pub fn compare(&self, other: &Self) -> Ordering {
        self.common
            .cmp(&other.common)
            .then_with(|| compare_optional_text(self.url.as_ref().map(Url::as_str), other.url.as_ref().map(Url::as_str)))
            .then_with(|| compare_extensions(&self.extensions, &other.extensions))
    }
}

impl_structural_ord!(BlogMlTrackback);

impl Extensible for BlogMlTrackback {
    fn extensions(&self) -> &ExtensionList {
        &self.extensions
    }

    fn extensions_mut(&mut self) -> &mut ExtensionList {
        &mut self.extensions
    }
}

impl SyndicationEntity for BlogMlTrackback {
    fn load_fields(&mut self, source: &XmlElement, _options: Option<&LoadOptions>) -> bool {
        let mut found = self.common.load(source);
        if let Some(url) = get_attribute(source, "url").and_then(parse_url) {
            self.url = Some(url);
            found = true;
        }
        found
    }

    fn write_to(&self, writer: &mut XmlWriter<'_>) -> Result<()> {
        start(writer, "trackback")?;
        self.common.write_attributes(writer)?;
        if let Some(url) = &self.url {
            writer.attribute("url", url.as_str())?;
        }
        self.extensions.write_attributes(writer)?;

        self.common.write_title(writer)?;

        self.extensions.write_elements(writer)?;
        writer.end_element()
    }
}
