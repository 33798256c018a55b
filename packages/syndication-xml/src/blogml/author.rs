//! BlogML authors.

use std::cmp::Ordering;

use super::common::{start, BlogMlCommon};
use crate::compare::{compare_extensions, compare_optional_text, impl_structural_ord};
use crate::entity::{Extensible, SyndicationEntity};
use crate::error::Result;
use crate::options::LoadOptions;
use crate::registry::ExtensionList;
use crate::values::normalize;
use crate::xml::{get_attribute, XmlElement, XmlWriter};

/// A blog author. The author's display name is the common `<title>`.
#[derive(Debug, Clone, Default)]
pub struct BlogMlAuthor {
    common: BlogMlCommon,
    email: Option<String>,
    extensions: ExtensionList,
}

impl BlogMlAuthor {
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

    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Set the email address. Empty input clears it.
    pub fn set_email(&mut self, email: &str) {
        self.email = normalize(email);
    }

    #[must_use]
    pub fn compare(&self, other: &Self) -> Ordering {
        self.common
            .cmp(&other.common)
            .then_with(|| compare_optional_text(self.email(), other.email()))
            .then_with(|| compare_extensions(&self.extensions, &other.extensions))
    }
}

impl_structural_ord!(BlogMlAuthor);

impl Extensible for BlogMlAuthor {
    fn extensions(&self) -> &ExtensionList {
        &self.extensions
    }

    fn extensions_mut(&mut self) -> &mut ExtensionList {
        &mut self.extensions
    }
}

impl SyndicationEntity for BlogMlAuthor {
    fn load_fields(&mut self, source: &XmlElement, _options: Option<&LoadOptions>) -> bool {
        let mut found = self.common.load(source);
        if let Some(email) = get_attribute(source, "email").and_then(normalize) {
            self.email = Some(email);
            found = true;
        }
        found
    }

    fn write_to(&self, writer: &mut XmlWriter<'_>) -> Result<()> {
        start(writer, "author")?;
        self.common.write_attributes(writer)?;
        if let Some(email) = &self.email {
            writer.attribute("email", email)?;
        }
        self.extensions.write_attributes(writer)?;

        self.common.write_title(writer)?;

        self.extensions.write_elements(writer)?;
        writer.end_element()
    }
}
