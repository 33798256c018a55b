//! BlogML categories.

use std::cmp::Ordering;

use super::common::{start, BlogMlCommon};
use crate::compare::{compare_extensions, compare_optional_text, impl_structural_ord};
use crate::entity::{Extensible, SyndicationEntity};
use crate::error::Result;
use crate::options::LoadOptions;
use crate::registry::ExtensionList;
use crate::values::normalize;
use crate::xml::{get_attribute, XmlElement, XmlWriter};

/// A blog category. Categories nest through `parentref`.
#[derive(Debug, Clone, Default)]
pub struct BlogMlCategory {
    common: BlogMlCommon,
    description: Option<String>,
    parent_ref: Option<String>,
    extensions: ExtensionList,
}

impl BlogMlCategory {
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
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn set_description(&mut self, description: &str) {
        self.description = normalize(description);
    }

    /// Identifier of the parent category.
    #[must_use]
    pub fn parent_ref(&self) -> Option<&str> {
        self.parent_ref.as_deref()
    }

    pub fn set_parent_ref(&mut self, parent_ref: &str) {
        self.parent_ref = normalize(parent_ref);
    }

    #[must_use]
    pub fn compare(&self, other: &Self) -> Ordering {
        self.common
            .cmp(&other.common)
            .then_with(|| compare_optional_text(self.description(), other.description()))
            .then_with(|| compare_optional_text(self.parent_ref(), other.parent_ref()))
            .then_with(|| compare_extensions(&self.extensions, &other.extensions))
    }
}

impl_structural_ord!(BlogMlCategory);

impl Extensible for BlogMlCategory {
    fn extensions(&self) -> &ExtensionList {
        &self.extensions
    }

    fn extensions_mut(&mut self) -> &mut ExtensionList {
        &mut self.extensions
    }
}

impl SyndicationEntity for BlogMlCategory {
    fn load_fields(&mut self, source: &XmlElement, _options: Option<&LoadOptions>) -> bool {
        let mut found = self.common.load(source);
        if let Some(description) = get_attribute(source, "description").and_then(normalize) {
            self.description = Some(description);
            found = true;
        }
        if let Some(parent_ref) = get_attribute(source, "parentref").and_then(normalize) {
            self.parent_ref = Some(parent_ref);
            found = true;
        }
        found
    }

    fn write_to(&self, writer: &mut XmlWriter<'_>) -> Result<()> {
        start(writer, "category")?;
        self.common.write_attributes(writer)?;
        if let Some(description) = &self.description {
            writer.attribute("description", description)?;
        }
        if let Some(parent_ref) = &self.parent_ref {
            writer.attribute("parentref", parent_ref)?;
        }
        self.extensions.write_attributes(writer)?;

        self.common.write_title(writer)?;

        self.extensions.write_elements(writer)?;
        writer.end_element()
    }
}
