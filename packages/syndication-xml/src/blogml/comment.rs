//! Post comments.

use std::cmp::Ordering;

use url::Url;

use super::common::{start, BlogMlCommon};
use super::text::BlogMlTextConstruct;
use crate::compare::{compare_extensions, compare_optional_text, impl_structural_ord};
use crate::entity::{Extensible, SyndicationEntity};
use crate::error::Result;
use crate::options::LoadOptions;
use crate::registry::ExtensionList;
use crate::values::{normalize, parse_url};
use crate::xml::{find_child, get_attribute, XmlElement, XmlWriter};

/// A reader comment on a post.
#[derive(Debug, Clone, Default)]
pub struct BlogMlComment {
    common: BlogMlCommon,
    content: Option<BlogMlTextConstruct>,
    user_name: Option<String>,
    user_email: Option<String>,
    user_url: Option<Url>,
    extensions: ExtensionList,
}

impl BlogMlComment {
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
    pub fn content(&self) -> Option<&BlogMlTextConstruct> {
        self.content.as_ref()
    }

    pub fn set_content(&mut self, content: Option<BlogMlTextConstruct>) {
        self.content = content;
    }

    #[must_use]
    pub fn user_name(&self) -> Option<&str> {
        self.user_name.as_deref()
    }

    pub fn set_user_name(&mut self, name: &str) {
        self.user_name = normalize(name);
    }

    #[must_use]
    pub fn user_email(&self) -> Option<&str> {
        self.user_email.as_deref()
    }

    pub fn set_user_email(&mut self, email: &str) {
        self.user_email = normalize(email);
    }

    #[must_use]
    pub fn user_url(&self) -> Option<&Url> {
        self.user_url.as_ref()
    }

    pub fn set_user_url(&mut self, url: Option<Url>) {
        self.user_url = url;
    }

    #[must_use]
    pub fn compare(&self, other: &Self) -> Ordering {
        self.common
            .cmp(&other.common)
            .then_with(|| self.content.cmp(&other.content))
            .then_with(|| compare_optional_text(self.user_name(), other.user_name()))
            .then_with(|| compare_optional_text(self.user_email(), other.user_email()))
            .then_with(|| {
                compare_optional_text(
                    self.user_url.as_ref().map(Url::as_str),
                    other.user_url.as_ref().map(Url::as_str),
                )
            })
            .then_with(|| compare_extensions(&self.extensions, &other.extensions))
    }
}

impl_structural_ord!(BlogMlComment);

impl Extensible for BlogMlComment {
    fn extensions(&self) -> &ExtensionList {
        &self.extensions
    }

    fn extensions_mut(&mut self) -> &mut ExtensionList {
        &mut self.extensions
    }
}

impl SyndicationEntity for BlogMlComment {
    fn load_fields(&mut self, source: &XmlElement, _options: Option<&LoadOptions>) -> bool {
        let mut found = self.common.load(source);
        if let Some(name) = get_attribute(source, "user-name").and_then(normalize) {
            self.user_name = Some(name);
            found = true;
        }
        if let Some(email) = get_attribute(source, "user-email").and_then(normalize) {
            self.user_email = Some(email);
            found = true;
        }
        if let Some(url) = get_attribute(source, "user-url").and_then(parse_url) {
            self.user_url = Some(url);
            found = true;
        }
        if let Some(content) =
            find_child(source, "content", source.namespace()).and_then(BlogMlTextConstruct::from_element)
        {
            self.content = Some(content);
            found = true;
        }
        found
    }

    fn write_to(&self, writer: &mut XmlWriter<'_>) -> Result<()> {
        start(writer, "comment")?;
        self.common.write_attributes(writer)?;
        if let Some(name) = &self.user_name {
            writer.attribute("user-name", name)?;
        }
        if let Some(email) = &self.user_email {
            writer.attribute("user-email", email)?;
        }
        if let Some(url) = &self.user_url {
            writer.attribute("user-url", url.as_str())?;
        }
        self.extensions.write_attributes(writer)?;

        self.common.write_title(writer)?;
        if let Some(content) = &self.content {
            content.write(writer, "content")?;
        }

        self.extensions.write_elements(writer)?;
        writer.end_element()
    }
}
