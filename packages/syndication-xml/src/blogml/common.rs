//! Attributes shared by most BlogML entities.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use super::text::BlogMlTextConstruct;
use crate::compare::{compare_optional_text, impl_structural_ord};
use crate::config::BLOGML_NAMESPACE;
use crate::error::Result;
use crate::values::{checked_date, format_bool, format_rfc3339, normalize, parse_bool, parse_rfc3339, truncate_to_seconds};
use crate::xml::{find_child, get_attribute, XmlElement, XmlWriter};

/// `id`, `date-created`, `date-modified` and `approved` attributes plus the
/// `<title>` child.
#[derive(Debug, Clone, Default)]
pub struct BlogMlCommon {
    id: Option<String>,
    created_on: Option<DateTime<Utc>>,
    modified_on: Option<DateTime<Utc>>,
    approved: Option<bool>,
    title: Option<BlogMlTextConstruct>,
}

impl BlogMlCommon {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Set the identifier. Empty input clears it.
    pub fn set_id(&mut self, id: &str) {
        self.id = normalize(id);
    }

    #[must_use]
    pub fn created_on(&self) -> Option<DateTime<Utc>> {
        self.created_on
    }

    pub fn set_created_on(&mut self, date: Option<DateTime<Utc>>) -> Result<()> {
        self.created_on = checked_date("date-created", date)?;
        Ok(())
    }

    #[must_use]
    pub fn modified_on(&self) -> Option<DateTime<Utc>> {
        self.modified_on
    }

    pub fn set_modified_on(&mut self, date: Option<DateTime<Utc>>) -> Result<()> {
        self.modified_on = checked_date("date-modified", date)?;
        Ok(())
    }

    #[must_use]
    pub fn approved(&self) -> Option<bool> {
        self.approved
    }

    pub fn set_approved(&mut self, approved: Option<bool>) {
        self.approved = approved;
    }

    #[must_use]
    pub fn title(&self) -> Option<&BlogMlTextConstruct> {
        self.title.as_ref()
    }

    pub fn set_title(&mut self, title: Option<BlogMlTextConstruct>) {
        self.title = title;
    }

    /// Load the shared attributes and `<title>` of `source`.
    pub(crate) fn load(&mut self, source: &XmlElement) -> bool {
        let mut found = false;
        if let Some(id) = get_attribute(source, "id").and_then(normalize) {
            self.id = Some(id);
            found = true;
        }
        if let Some(date) = get_attribute(source, "date-created").and_then(parse_rfc3339) {
            self.created_on = Some(truncate_to_seconds(date));
            found = true;
        }
        if let Some(date) = get_attribute(source, "date-modified").and_then(parse_rfc3339) {
            self.modified_on = Some(truncate_to_seconds(date));
            found = true;
        }
        if let Some(approved) = get_attribute(source, "approved").and_then(parse_bool) {
            self.approved = Some(approved);
            found = true;
        }
        if let Some(title) = find_child(source, "title", source.namespace()).and_then(BlogMlTextConstruct::from_element) {
            self.title = Some(title);
            found = true;
        }
        found
    }

    pub(crate) fn write_attributes(&self, writer: &mut XmlWriter<'_>) -> Result<()> {
        if let Some(id) = &self.id {
            writer.attribute("id", id)?;
        }
        if let Some(date) = &self.created_on {
            writer.attribute("date-created", &format_rfc3339(date))?;
        }
        if let Some(date) = &self.modified_on {
            writer.attribute("date-modified", &format_rfc3339(date))?;
        }
        if let Some(approved) = self.approved {
            writer.attribute("approved", format_bool(approved))?;
        }
        Ok(())
    }

    pub(crate) fn write_title(&self, writer: &mut XmlWriter<'_>) -> Result<()> {
        match &self.title {
            Some(title) => title.write(writer, "title"),
            None => Ok(()),
        }
    }

    #[must_use]
    pub fn compare(&self, other: &Self) -> Ordering {
        compare_optional_text(self.id(), other.id())
            .then_with(|| self.created_on.cmp(&other.created_on))
            .then_with(|| self.modified_on.cmp(&other.modified_on))
            .then_with(|| self.approved.cmp(&other.approved))
            .then_with(|| self.title.cmp(&other.title))
    }
}

impl_structural_ord!(BlogMlCommon);

/// Open `<local>` in the BlogML namespace.
pub(crate) fn start(writer: &mut XmlWriter<'_>, local: &str) -> Result<()> {
    writer.start_element_ns(None, local, BLOGML_NAMESPACE)
}
