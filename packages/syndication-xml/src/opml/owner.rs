//! Owner of an OPML document.

use std::cmp::Ordering;

use url::Url;

use crate::compare::{compare_optional_text, impl_structural_ord};
use crate::error::Result;
use crate::values::{normalize, parse_url};
use crate::xml::{get_text, XmlElement, XmlWriter};

/// Owner details stored as `ownerName`, `ownerEmail` and `ownerId` in `<head>`.
#[derive(Debug, Clone, Default)]
pub struct OpmlOwner {
    name: Option<String>,
    email: Option<String>,
    id: Option<Url>,
}

impl OpmlOwner {
    /// Create a new empty owner.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Set the owner name. Empty input clears it.
    pub fn set_name(&mut self, name: &str) {
        self.name = normalize(name);
    }

    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Set the owner email address. Empty input clears it.
    pub fn set_email(&mut self, email: &str) {
        self.email = normalize(email);
    }

    /// Page with a form for contacting the owner.
    #[must_use]
    pub fn id(&self) -> Option<&Url> {
        self.id.as_ref()
    }

    pub fn set_id(&mut self, id: Option<Url>) {
        self.id = id;
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.id.is_none()
    }

    /// Load from one `<head>` child. Returns `true` when the element was an
    /// owner element carrying a usable value.
    pub(crate) fn load_element(&mut self, element: &XmlElement) -> bool {
        let text = get_text(element);
        match element.local_name() {
            "ownerName" => assign(&mut self.name, normalize(&text)),
            "ownerEmail" => assign(&mut self.email, normalize(&text)),
            "ownerId" => assign(&mut self.id, parse_url(&text)),
            _ => false,
        }
    }

    pub(crate) fn write(&self, writer: &mut XmlWriter<'_>) -> Result<()> {
        if let Some(name) = &self.name {
            writer.element_text("ownerName", name)?;
        }
        if let Some(email) = &self.email {
            writer.element_text("ownerEmail", email)?;
        }
        if let Some(id) = &self.id {
            writer.element_text("ownerId", id.as_str())?;
        }
        Ok(())
    }

    /// Structural comparison; text compares case-insensitively.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Ordering {
        compare_optional_text(self.name(), other.name())
            .then_with(|| compare_optional_text(self.email(), other.email()))
            .then_with(|| compare_optional_text(self.id.as_ref().map(Url::as_str), other.id.as_ref().map(Url::as_str)))
    }
}

impl_structural_ord!(OpmlOwner);

fn assign<T>(field: &mut Option<T>, value: Option<T>) -> bool {
    match value {
        Some(value) => {
            *field = Some(value);
            true
        }
        None => false,
    }
}
