//! OPML `<outline>` elements.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use url::Url;

use crate::attributes::AttributeMap;
use crate::compare::{
    compare_entities, compare_extensions, compare_map, compare_optional_text, compare_text,
    compare_text_sequence, impl_structural_ord,
};
use crate::entity::{load_children, Extensible, SyndicationEntity};
use crate::error::{Result, SyndicationError};
use crate::options::LoadOptions;
use crate::registry::{ExtensionList, SyndicationExtension};
use crate::values::{
    checked_date, format_bool, format_rfc822, normalize, parse_bool, parse_rfc822, split_list,
    truncate_to_seconds,
};
use crate::xml::{find_children, XmlElement, XmlWriter};

/// Attribute names with a dedicated field, lowercase.
const KNOWN_ATTRIBUTES: &[&str] = &["text", "type", "iscomment", "isbreakpoint", "created", "category"];

/// A node of the outline tree.
///
/// `text` is required and always written. Attributes without a dedicated
/// field (`xmlUrl`, `htmlUrl`, `url`, ...) are kept in an ordered map and
/// written back unchanged.
#[derive(Debug, Clone, Default)]
pub struct OpmlOutline {
    text: String,
    outline_type: Option<String>,
    is_comment: bool,
    is_breakpoint: bool,
    created_on: Option<DateTime<Utc>>,
    categories: Vec<String>,
    attributes: AttributeMap,
    outlines: Vec<OpmlOutline>,
    extensions: ExtensionList,
}

impl OpmlOutline {
    /// Create an outline with the given text.
    ///
    /// # Errors
    /// Returns `EmptyArgument` when `text` is empty after trimming.
    pub fn new(text: &str) -> Result<Self> {
        let mut outline = Self::default();
        outline.set_text(text)?;
        Ok(outline)
    }

    /// Create a feed subscription (`type="rss"` with `xmlUrl`).
    ///
    /// # Examples
    /// ```
    /// use syndication_xml::opml::OpmlOutline;
    ///
    /// let url = "https://example.com/feed.xml".parse().unwrap();
    /// let outline = OpmlOutline::subscription("Example", &url).unwrap();
    /// assert_eq!(outline.outline_type(), Some("rss"));
    /// assert_eq!(outline.attribute("xmlUrl"), Some("https://example.com/feed.xml"));
    /// ```
    pub fn subscription(text: &str, xml_url: &Url) -> Result<Self> {
        Self::typed(text, "rss", "xmlUrl", xml_url)
    }

    /// Create a link to another resource (`type="link"` with `url`).
    pub fn link(text: &str, url: &Url) -> Result<Self> {
        Self::typed(text, "link", "url", url)
    }

    /// Create an inclusion of another OPML file (`type="include"` with `url`).
    pub fn inclusion(text: &str, url: &Url) -> Result<Self> {
        Self::typed(text, "include", "url", url)
    }

    fn typed(text: &str, outline_type: &str, attribute: &str, url: &Url) -> Result<Self> {
        let mut outline = Self::new(text)?;
        outline.set_outline_type(outline_type);
        outline.attributes.insert(attribute, url.as_str());
        Ok(outline)
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Set the text.
    ///
    /// # Errors
    /// Returns `EmptyArgument` when `text` is empty after trimming; the
    /// outline is left unchanged.
    pub fn set_text(&mut self, text: &str) -> Result<()> {
        self.text = normalize(text).ok_or(SyndicationError::EmptyArgument { name: "text" })?;
        Ok(())
    }

    /// How the outline is to be interpreted (`rss`, `link`, `include`, ...).
    #[must_use]
    pub fn outline_type(&self) -> Option<&str> {
        self.outline_type.as_deref()
    }

    /// Set the type. Empty input clears it.
    pub fn set_outline_type(&mut self, outline_type: &str) {
        self.outline_type = normalize(outline_type);
    }

    #[must_use]
    pub fn is_comment(&self) -> bool {
        self.is_comment
    }

    pub fn set_is_comment(&mut self, is_comment: bool) {
        self.is_comment = is_comment;
    }

    #[must_use]
    pub fn is_breakpoint(&self) -> bool {
        self.is_breakpoint
    }

    pub fn set_is_breakpoint(&mut self, is_breakpoint: bool) {
        self.is_breakpoint = is_breakpoint;
    }

    #[must_use]
    pub fn created_on(&self) -> Option<DateTime<Utc>> {
        self.created_on
    }

    /// Set the creation date, truncated to whole seconds.
    ///
    /// # Errors
    /// Returns `InvalidArgument` for years outside 1-9999.
    pub fn set_created_on(&mut self, date: Option<DateTime<Utc>>) -> Result<()> {
        self.created_on = checked_date("created", date)?;
        Ok(())
    }

    /// Categories in document order.
    #[must_use]
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Replace the categories.
    ///
    /// Values are split on commas the way the `category` attribute is read;
    /// fragments are trimmed and empty ones dropped.
    pub fn set_categories<S: AsRef<str>>(&mut self, categories: impl IntoIterator<Item = S>) {
        self.categories.clear();
        for category in categories {
            self.add_category(category.as_ref());
        }
    }

    /// Append a category, or several when `category` contains commas.
    /// Empty input is ignored.
    pub fn add_category(&mut self, category: &str) {
        self.categories
            .extend(split_list(category).into_iter().map(str::to_string));
    }

    /// Attributes without a dedicated field, in document order.
    #[must_use]
    pub fn attributes(&self) -> &AttributeMap {
        &self.attributes
    }

    /// Value of an attribute without a dedicated field.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name)
    }

    /// Set an attribute without a dedicated field, replacing any value.
    ///
    /// # Errors
    /// Returns `EmptyArgument` for an empty name or a blank value, and
    /// `InvalidArgument` for names that have a dedicated field or are not
    /// plain XML names.
    pub fn set_attribute(&mut self, name: &str, value: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SyndicationError::EmptyArgument { name: "name" });
        }
        if value.trim().is_empty() {
            return Err(SyndicationError::EmptyArgument { name: "value" });
        }
        if KNOWN_ATTRIBUTES.contains(&name.to_ascii_lowercase().as_str()) {
            return Err(SyndicationError::InvalidArgument {
                name: "name",
                reason: format!("'{name}' has a dedicated field"),
            });
        }
        if name.contains(':') || name.starts_with("xmlns") || name.chars().any(char::is_whitespace) {
            return Err(SyndicationError::InvalidArgument {
                name: "name",
                reason: format!("'{name}' is not an unqualified attribute name"),
            });
        }
        self.attributes.insert(name, value);
        Ok(())
    }

    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        self.attributes.remove(name)
    }

    /// Child outlines in document order.
    #[must_use]
    pub fn outlines(&self) -> &[OpmlOutline] {
        &self.outlines
    }

    pub fn outlines_mut(&mut self) -> &mut Vec<OpmlOutline> {
        &mut self.outlines
    }

    pub fn add_outline(&mut self, outline: OpmlOutline) {
        self.outlines.push(outline);
    }

    /// Structural comparison; text compares case-insensitively.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Ordering {
        compare_text(&self.text, &other.text, true)
            .then_with(|| compare_optional_text(self.outline_type(), other.outline_type()))
            .then_with(|| self.is_comment.cmp(&other.is_comment))
            .then_with(|| self.is_breakpoint.cmp(&other.is_breakpoint))
            .then_with(|| self.created_on.cmp(&other.created_on))
            .then_with(|| compare_text_sequence(&self.categories, &other.categories))
            .then_with(|| compare_map(&self.attributes, &other.attributes, true))
            .then_with(|| compare_entities(&self.outlines, &other.outlines))
            .then_with(|| compare_extensions(&self.extensions, &other.extensions))
    }

    fn load_attributes(&mut self, source: &XmlElement) -> bool {
        let mut found = false;
        for attribute in source.attributes().iter().filter(|a| a.name.is_unqualified()) {
            let name = attribute.name.local.as_str();
            let value = attribute.value.as_str();
            let loaded = match name.to_ascii_lowercase().as_str() {
                "text" => normalize(value).map(|text| self.text = text).is_some(),
                "type" => normalize(value).map(|t| self.outline_type = Some(t)).is_some(),
                "iscomment" => parse_bool(value).map(|b| self.is_comment = b).is_some(),
                "isbreakpoint" => parse_bool(value).map(|b| self.is_breakpoint = b).is_some(),
                "created" => parse_rfc822(value)
                    .map(|date| self.created_on = Some(truncate_to_seconds(date)))
                    .is_some(),
                "category" => {
                    let categories: Vec<String> = split_list(value).into_iter().map(str::to_string).collect();
                    let any = !categories.is_empty();
                    if any {
                        self.categories = categories;
                    }
                    any
                }
                _ => !value.trim().is_empty() && self.attributes.insert_if_absent(name, value),
            };
            found |= loaded;
        }
        found
    }
}

impl_structural_ord!(OpmlOutline);

impl Extensible for OpmlOutline {
    fn extensions(&self) -> &ExtensionList {
        &self.extensions
    }

    fn extensions_mut(&mut self) -> &mut ExtensionList {
        &mut self.extensions
    }
}

impl SyndicationEntity for OpmlOutline {
    fn load_fields(&mut self, source: &XmlElement, options: Option<&LoadOptions>) -> bool {
        let mut found = self.load_attributes(source);

        let children: Vec<OpmlOutline> =
            load_children(find_children(source, "outline", source.namespace()), options);
        found |= !children.is_empty();
        self.outlines.extend(children);

        found
    }

    fn write_to(&self, writer: &mut XmlWriter<'_>) -> Result<()> {
        writer.start_element("outline")?;
        writer.attribute("text", &self.text)?;
        if let Some(outline_type) = &self.outline_type {
            writer.attribute("type", outline_type)?;
        }
        if self.is_comment {
            writer.attribute("isComment", format_bool(true))?;
        }
        if self.is_breakpoint {
            writer.attribute("isBreakpoint", format_bool(true))?;
        }
        if let Some(created_on) = &self.created_on {
            writer.attribute("created", &format_rfc822(created_on))?;
        }
        if !self.categories.is_empty() {
            writer.attribute("category", &self.categories.join(","))?;
        }
        for (name, value) in self.attributes.iter() {
            writer.attribute(name, value)?;
        }
        self.extensions.write_attributes(writer)?;

        for outline in &self.outlines {
            outline.write_to(writer)?;
        }

        self.extensions.write_elements(writer)?;
        writer.end_element()
    }

    fn visit_extensions(&self, visitor: &mut dyn FnMut(&dyn SyndicationExtension)) {
        for extension in self.extensions.iter() {
            visitor(extension);
        }
        for outline in &self.outlines {
            outline.visit_extensions(visitor);
        }
    }
}
