//! BlogML root document.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use url::Url;

use super::author::BlogMlAuthor;
use super::category::BlogMlCategory;
use super::common::start;
use super::post::BlogMlPost;
use super::text::BlogMlTextConstruct;
use crate::attributes::AttributeMap;
use crate::compare::{compare_entities, compare_extensions, compare_map, compare_optional_text, impl_structural_ord};
use crate::document::{LoadListeners, SyndicationDocument, SyndicationFormat};
use crate::entity::{load_children, Extensible, SyndicationEntity};
use crate::error::{Result, SyndicationError};
use crate::options::LoadOptions;
use crate::registry::{ExtensionList, SyndicationExtension};
use crate::values::{checked_date, format_rfc3339, normalize, parse_rfc3339, parse_url, truncate_to_seconds};
use crate::xml::{find_child, find_children, get_attribute, XmlElement, XmlWriter};

/// A BlogML 2.0 blog archive.
///
/// # Examples
/// ```
/// use syndication_xml::blogml::{BlogMlDocument, BlogMlPost, BlogMlTextConstruct};
/// use syndication_xml::SyndicationDocument;
///
/// let mut blog = BlogMlDocument::new();
/// blog.set_title(Some(BlogMlTextConstruct::text("Notes")));
/// let mut post = BlogMlPost::new();
/// post.common_mut().set_id("1");
/// blog.add_post(post);
///
/// let reloaded = BlogMlDocument::parse(&blog.to_xml().unwrap()).unwrap();
/// assert_eq!(reloaded.posts()[0].common().id(), Some("1"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct BlogMlDocument {
    created_on: Option<DateTime<Utc>>,
    root_url: Option<Url>,
    title: Option<BlogMlTextConstruct>,
    subtitle: Option<BlogMlTextConstruct>,
    authors: Vec<BlogMlAuthor>,
    extended_properties: AttributeMap,
    categories: Vec<BlogMlCategory>,
    posts: Vec<BlogMlPost>,
    extensions: ExtensionList,
    listeners: LoadListeners,
}

impl BlogMlDocument {
    /// Create a new empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
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
    pub fn root_url(&self) -> Option<&Url> {
        self.root_url.as_ref()
    }

    pub fn set_root_url(&mut self, url: Option<Url>) {
        self.root_url = url;
    }

    #[must_use]
    pub fn title(&self) -> Option<&BlogMlTextConstruct> {
        self.title.as_ref()
    }

    pub fn set_title(&mut self, title: Option<BlogMlTextConstruct>) {
        self.title = title;
    }

    #[must_use]
    pub fn subtitle(&self) -> Option<&BlogMlTextConstruct> {
        self.subtitle.as_ref()
    }

    pub fn set_subtitle(&mut self, subtitle: Option<BlogMlTextConstruct>) {
        self.subtitle = subtitle;
    }

    #[must_use]
    pub fn authors(&self) -> &[BlogMlAuthor] {
        &self.authors
    }

    pub fn add_author(&mut self, author: BlogMlAuthor) {
        self.authors.push(author);
    }

    /// Free-form blog settings (`<extended-properties>`).
    #[must_use]
    pub fn extended_properties(&self) -> &AttributeMap {
        &self.extended_properties
    }

    /// Set an extended property, replacing any value. The name is trimmed;
    /// the value is kept as given.
    ///
    /// # Errors
    /// Returns `EmptyArgument` when `name` is empty after trimming.
    pub fn set_extended_property(&mut self, name: &str, value: &str) -> Result<()> {
        let name = normalize(name).ok_or(SyndicationError::EmptyArgument { name: "name" })?;
        self.extended_properties.insert(name, value);
        Ok(())
    }

    pub fn remove_extended_property(&mut self, name: &str) -> Option<String> {
        self.extended_properties.remove(name.trim())
    }

    #[must_use]
    pub fn categories(&self) -> &[BlogMlCategory] {
        &self.categories
    }

    pub fn add_category(&mut self, category: BlogMlCategory) {
        self.categories.push(category);
    }

    #[must_use]
    pub fn posts(&self) -> &[BlogMlPost] {
        &self.posts
    }

    pub fn posts_mut(&mut self) -> &mut Vec<BlogMlPost> {
        &mut self.posts
    }

    pub fn add_post(&mut self, post: BlogMlPost) {
        self.posts.push(post);
    }

    /// Category with the given identifier.
    #[must_use]
    pub fn category(&self, id: &str) -> Option<&BlogMlCategory> {
        self.categories.iter().find(|c| c.common().id() == Some(id))
    }

    /// Author with the given identifier.
    #[must_use]
    pub fn author(&self, id: &str) -> Option<&BlogMlAuthor> {
        self.authors.iter().find(|a| a.common().id() == Some(id))
    }

    /// Structural comparison; load listeners are ignored.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Ordering {
        self.created_on
            .cmp(&other.created_on)
            .then_with(|| {
                compare_optional_text(
                    self.root_url.as_ref().map(Url::as_str),
                    other.root_url.as_ref().map(Url::as_str),
                )
            })
            .then_with(|| self.title.cmp(&other.title))
            .then_with(|| self.subtitle.cmp(&other.subtitle))
            .then_with(|| compare_entities(&self.authors, &other.authors))
            .then_with(|| compare_map(&self.extended_properties, &other.extended_properties, false))
            .then_with(|| compare_entities(&self.categories, &other.categories))
            .then_with(|| compare_entities(&self.posts, &other.posts))
            .then_with(|| compare_extensions(&self.extensions, &other.extensions))
    }

    fn load_properties(&mut self, properties: &XmlElement) -> bool {
        let mut found = false;
        for property in find_children(properties, "property", properties.namespace()) {
            let Some(name) = get_attribute(property, "name").and_then(normalize) else {
                continue;
            };
            let value = get_attribute(property, "value").unwrap_or_default();
            found |= self.extended_properties.insert_if_absent(name, value);
        }
        found
    }
}

impl_structural_ord!(BlogMlDocument);

impl Extensible for BlogMlDocument {
    fn extensions(&self) -> &ExtensionList {
        &self.extensions
    }

    fn extensions_mut(&mut self) -> &mut ExtensionList {
        &mut self.extensions
    }
}

impl SyndicationEntity for BlogMlDocument {
    fn load_fields(&mut self, source: &XmlElement, options: Option<&LoadOptions>) -> bool {
        let namespace = source.namespace();
        let mut found = false;

        if let Some(date) = get_attribute(source, "date-created").and_then(parse_rfc3339) {
            self.created_on = Some(truncate_to_seconds(date));
            found = true;
        }
        if let Some(url) = get_attribute(source, "root-url").and_then(parse_url) {
            self.root_url = Some(url);
            found = true;
        }
        if let Some(title) = find_child(source, "title", namespace).and_then(BlogMlTextConstruct::from_element) {
            self.title = Some(title);
            found = true;
        }
        if let Some(subtitle) = find_child(source, "sub-title", namespace).and_then(BlogMlTextConstruct::from_element) {
            self.subtitle = Some(subtitle);
            found = true;
        }
        if let Some(authors) = find_child(source, "authors", namespace) {
            self.authors = load_children(find_children(authors, "author", namespace), options);
            found |= !self.authors.is_empty();
        }
        if let Some(properties) = find_child(source, "extended-properties", namespace) {
            found |= self.load_properties(properties);
        }
        if let Some(categories) = find_child(source, "categories", namespace) {
            self.categories = load_children(find_children(categories, "category", namespace), options);
            found |= !self.categories.is_empty();
        }
        if let Some(posts) = find_child(source, "posts", namespace) {
            self.posts = load_children(find_children(posts, "post", namespace), options);
            found |= !self.posts.is_empty();
        }
        found
    }

    fn write_to(&self, writer: &mut XmlWriter<'_>) -> Result<()> {
        start(writer, Self::FORMAT.root_name())?;
        if let Some(url) = &self.root_url {
            writer.attribute("root-url", url.as_str())?;
        }
        if let Some(date) = &self.created_on {
            writer.attribute("date-created", &format_rfc3339(date))?;
        }
        self.extensions.write_attributes(writer)?;

        if let Some(title) = &self.title {
            title.write(writer, "title")?;
        }
        if let Some(subtitle) = &self.subtitle {
            subtitle.write(writer, "sub-title")?;
        }
        if !self.authors.is_empty() {
            start(writer, "authors")?;
            for author in &self.authors {
                author.write_to(writer)?;
            }
            writer.end_element()?;
        }
        if !self.extended_properties.is_empty() {
            start(writer, "extended-properties")?;
            for (name, value) in self.extended_properties.iter() {
                start(writer, "property")?;
                writer.attribute("name", name)?;
                writer.attribute("value", value)?;
                writer.end_element()?;
            }
            writer.end_element()?;
        }
        if !self.categories.is_empty() {
            start(writer, "categories")?;
            for category in &self.categories {
                category.write_to(writer)?;
            }
            writer.end_element()?;
        }
        if !self.posts.is_empty() {
            start(writer, "posts")?;
            for post in &self.posts {
                post.write_to(writer)?;
            }
            writer.end_element()?;
        }

        self.extensions.write_elements(writer)?;
        writer.end_element()
    }

    fn visit_extensions(&self, visitor: &mut dyn FnMut(&dyn SyndicationExtension)) {
        for extension in self.extensions.iter() {
            visitor(extension);
        }
        for author in &self.authors {
            author.visit_extensions(visitor);
        }
        for category in &self.categories {
            category.visit_extensions(visitor);
        }
        for post in &self.posts {
            post.visit_extensions(visitor);
        }
    }
}

impl SyndicationDocument for BlogMlDocument {
    const FORMAT: SyndicationFormat = SyndicationFormat::BlogMl;

    fn listeners(&self) -> &LoadListeners {
        &self.listeners
    }

    fn listeners_mut(&mut self) -> &mut LoadListeners {
        &mut self.listeners
    }
}
