//! BlogML posts.

use std::cmp::Ordering;
use std::fmt;

use super::attachment::BlogMlAttachment;
use super::comment::BlogMlComment;
use super::common::{start, BlogMlCommon};
use super::text::BlogMlTextConstruct;
use super::trackback::BlogMlTrackback;
use crate::compare::{
    compare_entities, compare_extensions, compare_optional_text, compare_text_sequence, impl_structural_ord,
};
use crate::entity::{load_children, Extensible, SyndicationEntity};
use crate::error::Result;
use crate::options::LoadOptions;
use crate::registry::{ExtensionList, SyndicationExtension};
use crate::values::{format_bool, normalize, parse_u64};
use crate::xml::{find_child, find_children, get_attribute, XmlElement, XmlWriter};

/// Kind of post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BlogMlPostType {
    Normal,
    Article,
}

impl BlogMlPostType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Article => "article",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "normal" => Some(Self::Normal),
            "article" => Some(Self::Article),
            _ => None,
        }
    }
}

impl fmt::Display for BlogMlPostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A blog post with its comments, trackbacks and attachments.
///
/// Categories and authors are referenced by identifier.
#[derive(Debug, Clone, Default)]
pub struct BlogMlPost {
    common: BlogMlCommon,
    url: Option<String>,
    post_type: Option<BlogMlPostType>,
    views: Option<u64>,
    content: Option<BlogMlTextConstruct>,
    name: Option<BlogMlTextConstruct>,
    excerpt: Option<BlogMlTextConstruct>,
    authors: Vec<String>,
    categories: Vec<String>,
    comments: Vec<BlogMlComment>,
    trackbacks: Vec<BlogMlTrackback>,
    attachments: Vec<BlogMlAttachment>,
    extensions: ExtensionList,
}

impl BlogMlPost {
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

    /// Address of the post (`post-url`). May be relative to the blog root.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn set_url(&mut self, url: &str) {
        self.url = normalize(url);
    }

    #[must_use]
    pub fn post_type(&self) -> Option<BlogMlPostType> {
        self.post_type
    }

    pub fn set_post_type(&mut self, post_type: Option<BlogMlPostType>) {
        self.post_type = post_type;
    }

    #[must_use]
    pub fn views(&self) -> Option<u64> {
        self.views
    }

    pub fn set_views(&mut self, views: Option<u64>) {
        self.views = views;
    }

    #[must_use]
    pub fn content(&self) -> Option<&BlogMlTextConstruct> {
        self.content.as_ref()
    }

    pub fn set_content(&mut self, content: Option<BlogMlTextConstruct>) {
        self.content = content;
    }

    /// Slug of the post (`post-name`).
    #[must_use]
    pub fn name(&self) -> Option<&BlogMlTextConstruct> {
        self.name.as_ref()
    }

    pub fn set_name(&mut self, name: Option<BlogMlTextConstruct>) {
        self.name = name;
    }

    #[must_use]
    pub fn excerpt(&self) -> Option<&BlogMlTextConstruct> {
        self.excerpt.as_ref()
    }

    pub fn set_excerpt(&mut self, excerpt: Option<BlogMlTextConstruct>) {
        self.excerpt = excerpt;
    }

    #[must_use]
    pub fn has_excerpt(&self) -> bool {
        self.excerpt.is_some()
    }

    /// Identifiers of the post's authors.
    #[must_use]
    pub fn authors(&self) -> &[String] {
        &self.authors
    }

    pub fn add_author(&mut self, reference: &str) {
        if let Some(reference) = normalize(reference) {
            self.authors.push(reference);
        }
    }

    /// Identifiers of the post's categories.
    #[must_use]
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn add_category(&mut self, reference: &str) {
        if let Some(reference) = normalize(reference) {
            self.categories.push(reference);
        }
    }

    #[must_use]
    pub fn comments(&self) -> &[BlogMlComment] {
        &self.comments
    }

    pub fn comments_mut(&mut self) -> &mut Vec<BlogMlComment> {
        &mut self.comments
    }

    #[must_use]
    pub fn trackbacks(&self) -> &[BlogMlTrackback] {
        &self.trackbacks
    }

    pub fn trackbacks_mut(&mut self) -> &mut Vec<BlogMlTrackback> {
        &mut self.trackbacks
    }

    #[must_use]
    pub fn attachments(&self) -> &[BlogMlAttachment] {
        &self.attachments
    }

    pub fn attachments_mut(&mut self) -> &mut Vec<BlogMlAttachment> {
        &mut self.attachments
    }

    #[must_use]
    pub fn compare(&self, other: &Self) -> Ordering {
        self.common
            .cmp(&other.common)
            .then_with(|| compare_optional_text(self.url(), other.url()))
            .then_with(|| self.post_type.cmp(&other.post_type))
            .then_with(|| self.views.cmp(&other.views))
            .then_with(|| self.content.cmp(&other.content))
            .then_with(|| self.name.cmp(&other.name))
            .then_with(|| self.excerpt.cmp(&other.excerpt))
            .then_with(|| compare_text_sequence(&self.authors, &other.authors))
            .then_with(|| compare_text_sequence(&self.categories, &other.categories))
            .then_with(|| compare_entities(&self.comments, &other.comments))
            .then_with(|| compare_entities(&self.trackbacks, &other.trackbacks))
            .then_with(|| compare_entities(&self.attachments, &other.attachments))
            .then_with(|| compare_extensions(&self.extensions, &other.extensions))
    }

    fn load_attributes(&mut self, source: &XmlElement) -> bool {
        let mut found = false;
        if let Some(url) = get_attribute(source, "post-url").and_then(normalize) {
            self.url = Some(url);
            found = true;
        }
        if let Some(post_type) = get_attribute(source, "type").and_then(BlogMlPostType::parse) {
            self.post_type = Some(post_type);
            found = true;
        }
        if let Some(views) = get_attribute(source, "views").and_then(parse_u64) {
            self.views = Some(views);
            found = true;
        }
        found
    }

    fn load_text(source: &XmlElement, local: &str, field: &mut Option<BlogMlTextConstruct>) -> bool {
        match find_child(source, local, source.namespace()).and_then(BlogMlTextConstruct::from_element) {
            Some(text) => {
                *field = Some(text);
                true
            }
            None => false,
        }
    }
}

/// Collect the `ref` attributes of `<container><item ref="..."/></container>`.
fn load_references(source: &XmlElement, container: &str, item: &str) -> Vec<String> {
    let namespace = source.namespace();
    find_child(source, container, namespace)
        .map(|container| {
            find_children(container, item, namespace)
                .filter_map(|e| get_attribute(e, "ref").and_then(normalize))
                .collect()
        })
        .unwrap_or_default()
}

fn write_references(writer: &mut XmlWriter<'_>, container: &str, item: &str, references: &[String]) -> Result<()> {
    if references.is_empty() {
        return Ok(());
    }
    start(writer, container)?;
    for reference in references {
        start(writer, item)?;
        writer.attribute("ref", reference)?;
        writer.end_element()?;
    }
    writer.end_element()
}

fn write_entities<E: SyndicationEntity>(writer: &mut XmlWriter<'_>, container: &str, entities: &[E]) -> Result<()> {
    if entities.is_empty() {
        return Ok(());
    }
    start(writer, container)?;
    for entity in entities {
        entity.write_to(writer)?;
    }
    writer.end_element()
}

impl_structural_ord!(BlogMlPost);

impl Extensible for BlogMlPost {
    fn extensions(&self) -> &ExtensionList {
        &self.extensions
    }

    fn extensions_mut(&mut self) -> &mut ExtensionList {
        &mut self.extensions
    }
}

impl SyndicationEntity for BlogMlPost {
    fn load_fields(&mut self, source: &XmlElement, options: Option<&LoadOptions>) -> bool {
        let namespace = source.namespace();
        let mut found = self.common.load(source);
        found |= self.load_attributes(source);
        found |= Self::load_text(source, "content", &mut self.content);
        found |= Self::load_text(source, "post-name", &mut self.name);
        found |= Self::load_text(source, "excerpt", &mut self.excerpt);

        self.authors = load_references(source, "authors", "author");
        self.categories = load_references(source, "categories", "category");
        found |= !self.authors.is_empty() || !self.categories.is_empty();

        if let Some(comments) = find_child(source, "comments", namespace) {
            self.comments = load_children(find_children(comments, "comment", namespace), options);
            found |= !self.comments.is_empty();
        }
        if let Some(trackbacks) = find_child(source, "trackbacks", namespace) {
            self.trackbacks = load_children(find_children(trackbacks, "trackback", namespace), options);
            found |= !self.trackbacks.is_empty();
        }
        if let Some(attachments) = find_child(source, "attachments", namespace) {
            self.attachments = load_children(find_children(attachments, "attachment", namespace), options);
            found |= !self.attachments.is_empty();
        }
        found
    }

    fn write_to(&self, writer: &mut XmlWriter<'_>) -> Result<()> {
        start(writer, "post")?;
        self.common.write_attributes(writer)?;
        if let Some(url) = &self.url {
            writer.attribute("post-url", url)?;
        }
        if let Some(post_type) = self.post_type {
            writer.attribute("type", post_type.as_str())?;
        }
        if self.has_excerpt() {
            writer.attribute("hasexcerpt", format_bool(true))?;
        }
        if let Some(views) = self.views {
            writer.attribute("views", &views.to_string())?;
        }
        self.extensions.write_attributes(writer)?;

        self.common.write_title(writer)?;
        if let Some(content) = &self.content {
            content.write(writer, "content")?;
        }
        if let Some(name) = &self.name {
            name.write(writer, "post-name")?;
        }
        if let Some(excerpt) = &self.excerpt {
            excerpt.write(writer, "excerpt")?;
        }
        write_references(writer, "authors", "author", &self.authors)?;
        write_references(writer, "categories", "category", &self.categories)?;
        write_entities(writer, "comments", &self.comments)?;
        write_entities(writer, "trackbacks", &self.trackbacks)?;
        write_entities(writer, "attachments", &self.attachments)?;

        self.extensions.write_elements(writer)?;
        writer.end_element()
    }

    fn visit_extensions(&self, visitor: &mut dyn FnMut(&dyn SyndicationExtension)) {
        for extension in self.extensions.iter() {
            visitor(extension);
        }
        for comment in &self.comments {
            comment.visit_extensions(visitor);
        }
        for trackback in &self.trackbacks {
            trackback.visit_extensions(visitor);
        }
        for attachment in &self.attachments {
            attachment.visit_extensions(visitor);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::parse_str;
    use pretty_assertions::assert_eq;

    const POST: &str = r#"<post xmlns="http://www.blogml.com/2006/09/BlogML" id="7" post-url="/2006/09/hello.aspx" type="normal" hasexcerpt="true" views="12">
        <title type="text"><![CDATA[Hello]]></title>
        <content type="html"><![CDATA[<p>First post</p>]]></content>
        <post-name type="text"><![CDATA[hello]]></post-name>
        <excerpt type="text"><![CDATA[First]]></excerpt>
        <authors><author ref="2100"/></authors>
        <categories><category ref="1"/><category ref=""/><category ref="3"/></categories>
        <comments>
            <comment id="c1" user-name="Ann" user-url="http://ann.example.com/">
                <title type="text"><![CDATA[re: Hello]]></title>
                <content type="text"><![CDATA[Nice]]></content>
            </comment>
            <comment/>
        </comments>
        <trackbacks><trackback id="t1" url="http://example.org/ping"/></trackbacks>
    </post>"#;

    #[test]
    fn test_load_post() {
        let mut post = BlogMlPost::new();
        assert!(post.load(&parse_str(POST).unwrap()));
        assert_eq!(post.common().id(), Some("7"));
        assert_eq!(post.url(), Some("/2006/09/hello.aspx"));
        assert_eq!(post.post_type(), Some(BlogMlPostType::Normal));
        assert_eq!(post.views(), Some(12));
        assert_eq!(post.content().map(BlogMlTextConstruct::content), Some("<p>First post</p>"));
        assert_eq!(post.authors(), &["2100"]);
        assert_eq!(post.categories(), &["1", "3"]);
        assert_eq!(post.comments().len(), 1);
        assert_eq!(post.comments()[0].user_name(), Some("Ann"));
        assert_eq!(post.trackbacks().len(), 1);
        assert!(post.has_excerpt());
    }

    #[test]
    fn test_round_trip() {
        let mut post = BlogMlPost::new();
        post.load(&parse_str(POST).unwrap());

        let mut buffer = Vec::new();
        {
            let mut writer = XmlWriter::new(&mut buffer);
            post.write_to(&mut writer).unwrap();
            writer.finish().unwrap();
        }
        let xml = String::from_utf8(buffer).unwrap();
        assert!(xml.starts_with(r#"<post xmlns="http://www.blogml.com/2006/09/BlogML" id="7""#));

        let mut reloaded = BlogMlPost::new();
        assert!(reloaded.load(&parse_str(&xml).unwrap()));
        assert_eq!(reloaded, post);
    }
}
