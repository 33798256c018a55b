//! RSD `<api>` entries.

use std::cmp::Ordering;

use url::Url;

use crate::attributes::AttributeMap;
use crate::compare::{compare_extensions, compare_map, compare_optional_text, compare_text, impl_structural_ord};
use crate::config::RSD_NAMESPACE;
use crate::entity::{Extensible, SyndicationEntity};
use crate::error::{Result, SyndicationError};
use crate::options::LoadOptions;
use crate::registry::ExtensionList;
use crate::values::{format_bool, normalize, parse_bool, parse_url};
use crate::xml::{find_child, find_children, get_attribute, get_text, XmlElement, XmlWriter};

/// A blogging API offered by the engine.
///
/// # Examples
/// ```
/// use syndication_xml::rsd::RsdApplicationInterface;
///
/// let mut api = RsdApplicationInterface::new("MetaWeblog").unwrap();
/// api.set_preferred(true);
/// api.set_blog_id("1");
/// assert!(api.is_preferred());
/// assert!(api.set_name("").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RsdApplicationInterface {
    name: String,
    preferred: bool,
    link: Option<Url>,
    blog_id: String,
    documentation: Option<Url>,
    notes: Option<String>,
    settings: AttributeMap,
    extensions: ExtensionList,
}

impl RsdApplicationInterface {
    /// Create an interface with the given API name.
    ///
    /// # Errors
    /// Returns `EmptyArgument` when `name` is empty after trimming.
    pub fn new(name: &str) -> Result<Self> {
        let mut interface = Self::default();
        interface.set_name(name)?;
        Ok(interface)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the API name.
    ///
    /// # Errors
    /// Returns `EmptyArgument` when `name` is empty after trimming; the
    /// interface is left unchanged.
    pub fn set_name(&mut self, name: &str) -> Result<()> {
        self.name = normalize(name).ok_or(SyndicationError::EmptyArgument { name: "name" })?;
        Ok(())
    }

    #[must_use]
    pub fn is_preferred(&self) -> bool {
        self.preferred
    }

    pub fn set_preferred(&mut self, preferred: bool) {
        self.preferred = preferred;
    }

    /// Endpoint of the API.
    #[must_use]
    pub fn link(&self) -> Option<&Url> {
        self.link.as_ref()
    }

    pub fn set_link(&mut self, link: Option<Url>) {
        self.link = link;
    }

    /// Blog identifier passed to the API. Empty when unknown.
    #[must_use]
    pub fn blog_id(&self) -> &str {
        &self.blog_id
    }

    pub fn set_blog_id(&mut self, blog_id: &str) {
        self.blog_id = blog_id.trim().to_string();
    }

    /// Location of the API documentation (`<settings><docs>`).
    #[must_use]
    pub fn documentation(&self) -> Option<&Url> {
        self.documentation.as_ref()
    }

    pub fn set_documentation(&mut self, documentation: Option<Url>) {
        self.documentation = documentation;
    }

    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// Set the notes. Empty input clears them.
    pub fn set_notes(&mut self, notes: &str) {
        self.notes = normalize(notes);
    }

    /// Named API settings in document order.
    #[must_use]
    pub fn settings(&self) -> &AttributeMap {
        &self.settings
    }

    /// Set a named setting, replacing any value. Name and value are trimmed.
    ///
    /// # Errors
    /// Returns `EmptyArgument` when `name` is empty after trimming.
    pub fn set_setting(&mut self, name: &str, value: &str) -> Result<()> {
        let name = normalize(name).ok_or(SyndicationError::EmptyArgument { name: "name" })?;
        self.settings.insert(name, value.trim());
        Ok(())
    }

    pub fn remove_setting(&mut self, name: &str) -> Option<String> {
        self.settings.remove(name.trim())
    }

    fn has_settings(&self) -> bool {
        self.documentation.is_some() || self.notes.is_some() || !self.settings.is_empty()
    }

    /// Structural comparison; text compares case-insensitively.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Ordering {
        compare_text(&self.name, &other.name, true)
            .then_with(|| self.preferred.cmp(&other.preferred))
            .then_with(|| compare_optional_text(self.link.as_ref().map(Url::as_str), other.link.as_ref().map(Url::as_str)))
            .then_with(|| compare_text(&self.blog_id, &other.blog_id, true))
            .then_with(|| {
                compare_optional_text(
                    self.documentation.as_ref().map(Url::as_str),
                    other.documentation.as_ref().map(Url::as_str),
                )
            })
            .then_with(|| compare_optional_text(self.notes(), other.notes()))
            .then_with(|| compare_map(&self.settings, &other.settings, true))
            .then_with(|| compare_extensions(&self.extensions, &other.extensions))
    }

    fn load_attributes(&mut self, source: &XmlElement) -> bool {
        let mut found = false;
        if let Some(name) = get_attribute(source, "name").and_then(normalize) {
            self.name = name;
            found = true;
        }
        if let Some(preferred) = get_attribute(source, "preferred").and_then(parse_bool) {
            self.preferred = preferred;
            found = true;
        }
        if let Some(link) = get_attribute(source, "apiLink").and_then(parse_url) {
            self.link = Some(link);
            found = true;
        }
        if let Some(blog_id) = get_attribute(source, "blogID").and_then(normalize) {
            self.blog_id = blog_id;
            found = true;
        }
        found
    }

    fn load_settings(&mut self, settings: &XmlElement) -> bool {
        let namespace = settings.namespace();
        let mut found = false;

        if let Some(docs) = find_child(settings, "docs", namespace).and_then(|e| parse_url(&get_text(e))) {
            self.documentation = Some(docs);
            found = true;
        }
        if let Some(notes) = find_child(settings, "notes", namespace).and_then(|e| normalize(&get_text(e))) {
            self.notes = Some(notes);
            found = true;
        }
        for setting in find_children(settings, "setting", namespace) {
            let Some(name) = get_attribute(setting, "name").and_then(normalize) else {
                continue;
            };
            found |= self.settings.insert_if_absent(name, get_text(setting));
        }
        found
    }
}

impl_structural_ord!(RsdApplicationInterface);

impl Extensible for RsdApplicationInterface {
    fn extensions(&self) -> &ExtensionList {
        &self.extensions
    }

    fn extensions_mut(&mut self) -> &mut ExtensionList {
        &mut self.extensions
    }
}

impl SyndicationEntity for RsdApplicationInterface {
    fn load_fields(&mut self, source: &XmlElement, _options: Option<&LoadOptions>) -> bool {
        let mut found = self.load_attributes(source);
        if let Some(settings) = find_child(source, "settings", source.namespace()) {
            found |= self.load_settings(settings);
        }
        found
    }

    fn write_to(&self, writer: &mut XmlWriter<'_>) -> Result<()> {
        writer.start_element_ns(None, "api", RSD_NAMESPACE)?;
        writer.attribute("name", &self.name)?;
        writer.attribute("preferred", format_bool(self.preferred))?;
        if let Some(link) = &self.link {
            writer.attribute("apiLink", link.as_str())?;
        }
        writer.attribute("blogID", &self.blog_id)?;
        self.extensions.write_attributes(writer)?;

        if self.has_settings() {
            writer.start_element_ns(None, "settings", RSD_NAMESPACE)?;
            if let Some(docs) = &self.documentation {
                writer.element_text_ns(None, "docs", RSD_NAMESPACE, docs.as_str())?;
            }
            if let Some(notes) = &self.notes {
                writer.element_text_ns(None, "notes", RSD_NAMESPACE, notes)?;
            }
            for (name, value) in self.settings.iter() {
                writer.start_element_ns(None, "setting", RSD_NAMESPACE)?;
                writer.attribute("name", name)?;
                writer.text(value)?;
                writer.end_element()?;
            }
            writer.end_element()?;
        }

        self.extensions.write_elements(writer)?;
        writer.end_element()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::parse_str;
    use pretty_assertions::assert_eq;

    fn render(interface: &RsdApplicationInterface) -> String {
        let mut buffer = Vec::new();
        {
            let mut writer = XmlWriter::new(&mut buffer);
            interface.write_to(&mut writer).unwrap();
            writer.finish().unwrap();
        }
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_load_api() {
        let xml = r#"<api name="Blogger" preferred="false" apiLink="http://example.com/api" blogID="42">
            <settings>
                <docs>http://example.com/docs</docs>
                <notes>No titles</notes>
                <setting name="titles">false</setting>
                <setting name="titles">true</setting>
                <setting>orphan</setting>
            </settings>
        </api>"#;
        let mut api = RsdApplicationInterface::default();
        assert!(api.load(&parse_str(xml).unwrap()));
        assert_eq!(api.name(), "Blogger");
        assert_eq!(api.blog_id(), "42");
        assert_eq!(api.link().map(Url::as_str), Some("http://example.com/api"));
        assert_eq!(api.notes(), Some("No titles"));
        assert_eq!(api.settings().get("titles"), Some("false"));
        assert_eq!(api.settings().len(), 1);
    }

    #[test]
    fn test_required_attributes_always_written() {
        let api = RsdApplicationInterface::new("MetaWeblog").unwrap();
        assert_eq!(
            render(&api),
            r#"<api xmlns="http://archipelago.phrasewise.com/rsd" name="MetaWeblog" preferred="false" blogID=""/>"#
        );
    }

    #[test]
    fn test_settings_written_when_present() {
        let mut api = RsdApplicationInterface::new("Atom").unwrap();
        api.set_notes("beta");
        api.set_setting("drafts", "yes").unwrap();
        let xml = render(&api);
        assert!(xml.contains("<settings><notes>beta</notes><setting name=\"drafts\">yes</setting></settings>"));
    }

    #[test]
    fn test_unknown_content_finds_nothing() {
        let mut api = RsdApplicationInterface::default();
        assert!(!api.load(&parse_str(r#"<api foo="bar"><settings><x/></settings></api>"#).unwrap()));
    }

    #[test]
    fn test_settings_are_normalized_for_round_trip() {
        let mut api = RsdApplicationInterface::new("Blogger").unwrap();
        api.set_setting(" key ", " v ").unwrap();
        api.set_setting("blank", "   ").unwrap();
        assert!(matches!(
            api.set_setting("  ", "x"),
            Err(SyndicationError::EmptyArgument { name: "name" })
        ));
        assert_eq!(api.settings().get("key"), Some("v"));

        let mut reloaded = RsdApplicationInterface::default();
        assert!(reloaded.load(&parse_str(&render(&api)).unwrap()));
        assert_eq!(reloaded, api);
        assert_eq!(reloaded.settings().get("blank"), Some(""));

        assert_eq!(reloaded.remove_setting("key").as_deref(), Some("v"));
        assert_eq!(reloaded.settings().len(), 1);
    }
}
