//! OPML `<head>` metadata.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use url::Url;

use super::owner::OpmlOwner;
use super::window::OpmlWindow;
use crate::compare::{compare_entities, compare_extensions, compare_optional_text, impl_structural_ord};
use crate::entity::{Extensible, SyndicationEntity};
use crate::error::Result;
use crate::options::LoadOptions;
use crate::registry::ExtensionList;
use crate::values::{
    checked_date, format_rfc822, join_list, normalize, parse_i32, parse_list, parse_rfc822, parse_url,
    truncate_to_seconds,
};
use crate::xml::{get_text, XmlElement, XmlWriter};

/// Document metadata.
#[derive(Debug, Clone, Default)]
pub struct OpmlHead {
    title: Option<String>,
    created_on: Option<DateTime<Utc>>,
    modified_on: Option<DateTime<Utc>>,
    owner: OpmlOwner,
    docs: Option<Url>,
    expansion_state: Vec<i32>,
    vertical_scroll_state: Option<i32>,
    window: OpmlWindow,
    extensions: ExtensionList,
}

impl OpmlHead {
    /// Create a new empty head.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Set the title. Empty input clears it.
    pub fn set_title(&mut self, title: &str) {
        self.title = normalize(title);
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
        self.created_on = checked_date("dateCreated", date)?;
        Ok(())
    }

    #[must_use]
    pub fn modified_on(&self) -> Option<DateTime<Utc>> {
        self.modified_on
    }

    /// Set the modification date, truncated to whole seconds.
    ///
    /// # Errors
    /// Returns `InvalidArgument` for years outside 1-9999.
    pub fn set_modified_on(&mut self, date: Option<DateTime<Utc>>) -> Result<()> {
        self.modified_on = checked_date("dateModified", date)?;
        Ok(())
    }

    #[must_use]
    pub fn owner(&self) -> &OpmlOwner {
        &self.owner
    }

    pub fn owner_mut(&mut self) -> &mut OpmlOwner {
        &mut self.owner
    }

    /// Location of the format documentation.
    #[must_use]
    pub fn docs(&self) -> Option<&Url> {
        self.docs.as_ref()
    }

    pub fn set_docs(&mut self, docs: Option<Url>) {
        self.docs = docs;
    }

    /// Line numbers of expanded outlines, in display order.
    #[must_use]
    pub fn expansion_state(&self) -> &[i32] {
        &self.expansion_state
    }

    pub fn set_expansion_state(&mut self, lines: impl IntoIterator<Item = i32>) {
        self.expansion_state = lines.into_iter().collect();
    }

    /// Line number of the outline displayed on the first line of the window.
    #[must_use]
    pub fn vertical_scroll_state(&self) -> Option<i32> {
        self.vertical_scroll_state
    }

    pub fn set_vertical_scroll_state(&mut self, line: Option<i32>) {
        self.vertical_scroll_state = line;
    }

    #[must_use]
    pub fn window(&self) -> &OpmlWindow {
        &self.window
    }

    pub fn window_mut(&mut self) -> &mut OpmlWindow {
        &mut self.window
    }

    /// Structural comparison; text compares case-insensitively.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Ordering {
        compare_optional_text(self.title(), other.title())
            .then_with(|| self.created_on.cmp(&other.created_on))
            .then_with(|| self.modified_on.cmp(&other.modified_on))
            .then_with(|| self.owner.cmp(&other.owner))
            .then_with(|| {
                compare_optional_text(
                    self.docs.as_ref().map(Url::as_str),
                    other.docs.as_ref().map(Url::as_str),
                )
            })
            .then_with(|| compare_entities(&self.expansion_state, &other.expansion_state))
            .then_with(|| self.vertical_scroll_state.cmp(&other.vertical_scroll_state))
            .then_with(|| self.window.cmp(&other.window))
            .then_with(|| compare_extensions(&self.extensions, &other.extensions))
    }

    fn load_child_element(&mut self, child: &XmlElement) -> bool {
        let text = get_text(child);
        match child.local_name() {
            "title" => set_if_some(&mut self.title, normalize(&text)),
            "dateCreated" => set_if_some(&mut self.created_on, parse_rfc822(&text).map(truncate_to_seconds)),
            "dateModified" => set_if_some(&mut self.modified_on, parse_rfc822(&text).map(truncate_to_seconds)),
            "docs" => set_if_some(&mut self.docs, parse_url(&text)),
            "expansionState" => {
                let lines = parse_list(&text, parse_i32);
                if lines.is_empty() {
                    return false;
                }
                self.expansion_state = lines;
                true
            }
            "vertScrollState" => set_if_some(&mut self.vertical_scroll_state, parse_i32(&text)),
            name if name.starts_with("owner") => self.owner.load_element(child),
            name if name.starts_with("window") => self.window.load_element(child),
            name => {
                tracing::trace!(element = name, "Unknown OPML head element, skipping");
                false
            }
        }
    }
}

impl_structural_ord!(OpmlHead);

impl Extensible for OpmlHead {
    fn extensions(&self) -> &ExtensionList {
        &self.extensions
    }

    fn extensions_mut(&mut self) -> &mut ExtensionList {
        &mut self.extensions
    }
}

impl SyndicationEntity for OpmlHead {
    fn load_fields(&mut self, source: &XmlElement, _options: Option<&LoadOptions>) -> bool {
        let namespace = source.namespace();
        let mut found = false;
        for child in source.children().filter(|c| c.namespace() == namespace) {
            found |= self.load_child_element(child);
        }
        found
    }

    fn write_to(&self, writer: &mut XmlWriter<'_>) -> Result<()> {
        writer.start_element("head")?;
        self.extensions.write_attributes(writer)?;

        if let Some(title) = &self.title {
            writer.element_text("title", title)?;
        }
        if let Some(created_on) = &self.created_on {
            writer.element_text("dateCreated", &format_rfc822(created_on))?;
        }
        if let Some(modified_on) = &self.modified_on {
            writer.element_text("dateModified", &format_rfc822(modified_on))?;
        }
        self.owner.write(writer)?;
        if let Some(docs) = &self.docs {
            writer.element_text("docs", docs.as_str())?;
        }
        if !self.expansion_state.is_empty() {
            writer.element_text("expansionState", &join_list(&self.expansion_state))?;
        }
        if let Some(line) = self.vertical_scroll_state {
            writer.element_text("vertScrollState", &line.to_string())?;
        }
        self.window.write(writer)?;

        self.extensions.write_elements(writer)?;
        writer.end_element()
    }
}

fn set_if_some<T>(field: &mut Option<T>, value: Option<T>) -> bool {
    let found = value.is_some();
    if found {
        *field = value;
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::parse_str;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    const HEAD: &str = r#"<head>
        <title>States</title>
        <dateCreated>Tue, 15 Mar 2005 16:35:45 GMT</dateCreated>
        <ownerName>Dave Winer</ownerName>
        <docs>http://opml.org/spec2.opml</docs>
        <expansionState>1, 6,13,junk</expansionState>
        <vertScrollState>1</vertScrollState>
        <windowTop>61</windowTop>
        <windowRight>731</windowRight>
    </head>"#;

    #[test]
    fn test_load_head() {
        let mut head = OpmlHead::new();
        assert!(head.load(&parse_str(HEAD).unwrap()));
        assert_eq!(head.title(), Some("States"));
        assert_eq!(
            head.created_on(),
            Some(Utc.with_ymd_and_hms(2005, 3, 15, 16, 35, 45).unwrap())
        );
        assert_eq!(head.owner().name(), Some("Dave Winer"));
        assert_eq!(head.expansion_state(), &[1, 6, 13]);
        assert_eq!(head.window().top, Some(61));
        assert_eq!(head.window().right, Some(731));
        assert!(head.window().left.is_none());
    }

    #[test]
    fn test_round_trip() {
        let mut head = OpmlHead::new();
        assert!(head.load(&parse_str(HEAD).unwrap()));

        let mut buffer = Vec::new();
        {
            let mut writer = XmlWriter::new(&mut buffer);
            head.write_to(&mut writer).unwrap();
            writer.finish().unwrap();
        }
        let xml = String::from_utf8(buffer).unwrap();
        assert!(xml.contains("<expansionState>1,6,13</expansionState>"));

        let mut reloaded = OpmlHead::new();
        assert!(reloaded.load(&parse_str(&xml).unwrap()));
        assert_eq!(reloaded, head);
    }

    #[test]
    fn test_unknown_children_find_nothing() {
        let mut head = OpmlHead::new();
        assert!(!head.load(&parse_str("<head foo=\"1\"><bar>x</bar><title></title></head>").unwrap()));
        assert_eq!(head, OpmlHead::new());
    }

    #[test]
    fn test_empty_head_writes_no_children() {
        let mut buffer = Vec::new();
        {
            let mut writer = XmlWriter::new(&mut buffer);
            OpmlHead::new().write_to(&mut writer).unwrap();
            writer.finish().unwrap();
        }
        assert_eq!(String::from_utf8(buffer).unwrap(), "<head/>");
    }
}
