//! Dublin Core element set extension.

use std::cmp::Ordering;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::compare::{compare_optional_text, extension_fragment};
use crate::config::DUBLIN_CORE_NAMESPACE;
use crate::error::Result;
use crate::registry::SyndicationExtension;
use crate::values::{normalize, parse_rfc3339, truncate_to_seconds};
use crate::xml::{get_text, XmlElement, XmlWriter};

/// The fifteen Dublin Core element-set properties.
///
/// Text values are trimmed on load; empty elements are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DublinCoreExtension {
    pub title: Option<String>,
    pub creator: Option<String>,
    pub subject: Option<String>,
    pub description: Option<String>,
    pub publisher: Option<String>,
    pub contributor: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub resource_type: Option<String>,
    pub format: Option<String>,
    pub identifier: Option<String>,
    pub source: Option<String>,
    pub language: Option<String>,
    pub relation: Option<String>,
    pub coverage: Option<String>,
    pub rights: Option<String>,
}

impl DublinCoreExtension {
    /// Create a new empty extension.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Text-valued properties paired with their element names, in schema order.
    fn text_fields(&self) -> [(&'static str, Option<&str>); 14] {
        [
            ("title", self.title.as_deref()),
            ("creator", self.creator.as_deref()),
            ("subject", self.subject.as_deref()),
            ("description", self.description.as_deref()),
            ("publisher", self.publisher.as_deref()),
            ("contributor", self.contributor.as_deref()),
            ("type", self.resource_type.as_deref()),
            ("format", self.format.as_deref()),
            ("identifier", self.identifier.as_deref()),
            ("source", self.source.as_deref()),
            ("language", self.language.as_deref()),
            ("relation", self.relation.as_deref()),
            ("coverage", self.coverage.as_deref()),
            ("rights", self.rights.as_deref()),
        ]
    }

    fn text_field_mut(&mut self, name: &str) -> Option<&mut Option<String>> {
        let field = match name {
            "title" => &mut self.title,
            "creator" => &mut self.creator,
            "subject" => &mut self.subject,
            "description" => &mut self.description,
            "publisher" => &mut self.publisher,
            "contributor" => &mut self.contributor,
            "type" => &mut self.resource_type,
            "format" => &mut self.format,
            "identifier" => &mut self.identifier,
            "source" => &mut self.source,
            "language" => &mut self.language,
            "relation" => &mut self.relation,
            "coverage" => &mut self.coverage,
            "rights" => &mut self.rights,
            _ => return None,
        };
        Some(field)
    }

    /// Set the date, truncated to whole seconds.
    pub fn set_date(&mut self, date: Option<DateTime<Utc>>) {
        self.date = date.map(truncate_to_seconds);
    }
}

impl SyndicationExtension for DublinCoreExtension {
    fn namespace(&self) -> &str {
        DUBLIN_CORE_NAMESPACE
    }

    fn prefix(&self) -> &str {
        "dc"
    }

    fn name(&self) -> &str {
        "Dublin Core"
    }

    fn load(&mut self, source: &XmlElement) -> bool {
        let mut found = false;
        for child in source
            .children()
            .filter(|c| c.namespace() == Some(DUBLIN_CORE_NAMESPACE))
        {
            let text = get_text(child);
            if child.local_name() == "date" {
                if let Some(date) = parse_rfc3339(&text) {
                    self.date = Some(date);
                    found = true;
                }
                continue;
            }
            match (self.text_field_mut(child.local_name()), normalize(&text)) {
                (Some(field), Some(value)) => {
                    *field = Some(value);
                    found = true;
                }
                (None, _) => {
                    tracing::trace!(element = child.local_name(), "Unknown Dublin Core element, skipping");
                }
                (Some(_), None) => {}
            }
        }
        found
    }

    fn write_elements(&self, writer: &mut XmlWriter<'_>) -> Result<()> {
        let prefix = Some(self.prefix());
        for (name, value) in self.text_fields() {
            if let Some(value) = value {
                writer.element_text_ns(prefix, name, DUBLIN_CORE_NAMESPACE, value)?;
            }
        }
        if let Some(date) = &self.date {
            let text = date.to_rfc3339_opts(SecondsFormat::AutoSi, true);
            writer.element_text_ns(prefix, "date", DUBLIN_CORE_NAMESPACE, &text)?;
        }
        Ok(())
    }

    fn compare_content(&self, other: &dyn SyndicationExtension) -> Ordering {
        let Some(other) = other.as_any().downcast_ref::<Self>() else {
            return extension_fragment(self).cmp(&extension_fragment(other));
        };
        self.text_fields()
            .iter()
            .zip(other.text_fields().iter())
            .map(|((_, a), (_, b))| compare_optional_text(*a, *b))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
            .then_with(|| self.date.cmp(&other.date))
    }

    fn clone_box(&self) -> Box<dyn SyndicationExtension> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::parse_str;
    use chrono::TimeZone;

    #[test]
    fn test_load_reads_only_dublin_core_elements() {
        let source = parse_str(
            r#"<head xmlns:dc="http://purl.org/dc/elements/1.1/">
                <title>Not mine</title>
                <dc:creator> Ann </dc:creator>
                <dc:date>2024-01-02T03:04:05Z</dc:date>
                <dc:unknown>x</dc:unknown>
            </head>"#,
        )
        .unwrap();

        let mut dc = DublinCoreExtension::new();
        assert!(dc.load(&source));
        assert_eq!(dc.creator.as_deref(), Some("Ann"));
        assert!(dc.title.is_none());
        assert_eq!(dc.date, Some(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()));
    }

    #[test]
    fn test_load_without_content_finds_nothing() {
        let source = parse_str("<head><title>x</title></head>").unwrap();
        assert!(!DublinCoreExtension::new().load(&source));
    }

    #[test]
    fn test_write_round_trip() {
        let mut dc = DublinCoreExtension::new();
        dc.rights = Some("CC-BY".to_string());
        dc.resource_type = Some("Text".to_string());

        let mut buffer = Vec::new();
        {
            let mut writer = XmlWriter::new(&mut buffer);
            writer.start_element("head").unwrap();
            writer
                .declare_namespace(Some("dc"), DUBLIN_CORE_NAMESPACE)
                .unwrap();
            dc.write_elements(&mut writer).unwrap();
            writer.end_element().unwrap();
            writer.finish().unwrap();
        }
        let xml = String::from_utf8(buffer).unwrap();
        assert!(xml.contains("<dc:type>Text</dc:type>"));

        let mut loaded = DublinCoreExtension::new();
        assert!(loaded.load(&parse_str(&xml).unwrap()));
        assert_eq!(loaded, dc);
    }

    #[test]
    fn test_sub_second_date_survives_reload() {
        let mut dc = DublinCoreExtension::new();
        dc.date = Some(Utc.timestamp_millis_opt(1_700_000_000_500).unwrap());

        let fragment = extension_fragment(&dc);
        assert!(fragment.contains(">2023-11-14T22:13:20.500Z</dc:date>"));

        let mut loaded = DublinCoreExtension::new();
        assert!(loaded.load(&parse_str(&fragment).unwrap()));
        assert_eq!(loaded.date, dc.date);
        assert_eq!(loaded.compare_content(&dc), Ordering::Equal);
    }

    #[test]
    fn test_compare_content_sees_field_values() {
        let mut ann = DublinCoreExtension::new();
        ann.creator = Some("Ann".to_string());
        let mut bob = DublinCoreExtension::new();
        bob.creator = Some("Bob".to_string());
        let mut shouting = DublinCoreExtension::new();
        shouting.creator = Some("ANN".to_string());

        assert_eq!(ann.compare_content(&bob), Ordering::Less);
        assert_eq!(ann.compare_content(&shouting), Ordering::Equal);
    }
}
