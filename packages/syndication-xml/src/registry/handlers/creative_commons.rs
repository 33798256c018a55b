//! Creative Commons license extension.

use url::Url;

use crate::config::CREATIVE_COMMONS_NAMESPACE;
use crate::error::Result;
use crate::registry::SyndicationExtension;
use crate::values::parse_url;
use crate::xml::{get_text, XmlElement, XmlWriter};

/// License URLs from `<creativeCommons:license>` elements, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreativeCommonsExtension {
    pub licenses: Vec<Url>,
}

impl CreativeCommonsExtension {
    /// Create an extension with a single license.
    #[must_use]
    pub fn with_license(license: Url) -> Self {
        Self {
            licenses: vec![license],
        }
    }
}

impl SyndicationExtension for CreativeCommonsExtension {
    fn namespace(&self) -> &str {
        CREATIVE_COMMONS_NAMESPACE
    }

    fn prefix(&self) -> &str {
        "creativeCommons"
    }

    fn name(&self) -> &str {
        "Creative Commons"
    }

    fn load(&mut self, source: &XmlElement) -> bool {
        let before = self.licenses.len();
        self.licenses.extend(
            source
                .children()
                .filter(|c| {
                    c.namespace() == Some(CREATIVE_COMMONS_NAMESPACE) && c.local_name() == "license"
                })
                .filter_map(|c| parse_url(&get_text(c))),
        );
        self.licenses.len() > before
    }

    fn write_elements(&self, writer: &mut XmlWriter<'_>) -> Result<()> {
        for license in &self.licenses {
            writer.element_text_ns(
                Some(self.prefix()),
                "license",
                CREATIVE_COMMONS_NAMESPACE,
                license.as_str(),
            )?;
        }
        Ok(())
    }

    fn clone_box(&self) -> Box<dyn SyndicationExtension> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::parse_str;

    #[test]
    fn test_load_licenses_in_order() {
        let source = parse_str(
            r#"<outline xmlns:cc="http://backend.userland.com/creativeCommonsRssModule">
                <cc:license>http://creativecommons.org/licenses/by/4.0/</cc:license>
                <cc:license>not a url</cc:license>
                <cc:license>http://creativecommons.org/licenses/by-sa/4.0/</cc:license>
            </outline>"#,
        )
        .unwrap();

        let mut cc = CreativeCommonsExtension::default();
        assert!(cc.load(&source));
        assert_eq!(cc.licenses.len(), 2);
        assert!(cc.licenses[1].as_str().ends_with("by-sa/4.0/"));
    }
}
