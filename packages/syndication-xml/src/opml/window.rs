//! Display window of an OPML document.

use std::cmp::Ordering;

use crate::compare::impl_structural_ord;
use crate::error::Result;
use crate::values::parse_i32;
use crate::xml::{get_text, XmlElement, XmlWriter};

/// Pixel position of the window the outline is displayed in.
///
/// Stored as `windowTop`, `windowLeft`, `windowBottom` and `windowRight` in
/// `<head>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpmlWindow {
    pub top: Option<i32>,
    pub left: Option<i32>,
    pub bottom: Option<i32>,
    pub right: Option<i32>,
}

impl OpmlWindow {
    /// Create a window with all four edges set.
    #[must_use]
    pub fn new(top: i32, left: i32, bottom: i32, right: i32) -> Self {
        Self {
            top: Some(top),
            left: Some(left),
            bottom: Some(bottom),
            right: Some(right),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.top.is_none() && self.left.is_none() && self.bottom.is_none() && self.right.is_none()
    }

    fn fields(&self) -> [(&'static str, Option<i32>); 4] {
        [
            ("windowTop", self.top),
            ("windowLeft", self.left),
            ("windowBottom", self.bottom),
            ("windowRight", self.right),
        ]
    }

    pub(crate) fn load_element(&mut self, element: &XmlElement) -> bool {
        let field = match element.local_name() {
            "windowTop" => &mut self.top,
            "windowLeft" => &mut self.left,
            "windowBottom" => &mut self.bottom,
            "windowRight" => &mut self.right,
            _ => return false,
        };
        match parse_i32(&get_text(element)) {
            Some(value) => {
                *field = Some(value);
                true
            }
            None => false,
        }
    }

    pub(crate) fn write(&self, writer: &mut XmlWriter<'_>) -> Result<()> {
        for (name, value) in self.fields() {
            if let Some(value) = value {
                writer.element_text(name, &value.to_string())?;
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn compare(&self, other: &Self) -> Ordering {
        self.top
            .cmp(&other.top)
            .then_with(|| self.left.cmp(&other.left))
            .then_with(|| self.bottom.cmp(&other.bottom))
            .then_with(|| self.right.cmp(&other.right))
    }
}

impl_structural_ord!(OpmlWindow);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::parse_str;

    #[test]
    fn test_load_element_skips_bad_numbers() {
        let mut window = OpmlWindow::default();
        assert!(window.load_element(&parse_str("<windowTop> 61 </windowTop>").unwrap()));
        assert!(!window.load_element(&parse_str("<windowLeft>wide</windowLeft>").unwrap()));
        assert_eq!(window.top, Some(61));
        assert!(window.left.is_none());
    }

    #[test]
    fn test_absent_sorts_first() {
        let empty = OpmlWindow::default();
        let placed = OpmlWindow::new(0, 0, 0, 0);
        assert!(empty < placed);
        assert!(empty.is_empty());
    }
}
