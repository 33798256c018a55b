//! Structural comparison helpers shared by all entities.
//!
//! Absent values sort before present ones (`Option` ordering). Ordered
//! sequences are compared by length first, and sequences of equal length by
//! their first differing position. Unordered maps are compared by entry count
//! first, then as sorted entry lists.

use std::cmp::Ordering;

use sha2::{Digest, Sha256};

use crate::attributes::AttributeMap;
use crate::entity::SyndicationEntity;
use crate::error::{Result, SyndicationError};
use crate::registry::{ExtensionList, SyndicationExtension};
use crate::xml::XmlWriter;

/// Derive `PartialEq`, `Eq`, `PartialOrd` and `Ord` from an inherent
/// `compare(&self, &Self) -> Ordering`.
macro_rules! impl_structural_ord {
    ($($ty:ty),+ $(,)?) => {$(
        impl PartialEq for $ty {
            fn eq(&self, other: &Self) -> bool {
                self.compare(other).is_eq()
            }
        }

        impl Eq for $ty {}

        impl PartialOrd for $ty {
            fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
                Some(self.cmp(other))
            }
        }

        impl Ord for $ty {
            fn cmp(&self, other: &Self) -> std::cmp::Ordering {
                self.compare(other)
            }
        }
    )+};
}

pub(crate) use impl_structural_ord;

/// Compare two strings, optionally ignoring case.
///
/// Case-insensitive comparison folds both sides to uppercase.
///
/// # Examples
/// ```
/// use std::cmp::Ordering;
/// use syndication_xml::compare::compare_text;
///
/// assert_eq!(compare_text("News", "NEWS", true), Ordering::Equal);
/// assert_eq!(compare_text("News", "NEWS", false), Ordering::Greater);
/// ```
#[must_use]
pub fn compare_text(a: &str, b: &str, ignore_case: bool) -> Ordering {
    if ignore_case {
        a.chars()
            .flat_map(char::to_uppercase)
            .cmp(b.chars().flat_map(char::to_uppercase))
    } else {
        a.cmp(b)
    }
}

/// Compare optional text case-insensitively; `None` sorts first.
#[must_use]
pub fn compare_optional_text(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => compare_text(a, b, true),
    }
}

/// Compare ordered sequences with `compare`.
///
/// The longer sequence is greater regardless of content.
#[must_use]
pub fn compare_sequence<T>(a: &[T], b: &[T], compare: impl Fn(&T, &T) -> Ordering) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| {
        a.iter()
            .zip(b)
            .map(|(x, y)| compare(x, y))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    })
}

/// Compare ordered sequences of comparable entities.
#[must_use]
pub fn compare_entities<T: Ord>(a: &[T], b: &[T]) -> Ordering {
    compare_sequence(a, b, Ord::cmp)
}

/// Compare ordered text sequences case-insensitively.
#[must_use]
pub fn compare_text_sequence(a: &[String], b: &[String]) -> Ordering {
    compare_sequence(a, b, |x, y| compare_text(x, y, true))
}

/// Compare unordered maps.
///
/// Maps with fewer entries sort first. Maps of equal size are compared as
/// key-sorted entry lists.
#[must_use]
pub fn compare_map(a: &AttributeMap, b: &AttributeMap, ignore_case: bool) -> Ordering {
    fn compare_entry(x: &(&str, &str), y: &(&str, &str), ignore_case: bool) -> Ordering {
        compare_text(x.0, y.0, ignore_case).then_with(|| compare_text(x.1, y.1, ignore_case))
    }

    fn sorted(map: &AttributeMap, ignore_case: bool) -> Vec<(&str, &str)> {
        let mut entries: Vec<(&str, &str)> = map.iter().collect();
        entries.sort_by(|x, y| compare_entry(x, y, ignore_case));
        entries
    }

    a.len().cmp(&b.len()).then_with(|| {
        compare_sequence(&sorted(a, ignore_case), &sorted(b, ignore_case), |x, y| {
            compare_entry(x, y, ignore_case)
        })
    })
}

/// Compare extension lists.
///
/// Lists are ordered by size, then pairwise in namespace order: first by
/// namespace URI, then by extension content.
#[must_use]
pub fn compare_extensions(a: &ExtensionList, b: &ExtensionList) -> Ordering {
    fn sorted(list: &ExtensionList) -> Vec<&dyn SyndicationExtension> {
        let mut extensions: Vec<&dyn SyndicationExtension> = list.iter().collect();
        extensions.sort_by(|x, y| x.namespace().cmp(y.namespace()));
        extensions
    }

    compare_sequence(&sorted(a), &sorted(b), |x, y| {
        x.namespace()
            .cmp(y.namespace())
            .then_with(|| x.compare_content(*y))
    })
}

/// Compact serialization of an extension's content on a placeholder host.
///
/// Returns an empty string when the extension cannot be written.
#[must_use]
pub fn extension_fragment<E: SyndicationExtension + ?Sized>(extension: &E) -> String {
    fn write<E: SyndicationExtension + ?Sized>(extension: &E, buffer: &mut Vec<u8>) -> Result<()> {
        let mut writer = XmlWriter::new(buffer);
        writer.start_element("extension")?;
        extension.write_attributes(&mut writer)?;
        extension.write_elements(&mut writer)?;
        writer.end_element()?;
        writer.finish()
    }

    let mut buffer = Vec::new();
    if let Err(e) = write(extension, &mut buffer) {
        tracing::debug!(namespace = extension.namespace(), error = %e, "Extension could not be serialized");
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

/// Compare an entity with a dynamically typed one.
///
/// # Errors
/// Returns `TypeMismatch` when `other` is not a `T`.
///
/// # Examples
/// ```
/// use std::cmp::Ordering;
/// use syndication_xml::compare::compare_entity;
/// use syndication_xml::opml::OpmlOutline;
/// use syndication_xml::rsd::RsdApplicationInterface;
///
/// let outline = OpmlOutline::new("News").unwrap();
/// assert_eq!(compare_entity(&outline, &outline.clone()).unwrap(), Ordering::Equal);
/// assert!(compare_entity(&outline, &RsdApplicationInterface::default()).is_err());
/// ```
pub fn compare_entity<T: SyndicationEntity + Ord>(this: &T, other: &dyn SyndicationEntity) -> Result<Ordering> {
    other
        .as_any()
        .downcast_ref::<T>()
        .map(|other| this.cmp(other))
        .ok_or_else(|| SyndicationError::TypeMismatch {
            expected: this.entity_name(),
            actual: other.entity_name(),
        })
}

/// SHA-256 hex digest of the entity's compact XML serialization.
///
/// Entities that serialize identically share a fingerprint.
pub fn fingerprint(entity: &dyn SyndicationEntity) -> Result<String> {
    let mut buffer = Vec::new();
    {
        let mut writer = XmlWriter::new(&mut buffer);
        entity.write_to(&mut writer)?;
        writer.finish()?;
    }
    Ok(hex::encode(Sha256::digest(&buffer)))
}
