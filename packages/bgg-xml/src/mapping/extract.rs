//! Strategy dispatch: pull a raw value out of an element.
//!
//! Extraction never fails. Missing data is reported as
//! [`Extraction::Absent`]; deciding whether that deserves a diagnostic is
//! left to the [`RecordBuilder`](super::RecordBuilder).

use roxmltree::Node;

use super::auto;
use super::strategy::LookupStrategy;
use crate::xml::{find_all_by_path, find_by_path, get_attribute, text_content};

/// Raw outcome of looking up one field on one element.
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction<'a, 'input> {
    /// A single string value.
    Scalar(String),
    /// Matching child elements. May be empty.
    List(Vec<Node<'a, 'input>>),
    /// Nothing found.
    Absent,
}

impl<'a, 'input> Extraction<'a, 'input> {
    fn from_option(value: Option<&str>) -> Self {
        value.map_or(Self::Absent, |v| Self::Scalar(v.to_string()))
    }

    #[must_use]
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// The scalar value, if this is a scalar.
    #[must_use]
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Self::Scalar(value) => Some(value),
            _ => None,
        }
    }

    /// The matched elements, if this is a list.
    #[must_use]
    pub fn as_list(&self) -> Option<&[Node<'a, 'input>]> {
        match self {
            Self::List(nodes) => Some(nodes),
            _ => None,
        }
    }
}

/// Extract a value from `node` for the resolved `tag` using `strategy`.
///
/// `Auto` is handed to the inferencer, which picks one of the concrete
/// strategies for this particular element.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use bgg_xml::mapping::{extract, Extraction, LookupStrategy};
///
/// let xml = r#"<item id="174430"><yearpublished value="2017"/></item>"#;
/// let doc = Document::parse(xml).unwrap();
/// let item = doc.root_element();
///
/// assert_eq!(
///     extract(item, "yearpublished", LookupStrategy::Find),
///     Extraction::Scalar("2017".to_string())
/// );
/// assert_eq!(extract(item, "type", LookupStrategy::Attribute), Extraction::Absent);
/// ```
pub fn extract<'a, 'input>(
    node: Node<'a, 'input>,
    tag: &str,
    strategy: LookupStrategy,
) -> Extraction<'a, 'input> {
    match strategy {
        LookupStrategy::Attribute => Extraction::from_option(get_attribute(node, tag)),
        LookupStrategy::Text => Extraction::from_option(lookup_text(node, tag)),
        LookupStrategy::Find => Extraction::from_option(find_by_path(node, tag).and_then(child_value)),
        // An empty list is a valid empty collection, not an absent field.
        LookupStrategy::FindAll => Extraction::List(find_all_by_path(node, tag)),
        LookupStrategy::Auto => auto::infer(node, tag),
    }
}

/// Text of the child matching `tag`, or of `node` itself when no child matches.
pub(crate) fn lookup_text<'a>(node: Node<'a, '_>, tag: &str) -> Option<&'a str> {
    match find_by_path(node, tag) {
        Some(child) => text_content(child),
        None => text_content(node),
    }
}

/// The `value` attribute of a child, else its text.
fn child_value<'a>(child: Node<'a, '_>) -> Option<&'a str> {
    get_attribute(child, "value").or_else(|| text_content(child))
}
