//! Shape inference for fields declared with `LookupStrategy::Auto`.
//!
//! Rules are checked in a fixed order and the first match wins:
//!
//! 1. the element has an attribute named by the tag -> `Attribute`
//! 2. exactly one matching child, carrying a `value` attribute -> `Find`
//! 3. more than one matching child -> `FindAll`
//! 4. text is available (the single matching child's, or the element's own
//!    when no child matches) -> `Text`
//! 5. otherwise nothing is extracted
//!
//! An attribute and a child with the same name resolve to the attribute.

use roxmltree::Node;

use super::extract::{extract, lookup_text, Extraction};
use super::strategy::LookupStrategy;
use crate::xml::{find_all_by_path, get_attribute};

/// Decide which concrete strategy fits `tag` on this element.
///
/// Returns `None` when no rule matches.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use bgg_xml::mapping::{infer_strategy, LookupStrategy};
///
/// let xml = r#"<item id="174430"><minplayers value="1"/></item>"#;
/// let doc = Document::parse(xml).unwrap();
/// let item = doc.root_element();
///
/// assert_eq!(infer_strategy(item, "id"), Some(LookupStrategy::Attribute));
/// assert_eq!(infer_strategy(item, "minplayers"), Some(LookupStrategy::Find));
/// assert_eq!(infer_strategy(item, "maxplayers"), None);
/// ```
pub fn infer_strategy(node: Node<'_, '_>, tag: &str) -> Option<LookupStrategy> {
    if get_attribute(node, tag).is_some() {
        return Some(LookupStrategy::Attribute);
    }

    match find_all_by_path(node, tag).as_slice() {
        [only] if only.has_attribute("value") => return Some(LookupStrategy::Find),
        [_, _, ..] => return Some(LookupStrategy::FindAll),
        _ => {}
    }

    lookup_text(node, tag).map(|_| LookupStrategy::Text)
}

/// Extract `tag` from the element using the inferred strategy.
pub fn infer<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Extraction<'a, 'input> {
    match infer_strategy(node, tag) {
        Some(strategy) => extract(node, tag, strategy),
        None => Extraction::Absent,
    }
}
