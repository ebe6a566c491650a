//! Node lookups used by field extraction.
//!
//! These are the only operations the mapping engine needs from the XML
//! tree: attribute lookup, text content, first matching child and all
//! matching children. Child lookups accept slash-separated paths
//! (`ratings/average`), where every segment but the last descends through
//! the first matching child.

use roxmltree::Node;

/// Get the tag name without namespace prefix.
///
/// # Arguments
/// * `node` - XML node
///
/// # Returns
/// Local tag name (e.g., "item" for `<ns:item>`)
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use bgg_xml::xml::get_tag_name;
///
/// let xml = r#"<items><item id="13"/></items>"#;
/// let doc = Document::parse(xml).unwrap();
/// let item = doc.root_element().first_element_child().unwrap();
/// assert_eq!(get_tag_name(item), "item");
/// ```
pub fn get_tag_name<'a>(node: Node<'a, '_>) -> &'a str {
    node.tag_name().name()
}

/// Find the first child element with the given tag name.
///
/// # Arguments
/// * `node` - Parent node to search in
/// * `tag` - Tag name to search for
///
/// # Returns
/// First matching child element, or `None` if not found
pub fn find_child<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|child| child.is_element() && get_tag_name(*child) == tag)
}

/// Find all child elements with the given tag name, in document order.
///
/// # Arguments
/// * `node` - Parent node to search in
/// * `tag` - Tag name to search for
///
/// # Returns
/// Matching child elements, possibly empty
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use bgg_xml::xml::find_children;
///
/// let xml = r#"<item><name value="a"/><link/><name value="b"/></item>"#;
/// let doc = Document::parse(xml).unwrap();
///
/// assert_eq!(find_children(doc.root_element(), "name").len(), 2);
/// ```
pub fn find_children<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Vec<Node<'a, 'input>> {
    node.children()
        .filter(|child| child.is_element() && get_tag_name(*child) == tag)
        .collect()
}

/// Find a descendant element matching a path of tag names.
///
/// # Arguments
/// * `node` - Starting node
/// * `path` - Slash-separated path of tag names (e.g., "ratings/average")
///
/// # Returns
/// Matching element, or `None` if any segment is missing
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use bgg_xml::xml::find_by_path;
///
/// let xml = r#"<statistics><ratings><average value="8.6"/></ratings></statistics>"#;
/// let doc = Document::parse(xml).unwrap();
///
/// let average = find_by_path(doc.root_element(), "ratings/average").unwrap();
/// assert_eq!(average.attribute("value"), Some("8.6"));
/// ```
pub fn find_by_path<'a, 'input>(node: Node<'a, 'input>, path: &str) -> Option<Node<'a, 'input>> {
    let mut current = node;

    for part in path.split('/') {
        current = find_child(current, part)?;
    }

    Some(current)
}

/// Find all elements matching a path, where the last segment may match
/// several siblings.
///
/// Returns an empty vector when any intermediate segment is missing.
pub fn find_all_by_path<'a, 'input>(node: Node<'a, 'input>, path: &str) -> Vec<Node<'a, 'input>> {
    match path.rsplit_once('/') {
        Some((parent, last)) => find_by_path(node, parent)
            .map(|parent| find_children(parent, last))
            .unwrap_or_default(),
        None => find_children(node, path),
    }
}

/// Get the trimmed text content of a node.
///
/// # Arguments
/// * `node` - Node to get text from
///
/// # Returns
/// Trimmed text, or `None` when the node has no text or only whitespace
pub fn text_content<'a>(node: Node<'a, '_>) -> Option<&'a str> {
    node.text().map(str::trim).filter(|text| !text.is_empty())
}

/// Get an attribute value from a node.
///
/// The name is matched literally; slashes are not interpreted as paths.
pub fn get_attribute<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
    node.attribute(name)
}
