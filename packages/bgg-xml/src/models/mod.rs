//! Typed records for BGG XML API responses.
//!
//! Every record declares a static [`Schema`](crate::mapping::Schema) and
//! implements [`XmlRecord`]; the functions here parse whole documents.

mod game;
mod search;
mod stats;

pub use game::{Game, GameType, Link, LinkType, Name, NameType};
pub use search::{SearchResponse, SearchResult};
pub use stats::{Rank, Ratings, Statistics};

use roxmltree::{Document, Node};

use crate::error::{BggError, Result};
use crate::mapping::XmlRecord;
use crate::xml::{find_children, get_tag_name};

const ITEMS: &str = "items";

fn expect_root<'a, 'input>(doc: &'a Document<'input>) -> Result<Node<'a, 'input>> {
    let root = doc.root_element();
    let found = get_tag_name(root);
    if found == ITEMS {
        Ok(root)
    } else {
        Err(BggError::UnexpectedRoot {
            expected: ITEMS.to_string(),
            found: found.to_string(),
        })
    }
}

/// Parse a `/thing` response into games, in document order.
///
/// # Errors
/// Fails on malformed XML, a root other than `<items>`, or an item that
/// cannot be constructed.
///
/// # Examples
/// ```
/// use bgg_xml::models::parse_things;
///
/// let xml = r#"<items><item type="boardgame" id="13">
///     <name type="primary" sortindex="1" value="CATAN"/>
/// </item></items>"#;
/// let games = parse_things(xml).unwrap();
/// assert_eq!(games[0].primary_name(), "CATAN");
/// ```
pub fn parse_things(xml: &str) -> Result<Vec<Game>> {
    let doc = Document::parse(xml)?;
    let root = expect_root(&doc)?;

    let mut games = Vec::new();
    for item in find_children(root, "item") {
        let (game, diagnostics) = Game::from_xml_with_diagnostics(item)?;
        tracing::debug!(
            id = game.id,
            name = %game.primary_name(),
            missing = diagnostics.len(),
            "Parsed game"
        );
        games.push(game);
    }
    Ok(games)
}

/// Parse a `/search` response.
///
/// # Errors
/// Fails on malformed XML, a root other than `<items>`, or an item that
/// cannot be constructed.
pub fn parse_search(xml: &str) -> Result<SearchResponse> {
    let doc = Document::parse(xml)?;
    let root = expect_root(&doc)?;
    Ok(SearchResponse::from_xml(root)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_things_rejects_wrong_root() {
        let result = parse_things("<item id=\"1\" type=\"boardgame\"/>");
        assert!(matches!(
            result,
            Err(BggError::UnexpectedRoot { ref found, .. }) if found == "item"
        ));
    }

    #[test]
    fn test_parse_things_rejects_malformed_xml() {
        assert!(matches!(parse_things("<items>"), Err(BggError::XmlParse(_))));
    }

    #[test]
    fn test_parse_things_empty() {
        assert!(parse_things("<items/>").unwrap().is_empty());
    }

    #[test]
    fn test_parse_things_propagates_construction_error() {
        let result = parse_things(r#"<items><item id="x" type="boardgame"/></items>"#);
        assert!(matches!(result, Err(BggError::Construction(_))));
    }

    #[test]
    fn test_parse_search_total() {
        let response = parse_search(r#"<items total="0"/>"#).unwrap();
        assert_eq!(response.total, 0);
    }
}
