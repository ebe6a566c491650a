//! Results of the `/search` endpoint.

use std::sync::LazyLock;

use convert_case::Case;
use serde::Serialize;

use super::game::{GameType, Name, NameType};
use crate::error::ConstructionError;
use crate::mapping::{FieldDescriptor, FieldValues, MissingField, Schema, Validator, XmlRecord};

/// One `<item>` of a search response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub id: u64,
    pub game_type: GameType,
    pub names: Vec<Name>,
    pub year_published: Option<i32>,
}

#[allow(clippy::expect_used)] // Static schema with unique field names
static SEARCH_RESULT_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    Schema::builder("SearchResult")
        .alias_generator(Case::Flat)
        .field(FieldDescriptor::attribute("id"))
        .field(FieldDescriptor::attribute("game_type").with_alias("type"))
        .field(FieldDescriptor::find_all("names").with_tag("name"))
        .field(FieldDescriptor::new("year_published"))
        .build()
        .expect("valid schema")
});

impl XmlRecord for SearchResult {
    fn schema() -> &'static Schema {
        &SEARCH_RESULT_SCHEMA
    }

    fn construct(
        values: FieldValues<'_, '_>,
        diagnostics: &mut Vec<MissingField>,
    ) -> Result<Self, ConstructionError> {
        let mut v = Validator::new(Self::schema(), values, diagnostics);
        let id = v.required::<u64>("id");
        let game_type = v.required::<GameType>("game_type");
        let names = v.records::<Name>("names");
        let year_published = v.optional::<i32>("year_published");
        v.finish()?;

        Ok(Self {
            id: id?,
            game_type: game_type?,
            names: names?,
            year_published: year_published?,
        })
    }
}

impl SearchResult {
    /// The primary name, or the first name of any type.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.names
            .iter()
            .find(|n| n.name_type == NameType::Primary)
            .or_else(|| self.names.first())
            .map(|n| n.value.as_str())
    }
}

/// The `<items total="..">` root of a search response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResponse {
    pub total: u32,
    pub results: Vec<SearchResult>,
}

#[allow(clippy::expect_used)] // Static schema with unique field names
static SEARCH_RESPONSE_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    Schema::builder("SearchResponse")
        .field(FieldDescriptor::attribute("total"))
        .field(FieldDescriptor::find_all("results").with_tag("item"))
        .build()
        .expect("valid schema")
});

impl XmlRecord for SearchResponse {
    fn schema() -> &'static Schema {
        &SEARCH_RESPONSE_SCHEMA
    }

    fn construct(
        values: FieldValues<'_, '_>,
        diagnostics: &mut Vec<MissingField>,
    ) -> Result<Self, ConstructionError> {
        let mut v = Validator::new(Self::schema(), values, diagnostics);
        let total = v.required::<u32>("total");
        let results = v.records::<SearchResult>("results");
        v.finish()?;

        Ok(Self {
            total: total?,
            results: results?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use roxmltree::Document;

    const SEARCH: &str = r#"<items total="2" termsofuse="https://boardgamegeek.com/xmlapi/termsofuse">
        <item type="boardgame" id="13">
            <name type="primary" value="CATAN"/>
            <yearpublished value="1995"/>
        </item>
        <item type="boardgameexpansion" id="926">
            <name type="alternate" value="Catan: Seafarers"/>
        </item>
    </items>"#;

    #[test]
    fn test_search_response_from_xml() {
        let doc = Document::parse(SEARCH).unwrap();
        let response = SearchResponse::from_xml(doc.root_element()).unwrap();

        assert_eq!(response.total, 2);
        assert_eq!(response.results.len(), 2);

        let first = &response.results[0];
        assert_eq!(first.id, 13);
        assert_eq!(first.game_type, GameType::BoardGame);
        assert_eq!(first.name(), Some("CATAN"));
        assert_eq!(first.year_published, Some(1995));

        let second = &response.results[1];
        assert_eq!(second.game_type, GameType::BoardGameExpansion);
        assert_eq!(second.name(), Some("Catan: Seafarers"));
        assert_eq!(second.year_published, None);
    }

    #[test]
    fn test_empty_search_response() {
        let doc = Document::parse(r#"<items total="0"/>"#).unwrap();
        let (response, diagnostics) =
            SearchResponse::from_xml_with_diagnostics(doc.root_element()).unwrap();

        assert_eq!(response.total, 0);
        assert!(response.results.is_empty());
        assert!(diagnostics.is_empty());
    }
}
