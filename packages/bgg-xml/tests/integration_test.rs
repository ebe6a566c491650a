//! End-to-end tests: fixture documents through the mapping engine into records.

use std::fs;
use std::path::Path;

use bgg_xml::mapping::{infer_strategy, LookupStrategy, RecordBuilder, XmlRecord};
use bgg_xml::models::{parse_search, parse_things, Game, GameType, LinkType, NameType};
use bgg_xml::xml::find_children;
use pretty_assertions::assert_eq;

/// Load fixture file content.
fn load_fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to load {}: {}", path.display(), e))
}

#[test]
fn test_parse_things_fixture() {
    let games = parse_things(&load_fixture("things.xml")).unwrap();

    assert_eq!(games.len(), 2);
    let ids: Vec<_> = games.iter().map(|g| g.id).collect();
    assert_eq!(ids, vec![174430, 226868]);
}

#[test]
fn test_gloomhaven_fields() {
    let games = parse_things(&load_fixture("things.xml")).unwrap();
    let game = &games[0];

    assert_eq!(game.game_type, GameType::BoardGame);
    assert_eq!(game.primary_name(), "Gloomhaven");
    assert_eq!(game.year_published, Some(2017));
    assert_eq!(game.min_players, Some(1));
    assert_eq!(game.max_players, Some(4));
    assert_eq!(game.playing_time, Some(120));
    assert_eq!(game.min_age, Some(14));
    assert!(game
        .description
        .as_deref()
        .unwrap()
        .starts_with("Gloomhaven  is a game of Euro-inspired tactical combat"));
    assert_eq!(
        game.image.as_ref().map(|u| u.host_str()),
        Some(Some("cf.geekdo-images.com"))
    );
}

#[test]
fn test_unicode_names_survive() {
    let games = parse_things(&load_fixture("things.xml")).unwrap();
    let alternates: Vec<_> = games[0]
        .names
        .iter()
        .filter(|n| n.name_type == NameType::Alternate)
        .map(|n| n.value.as_str())
        .collect();

    assert_eq!(
        alternates,
        vec!["Gloomhaven: Die düstere Stadt", "グルームヘイヴン"]
    );
}

#[test]
fn test_links_grouped_by_type() {
    let games = parse_things(&load_fixture("things.xml")).unwrap();
    let game = &games[0];

    assert_eq!(game.links.len(), 11);
    assert_eq!(game.categories().len(), 3);
    assert_eq!(game.mechanics().len(), 2);
    assert_eq!(game.designers()[0].value, "Isaac Childres");
    assert_eq!(game.publishers().len(), 2);
    assert_eq!(game.links_of(LinkType::Expansion).next().map(|l| l.id), Some(226868));
}

#[test]
fn test_statistics_and_rank() {
    let games = parse_things(&load_fixture("things.xml")).unwrap();

    let ratings = games[0]
        .statistics
        .as_ref()
        .and_then(|s| s.ratings.as_ref())
        .unwrap();
    assert_eq!(ratings.users_rated, Some(63155));
    assert_eq!(ratings.average_weight, Some(3.9113));
    assert_eq!(ratings.ranks.len(), 3);
    assert_eq!(games[0].bgg_rank(), Some(3));

    // "Not Ranked" is kept as text and has no position
    assert_eq!(games[1].game_type, GameType::BoardGameExpansion);
    assert_eq!(games[1].bgg_rank(), None);
    assert_eq!(games[1].playing_time, None);
}

#[test]
fn test_expansion_diagnostics() {
    let xml = load_fixture("things.xml");
    let doc = roxmltree::Document::parse(&xml).unwrap();
    let expansion = find_children(doc.root_element(), "item")[1];

    let (game, diagnostics) = Game::from_xml_with_diagnostics(expansion).unwrap();
    assert_eq!(game.primary_name(), "Gloomhaven: Forgotten Circles");

    let missing: Vec<_> = diagnostics.iter().map(|d| d.tag.as_str()).collect();
    assert_eq!(
        missing,
        vec![
            "thumbnail",
            "image",
            "description",
            "playingtime",
            "minplaytime",
            "maxplaytime",
            "minage",
        ]
    );
    assert!(diagnostics.iter().all(|d| d.element == "item"));
}

#[test]
fn test_builder_on_fixture_keys_by_ident() {
    let xml = load_fixture("things.xml");
    let doc = roxmltree::Document::parse(&xml).unwrap();
    let item = find_children(doc.root_element(), "item")[0];

    let output = RecordBuilder::new(Game::schema()).build(item);
    assert!(output.values.contains("year_published"));
    assert!(output.values.contains("game_type"));
    assert!(!output.values.contains("yearpublished"));
}

#[test]
fn test_auto_inference_on_fixture() {
    let xml = load_fixture("things.xml");
    let doc = roxmltree::Document::parse(&xml).unwrap();
    let item = find_children(doc.root_element(), "item")[0];

    assert_eq!(infer_strategy(item, "id"), Some(LookupStrategy::Attribute));
    assert_eq!(infer_strategy(item, "yearpublished"), Some(LookupStrategy::Find));
    assert_eq!(infer_strategy(item, "name"), Some(LookupStrategy::FindAll));
    assert_eq!(infer_strategy(item, "thumbnail"), Some(LookupStrategy::Text));
    assert_eq!(infer_strategy(item, "poll"), None);
}

#[test]
fn test_parse_search_fixture() {
    let response = parse_search(&load_fixture("search.xml")).unwrap();

    assert_eq!(response.total, 3);
    let names: Vec<_> = response.results.iter().filter_map(|r| r.name()).collect();
    assert_eq!(
        names,
        vec![
            "Gloomhaven",
            "Gloomhaven: Jaws of the Lion",
            "Gloomhaven: Forgotten Circles",
        ]
    );
    assert_eq!(response.results[1].year_published, Some(2020));
    assert_eq!(response.results[2].year_published, None);
}
