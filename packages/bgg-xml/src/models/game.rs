//! Board game records from the `/thing` endpoint.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use convert_case::Case;
use serde::Serialize;
use strum::{AsRefStr, Display, EnumString};
use url::Url;

use super::stats::Statistics;
use crate::error::ConstructionError;
use crate::mapping::{
    Constraints, FieldDescriptor, FieldValues, MissingField, Schema, Validator, XmlRecord,
};

/// BGG item types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum GameType {
    BoardGame,
    BoardGameExpansion,
    BoardGameAccessory,
}

/// BGG link types (categories, mechanics, credits, related items).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr, Serialize)]
pub enum LinkType {
    #[strum(serialize = "boardgamecategory")]
    #[serde(rename = "boardgamecategory")]
    Category,
    #[strum(serialize = "boardgamemechanic")]
    #[serde(rename = "boardgamemechanic")]
    Mechanic,
    #[strum(serialize = "boardgamedesigner")]
    #[serde(rename = "boardgamedesigner")]
    Designer,
    #[strum(serialize = "boardgamepublisher")]
    #[serde(rename = "boardgamepublisher")]
    Publisher,
    #[strum(serialize = "boardgameartist")]
    #[serde(rename = "boardgameartist")]
    Artist,
    #[strum(serialize = "boardgamefamily")]
    #[serde(rename = "boardgamefamily")]
    Family,
    #[strum(serialize = "boardgameexpansion")]
    #[serde(rename = "boardgameexpansion")]
    Expansion,
    #[strum(serialize = "boardgameaccessory")]
    #[serde(rename = "boardgameaccessory")]
    Accessory,
    #[strum(serialize = "boardgameintegration")]
    #[serde(rename = "boardgameintegration")]
    Integration,
    #[strum(serialize = "boardgameimplementation")]
    #[serde(rename = "boardgameimplementation")]
    Implementation,
    #[strum(serialize = "boardgamecompilation")]
    #[serde(rename = "boardgamecompilation")]
    Compilation,
}

/// Whether a name is the primary title or a translation/alternate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum NameType {
    Primary,
    Alternate,
}

/// A `<name>` element.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Name {
    pub name_type: NameType,
    pub value: String,
    /// Position of the first sortable character; absent in search results.
    pub sort_index: Option<u32>,
}

#[allow(clippy::expect_used)] // Static schema with unique field names
static NAME_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    Schema::builder("Name")
        .alias_generator(Case::Flat)
        .field(FieldDescriptor::attribute("name_type").with_alias("type"))
        .field(FieldDescriptor::attribute("value"))
        .field(FieldDescriptor::new("sort_index"))
        .build()
        .expect("valid schema")
});

impl XmlRecord for Name {
    fn schema() -> &'static Schema {
        &NAME_SCHEMA
    }

    fn construct(
        values: FieldValues<'_, '_>,
        diagnostics: &mut Vec<MissingField>,
    ) -> Result<Self, ConstructionError> {
        let mut v = Validator::new(Self::schema(), values, diagnostics);
        let name_type = v.required::<NameType>("name_type");
        let value = v.required::<String>("value");
        let sort_index = v.optional::<u32>("sort_index");
        v.finish()?;

        Ok(Self {
            name_type: name_type?,
            value: value?,
            sort_index: sort_index?,
        })
    }
}

/// A `<link>` element.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Link {
    pub link_type: LinkType,
    pub id: u64,
    pub value: String,
}

#[allow(clippy::expect_used)] // Static schema with unique field names
static LINK_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    Schema::builder("Link")
        .alias_generator(Case::Flat)
        .field(FieldDescriptor::attribute("link_type").with_alias("type"))
        .field(FieldDescriptor::attribute("id"))
        .field(FieldDescriptor::attribute("value"))
        .build()
        .expect("valid schema")
});

impl XmlRecord for Link {
    fn schema() -> &'static Schema {
        &LINK_SCHEMA
    }

    fn construct(
        values: FieldValues<'_, '_>,
        diagnostics: &mut Vec<MissingField>,
    ) -> Result<Self, ConstructionError> {
        let mut v = Validator::new(Self::schema(), values, diagnostics);
        let link_type = v.required::<LinkType>("link_type");
        let id = v.required::<u64>("id");
        let value = v.required::<String>("value");
        v.finish()?;

        Ok(Self {
            link_type: link_type?,
            id: id?,
            value: value?,
        })
    }
}

/// A board game `<item>` from the `/thing` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Game {
    pub id: u64,
    pub game_type: GameType,
    pub names: Vec<Name>,
    pub thumbnail: Option<Url>,
    pub image: Option<Url>,
    pub description: Option<String>,
    pub year_published: Option<i32>,
    pub min_players: Option<u32>,
    pub max_players: Option<u32>,
    pub playing_time: Option<u32>,
    pub min_playtime: Option<u32>,
    pub max_playtime: Option<u32>,
    pub min_age: Option<u32>,
    pub links: Vec<Link>,
    pub statistics: Option<Statistics>,
    pub fetched_at: DateTime<Utc>,
}

fn non_negative(description: &'static str) -> Constraints {
    Constraints::new().with_description(description).with_ge(0.0)
}

#[allow(clippy::expect_used)] // Static schema with unique field names
static GAME_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    Schema::builder("Game")
        .alias_generator(Case::Flat)
        .field(FieldDescriptor::attribute("id"))
        .field(FieldDescriptor::attribute("game_type").with_alias("type"))
        .field(FieldDescriptor::find_all("names").with_tag("name"))
        .field(FieldDescriptor::text("thumbnail"))
        .field(FieldDescriptor::text("image"))
        .field(FieldDescriptor::text("description"))
        .field(
            FieldDescriptor::find("year_published")
                .with_constraints(Constraints::new().with_description("Year of first publication")),
        )
        .field(FieldDescriptor::find("min_players").with_constraints(non_negative("Minimum player count")))
        .field(FieldDescriptor::find("max_players").with_constraints(non_negative("Maximum player count")))
        .field(FieldDescriptor::find("playing_time").with_constraints(non_negative("Playing time in minutes")))
        .field(FieldDescriptor::find("min_playtime").with_constraints(non_negative("Minimum playing time in minutes")))
        .field(FieldDescriptor::find("max_playtime").with_constraints(non_negative("Maximum playing time in minutes")))
        .field(FieldDescriptor::find("min_age").with_constraints(non_negative("Minimum player age")))
        .field(FieldDescriptor::find_all("links").with_tag("link"))
        .field(FieldDescriptor::find_all("statistics"))
        .build()
        .expect("valid schema")
});

impl XmlRecord for Game {
    fn schema() -> &'static Schema {
        &GAME_SCHEMA
    }

    fn construct(
        values: FieldValues<'_, '_>,
        diagnostics: &mut Vec<MissingField>,
    ) -> Result<Self, ConstructionError> {
        let mut v = Validator::new(Self::schema(), values, diagnostics);
        let id = v.required::<u64>("id");
        let game_type = v.required::<GameType>("game_type");
        let names = v.records::<Name>("names");
        let thumbnail = v.optional::<Url>("thumbnail");
        let image = v.optional::<Url>("image");
        let description = v.optional::<String>("description");
        let year_published = v.optional::<i32>("year_published");
        let min_players = v.optional::<u32>("min_players");
        let max_players = v.optional::<u32>("max_players");
        let playing_time = v.optional::<u32>("playing_time");
        let min_playtime = v.optional::<u32>("min_playtime");
        let max_playtime = v.optional::<u32>("max_playtime");
        let min_age = v.optional::<u32>("min_age");
        let links = v.records::<Link>("links");
        let statistics = v.record::<Statistics>("statistics");
        v.finish()?;

        Ok(Self {
            id: id?,
            game_type: game_type?,
            names: names?,
            thumbnail: thumbnail?,
            image: image?,
            description: description?,
            year_published: year_published?,
            min_players: min_players?,
            max_players: max_players?,
            playing_time: playing_time?,
            min_playtime: min_playtime?,
            max_playtime: max_playtime?,
            min_age: min_age?,
            links: links?,
            statistics: statistics?,
            fetched_at: Utc::now(),
        })
    }
}

impl Game {
    /// The primary name, falling back to the ID.
    #[must_use]
    pub fn primary_name(&self) -> String {
        self.names
            .iter()
            .find(|n| n.name_type == NameType::Primary)
            .map_or_else(|| self.id.to_string(), |n| n.value.clone())
    }

    /// Links of one type, in document order.
    pub fn links_of(&self, link_type: LinkType) -> impl Iterator<Item = &Link> {
        self.links.iter().filter(move |l| l.link_type == link_type)
    }

    #[must_use]
    pub fn categories(&self) -> Vec<&Link> {
        self.links_of(LinkType::Category).collect()
    }

    #[must_use]
    pub fn mechanics(&self) -> Vec<&Link> {
        self.links_of(LinkType::Mechanic).collect()
    }

    #[must_use]
    pub fn designers(&self) -> Vec<&Link> {
        self.links_of(LinkType::Designer).collect()
    }

    #[must_use]
    pub fn publishers(&self) -> Vec<&Link> {
        self.links_of(LinkType::Publisher).collect()
    }

    /// Overall board game rank, if the game is ranked.
    #[must_use]
    pub fn bgg_rank(&self) -> Option<u32> {
        self.statistics
            .as_ref()?
            .ratings
            .as_ref()?
            .ranks
            .iter()
            .find(|r| r.name == "boardgame")?
            .position()
    }
}
