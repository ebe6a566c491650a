//! Community statistics attached to a thing when `stats=1` is requested.

use std::sync::LazyLock;

use convert_case::Case;
use serde::Serialize;

use crate::error::ConstructionError;
use crate::mapping::{
    Constraints, FieldDescriptor, FieldValues, MissingField, Schema, Validator, XmlRecord,
};

/// The `<statistics>` element.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statistics {
    pub page: u32,
    pub ratings: Option<Ratings>,
}

#[allow(clippy::expect_used)] // Static schema with unique field names
static STATISTICS_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    Schema::builder("Statistics")
        .alias_generator(Case::Flat)
        .field(FieldDescriptor::new("page"))
        .field(FieldDescriptor::find_all("ratings"))
        .build()
        .expect("valid schema")
});

impl XmlRecord for Statistics {
    fn schema() -> &'static Schema {
        &STATISTICS_SCHEMA
    }

    fn construct(
        values: FieldValues<'_, '_>,
        diagnostics: &mut Vec<MissingField>,
    ) -> Result<Self, ConstructionError> {
        let mut v = Validator::new(Self::schema(), values, diagnostics);
        let page = v.optional::<u32>("page");
        let ratings = v.record::<Ratings>("ratings");
        v.finish()?;

        Ok(Self {
            page: page?.unwrap_or(1),
            ratings: ratings?,
        })
    }
}

/// The `<ratings>` element.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ratings {
    pub users_rated: Option<u32>,
    pub average: Option<f64>,
    pub bayes_average: Option<f64>,
    pub stddev: Option<f64>,
    pub median: Option<f64>,
    pub owned: Option<u32>,
    pub trading: Option<u32>,
    pub wanting: Option<u32>,
    pub wishing: Option<u32>,
    pub num_comments: Option<u32>,
    pub num_weights: Option<u32>,
    /// Complexity rating, 1 (light) to 5 (heavy); 0 when nobody voted.
    pub average_weight: Option<f64>,
    pub ranks: Vec<Rank>,
}

#[allow(clippy::expect_used)] // Static schema with unique field names
static RATINGS_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    let rating = || Constraints::new().with_ge(0.0).with_le(10.0);

    Schema::builder("Ratings")
        .alias_generator(Case::Flat)
        .field(FieldDescriptor::new("users_rated"))
        .field(FieldDescriptor::new("average").with_constraints(rating()))
        .field(FieldDescriptor::new("bayes_average").with_constraints(rating()))
        .field(FieldDescriptor::new("stddev"))
        .field(FieldDescriptor::new("median"))
        .field(FieldDescriptor::new("owned"))
        .field(FieldDescriptor::new("trading"))
        .field(FieldDescriptor::new("wanting"))
        .field(FieldDescriptor::new("wishing"))
        .field(FieldDescriptor::new("num_comments"))
        .field(FieldDescriptor::new("num_weights"))
        .field(
            FieldDescriptor::new("average_weight")
                .with_constraints(Constraints::new().with_ge(0.0).with_le(5.0)),
        )
        .field(FieldDescriptor::find_all("ranks").with_tag("ranks/rank"))
        .build()
        .expect("valid schema")
});

impl XmlRecord for Ratings {
    fn schema() -> &'static Schema {
        &RATINGS_SCHEMA
    }

    fn construct(
        values: FieldValues<'_, '_>,
        diagnostics: &mut Vec<MissingField>,
    ) -> Result<Self, ConstructionError> {
        let mut v = Validator::new(Self::schema(), values, diagnostics);
        let users_rated = v.optional::<u32>("users_rated");
        let average = v.optional::<f64>("average");
        let bayes_average = v.optional::<f64>("bayes_average");
        let stddev = v.optional::<f64>("stddev");
        let median = v.optional::<f64>("median");
        let owned = v.optional::<u32>("owned");
        let trading = v.optional::<u32>("trading");
        let wanting = v.optional::<u32>("wanting");
        let wishing = v.optional::<u32>("wishing");
        let num_comments = v.optional::<u32>("num_comments");
        let num_weights = v.optional::<u32>("num_weights");
        let average_weight = v.optional::<f64>("average_weight");
        let ranks = v.records::<Rank>("ranks");
        v.finish()?;

        Ok(Self {
            users_rated: users_rated?,
            average: average?,
            bayes_average: bayes_average?,
            stddev: stddev?,
            median: median?,
            owned: owned?,
            trading: trading?,
            wanting: wanting?,
            wishing: wishing?,
            num_comments: num_comments?,
            num_weights: num_weights?,
            average_weight: average_weight?,
            ranks: ranks?,
        })
    }
}

/// One `<rank>` entry. `value` is "Not Ranked" for unranked games.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rank {
    pub rank_type: String,
    pub id: u64,
    pub name: String,
    pub friendly_name: String,
    pub value: String,
    pub bayes_average: Option<String>,
}

#[allow(clippy::expect_used)] // Static schema with unique field names
static RANK_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    Schema::builder("Rank")
        .alias_generator(Case::Flat)
        .field(FieldDescriptor::attribute("rank_type").with_alias("type"))
        .field(FieldDescriptor::attribute("id"))
        .field(FieldDescriptor::attribute("name"))
        .field(FieldDescriptor::attribute("friendly_name"))
        .field(FieldDescriptor::attribute("value"))
        .field(FieldDescriptor::new("bayes_average"))
        .build()
        .expect("valid schema")
});

impl XmlRecord for Rank {
    fn schema() -> &'static Schema {
        &RANK_SCHEMA
    }

    fn construct(
        values: FieldValues<'_, '_>,
        diagnostics: &mut Vec<MissingField>,
    ) -> Result<Self, ConstructionError> {
        let mut v = Validator::new(Self::schema(), values, diagnostics);
        let rank_type = v.required::<String>("rank_type");
        let id = v.required::<u64>("id");
        let name = v.required::<String>("name");
        let friendly_name = v.required::<String>("friendly_name");
        let value = v.required::<String>("value");
        let bayes_average = v.optional::<String>("bayes_average");
        v.finish()?;

        Ok(Self {
            rank_type: rank_type?,
            id: id?,
            name: name?,
            friendly_name: friendly_name?,
            value: value?,
            bayes_average: bayes_average?,
        })
    }
}

impl Rank {
    /// Numeric rank position, `None` when not ranked.
    #[must_use]
    pub fn position(&self) -> Option<u32> {
        self.value.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use roxmltree::Document;

    const STATISTICS: &str = r#"<statistics page="1">
        <ratings>
            <usersrated value="61234"/>
            <average value="8.60"/>
            <bayesaverage value="8.39"/>
            <ranks>
                <rank type="subtype" id="1" name="boardgame" friendlyname="Board Game Rank" value="3" bayesaverage="8.39"/>
                <rank type="family" id="5497" name="strategygames" friendlyname="Strategy Game Rank" value="Not Ranked" bayesaverage="Not Ranked"/>
            </ranks>
            <stddev value="1.61"/>
            <median value="0"/>
            <owned value="92000"/>
            <trading value="540"/>
            <wanting value="1300"/>
            <wishing value="15800"/>
            <numcomments value="10900"/>
            <numweights value="2400"/>
            <averageweight value="3.91"/>
        </ratings>
    </statistics>"#;

    #[test]
    fn test_statistics_from_xml() {
        let doc = Document::parse(STATISTICS).unwrap();
        let (stats, diagnostics) =
            Statistics::from_xml_with_diagnostics(doc.root_element()).unwrap();

        assert_eq!(stats.page, 1);
        assert!(diagnostics.is_empty());

        let ratings = stats.ratings.unwrap();
        assert_eq!(ratings.users_rated, Some(61234));
        assert_eq!(ratings.average, Some(8.60));
        assert_eq!(ratings.bayes_average, Some(8.39));
        assert_eq!(ratings.owned, Some(92000));
        assert_eq!(ratings.num_weights, Some(2400));
        assert_eq!(ratings.average_weight, Some(3.91));
        assert_eq!(ratings.ranks.len(), 2);
    }

    #[test]
    fn test_rank_position() {
        let doc = Document::parse(STATISTICS).unwrap();
        let ratings = Statistics::from_xml(doc.root_element())
            .unwrap()
            .ratings
            .unwrap();

        assert_eq!(ratings.ranks[0].name, "boardgame");
        assert_eq!(ratings.ranks[0].friendly_name, "Board Game Rank");
        assert_eq!(ratings.ranks[0].position(), Some(3));
        assert_eq!(ratings.ranks[1].position(), None);
        assert_eq!(ratings.ranks[1].bayes_average.as_deref(), Some("Not Ranked"));
    }

    #[test]
    fn test_empty_statistics() {
        let doc = Document::parse("<statistics/>").unwrap();
        let stats = Statistics::from_xml(doc.root_element()).unwrap();

        assert_eq!(stats.page, 1);
        assert!(stats.ratings.is_none());
    }

    #[test]
    fn test_rating_out_of_range() {
        let doc = Document::parse(r#"<ratings><average value="11.5"/></ratings>"#).unwrap();
        let err = Ratings::from_xml(doc.root_element()).unwrap_err();

        assert_eq!(err.fields(), vec!["average"]);
    }
}
