//! Record construction: turning a value map into a typed record.
//!
//! This is where raw strings are coerced into field types and declared
//! [`Constraints`] are enforced. Extraction itself never fails; this step
//! is the only one that produces hard errors.

use std::fmt::Display;
use std::str::FromStr;

use roxmltree::Node;

use super::builder::{FieldValues, MissingField, RawValue, RecordBuilder};
use super::descriptor::Constraints;
use super::schema::Schema;
use crate::error::{ConstructionError, FieldError, FieldErrorKind};
use crate::xml::text_content;

/// A record type that can be built from an XML element.
pub trait XmlRecord: Sized {
    /// Descriptors for every field of the record.
    fn schema() -> &'static Schema;

    /// Build the record from extracted values.
    ///
    /// Diagnostics of nested records are appended to `diagnostics`.
    ///
    /// # Errors
    /// Returns a `ConstructionError` listing every field that failed
    /// coercion or constraint checks.
    fn construct(
        values: FieldValues<'_, '_>,
        diagnostics: &mut Vec<MissingField>,
    ) -> Result<Self, ConstructionError>;

    /// Extract and construct the record from `node`.
    ///
    /// # Errors
    /// Propagates the construction failure unchanged.
    fn from_xml(node: Node<'_, '_>) -> Result<Self, ConstructionError> {
        Self::from_xml_with_diagnostics(node).map(|(record, _)| record)
    }

    /// Like [`XmlRecord::from_xml`], also returning missing-field diagnostics.
    ///
    /// The record's own diagnostics come first, followed by those of nested
    /// records in field order. Each one names the element it was found on.
    ///
    /// # Errors
    /// Propagates the construction failure unchanged.
    fn from_xml_with_diagnostics(
        node: Node<'_, '_>,
    ) -> Result<(Self, Vec<MissingField>), ConstructionError> {
        let output = RecordBuilder::new(Self::schema()).build(node);
        let mut diagnostics = output.diagnostics;
        let record = Self::construct(output.values, &mut diagnostics)?;
        Ok((record, diagnostics))
    }
}

/// Coerces values out of a [`FieldValues`] map and accumulates failures.
///
/// Every accessor returns its own `Result`, and also records the failure so
/// that [`Validator::finish`] can report all failing fields at once:
///
/// ```ignore
/// let mut v = Validator::new(Self::schema(), values, diagnostics);
/// let id = v.required::<u64>("id");
/// let names = v.records::<Name>("names");
/// v.finish()?;
/// Ok(Self { id: id?, names: names? })
/// ```
pub struct Validator<'s, 'd, 'a, 'input> {
    schema: &'s Schema,
    values: FieldValues<'a, 'input>,
    diagnostics: &'d mut Vec<MissingField>,
    errors: Vec<FieldError>,
}

impl<'s, 'd, 'a, 'input> Validator<'s, 'd, 'a, 'input> {
    /// # Arguments
    /// * `schema` - Schema of the record being constructed
    /// * `values` - Values extracted for that record
    /// * `diagnostics` - Sink for diagnostics of nested records
    #[must_use]
    pub fn new(
        schema: &'s Schema,
        values: FieldValues<'a, 'input>,
        diagnostics: &'d mut Vec<MissingField>,
    ) -> Self {
        Self {
            schema,
            values,
            diagnostics,
            errors: Vec::new(),
        }
    }

    /// A scalar field that must be present.
    ///
    /// # Errors
    /// `Missing` if absent, `Invalid`/`OutOfBounds` if coercion or constraints fail.
    pub fn required<T>(&mut self, field: &str) -> Result<T, FieldError>
    where
        T: FromStr,
        T::Err: Display,
    {
        let result = match self.values.take(field) {
            None => Err(FieldErrorKind::Missing),
            Some(value) => self.coerce(field, value),
        };
        self.record_result(field, result)
    }

    /// A scalar field that may be absent.
    ///
    /// # Errors
    /// `Invalid`/`OutOfBounds` if a present value fails coercion or constraints.
    pub fn optional<T>(&mut self, field: &str) -> Result<Option<T>, FieldError>
    where
        T: FromStr,
        T::Err: Display,
    {
        let result = match self.values.take(field) {
            None => Ok(None),
            Some(value) => self.coerce(field, value).map(Some),
        };
        self.record_result(field, result)
    }

    /// A list of nested records, one per matched element. Absent means empty.
    ///
    /// # Errors
    /// `Invalid` if the value is a scalar or any nested record fails.
    pub fn records<R: XmlRecord>(&mut self, field: &str) -> Result<Vec<R>, FieldError> {
        let result = match self.values.take(field) {
            None => Ok(Vec::new()),
            Some(RawValue::List(nodes)) => nodes
                .iter()
                .enumerate()
                .map(|(index, node)| {
                    self.nested::<R>(*node)
                        .map_err(|err| FieldErrorKind::Invalid(format!("item {index}: {err}")))
                })
                .collect(),
            Some(RawValue::Scalar(_)) => Err(expected_list()),
        };
        self.record_result(field, result)
    }

    /// A single nested record taken from the first matched element.
    ///
    /// # Errors
    /// `Invalid` if the value is a scalar or the nested record fails.
    pub fn record<R: XmlRecord>(&mut self, field: &str) -> Result<Option<R>, FieldError> {
        let result = match self.values.take(field) {
            None => Ok(None),
            Some(RawValue::List(nodes)) => nodes
                .first()
                .map(|node| self.nested::<R>(*node))
                .transpose()
                .map_err(|err| FieldErrorKind::Invalid(err.to_string())),
            Some(RawValue::Scalar(_)) => Err(expected_list()),
        };
        self.record_result(field, result)
    }

    /// Text content of every matched element, skipping empty ones.
    ///
    /// # Errors
    /// `Invalid` if the value is a scalar.
    pub fn texts(&mut self, field: &str) -> Result<Vec<String>, FieldError> {
        let result = match self.values.take(field) {
            None => Ok(Vec::new()),
            Some(RawValue::List(nodes)) => Ok(nodes
                .iter()
                .filter_map(|node| text_content(*node))
                .map(String::from)
                .collect()),
            Some(RawValue::Scalar(_)) => Err(expected_list()),
        };
        self.record_result(field, result)
    }

    /// Report every failure recorded so far.
    ///
    /// # Errors
    /// Returns a `ConstructionError` if any accessor failed.
    pub fn finish(self) -> Result<(), ConstructionError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ConstructionError {
                record: self.schema.record().to_string(),
                errors: self.errors,
            })
        }
    }

    fn coerce<T>(&self, field: &str, value: RawValue<'_, '_>) -> Result<T, FieldErrorKind>
    where
        T: FromStr,
        T::Err: Display,
    {
        let RawValue::Scalar(raw) = value else {
            return Err(FieldErrorKind::Invalid(
                "expected a single value, found a list of elements".to_string(),
            ));
        };

        if let Some(constraints) = self.schema.field(field).map(|f| f.constraints()) {
            check_constraints(&raw, constraints)?;
        }

        // Strings keep their whitespace; other types get a trimmed retry
        raw.parse::<T>()
            .or_else(|err| match raw.trim() {
                trimmed if trimmed.len() < raw.len() => trimmed.parse::<T>(),
                _ => Err(err),
            })
            .map_err(|err| FieldErrorKind::Invalid(format!("{raw:?}: {err}")))
    }

    /// Construct a nested record, keeping its diagnostics.
    fn nested<R: XmlRecord>(&mut self, node: Node<'_, '_>) -> Result<R, ConstructionError> {
        let (record, diagnostics) = R::from_xml_with_diagnostics(node)?;
        self.diagnostics.extend(diagnostics);
        Ok(record)
    }

    fn record_result<T>(
        &mut self,
        field: &str,
        result: Result<T, FieldErrorKind>,
    ) -> Result<T, FieldError> {
        result.map_err(|kind| {
            let error = FieldError::new(self.schema.record(), field, kind);
            self.errors.push(error.clone());
            error
        })
    }
}

fn expected_list() -> FieldErrorKind {
    FieldErrorKind::Invalid("expected a list of elements, found a single value".to_string())
}

fn check_constraints(raw: &str, constraints: &Constraints) -> Result<(), FieldErrorKind> {
    let length = raw.chars().count();
    if let Some(min) = constraints.min_length {
        if length < min {
            return Err(FieldErrorKind::OutOfBounds(format!(
                "length {length} is shorter than {min}"
            )));
        }
    }
    if let Some(max) = constraints.max_length {
        if length > max {
            return Err(FieldErrorKind::OutOfBounds(format!(
                "length {length} is longer than {max}"
            )));
        }
    }

    if !constraints.has_bounds() {
        return Ok(());
    }

    let number: f64 = raw
        .trim()
        .parse()
        .map_err(|_| FieldErrorKind::Invalid(format!("{raw:?} is not a number")))?;
    if let Some(ge) = constraints.ge {
        if number < ge {
            return Err(FieldErrorKind::OutOfBounds(format!(
                "{number} is less than {ge}"
            )));
        }
    }
    if let Some(le) = constraints.le {
        if number > le {
            return Err(FieldErrorKind::OutOfBounds(format!(
                "{number} is greater than {le}"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::FieldDescriptor;
    use roxmltree::Document;
    use std::sync::LazyLock;

    #[derive(Debug, PartialEq)]
    struct Player {
        name: String,
        age: Option<u32>,
    }

    static PLAYER_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
        Schema::builder("Player")
            .field(FieldDescriptor::attribute("name").with_constraints(
                Constraints::new().with_min_length(1),
            ))
            .field(FieldDescriptor::find("age").with_constraints(
                Constraints::new().with_ge(0.0).with_le(120.0),
            ))
            .build()
            .unwrap()
    });

    impl XmlRecord for Player {
        fn schema() -> &'static Schema {
            &PLAYER_SCHEMA
        }

        fn construct(
            values: FieldValues<'_, '_>,
            diagnostics: &mut Vec<MissingField>,
        ) -> Result<Self, ConstructionError> {
            let mut v = Validator::new(Self::schema(), values, diagnostics);
            let name = v.required::<String>("name");
            let age = v.optional::<u32>("age");
            v.finish()?;
            Ok(Self {
                name: name?,
                age: age?,
            })
        }
    }

    #[derive(Debug, PartialEq)]
    struct Team {
        players: Vec<Player>,
        captain: Option<Player>,
        mottos: Vec<String>,
    }

    static TEAM_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
        Schema::builder("Team")
            .field(FieldDescriptor::find_all("players").with_tag("player"))
            .field(FieldDescriptor::find_all("captain"))
            .field(FieldDescriptor::find_all("mottos").with_tag("motto"))
            .build()
            .unwrap()
    });

    impl XmlRecord for Team {
        fn schema() -> &'static Schema {
            &TEAM_SCHEMA
        }

        fn construct(
            values: FieldValues<'_, '_>,
            diagnostics: &mut Vec<MissingField>,
        ) -> Result<Self, ConstructionError> {
            let mut v = Validator::new(Self::schema(), values, diagnostics);
            let players = v.records::<Player>("players");
            let captain = v.record::<Player>("captain");
            let mottos = v.texts("mottos");
            v.finish()?;
            Ok(Self {
                players: players?,
                captain: captain?,
                mottos: mottos?,
            })
        }
    }

    #[test]
    fn test_from_xml_coerces_values() {
        let doc = Document::parse(r#"<player name="Ada"><age value="36"/></player>"#).unwrap();
        let player = Player::from_xml(doc.root_element()).unwrap();
        assert_eq!(
            player,
            Player {
                name: "Ada".to_string(),
                age: Some(36),
            }
        );
    }

    #[test]
    fn test_optional_field_absent_with_diagnostic() {
        let doc = Document::parse(r#"<player name="Ada"/>"#).unwrap();
        let (player, diagnostics) = Player::from_xml_with_diagnostics(doc.root_element()).unwrap();

        assert_eq!(player.age, None);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].field, "age");
    }

    #[test]
    fn test_reports_every_failing_field() {
        let doc = Document::parse(r#"<player><age value="old"/></player>"#).unwrap();
        let err = Player::from_xml(doc.root_element()).unwrap_err();

        assert_eq!(err.record, "Player");
        assert_eq!(err.fields(), vec!["name", "age"]);
        assert_eq!(err.errors[0].kind, FieldErrorKind::Missing);
        assert!(matches!(err.errors[1].kind, FieldErrorKind::Invalid(_)));
    }

    #[test]
    fn test_bounds_are_enforced() {
        let doc = Document::parse(r#"<player name="Ada"><age value="130"/></player>"#).unwrap();
        let err = Player::from_xml(doc.root_element()).unwrap_err();

        assert_eq!(
            err.errors[0].kind,
            FieldErrorKind::OutOfBounds("130 is greater than 120".to_string())
        );
    }

    #[test]
    fn test_length_is_enforced() {
        let doc = Document::parse(r#"<player name=""/>"#).unwrap();
        let err = Player::from_xml(doc.root_element()).unwrap_err();

        assert_eq!(err.fields(), vec!["name"]);
        assert!(matches!(err.errors[0].kind, FieldErrorKind::OutOfBounds(_)));
    }

    #[test]
    fn test_nested_records() {
        let xml = r#"<team>
            <player name="Ada"/>
            <player name="Grace"><age value="85"/></player>
            <captain name="Ada"/>
            <motto>Play fair</motto>
            <motto> </motto>
        </team>"#;
        let doc = Document::parse(xml).unwrap();
        let team = Team::from_xml(doc.root_element()).unwrap();

        assert_eq!(team.players.len(), 2);
        assert_eq!(team.players[1].age, Some(85));
        assert_eq!(team.captain.map(|c| c.name), Some("Ada".to_string()));
        assert_eq!(team.mottos, vec!["Play fair".to_string()]);
    }

    #[test]
    fn test_nested_diagnostics_reach_parent() {
        let xml = r#"<team><player name="Ada"/><player name="Grace"><age value="85"/></player></team>"#;
        let doc = Document::parse(xml).unwrap();
        let (team, diagnostics) = Team::from_xml_with_diagnostics(doc.root_element()).unwrap();

        assert_eq!(team.players.len(), 2);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].field, "age");
        assert_eq!(diagnostics[0].element, "player");
    }

    #[test]
    fn test_string_attribute_keeps_whitespace() {
        let doc = Document::parse(r#"<player name=" Ada "><age value=" 36 "/></player>"#).unwrap();
        let player = Player::from_xml(doc.root_element()).unwrap();

        assert_eq!(player.name, " Ada ");
        assert_eq!(player.age, Some(36));
    }

    #[test]
    fn test_whitespace_value_is_not_a_number() {
        let doc = Document::parse(r#"<player name="Ada"><age value="  "/></player>"#).unwrap();
        let err = Player::from_xml(doc.root_element()).unwrap_err();

        assert_eq!(err.fields(), vec!["age"]);
        assert!(matches!(err.errors[0].kind, FieldErrorKind::Invalid(_)));
    }

    #[test]
    fn test_nested_failure_reported_under_parent_field() {
        let doc = Document::parse(r#"<team><player name="Ada"/><player/></team>"#).unwrap();
        let err = Team::from_xml(doc.root_element()).unwrap_err();

        assert_eq!(err.record, "Team");
        assert_eq!(err.fields(), vec!["players"]);
        let FieldErrorKind::Invalid(message) = &err.errors[0].kind else {
            panic!("expected an invalid-value error");
        };
        assert!(message.starts_with("item 1:"));
    }

    #[test]
    fn test_list_for_scalar_field_is_invalid() {
        let schema = Schema::builder("Player")
            .field(FieldDescriptor::find_all("name"))
            .build()
            .unwrap();
        let mut values = FieldValues::new("player");
        values.insert("name", RawValue::List(Vec::new()));

        let mut diagnostics = Vec::new();
        let mut v = Validator::new(&schema, values, &mut diagnostics);
        assert!(v.required::<String>("name").is_err());
        assert!(v.finish().is_err());
    }
}
