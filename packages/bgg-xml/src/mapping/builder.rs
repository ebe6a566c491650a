//! Record builder: one extraction pass over every field of a schema.

use std::fmt;

use indexmap::IndexMap;
use roxmltree::Node;

use super::auto::infer_strategy;
use super::extract::{extract, Extraction};
use super::schema::Schema;
use super::strategy::LookupStrategy;
use crate::xml::get_tag_name;

/// A value that was found for a field.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue<'a, 'input> {
    Scalar(String),
    List(Vec<Node<'a, 'input>>),
}

/// Field identifier -> raw value, for one element.
///
/// Fields that were absent have no entry. Entries keep schema order.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldValues<'a, 'input> {
    element: String,
    values: IndexMap<String, RawValue<'a, 'input>>,
}

impl<'a, 'input> FieldValues<'a, 'input> {
    /// Create an empty value map for the named element.
    #[must_use]
    pub fn new(element: impl Into<String>) -> Self {
        Self {
            element: element.into(),
            values: IndexMap::new(),
        }
    }

    /// Tag of the element the values were extracted from.
    #[must_use]
    pub fn element(&self) -> &str {
        &self.element
    }

    pub fn insert(&mut self, field: impl Into<String>, value: RawValue<'a, 'input>) {
        self.values.insert(field.into(), value);
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&RawValue<'a, 'input>> {
        self.values.get(field)
    }

    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.values.contains_key(field)
    }

    /// Remove and return the value for a field.
    pub fn take(&mut self, field: &str) -> Option<RawValue<'a, 'input>> {
        self.values.shift_remove(field)
    }

    /// Field identifiers that have a value, in schema order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Diagnostic for a field whose explicit strategy found nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingField {
    /// Field identifier.
    pub field: String,
    /// Resolved tag that was looked up.
    pub tag: String,
    /// Tag of the element that was searched.
    pub element: String,
}

impl fmt::Display for MissingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Missing field '{}' in XML element {}", self.tag, self.element)
    }
}

/// Result of one builder pass.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildOutput<'a, 'input> {
    /// Values found, keyed by field identifier.
    pub values: FieldValues<'a, 'input>,
    /// One entry per explicit-strategy field that came back absent.
    pub diagnostics: Vec<MissingField>,
}

/// Runs every descriptor of a schema against an element.
///
/// A field that cannot be found never stops the pass; it is logged (for
/// explicit strategies) and left out of the value map.
#[derive(Debug, Clone, Copy)]
pub struct RecordBuilder<'s> {
    schema: &'s Schema,
}

impl<'s> RecordBuilder<'s> {
    #[must_use]
    pub fn new(schema: &'s Schema) -> Self {
        Self { schema }
    }

    #[must_use]
    pub fn schema(&self) -> &'s Schema {
        self.schema
    }

    /// Extract every field of the schema from `node`.
    pub fn build<'a, 'input>(&self, node: Node<'a, 'input>) -> BuildOutput<'a, 'input> {
        let element = get_tag_name(node);
        let mut values = FieldValues::new(element);
        let mut diagnostics = Vec::new();

        for descriptor in self.schema.fields() {
            let tag = descriptor.resolve_tag();

            let extraction = match descriptor.strategy() {
                LookupStrategy::Auto => {
                    let inferred = infer_strategy(node, tag);
                    tracing::trace!(
                        record = %self.schema.record(),
                        field = %descriptor.ident(),
                        tag = %tag,
                        strategy = ?inferred,
                        "Inferred lookup strategy"
                    );
                    inferred.map_or(Extraction::Absent, |strategy| extract(node, tag, strategy))
                }
                strategy => extract(node, tag, strategy),
            };

            match extraction {
                Extraction::Scalar(value) => {
                    values.insert(descriptor.ident(), RawValue::Scalar(value));
                }
                Extraction::List(nodes) => {
                    values.insert(descriptor.ident(), RawValue::List(nodes));
                }
                Extraction::Absent if descriptor.strategy().is_auto() => {}
                Extraction::Absent => {
                    let missing = MissingField {
                        field: descriptor.ident().to_string(),
                        tag: tag.to_string(),
                        element: element.to_string(),
                    };
                    tracing::warn!(
                        field = %missing.field,
                        tag = %missing.tag,
                        element = %missing.element,
                        "{missing}"
                    );
                    diagnostics.push(missing);
                }
            }
        }

        BuildOutput {
            values,
            diagnostics,
        }
    }
}
