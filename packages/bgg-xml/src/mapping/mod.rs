//! Declarative XML-to-record mapping.
//!
//! Each record type declares a [`Schema`]: one [`FieldDescriptor`] per field,
//! naming a [`LookupStrategy`] and optionally an explicit source tag. The
//! [`RecordBuilder`] runs every descriptor against an element and collects
//! the raw values into [`FieldValues`]; the record's [`XmlRecord::construct`]
//! then coerces them through a [`Validator`].
//!
//! Missing data never aborts a pass. Explicit strategies that find nothing
//! produce a [`MissingField`] diagnostic; `Auto` misses are silent.

mod auto;
mod builder;
mod descriptor;
mod extract;
mod record;
mod schema;
mod strategy;

pub use auto::{infer, infer_strategy};
pub use builder::{BuildOutput, FieldValues, MissingField, RawValue, RecordBuilder};
pub use descriptor::{Constraints, FieldDescriptor};
pub use extract::{extract, Extraction};
pub use record::{Validator, XmlRecord};
pub use schema::{Schema, SchemaBuilder};
pub use strategy::LookupStrategy;
