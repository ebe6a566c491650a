//! Record schemas: the fixed set of field descriptors for a record type.

use std::collections::HashSet;

use convert_case::{Case, Casing};

use super::descriptor::FieldDescriptor;
use crate::error::SchemaError;

/// Field descriptors for one record type, in declaration order.
///
/// Built once (usually into a `static LazyLock`) and shared read-only by
/// every extraction pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    record: String,
    fields: Vec<FieldDescriptor>,
}

impl Schema {
    /// Start declaring a schema for the named record type.
    #[must_use]
    pub fn builder(record: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            record: record.into(),
            fields: Vec::new(),
            alias_case: None,
        }
    }

    /// Name of the record type.
    #[must_use]
    pub fn record(&self) -> &str {
        &self.record
    }

    /// All descriptors, in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Look up a descriptor by field identifier.
    #[must_use]
    pub fn field(&self, ident: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.ident() == ident)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Builder for [`Schema`].
#[derive(Debug)]
pub struct SchemaBuilder {
    record: String,
    fields: Vec<FieldDescriptor>,
    alias_case: Option<Case>,
}

impl SchemaBuilder {
    /// Generate an alias for every field without one by converting its
    /// identifier to the given case (`Case::Flat`: `sort_index` -> `sortindex`).
    #[must_use]
    pub fn alias_generator(mut self, case: Case) -> Self {
        self.alias_case = Some(case);
        self
    }

    /// Declare a field.
    #[must_use]
    pub fn field(mut self, descriptor: FieldDescriptor) -> Self {
        self.fields.push(descriptor);
        self
    }

    /// Finish the schema.
    ///
    /// # Errors
    /// Returns `SchemaError::DuplicateField` if two descriptors share an identifier.
    pub fn build(self) -> Result<Schema, SchemaError> {
        {
            let mut seen = HashSet::new();
            for field in &self.fields {
                if !seen.insert(field.ident()) {
                    return Err(SchemaError::DuplicateField {
                        record: self.record.clone(),
                        field: field.ident().to_string(),
                    });
                }
            }
        }

        let mut fields = self.fields;
        if let Some(case) = self.alias_case {
            for field in &mut fields {
                let alias = field.ident().to_case(case);
                field.set_default_alias(alias);
            }
        }

        Ok(Schema {
            record: self.record,
            fields,
        })
    }
}
