//! Error types for the BGG XML mapper.
//!
//! Uses the dual-error pattern: `BggError` for library consumers with
//! detailed error context, and the record-level `ConstructionError` /
//! `FieldError` pair reported when a value map cannot be turned into a
//! typed record.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the library.
#[derive(Debug, Error)]
pub enum BggError {
    /// Invalid thing ID format.
    #[error("Invalid thing ID: '{0}'. Expected a positive integer (e.g., 174430)")]
    InvalidThingId(String),

    /// Search query was empty.
    #[error("Search query must not be empty")]
    EmptyQuery,

    /// API URL could not be built.
    #[error("Invalid API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API kept answering 429 Too Many Requests.
    #[error("Rate limit exceeded after {attempts} attempts")]
    RateLimited { attempts: u32 },

    /// Transient failures persisted through every retry.
    #[error("Request failed after {attempts} attempts: {message}")]
    RetriesExhausted { attempts: u32, message: String },

    /// XML parsing failed.
    #[error("XML parsing failed: {0}")]
    XmlParse(#[from] roxmltree::Error),

    /// Document root was not the expected element.
    #[error("Unexpected root element <{found}>, expected <{expected}>")]
    UnexpectedRoot { expected: String, found: String },

    /// A record could not be constructed from the extracted values.
    #[error(transparent)]
    Construction(#[from] ConstructionError),

    /// Response cache could not be written or cleared.
    #[error("Cache error at {}: {message}", path.display())]
    Cache { path: PathBuf, message: String },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization error.
    #[error("YAML serialization failed: {0}")]
    YamlSerialization(#[from] serde_yaml_ng::Error),

    /// JSON serialization error.
    #[error("JSON serialization failed: {0}")]
    JsonSerialization(#[from] serde_json::Error),
}

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, BggError>;

/// Error raised while declaring a record schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Two descriptors share the same field identifier.
    #[error("Duplicate field '{field}' in schema for {record}")]
    DuplicateField { record: String, field: String },
}

/// Why a single field was rejected during record construction.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldErrorKind {
    /// Required field was absent from the value map.
    Missing,
    /// Value could not be coerced into the field type.
    Invalid(String),
    /// Value violated a declared constraint.
    OutOfBounds(String),
}

impl fmt::Display for FieldErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => f.write_str("field required"),
            Self::Invalid(msg) => write!(f, "invalid value: {msg}"),
            Self::OutOfBounds(msg) => write!(f, "constraint violated: {msg}"),
        }
    }
}

/// A field that failed coercion or constraint checking.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{record}.{field}: {kind}")]
pub struct FieldError {
    /// Record type the field belongs to.
    pub record: String,
    /// Field identifier.
    pub field: String,
    /// Failure detail.
    pub kind: FieldErrorKind,
}

impl FieldError {
    /// Create a new field error.
    #[must_use]
    pub fn new(record: impl Into<String>, field: impl Into<String>, kind: FieldErrorKind) -> Self {
        Self {
            record: record.into(),
            field: field.into(),
            kind,
        }
    }
}

/// Hard failure returned when a value map cannot become a record.
///
/// Lists every failing field, not just the first one encountered.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstructionError {
    /// Record type that failed to construct.
    pub record: String,
    /// Failing fields in declaration order.
    pub errors: Vec<FieldError>,
}

impl ConstructionError {
    /// Names of the fields that failed.
    #[must_use]
    pub fn fields(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.field.as_str()).collect()
    }
}

impl fmt::Display for ConstructionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Failed to construct {}: {} invalid field(s)",
            self.record,
            self.errors.len()
        )?;
        for error in &self.errors {
            write!(f, "; {}: {}", error.field, error.kind)?;
        }
        Ok(())
    }
}

impl std::error::Error for ConstructionError {}

impl From<FieldError> for ConstructionError {
    fn from(error: FieldError) -> Self {
        Self {
            record: error.record.clone(),
            errors: vec![error],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BggError::InvalidThingId("abc".to_string());
        assert!(err.to_string().contains("abc"));
        assert!(err.to_string().contains("positive integer"));
    }

    #[test]
    fn test_cache_error_display() {
        let err = BggError::Cache {
            path: PathBuf::from(".cache/abc.cache"),
            message: "permission denied".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Cache error at .cache/abc.cache: permission denied"
        );
    }

    #[test]
    fn test_field_error_display() {
        let err = FieldError::new("Game", "id", FieldErrorKind::Missing);
        assert_eq!(err.to_string(), "Game.id: field required");
    }

    #[test]
    fn test_construction_error_lists_all_fields() {
        let err = ConstructionError {
            record: "Game".to_string(),
            errors: vec![
                FieldError::new("Game", "id", FieldErrorKind::Missing),
                FieldError::new(
                    "Game",
                    "min_age",
                    FieldErrorKind::Invalid("\"ten\": invalid digit found in string".to_string()),
                ),
            ],
        };

        assert_eq!(err.fields(), vec!["id", "min_age"]);
        assert_eq!(
            err.to_string(),
            "Failed to construct Game: 2 invalid field(s); id: field required; \
             min_age: invalid value: \"ten\": invalid digit found in string"
        );
    }

    #[test]
    fn test_construction_error_from_field_error() {
        let err: ConstructionError =
            FieldError::new("Link", "value", FieldErrorKind::Missing).into();
        assert_eq!(err.record, "Link");
        assert_eq!(err.fields(), vec!["value"]);
    }
}
