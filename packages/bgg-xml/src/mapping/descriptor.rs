//! Per-field extraction descriptors.

use super::strategy::LookupStrategy;

/// Validation constraints carried alongside a field.
///
/// The extraction engine never looks at these; they are forwarded to the
/// [`Validator`](super::Validator) when the record is constructed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Constraints {
    /// Human-readable description of the field.
    pub description: Option<&'static str>,
    /// Inclusive numeric lower bound.
    pub ge: Option<f64>,
    /// Inclusive numeric upper bound.
    pub le: Option<f64>,
    /// Minimum length in characters.
    pub min_length: Option<usize>,
    /// Maximum length in characters.
    pub max_length: Option<usize>,
}

impl Constraints {
    /// Create an empty constraint set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_description(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }

    #[must_use]
    pub fn with_ge(mut self, bound: f64) -> Self {
        self.ge = Some(bound);
        self
    }

    #[must_use]
    pub fn with_le(mut self, bound: f64) -> Self {
        self.le = Some(bound);
        self
    }

    #[must_use]
    pub fn with_min_length(mut self, length: usize) -> Self {
        self.min_length = Some(length);
        self
    }

    #[must_use]
    pub fn with_max_length(mut self, length: usize) -> Self {
        self.max_length = Some(length);
        self
    }

    /// Whether any numeric bound is declared.
    #[must_use]
    pub fn has_bounds(&self) -> bool {
        self.ge.is_some() || self.le.is_some()
    }
}

/// Extraction metadata for one field of a record type.
///
/// Descriptors are declared once alongside the record type and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    ident: String,
    strategy: LookupStrategy,
    xml_tag: Option<String>,
    alias: Option<String>,
    constraints: Constraints,
}

impl FieldDescriptor {
    /// Create a descriptor using the `Auto` strategy.
    #[must_use]
    pub fn new(ident: impl Into<String>) -> Self {
        Self {
            ident: ident.into(),
            strategy: LookupStrategy::Auto,
            xml_tag: None,
            alias: None,
            constraints: Constraints::default(),
        }
    }

    /// Shorthand for an `Attribute` descriptor.
    #[must_use]
    pub fn attribute(ident: impl Into<String>) -> Self {
        Self::new(ident).with_strategy(LookupStrategy::Attribute)
    }

    /// Shorthand for a `Text` descriptor.
    #[must_use]
    pub fn text(ident: impl Into<String>) -> Self {
        Self::new(ident).with_strategy(LookupStrategy::Text)
    }

    /// Shorthand for a `Find` descriptor.
    #[must_use]
    pub fn find(ident: impl Into<String>) -> Self {
        Self::new(ident).with_strategy(LookupStrategy::Find)
    }

    /// Shorthand for a `FindAll` descriptor.
    #[must_use]
    pub fn find_all(ident: impl Into<String>) -> Self {
        Self::new(ident).with_strategy(LookupStrategy::FindAll)
    }

    #[must_use]
    pub fn with_strategy(mut self, strategy: LookupStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Override the source tag explicitly. Takes precedence over the alias.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.xml_tag = Some(tag.into());
        self
    }

    /// Set the field's external name.
    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    #[must_use]
    pub fn with_constraints(mut self, constraints: Constraints) -> Self {
        self.constraints = constraints;
        self
    }

    /// Field identifier, used as the key in the value map.
    #[must_use]
    pub fn ident(&self) -> &str {
        &self.ident
    }

    #[must_use]
    pub fn strategy(&self) -> LookupStrategy {
        self.strategy
    }

    #[must_use]
    pub fn xml_tag(&self) -> Option<&str> {
        self.xml_tag.as_deref()
    }

    #[must_use]
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    #[must_use]
    pub fn constraints(&self) -> &Constraints {
        &self.constraints
    }

    /// Resolve the tag used to look this field up.
    ///
    /// Precedence: explicit tag, then alias, then the field identifier.
    ///
    /// # Examples
    /// ```
    /// use bgg_xml::mapping::FieldDescriptor;
    ///
    /// let field = FieldDescriptor::find("year_published").with_alias("yearpublished");
    /// assert_eq!(field.resolve_tag(), "yearpublished");
    ///
    /// let field = field.with_tag("published");
    /// assert_eq!(field.resolve_tag(), "published");
    /// ```
    #[must_use]
    pub fn resolve_tag(&self) -> &str {
        self.xml_tag
            .as_deref()
            .or(self.alias.as_deref())
            .unwrap_or(&self.ident)
    }

    /// Fill in the alias if none was declared.
    pub(crate) fn set_default_alias(&mut self, alias: String) {
        if self.alias.is_none() {
            self.alias = Some(alias);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_tag_prefers_explicit_tag() {
        let field = FieldDescriptor::find_all("names")
            .with_alias("alias")
            .with_tag("name");
        assert_eq!(field.resolve_tag(), "name");
    }

    #[test]
    fn test_resolve_tag_uses_alias() {
        let field = FieldDescriptor::attribute("game_type").with_alias("type");
        assert_eq!(field.resolve_tag(), "type");
    }

    #[test]
    fn test_resolve_tag_falls_back_to_ident() {
        let field = FieldDescriptor::attribute("id");
        assert_eq!(field.resolve_tag(), "id");
    }

    #[test]
    fn test_shorthand_constructors() {
        assert_eq!(FieldDescriptor::new("a").strategy(), LookupStrategy::Auto);
        assert_eq!(FieldDescriptor::attribute("a").strategy(), LookupStrategy::Attribute);
        assert_eq!(FieldDescriptor::text("a").strategy(), LookupStrategy::Text);
        assert_eq!(FieldDescriptor::find("a").strategy(), LookupStrategy::Find);
        assert_eq!(FieldDescriptor::find_all("a").strategy(), LookupStrategy::FindAll);
    }

    #[test]
    fn test_default_alias_does_not_override_declared_alias() {
        let mut field = FieldDescriptor::attribute("game_type").with_alias("type");
        field.set_default_alias("gametype".to_string());
        assert_eq!(field.alias(), Some("type"));

        let mut field = FieldDescriptor::attribute("sort_index");
        field.set_default_alias("sortindex".to_string());
        assert_eq!(field.resolve_tag(), "sortindex");
    }

    #[test]
    fn test_constraints_builder() {
        let constraints = Constraints::new()
            .with_description("Minimum number of players")
            .with_ge(0.0)
            .with_le(100.0);

        assert!(constraints.has_bounds());
        assert_eq!(constraints.description, Some("Minimum number of players"));
        assert!(!Constraints::new().has_bounds());
    }
}
