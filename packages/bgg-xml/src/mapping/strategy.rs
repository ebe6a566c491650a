//! Lookup strategies for field extraction.

use strum::{AsRefStr, Display, EnumString};

/// How a field's value is located on an XML element.
///
/// The set is closed; every strategy has exactly one handler in
/// [`extract`](super::extract).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, AsRefStr,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LookupStrategy {
    /// Attribute on the element itself, named by the resolved tag.
    Attribute,
    /// Text of the matching child, or of the element itself when no child matches.
    Text,
    /// First matching child: its `value` attribute, else its text.
    Find,
    /// Every matching child, as a list (possibly empty).
    FindAll,
    /// Decide per element which of the above fits.
    #[default]
    Auto,
}

impl LookupStrategy {
    /// Parse a strategy name, falling back to `Auto` for unknown names.
    ///
    /// # Examples
    /// ```
    /// use bgg_xml::mapping::LookupStrategy;
    ///
    /// assert_eq!(LookupStrategy::parse_lenient("FindAll"), LookupStrategy::FindAll);
    /// assert_eq!(LookupStrategy::parse_lenient("xpath"), LookupStrategy::Auto);
    /// ```
    #[must_use]
    pub fn parse_lenient(name: &str) -> Self {
        name.trim().parse().unwrap_or_default()
    }

    /// Whether this is the inferring strategy.
    #[must_use]
    pub fn is_auto(self) -> bool {
        self == Self::Auto
    }
}
