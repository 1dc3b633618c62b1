//! Locale identifiers shared across the workspace.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use unic_langid::LanguageIdentifier;

/// Error returned when a string is not a well-formed language tag.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid locale tag '{0}'")]
pub struct LocaleTagError(pub String);

/// A canonicalized BCP-47 language tag such as `en`, `es-MX` or `pt-BR`.
///
/// Underscore separators (`pt_BR`) are accepted on input and normalized to
/// hyphens, so two spellings of the same tag compare equal.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Locale {
    tag: String,
    language: String,
    region: Option<String>,
}

impl Locale {
    /// Parses and canonicalizes a language tag.
    pub fn parse(tag: &str) -> Result<Self, LocaleTagError> {
        let trimmed = tag.trim();
        if trimmed.is_empty() {
            return Err(LocaleTagError(tag.to_string()));
        }

        let id: LanguageIdentifier = trimmed
            .parse()
            .map_err(|_| LocaleTagError(tag.to_string()))?;

        Ok(Self::from_identifier(&id))
    }

    /// Builds a locale from an already parsed identifier.
    #[must_use]
    pub fn from_identifier(id: &LanguageIdentifier) -> Self {
        Self {
            tag: id.to_string(),
            language: id.language.as_str().to_string(),
            region: id.region.as_ref().map(|region| region.as_str().to_string()),
        }
    }

    /// The canonical tag.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.tag
    }

    /// The primary language subtag (`pt` for `pt-BR`).
    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    /// The region subtag, if the tag carries one.
    #[must_use]
    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    /// Converts back into a `unic-langid` identifier.
    #[must_use]
    pub fn to_language_identifier(&self) -> LanguageIdentifier {
        // The tag was produced by `LanguageIdentifier::to_string`, so it re-parses.
        self.tag.parse().unwrap_or_default()
    }
}

impl Default for Locale {
    /// English (`en`).
    fn default() -> Self {
        Self {
            tag: "en".to_string(),
            language: "en".to_string(),
            region: None,
        }
    }
}

impl fmt::Debug for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Locale({})", self.tag)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag)
    }
}

impl FromStr for Locale {
    type Err = LocaleTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Locale {
    type Error = LocaleTagError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for Locale {
    type Error = LocaleTagError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Locale> for String {
    fn from(locale: Locale) -> Self {
        locale.tag
    }
}

impl AsRef<str> for Locale {
    fn as_ref(&self) -> &str {
        &self.tag
    }
}

impl PartialEq<str> for Locale {
    fn eq(&self, other: &str) -> bool {
        self.tag == other
    }
}

impl PartialEq<&str> for Locale {
    fn eq(&self, other: &&str) -> bool {
        self.tag == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_tag() {
        let locale = Locale::parse("en").unwrap();
        assert_eq!(locale.as_str(), "en");
        assert_eq!(locale.language(), "en");
        assert_eq!(locale.region(), None);
    }

    #[test]
    fn test_parse_normalizes_underscore_and_case() {
        let locale = Locale::parse("pt_br").unwrap();
        assert_eq!(locale.as_str(), "pt-BR");
        assert_eq!(locale.language(), "pt");
        assert_eq!(locale.region(), Some("BR"));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Locale::parse("").is_err());
        assert!(Locale::parse("   ").is_err());
        assert!(Locale::parse("not a tag!").is_err());
    }

    #[test]
    fn test_default_matches_parsed_english() {
        assert_eq!(Locale::default(), Locale::parse("en").unwrap());
    }

    #[test]
    fn test_equality_with_str() {
        let locale: Locale = "es".parse().unwrap();
        assert_eq!(locale, "es");
        assert_eq!(locale.to_string(), "es");
    }
}
