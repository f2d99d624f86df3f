//! Parsing of raw generated names into genus and epithet.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::errors::{BinomenError, Result};

/// Emphasis markers stripped from generated names by default.
pub const DEFAULT_MARKUP_CHARS: &[char] = &['*', '_'];

/// Remove decorative emphasis markers and surrounding whitespace.
pub fn strip_markup(raw: &str, markup_chars: &[char]) -> String {
    raw.chars()
        .filter(|c| !markup_chars.contains(c))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Whitespace-separated tokens of a name after markup stripping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameTokens {
    cleaned: String,
}

impl NameTokens {
    /// Strip markup from `raw` and keep the cleaned text for tokenisation.
    pub fn new(raw: &str, markup_chars: &[char]) -> Self {
        Self {
            cleaned: strip_markup(raw, markup_chars),
        }
    }

    /// The cleaned name text
    pub fn cleaned(&self) -> &str {
        &self.cleaned
    }

    /// Iterate the tokens in order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.cleaned.split_whitespace()
    }

    /// Number of tokens
    pub fn count(&self) -> usize {
        self.iter().count()
    }

    /// First token, if any
    pub fn first(&self) -> Option<&str> {
        self.iter().next()
    }
}

/// A two-word scientific name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BinomialName {
    /// Genus (first word)
    pub genus: String,
    /// Species epithet (second word)
    pub epithet: String,
}

impl BinomialName {
    /// Parse a name that must consist of exactly two words.
    pub fn parse(raw: &str, markup_chars: &[char]) -> Result<Self> {
        let tokens = NameTokens::new(raw, markup_chars);
        let parts: Vec<&str> = tokens.iter().collect();
        match parts.as_slice() {
            [genus, epithet] => Ok(Self {
                genus: (*genus).to_string(),
                epithet: (*epithet).to_string(),
            }),
            _ => Err(BinomenError::malformed_name(tokens.cleaned(), parts.len(), 2)),
        }
    }

    /// Parse the leading two words of a name, ignoring anything after them.
    ///
    /// Fails only when fewer than two words are present.
    pub fn parse_leading(raw: &str, markup_chars: &[char]) -> Result<Self> {
        let tokens = NameTokens::new(raw, markup_chars);
        let mut iter = tokens.iter();
        match (iter.next(), iter.next()) {
            (Some(genus), Some(epithet)) => Ok(Self {
                genus: genus.to_string(),
                epithet: epithet.to_string(),
            }),
            _ => Err(BinomenError::malformed_name(
                tokens.cleaned(),
                tokens.count(),
                2,
            )),
        }
    }
}

impl fmt::Display for BinomialName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.genus, self.epithet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_markup_removes_emphasis() {
        assert_eq!(
            strip_markup("  *Panthera crinita*  ", DEFAULT_MARKUP_CHARS),
            "Panthera crinita"
        );
        assert_eq!(
            strip_markup("_Lutra ludicra_", DEFAULT_MARKUP_CHARS),
            "Lutra ludicra"
        );
    }

    #[test]
    fn test_parse_exactly_two_words() {
        let name = BinomialName::parse("*Panthera crinita*", DEFAULT_MARKUP_CHARS).unwrap();
        assert_eq!(name.genus, "Panthera");
        assert_eq!(name.epithet, "crinita");
        assert_eq!(name.to_string(), "Panthera crinita");
    }

    #[test]
    fn test_parse_rejects_other_counts() {
        for raw in ["", "Panthera", "Panthera leo persica"] {
            let err = BinomialName::parse(raw, DEFAULT_MARKUP_CHARS).unwrap_err();
            assert!(matches!(err, BinomenError::MalformedName { required: 2, .. }));
        }
    }

    #[test]
    fn test_parse_leading_ignores_trailing_words() {
        let name =
            BinomialName::parse_leading("Panthera leo persica", DEFAULT_MARKUP_CHARS).unwrap();
        assert_eq!(name.epithet, "leo");

        let err = BinomialName::parse_leading("Panthera", DEFAULT_MARKUP_CHARS).unwrap_err();
        assert!(matches!(err, BinomenError::MalformedName { tokens: 1, .. }));
    }

    #[test]
    fn test_name_tokens_counts_after_stripping() {
        let tokens = NameTokens::new("** **", DEFAULT_MARKUP_CHARS);
        assert_eq!(tokens.count(), 0);
        assert_eq!(tokens.first(), None);

        let tokens = NameTokens::new("*Felis  nirostralis*", DEFAULT_MARKUP_CHARS);
        assert_eq!(tokens.count(), 2);
        assert_eq!(tokens.first(), Some("Felis"));
    }
}
