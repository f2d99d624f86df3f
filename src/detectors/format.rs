//! Surface morphology check for a completed binomial.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::config::GrammarProfile;
use crate::core::grammar::MorphologyGrammar;
use crate::core::name::NameTokens;

/// Fixed confirmation reason for a well-formed name.
pub const VALID_FORMAT_REASON: &str = "Valid Latin binomial";

/// The first constraint a name broke.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FormatViolation {
    /// The cleaned name does not have exactly two words
    WordCount { found: usize },
    /// Genus does not start with an uppercase letter
    GenusCapital { genus: String },
    /// Genus is not one capital followed by lowercase letters
    GenusPattern { genus: String },
    /// Genus lacks a required Latin ending
    GenusSuffix { genus: String },
    /// Epithet contains uppercase or no letters at all
    EpithetCase { epithet: String },
    /// Epithet is not purely lowercase alphabetic
    EpithetPattern { epithet: String },
    /// Epithet lacks a required Latin ending
    EpithetSuffix { epithet: String },
}

impl fmt::Display for FormatViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WordCount { found } => write!(f, "Expected 2 words, got {found}"),
            Self::GenusCapital { genus } => {
                write!(f, "Genus '{genus}' should start with capital letter")
            }
            Self::GenusPattern { genus } => write!(f, "Genus '{genus}' doesn't match Latin pattern"),
            Self::GenusSuffix { genus } => write!(f, "Genus '{genus}' lacks a Latin suffix"),
            Self::EpithetCase { epithet } => {
                write!(f, "Species epithet '{epithet}' should be all lowercase")
            }
            Self::EpithetPattern { epithet } => {
                write!(f, "Species epithet '{epithet}' doesn't match Latin pattern")
            }
            Self::EpithetSuffix { epithet } => {
                write!(f, "Species epithet '{epithet}' lacks a Latin suffix")
            }
        }
    }
}

/// Outcome of [`validate_format`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatVerdict {
    /// Whether the name passed every check
    pub is_valid: bool,
    /// Human-readable reason
    pub reason: String,
    /// Broken constraint, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub violation: Option<FormatViolation>,
}

impl FormatVerdict {
    fn valid() -> Self {
        Self {
            is_valid: true,
            reason: VALID_FORMAT_REASON.to_string(),
            violation: None,
        }
    }

    fn invalid(violation: FormatViolation) -> Self {
        Self {
            is_valid: false,
            reason: violation.to_string(),
            violation: Some(violation),
        }
    }
}

/// Check a raw generated name against the morphology grammar.
///
/// Markup is stripped first. Checks run in order (word count, genus capital,
/// genus shape, epithet case, epithet shape) and the first failure is
/// reported.
pub fn validate_format(raw_name: &str, grammar: &MorphologyGrammar) -> FormatVerdict {
    let tokens = NameTokens::new(raw_name, grammar.markup_chars());
    let parts: Vec<&str> = tokens.iter().collect();
    let [genus, epithet] = parts.as_slice() else {
        return FormatVerdict::invalid(FormatViolation::WordCount { found: parts.len() });
    };

    if let Some(violation) = check_genus(genus, grammar) {
        return FormatVerdict::invalid(violation);
    }
    if let Some(violation) = check_epithet(epithet, grammar) {
        return FormatVerdict::invalid(violation);
    }
    FormatVerdict::valid()
}

fn check_genus(genus: &str, grammar: &MorphologyGrammar) -> Option<FormatViolation> {
    let starts_upper = genus.chars().next().is_some_and(char::is_uppercase);
    if !starts_upper {
        return Some(FormatViolation::GenusCapital {
            genus: genus.to_string(),
        });
    }
    if grammar.matches_genus(genus) {
        return None;
    }
    let genus = genus.to_string();
    if grammar.profile() == GrammarProfile::Strict && MorphologyGrammar::is_plain_genus(&genus) {
        Some(FormatViolation::GenusSuffix { genus })
    } else {
        Some(FormatViolation::GenusPattern { genus })
    }
}

fn check_epithet(epithet: &str, grammar: &MorphologyGrammar) -> Option<FormatViolation> {
    if !is_lowercase_word(epithet) {
        return Some(FormatViolation::EpithetCase {
            epithet: epithet.to_string(),
        });
    }
    if grammar.matches_epithet(epithet) {
        return None;
    }
    let epithet = epithet.to_string();
    if grammar.profile() == GrammarProfile::Strict && MorphologyGrammar::is_plain_epithet(&epithet)
    {
        Some(FormatViolation::EpithetSuffix { epithet })
    } else {
        Some(FormatViolation::EpithetPattern { epithet })
    }
}

/// At least one cased letter and no uppercase letters.
fn is_lowercase_word(word: &str) -> bool {
    word.chars().any(char::is_lowercase) && !word.chars().any(char::is_uppercase)
}
