//! Positional morphology grammar for binomial names.
//!
//! A genus is one uppercase letter followed by lowercase letters; an epithet
//! is lowercase letters only. The strict profile further requires the epithet
//! (and optionally the genus) to end in one of a closed set of Latin suffixes.
//! Patterns are compiled once when the grammar is built and reused for every
//! match, so a grammar can sit behind a per-token callback.

use regex::Regex;

use crate::core::config::{GrammarConfig, GrammarProfile};
use crate::core::errors::Result;

/// Latin noun and adjective endings accepted on species epithets.
pub const LATIN_EPITHET_SUFFIXES: &[&str] = &[
    "us", "a", "um", "is", "ensis", "ii", "ius", "iae", "ae", "i", "e", "ans", "ens", "atus",
    "oides", "ides", "or", "tor",
];

/// Latin endings accepted on genus names.
pub const LATIN_GENUS_SUFFIXES: &[&str] = &["us", "a", "um", "is", "ensis", "ii", "on", "ops"];

/// Relaxed suffix subset used when filtering single generation tokens.
pub const CONSTRAINT_EPITHET_SUFFIXES: &[&str] = &["us", "a", "um", "is", "ensis", "ii"];

const PLAIN_GENUS: &str = r"^[A-Z][a-z]+$";
const PLAIN_EPITHET: &str = r"^[a-z]+$";

/// Build the alternation group for a suffix list, longest first.
fn suffix_group(suffixes: &[String]) -> String {
    let mut sorted: Vec<&String> = suffixes.iter().collect();
    sorted.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    sorted.dedup();
    let alternatives: Vec<String> = sorted.iter().map(|s| regex::escape(s)).collect();
    format!("(?:{})", alternatives.join("|"))
}

/// Compile an epithet pattern, optionally requiring one of `suffixes`.
pub fn epithet_pattern(suffixes: &[String], require_suffix: bool) -> Result<Regex> {
    if require_suffix && !suffixes.is_empty() {
        Ok(Regex::new(&format!("^[a-z]+{}$", suffix_group(suffixes)))?)
    } else {
        Ok(Regex::new(PLAIN_EPITHET)?)
    }
}

/// Compile a genus pattern, optionally requiring one of `suffixes`.
pub fn genus_pattern(suffixes: &[String], require_suffix: bool) -> Result<Regex> {
    if require_suffix && !suffixes.is_empty() {
        Ok(Regex::new(&format!("^[A-Z][a-z]*{}$", suffix_group(suffixes)))?)
    } else {
        Ok(Regex::new(PLAIN_GENUS)?)
    }
}

/// Compiled morphology grammar
#[derive(Debug, Clone)]
pub struct MorphologyGrammar {
    profile: GrammarProfile,
    genus: Regex,
    epithet: Regex,
    markup_chars: Vec<char>,
}

impl MorphologyGrammar {
    /// Compile a grammar from configuration
    pub fn new(config: &GrammarConfig) -> Result<Self> {
        let strict = config.profile == GrammarProfile::Strict;
        Ok(Self {
            profile: config.profile,
            genus: genus_pattern(&config.genus_suffixes, strict && config.strict_genus)?,
            epithet: epithet_pattern(&config.epithet_suffixes, strict)?,
            markup_chars: config.markup_chars.clone(),
        })
    }

    /// Strictness profile this grammar was built with
    pub fn profile(&self) -> GrammarProfile {
        self.profile
    }

    /// Emphasis markers stripped before parsing
    pub fn markup_chars(&self) -> &[char] {
        &self.markup_chars
    }

    /// Full genus check under the active profile
    pub fn matches_genus(&self, genus: &str) -> bool {
        self.genus.is_match(genus)
    }

    /// Full epithet check under the active profile
    pub fn matches_epithet(&self, epithet: &str) -> bool {
        self.epithet.is_match(epithet)
    }

    /// Capitalised alphabetic shape, ignoring suffix requirements
    pub fn is_plain_genus(genus: &str) -> bool {
        let mut chars = genus.chars();
        chars.next().is_some_and(|c| c.is_ascii_uppercase())
            && genus.len() > 1
            && chars.all(|c| c.is_ascii_lowercase())
    }

    /// Lowercase alphabetic shape, ignoring suffix requirements
    pub fn is_plain_epithet(epithet: &str) -> bool {
        !epithet.is_empty() && epithet.chars().all(|c| c.is_ascii_lowercase())
    }
}
