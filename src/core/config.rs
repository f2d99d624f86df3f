//! Configuration types and management for binomen-rs.
//!
//! Every section carries defaults that reproduce the reference behaviour and a
//! `validate` method; [`BinomenConfig::validate`] checks them all and reports
//! the offending field.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::errors::{BinomenError, Result};
use crate::core::grammar::{
    CONSTRAINT_EPITHET_SUFFIXES, LATIN_EPITHET_SUFFIXES, LATIN_GENUS_SUFFIXES,
};
use crate::core::name::DEFAULT_MARKUP_CHARS;

/// Main configuration for the binomen toolkit
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BinomenConfig {
    /// Morphology grammar used by the format validator
    #[serde(default)]
    pub grammar: GrammarConfig,

    /// Generation-time constraint filter settings
    #[serde(default)]
    pub constraint: ConstraintConfig,

    /// Batch evaluation settings
    #[serde(default)]
    pub evaluation: EvaluationConfig,

    /// Reference data overrides
    #[serde(default)]
    pub reference: ReferenceConfig,

    /// Description generation support
    #[serde(default)]
    pub description: DescriptionConfig,
}

impl BinomenConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| {
            BinomenError::io(format!("Failed to read config file: {}", path.display()), e)
        })?;

        serde_yaml::from_str(&content).map_err(Into::into)
    }

    /// Save configuration to a YAML file
    pub fn to_yaml_file(&self, path: impl Into<PathBuf>) -> Result<()> {
        let path = path.into();
        let content = serde_yaml::to_string(self)?;
        std::fs::write(&path, content).map_err(|e| {
            BinomenError::io(
                format!("Failed to write config file: {}", path.display()),
                e,
            )
        })
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<()> {
        self.grammar.validate()?;
        self.constraint.validate()?;
        self.description.validate()?;
        Ok(())
    }
}

/// Strictness of the morphology grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrammarProfile {
    /// Capitalised alphabetic genus, lowercase alphabetic epithet
    #[default]
    Permissive,
    /// Epithet must end in a Latin suffix; genus too when `strict_genus` is set
    Strict,
}

/// Morphology grammar configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GrammarConfig {
    /// Strictness profile
    pub profile: GrammarProfile,

    /// Latin suffixes accepted at the end of a species epithet
    pub epithet_suffixes: Vec<String>,

    /// Latin suffixes accepted at the end of a genus
    pub genus_suffixes: Vec<String>,

    /// Under the strict profile, also require a genus suffix
    pub strict_genus: bool,

    /// Emphasis markers removed before a name is parsed
    pub markup_chars: Vec<char>,
}

impl Default for GrammarConfig {
    fn default() -> Self {
        Self {
            profile: GrammarProfile::Permissive,
            epithet_suffixes: to_owned_list(LATIN_EPITHET_SUFFIXES),
            genus_suffixes: to_owned_list(LATIN_GENUS_SUFFIXES),
            strict_genus: false,
            markup_chars: DEFAULT_MARKUP_CHARS.to_vec(),
        }
    }
}

impl GrammarConfig {
    /// Validate grammar configuration
    pub fn validate(&self) -> Result<()> {
        validate_suffixes(&self.epithet_suffixes, "grammar.epithet_suffixes")?;
        validate_suffixes(&self.genus_suffixes, "grammar.genus_suffixes")?;

        if self.profile == GrammarProfile::Strict && self.epithet_suffixes.is_empty() {
            return Err(BinomenError::config_field(
                "strict profile requires at least one epithet suffix",
                "grammar.epithet_suffixes",
            ));
        }
        if self.profile == GrammarProfile::Strict
            && self.strict_genus
            && self.genus_suffixes.is_empty()
        {
            return Err(BinomenError::config_field(
                "strict_genus requires at least one genus suffix",
                "grammar.genus_suffixes",
            ));
        }
        if let Some(c) = self.markup_chars.iter().find(|c| c.is_alphanumeric()) {
            return Err(BinomenError::config_field(
                format!("markup character '{c}' would corrupt names"),
                "grammar.markup_chars",
            ));
        }
        Ok(())
    }
}

/// Generation-time constraint filter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConstraintConfig {
    /// Protocol marker after which the generated name begins
    pub delimiter: String,

    /// Suffix subset used when matching single epithet tokens
    pub epithet_suffixes: Vec<String>,

    /// Require tokens to end in one of `epithet_suffixes`
    pub require_suffix: bool,
}

impl Default for ConstraintConfig {
    fn default() -> Self {
        Self {
            delimiter: "Name:".to_string(),
            epithet_suffixes: to_owned_list(CONSTRAINT_EPITHET_SUFFIXES),
            require_suffix: false,
        }
    }
}

impl ConstraintConfig {
    /// Validate constraint configuration
    pub fn validate(&self) -> Result<()> {
        if self.delimiter.trim().is_empty() {
            return Err(BinomenError::config_field(
                "delimiter must not be empty",
                "constraint.delimiter",
            ));
        }
        validate_suffixes(&self.epithet_suffixes, "constraint.epithet_suffixes")?;
        if self.require_suffix && self.epithet_suffixes.is_empty() {
            return Err(BinomenError::config_field(
                "require_suffix needs at least one suffix",
                "constraint.epithet_suffixes",
            ));
        }
        Ok(())
    }
}

/// How unknown-family cases enter the family accuracy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FamilyPolicy {
    /// Unknown families stay in the denominator and never count as passes
    #[default]
    CountAsFailure,
    /// Unknown families are removed from numerator and denominator
    ExcludeUnknown,
}

/// Batch evaluation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    /// Treatment of unknown families in the family accuracy
    pub family_policy: FamilyPolicy,

    /// Evaluate cases in parallel
    pub parallel: bool,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            family_policy: FamilyPolicy::CountAsFailure,
            parallel: true,
        }
    }
}

/// Paths to reference data replacing the built-in tables
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceConfig {
    /// Family → genera table (YAML or JSON mapping)
    pub taxonomy_path: Option<PathBuf>,

    /// Root → concept words lexicon (YAML or JSON mapping)
    pub lexicon_path: Option<PathBuf>,

    /// Description word → root associations (YAML or JSON mapping)
    pub associations_path: Option<PathBuf>,
}

/// Description generation support configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DescriptionConfig {
    /// Minimum interval between explainer calls in milliseconds
    pub min_interval_ms: u64,

    /// Attempts per epithet before caching an empty explanation
    pub retries: u32,

    /// Delay after a failed attempt in milliseconds
    pub retry_delay_ms: u64,

    /// Persist the cache after this many fresh entries
    pub save_every: usize,

    /// Epithet cache location
    pub cache_path: Option<PathBuf>,

    /// Common noun used for each family in descriptions
    pub family_nouns: HashMap<String, String>,
}

impl Default for DescriptionConfig {
    fn default() -> Self {
        let family_nouns = [
            ("Crocodylidae", "crocodile"),
            ("Canidae", "dog"),
            ("Felidae", "cat"),
            ("Ursidae", "bear"),
            ("Cervidae", "deer"),
            ("Bovidae", "cow"),
            ("Equidae", "horse"),
            ("Hominidae", "ape"),
            ("Muridae", "rodent"),
            ("Sciuridae", "squirrel"),
        ]
        .into_iter()
        .map(|(family, noun)| (family.to_string(), noun.to_string()))
        .collect();

        Self {
            min_interval_ms: 1000,
            retries: 3,
            retry_delay_ms: 3000,
            save_every: 20,
            cache_path: None,
            family_nouns,
        }
    }
}

impl DescriptionConfig {
    /// Validate description configuration
    pub fn validate(&self) -> Result<()> {
        if self.retries == 0 {
            return Err(BinomenError::config_field(
                "retries must be at least 1",
                "description.retries",
            ));
        }
        if self.save_every == 0 {
            return Err(BinomenError::config_field(
                "save_every must be at least 1",
                "description.save_every",
            ));
        }
        Ok(())
    }
}

fn to_owned_list(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

fn validate_suffixes(suffixes: &[String], field: &str) -> Result<()> {
    for suffix in suffixes {
        if suffix.is_empty() || !suffix.chars().all(|c| c.is_ascii_lowercase()) {
            return Err(BinomenError::config_field(
                format!("suffix '{suffix}' must be non-empty lowercase ASCII letters"),
                field,
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
