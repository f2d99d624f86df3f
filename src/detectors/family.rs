//! Genus membership check against the family reference table.

use serde::{Deserialize, Serialize};

use crate::core::errors::{BinomenError, Result};
use crate::core::name::NameTokens;
use crate::reference::taxonomy::FamilyGenusTable;

/// Tri-state outcome of a family membership check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FamilyVerdict {
    /// Genus is listed under the expected family
    Valid,
    /// Genus is not listed; carries the family's genera in canonical order
    Invalid {
        /// Genera listed under the expected family
        expected: Vec<String>,
    },
    /// Expected family is absent from the reference table
    UnknownFamily,
}

impl FamilyVerdict {
    /// Whether the genus belongs to the family
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Whether the family was missing from the reference
    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::UnknownFamily)
    }

    /// Short label used in tables
    pub fn label(&self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::Invalid { .. } => "invalid",
            Self::UnknownFamily => "unknown",
        }
    }
}

/// Family check result with the genus it judged and a diagnostic reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyCheck {
    /// First token of the cleaned name
    pub genus: String,
    /// Family the name was checked against
    pub family: String,
    /// Tri-state result
    pub verdict: FamilyVerdict,
    /// Human-readable reason
    pub reason: String,
}

/// Check whether the genus of `raw_name` belongs to `expected_family`.
///
/// The genus is the first token after markup stripping, so malformed names
/// are still judged. A name with no tokens at all is an error.
pub fn validate_family(
    raw_name: &str,
    expected_family: &str,
    table: &FamilyGenusTable,
    markup_chars: &[char],
) -> Result<FamilyCheck> {
    let tokens = NameTokens::new(raw_name, markup_chars);
    let genus = tokens
        .first()
        .ok_or_else(|| BinomenError::malformed_name(tokens.cleaned(), 0, 1))?
        .to_string();

    let (verdict, reason) = match table.genera(expected_family) {
        None => (
            FamilyVerdict::UnknownFamily,
            format!("Family '{expected_family}' not in reference table"),
        ),
        Some(genera) if genera.contains(&genus) => (
            FamilyVerdict::Valid,
            format!("Genus '{genus}' correctly belongs to {expected_family}"),
        ),
        Some(genera) => {
            let expected: Vec<String> = genera.iter().cloned().collect();
            let listing = expected
                .iter()
                .map(|g| format!("'{g}'"))
                .collect::<Vec<_>>()
                .join(", ");
            (
                FamilyVerdict::Invalid { expected },
                format!(
                    "Genus '{genus}' not found in {expected_family}. Expected one of: [{listing}]"
                ),
            )
        }
    };

    Ok(FamilyCheck {
        genus,
        family: expected_family.to_string(),
        verdict,
        reason,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::name::DEFAULT_MARKUP_CHARS;

    fn check(name: &str, family: &str) -> FamilyCheck {
        validate_family(name, family, FamilyGenusTable::builtin(), DEFAULT_MARKUP_CHARS).unwrap()
    }

    #[test]
    fn test_genus_in_family() {
        let result = check("Panthera crinita", "Felidae");
        assert_eq!(result.verdict, FamilyVerdict::Valid);
        assert_eq!(result.reason, "Genus 'Panthera' correctly belongs to Felidae");
    }

    #[test]
    fn test_genus_outside_family_lists_expected() {
        let result = check("Panthera crinita", "Muridae");
        assert!(!result.verdict.is_valid());
        assert!(!result.verdict.is_unknown());
        assert_eq!(
            result.reason,
            "Genus 'Panthera' not found in Muridae. Expected one of: \
             ['Mus', 'Rattus', 'Apodemus', 'Microtus', 'Peromyscus']"
        );
        if let FamilyVerdict::Invalid { expected } = result.verdict {
            assert_eq!(expected.len(), 5);
        } else {
            panic!("Expected Invalid verdict");
        }
    }

    #[test]
    fn test_unknown_family_is_distinct() {
        let result = check("Panthera crinita", "Nonexistentidae");
        assert_eq!(result.verdict, FamilyVerdict::UnknownFamily);
        assert_eq!(result.verdict.label(), "unknown");
        assert!(result.reason.contains("Nonexistentidae"));
    }

    #[test]
    fn test_malformed_names_still_judged() {
        let result = check("*Felis*", "Felidae");
        assert!(result.verdict.is_valid());

        let result = check("Pseudomys inni extra", "Muridae");
        assert_eq!(result.genus, "Pseudomys");
        assert!(!result.verdict.is_valid());
    }

    #[test]
    fn test_empty_name_is_error() {
        let err = validate_family("  ** ", "Felidae", FamilyGenusTable::builtin(), DEFAULT_MARKUP_CHARS)
            .unwrap_err();
        assert!(matches!(
            err,
            BinomenError::MalformedName {
                tokens: 0,
                required: 1,
                ..
            }
        ));
    }
}
