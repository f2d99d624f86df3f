//! Prompt protocol shared by fine-tuning data and generation.
//!
//! A prompt ends with the name delimiter; the model continues with a space and
//! the two-word name.

use serde::{Deserialize, Serialize};

/// Delimiter after which the generated name begins.
pub const NAME_DELIMITER: &str = "Name:";

/// Build the generation prompt for a description and family.
pub fn format_prompt(description: &str, family: &str) -> String {
    format!(
        "Description: {}\nFamily: {}\n{NAME_DELIMITER}",
        description.trim(),
        family.trim()
    )
}

/// Recover the generated name from decoded model output.
///
/// Takes the text after the last `delimiter`, keeps at most its first two
/// words and returns `None` when the delimiter is missing or nothing follows.
pub fn extract_generated_name(decoded: &str, delimiter: &str) -> Option<String> {
    let idx = decoded.rfind(delimiter)?;
    let words: Vec<&str> = decoded[idx + delimiter.len()..]
        .split_whitespace()
        .take(2)
        .collect();
    if words.is_empty() {
        None
    } else {
        Some(words.join(" "))
    }
}

/// One supervised fine-tuning pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingExample {
    /// Prompt text ending in the name delimiter
    pub prompt: String,
    /// Target continuation, `" {genus} {epithet}"`
    pub target: String,
}

impl TrainingExample {
    /// Build an example from species record fields.
    ///
    /// Genus and epithet come from the canonical name, or from the scientific
    /// name when the canonical name has fewer than two words. Records without
    /// a usable name or description yield `None`.
    pub fn from_species(
        canonical_name: Option<&str>,
        scientific_name: Option<&str>,
        description: &str,
        family: &str,
    ) -> Option<Self> {
        if description.trim().is_empty() {
            return None;
        }
        let (genus, epithet) = canonical_name
            .and_then(leading_pair)
            .or_else(|| scientific_name.and_then(leading_pair))?;

        Some(Self {
            prompt: format_prompt(description, family),
            target: format!(" {genus} {epithet}"),
        })
    }

    /// Prompt and target concatenated, as fed to a causal model
    pub fn full_text(&self) -> String {
        format!("{}{}", self.prompt, self.target)
    }
}

fn leading_pair(name: &str) -> Option<(&str, &str)> {
    let mut words = name.split_whitespace();
    Some((words.next()?, words.next()?))
}
