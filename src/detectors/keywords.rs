//! Description keyword extraction over the closed category vocabularies.
//!
//! Matching is plain substring containment on the lowercased description, so
//! "colorful" also counts for any vocabulary word it contains. All vocabulary
//! words are compiled into one Aho-Corasick automaton and the description is
//! scanned once; matches are then reported in canonical category/word order,
//! not in the order they occur in the text.

use aho_corasick::AhoCorasick;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::errors::{BinomenError, Result};
use crate::reference::vocabulary::KeywordCategory;

/// Matched vocabulary words per category.
///
/// Every category is present, in canonical order, even when empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DescriptionKeywords {
    categories: IndexMap<KeywordCategory, Vec<String>>,
}

impl Default for DescriptionKeywords {
    fn default() -> Self {
        Self {
            categories: KeywordCategory::ALL
                .into_iter()
                .map(|category| (category, Vec::new()))
                .collect(),
        }
    }
}

impl DescriptionKeywords {
    /// Words matched for `category`
    pub fn get(&self, category: KeywordCategory) -> &[String] {
        self.categories
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Categories and their words in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (KeywordCategory, &[String])> {
        self.categories.iter().map(|(c, w)| (*c, w.as_slice()))
    }

    /// All matched words, category by category; cross-category repeats are kept.
    pub fn flatten(&self) -> Vec<&str> {
        self.categories
            .values()
            .flat_map(|words| words.iter().map(String::as_str))
            .collect()
    }

    /// Total number of matched words across categories
    pub fn total(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }

    /// Whether no category matched anything
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    fn push(&mut self, category: KeywordCategory, word: &str) {
        let words = self.categories.entry(category).or_default();
        if !words.iter().any(|w| w == word) {
            words.push(word.to_string());
        }
    }
}

/// Keyword extractor backed by a precompiled multi-pattern automaton.
#[derive(Debug, Clone)]
pub struct KeywordExtractor {
    automaton: AhoCorasick,
    /// Pattern index → (category, word), in canonical order.
    patterns: Vec<(KeywordCategory, &'static str)>,
}

impl KeywordExtractor {
    /// Compile the built-in category vocabularies.
    pub fn new() -> Result<Self> {
        let patterns: Vec<(KeywordCategory, &'static str)> = KeywordCategory::ALL
            .into_iter()
            .flat_map(|category| category.words().iter().map(move |w| (category, *w)))
            .collect();

        let automaton = AhoCorasick::new(patterns.iter().map(|(_, word)| *word))
            .map_err(|e| BinomenError::internal(format!("keyword automaton: {e}")))?;

        Ok(Self {
            automaton,
            patterns,
        })
    }

    /// Extract keywords from a free-text description.
    pub fn extract(&self, description: &str) -> DescriptionKeywords {
        let lowered = description.to_lowercase();

        let mut hit = vec![false; self.patterns.len()];
        for mat in self.automaton.find_overlapping_iter(&lowered) {
            hit[mat.pattern().as_usize()] = true;
        }

        let mut keywords = DescriptionKeywords::default();
        for ((category, word), _) in self.patterns.iter().zip(&hit).filter(|(_, h)| **h) {
            keywords.push(*category, word);
        }
        keywords
    }
}
