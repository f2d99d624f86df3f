//! Token admissibility filter for beam-search generation.
//!
//! The generation engine calls back once per decoding step per beam with the
//! tokens produced so far. The filter decodes them, looks at the text after
//! the last name delimiter and narrows the next-token choice:
//!
//! | words after delimiter | admissible                                   |
//! |-----------------------|----------------------------------------------|
//! | no delimiter yet      | everything                                   |
//! | 0                     | everything (genus is checked post hoc)       |
//! | 1                     | tokens that look like an epithet on their own |
//! | ≥ 2                   | end-of-sequence only                         |
//!
//! When no single token looks like an epithet the whole vocabulary is
//! admitted instead so generation cannot deadlock.

use std::sync::Arc;

use rayon::prelude::*;
use regex::Regex;
use tracing::{debug, trace};

use crate::core::config::ConstraintConfig;
use crate::core::errors::Result;
use crate::core::grammar::epithet_pattern;

/// Token identifier in the engine's vocabulary.
pub type TokenId = u32;

/// Tokenizer capabilities the filter needs from the generation engine.
///
/// Token ids are dense in `0..len()`.
pub trait TokenVocabulary {
    /// Number of tokens in the vocabulary
    fn len(&self) -> usize;

    /// Whether the vocabulary is empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Decode a token sequence to text, skipping special tokens
    fn decode(&self, tokens: &[TokenId]) -> String;

    /// End-of-sequence token
    fn eos_token_id(&self) -> TokenId;
}

impl<T: TokenVocabulary + ?Sized> TokenVocabulary for &T {
    fn len(&self) -> usize {
        (**self).len()
    }

    fn decode(&self, tokens: &[TokenId]) -> String {
        (**self).decode(tokens)
    }

    fn eos_token_id(&self) -> TokenId {
        (**self).eos_token_id()
    }
}

impl<T: TokenVocabulary + ?Sized> TokenVocabulary for Arc<T> {
    fn len(&self) -> usize {
        (**self).len()
    }

    fn decode(&self, tokens: &[TokenId]) -> String {
        (**self).decode(tokens)
    }

    fn eos_token_id(&self) -> TokenId {
        (**self).eos_token_id()
    }
}

/// Where a beam is within the name field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamePhase {
    /// Name delimiter not produced yet
    Prompt,
    /// Delimiter seen, no word yet
    Genus,
    /// One word produced
    Epithet,
    /// Two or more words produced
    Complete,
}

/// Next-token choice set for one beam.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdmissibleTokens {
    /// Every vocabulary token
    Unrestricted,
    /// Only the end-of-sequence token
    EndOfSequence(TokenId),
    /// Only these tokens, in id order
    Restricted(Arc<[TokenId]>),
    /// Restriction matched nothing and was widened to every token
    Fallback,
}

impl AdmissibleTokens {
    /// Whether `token` may be chosen
    pub fn contains(&self, token: TokenId) -> bool {
        match self {
            Self::Unrestricted | Self::Fallback => true,
            Self::EndOfSequence(eos) => *eos == token,
            Self::Restricted(ids) => ids.binary_search(&token).is_ok(),
        }
    }

    /// Whether every token is admissible
    pub fn is_unrestricted(&self) -> bool {
        matches!(self, Self::Unrestricted | Self::Fallback)
    }

    /// Materialise the admissible ids for a vocabulary of `vocab_len` tokens
    pub fn to_ids(&self, vocab_len: usize) -> Vec<TokenId> {
        match self {
            Self::Unrestricted | Self::Fallback => all_token_ids(vocab_len).collect(),
            Self::EndOfSequence(eos) => vec![*eos],
            Self::Restricted(ids) => ids.to_vec(),
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn all_token_ids(vocab_len: usize) -> impl Iterator<Item = TokenId> {
    (0..vocab_len).map(|id| id as TokenId)
}

/// Stateless admissibility filter.
#[derive(Debug, Clone)]
pub struct ConstraintFilter {
    delimiter: String,
    epithet: Regex,
}

impl ConstraintFilter {
    /// Build a filter from configuration, compiling the epithet pattern once
    pub fn new(config: &ConstraintConfig) -> Result<Self> {
        Ok(Self {
            delimiter: config.delimiter.clone(),
            epithet: epithet_pattern(&config.epithet_suffixes, config.require_suffix)?,
        })
    }

    /// Delimiter that opens the name field
    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    /// Classify decoded beam text.
    pub fn name_phase(&self, partial_text: &str) -> NamePhase {
        let Some(idx) = partial_text.rfind(&self.delimiter) else {
            return NamePhase::Prompt;
        };
        let name_part = &partial_text[idx + self.delimiter.len()..];
        match name_part.split_whitespace().take(2).count() {
            0 => NamePhase::Genus,
            1 => NamePhase::Epithet,
            _ => NamePhase::Complete,
        }
    }

    /// Whether a single decoded token may extend the epithet
    pub fn is_epithet_token(&self, token_text: &str) -> bool {
        self.epithet.is_match(&token_text.trim().to_lowercase())
    }

    /// Admissible next tokens for decoded beam text, scanning the vocabulary
    /// only in the epithet phase.
    pub fn admissible_tokens<V>(&self, partial_text: &str, vocabulary: &V) -> AdmissibleTokens
    where
        V: TokenVocabulary + ?Sized,
    {
        match self.name_phase(partial_text) {
            NamePhase::Prompt | NamePhase::Genus => AdmissibleTokens::Unrestricted,
            NamePhase::Complete => AdmissibleTokens::EndOfSequence(vocabulary.eos_token_id()),
            NamePhase::Epithet => {
                let ids: Vec<TokenId> = all_token_ids(vocabulary.len())
                    .filter(|id| self.is_epithet_token(&vocabulary.decode(&[*id])))
                    .collect();
                self.restrict(ids)
            }
        }
    }

    /// Engine callback: decode `tokens` and compute the admissible set.
    pub fn allowed_tokens<V>(
        &self,
        beam_id: usize,
        tokens: &[TokenId],
        vocabulary: &V,
    ) -> AdmissibleTokens
    where
        V: TokenVocabulary + ?Sized,
    {
        let text = vocabulary.decode(tokens);
        let admissible = self.admissible_tokens(&text, vocabulary);
        trace!(beam_id, steps = tokens.len(), ?admissible, "constraint step");
        admissible
    }

    /// Never empty: a dead end admits the whole vocabulary.
    fn restrict(&self, ids: Vec<TokenId>) -> AdmissibleTokens {
        if ids.is_empty() {
            debug!("no single token matches the epithet pattern; admitting full vocabulary");
            AdmissibleTokens::Fallback
        } else {
            AdmissibleTokens::Restricted(ids.into())
        }
    }
}

/// A filter bound to one vocabulary with the epithet token set precomputed.
///
/// The epithet set does not depend on beam text, so it is computed once and
/// each callback only decodes the beam.
#[derive(Debug, Clone)]
pub struct PreparedConstraint<V> {
    filter: ConstraintFilter,
    vocabulary: V,
    epithet_tokens: AdmissibleTokens,
}

impl<V: TokenVocabulary + Sync> PreparedConstraint<V> {
    /// Scan `vocabulary` once and bind it to `filter`
    pub fn new(filter: ConstraintFilter, vocabulary: V) -> Self {
        let ids: Vec<TokenId> = all_token_ids(vocabulary.len())
            .collect::<Vec<_>>()
            .into_par_iter()
            .filter(|id| filter.is_epithet_token(&vocabulary.decode(&[*id])))
            .collect();
        debug!(
            vocabulary = vocabulary.len(),
            epithet_tokens = ids.len(),
            "prepared constraint"
        );
        let epithet_tokens = filter.restrict(ids);
        Self {
            filter,
            vocabulary,
            epithet_tokens,
        }
    }

    /// Underlying filter
    pub fn filter(&self) -> &ConstraintFilter {
        &self.filter
    }

    /// Engine callback for one beam.
    pub fn allowed_tokens(&self, beam_id: usize, tokens: &[TokenId]) -> AdmissibleTokens {
        let text = self.vocabulary.decode(tokens);
        let admissible = match self.filter.name_phase(&text) {
            NamePhase::Prompt | NamePhase::Genus => AdmissibleTokens::Unrestricted,
            NamePhase::Complete => AdmissibleTokens::EndOfSequence(self.vocabulary.eos_token_id()),
            NamePhase::Epithet => self.epithet_tokens.clone(),
        };
        trace!(beam_id, steps = tokens.len(), ?admissible, "prepared constraint step");
        admissible
    }

    /// Callback results materialised to id lists for every beam
    pub fn allowed_ids_for_beams(&self, beams: &[Vec<TokenId>]) -> Vec<Vec<TokenId>> {
        beams
            .par_iter()
            .enumerate()
            .map(|(beam_id, tokens)| {
                self.allowed_tokens(beam_id, tokens)
                    .to_ids(self.vocabulary.len())
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "constraint_tests.rs"]
mod tests;
