//! Semantic consistency between a generated epithet and its description.
//!
//! Two passes collect evidence. The root pass looks up every lexicon root
//! contained in the epithet and checks whether the concepts it denotes appear
//! in the description (direct) or inside an extracted keyword (partial). The
//! association pass walks description words that point at a root and credits
//! that root once if the root pass has not already cited it.
//!
//! Scoring is a fixed heuristic:
//! - no recognised keywords at all → 0.5 (indeterminate)
//! - keywords but no evidence → 0.0
//! - otherwise `min(0.5 + 0.25 × evidence, 1.0)`

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::errors::Result;
use crate::core::name::BinomialName;
use crate::detectors::keywords::{DescriptionKeywords, KeywordExtractor};
use crate::reference::lexicon::{DirectAssociationTable, MorphemeLexicon};

/// Score assigned when the description yields no recognised keyword.
pub const NEUTRAL_SCORE: f64 = 0.5;

const EVIDENCE_FLOOR: f64 = 0.5;
const EVIDENCE_STEP: f64 = 0.25;

/// One piece of semantic evidence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Evidence {
    /// Root concept appears verbatim in the description
    Direct { root: String, concept: String },
    /// Root concept appears inside an extracted keyword
    Partial { root: String, concept: String },
    /// Description word associated with a root contained in the epithet
    Association { word: String, root: String },
}

impl Evidence {
    /// Root this evidence credits
    pub fn root(&self) -> &str {
        match self {
            Self::Direct { root, .. } | Self::Partial { root, .. } | Self::Association { root, .. } => {
                root
            }
        }
    }
}

impl fmt::Display for Evidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct { root, concept } => write!(f, "'{root}' → '{concept}'"),
            Self::Partial { root, concept } => write!(f, "'{root}' → '{concept}' (partial)"),
            Self::Association { word, root } => write!(f, "'{word}' → '{root}' (direct)"),
        }
    }
}

/// Semantic score with its evidence trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticAssessment {
    /// Consistency score in `[0, 1]`
    pub score: f64,
    /// Evidence in discovery order
    pub evidence: Vec<Evidence>,
    /// Keywords extracted from the description
    pub keywords: DescriptionKeywords,
}

impl SemanticAssessment {
    /// Extracted keywords flattened in category order
    pub fn matched_keywords(&self) -> Vec<&str> {
        self.keywords.flatten()
    }

    /// Evidence rendered as text
    pub fn evidence_lines(&self) -> Vec<String> {
        self.evidence.iter().map(ToString::to_string).collect()
    }
}

/// Score from keyword and evidence counts.
pub fn consistency_score(keyword_count: usize, evidence_count: usize) -> f64 {
    if keyword_count == 0 {
        NEUTRAL_SCORE
    } else if evidence_count == 0 {
        0.0
    } else {
        #[allow(clippy::cast_precision_loss)]
        let raised = EVIDENCE_FLOOR + EVIDENCE_STEP * evidence_count as f64;
        raised.min(1.0)
    }
}

/// Scores epithets against descriptions using shared, read-only tables.
#[derive(Debug, Clone)]
pub struct SemanticScorer {
    lexicon: Arc<MorphemeLexicon>,
    associations: Arc<DirectAssociationTable>,
    extractor: KeywordExtractor,
    markup_chars: Vec<char>,
}

impl SemanticScorer {
    /// Create a scorer over the given tables
    pub fn new(
        lexicon: Arc<MorphemeLexicon>,
        associations: Arc<DirectAssociationTable>,
        markup_chars: &[char],
    ) -> Result<Self> {
        Ok(Self {
            lexicon,
            associations,
            extractor: KeywordExtractor::new()?,
            markup_chars: markup_chars.to_vec(),
        })
    }

    /// Scorer over the built-in lexicon and association table
    pub fn with_builtin_tables(markup_chars: &[char]) -> Result<Self> {
        Self::new(
            Arc::new(MorphemeLexicon::builtin().clone()),
            Arc::new(DirectAssociationTable::builtin().clone()),
            markup_chars,
        )
    }

    /// Keyword extractor used by this scorer
    pub fn extractor(&self) -> &KeywordExtractor {
        &self.extractor
    }

    /// Score a raw generated name against a description.
    ///
    /// The first two tokens are taken as genus and epithet; fewer than two
    /// tokens is a [`MalformedName`](crate::core::errors::BinomenError::MalformedName) error.
    pub fn score(&self, description: &str, raw_name: &str) -> Result<SemanticAssessment> {
        let name = BinomialName::parse_leading(raw_name, &self.markup_chars)?;
        Ok(self.score_name(description, &name))
    }

    /// Score an already parsed name.
    pub fn score_name(&self, description: &str, name: &BinomialName) -> SemanticAssessment {
        let epithet = name.epithet.to_lowercase();
        let desc_lower = description.to_lowercase();

        let keywords = self.extractor.extract(description);
        let flattened = keywords.flatten();

        let mut evidence = Vec::new();

        for (root, concepts) in self.lexicon.roots_in(&epithet) {
            for concept in concepts {
                if desc_lower.contains(concept.as_str()) {
                    evidence.push(Evidence::Direct {
                        root: root.to_string(),
                        concept: concept.clone(),
                    });
                } else if flattened.iter().any(|kw| kw.contains(concept.as_str())) {
                    evidence.push(Evidence::Partial {
                        root: root.to_string(),
                        concept: concept.clone(),
                    });
                }
            }
        }

        for (word, root) in self.associations.iter() {
            if !desc_lower.contains(word) || !epithet.contains(root) {
                continue;
            }
            if evidence.iter().any(|e| e.root() == root) {
                continue;
            }
            evidence.push(Evidence::Association {
                word: word.to_string(),
                root: root.to_string(),
            });
        }

        let score = consistency_score(flattened.len(), evidence.len());
        SemanticAssessment {
            score,
            evidence,
            keywords,
        }
    }
}
