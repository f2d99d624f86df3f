//! Batch evaluation engine.

use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::api::results::{CaseOutcome, EvaluationCase, EvaluationRecord, EvaluationReport};
use crate::core::config::BinomenConfig;
use crate::core::errors::{BinomenError, Result};
use crate::core::grammar::MorphologyGrammar;
use crate::detectors::family::{validate_family, FamilyCheck};
use crate::detectors::format::{validate_format, FormatVerdict};
use crate::detectors::semantic::{SemanticAssessment, SemanticScorer};
use crate::generation::constraint::ConstraintFilter;
use crate::reference::lexicon::{DirectAssociationTable, MorphemeLexicon};
use crate::reference::taxonomy::FamilyGenusTable;

/// Validators and scorer wired to one configuration and set of reference tables.
///
/// The engine holds no mutable state; one instance can evaluate many batches,
/// from many threads.
#[derive(Debug, Clone)]
pub struct BinomenEngine {
    config: Arc<BinomenConfig>,
    grammar: MorphologyGrammar,
    taxonomy: Arc<FamilyGenusTable>,
    scorer: SemanticScorer,
}

impl BinomenEngine {
    /// Create an engine, loading reference overrides named in the configuration
    pub fn new(config: BinomenConfig) -> Result<Self> {
        config.validate()?;

        let reference = &config.reference;
        let taxonomy = match &reference.taxonomy_path {
            Some(path) => FamilyGenusTable::from_file(path)?,
            None => FamilyGenusTable::builtin().clone(),
        };
        let lexicon = match &reference.lexicon_path {
            Some(path) => MorphemeLexicon::from_file(path)?,
            None => MorphemeLexicon::builtin().clone(),
        };
        let associations = match &reference.associations_path {
            Some(path) => DirectAssociationTable::from_file(path)?,
            None => DirectAssociationTable::builtin().clone(),
        };

        Self::with_tables(
            config,
            Arc::new(taxonomy),
            Arc::new(lexicon),
            Arc::new(associations),
        )
    }

    /// Create an engine over explicit reference tables
    pub fn with_tables(
        config: BinomenConfig,
        taxonomy: Arc<FamilyGenusTable>,
        lexicon: Arc<MorphemeLexicon>,
        associations: Arc<DirectAssociationTable>,
    ) -> Result<Self> {
        config.validate()?;
        let grammar = MorphologyGrammar::new(&config.grammar)?;
        let scorer = SemanticScorer::new(lexicon, associations, grammar.markup_chars())?;

        info!(
            profile = ?grammar.profile(),
            families = taxonomy.len(),
            "binomen engine initialized"
        );

        Ok(Self {
            config: Arc::new(config),
            grammar,
            taxonomy,
            scorer,
        })
    }

    /// Active configuration
    pub fn config(&self) -> &BinomenConfig {
        &self.config
    }

    /// Compiled morphology grammar
    pub fn grammar(&self) -> &MorphologyGrammar {
        &self.grammar
    }

    /// Family reference table
    pub fn taxonomy(&self) -> &FamilyGenusTable {
        &self.taxonomy
    }

    /// Semantic scorer
    pub fn scorer(&self) -> &SemanticScorer {
        &self.scorer
    }

    /// Constraint filter built from the `constraint` section
    pub fn constraint_filter(&self) -> Result<ConstraintFilter> {
        ConstraintFilter::new(&self.config.constraint)
    }

    /// Format check for a raw name
    pub fn validate_format(&self, raw_name: &str) -> FormatVerdict {
        validate_format(raw_name, &self.grammar)
    }

    /// Family check for a raw name
    pub fn validate_family(&self, raw_name: &str, family: &str) -> Result<FamilyCheck> {
        validate_family(raw_name, family, &self.taxonomy, self.grammar.markup_chars())
    }

    /// Semantic score for a raw name
    pub fn score_semantics(&self, description: &str, raw_name: &str) -> Result<SemanticAssessment> {
        self.scorer.score(description, raw_name)
    }

    /// Evaluate one case; `id` is its 1-based position.
    ///
    /// A name too short for the family check or the scorer still yields a
    /// record, with the failure kept on the affected outcome.
    pub fn evaluate_case(&self, id: usize, case: &EvaluationCase) -> Result<EvaluationRecord> {
        let format = self.validate_format(&case.generated_name);
        let family_check = keep_malformed(
            id,
            self.validate_family(&case.generated_name, &case.family),
        )?;
        let semantic = keep_malformed(
            id,
            self.score_semantics(&case.description, &case.generated_name),
        )?;

        let record = EvaluationRecord {
            id,
            description: case.description.clone(),
            family: case.family.clone(),
            generated_name: case.generated_name.clone(),
            format,
            family_check,
            semantic,
        };

        debug!(
            id,
            name = %record.generated_name,
            format = record.format_valid(),
            family = record.family_label(),
            score = ?record.semantic_score(),
            "case evaluated"
        );
        Ok(record)
    }

    /// Evaluate a batch and aggregate its metrics.
    ///
    /// Records keep input order. Malformed names are recorded and counted,
    /// never dropped.
    pub fn evaluate(&self, cases: &[EvaluationCase]) -> Result<EvaluationReport> {
        let parallel = cfg!(feature = "parallel") && self.config.evaluation.parallel;
        info!(cases = cases.len(), parallel, "starting evaluation");

        let records: Vec<EvaluationRecord> = if parallel {
            cases
                .par_iter()
                .enumerate()
                .map(|(idx, case)| self.evaluate_case(idx + 1, case))
                .collect::<Result<_>>()?
        } else {
            cases
                .iter()
                .enumerate()
                .map(|(idx, case)| self.evaluate_case(idx + 1, case))
                .collect::<Result<_>>()?
        };

        let report = EvaluationReport::new(records, self.config.evaluation.family_policy);
        let metrics = &report.metrics;
        info!(
            total = metrics.total,
            format_accuracy = metrics.format_accuracy,
            family_accuracy = metrics.family_accuracy,
            semantic_accuracy = metrics.semantic_accuracy,
            family_unknown = metrics.family_unknown,
            semantic_unscored = metrics.semantic_unscored,
            "evaluation completed"
        );
        Ok(report)
    }
}

/// Turn a malformed-name failure into a recorded outcome; other errors still
/// fail the case.
fn keep_malformed<T>(id: usize, result: Result<T>) -> Result<CaseOutcome<T>> {
    match result {
        Ok(value) => Ok(CaseOutcome::Completed(value)),
        Err(err @ BinomenError::MalformedName { .. }) => {
            warn!(id, error = %err, "name cannot be fully evaluated");
            Ok(CaseOutcome::Malformed {
                reason: err.to_string(),
            })
        }
        Err(err) => Err(err.for_case(id)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{FamilyPolicy, GrammarProfile};
    use approx::assert_relative_eq;
    use std::fs;
    use tempfile::tempdir;

    fn cases() -> Vec<EvaluationCase> {
        vec![
            EvaluationCase::new(
                "a majestic lion with a flowing mane",
                "Felidae",
                "*Panthera crinita*",
            ),
            EvaluationCase::new("a tiny gray mouse living in a barn", "Muridae", "Pseudomys inni"),
            EvaluationCase::new("a quiet creature", "Nonexistentidae", "Felis leo"),
        ]
    }

    #[test]
    fn test_evaluate_keeps_input_order() {
        let engine = BinomenEngine::new(BinomenConfig::default()).unwrap();
        let report = engine.evaluate(&cases()).unwrap();

        let ids: Vec<usize> = report.records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);

        let first = &report.records[0];
        assert!(first.format_valid());
        assert!(first.family_valid());
        assert!(first.semantic_credit() > 0.5);

        let second = &report.records[1];
        assert!(second.format_valid());
        assert!(!second.family_valid());
        assert!(!second.family_unknown());

        assert!(report.records[2].family_unknown());
        assert_eq!(report.metrics.family_unknown, 1);
        assert_eq!(report.metrics.both_pass, 1);
    }

    #[test]
    fn test_sequential_matches_parallel() {
        let parallel = BinomenEngine::new(BinomenConfig::default()).unwrap();

        let mut config = BinomenConfig::default();
        config.evaluation.parallel = false;
        let sequential = BinomenEngine::new(config).unwrap();

        let a = parallel.evaluate(&cases()).unwrap();
        let b = sequential.evaluate(&cases()).unwrap();
        assert_eq!(a.records, b.records);
        assert_eq!(a.metrics, b.metrics);
    }

    #[test]
    fn test_policy_and_profile_from_config() {
        let mut config = BinomenConfig::default();
        config.evaluation.family_policy = FamilyPolicy::ExcludeUnknown;
        config.grammar.profile = GrammarProfile::Strict;
        let engine = BinomenEngine::new(config).unwrap();

        let report = engine.evaluate(&cases()).unwrap();
        assert_eq!(report.metrics.family_judged, 2);
        // "leo" has no Latin suffix, so the strict profile rejects it.
        assert!(!report.records[2].format_valid());
    }

    #[test]
    fn test_malformed_names_do_not_abort_batch() {
        let engine = BinomenEngine::new(BinomenConfig::default()).unwrap();
        let mut batch = cases();
        batch.push(EvaluationCase::new(
            "a tiny gray mouse living in a barn",
            "Muridae",
            "Failed",
        ));
        batch.push(EvaluationCase::new("a fluffy cat", "Felidae", "**"));

        let report = engine.evaluate(&batch).unwrap();
        assert_eq!(report.records.len(), 5);
        assert_eq!(report.metrics.total, 5);

        let single = &report.records[3];
        assert_eq!(single.id, 4);
        assert!(!single.format_valid());
        assert_eq!(single.format.reason, "Expected 2 words, got 1");
        assert!(matches!(
            single.family_check.completed(),
            Some(check) if check.genus == "Failed"
        ));
        assert!(single
            .semantic
            .malformed_reason()
            .is_some_and(|reason| reason.contains("Malformed name 'Failed'")));

        let empty = &report.records[4];
        assert!(empty.family_unchecked());
        assert_eq!(empty.semantic_score(), None);

        assert_eq!(report.metrics.semantic_unscored, 2);
        assert_eq!(report.metrics.family_unchecked, 1);
        let scored: f64 = report.records[..3]
            .iter()
            .filter_map(EvaluationRecord::semantic_score)
            .sum();
        assert_relative_eq!(report.metrics.semantic_accuracy, scored / 5.0);
    }

    #[test]
    fn test_empty_batch() {
        let engine = BinomenEngine::new(BinomenConfig::default()).unwrap();
        let report = engine.evaluate(&[]).unwrap();
        assert!(report.records.is_empty());
        assert_eq!(report.metrics.format_accuracy, 0.0);
    }

    #[test]
    fn test_reference_overrides_from_files() {
        let dir = tempdir().unwrap();
        let taxonomy = dir.path().join("taxonomy.yml");
        fs::write(&taxonomy, "Muridae: [Mus, Pseudomys]\n").unwrap();

        let mut config = BinomenConfig::default();
        config.reference.taxonomy_path = Some(taxonomy);
        let engine = BinomenEngine::new(config).unwrap();

        assert_eq!(engine.taxonomy().len(), 1);
        let check = engine.validate_family("Pseudomys inni", "Muridae").unwrap();
        assert!(check.verdict.is_valid());
        let check = engine.validate_family("Panthera leo", "Felidae").unwrap();
        assert!(check.verdict.is_unknown());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = BinomenConfig::default();
        config.constraint.delimiter = String::new();
        assert!(BinomenEngine::new(config).is_err());
    }
}
