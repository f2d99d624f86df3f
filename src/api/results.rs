//! Evaluation inputs, per-case records and corpus-level metrics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::config::FamilyPolicy;
use crate::detectors::family::FamilyCheck;
use crate::detectors::format::FormatVerdict;
use crate::detectors::semantic::SemanticAssessment;

/// One evaluation input triple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationCase {
    /// Free-text description given to the generator
    pub description: String,
    /// Expected taxonomic family
    pub family: String,
    /// Raw generated name, possibly with emphasis markup
    pub generated_name: String,
}

impl EvaluationCase {
    /// Create a case
    pub fn new(
        description: impl Into<String>,
        family: impl Into<String>,
        generated_name: impl Into<String>,
    ) -> Self {
        Self {
            description: description.into(),
            family: family.into(),
            generated_name: generated_name.into(),
        }
    }
}

/// Output of one evaluator, or why the name could not be run through it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CaseOutcome<T> {
    /// The evaluator ran
    Completed(T),
    /// The name lacks the words the evaluator needs
    Malformed {
        /// Error raised by the evaluator
        reason: String,
    },
}

impl<T> CaseOutcome<T> {
    /// Evaluator output, if it ran
    pub fn completed(&self) -> Option<&T> {
        match self {
            Self::Completed(value) => Some(value),
            Self::Malformed { .. } => None,
        }
    }

    /// Failure reason, if the name was malformed
    pub fn malformed_reason(&self) -> Option<&str> {
        match self {
            Self::Completed(_) => None,
            Self::Malformed { reason } => Some(reason),
        }
    }
}

/// Result of evaluating one case.
///
/// Format is always judged. The family check needs a genus and the semantic
/// scorer needs an epithet; a name lacking either keeps the failure on the
/// record instead of failing the batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    /// 1-based position in the input
    pub id: usize,
    /// Input description
    pub description: String,
    /// Expected family
    pub family: String,
    /// Generated name as given
    pub generated_name: String,
    /// Format validator outcome
    pub format: FormatVerdict,
    /// Family validator outcome
    pub family_check: CaseOutcome<FamilyCheck>,
    /// Semantic scorer outcome
    pub semantic: CaseOutcome<SemanticAssessment>,
}

impl EvaluationRecord {
    /// Whether the name is a well-formed binomial
    pub fn format_valid(&self) -> bool {
        self.format.is_valid
    }

    /// Whether the genus belongs to the expected family
    pub fn family_valid(&self) -> bool {
        self.family_check
            .completed()
            .is_some_and(|check| check.verdict.is_valid())
    }

    /// Whether the expected family is missing from the reference table
    pub fn family_unknown(&self) -> bool {
        self.family_check
            .completed()
            .is_some_and(|check| check.verdict.is_unknown())
    }

    /// Whether the name had no genus to check
    pub fn family_unchecked(&self) -> bool {
        self.family_check.malformed_reason().is_some()
    }

    /// Short family label: the verdict label, or `unchecked`
    pub fn family_label(&self) -> &'static str {
        self.family_check
            .completed()
            .map_or("unchecked", |check| check.verdict.label())
    }

    /// Semantic consistency score, if the name could be scored
    pub fn semantic_score(&self) -> Option<f64> {
        self.semantic.completed().map(|assessment| assessment.score)
    }

    /// Score counted toward corpus metrics; an unscored name earns nothing
    pub fn semantic_credit(&self) -> f64 {
        self.semantic_score().unwrap_or(0.0)
    }
}

/// Corpus-level metrics derived from a batch of records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateMetrics {
    /// Number of evaluated cases
    pub total: usize,
    /// Cases with a well-formed name
    pub format_valid: usize,
    /// Cases whose genus belongs to the expected family
    pub family_valid: usize,
    /// Cases whose genus is not listed under the expected family
    pub family_invalid: usize,
    /// Cases whose expected family is not in the reference table
    pub family_unknown: usize,
    /// Cases with no genus to check; judged as failures under either policy
    pub family_unchecked: usize,
    /// Policy applied to unknown families
    pub family_policy: FamilyPolicy,
    /// Denominator of the family accuracy under `family_policy`
    pub family_judged: usize,
    /// `format_valid / total`
    pub format_accuracy: f64,
    /// `family_valid / family_judged`
    pub family_accuracy: f64,
    /// Mean semantic score over all cases, unscored cases contributing 0
    pub semantic_accuracy: f64,
    /// Cases whose name had no epithet to score
    pub semantic_unscored: usize,
    /// Format valid and family valid
    pub both_pass: usize,
    /// Format valid, family not valid (unknown families included)
    pub format_only: usize,
    /// Family valid, format invalid
    pub family_only: usize,
    /// Both pass and semantic score above 0.5
    pub perfect: usize,
    /// Semantic score ≥ 0.5
    pub score_at_least_half: usize,
    /// Semantic score ≥ 0.75
    pub score_at_least_three_quarters: usize,
    /// Semantic score > 0.5
    pub score_above_half: usize,
}

impl AggregateMetrics {
    /// Aggregate `records` under `policy`. An empty batch yields zero accuracies.
    pub fn from_records(records: &[EvaluationRecord], policy: FamilyPolicy) -> Self {
        let total = records.len();
        let count = |pred: &dyn Fn(&EvaluationRecord) -> bool| {
            records.iter().filter(|r| pred(r)).count()
        };

        let format_valid = count(&EvaluationRecord::format_valid);
        let family_valid = count(&EvaluationRecord::family_valid);
        let family_unknown = count(&EvaluationRecord::family_unknown);
        let family_unchecked = count(&EvaluationRecord::family_unchecked);
        let family_invalid = total - family_valid - family_unknown - family_unchecked;

        let family_judged = match policy {
            FamilyPolicy::CountAsFailure => total,
            FamilyPolicy::ExcludeUnknown => total - family_unknown,
        };

        let score_sum: f64 = records.iter().map(EvaluationRecord::semantic_credit).sum();
        let semantic_accuracy = mean(score_sum, total);
        let semantic_unscored = count(&|r: &EvaluationRecord| r.semantic_score().is_none());

        Self {
            total,
            format_valid,
            family_valid,
            family_invalid,
            family_unknown,
            family_unchecked,
            family_policy: policy,
            family_judged,
            format_accuracy: ratio(format_valid, total),
            family_accuracy: ratio(family_valid, family_judged),
            semantic_accuracy,
            semantic_unscored,
            both_pass: count(&|r: &EvaluationRecord| r.format_valid() && r.family_valid()),
            format_only: count(&|r: &EvaluationRecord| r.format_valid() && !r.family_valid()),
            family_only: count(&|r: &EvaluationRecord| !r.format_valid() && r.family_valid()),
            perfect: count(&|r: &EvaluationRecord| {
                r.format_valid() && r.family_valid() && r.semantic_credit() > 0.5
            }),
            score_at_least_half: count(&|r: &EvaluationRecord| r.semantic_credit() >= 0.5),
            score_at_least_three_quarters: count(&|r: &EvaluationRecord| {
                r.semantic_credit() >= 0.75
            }),
            score_above_half: count(&|r: &EvaluationRecord| r.semantic_credit() > 0.5),
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn mean(sum: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

#[allow(clippy::cast_precision_loss)]
fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Complete output of a batch evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// When the report was produced
    pub generated_at: DateTime<Utc>,
    /// Per-case records in input order
    pub records: Vec<EvaluationRecord>,
    /// Aggregate metrics over `records`
    pub metrics: AggregateMetrics,
}

impl EvaluationReport {
    /// Build a report, computing metrics from `records`
    pub fn new(records: Vec<EvaluationRecord>, policy: FamilyPolicy) -> Self {
        let metrics = AggregateMetrics::from_records(&records, policy);
        Self {
            generated_at: Utc::now(),
            records,
            metrics,
        }
    }

    /// Records whose expected family was unknown
    pub fn unknown_family_records(&self) -> impl Iterator<Item = &EvaluationRecord> {
        self.records
            .iter()
            .filter(|r| r.family_unknown())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detectors::family::FamilyVerdict;
    use crate::detectors::keywords::DescriptionKeywords;
    use approx::assert_relative_eq;

    fn record(id: usize, format_ok: bool, verdict: FamilyVerdict, score: f64) -> EvaluationRecord {
        EvaluationRecord {
            id,
            description: String::new(),
            family: "Felidae".to_string(),
            generated_name: "Felis catus".to_string(),
            format: FormatVerdict {
                is_valid: format_ok,
                reason: String::new(),
                violation: None,
            },
            family_check: CaseOutcome::Completed(FamilyCheck {
                genus: "Felis".to_string(),
                family: "Felidae".to_string(),
                verdict,
                reason: String::new(),
            }),
            semantic: CaseOutcome::Completed(SemanticAssessment {
                score,
                evidence: Vec::new(),
                keywords: DescriptionKeywords::default(),
            }),
        }
    }

    fn single_word(id: usize) -> EvaluationRecord {
        let mut record = record(id, false, FamilyVerdict::Valid, 0.0);
        record.generated_name = "Felis".to_string();
        record.semantic = CaseOutcome::Malformed {
            reason: "Malformed name 'Felis': expected at least 2 word(s), found 1".to_string(),
        };
        record
    }

    fn empty_name(id: usize) -> EvaluationRecord {
        let mut record = single_word(id);
        record.generated_name = String::new();
        record.family_check = CaseOutcome::Malformed {
            reason: "Malformed name '': expected at least 1 word(s), found 0".to_string(),
        };
        record
    }

    fn batch() -> Vec<EvaluationRecord> {
        let invalid = || FamilyVerdict::Invalid {
            expected: vec!["Felis".to_string()],
        };
        vec![
            record(1, true, FamilyVerdict::Valid, 1.0),
            record(2, true, invalid(), 0.5),
            record(3, false, FamilyVerdict::Valid, 0.0),
            record(4, true, FamilyVerdict::UnknownFamily, 0.75),
        ]
    }

    #[test]
    fn test_counts_and_cross_tabs() {
        let metrics = AggregateMetrics::from_records(&batch(), FamilyPolicy::CountAsFailure);
        assert_eq!(metrics.total, 4);
        assert_eq!(metrics.format_valid, 3);
        assert_eq!(metrics.family_valid, 2);
        assert_eq!(metrics.family_invalid, 1);
        assert_eq!(metrics.family_unknown, 1);
        assert_eq!(metrics.both_pass, 1);
        assert_eq!(metrics.format_only, 2);
        assert_eq!(metrics.family_only, 1);
        assert_eq!(metrics.perfect, 1);
        assert_eq!(metrics.score_at_least_half, 3);
        assert_eq!(metrics.score_at_least_three_quarters, 2);
        assert_eq!(metrics.score_above_half, 2);

        assert_relative_eq!(metrics.format_accuracy, 0.75);
        assert_relative_eq!(metrics.semantic_accuracy, 0.5625);
        assert_eq!(metrics.semantic_unscored, 0);
        assert_eq!(metrics.family_unchecked, 0);
    }

    #[test]
    fn test_unscored_cases_counted_and_earn_no_credit() {
        let mut records = batch();
        records.push(single_word(5));
        records.push(empty_name(6));

        let metrics = AggregateMetrics::from_records(&records, FamilyPolicy::ExcludeUnknown);
        assert_eq!(metrics.total, 6);
        assert_eq!(metrics.semantic_unscored, 2);
        assert_relative_eq!(metrics.semantic_accuracy, 2.25 / 6.0);
        assert_eq!(metrics.score_at_least_half, 3);

        // The single-word genus is still judged; the empty name is not.
        assert_eq!(metrics.family_valid, 3);
        assert_eq!(metrics.family_unchecked, 1);
        assert_eq!(metrics.family_invalid, 1);
        assert_eq!(metrics.family_judged, 5);
        assert_relative_eq!(metrics.family_accuracy, 3.0 / 5.0);
        assert_eq!(metrics.family_only, 2);
    }

    #[test]
    fn test_malformed_outcome_serializes_reason() {
        let malformed = empty_name(1);
        assert_eq!(malformed.family_label(), "unchecked");
        assert_eq!(malformed.semantic_score(), None);

        let json = serde_json::to_value(&malformed).unwrap();
        assert_eq!(json["semantic"]["outcome"], "malformed");
        assert_eq!(json["family_check"]["outcome"], "malformed");
        assert!(json["semantic"]["reason"]
            .as_str()
            .unwrap()
            .starts_with("Malformed name"));

        let completed = serde_json::to_value(record(2, true, FamilyVerdict::Valid, 1.0)).unwrap();
        assert_eq!(completed["family_check"]["outcome"], "completed");
        assert_eq!(completed["family_check"]["verdict"]["status"], "valid");
    }

    #[test]
    fn test_family_policy_changes_denominator_only() {
        let counted = AggregateMetrics::from_records(&batch(), FamilyPolicy::CountAsFailure);
        assert_eq!(counted.family_judged, 4);
        assert_relative_eq!(counted.family_accuracy, 0.5);

        let excluded = AggregateMetrics::from_records(&batch(), FamilyPolicy::ExcludeUnknown);
        assert_eq!(excluded.family_judged, 3);
        assert_eq!(excluded.family_unknown, 1);
        assert_relative_eq!(excluded.family_accuracy, 2.0 / 3.0);
    }

    #[test]
    fn test_empty_batch_yields_zero() {
        let metrics = AggregateMetrics::from_records(&[], FamilyPolicy::ExcludeUnknown);
        assert_eq!(metrics.total, 0);
        assert_relative_eq!(metrics.format_accuracy, 0.0);
        assert_relative_eq!(metrics.family_accuracy, 0.0);
        assert_relative_eq!(metrics.semantic_accuracy, 0.0);
    }

    #[test]
    fn test_all_unknown_excluded_yields_zero() {
        let records = vec![record(1, true, FamilyVerdict::UnknownFamily, 0.5)];
        let metrics = AggregateMetrics::from_records(&records, FamilyPolicy::ExcludeUnknown);
        assert_eq!(metrics.family_judged, 0);
        assert_relative_eq!(metrics.family_accuracy, 0.0);
    }

    #[test]
    fn test_report_lists_unknown_families() {
        let report = EvaluationReport::new(batch(), FamilyPolicy::CountAsFailure);
        let ids: Vec<usize> = report.unknown_family_records().map(|r| r.id).collect();
        assert_eq!(ids, vec![4]);
        assert_eq!(report.metrics.total, 4);
    }
}
