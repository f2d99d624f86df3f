//! Terminal Display Functions
//!
//! Colored tables and verdict lines for evaluation reports, single-name
//! checks, reference listings and configuration summaries.

use owo_colors::OwoColorize;
use tabled::{settings::Style as TableStyle, Table, Tabled};

use binomen_rs::core::config::{BinomenConfig, FamilyPolicy};
use binomen_rs::detectors::family::{FamilyCheck, FamilyVerdict};
use binomen_rs::detectors::format::FormatVerdict;
use binomen_rs::detectors::semantic::SemanticAssessment;
use binomen_rs::reference::taxonomy::FamilyGenusTable;
use binomen_rs::{CaseOutcome, EvaluationReport};

fn mark(ok: bool) -> String {
    if ok {
        "✓".green().to_string()
    } else {
        "✗".red().to_string()
    }
}

fn percent(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

fn verdict_label(verdict: &FamilyVerdict) -> String {
    match verdict {
        FamilyVerdict::Valid => verdict.label().green().to_string(),
        FamilyVerdict::Invalid { .. } => verdict.label().red().to_string(),
        FamilyVerdict::UnknownFamily => verdict.label().yellow().to_string(),
    }
}

fn family_outcome_label(outcome: &CaseOutcome<FamilyCheck>) -> String {
    match outcome {
        CaseOutcome::Completed(check) => verdict_label(&check.verdict),
        CaseOutcome::Malformed { .. } => "unchecked".red().to_string(),
    }
}

fn score_label(score: Option<f64>) -> String {
    let Some(score) = score else {
        return "unscored".red().to_string();
    };
    let text = format!("{score:.2}");
    if score > 0.5 {
        text.green().to_string()
    } else if score >= 0.5 {
        text.yellow().to_string()
    } else {
        text.red().to_string()
    }
}

/// Print per-case results followed by the metric summary
pub fn display_report(report: &EvaluationReport) {
    #[derive(Tabled)]
    struct CaseRow {
        #[tabled(rename = "#")]
        id: usize,
        #[tabled(rename = "Name")]
        name: String,
        #[tabled(rename = "Family")]
        family: String,
        #[tabled(rename = "Format")]
        format: String,
        #[tabled(rename = "Family check")]
        family_check: String,
        #[tabled(rename = "Score")]
        score: String,
    }

    if report.records.is_empty() {
        println!("{}", "No cases to evaluate.".dimmed());
        println!();
    } else {
        let rows: Vec<CaseRow> = report
            .records
            .iter()
            .map(|r| CaseRow {
                id: r.id,
                name: r.generated_name.clone(),
                family: r.family.clone(),
                format: mark(r.format_valid()),
                family_check: family_outcome_label(&r.family_check),
                score: score_label(r.semantic_score()),
            })
            .collect();

        println!("{}", "📋 Cases".bright_blue().bold());
        println!("{}", Table::new(rows).with(TableStyle::rounded()));
        println!();
    }

    display_metrics(report);
}

fn display_metrics(report: &EvaluationReport) {
    #[derive(Tabled)]
    struct MetricRow {
        #[tabled(rename = "Metric")]
        metric: String,
        #[tabled(rename = "Accuracy")]
        accuracy: String,
        #[tabled(rename = "Details")]
        details: String,
    }

    #[derive(Tabled)]
    struct BreakdownRow {
        #[tabled(rename = "Outcome")]
        outcome: &'static str,
        #[tabled(rename = "Cases")]
        cases: String,
    }

    let m = &report.metrics;
    let policy_note = match m.family_policy {
        FamilyPolicy::CountAsFailure => "unknown counted as failure",
        FamilyPolicy::ExcludeUnknown => "unknown excluded",
    };

    let metric_rows = vec![
        MetricRow {
            metric: "Latin format".to_string(),
            accuracy: percent(m.format_accuracy),
            details: format!("{}/{}", m.format_valid, m.total),
        },
        MetricRow {
            metric: "Family classification".to_string(),
            accuracy: percent(m.family_accuracy),
            details: format!("{}/{} ({policy_note})", m.family_valid, m.family_judged),
        },
        MetricRow {
            metric: "Semantic consistency".to_string(),
            accuracy: percent(m.semantic_accuracy),
            details: format!("mean {:.3}, {} unscored", m.semantic_accuracy, m.semantic_unscored),
        },
    ];

    println!("{}", "📊 Summary".bright_blue().bold());
    println!("{}", Table::new(metric_rows).with(TableStyle::rounded()));
    println!();

    let breakdown = [
        ("All three pass", m.perfect),
        ("Format and family pass", m.both_pass),
        ("Format only", m.format_only),
        ("Family only", m.family_only),
        ("Family unknown", m.family_unknown),
        ("Family unchecked", m.family_unchecked),
        ("Unscored", m.semantic_unscored),
        ("Score ≥ 0.5", m.score_at_least_half),
        ("Score ≥ 0.75", m.score_at_least_three_quarters),
        ("Score > 0.5", m.score_above_half),
    ];
    let breakdown_rows: Vec<BreakdownRow> = breakdown
        .into_iter()
        .map(|(outcome, count)| BreakdownRow {
            outcome,
            cases: format!("{count} / {}", m.total),
        })
        .collect();

    println!("{}", "🔎 Breakdown".bright_blue().bold());
    println!("{}", Table::new(breakdown_rows).with(TableStyle::rounded()));

    let unknown: Vec<&str> = report
        .unknown_family_records()
        .map(|r| r.family.as_str())
        .collect();
    if !unknown.is_empty() {
        println!();
        println!(
            "{} {} case(s) name a family missing from the reference table: {}",
            "⚠".yellow(),
            unknown.len(),
            unknown.join(", ")
        );
    }

    let malformed: Vec<String> = report
        .records
        .iter()
        .filter(|r| r.semantic.malformed_reason().is_some())
        .map(|r| format!("#{}", r.id))
        .collect();
    if !malformed.is_empty() {
        println!();
        println!(
            "{} {} case(s) could not be scored: {}",
            "⚠".yellow(),
            malformed.len(),
            malformed.join(", ")
        );
    }
}

/// Print a format verdict for `name`
pub fn display_format_verdict(name: &str, verdict: &FormatVerdict) {
    println!("{} {}", "Name:".bold(), name.cyan());
    println!("{} Format: {}", mark(verdict.is_valid), verdict.reason);
}

/// Print a family check
pub fn display_family_check(check: &FamilyCheck) {
    println!(
        "{} Family ({}): {}",
        mark(check.verdict.is_valid()),
        verdict_label(&check.verdict),
        check.reason
    );
}

/// Print a semantic score with its keywords and evidence
pub fn display_assessment(name: &str, assessment: &SemanticAssessment) {
    println!("{} {}", "Name:".bold(), name.cyan());
    println!("Semantic score: {}", score_label(Some(assessment.score)));

    let keywords = assessment.matched_keywords();
    if keywords.is_empty() {
        println!("{}", "No descriptive keywords found.".dimmed());
    } else {
        println!("Keywords: {}", keywords.join(", "));
    }

    if assessment.evidence.is_empty() {
        println!("{}", "No morpheme evidence.".dimmed());
    } else {
        println!("Evidence:");
        for line in assessment.evidence_lines() {
            println!("  • {line}");
        }
    }
}

/// Print the family reference table
pub fn display_families(table: &FamilyGenusTable) {
    #[derive(Tabled)]
    struct FamilyRow {
        #[tabled(rename = "Family")]
        family: String,
        #[tabled(rename = "Genera")]
        count: usize,
        #[tabled(rename = "Members")]
        members: String,
    }

    let rows: Vec<FamilyRow> = table
        .families()
        .map(|(family, genera)| FamilyRow {
            family: family.to_string(),
            count: genera.len(),
            members: genera.iter().map(String::as_str).collect::<Vec<_>>().join(", "),
        })
        .collect();

    println!("{}", "🦁 Reference Families".bright_blue().bold());
    println!("{}", Table::new(rows).with(TableStyle::rounded()));
    println!("{} families", table.len());
}

/// Print the settings that most affect evaluation
pub fn display_config_summary(config: &BinomenConfig, detailed: bool) {
    #[derive(Tabled)]
    struct SettingRow {
        #[tabled(rename = "Setting")]
        setting: &'static str,
        #[tabled(rename = "Value")]
        value: String,
    }

    let describe_path = |path: &Option<std::path::PathBuf>| {
        path.as_ref()
            .map_or_else(|| "built-in".to_string(), |p| p.display().to_string())
    };

    let mut rows = vec![
        SettingRow {
            setting: "grammar.profile",
            value: format!("{:?}", config.grammar.profile),
        },
        SettingRow {
            setting: "evaluation.family_policy",
            value: format!("{:?}", config.evaluation.family_policy),
        },
        SettingRow {
            setting: "evaluation.parallel",
            value: config.evaluation.parallel.to_string(),
        },
        SettingRow {
            setting: "constraint.delimiter",
            value: format!("{:?}", config.constraint.delimiter),
        },
        SettingRow {
            setting: "reference.taxonomy_path",
            value: describe_path(&config.reference.taxonomy_path),
        },
    ];

    if detailed {
        rows.extend([
            SettingRow {
                setting: "grammar.epithet_suffixes",
                value: config.grammar.epithet_suffixes.join(", "),
            },
            SettingRow {
                setting: "grammar.genus_suffixes",
                value: config.grammar.genus_suffixes.join(", "),
            },
            SettingRow {
                setting: "grammar.strict_genus",
                value: config.grammar.strict_genus.to_string(),
            },
            SettingRow {
                setting: "constraint.epithet_suffixes",
                value: config.constraint.epithet_suffixes.join(", "),
            },
            SettingRow {
                setting: "constraint.require_suffix",
                value: config.constraint.require_suffix.to_string(),
            },
            SettingRow {
                setting: "reference.lexicon_path",
                value: describe_path(&config.reference.lexicon_path),
            },
            SettingRow {
                setting: "reference.associations_path",
                value: describe_path(&config.reference.associations_path),
            },
            SettingRow {
                setting: "description.min_interval_ms",
                value: config.description.min_interval_ms.to_string(),
            },
            SettingRow {
                setting: "description.retries",
                value: config.description.retries.to_string(),
            },
        ]);
    }

    println!("{}", "⚙️  Configuration Summary".bright_blue().bold());
    println!("{}", Table::new(rows).with(TableStyle::rounded()));
    println!();
}
