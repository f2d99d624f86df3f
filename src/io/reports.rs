//! Evaluation report rendering in JSON, YAML and Markdown.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::api::results::{AggregateMetrics, CaseOutcome, EvaluationRecord, EvaluationReport};
use crate::core::config::FamilyPolicy;
use crate::core::errors::{BinomenError, Result};

/// Base file name of written reports.
pub const REPORT_FILE_STEM: &str = "binomen-report";

/// Report output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    /// Pretty-printed JSON
    Json,
    /// YAML
    Yaml,
    /// Markdown summary and per-case breakdown
    Markdown,
}

impl ReportFormat {
    /// File extension for this format
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Markdown => "md",
        }
    }
}

/// Renders and writes evaluation reports.
#[derive(Debug, Clone, Copy)]
pub struct ReportGenerator {
    format: ReportFormat,
}

impl ReportGenerator {
    /// Generator for `format`
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    /// Render `report` to a string
    pub fn render(&self, report: &EvaluationReport) -> Result<String> {
        match self.format {
            ReportFormat::Json => Ok(serde_json::to_string_pretty(report)?),
            ReportFormat::Yaml => Ok(serde_yaml::to_string(report)?),
            ReportFormat::Markdown => Ok(render_markdown(report)),
        }
    }

    /// Write `report` into `out_dir`, creating it if needed, and return the file path
    pub fn write(&self, report: &EvaluationReport, out_dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(out_dir).map_err(|e| {
            BinomenError::io(
                format!("Failed to create output directory: {}", out_dir.display()),
                e,
            )
        })?;

        let path = out_dir.join(format!("{REPORT_FILE_STEM}.{}", self.format.extension()));
        let content = self.render(report)?;
        fs::write(&path, content).map_err(|e| {
            BinomenError::io(format!("Failed to write report: {}", path.display()), e)
        })?;

        info!(path = %path.display(), format = ?self.format, "report written");
        Ok(path)
    }
}

fn render_markdown(report: &EvaluationReport) -> String {
    let mut out = String::new();
    let metrics = &report.metrics;

    out.push_str("# Binomial Evaluation Report\n\n");
    out.push_str(&format!(
        "Generated {} · {} case(s)\n\n",
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
        metrics.total
    ));

    write_summary(&mut out, metrics);
    write_cross_tabs(&mut out, metrics);

    if !report.records.is_empty() {
        out.push_str("## Cases\n\n");
        for record in &report.records {
            write_record(&mut out, record);
        }
    }
    out
}

fn write_summary(out: &mut String, m: &AggregateMetrics) {
    let family_note = match m.family_policy {
        FamilyPolicy::CountAsFailure => "unknown families counted as failures",
        FamilyPolicy::ExcludeUnknown => "unknown families excluded",
    };

    out.push_str("## Summary\n\n");
    out.push_str("| Metric | Accuracy | Details |\n");
    out.push_str("|---|---|---|\n");
    out.push_str(&format!(
        "| Latin format | {} | {}/{} |\n",
        percent(m.format_accuracy),
        m.format_valid,
        m.total
    ));
    out.push_str(&format!(
        "| Family classification | {} | {}/{} ({family_note}) |\n",
        percent(m.family_accuracy),
        m.family_valid,
        m.family_judged
    ));
    out.push_str(&format!(
        "| Semantic consistency | {} | mean {:.3}, {} unscored |\n\n",
        percent(m.semantic_accuracy),
        m.semantic_accuracy,
        m.semantic_unscored
    ));
}

fn write_cross_tabs(out: &mut String, m: &AggregateMetrics) {
    let rows = [
        ("All three pass (score > 0.5)", m.perfect),
        ("Format and family pass", m.both_pass),
        ("Format only", m.format_only),
        ("Family only", m.family_only),
        ("Family unknown", m.family_unknown),
        ("Family unchecked", m.family_unchecked),
        ("Semantic unscored", m.semantic_unscored),
        ("Semantic score ≥ 0.5", m.score_at_least_half),
        ("Semantic score ≥ 0.75", m.score_at_least_three_quarters),
        ("Semantic score > 0.5", m.score_above_half),
    ];

    out.push_str("## Breakdown\n\n");
    for (label, count) in rows {
        out.push_str(&format!("- {label}: {count} / {}\n", m.total));
    }
    out.push('\n');
}

fn write_record(out: &mut String, r: &EvaluationRecord) {
    let mark = |ok: bool| if ok { "✓" } else { "✗" };

    out.push_str(&format!("### Case {}: `{}`\n\n", r.id, r.generated_name));
    out.push_str(&format!("- Description: {}\n", r.description));
    out.push_str(&format!("- Family: {}\n", r.family));
    out.push_str(&format!(
        "- Format {}: {}\n",
        mark(r.format_valid()),
        r.format.reason
    ));

    match &r.family_check {
        CaseOutcome::Completed(check) => out.push_str(&format!(
            "- Family {} ({}): {}\n",
            mark(check.verdict.is_valid()),
            check.verdict.label(),
            check.reason
        )),
        CaseOutcome::Malformed { reason } => {
            out.push_str(&format!("- Family ✗ (unchecked): {reason}\n"));
        }
    }

    match &r.semantic {
        CaseOutcome::Completed(assessment) => {
            out.push_str(&format!("- Semantic score: {:.2}\n", assessment.score));
            let keywords = assessment.matched_keywords();
            if !keywords.is_empty() {
                out.push_str(&format!("- Keywords: {}\n", keywords.join(", ")));
            }
            for line in assessment.evidence_lines() {
                out.push_str(&format!("  - {line}\n"));
            }
        }
        CaseOutcome::Malformed { reason } => {
            out.push_str(&format!("- Semantic score: unscored ({reason})\n"));
        }
    }
    out.push('\n');
}

fn percent(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}
