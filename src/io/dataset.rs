//! Evaluation dataset loading.
//!
//! Cases are read from a JSON array, JSON Lines or a YAML sequence. Each case
//! needs `description`, `family` and `generated_name`.

use std::path::Path;

use tracing::debug;

use crate::api::results::EvaluationCase;
use crate::core::errors::{BinomenError, Result};

/// Supported dataset encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetFormat {
    /// A JSON array of cases
    Json,
    /// One JSON object per line
    JsonLines,
    /// A YAML sequence of cases
    Yaml,
}

impl DatasetFormat {
    /// Infer the format from a file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("json") => Ok(Self::Json),
            Some("jsonl" | "ndjson") => Ok(Self::JsonLines),
            Some("yaml" | "yml") => Ok(Self::Yaml),
            _ => Err(BinomenError::Dataset {
                message: "unsupported dataset extension (expected .json, .jsonl, .yaml or .yml)"
                    .to_string(),
                path: Some(path.display().to_string()),
                line: None,
            }),
        }
    }
}

/// Load evaluation cases from `path`.
pub fn load_cases(path: &Path) -> Result<Vec<EvaluationCase>> {
    let format = DatasetFormat::from_path(path)?;
    let content = std::fs::read_to_string(path).map_err(|e| {
        BinomenError::io(format!("Failed to read dataset: {}", path.display()), e)
    })?;
    let cases = parse_cases(&content, format, &path.display().to_string())?;
    debug!(cases = cases.len(), path = %path.display(), "dataset loaded");
    Ok(cases)
}

/// Parse cases from text; `source` names the input in errors.
pub fn parse_cases(content: &str, format: DatasetFormat, source: &str) -> Result<Vec<EvaluationCase>> {
    match format {
        DatasetFormat::Json => serde_json::from_str(content)
            .map_err(|e| BinomenError::dataset_at(e.to_string(), source, e.line())),
        DatasetFormat::JsonLines => parse_json_lines(content, source),
        DatasetFormat::Yaml => serde_yaml::from_str::<Option<Vec<EvaluationCase>>>(content)
            .map(Option::unwrap_or_default)
            .map_err(|e| match e.location() {
                Some(loc) => BinomenError::dataset_at(e.to_string(), source, loc.line()),
                None => BinomenError::dataset(e.to_string()).with_context(source),
            }),
    }
}

fn parse_json_lines(content: &str, source: &str) -> Result<Vec<EvaluationCase>> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            serde_json::from_str(line)
                .map_err(|e| BinomenError::dataset_at(e.to_string(), source, idx + 1))
        })
        .collect()
}
