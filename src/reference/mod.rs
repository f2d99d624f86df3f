//! Read-only reference data: taxonomy, morpheme lexicon and keyword vocabulary.
//!
//! Every table ships with a built-in copy and can be replaced by a YAML or
//! JSON mapping on disk. Tables are immutable after construction and are
//! shared freely across threads.

pub mod lexicon;
pub mod taxonomy;
pub mod vocabulary;

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::core::errors::{BinomenError, Result};

pub use lexicon::{DirectAssociationTable, MorphemeLexicon};
pub use taxonomy::FamilyGenusTable;
pub use vocabulary::KeywordCategory;

/// Deserialize a reference mapping, choosing JSON or YAML by extension.
pub(crate) fn read_mapping_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        BinomenError::io(
            format!("Failed to read reference file: {}", path.display()),
            e,
        )
    })?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        Ok(serde_json::from_str(&content)?)
    } else {
        Ok(serde_yaml::from_str(&content)?)
    }
}
