//! Morpheme lexicon and direct word → root associations.
//!
//! The lexicon maps a Latin or Greek root to the English concepts it denotes.
//! The association table runs the other way, from a description word to the
//! root it suggests. Both keep insertion order because evidence is reported in
//! table order.

use std::path::Path;

use indexmap::{IndexMap, IndexSet};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::core::errors::{BinomenError, Result};
use crate::reference::read_mapping_file;

const BUILTIN_ROOTS: &[(&str, &[&str])] = &[
    ("crinita", &["mane", "hair", "flowing"]),
    ("nucifraga", &["nut", "gather"]),
    ("ludicra", &["playful", "play", "game"]),
    ("acuta", &["sharp", "keen", "acute"]),
    ("vittatus", &["striped", "banded"]),
    ("sonans", &["sound", "rattling", "noise"]),
    ("versicolor", &["color", "changing", "varied"]),
    ("saltator", &["jumping", "hopping", "leap"]),
    ("oculata", &["eye", "eyes", "vision"]),
    ("alta", &["tall", "high", "long"]),
    ("aedificans", &["building", "construct"]),
    ("caeruleus", &["blue", "azure"]),
    ("fossor", &["digging", "burrowing"]),
    ("argenteus", &["silver", "silvery"]),
    ("speluncae", &["cave", "cavern"]),
    ("parvi", &["small", "little"]),
    ("longicaudatus", &["long", "tail"]),
    ("pygargus", &["striped", "marked"]),
    ("chrysocomus", &["golden", "yellow"]),
    ("aquiferosus", &["water", "aquatic"]),
    ("tephrocyonus", &["gray", "ashy"]),
];

const BUILTIN_ASSOCIATIONS: &[(&str, &str)] = &[
    ("mane", "crinita"),
    ("nut", "nucifraga"),
    ("play", "ludicra"),
    ("keen", "acuta"),
    ("sharp", "acuta"),
    ("stripe", "vittatus"),
    ("sound", "sonans"),
    ("rattle", "sonans"),
    ("color", "versicolor"),
    ("change", "versicolor"),
    ("jump", "saltator"),
    ("hop", "saltator"),
    ("eye", "oculata"),
    ("tall", "alta"),
    ("high", "alta"),
    ("long", "alta"),
    ("build", "aedificans"),
    ("blue", "caeruleus"),
    ("dig", "fossor"),
    ("burrow", "fossor"),
    ("silver", "argenteus"),
    ("cave", "speluncae"),
];

static BUILTIN_LEXICON: Lazy<MorphemeLexicon> = Lazy::new(|| {
    MorphemeLexicon::from_entries(
        BUILTIN_ROOTS
            .iter()
            .map(|(root, concepts)| (*root, concepts.iter().copied())),
    )
});

static BUILTIN_TABLE: Lazy<DirectAssociationTable> =
    Lazy::new(|| DirectAssociationTable::from_pairs(BUILTIN_ASSOCIATIONS.iter().copied()));

/// Root → concept words.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MorphemeLexicon {
    roots: IndexMap<String, IndexSet<String>>,
}

impl MorphemeLexicon {
    /// Built-in lexicon
    pub fn builtin() -> &'static Self {
        &BUILTIN_LEXICON
    }

    /// Build a lexicon from (root, concepts) pairs. Roots are stored lowercase.
    pub fn from_entries<R, C, I>(entries: impl IntoIterator<Item = (R, I)>) -> Self
    where
        R: AsRef<str>,
        C: AsRef<str>,
        I: IntoIterator<Item = C>,
    {
        let mut roots: IndexMap<String, IndexSet<String>> = IndexMap::new();
        for (root, concepts) in entries {
            roots
                .entry(root.as_ref().to_lowercase())
                .or_default()
                .extend(concepts.into_iter().map(|c| c.as_ref().to_lowercase()));
        }
        Self { roots }
    }

    /// Load a lexicon from a YAML or JSON mapping of root to concept list
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw: IndexMap<String, Vec<String>> = read_mapping_file(path)?;
        if let Some(root) = raw.keys().find(|r| r.trim().is_empty()) {
            return Err(BinomenError::validation_field(
                format!("lexicon root '{root}' is blank"),
                path.display().to_string(),
            ));
        }
        Ok(Self::from_entries(raw))
    }

    /// Roots and their concepts in table order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &IndexSet<String>)> {
        self.roots.iter().map(|(r, c)| (r.as_str(), c))
    }

    /// Roots contained anywhere in `epithet` (already lowercased)
    pub fn roots_in<'a>(
        &'a self,
        epithet: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a IndexSet<String>)> + 'a {
        self.iter().filter(move |(root, _)| epithet.contains(root))
    }

    /// Concepts for `root`
    pub fn concepts(&self, root: &str) -> Option<&IndexSet<String>> {
        self.roots.get(root)
    }

    /// Number of roots
    pub fn len(&self) -> usize {
        self.roots.len()
    }

    /// Whether the lexicon has no roots
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

/// Description word → root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DirectAssociationTable {
    pairs: IndexMap<String, String>,
}

impl DirectAssociationTable {
    /// Built-in association table
    pub fn builtin() -> &'static Self {
        &BUILTIN_TABLE
    }

    /// Build a table from (word, root) pairs; a later pair for the same word wins.
    pub fn from_pairs<W, R>(pairs: impl IntoIterator<Item = (W, R)>) -> Self
    where
        W: AsRef<str>,
        R: AsRef<str>,
    {
        Self {
            pairs: pairs
                .into_iter()
                .map(|(w, r)| (w.as_ref().to_lowercase(), r.as_ref().to_lowercase()))
                .collect(),
        }
    }

    /// Load a table from a YAML or JSON mapping of word to root
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw: IndexMap<String, String> = read_mapping_file(path)?;
        if let Some((word, _)) = raw.iter().find(|(_, root)| root.trim().is_empty()) {
            return Err(BinomenError::validation_field(
                format!("association for '{word}' has a blank root"),
                path.display().to_string(),
            ));
        }
        Ok(Self::from_pairs(raw))
    }

    /// (word, root) pairs in table order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(w, r)| (w.as_str(), r.as_str()))
    }

    /// Root associated with `word`
    pub fn root_for(&self, word: &str) -> Option<&str> {
        self.pairs.get(word).map(String::as_str)
    }

    /// Number of associations
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_builtin_lexicon() {
        let lexicon = MorphemeLexicon::builtin();
        assert_eq!(lexicon.len(), 21);

        let concepts: Vec<&String> = lexicon.concepts("crinita").unwrap().iter().collect();
        assert_eq!(concepts, vec!["mane", "hair", "flowing"]);

        let first = lexicon.iter().next().unwrap().0;
        assert_eq!(first, "crinita");
    }

    #[test]
    fn test_roots_in_uses_substring_containment() {
        let lexicon = MorphemeLexicon::builtin();
        let roots: Vec<&str> = lexicon
            .roots_in("longicaudatus")
            .map(|(root, _)| root)
            .collect();
        assert_eq!(roots, vec!["longicaudatus"]);

        let roots: Vec<&str> = lexicon.roots_in("altavittatus").map(|(r, _)| r).collect();
        assert_eq!(roots, vec!["vittatus", "alta"]);

        assert_eq!(lexicon.roots_in("leo").count(), 0);
    }

    #[test]
    fn test_builtin_associations() {
        let table = DirectAssociationTable::builtin();
        assert_eq!(table.len(), 22);
        assert_eq!(table.root_for("mane"), Some("crinita"));
        assert_eq!(table.root_for("long"), Some("alta"));
        assert_eq!(table.root_for("lion"), None);
        assert_eq!(table.iter().last(), Some(("cave", "speluncae")));
    }

    #[test]
    fn test_entries_are_lowercased() {
        let lexicon = MorphemeLexicon::from_entries(vec![("Rubra", vec!["Red"])]);
        assert!(lexicon.concepts("rubra").unwrap().contains("red"));

        let table = DirectAssociationTable::from_pairs(vec![("Red", "RUBRA")]);
        assert_eq!(table.root_for("red"), Some("rubra"));
    }

    #[test]
    fn test_lexicon_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("lexicon.yaml");
        fs::write(&path, "rubra: [red, crimson]\nnigra: [black]\n").unwrap();

        let lexicon = MorphemeLexicon::from_file(&path).unwrap();
        assert_eq!(lexicon.len(), 2);
        assert_eq!(lexicon.iter().next().unwrap().0, "rubra");
    }

    #[test]
    fn test_associations_from_json_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("associations.json");
        fs::write(&path, r#"{"red": "rubra", "black": ""}"#).unwrap();

        let err = DirectAssociationTable::from_file(&path).unwrap_err();
        assert!(matches!(err, BinomenError::Validation { .. }));
    }
}
