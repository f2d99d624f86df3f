//! Closed keyword categories and their vocabularies.

use std::fmt;

use serde::{Deserialize, Serialize};

const SIZE_WORDS: &[&str] = &[
    "large", "tiny", "small", "big", "giant", "fluffy", "sleek", "majestic", "long-necked",
    "powerful",
];

const COLOR_WORDS: &[&str] = &[
    "brown", "gray", "grey", "colorful", "black", "white", "golden", "red", "green", "dark",
    "bright", "blue", "silvery", "striped",
];

const HABITAT_WORDS: &[&str] = &[
    "desert", "forest", "water", "garden", "pond", "barn", "bamboo", "waterfall", "rock",
    "savanna", "riverbank", "cave", "dam",
];

const BEHAVIOR_WORDS: &[&str] = &[
    "fast", "slow", "silent", "shy", "curious", "running", "flight", "hunts", "plays", "imitate",
    "curls", "agile", "soaring", "grazing", "hopping", "hooting", "singing", "burrowing",
    "flying", "building", "slides", "changes", "reaching",
];

const FEATURE_WORDS: &[&str] = &[
    "mane", "tail", "eyes", "eyesight", "claws", "feathers", "keen", "venomous", "rattling",
    "round", "leaves", "nuts",
];

/// Concept category a description keyword belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeywordCategory {
    /// Body size and build
    Size,
    /// Colouring and markings
    Color,
    /// Where the animal lives
    Habitat,
    /// What the animal does
    Behavior,
    /// Distinctive body parts
    Features,
}

impl KeywordCategory {
    /// All categories in canonical order
    pub const ALL: [Self; 5] = [
        Self::Size,
        Self::Color,
        Self::Habitat,
        Self::Behavior,
        Self::Features,
    ];

    /// Category name as used in reports
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Size => "size",
            Self::Color => "color",
            Self::Habitat => "habitat",
            Self::Behavior => "behavior",
            Self::Features => "features",
        }
    }

    /// Vocabulary words in canonical order
    pub fn words(self) -> &'static [&'static str] {
        match self {
            Self::Size => SIZE_WORDS,
            Self::Color => COLOR_WORDS,
            Self::Habitat => HABITAT_WORDS,
            Self::Behavior => BEHAVIOR_WORDS,
            Self::Features => FEATURE_WORDS,
        }
    }
}

impl fmt::Display for KeywordCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
