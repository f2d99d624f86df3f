//! Epithet explanation cache and description composition.
//!
//! Descriptions for training data are built from a short English gloss of
//! each epithet. Glosses come from an external explainer that is slow and
//! rate limited, so they go through [`EpithetCache`], which enforces a minimum
//! interval between calls, retries failures and persists results to JSON.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use indexmap::IndexMap;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::core::config::DescriptionConfig;
use crate::core::errors::{BinomenError, Result};

/// Family noun used when a family has no entry in the noun map.
pub const DEFAULT_FAMILY_NOUN: &str = "animal";

/// Source of short epithet glosses, such as "narrow-headed" or "from China".
pub trait EpithetExplainer: Send + Sync {
    /// Explain `epithet` in a few English words
    fn explain(&self, epithet: &str) -> Result<String>;
}

impl<F> EpithetExplainer for F
where
    F: Fn(&str) -> Result<String> + Send + Sync,
{
    fn explain(&self, epithet: &str) -> Result<String> {
        self(epithet)
    }
}

/// Time source and sleeper.
pub trait Clock: Send + Sync {
    /// Current instant
    fn now(&self) -> Instant;
    /// Block for `duration`
    fn sleep(&self, duration: Duration);
}

/// Wall clock backed by `std::thread::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

#[derive(Debug, Default)]
struct CacheState {
    entries: IndexMap<String, String>,
    fresh: usize,
    last_call: Option<Instant>,
}

/// Rate-limited, persistent cache of epithet glosses.
pub struct EpithetCache<E, C = SystemClock> {
    explainer: E,
    clock: C,
    min_interval: Duration,
    retries: u32,
    retry_delay: Duration,
    save_every: usize,
    path: Option<PathBuf>,
    state: Mutex<CacheState>,
}

impl<E: EpithetExplainer> EpithetCache<E, SystemClock> {
    /// Cache using the system clock
    pub fn new(explainer: E, config: &DescriptionConfig) -> Result<Self> {
        Self::with_clock(explainer, SystemClock, config)
    }
}

impl<E: EpithetExplainer, C: Clock> EpithetCache<E, C> {
    /// Cache with an injected clock. Loads `config.cache_path` when it exists.
    pub fn with_clock(explainer: E, clock: C, config: &DescriptionConfig) -> Result<Self> {
        config.validate()?;
        let entries = match &config.cache_path {
            Some(path) => load_entries(path)?,
            None => IndexMap::new(),
        };
        info!(entries = entries.len(), "epithet cache loaded");

        Ok(Self {
            explainer,
            clock,
            min_interval: Duration::from_millis(config.min_interval_ms),
            retries: config.retries,
            retry_delay: Duration::from_millis(config.retry_delay_ms),
            save_every: config.save_every,
            path: config.cache_path.clone(),
            state: Mutex::new(CacheState {
                entries,
                ..CacheState::default()
            }),
        })
    }

    /// Number of cached glosses
    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    /// Whether the cache is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cached gloss for `epithet`, without calling the explainer
    pub fn get(&self, epithet: &str) -> Option<String> {
        self.state.lock().entries.get(&cache_key(epithet)).cloned()
    }

    /// Gloss for `epithet`, calling the explainer on a miss.
    ///
    /// After all retries fail the empty string is cached in memory and
    /// returned; only answered glosses count toward the save interval.
    pub fn meaning(&self, epithet: &str) -> Result<String> {
        let key = cache_key(epithet);
        let mut state = self.state.lock();
        if let Some(hit) = state.entries.get(&key) {
            return Ok(hit.clone());
        }

        if let Some(last) = state.last_call {
            let elapsed = self.clock.now().saturating_duration_since(last);
            if elapsed < self.min_interval {
                self.clock.sleep(self.min_interval - elapsed);
            }
        }

        let mut answer = None;
        for attempt in 1..=self.retries {
            state.last_call = Some(self.clock.now());
            match self.explainer.explain(epithet) {
                Ok(text) => {
                    answer = Some(text.trim().to_string());
                    break;
                }
                Err(err) => {
                    warn!(epithet = %key, attempt, error = %err, "epithet explanation failed");
                    self.clock.sleep(self.retry_delay);
                }
            }
        }

        let Some(meaning) = answer else {
            state.entries.insert(key, String::new());
            return Ok(String::new());
        };
        state.entries.insert(key, meaning.clone());
        state.fresh += 1;
        if state.fresh % self.save_every == 0 {
            self.persist(&state.entries)?;
        }
        Ok(meaning)
    }

    /// Fetch glosses for many epithets, skipping cached ones
    pub fn warm<'a>(&self, epithets: impl IntoIterator<Item = &'a str>) -> Result<usize> {
        let mut fetched = 0;
        for epithet in epithets {
            if self.get(epithet).is_none() {
                self.meaning(epithet)?;
                fetched += 1;
            }
        }
        debug!(fetched, "epithet cache warmed");
        Ok(fetched)
    }

    /// Description for a species from its family and canonical name.
    ///
    /// The epithet is the last word of the canonical name.
    pub fn describe(
        &self,
        family: &str,
        canonical_name: &str,
        family_nouns: &HashMap<String, String>,
    ) -> Result<String> {
        let meaning = match canonical_name.split_whitespace().last() {
            Some(epithet) => self.meaning(epithet)?,
            None => String::new(),
        };
        Ok(compose_description(family, &meaning, family_nouns))
    }

    /// Write the cache file, if one is configured
    pub fn flush(&self) -> Result<()> {
        let state = self.state.lock();
        self.persist(&state.entries)
    }

    fn persist(&self, entries: &IndexMap<String, String>) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                BinomenError::io(format!("Failed to create {}", parent.display()), e)
            })?;
        }
        let content = serde_json::to_string_pretty(entries)?;
        std::fs::write(path, content).map_err(|e| {
            BinomenError::io(format!("Failed to write epithet cache: {}", path.display()), e)
        })?;
        debug!(entries = entries.len(), path = %path.display(), "epithet cache saved");
        Ok(())
    }
}

fn cache_key(epithet: &str) -> String {
    epithet.trim().to_lowercase()
}

fn load_entries(path: &Path) -> Result<IndexMap<String, String>> {
    if !path.exists() {
        return Ok(IndexMap::new());
    }
    let content = std::fs::read_to_string(path).map_err(|e| {
        BinomenError::io(format!("Failed to read epithet cache: {}", path.display()), e)
    })?;
    match serde_json::from_str(&content) {
        Ok(entries) => Ok(entries),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "corrupt epithet cache, starting empty");
            Ok(IndexMap::new())
        }
    }
}

/// Compose a short description from a family and an epithet gloss.
pub fn compose_description(
    family: &str,
    meaning: &str,
    family_nouns: &HashMap<String, String>,
) -> String {
    let noun = family_nouns
        .get(family)
        .map_or(DEFAULT_FAMILY_NOUN, String::as_str);

    let meaning = meaning.trim_matches(|c| c == '\'' || c == '"' || c == ' ');
    if meaning.is_empty() {
        return format!("a {noun}");
    }

    let lower = meaning.to_lowercase();
    if lower.starts_with("named after") || lower.starts_with("from") {
        format!("a {noun} {meaning}")
    } else if ["ed", "like", "shaped"].iter().any(|s| lower.ends_with(s)) {
        format!("a {meaning} {noun}")
    } else {
        format!("a {noun} that resembles {meaning}")
    }
}

#[cfg(test)]
#[path = "description_tests.rs"]
mod tests;
