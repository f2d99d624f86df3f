//! # Binomen-RS: Constrained Generation and Evaluation of Latin Binomials
//!
//! Rule-based tooling around machine-generated two-word species names:
//!
//! - **Constraint filter**: a per-beam token admissibility callback that keeps
//!   beam-search output to a capitalised genus plus a lowercase epithet and
//!   stops generation after the second word
//! - **Format validation**: positional Latin morphology with a permissive and
//!   a strict (suffix-requiring) profile
//! - **Family validation**: genus membership against a family reference table,
//!   with unknown families reported as their own outcome
//! - **Semantic scoring**: morpheme → concept matching between the epithet and
//!   the description, with an evidence trail
//! - **Batch evaluation**: per-case records and corpus metrics, in parallel
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          API Layer                           │
//! ├──────────────────────────────────────────────────────────────┤
//! │   Core      │  Reference   │  Detectors   │  Generation      │
//! │ • Grammar   │ • Taxonomy   │ • Format     │ • Constraint     │
//! │ • Names     │ • Lexicon    │ • Family     │ • Prompt         │
//! │ • Config    │ • Vocabulary │ • Keywords   │ • Description    │
//! │ • Errors    │              │ • Semantic   │                  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use binomen_rs::{BinomenConfig, BinomenEngine, EvaluationCase};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let engine = BinomenEngine::new(BinomenConfig::default())?;
//!     let report = engine.evaluate(&[EvaluationCase::new(
//!         "a majestic lion with a flowing mane",
//!         "Felidae",
//!         "*Panthera crinita*",
//!     )])?;
//!
//!     println!("format accuracy: {:.2}", report.metrics.format_accuracy);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// Core grammar, name parsing, configuration and errors
pub mod core {
    //! Core data types shared by every component.

    pub mod config;
    pub mod errors;
    pub mod grammar;
    pub mod name;
}

// Read-only reference tables
pub mod reference;

// Post-hoc validators and scorers
pub mod detectors {
    //! Validators and scorers applied to finished names.

    pub mod family;
    pub mod format;
    pub mod keywords;
    pub mod semantic;
}

// Generation-time support
pub mod generation {
    //! Generation-time constraint filtering, prompts and description support.

    pub mod constraint;
    pub mod description;
    pub mod prompt;
}

// Dataset input and report output
pub mod io {
    //! Dataset loading and report writing.

    pub mod dataset;
    pub mod reports;
}

// Public API and engine interface
pub mod api {
    //! High-level evaluation engine and result types.

    pub mod engine;
    pub mod results;
}

// Re-export primary types for convenience
pub use crate::api::engine::BinomenEngine;
pub use crate::api::results::{
    AggregateMetrics, CaseOutcome, EvaluationCase, EvaluationRecord, EvaluationReport,
};
pub use crate::core::config::BinomenConfig;
pub use crate::core::errors::{BinomenError, Result, ResultExt};
pub use crate::core::name::BinomialName;
pub use crate::generation::constraint::{AdmissibleTokens, ConstraintFilter, TokenId, TokenVocabulary};

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build-time feature detection
pub mod features {
    //! Runtime feature detection.

    /// Check if parallel batch evaluation is enabled
    pub const fn has_parallel() -> bool {
        cfg!(feature = "parallel")
    }
}
