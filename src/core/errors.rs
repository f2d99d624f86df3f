//! Error types for the binomen-rs library.
//!
//! Validators and scorers are total over well-formed input and report their
//! verdicts as values. This module covers everything that must be surfaced to
//! the caller instead: structurally unusable names, bad configuration,
//! unreadable datasets and I/O failures.

use std::io;

use thiserror::Error;

/// Main result type for binomen operations.
pub type Result<T> = std::result::Result<T, BinomenError>;

/// Error type for all binomen operations.
#[derive(Error, Debug)]
pub enum BinomenError {
    /// I/O related errors (config files, datasets, reports, caches)
    #[error("I/O error: {message}")]
    Io {
        /// Human-readable error message
        message: String,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config {
        /// Error description
        message: String,
        /// Configuration field that caused the error
        field: Option<String>,
    },

    /// Validation errors for input data
    #[error("Validation error: {message}")]
    Validation {
        /// Error description
        message: String,
        /// Field or input that failed validation
        field: Option<String>,
    },

    /// A generated name that cannot be split into the parts an operation needs
    #[error("Malformed name '{name}': expected at least {required} word(s), found {tokens}")]
    MalformedName {
        /// Name after markup stripping
        name: String,
        /// Number of whitespace-separated tokens found
        tokens: usize,
        /// Minimum number of tokens the operation required
        required: usize,
        /// 1-based evaluation case, when raised during a batch
        case_id: Option<usize>,
    },

    /// Dataset loading errors
    #[error("Dataset error: {message}")]
    Dataset {
        /// Error description
        message: String,
        /// Dataset path, if known
        path: Option<String>,
        /// 1-based line number for line-oriented formats
        line: Option<usize>,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error description
        message: String,
        /// Data format involved
        data_type: Option<String>,
        /// Underlying serialization error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Errors raised by generation-side collaborators (explainers, decoders)
    #[error("Generation error: {message}")]
    Generation {
        /// Error description
        message: String,
        /// Collaborator that failed
        component: Option<String>,
    },

    /// Generic internal errors
    #[error("Internal error: {message}")]
    Internal {
        /// Error description
        message: String,
        /// Additional context
        context: Option<String>,
    },
}

impl BinomenError {
    /// Create a new I/O error with context
    pub fn io(message: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            field: None,
        }
    }

    /// Create a new configuration error with field context
    pub fn config_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create a new validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field: None,
        }
    }

    /// Create a new validation error naming the offending field
    pub fn validation_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create a malformed-name error
    pub fn malformed_name(name: impl Into<String>, tokens: usize, required: usize) -> Self {
        Self::MalformedName {
            name: name.into(),
            tokens,
            required,
            case_id: None,
        }
    }

    /// Create a dataset error
    pub fn dataset(message: impl Into<String>) -> Self {
        Self::Dataset {
            message: message.into(),
            path: None,
            line: None,
        }
    }

    /// Create a dataset error pointing at a line of a file
    pub fn dataset_at(message: impl Into<String>, path: impl Into<String>, line: usize) -> Self {
        Self::Dataset {
            message: message.into(),
            path: Some(path.into()),
            line: Some(line),
        }
    }

    /// Create a generation collaborator error
    pub fn generation(component: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Generation {
            message: message.into(),
            component: Some(component.into()),
        }
    }

    /// Create a new internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            context: None,
        }
    }

    /// Attach the 1-based evaluation case to a malformed-name error
    pub fn for_case(mut self, id: usize) -> Self {
        if let Self::MalformedName { case_id, .. } = &mut self {
            *case_id = Some(id);
        }
        self
    }

    /// Add context to an existing error
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        match &mut self {
            Self::Internal { context: ctx, .. } => {
                *ctx = Some(context.into());
            }
            Self::Dataset { path, .. } if path.is_none() => {
                *path = Some(context.into());
            }
            _ => {}
        }
        self
    }
}

impl From<io::Error> for BinomenError {
    fn from(err: io::Error) -> Self {
        Self::io("I/O operation failed", err)
    }
}

impl From<serde_json::Error> for BinomenError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            message: format!("JSON serialization failed: {err}"),
            data_type: Some("JSON".to_string()),
            source: Some(Box::new(err)),
        }
    }
}

impl From<serde_yaml::Error> for BinomenError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Serialization {
            message: format!("YAML serialization failed: {err}"),
            data_type: Some("YAML".to_string()),
            source: Some(Box::new(err)),
        }
    }
}

impl From<regex::Error> for BinomenError {
    fn from(err: regex::Error) -> Self {
        Self::config(format!("Invalid grammar pattern: {err}"))
    }
}

/// Result extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;

    /// Add static context to an error result
    fn context(self, msg: &'static str) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<BinomenError>,
{
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.into().with_context(f()))
    }

    fn context(self, msg: &'static str) -> Result<T> {
        self.map_err(|e| e.into().with_context(msg))
    }
}
