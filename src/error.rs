//! Structured error types for the Folio engine.
//!
//! Errors fall into five kinds: eager input validation, content that does
//! not fit its box, elements that do not fit even on a fresh page,
//! collaborator (font/image/IO) failures, and broken internal bookkeeping.
//! Only the placement engine ever recovers from one of them, and only
//! from [`Error::Overflow`].

use std::fmt;

use thiserror::Error;

use crate::geometry::Rect;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// The unified error type returned by all public Folio API functions.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid input detected at construction time.
    #[error("invalid input: {0}")]
    Input(#[from] InputError),

    /// Content does not fit inside the box it was given.
    #[error("{kind} needs {needed_width:.2} x {needed_height:.2} but only {available} is available")]
    Overflow {
        kind: &'static str,
        needed_width: f64,
        needed_height: f64,
        available: Rect,
    },

    /// An element does not fit even on a freshly created page.
    #[error("{kind} of size {width:.2} x {height:.2} does not fit on an empty page")]
    PageOverflow {
        kind: &'static str,
        width: f64,
        height: f64,
    },

    /// A collaborator failed while the named element was being processed.
    #[error("{context}: {source}")]
    Resource {
        context: String,
        #[source]
        source: ResourceError,
    },

    /// Internal bookkeeping reached a state that should be impossible.
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Wrap a collaborator failure with the kind of element being painted.
    pub fn resource(kind: &str, source: ResourceError) -> Self {
        Error::Resource {
            context: format!("while painting {kind}"),
            source,
        }
    }

    /// True for the one error kind the placement engine may recover from.
    pub fn is_overflow(&self) -> bool {
        matches!(self, Error::Overflow { .. })
    }
}

/// Eager validation failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("{what} must not be negative (got {value})")]
    NegativeDimension { what: &'static str, value: f64 },

    #[error("{what} must be finite")]
    NonFinite { what: &'static str },

    #[error("color component {component} = {value} is outside [0, 1]")]
    ColorComponent { component: &'static str, value: f64 },

    #[error("malformed hex color {0:?}")]
    MalformedHex(String),

    #[error("table of {rows} x {cols} has no free slot for a {row_span} x {col_span} cell")]
    TableFull {
        rows: usize,
        cols: usize,
        row_span: usize,
        col_span: usize,
    },

    #[error("{what} span must be at least 1")]
    InvalidSpan { what: &'static str },

    #[error("table cells cannot contain a {0}")]
    NestedTable(&'static str),

    #[error("{what} must be between {min} and {max} (got {value})")]
    OutOfRange {
        what: &'static str,
        value: usize,
        min: usize,
        max: usize,
    },

    #[error("table must have at least one row and one column")]
    EmptyTable,

    #[error("expression: {0}")]
    Expression(String),

    #[error("{0}")]
    Invalid(String),
}

/// Failures raised by the font, image and IO collaborators.
#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("image: {0}")]
    Image(String),

    #[error("font: {0}")]
    Font(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Errors raised while reading a [`DocumentConfig`](crate::config::DocumentConfig).
#[derive(Debug)]
pub enum ConfigError {
    /// JSON input failed to parse as a valid configuration.
    Parse {
        source: serde_json::Error,
        hint: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse { source, hint } => {
                write!(f, "Failed to parse configuration: {}", source)?;
                if !hint.is_empty() {
                    write!(f, "\n  Hint: {}", hint)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Parse { source, .. } => Some(source),
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        let hint = match e.classify() {
            serde_json::error::Category::Syntax => {
                "Check for trailing commas, missing quotes, or unescaped characters.".to_string()
            }
            serde_json::error::Category::Data => {
                "The JSON is valid but doesn't match the configuration schema. Check field names and types.".to_string()
            }
            serde_json::error::Category::Eof => {
                "Unexpected end of input; is the JSON truncated?".to_string()
            }
            serde_json::error::Category::Io => String::new(),
        };
        ConfigError::Parse { source: e, hint }
    }
}
