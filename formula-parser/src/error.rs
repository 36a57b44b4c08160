//! FILENAME: formula-parser/src/error.rs

use thiserror::Error;

/// Failures raised while splitting, classifying, or building a formula.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormulaError {
    /// A required argument was absent. Raised before any scanning happens.
    #[error("Required parameter is missing: {0}")]
    NullParameter(&'static str),

    #[error("Formula syntax error: {0}")]
    Syntax(String),

    /// A lexeme that no pattern of the table recognizes reached the classifier.
    #[error("Lexeme is not recognized by the pattern table: '{0}'")]
    Unclassified(String),
}

impl FormulaError {
    pub fn syntax(message: impl Into<String>) -> Self {
        FormulaError::Syntax(message.into())
    }
}

pub type FormulaResult<T> = Result<T, FormulaError>;

/// Failures raised while building or loading a pattern table.
#[derive(Error, Debug)]
pub enum PatternError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid pattern configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Pattern '{id}' does not compile: {source}")]
    InvalidRegex {
        id: String,
        #[source]
        source: regex::Error,
    },

    #[error("Pattern id defined more than once: {0}")]
    DuplicateId(String),

    #[error("Pattern table has no patterns")]
    EmptyTable,
}
