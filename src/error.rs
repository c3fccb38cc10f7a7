//! Error types for the CRBH pipeline
//!
//! Parse failures and stage-ordering violations are distinct variants so callers
//! can tell malformed input apart from misuse of the stepwise API.

use thiserror::Error;

/// Result type for CRBH operations.
pub type Result<T> = std::result::Result<T, CrbhError>;

#[derive(Debug, Error)]
pub enum CrbhError {
    /// A tabular hit line did not tokenize into 12 fields, or a numeric field did not parse.
    #[error("{source_name}:{line}: malformed hit record: {reason}")]
    Parse {
        /// Name of the stream the line came from (file path or direction label).
        source_name: String,
        /// 1-based line number, 0 when the record did not come from a stream.
        line: usize,
        reason: String,
    },

    /// A pipeline stage was invoked before the stage it depends on.
    #[error("inputs not ready: {0}")]
    State(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failure inside a search backend (process launch, missing executable, ...).
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

impl CrbhError {
    pub fn parse(source_name: impl Into<String>, line: usize, reason: impl Into<String>) -> Self {
        CrbhError::Parse {
            source_name: source_name.into(),
            line,
            reason: reason.into(),
        }
    }

    pub fn state(msg: impl Into<String>) -> Self {
        CrbhError::State(msg.into())
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, CrbhError::Parse { .. })
    }

    pub fn is_state(&self) -> bool {
        matches!(self, CrbhError::State(_))
    }
}
