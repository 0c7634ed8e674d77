//! Error handling for bidi resolution
//!
//! Malformed text never fails: unmatched controls and nesting overflow are
//! absorbed by the algorithm and surfaced as [`Diagnostic`]s. Only caller
//! contract violations (bad configuration) produce a [`BidiError`].

/// Caller-facing configuration errors
#[derive(Debug, thiserror::Error)]
pub enum BidiError {
    #[error("Invalid base direction: {0:?} (expected auto, ltr or rtl)")]
    InvalidBaseDirection(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Serialization failed: {0}")]
    Serialization(String),

    #[error("Paragraph worker panicked during parallel resolution")]
    WorkerPanicked,
}

impl From<serde_json::Error> for BidiError {
    fn from(err: serde_json::Error) -> Self {
        BidiError::Serialization(err.to_string())
    }
}

pub type BidiResult<T> = Result<T, BidiError>;

/// Which kind of explicit initiator hit the nesting limit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum OverflowKind {
    Embedding,
    Isolate,
}

/// Degraded-behavior events observed while resolving a paragraph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Diagnostic {
    /// An embedding, override or isolate initiator would have exceeded
    /// the maximum explicit depth and was ignored
    NestingOverflow { position: usize, kind: OverflowKind },
    /// More than 63 unmatched opening brackets; bracket pairing stopped for
    /// the rest of the isolating run sequence
    BracketStackOverflow { position: usize },
}

impl Diagnostic {
    /// Original index of the character that triggered the diagnostic
    pub fn position(&self) -> usize {
        match *self {
            Diagnostic::NestingOverflow { position, .. } => position,
            Diagnostic::BracketStackOverflow { position } => position,
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::NestingOverflow { position, kind } => {
                write!(f, "{kind:?} nesting overflow at index {position}")
            }
            Diagnostic::BracketStackOverflow { position } => {
                write!(f, "bracket stack overflow at index {position}")
            }
        }
    }
}
