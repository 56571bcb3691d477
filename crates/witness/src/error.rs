//! Witness and transcript errors

use thiserror::Error;
use zkmix_smt::{FieldElement, ParseFieldError, SmtError};

/// Errors from reading a transcript
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranscriptError {
    /// A line holds neither one nor two values
    #[error("line {line}: expected a coin or a nullifier and nonce, found {found} values")]
    Arity {
        /// 1-based line number
        line: usize,
        /// Number of whitespace-separated values on the line
        found: usize,
    },
    /// A value is not a field element
    #[error("line {line}: {source}")]
    Field {
        /// 1-based line number
        line: usize,
        /// Decoding failure
        #[source]
        source: ParseFieldError,
    },
}

/// Errors from building a spend witness
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WitnessError {
    /// The target nullifier does not occur in the transcript
    #[error("nullifier {0} not found in transcript")]
    TargetNotFound(FieldElement),
    /// A nullifier occurs in more than one transcript entry
    #[error("nullifier {nullifier} repeats at transcript entry {entry}")]
    DuplicateNullifier {
        /// The repeated nullifier
        nullifier: FieldElement,
        /// 0-based position of the repeat
        entry: usize,
    },
    /// Inserting a transcript entry failed
    #[error("transcript entry {entry}: {source}")]
    Replay {
        /// 0-based position of the entry
        entry: usize,
        /// Tree failure
        #[source]
        source: SmtError,
    },
    /// Tree construction or path lookup failed
    #[error(transparent)]
    Tree(#[from] SmtError),
}
