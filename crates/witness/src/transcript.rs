//! Coin transcripts
//!
//! A transcript lists every coin added to the commitment tree, in order. In
//! text form each non-blank line is either one decimal number (the coin
//! itself) or two whitespace-separated numbers (nullifier, then nonce).

use std::fmt;
use std::str::FromStr;

use zkmix_smt::{compress2, FieldElement};

use crate::TranscriptError;

/// Commitment of a coin with known internals
pub fn coin_commitment(nullifier: FieldElement, nonce: FieldElement) -> FieldElement {
    compress2(nullifier, nonce)
}

/// One transcript line
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TranscriptEntry {
    /// A commitment whose internals are not tracked
    BareCoin(FieldElement),
    /// A coin created with known internals
    SpendableCoin {
        /// Revealed when the coin is spent
        nullifier: FieldElement,
        /// Blinding value
        nonce: FieldElement,
    },
}

impl TranscriptEntry {
    /// The leaf this entry adds to the tree
    pub fn commitment(&self) -> FieldElement {
        match *self {
            Self::BareCoin(coin) => coin,
            Self::SpendableCoin { nullifier, nonce } => coin_commitment(nullifier, nonce),
        }
    }

    /// Nullifier of a spendable coin
    pub const fn nullifier(&self) -> Option<FieldElement> {
        match *self {
            Self::BareCoin(_) => None,
            Self::SpendableCoin { nullifier, .. } => Some(nullifier),
        }
    }

    /// Parse one line; blank lines yield `None`
    pub fn parse_line(text: &str, line: usize) -> Result<Option<Self>, TranscriptError> {
        let field = |value: &str| {
            value.parse::<FieldElement>().map_err(|source| TranscriptError::Field { line, source })
        };

        let values: Vec<&str> = text.split_whitespace().collect();
        match values.as_slice() {
            [] => Ok(None),
            [coin] => Ok(Some(Self::BareCoin(field(*coin)?))),
            [nullifier, nonce] => Ok(Some(Self::SpendableCoin {
                nullifier: field(*nullifier)?,
                nonce: field(*nonce)?,
            })),
            other => Err(TranscriptError::Arity { line, found: other.len() }),
        }
    }
}

impl fmt::Display for TranscriptEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BareCoin(coin) => write!(f, "{coin}"),
            Self::SpendableCoin { nullifier, nonce } => write!(f, "{nullifier} {nonce}"),
        }
    }
}

/// Ordered list of transcript entries
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    /// Wrap already parsed entries
    pub fn new(entries: Vec<TranscriptEntry>) -> Self {
        Self { entries }
    }

    /// Entries in insertion order
    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the transcript has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromStr for Transcript {
    type Err = TranscriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // `lines` also strips the `\r` of CRLF endings
        let entries = s
            .lines()
            .enumerate()
            .filter_map(|(i, text)| TranscriptEntry::parse_line(text, i + 1).transpose())
            .collect::<Result<_, _>>()?;
        Ok(Self { entries })
    }
}

impl fmt::Display for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{entry}")?;
        }
        Ok(())
    }
}

impl From<Vec<TranscriptEntry>> for Transcript {
    fn from(entries: Vec<TranscriptEntry>) -> Self {
        Self::new(entries)
    }
}
