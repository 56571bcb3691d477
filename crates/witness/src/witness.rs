//! Witness generation for spend proofs

use std::collections::HashSet;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use tracing::{debug, info};
use zkmix_smt::{FieldElement, MerklePath, SparseMerkleTree};

use crate::{coin_commitment, Config, TranscriptEntry, WitnessError};

/// Witness for spending one coin
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SpendWitness {
    /// Tree root after the whole transcript is applied
    pub digest: FieldElement,
    /// Nullifier of the coin being spent
    pub nullifier: FieldElement,
    /// Nonce of that coin
    pub nonce: FieldElement,
    /// Membership path of the coin's commitment
    pub path: MerklePath,
}

impl SpendWitness {
    /// Commitment of the coin being spent
    pub fn commitment(&self) -> FieldElement {
        coin_commitment(self.nullifier, self.nonce)
    }

    /// Check that the path opens the commitment under `digest`
    pub fn verify(&self) -> bool {
        self.path.leaf == self.commitment() && self.path.verify(&self.digest)
    }

    /// Flatten into the named inputs of the spend circuit
    ///
    /// `direction[i]` is `"1"` when `sibling[i]` is the left child at level `i`.
    pub fn to_inputs(&self) -> WitnessInputs {
        let mut inputs = WitnessInputs::with_capacity(3 + 2 * self.path.depth());
        inputs.push("digest", self.digest.to_string());
        inputs.push("nullifier", self.nullifier.to_string());
        inputs.push("nonce", self.nonce.to_string());
        for (i, step) in self.path.steps.iter().enumerate() {
            inputs.push(format!("sibling[{i}]"), step.sibling.to_string());
            inputs.push(format!("direction[{i}]"), if step.sibling_on_left { "1" } else { "0" });
        }
        inputs
    }
}

/// Named circuit inputs, kept in emission order
///
/// Serializes as a flat JSON object of decimal strings.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WitnessInputs {
    entries: Vec<(String, String)>,
}

impl WitnessInputs {
    fn with_capacity(capacity: usize) -> Self {
        Self { entries: Vec::with_capacity(capacity) }
    }

    fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.push((key.into(), value.into()));
    }

    /// Value stored under `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    /// Keys in emission order
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Number of named inputs
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no inputs
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for WitnessInputs {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Replays transcripts into a commitment tree
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WitnessBuilder {
    depth: u32,
    strict: bool,
}

impl WitnessBuilder {
    /// Create a strict builder for trees of the given depth
    pub const fn new(depth: u32) -> Self {
        Self { depth, strict: true }
    }

    /// Create a builder from configuration
    pub const fn from_config(config: &Config) -> Self {
        Self { depth: config.depth, strict: config.strict }
    }

    /// Trust the transcript: accept repeated coins, let the last nonce of a
    /// repeated target nullifier win
    pub const fn lenient(mut self) -> Self {
        self.strict = false;
        self
    }

    /// Tree depth
    pub const fn depth(&self) -> u32 {
        self.depth
    }

    /// Replay the transcript and build the witness for `target`
    pub fn build(
        &self,
        transcript: &[TranscriptEntry],
        target: &FieldElement,
    ) -> Result<SpendWitness, WitnessError> {
        let mut tree = SparseMerkleTree::new(self.depth)?;
        if !self.strict {
            tree = tree.allow_duplicate_leaves();
        }

        debug!(
            depth = self.depth,
            entries = transcript.len(),
            strict = self.strict,
            "replaying transcript"
        );

        let mut seen = HashSet::new();
        let mut target_nonce = None;
        for (entry, item) in transcript.iter().enumerate() {
            if let TranscriptEntry::SpendableCoin { nullifier, nonce } = item {
                if self.strict && !seen.insert(*nullifier) {
                    return Err(WitnessError::DuplicateNullifier { nullifier: *nullifier, entry });
                }
                if nullifier == target {
                    target_nonce = Some(*nonce);
                }
            }
            tree.insert(item.commitment()).map_err(|source| WitnessError::Replay { entry, source })?;
        }

        let nonce = target_nonce.ok_or(WitnessError::TargetNotFound(*target))?;
        let path = tree.path(&coin_commitment(*target, nonce))?;

        info!(
            digest = %tree.digest(),
            index = path.index,
            leaves = tree.len(),
            "computed spend witness"
        );

        Ok(SpendWitness { digest: tree.digest(), nullifier: *target, nonce, path })
    }
}

/// Compute the named spend-circuit inputs for `target` with a strict builder
pub fn compute_witness(
    depth: u32,
    transcript: &[TranscriptEntry],
    target: &FieldElement,
) -> Result<WitnessInputs, WitnessError> {
    WitnessBuilder::new(depth).build(transcript, target).map(|witness| witness.to_inputs())
}
