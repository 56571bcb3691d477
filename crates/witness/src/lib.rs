//! Spend witness generation
//!
//! Replays a coin transcript into a [`zkmix_smt::SparseMerkleTree`] and
//! assembles the inputs of the spend circuit for one coin: the final root,
//! the coin's nullifier and nonce, and its authentication path.

pub mod config;
mod error;
pub mod transcript;
pub mod witness;

pub use config::Config;
pub use error::{TranscriptError, WitnessError};
pub use transcript::{coin_commitment, Transcript, TranscriptEntry};
pub use witness::{compute_witness, SpendWitness, WitnessBuilder, WitnessInputs};
