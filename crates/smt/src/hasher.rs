//! MiMC sponge hasher for the SMT
//!
//! Feistel-mode MiMC with exponent 5 over the BN254 scalar field, as used by
//! circom's `MiMCSponge`. Round constants are derived from a keccak256 chain
//! seeded with `"mimcsponge"`.

use std::sync::OnceLock;

use ark_bn254::Fr;
use ark_ff::{Field, Zero};
use tiny_keccak::{Hasher, Keccak};

use crate::FieldElement;

/// Number of Feistel rounds
pub const MIMC_ROUNDS: usize = 220;

/// Seed of the round constant chain
const MIMC_SEED: &[u8] = b"mimcsponge";

static ROUND_CONSTANTS: OnceLock<Vec<Fr>> = OnceLock::new();

fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    hasher.update(data);
    let mut output = [0u8; 32];
    hasher.finalize(&mut output);
    output
}

fn round_constants() -> &'static [Fr] {
    ROUND_CONSTANTS.get_or_init(|| {
        let mut constants = vec![Fr::zero(); MIMC_ROUNDS];
        let mut digest = keccak256(MIMC_SEED);
        // first and last rounds keep a zero constant
        for constant in constants.iter_mut().take(MIMC_ROUNDS - 1).skip(1) {
            digest = keccak256(&digest);
            *constant = FieldElement::from_be_bytes_mod_order(&digest).inner();
        }
        constants
    })
}

/// MiMC sponge hasher
#[derive(Clone, Copy, Debug, Default)]
pub struct MimcSponge;

impl MimcSponge {
    /// Apply the keyed Feistel permutation to `(left, right)`
    pub fn permute(left: Fr, right: Fr, key: Fr) -> (Fr, Fr) {
        let (mut xl, mut xr) = (left, right);
        for (i, c) in round_constants().iter().enumerate() {
            let t = xl + key + c;
            let t5 = t.square().square() * t;
            if i < MIMC_ROUNDS - 1 {
                let next = xr + t5;
                xr = xl;
                xl = next;
            } else {
                xr += t5;
            }
        }
        (xl, xr)
    }

    /// Absorb `inputs` with key zero and squeeze one element
    pub fn hash(inputs: &[FieldElement]) -> FieldElement {
        let key = Fr::zero();
        let (mut r, mut c) = (Fr::zero(), Fr::zero());
        for input in inputs {
            r += input.inner();
            (r, c) = Self::permute(r, c, key);
        }
        FieldElement::from(r)
    }

    /// Hash two field elements together
    pub fn compress2(left: &FieldElement, right: &FieldElement) -> FieldElement {
        Self::hash(&[*left, *right])
    }
}

/// Two-input compression used for commitments and internal nodes
pub fn compress2(left: FieldElement, right: FieldElement) -> FieldElement {
    MimcSponge::compress2(&left, &right)
}
