//! Sparse Merkle Tree (SMT) for coin commitments
//!
//! This crate provides an append-only, fixed-depth SMT over the BN254 scalar
//! field. Key features:
//! - Insertion order addressing: the k-th inserted leaf sits at index k
//! - Canonical empty subtrees: only touched nodes are materialized
//! - ZK friendly: MiMC sponge compression, decimal field element encoding

mod error;
mod field;
mod hasher;
mod proof;
mod tree;

pub use error::SmtError;
pub use field::{FieldElement, ParseFieldError};
pub use hasher::{compress2, MimcSponge, MIMC_ROUNDS};
pub use proof::{MerklePath, PathStep};
pub use tree::SparseMerkleTree;

/// Position of a leaf, counted in insertion order
pub type LeafIndex = u64;

/// Largest supported tree depth; `2^MAX_DEPTH` positions fit a [`LeafIndex`]
pub const MAX_DEPTH: u32 = 63;

/// Value of an empty leaf
pub fn empty_leaf() -> FieldElement {
    FieldElement::zero()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_tree() {
        let tree = SparseMerkleTree::new(4).unwrap();
        assert_eq!(tree.digest(), SparseMerkleTree::empty_root(4).unwrap());
    }

    #[test]
    fn test_insert_and_path() {
        let mut tree = SparseMerkleTree::new(8).unwrap();

        let leaf = compress2(FieldElement::from(1), FieldElement::from(2));
        tree.insert(leaf).unwrap();

        let path = tree.path(&leaf).unwrap();
        assert!(path.verify(&tree.digest()));
    }
}
