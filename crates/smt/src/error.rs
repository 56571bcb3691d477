//! SMT errors

use thiserror::Error;

use crate::{FieldElement, LeafIndex};

/// Errors returned by [`crate::SparseMerkleTree`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SmtError {
    /// Requested depth is larger than the tree supports
    #[error("tree depth {depth} exceeds the maximum of {max}")]
    InvalidDepth {
        /// Requested depth
        depth: u32,
        /// Largest supported depth
        max: u32,
    },
    /// Every leaf position is taken
    #[error("tree of depth {depth} is full ({capacity} leaves)")]
    CapacityExceeded {
        /// Tree depth
        depth: u32,
        /// Number of leaf positions, `2^depth`
        capacity: LeafIndex,
    },
    /// No insertion produced this value
    #[error("leaf {0} was never inserted")]
    LeafNotFound(FieldElement),
    /// Leaf position outside the occupied range
    #[error("leaf index {index} is not occupied (tree holds {len} leaves)")]
    IndexOutOfRange {
        /// Requested position
        index: LeafIndex,
        /// Current leaf count
        len: LeafIndex,
    },
    /// Value already present at another position
    #[error("leaf {leaf} is already stored at index {index}")]
    DuplicateLeaf {
        /// The repeated value
        leaf: FieldElement,
        /// Position of the first insertion
        index: LeafIndex,
    },
}
