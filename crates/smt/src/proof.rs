//! SMT authentication paths and verification

use serde::{Deserialize, Serialize};

use crate::{hasher::MimcSponge, FieldElement, LeafIndex};

/// One level of an authentication path
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathStep {
    /// Digest of the sibling node
    pub sibling: FieldElement,
    /// `true` if the sibling is the left child, i.e. the path node is a right child
    pub sibling_on_left: bool,
}

impl PathStep {
    /// Parent digest of this level given the path node's digest
    pub fn combine(&self, node: &FieldElement) -> FieldElement {
        if self.sibling_on_left {
            MimcSponge::compress2(&self.sibling, node)
        } else {
            MimcSponge::compress2(node, &self.sibling)
        }
    }
}

/// SMT membership proof
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerklePath {
    /// The leaf being proven
    pub leaf: FieldElement,
    /// Insertion position of the leaf
    pub index: LeafIndex,
    /// Siblings from the leaf level up to just below the root
    pub steps: Vec<PathStep>,
}

impl MerklePath {
    /// Number of levels covered, equal to the tree depth
    pub fn depth(&self) -> usize {
        self.steps.len()
    }

    /// Recompute the root implied by this path
    pub fn compute_root(&self) -> FieldElement {
        self.steps.iter().fold(self.leaf, |node, step| step.combine(&node))
    }

    /// Directions agree with the bits of `index`, lowest level first
    pub fn is_well_formed(&self) -> bool {
        let shifted = |level: usize| {
            u32::try_from(level)
                .ok()
                .and_then(|shift| self.index.checked_shr(shift))
                .unwrap_or(0)
        };
        if shifted(self.steps.len()) != 0 {
            return false;
        }
        self.steps
            .iter()
            .enumerate()
            .all(|(level, step)| step.sibling_on_left == (shifted(level) & 1 == 1))
    }

    /// Verify this proof against a root digest
    pub fn verify(&self, root: &FieldElement) -> bool {
        self.is_well_formed() && self.compute_root() == *root
    }
}
