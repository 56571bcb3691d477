//! Sparse Merkle Tree implementation

use std::collections::HashMap;

use tracing::trace;

use crate::{
    empty_leaf, hasher::MimcSponge, FieldElement, LeafIndex, MerklePath, PathStep, SmtError,
    MAX_DEPTH,
};

/// Append-only Sparse Merkle Tree of fixed depth
///
/// Leaves are placed left to right in insertion order. Level 0 holds the
/// leaves and level `depth` the root. Nodes that were never written are
/// read from the per-level empty subtree digests.
#[derive(Clone, Debug)]
pub struct SparseMerkleTree {
    /// Number of non-root levels
    depth: u32,
    /// Number of inserted leaves
    len: LeafIndex,
    /// Materialized nodes: (level, index) -> digest
    nodes: HashMap<(u32, LeafIndex), FieldElement>,
    /// Digest of an empty subtree rooted at each level, `depth + 1` entries
    empty: Vec<FieldElement>,
    /// Leaf value -> first position it was inserted at
    positions: HashMap<FieldElement, LeafIndex>,
    /// Accept a value that is already in the tree
    allow_duplicates: bool,
    /// Root digest after the last insertion
    root: FieldElement,
}

impl SparseMerkleTree {
    /// Create a new empty SMT with `depth` non-root levels
    pub fn new(depth: u32) -> Result<Self, SmtError> {
        let empty = Self::empty_digests(depth)?;
        let root = empty[depth as usize];
        Ok(Self {
            depth,
            len: 0,
            nodes: HashMap::new(),
            empty,
            positions: HashMap::new(),
            allow_duplicates: false,
            root,
        })
    }

    /// Accept repeated leaf values; paths then resolve to the first position
    pub fn allow_duplicate_leaves(mut self) -> Self {
        self.allow_duplicates = true;
        self
    }

    /// Root digest of an empty tree of the given depth
    pub fn empty_root(depth: u32) -> Result<FieldElement, SmtError> {
        Ok(Self::empty_digests(depth)?[depth as usize])
    }

    /// Get the root digest
    pub fn digest(&self) -> FieldElement {
        self.root
    }

    /// Number of non-root levels
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Number of inserted leaves
    pub fn len(&self) -> LeafIndex {
        self.len
    }

    /// Whether nothing was inserted yet
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of leaf positions, `2^depth`
    pub fn capacity(&self) -> LeafIndex {
        1 << self.depth
    }

    /// Append a leaf at the next free position
    pub fn insert(&mut self, leaf: FieldElement) -> Result<LeafIndex, SmtError> {
        if self.len >= self.capacity() {
            return Err(SmtError::CapacityExceeded { depth: self.depth, capacity: self.capacity() });
        }
        if !self.allow_duplicates {
            if let Some(&index) = self.positions.get(&leaf) {
                return Err(SmtError::DuplicateLeaf { leaf, index });
            }
        }
        let index = self.len;
        let mut position = index;
        let mut node = leaf;
        self.nodes.insert((0, position), node);

        // Propagate the new leaf up to the root
        for level in 0..self.depth {
            let sibling = self.node(level, position ^ 1);
            node = if position & 1 == 1 {
                MimcSponge::compress2(&sibling, &node)
            } else {
                MimcSponge::compress2(&node, &sibling)
            };
            position >>= 1;
            self.nodes.insert((level + 1, position), node);
        }

        self.root = node;
        self.positions.entry(leaf).or_insert(index);
        self.len += 1;
        trace!(%leaf, index, root = %self.root, "inserted leaf");
        Ok(index)
    }

    /// Insert several leaves in order, stopping at the first failure
    pub fn batch_insert<I>(&mut self, leaves: I) -> Result<Vec<LeafIndex>, SmtError>
    where
        I: IntoIterator<Item = FieldElement>,
    {
        leaves.into_iter().map(|leaf| self.insert(leaf)).collect()
    }

    /// Position at which `leaf` was first inserted
    pub fn position(&self, leaf: &FieldElement) -> Option<LeafIndex> {
        self.positions.get(leaf).copied()
    }

    /// Leaf stored at `index`, if occupied
    pub fn leaf(&self, index: LeafIndex) -> Option<FieldElement> {
        (index < self.len).then(|| self.node(0, index))
    }

    /// Inserted leaves in position order
    pub fn leaves(&self) -> impl Iterator<Item = FieldElement> + '_ {
        (0..self.len).map(move |index| self.node(0, index))
    }

    /// Authentication path for a previously inserted leaf value
    pub fn path(&self, leaf: &FieldElement) -> Result<MerklePath, SmtError> {
        let index = self.position(leaf).ok_or(SmtError::LeafNotFound(*leaf))?;
        self.path_at(index)
    }

    /// Authentication path for the leaf at `index`
    pub fn path_at(&self, index: LeafIndex) -> Result<MerklePath, SmtError> {
        if index >= self.len {
            return Err(SmtError::IndexOutOfRange { index, len: self.len });
        }

        let steps = (0..self.depth)
            .map(|level| {
                let position = index >> level;
                PathStep {
                    sibling: self.node(level, position ^ 1),
                    sibling_on_left: position & 1 == 1,
                }
            })
            .collect();

        Ok(MerklePath { leaf: self.node(0, index), index, steps })
    }

    /// Get node digest at a level and index, falling back to the empty digest
    fn node(&self, level: u32, index: LeafIndex) -> FieldElement {
        self.nodes
            .get(&(level, index))
            .copied()
            .unwrap_or(self.empty[level as usize])
    }

    /// Empty subtree digests for levels `0..=depth`
    fn empty_digests(depth: u32) -> Result<Vec<FieldElement>, SmtError> {
        if depth > MAX_DEPTH {
            return Err(SmtError::InvalidDepth { depth, max: MAX_DEPTH });
        }
        let mut empty = Vec::with_capacity(depth as usize + 1);
        empty.push(empty_leaf());
        for level in 0..depth as usize {
            let below = empty[level];
            empty.push(MimcSponge::compress2(&below, &below));
        }
        Ok(empty)
    }
}
