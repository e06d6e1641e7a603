//! Li-Chao tree with per-query exclusion of one line.
//!
//! Purpose
//! - Maintain a batch of lines over an integer domain and answer
//!   "max over all lines at x, except the line owned by element i".
//! - Workflow is fixed: `insert` everything, `finalize_second_best` once, then
//!   issue read-only `query` calls.
//!
//! Layout
//! - Complete binary tree stored flat; children of slot `i` live at `2i+1` and
//!   `2i+2`. The slot count is chosen up front and never grows. Lines pushed
//!   past the last slot are dropped, so with a small capacity the structure
//!   is an approximation (see `score::Capacity`).
//! - Each slot keeps its best line plus the bests of its two children,
//!   snapshotted after all insertions. A query whose excluded line sits in a
//!   slot falls back to those two snapshots for that slot.
//!
//! Code cross-refs: `score::build_tree`, `score::entity_scores`.

mod build;
mod query;
mod types;

pub use types::{Domain, Line, LineId, Node};

/// Fixed-capacity exclusion-aware Li-Chao tree.
#[derive(Clone, Debug)]
pub struct LiChaoTree {
    nodes: Vec<Node>,
    domain: Domain,
}

impl LiChaoTree {
    /// Allocate `capacity` empty slots over `domain`.
    pub fn new(capacity: usize, domain: Domain) -> Self {
        Self {
            nodes: (0..capacity).map(Node::empty).collect(),
            domain,
        }
    }

    /// One slot per height, domain `[min(heights), max(heights))`.
    ///
    /// Returns `None` for an empty slice.
    pub fn for_heights(heights: &[i64]) -> Option<Self> {
        let domain = Domain::spanning(heights)?;
        Some(Self::new(heights.len(), domain))
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn domain(&self) -> Domain {
        self.domain
    }

    #[inline]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    #[inline]
    pub fn node(&self, slot: usize) -> Option<&Node> {
        self.nodes.get(slot)
    }

    #[inline]
    fn left_child(slot: usize) -> usize {
        2 * slot + 1
    }

    #[inline]
    fn right_child(slot: usize) -> usize {
        2 * slot + 2
    }
}
