//! Point queries (with and without an excluded line).

use super::{LiChaoTree, LineId};

impl LiChaoTree {
    /// Maximum at `x` over all inserted lines except the one tagged `excluded`.
    ///
    /// Slots along the root→x path contribute their best line; a slot whose
    /// best is `excluded` contributes its second-best snapshots instead.
    /// Walking off the array contributes 0. Single-point (leaf) slots follow
    /// the same rule, so the excluded line is never reported even at a leaf.
    pub fn query(&self, x: i64, excluded: LineId) -> i64 {
        self.walk(x, Some(excluded))
    }

    /// Maximum at `x` over all inserted lines.
    pub fn query_all(&self, x: i64) -> i64 {
        self.walk(x, None)
    }

    fn walk(&self, x: i64, excluded: Option<LineId>) -> i64 {
        let mut range = self.domain;
        let mut slot = 0;
        let mut acc: Option<i64> = None;
        let tail = loop {
            let Some(node) = self.nodes.get(slot) else {
                break 0;
            };
            let own = node.contribution(x, excluded);
            if range.is_point() {
                break own;
            }
            acc = Some(acc.map_or(own, |a| a.max(own)));
            // Descend on x's side with that child's own range.
            let mid = range.mid();
            if x < mid {
                range = range.left(mid);
                slot = Self::left_child(slot);
            } else {
                range = range.right(mid);
                slot = Self::right_child(slot);
            }
        };
        acc.map_or(tail, |a| a.max(tail))
    }
}
