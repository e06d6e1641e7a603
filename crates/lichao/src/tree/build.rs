//! Insertion and the second-best annotation pass.

use super::{LiChaoTree, Line, LineId};

impl LiChaoTree {
    /// Insert `line` starting at the root.
    ///
    /// The zero line is ignored. A line that would descend past the last slot
    /// is dropped.
    pub fn insert(&mut self, line: Line) {
        let mut line = line;
        let mut range = self.domain;
        let mut slot = 0;
        loop {
            if line.is_zero() {
                return;
            }
            let Some(node) = self.nodes.get_mut(slot) else {
                return;
            };
            let best = &mut node.best;

            if range.is_point() {
                // Ties keep the incumbent.
                if line.eval(range.lo) > best.eval(range.lo) {
                    *best = line;
                }
                return;
            }

            let mid = range.mid();
            // Node keeps the smaller slope, the candidate the larger one.
            if best.m > line.m {
                std::mem::swap(best, &mut line);
            }
            if best.eval(mid) < line.eval(mid) {
                // Larger slope wins at mid, hence on [mid, hi). The displaced
                // smaller-slope line can only still win on the left.
                std::mem::swap(best, &mut line);
                range = range.left(mid);
                slot = Self::left_child(slot);
            } else {
                range = range.right(mid);
                slot = Self::right_child(slot);
            }
        }
    }

    /// Insert every line from `lines` in order.
    pub fn insert_all<I: IntoIterator<Item = Line>>(&mut self, lines: I) {
        for line in lines {
            self.insert(line);
        }
    }

    /// Snapshot each slot's child bests into `second_best_left/right`.
    ///
    /// Missing children yield the zero line. Depends only on the current
    /// `best` values, so repeated calls give the same annotation.
    pub fn finalize_second_best(&mut self) {
        let n = self.nodes.len();
        for slot in 0..n {
            let left = Self::left_child(slot);
            let right = Self::right_child(slot);
            let zero = Line::zero(LineId(slot));
            let second_left = if left < n { self.nodes[left].best } else { zero };
            let second_right = if right < n { self.nodes[right].best } else { zero };
            let node = &mut self.nodes[slot];
            node.second_best_left = second_left;
            node.second_best_right = second_right;
        }
    }
}
