//! Value types for the exclusion-aware Li-Chao tree.
//!
//! - `Line`: `y = m·x + b` tagged with the id of the element that produced it.
//! - `Node`: one flat-array slot (best line plus the two child fallbacks).
//! - `Domain`: half-open integer range `[lo, hi)` with floor midpoints.

/// Identifier of the input element a line belongs to.
///
/// Sentinel (zero) lines carry the slot position they were created for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineId(pub usize);

/// Line `y = m·x + b`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Line {
    pub m: i64,
    pub b: i64,
    pub id: LineId,
}

impl Line {
    #[inline]
    pub fn new(m: i64, b: i64, id: LineId) -> Self {
        Self { m, b, id }
    }

    /// The "absent" sentinel `0·x + 0`.
    #[inline]
    pub fn zero(id: LineId) -> Self {
        Self { m: 0, b: 0, id }
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.m == 0 && self.b == 0
    }

    #[inline]
    pub fn eval(&self, x: i64) -> i64 {
        self.m * x + self.b
    }
}

/// One tree slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Node {
    pub best: Line,
    pub second_best_left: Line,
    pub second_best_right: Line,
}

impl Node {
    /// Slot `slot` before any insertion: every line is the zero sentinel.
    #[inline]
    pub(crate) fn empty(slot: usize) -> Self {
        let zero = Line::zero(LineId(slot));
        Self {
            best: zero,
            second_best_left: zero,
            second_best_right: zero,
        }
    }

    /// Value this node adds to a query at `x`.
    ///
    /// When `best` belongs to the excluded element, the children's bests
    /// (captured by `finalize_second_best`) stand in for it.
    #[inline]
    pub fn contribution(&self, x: i64, excluded: Option<LineId>) -> i64 {
        if excluded == Some(self.best.id) {
            self.second_best_left
                .eval(x)
                .max(self.second_best_right.eval(x))
        } else {
            self.best.eval(x)
        }
    }
}

/// Half-open integer interval `[lo, hi)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Domain {
    pub lo: i64,
    pub hi: i64,
}

impl Domain {
    #[inline]
    pub fn new(lo: i64, hi: i64) -> Self {
        Self { lo, hi }
    }

    /// `[min(xs), max(xs))`, or `None` for an empty slice.
    pub fn spanning(xs: &[i64]) -> Option<Self> {
        let lo = *xs.iter().min()?;
        let hi = *xs.iter().max()?;
        Some(Self { lo, hi })
    }

    #[inline]
    pub fn is_point(&self) -> bool {
        self.lo + 1 == self.hi
    }

    /// Floor of `(lo + hi) / 2`, also for negative bounds.
    #[inline]
    pub fn mid(&self) -> i64 {
        (self.lo + self.hi).div_euclid(2)
    }

    #[inline]
    pub fn left(&self, mid: i64) -> Self {
        Self { lo: self.lo, hi: mid }
    }

    #[inline]
    pub fn right(&self, mid: i64) -> Self {
        Self { lo: mid, hi: self.hi }
    }

    /// Number of integer points covered (0 for a degenerate `lo >= hi`).
    #[inline]
    pub fn width(&self) -> u64 {
        self.hi.saturating_sub(self.lo).max(0) as u64
    }

    #[inline]
    pub fn contains(&self, x: i64) -> bool {
        self.lo <= x && x < self.hi
    }
}
