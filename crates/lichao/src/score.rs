//! Entity scoring on top of the exclusion-aware tree.
//!
//! Model
//! - Entity `j` has height `H[j]` and damage `D[j]` and owns the line
//!   `L_j(x) = D[j]·x + H[j]·D[j]`.
//! - Entity `i` scores `D[i]·H[i] + max_{j≠i} L_j(H[i])`; the answer is the
//!   best score divided by `B`.
//! - The tree answers the `max_{j≠i}` part with one exclusion query per entity.
//!   `brute_force_scores` evaluates the same formula directly in O(N²).

use std::fmt;

use crate::tree::{Domain, LiChaoTree, Line, LineId};

/// Errors surfaced while validating an instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScoreError {
    /// No entities at all.
    Empty,
    /// `heights` and `damages` disagree in length.
    LengthMismatch { heights: usize, damages: usize },
    /// Final division by `B = 0`.
    ZeroDivisor,
    /// `3·max|H|·max(max|D|, 1)` exceeds `i64::MAX`, so scores could overflow.
    Overflow { height_max: u64, damage_max: u64 },
    /// The chosen capacity needs more tree slots than `ScoreCfg::max_slots`.
    TooManySlots { slots: usize, limit: usize },
}

impl fmt::Display for ScoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreError::Empty => write!(f, "instance has no entities"),
            ScoreError::LengthMismatch { heights, damages } => write!(
                f,
                "heights ({heights}) and damages ({damages}) must have the same length"
            ),
            ScoreError::ZeroDivisor => write!(f, "divisor must be nonzero"),
            ScoreError::Overflow {
                height_max,
                damage_max,
            } => write!(
                f,
                "max |height| {height_max} and max |damage| {damage_max} overflow 64-bit scores"
            ),
            ScoreError::TooManySlots { slots, limit } => {
                write!(f, "tree would need {slots} slots (limit {limit})")
            }
        }
    }
}

impl std::error::Error for ScoreError {}

/// Whether every line value and score stays inside `i64`.
///
/// Line values at any x within `[min H, max H]` are bounded by `2·H·D` and
/// scores by `3·H·D`. `D` is clamped to 1 so the domain midpoint `lo + hi`
/// cannot overflow either.
pub(crate) fn scores_fit_i64(height_max: u64, damage_max: u64) -> bool {
    3 * (height_max as i128) * (damage_max.max(1) as i128) <= i64::MAX as i128
}

/// How many tree slots to allocate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Capacity {
    /// One slot per entity. Lines that descend further are dropped.
    #[default]
    PerLine,
    /// `4·width` slots (at least one per entity): no line is ever dropped.
    PerCoordinate,
}

impl Capacity {
    pub fn slots(&self, entities: usize, domain: Domain) -> usize {
        match self {
            Capacity::PerLine => entities,
            Capacity::PerCoordinate => {
                let by_width =
                    usize::try_from(domain.width().saturating_mul(4)).unwrap_or(usize::MAX);
                by_width.max(entities).max(1)
            }
        }
    }
}

/// Default upper bound on allocated tree slots.
pub const DEFAULT_MAX_SLOTS: usize = 50_000_000;

/// Scoring configuration.
#[derive(Clone, Copy, Debug)]
pub struct ScoreCfg {
    pub capacity: Capacity,
    /// Trees needing more slots than this are refused with `TooManySlots`.
    pub max_slots: usize,
}

impl Default for ScoreCfg {
    fn default() -> Self {
        Self {
            capacity: Capacity::default(),
            max_slots: DEFAULT_MAX_SLOTS,
        }
    }
}

impl ScoreCfg {
    /// Slot count for `inst` under this config, checked against `max_slots`.
    pub fn slots(&self, inst: &Instance) -> Result<usize, ScoreError> {
        let slots = self.capacity.slots(inst.len(), inst.domain());
        if slots > self.max_slots {
            return Err(ScoreError::TooManySlots {
                slots,
                limit: self.max_slots,
            });
        }
        Ok(slots)
    }
}

/// Validated scoring input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Instance {
    heights: Vec<i64>,
    damages: Vec<i64>,
    divisor: i64,
}

impl Instance {
    pub fn new(heights: Vec<i64>, damages: Vec<i64>, divisor: i64) -> Result<Self, ScoreError> {
        if heights.len() != damages.len() {
            return Err(ScoreError::LengthMismatch {
                heights: heights.len(),
                damages: damages.len(),
            });
        }
        if heights.is_empty() {
            return Err(ScoreError::Empty);
        }
        if divisor == 0 {
            return Err(ScoreError::ZeroDivisor);
        }
        let height_max = heights.iter().map(|h| h.unsigned_abs()).max().unwrap_or(0);
        let damage_max = damages.iter().map(|d| d.unsigned_abs()).max().unwrap_or(0);
        if !scores_fit_i64(height_max, damage_max) {
            return Err(ScoreError::Overflow {
                height_max,
                damage_max,
            });
        }
        Ok(Self {
            heights,
            damages,
            divisor,
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.heights.len()
    }

    /// Always false for a validated instance.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    pub fn heights(&self) -> &[i64] {
        &self.heights
    }

    pub fn damages(&self) -> &[i64] {
        &self.damages
    }

    pub fn divisor(&self) -> i64 {
        self.divisor
    }

    /// `[min(H), max(H))`.
    pub fn domain(&self) -> Domain {
        let lo = self.heights.iter().copied().min().unwrap_or(0);
        let hi = self.heights.iter().copied().max().unwrap_or(0);
        Domain::new(lo, hi)
    }

    /// Line owned by entity `j`.
    #[inline]
    pub fn line(&self, j: usize) -> Line {
        let (h, d) = (self.heights[j], self.damages[j]);
        Line::new(d, h * d, LineId(j))
    }

    pub fn lines(&self) -> impl Iterator<Item = Line> + '_ {
        (0..self.len()).map(|j| self.line(j))
    }

    #[inline]
    fn own_term(&self, i: usize) -> i64 {
        self.damages[i] * self.heights[i]
    }

    /// Final answer `max(scores) / B` (0 for an empty slice).
    pub fn best_of(&self, scores: &[i64]) -> f64 {
        let best = scores.iter().copied().max().unwrap_or(0);
        best as f64 / self.divisor as f64
    }
}

/// Build, fill and finalize a tree for `inst`.
pub fn build_tree(inst: &Instance, cfg: ScoreCfg) -> Result<LiChaoTree, ScoreError> {
    let mut tree = LiChaoTree::new(cfg.slots(inst)?, inst.domain());
    tree.insert_all(inst.lines());
    tree.finalize_second_best();
    Ok(tree)
}

/// Per-entity scores `D[i]·H[i] + query(H[i], i)`.
pub fn entity_scores(inst: &Instance, cfg: ScoreCfg) -> Result<Vec<i64>, ScoreError> {
    let tree = build_tree(inst, cfg)?;
    Ok((0..inst.len())
        .map(|i| inst.own_term(i) + tree.query(inst.heights[i], LineId(i)))
        .collect())
}

/// `max(entity_scores) / B`.
pub fn best_score(inst: &Instance, cfg: ScoreCfg) -> Result<f64, ScoreError> {
    Ok(inst.best_of(&entity_scores(inst, cfg)?))
}

/// Reference scores by direct evaluation of every other line.
pub fn brute_force_scores(inst: &Instance) -> Vec<i64> {
    (0..inst.len())
        .map(|i| {
            let x = inst.heights[i];
            let others = inst
                .lines()
                .filter(|line| line.id != LineId(i))
                .map(|line| line.eval(x))
                .max()
                .unwrap_or(0);
            inst.own_term(i) + others
        })
        .collect()
}

/// `max(brute_force_scores) / B`.
pub fn brute_force_best_score(inst: &Instance) -> f64 {
    inst.best_of(&brute_force_scores(inst))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario() -> Instance {
        Instance::new(vec![1, 2, 3], vec![10, 20, 5], 2).unwrap()
    }

    fn per_coordinate() -> ScoreCfg {
        ScoreCfg {
            capacity: Capacity::PerCoordinate,
            ..ScoreCfg::default()
        }
    }

    #[test]
    fn scenario_scores_match_hand_computation() {
        let inst = scenario();
        assert_eq!(
            entity_scores(&inst, ScoreCfg::default()).unwrap(),
            vec![70, 70, 115]
        );
        assert_eq!(brute_force_scores(&inst), vec![70, 70, 115]);
        assert!((best_score(&inst, ScoreCfg::default()).unwrap() - 57.5).abs() < 1e-12);
        assert!((inst.best_of(&[70, 70, 115]) - 57.5).abs() < 1e-12);
    }

    #[test]
    fn scenario_per_coordinate_capacity_agrees() {
        let inst = scenario();
        assert_eq!(
            entity_scores(&inst, per_coordinate()).unwrap(),
            vec![70, 70, 115]
        );
    }

    #[test]
    fn single_entity_sees_no_other_line() {
        let inst = Instance::new(vec![5], vec![3], 1).unwrap();
        assert_eq!(entity_scores(&inst, ScoreCfg::default()).unwrap(), vec![15]);
        assert_eq!(brute_force_scores(&inst), vec![15]);
        assert!((best_score(&inst, ScoreCfg::default()).unwrap() - 15.0).abs() < 1e-12);
    }

    #[test]
    fn validation_rejects_bad_shapes() {
        assert_eq!(Instance::new(vec![], vec![], 1), Err(ScoreError::Empty));
        assert_eq!(
            Instance::new(vec![1, 2], vec![1], 1),
            Err(ScoreError::LengthMismatch {
                heights: 2,
                damages: 1
            })
        );
        assert_eq!(
            Instance::new(vec![1], vec![1], 0),
            Err(ScoreError::ZeroDivisor)
        );
    }

    #[test]
    fn scores_at_the_overflow_bound_are_exact() {
        // 3·H·1 == i64::MAX - 1: the largest accepted height for unit damage.
        let h = i64::MAX / 3;
        let inst = Instance::new(vec![1, h], vec![1, 1], 1).unwrap();
        let expected = vec![h + 2, 2 * h + 1];
        assert_eq!(brute_force_scores(&inst), expected);
        assert_eq!(entity_scores(&inst, ScoreCfg::default()).unwrap(), expected);
    }

    #[test]
    fn scores_past_the_overflow_bound_are_rejected() {
        let h = i64::MAX / 3 + 1;
        assert_eq!(
            Instance::new(vec![1, h], vec![1, 1], 1),
            Err(ScoreError::Overflow {
                height_max: h as u64,
                damage_max: 1
            })
        );
        assert!(matches!(
            Instance::new(vec![1, 4_000_000_000], vec![4_000_000_000, 1], 1),
            Err(ScoreError::Overflow { .. })
        ));
        // Magnitude counts, not sign.
        assert!(matches!(
            Instance::new(vec![i64::MIN, 0], vec![1, 1], 1),
            Err(ScoreError::Overflow { .. })
        ));
        // All-zero damages still bound heights (the midpoint sums two of them).
        assert!(matches!(
            Instance::new(vec![0, i64::MAX], vec![0, 0], 1),
            Err(ScoreError::Overflow { .. })
        ));
    }

    #[test]
    fn slot_budget_is_checked_before_allocation() {
        let inst = Instance::new(vec![0, 1_000_000_000_000], vec![1, 1], 1).unwrap();
        assert!(matches!(
            build_tree(&inst, per_coordinate()),
            Err(ScoreError::TooManySlots {
                slots: 4_000_000_000_000,
                limit: DEFAULT_MAX_SLOTS
            })
        ));
        assert!(entity_scores(&inst, per_coordinate()).is_err());
        // One slot per entity stays within budget on the same instance.
        assert_eq!(build_tree(&inst, ScoreCfg::default()).unwrap().capacity(), 2);

        let tight = ScoreCfg {
            max_slots: 1,
            ..ScoreCfg::default()
        };
        assert_eq!(
            tight.slots(&scenario()),
            Err(ScoreError::TooManySlots { slots: 3, limit: 1 })
        );
    }

    #[test]
    fn lines_follow_height_and_damage() {
        let inst = scenario();
        let lines: Vec<Line> = inst.lines().collect();
        assert_eq!(lines[1], Line::new(20, 40, LineId(1)));
        assert_eq!(inst.domain(), Domain::new(1, 3));
    }

    #[test]
    fn capacity_slots() {
        let d = Domain::new(10, 20);
        assert_eq!(Capacity::PerLine.slots(3, d), 3);
        assert_eq!(Capacity::PerCoordinate.slots(3, d), 40);
        assert_eq!(Capacity::PerCoordinate.slots(3, Domain::new(7, 7)), 3);
    }

    #[test]
    fn error_messages_are_readable() {
        let msg = ScoreError::LengthMismatch {
            heights: 3,
            damages: 2,
        }
        .to_string();
        assert!(msg.contains("same length"));
        let msg = ScoreError::TooManySlots { slots: 8, limit: 4 }.to_string();
        assert!(msg.contains("8 slots"));
    }
}
