//! Curated internal API (UNSTABLE).
//!
//! Convenience surface for the CLI, benches and examples. Breaking changes are
//! allowed.

// Tree core
pub use crate::tree::{Domain, LiChaoTree, Line, LineId, Node};
// Scoring
pub use crate::score::{
    best_score, brute_force_best_score, brute_force_scores, build_tree, entity_scores, Capacity,
    Instance, ScoreCfg, ScoreError, DEFAULT_MAX_SLOTS,
};
// Random instances
pub use crate::gen::{draw_instance, GenCfg, GenError, ReplayToken};
