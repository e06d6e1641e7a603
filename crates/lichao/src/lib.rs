//! Exclusion-aware Li-Chao tree and the entity scoring built on it.
//!
//! - `tree`: fixed-capacity Li-Chao tree whose point queries can ignore one
//!   line, falling back to per-slot second-best snapshots.
//! - `score`: validated instances, per-entity scores, and a brute-force
//!   reference.
//! - `gen`: reproducible random instances (seed + index replay tokens).
//!
//! API Policy
//! - There is no stable public API; `api` is a curated re-export surface for
//!   the CLI and benches.

pub mod api;
pub mod gen;
pub mod score;
pub mod tree;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use tree::{Domain, LiChaoTree, Line, LineId, Node};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::gen::{draw_instance, GenCfg, ReplayToken};
    pub use crate::score::{best_score, entity_scores, Capacity, Instance, ScoreCfg};
    pub use crate::tree::{Domain, LiChaoTree, Line, LineId};
}
