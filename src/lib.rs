//! Core and gem loadout optimizer.
//!
//! Given a gem inventory and a set of cores with point-window constraints,
//! computes which gems go into which core slots, in which order, to maximize
//! a layered objective (achieved point thresholds, then role-weighted stat
//! score, then leftover budget). Pure synchronous computation over in-memory
//! inputs; the surrounding app supplies the configuration and renders the
//! returned plans.

pub mod model;
pub mod optimizer;
pub mod weights;

#[cfg(test)]
pub mod testdata;

pub use model::{
    validate_input, Core, CoreGrade, CoreKey, Gem, GemFamily, GemId, GemOption, GemSubtype,
    Params, Role,
};
pub use optimizer::{
    enumerate_top_plans_by_stats, optimize_all_by_permutations, optimize_extreme_by_sequence,
    optimize_for_core, ActivationResult, ConstraintMap, OptimizeItem, PlanPack, PointWindow,
    RankedPlan, SequenceOutcome,
};
pub use weights::WeightTable;
