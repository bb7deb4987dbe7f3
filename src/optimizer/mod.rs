pub mod activation;
pub mod core_search;
pub mod plan;
pub mod sequence;
pub mod variants;

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::model::{Core, CoreKey, GemId, SLOT_COUNT};

pub use core_search::optimize_for_core;
pub use plan::optimize_all_by_permutations;
pub use sequence::optimize_extreme_by_sequence;
pub use variants::enumerate_top_plans_by_stats;

/// Activation outcome for one core given an ordered slot assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivationResult {
    pub activated: [bool; SLOT_COUNT],
    pub spent: i64,
    pub remain: i64,
    pub pts: i64,
    pub flex_score: f64,
    /// Raw per-stat level tally over activated gems, for display.
    pub stat_totals: BTreeMap<String, i64>,
}

/// One core's chosen result within a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizeItem {
    /// Chosen gem ids in slot order; unfilled slots are None.
    pub ids: [Option<GemId>; SLOT_COUNT],
    pub res: Option<ActivationResult>,
    pub threshold: i64,
    /// Advisory: whether the next breakpoint still looks reachable with the
    /// leftover budget and pool. Never an error.
    pub can_reach_next: bool,
    /// Set when the user's point window could not be met; the item still
    /// carries the best result found.
    pub reason: Option<String>,
}

impl OptimizeItem {
    pub fn empty(reason: &str) -> Self {
        Self {
            ids: [None; SLOT_COUNT],
            res: None,
            threshold: 0,
            can_reach_next: false,
            reason: Some(reason.to_string()),
        }
    }

    pub fn pts(&self) -> i64 {
        self.res.as_ref().map(|r| r.pts).unwrap_or(0)
    }

    pub fn flex_score(&self) -> f64 {
        self.res.as_ref().map(|r| r.flex_score).unwrap_or(0.0)
    }

    pub fn remain(&self) -> i64 {
        self.res.as_ref().map(|r| r.remain).unwrap_or(0)
    }

    pub fn chosen_ids(&self) -> impl Iterator<Item = GemId> + '_ {
        self.ids.iter().flatten().copied()
    }
}

/// Complete cross-core assignment produced by one optimization run.
/// Treated as an immutable read-only result by callers.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlanPack {
    pub items: BTreeMap<CoreKey, OptimizeItem>,
    /// All gem ids consumed across the plan.
    pub used_ids: BTreeSet<GemId>,
}

impl PlanPack {
    pub fn insert(&mut self, key: CoreKey, item: OptimizeItem) {
        self.used_ids.extend(item.chosen_ids());
        self.items.insert(key, item);
    }

    pub fn total_pts(&self) -> i64 {
        self.items.values().map(|item| item.pts()).sum()
    }

    pub fn total_threshold(&self) -> i64 {
        self.items.values().map(|item| item.threshold).sum()
    }

    pub fn total_flex(&self) -> f64 {
        self.items.values().map(|item| item.flex_score()).sum()
    }

    pub fn total_remain(&self) -> i64 {
        self.items.values().map(|item| item.remain()).sum()
    }
}

/// Per-core override of the user's point window; cores absent from the map
/// keep the window configured on the core itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointWindow {
    pub min_pts: i64,
    pub max_pts: i64,
}

pub type ConstraintMap = HashMap<CoreKey, PointWindow>;

pub(crate) fn window_for(core: &Core, constraints: &ConstraintMap) -> PointWindow {
    constraints.get(&core.key).copied().unwrap_or(PointWindow {
        min_pts: core.min_pts,
        max_pts: core.max_pts,
    })
}

/// An alternative plan tagged with its aggregates, as returned by the
/// multi-plan enumerator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedPlan {
    pub plan: PlanPack,
    pub total_pts: i64,
    pub total_flex: f64,
}

/// Result of the sequence-biased optimizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceOutcome {
    pub plan: PlanPack,
    pub focus_key: CoreKey,
}
