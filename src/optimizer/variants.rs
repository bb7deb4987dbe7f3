use std::collections::HashSet;

use anyhow::Result;
use tracing::debug;

use crate::model::{Core, CoreKey, Gem, GemId, Params, SLOT_COUNT};
use crate::optimizer::{
    plan, window_for, ConstraintMap, PlanPack, PointWindow, RankedPlan,
};

/// Enumerates up to `top_k` alternative plans at a fixed total point level,
/// ranked by total flex score then total leftover budget.
///
/// This is not an exhaustive enumeration: the global optimizer is re-run
/// under constraint variations (each enabled core's minimum raised to one of
/// its grade breakpoints), results off the target total are discarded, and
/// the rest are deduplicated by their per-core gem assignments. Only the
/// output ordering and the `top_k` cap are guaranteed.
pub fn enumerate_top_plans_by_stats(
    cores: &[Core],
    params: &Params,
    inventory: &[Gem],
    constraints: &ConstraintMap,
    top_k: usize,
    target_total_pts: Option<i64>,
) -> Result<Vec<RankedPlan>> {
    let baseline = plan::optimize_all_by_permutations(cores, params, inventory, constraints)?;
    let target = target_total_pts.unwrap_or_else(|| baseline.total_pts());

    let mut candidates = vec![baseline];
    for core in cores.iter().filter(|core| core.enabled) {
        let window = window_for(core, constraints);
        for &bp in core.grade.breakpoints() {
            if bp <= window.min_pts || bp > window.max_pts {
                continue;
            }
            let mut varied = constraints.clone();
            varied.insert(
                core.key.clone(),
                PointWindow {
                    min_pts: bp,
                    max_pts: window.max_pts,
                },
            );
            let pack = plan::optimize_all_by_permutations(cores, params, inventory, &varied)?;
            candidates.push(pack);
        }
    }

    let mut seen: HashSet<Vec<(CoreKey, [Option<GemId>; SLOT_COUNT])>> = HashSet::new();
    let mut plans: Vec<PlanPack> = Vec::new();
    for pack in candidates {
        if pack.total_pts() != target {
            continue;
        }
        let assignment: Vec<_> = pack
            .items
            .iter()
            .map(|(key, item)| (key.clone(), item.ids))
            .collect();
        if seen.insert(assignment) {
            plans.push(pack);
        }
    }

    plans.sort_by(|a, b| {
        b.total_flex()
            .total_cmp(&a.total_flex())
            .then_with(|| b.total_remain().cmp(&a.total_remain()))
    });
    plans.truncate(top_k);

    debug!(count = plans.len(), target, "alternative plans enumerated");

    Ok(plans
        .into_iter()
        .map(|pack| RankedPlan {
            total_pts: pack.total_pts(),
            total_flex: pack.total_flex(),
            plan: pack,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CoreGrade, GemFamily, Role};
    use crate::testdata::fixtures;
    use std::collections::HashMap;

    fn competing_setup() -> (Vec<Core>, Params, Vec<Gem>) {
        // Two heroic cores compete for A+C (the only pair that reaches the
        // 10-pt breakpoint); whichever loses it falls back to a single gem.
        let cores = vec![
            fixtures::core("c1", GemFamily::Order, CoreGrade::Heroic, 0, 20),
            fixtures::core("c2", GemFamily::Order, CoreGrade::Heroic, 0, 20),
        ];
        let params = Params::new(Role::Dealer);
        let gems = vec![
            fixtures::stat_gem(1, GemFamily::Order, 4, 5, "attack", 5),
            fixtures::point_gem(2, GemFamily::Order, 5, 5),
            fixtures::point_gem(3, GemFamily::Order, 4, 5),
            fixtures::point_gem(4, GemFamily::Order, 5, 5),
        ];
        (cores, params, gems)
    }

    #[test]
    fn test_enumerates_distinct_assignments_at_same_total() {
        let (cores, params, gems) = competing_setup();

        let ranked =
            enumerate_top_plans_by_stats(&cores, &params, &gems, &HashMap::new(), 5, None)
                .unwrap();

        assert_eq!(ranked.len(), 2);
        for entry in &ranked {
            assert_eq!(entry.total_pts, 15);
            assert_eq!(entry.total_pts, entry.plan.total_pts());
        }
        // Same gems consumed overall, split differently across the cores.
        assert_ne!(ranked[0].plan.items, ranked[1].plan.items);
        assert_eq!(ranked[0].plan.used_ids, ranked[1].plan.used_ids);
    }

    #[test]
    fn test_ranking_is_flex_descending() {
        let (cores, params, gems) = competing_setup();

        let ranked =
            enumerate_top_plans_by_stats(&cores, &params, &gems, &HashMap::new(), 5, None)
                .unwrap();

        for pair in ranked.windows(2) {
            assert!(pair[0].total_flex >= pair[1].total_flex);
        }
    }

    #[test]
    fn test_top_k_caps_output() {
        let (cores, params, gems) = competing_setup();

        let ranked =
            enumerate_top_plans_by_stats(&cores, &params, &gems, &HashMap::new(), 1, None)
                .unwrap();
        assert_eq!(ranked.len(), 1);
    }

    #[test]
    fn test_unreachable_target_yields_no_plans() {
        let (cores, params, gems) = competing_setup();

        let ranked =
            enumerate_top_plans_by_stats(&cores, &params, &gems, &HashMap::new(), 5, Some(999))
                .unwrap();
        assert!(ranked.is_empty());
    }
}
