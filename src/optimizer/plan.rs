use std::cmp::Ordering;

use anyhow::Result;
use tracing::debug;

use crate::model::{validate_input, Core, Gem, Params};
use crate::optimizer::{core_search, window_for, ConstraintMap, PlanPack};

/// Optimizes every enabled core over a shared gem inventory.
///
/// The per-core search greedily consumes gems from the shared pool, so the
/// order cores are processed in changes the final plan. Every permutation of
/// the enabled core list is tried (factorial cost, fine for the game's small
/// fixed core count) and the best full plan wins. Ties keep the first
/// permutation found, which makes the result deterministic.
pub fn optimize_all_by_permutations(
    cores: &[Core],
    params: &Params,
    inventory: &[Gem],
    constraints: &ConstraintMap,
) -> Result<PlanPack> {
    validate_input(cores, inventory)?;

    let enabled: Vec<&Core> = cores.iter().filter(|core| core.enabled).collect();
    if enabled.is_empty() {
        return Ok(PlanPack::default());
    }

    let mut best: Option<PlanPack> = None;

    for_each_permutation(enabled.len(), &mut |order| {
        let pack = run_order(&enabled, order, params, inventory, constraints);
        debug!(
            order = ?order,
            thresholds = pack.total_threshold(),
            flex = pack.total_flex(),
            "permutation evaluated"
        );
        match &best {
            Some(current) if !plan_better(&pack, current, &enabled, constraints) => {}
            _ => best = Some(pack),
        }
    });

    // enabled is non-empty, so at least one permutation ran
    Ok(best.unwrap_or_default())
}

/// Processes cores in the given order, feeding each the gems the previous
/// cores left unused.
fn run_order(
    enabled: &[&Core],
    order: &[usize],
    params: &Params,
    inventory: &[Gem],
    constraints: &ConstraintMap,
) -> PlanPack {
    let mut pack = PlanPack::default();
    for &idx in order {
        let core = enabled[idx];
        let window = window_for(core, constraints);
        let pool: Vec<&Gem> = inventory
            .iter()
            .filter(|gem| !pack.used_ids.contains(&gem.id))
            .collect();
        let item = core_search::optimize_for_core(
            core,
            params,
            &pool,
            window.min_pts,
            window.max_pts,
        );
        pack.insert(core.key.clone(), item);
    }
    pack
}

/// Strict lexicographic plan comparison: satisfying every core's point window
/// outranks everything, then summed thresholds, flex score, and leftover
/// budget.
fn plan_better(a: &PlanPack, b: &PlanPack, enabled: &[&Core], constraints: &ConstraintMap) -> bool {
    let a_ok = all_within(a, enabled, constraints);
    let b_ok = all_within(b, enabled, constraints);
    if a_ok != b_ok {
        return a_ok;
    }
    if a.total_threshold() != b.total_threshold() {
        return a.total_threshold() > b.total_threshold();
    }
    match a.total_flex().total_cmp(&b.total_flex()) {
        Ordering::Greater => return true,
        Ordering::Less => return false,
        Ordering::Equal => {}
    }
    a.total_remain() > b.total_remain()
}

fn all_within(pack: &PlanPack, enabled: &[&Core], constraints: &ConstraintMap) -> bool {
    enabled.iter().all(|core| {
        let window = window_for(core, constraints);
        let pts = pack
            .items
            .get(&core.key)
            .map(|item| item.pts())
            .unwrap_or(0);
        pts >= window.min_pts && pts <= window.max_pts
    })
}

/// Visits every permutation of 0..n in lexicographic order.
fn for_each_permutation(n: usize, visit: &mut dyn FnMut(&[usize])) {
    fn recurse(
        n: usize,
        order: &mut Vec<usize>,
        used: &mut [bool],
        visit: &mut dyn FnMut(&[usize]),
    ) {
        if order.len() == n {
            visit(order);
            return;
        }
        for idx in 0..n {
            if used[idx] {
                continue;
            }
            used[idx] = true;
            order.push(idx);
            recurse(n, order, used, visit);
            order.pop();
            used[idx] = false;
        }
    }

    let mut order = Vec::with_capacity(n);
    let mut used = vec![false; n];
    recurse(n, &mut order, &mut used, visit);
}
