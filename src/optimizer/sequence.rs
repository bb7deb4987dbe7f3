use anyhow::{bail, Result};
use tracing::debug;

use crate::model::{validate_input, Core, CoreKey, Gem, Params};
use crate::optimizer::{
    core_search, window_for, ConstraintMap, OptimizeItem, PlanPack, SequenceOutcome,
};

/// Optimizes with a priority sequence: the first key is the "focus" core and
/// gets first pick of the inventory, aiming for the highest breakpoint it can
/// actually reach. The remaining sequence cores follow in order, then any
/// enabled cores not in the sequence, each optimizing over whatever gems are
/// still unused.
pub fn optimize_extreme_by_sequence(
    seq_keys: &[CoreKey],
    cores: &[Core],
    params: &Params,
    inventory: &[Gem],
    constraints: &ConstraintMap,
) -> Result<SequenceOutcome> {
    validate_input(cores, inventory)?;

    let focus_key = match seq_keys.first() {
        Some(key) => key.clone(),
        None => bail!("sequence is empty"),
    };
    for key in seq_keys {
        if !cores.iter().any(|core| core.key == *key) {
            bail!("unknown core key in sequence: {}", key);
        }
    }
    let focus = cores
        .iter()
        .find(|core| core.key == focus_key && core.enabled);
    let focus = match focus {
        Some(core) => core,
        None => bail!("focus core {} is disabled", focus_key),
    };

    let mut pack = PlanPack::default();

    // Focus phase: walk the grade's breakpoints from highest to lowest with
    // the minimum pinned to the breakpoint, and keep the first one achieved.
    let window = window_for(focus, constraints);
    let mut focus_item: Option<OptimizeItem> = None;
    for &bp in focus.grade.breakpoints().iter().rev() {
        if bp > window.max_pts {
            continue;
        }
        let item = optimize_unused(focus, params, inventory, &pack, bp, window.max_pts);
        if item.reason.is_none() {
            debug!(core = %focus.key, breakpoint = bp, "focus core pinned");
            focus_item = Some(item);
            break;
        }
    }
    // No breakpoint was reachable; fall back to the user's own window.
    let focus_item = focus_item.unwrap_or_else(|| {
        optimize_unused(
            focus,
            params,
            inventory,
            &pack,
            window.min_pts,
            window.max_pts,
        )
    });
    pack.insert(focus.key.clone(), focus_item);

    // Remaining sequence cores in priority order, original constraints.
    for key in seq_keys.iter().skip(1) {
        let core = match cores.iter().find(|core| core.key == *key && core.enabled) {
            Some(core) => core,
            None => continue,
        };
        let window = window_for(core, constraints);
        let item = optimize_unused(core, params, inventory, &pack, window.min_pts, window.max_pts);
        pack.insert(core.key.clone(), item);
    }

    // Everything else, in input order.
    for core in cores.iter().filter(|core| core.enabled) {
        if seq_keys.contains(&core.key) {
            continue;
        }
        let window = window_for(core, constraints);
        let item = optimize_unused(core, params, inventory, &pack, window.min_pts, window.max_pts);
        pack.insert(core.key.clone(), item);
    }

    Ok(SequenceOutcome {
        plan: pack,
        focus_key,
    })
}

fn optimize_unused(
    core: &Core,
    params: &Params,
    inventory: &[Gem],
    pack: &PlanPack,
    min_pts: i64,
    max_pts: i64,
) -> OptimizeItem {
    let pool: Vec<&Gem> = inventory
        .iter()
        .filter(|gem| !pack.used_ids.contains(&gem.id))
        .collect();
    core_search::optimize_for_core(core, params, &pool, min_pts, max_pts)
}
