use std::cmp::Ordering;

use tracing::debug;

use crate::model::{Core, Gem, Params, SLOT_COUNT};
use crate::optimizer::{activation, OptimizeItem};
use crate::weights::WeightTable;

const NO_COMBINATION: &str = "no combination found";

/// Finds the best ordered slot assignment for a single core from the given
/// pool of unused gems.
///
/// Slot order matters because activation is prefix-contiguous, so the search
/// explores orderings jointly with selection: a depth-first walk that places
/// one candidate per slot, evaluates every partial assignment, and keeps two
/// running bests — the best within `[min_pts, max_pts]` and the best overall.
/// When nothing lands in the window the overall best is returned with a
/// `reason` explaining the miss.
pub fn optimize_for_core(
    core: &Core,
    params: &Params,
    pool: &[&Gem],
    min_pts: i64,
    max_pts: i64,
) -> OptimizeItem {
    let table = WeightTable::for_role(params.role);

    let mut candidates: Vec<&Gem> = pool
        .iter()
        .copied()
        .filter(|gem| gem.family == core.family)
        .collect();
    if candidates.is_empty() {
        return OptimizeItem::empty(NO_COMBINATION);
    }

    // Order branch exploration by a greedy value-per-cost heuristic. This
    // only steers which branches are visited first; ties fall back to gem id
    // so identical inputs always search in the same order.
    candidates.sort_by(|a, b| {
        greedy_score(b, params)
            .total_cmp(&greedy_score(a, params))
            .then_with(|| a.id.cmp(&b.id))
    });

    struct Search<'a> {
        core: &'a Core,
        params: &'a Params,
        table: &'a WeightTable,
        candidates: Vec<&'a Gem>,
        best_window: Option<OptimizeItem>,
        best_any: Option<OptimizeItem>,
        min_pts: i64,
        max_pts: i64,
    }

    fn descend<'a>(search: &mut Search<'a>, chosen: &mut Vec<&'a Gem>, taken: &mut [bool]) {
        let remain = if chosen.is_empty() {
            search.core.grade.budget()
        } else {
            let item = build_item(
                search.core,
                search.params,
                search.table,
                chosen,
                &search.candidates,
                taken,
            );
            let remain = item.remain();
            let pts = item.pts();

            if pts >= search.min_pts && pts <= search.max_pts {
                replace_if_better(&mut search.best_window, &item);
            }
            replace_if_better(&mut search.best_any, &item);

            if chosen.len() == SLOT_COUNT || remain == 0 {
                return;
            }
            remain
        };

        for idx in 0..search.candidates.len() {
            if taken[idx] {
                continue;
            }
            let gem = search.candidates[idx];
            if gem.effective_cost(search.params) > remain {
                continue;
            }
            taken[idx] = true;
            chosen.push(gem);
            descend(search, chosen, taken);
            chosen.pop();
            taken[idx] = false;
        }
    }

    let mut taken = vec![false; candidates.len()];
    let mut search = Search {
        core,
        params,
        table: &table,
        candidates,
        best_window: None,
        best_any: None,
        min_pts,
        max_pts,
    };
    descend(&mut search, &mut Vec::with_capacity(SLOT_COUNT), &mut taken);

    let item = select_result(search.best_window, search.best_any, min_pts, max_pts);
    debug!(
        core = %core.key,
        pts = item.pts(),
        threshold = item.threshold,
        reason = item.reason.as_deref().unwrap_or(""),
        "per-core search finished"
    );
    item
}

fn greedy_score(gem: &Gem, params: &Params) -> f64 {
    let stat_levels: i64 = gem.stat_options().map(|opt| opt.level).sum();
    let value = gem.point_contribution() as f64 + 0.05 * stat_levels as f64;
    value / gem.effective_cost(params) as f64
}

fn build_item(
    core: &Core,
    params: &Params,
    table: &WeightTable,
    chosen: &[&Gem],
    candidates: &[&Gem],
    taken: &[bool],
) -> OptimizeItem {
    let mut slots = [None; SLOT_COUNT];
    let mut ids = [None; SLOT_COUNT];
    for (idx, gem) in chosen.iter().enumerate() {
        slots[idx] = Some(*gem);
        ids[idx] = Some(gem.id);
    }

    let res = activation::evaluate(core, &slots, params, table);
    let threshold = core.grade.threshold_for(res.pts);
    let can_reach_next = match core.grade.next_breakpoint_above(threshold) {
        Some(next_bp) => {
            let unchosen = candidates
                .iter()
                .enumerate()
                .filter(|(idx, _)| !taken[*idx])
                .map(|(_, gem)| *gem);
            let free_slots = SLOT_COUNT - chosen.len();
            res.pts + reachability_bound(res.remain, free_slots, unchosen, params) >= next_bp
        }
        None => false,
    };

    OptimizeItem {
        ids,
        res: Some(res),
        threshold,
        can_reach_next,
        reason: None,
    }
}

/// Heuristic upper estimate of the points still obtainable from the unused
/// pool: take gems cheapest-first into the leftover budget. This ignores the
/// ordering constraint, so it can over-estimate; it feeds the advisory
/// `can_reach_next` flag only and never prunes the search.
fn reachability_bound<'a>(
    budget: i64,
    free_slots: usize,
    unchosen: impl Iterator<Item = &'a Gem>,
    params: &Params,
) -> i64 {
    let mut rest: Vec<(i64, i64, i64)> = unchosen
        .map(|gem| (gem.effective_cost(params), gem.point_contribution(), gem.id))
        .collect();
    rest.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)).then(a.2.cmp(&b.2)));

    let mut remaining = budget;
    let mut slots = free_slots;
    let mut bound = 0;
    for (cost, pts, _) in rest {
        if slots == 0 || cost > remaining {
            break;
        }
        remaining -= cost;
        bound += pts;
        slots -= 1;
    }
    bound
}

/// Strict lexicographic ordering between candidate results: achieved
/// threshold, then reachability of the next breakpoint, then flex score,
/// leftover budget, and raw points. Ties keep the earlier result.
fn better(a: &OptimizeItem, b: &OptimizeItem) -> bool {
    if a.threshold != b.threshold {
        return a.threshold > b.threshold;
    }
    if a.can_reach_next != b.can_reach_next {
        return a.can_reach_next;
    }
    match a.flex_score().total_cmp(&b.flex_score()) {
        Ordering::Greater => return true,
        Ordering::Less => return false,
        Ordering::Equal => {}
    }
    if a.remain() != b.remain() {
        return a.remain() > b.remain();
    }
    a.pts() > b.pts()
}

fn replace_if_better(best: &mut Option<OptimizeItem>, item: &OptimizeItem) {
    match best {
        Some(current) if !better(item, current) => {}
        _ => *best = Some(item.clone()),
    }
}

fn select_result(
    best_window: Option<OptimizeItem>,
    best_any: Option<OptimizeItem>,
    min_pts: i64,
    max_pts: i64,
) -> OptimizeItem {
    if let Some(item) = best_window {
        return item;
    }
    if let Some(mut item) = best_any {
        let pts = item.pts();
        item.reason = Some(if pts < min_pts {
            format!(
                "points below minimum ({}/{}, shortfall {})",
                pts,
                min_pts,
                min_pts - pts
            )
        } else {
            format!("points above maximum ({}/{})", pts, max_pts)
        });
        return item;
    }
    OptimizeItem::empty(NO_COMBINATION)
}
