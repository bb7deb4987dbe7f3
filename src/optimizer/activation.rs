use std::collections::BTreeMap;

use crate::model::{Core, Gem, Params, SLOT_COUNT};
use crate::optimizer::ActivationResult;
use crate::weights::WeightTable;

/// Evaluates one core's ordered slot assignment.
///
/// Activation is prefix-contiguous: slots are walked in order and the first
/// empty slot or the first gem whose effective cost exceeds the remaining
/// budget ends activation for that and every later slot, even if a later gem
/// would individually have fit.
pub fn evaluate(
    core: &Core,
    slots: &[Option<&Gem>; SLOT_COUNT],
    params: &Params,
    table: &WeightTable,
) -> ActivationResult {
    let budget = core.grade.budget();
    let mut remain = budget;
    let mut activated = [false; SLOT_COUNT];
    let mut pts = 0;
    let mut flex_score = 0.0;
    let mut stat_totals: BTreeMap<String, i64> = BTreeMap::new();

    for (idx, slot) in slots.iter().enumerate() {
        let gem = match slot {
            Some(gem) => gem,
            None => break,
        };
        let cost = gem.effective_cost(params);
        if cost > remain {
            break;
        }

        activated[idx] = true;
        remain -= cost;
        pts += gem.point_contribution();

        for opt in gem.stat_options() {
            flex_score += table.weight(&opt.name, opt.level);
            *stat_totals.entry(opt.name.clone()).or_insert(0) += opt.level;
        }
    }

    ActivationResult {
        activated,
        spent: budget - remain,
        remain,
        pts,
        flex_score,
        stat_totals,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CoreGrade, GemFamily, Role};
    use crate::testdata::fixtures;

    fn slots<'a>(gems: &[&'a Gem]) -> [Option<&'a Gem>; SLOT_COUNT] {
        let mut out = [None; SLOT_COUNT];
        for (i, gem) in gems.iter().enumerate() {
            out[i] = Some(*gem);
        }
        out
    }

    #[test]
    fn test_all_slots_activate_within_budget() {
        let core = fixtures::core("c1", GemFamily::Order, CoreGrade::Ancient, 0, 20);
        let params = Params::new(Role::Dealer);
        let table = WeightTable::for_role(Role::Dealer);
        let a = fixtures::point_gem(1, GemFamily::Order, 8, 10);
        let b = fixtures::point_gem(2, GemFamily::Order, 9, 8);

        let res = evaluate(&core, &slots(&[&a, &b]), &params, &table);
        assert_eq!(res.activated, [true, true, false, false]);
        assert_eq!(res.spent, 17);
        assert_eq!(res.remain, 0);
        assert_eq!(res.pts, 18);
    }

    #[test]
    fn test_unaffordable_slot_blocks_all_later_slots() {
        // Budget 9: slot 0 fits (cost 5), slot 1 does not (cost 6), slot 2
        // would fit alone (cost 2) but must stay inactive.
        let core = fixtures::core("c1", GemFamily::Order, CoreGrade::Heroic, 0, 20);
        let params = Params::new(Role::Dealer);
        let table = WeightTable::for_role(Role::Dealer);
        let a = fixtures::point_gem(1, GemFamily::Order, 5, 3);
        let b = fixtures::point_gem(2, GemFamily::Order, 6, 4);
        let c = fixtures::point_gem(3, GemFamily::Order, 2, 5);

        let res = evaluate(&core, &slots(&[&a, &b, &c]), &params, &table);
        assert_eq!(res.activated, [true, false, false, false]);
        assert_eq!(res.spent, 5);
        assert_eq!(res.remain, 4);
        assert_eq!(res.pts, 3);
    }

    #[test]
    fn test_empty_slot_ends_activation() {
        let core = fixtures::core("c1", GemFamily::Order, CoreGrade::Ancient, 0, 20);
        let params = Params::new(Role::Dealer);
        let table = WeightTable::for_role(Role::Dealer);
        let a = fixtures::point_gem(1, GemFamily::Order, 4, 3);
        let c = fixtures::point_gem(3, GemFamily::Order, 4, 5);

        let mut assignment = [None; SLOT_COUNT];
        assignment[0] = Some(&a);
        assignment[2] = Some(&c);

        let res = evaluate(&core, &assignment, &params, &table);
        assert_eq!(res.activated, [true, false, false, false]);
        assert_eq!(res.pts, 3);
    }

    #[test]
    fn test_flex_score_and_stat_tally() {
        let core = fixtures::core("c1", GemFamily::Order, CoreGrade::Ancient, 0, 20);
        let params = Params::new(Role::Dealer);
        let table = WeightTable::for_role(Role::Dealer);
        let a = fixtures::gem(
            1,
            GemFamily::Order,
            crate::model::GemSubtype::Stable,
            &[("efficiency", 1), ("point", 4), ("attack", 3), ("boss_damage", 2)],
        );

        let res = evaluate(&core, &slots(&[&a]), &params, &table);
        let expected = table.weight("attack", 3) + table.weight("boss_damage", 2);
        assert_eq!(res.flex_score, expected);
        assert_eq!(res.stat_totals.get("attack"), Some(&3));
        assert_eq!(res.stat_totals.get("boss_damage"), Some(&2));
    }

    #[test]
    fn test_unknown_stat_contributes_nothing() {
        let core = fixtures::core("c1", GemFamily::Order, CoreGrade::Ancient, 0, 20);
        let params = Params::new(Role::Supporter);
        let table = WeightTable::for_role(Role::Supporter);
        // boss_damage is a dealer stat; the supporter table ignores it.
        let a = fixtures::gem(
            1,
            GemFamily::Order,
            crate::model::GemSubtype::Stable,
            &[("efficiency", 1), ("point", 4), ("boss_damage", 5)],
        );

        let res = evaluate(&core, &slots(&[&a]), &params, &table);
        assert_eq!(res.flex_score, 0.0);
        // The raw tally still records it for display.
        assert_eq!(res.stat_totals.get("boss_damage"), Some(&5));
    }
}
