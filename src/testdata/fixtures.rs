use crate::model::{Core, CoreGrade, Gem, GemFamily, GemId, GemOption, GemSubtype};

pub fn core(key: &str, family: GemFamily, grade: CoreGrade, min_pts: i64, max_pts: i64) -> Core {
    Core {
        family,
        key: key.to_string(),
        label: format!("Core {}", key),
        grade,
        enabled: true,
        min_pts,
        max_pts,
    }
}

pub fn gem(id: GemId, family: GemFamily, subtype: GemSubtype, options: &[(&str, i64)]) -> Gem {
    Gem {
        id,
        family,
        subtype,
        base_cost: None,
        options: options
            .iter()
            .map(|(name, level)| GemOption {
                name: name.to_string(),
                level: *level,
            })
            .collect(),
    }
}

/// Gem with a fixed will cost and point contribution and nothing else.
pub fn point_gem(id: GemId, family: GemFamily, cost: i64, pts: i64) -> Gem {
    let mut gem = gem(
        id,
        family,
        GemSubtype::Stable,
        &[("efficiency", 0), ("point", pts)],
    );
    gem.base_cost = Some(cost);
    gem
}

/// Like `point_gem` but with a single combat-stat option in slot 2.
pub fn stat_gem(id: GemId, family: GemFamily, cost: i64, pts: i64, stat: &str, level: i64) -> Gem {
    let mut gem = gem(
        id,
        family,
        GemSubtype::Stable,
        &[("efficiency", 0), ("point", pts), (stat, level)],
    );
    gem.base_cost = Some(cost);
    gem
}
