use std::collections::HashMap;

use crate::model::Role;

// Per-level weights for the combat-stat options each role cares about.
// Levels are 1-based; anything outside 1..=5 scores 0.
const DEALER_WEIGHTS: &[(&str, [f64; 5])] = &[
    ("attack", [0.39, 0.78, 1.17, 1.56, 1.95]),
    ("additional_damage", [0.60, 1.20, 1.80, 2.40, 3.00]),
    ("boss_damage", [0.44, 0.88, 1.32, 1.76, 2.20]),
];

const SUPPORTER_WEIGHTS: &[(&str, [f64; 5])] = &[
    ("brand_power", [0.39, 0.78, 1.17, 1.56, 1.95]),
    ("ally_enhance", [0.30, 0.60, 0.90, 1.20, 1.50]),
    ("ally_damage", [0.35, 0.70, 1.05, 1.40, 1.75]),
];

/// Role-specific lookup table for scoring combat-stat options. Built once per
/// optimization call and passed into the evaluator so role semantics stay
/// swappable without touching the search.
#[derive(Debug, Clone)]
pub struct WeightTable {
    weights: HashMap<&'static str, [f64; 5]>,
}

impl WeightTable {
    pub fn for_role(role: Role) -> Self {
        let source = match role {
            Role::Dealer => DEALER_WEIGHTS,
            Role::Supporter => SUPPORTER_WEIGHTS,
        };
        Self {
            weights: source.iter().copied().collect(),
        }
    }

    /// Weight for a stat option. Unknown names and out-of-range levels score 0.
    pub fn weight(&self, name: &str, level: i64) -> f64 {
        if !(1..=5).contains(&level) {
            return 0.0;
        }
        self.weights
            .get(name)
            .map(|per_level| per_level[(level - 1) as usize])
            .unwrap_or(0.0)
    }
}
