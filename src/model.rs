use std::collections::{HashMap, HashSet};

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

pub type GemId = i64;
pub type CoreKey = String;

/// Number of gem slots per core.
pub const SLOT_COUNT: usize = 4;

/// Option slot 0 holds the efficiency option (reduces effective cost).
pub const EFFICIENCY_SLOT: usize = 0;
/// Option slot 1 holds the point option (contributes core points).
pub const POINT_SLOT: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GemFamily {
    Order,
    Chaos,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GemSubtype {
    Stable,
    Erosion,
    Swift,
    Solid,
    Distortion,
    Immutable,
}

impl GemSubtype {
    /// Base will cost before the per-gem override and efficiency reduction.
    pub fn default_base_cost(self) -> i64 {
        match self {
            GemSubtype::Stable | GemSubtype::Erosion | GemSubtype::Swift => 8,
            GemSubtype::Solid | GemSubtype::Distortion => 9,
            GemSubtype::Immutable => 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoreGrade {
    Heroic,
    Legend,
    Relic,
    Ancient,
}

impl CoreGrade {
    /// Will budget the core provides to its gem slots.
    pub fn budget(self) -> i64 {
        match self {
            CoreGrade::Heroic => 9,
            CoreGrade::Legend => 12,
            CoreGrade::Relic => 15,
            CoreGrade::Ancient => 17,
        }
    }

    /// Ascending point breakpoints at which the core unlocks its option tiers.
    pub fn breakpoints(self) -> &'static [i64] {
        match self {
            CoreGrade::Heroic => &[10, 14],
            CoreGrade::Legend => &[10, 14, 17],
            CoreGrade::Relic => &[10, 14, 17, 18, 19],
            CoreGrade::Ancient => &[10, 14, 17, 18, 19, 20],
        }
    }

    /// Highest breakpoint not exceeding `pts`, or 0 if none is reached.
    pub fn threshold_for(self, pts: i64) -> i64 {
        self.breakpoints()
            .iter()
            .copied()
            .filter(|&bp| bp <= pts)
            .last()
            .unwrap_or(0)
    }

    /// Next breakpoint strictly above the given threshold, if any.
    pub fn next_breakpoint_above(self, threshold: i64) -> Option<i64> {
        self.breakpoints().iter().copied().find(|&bp| bp > threshold)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Dealer,
    Supporter,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GemOption {
    pub name: String,
    pub level: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gem {
    pub id: GemId,
    pub family: GemFamily,
    pub subtype: GemSubtype,
    /// Overrides the subtype's default base cost when set.
    pub base_cost: Option<i64>,
    /// Up to 4 options in fixed slots: 0 = efficiency, 1 = point, 2-3 = combat stats.
    pub options: Vec<GemOption>,
}

impl Gem {
    pub fn option(&self, slot: usize) -> Option<&GemOption> {
        self.options.get(slot)
    }

    /// Combat-stat options (slots 2 and 3).
    pub fn stat_options(&self) -> impl Iterator<Item = &GemOption> {
        self.options.iter().skip(POINT_SLOT + 1)
    }

    /// Will cost after applying the efficiency reduction, floored at 1.
    pub fn effective_cost(&self, params: &Params) -> i64 {
        let base = self
            .base_cost
            .unwrap_or_else(|| self.subtype.default_base_cost());
        let reduction = self
            .option(EFFICIENCY_SLOT)
            .map(|opt| params.reduction_for(opt.level))
            .unwrap_or(0);
        (base - reduction).max(1)
    }

    /// Points this gem contributes to its core when activated.
    pub fn point_contribution(&self) -> i64 {
        self.option(POINT_SLOT).map(|opt| opt.level).unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Core {
    pub family: GemFamily,
    pub key: CoreKey,
    pub label: String,
    pub grade: CoreGrade,
    pub enabled: bool,
    pub min_pts: i64,
    pub max_pts: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Params {
    pub role: Role,
    /// Efficiency option level -> will reduction. Levels outside the table reduce by 0.
    pub efficiency_reduction: HashMap<i64, i64>,
}

impl Params {
    pub fn new(role: Role) -> Self {
        Self {
            role,
            efficiency_reduction: (1..=5).map(|level| (level, level)).collect(),
        }
    }

    pub fn reduction_for(&self, level: i64) -> i64 {
        self.efficiency_reduction.get(&level).copied().unwrap_or(0)
    }
}

/// Rejects malformed configuration before any search starts. Soft failures
/// (no combination, out-of-window points) are reported through result fields
/// instead, never as errors.
pub fn validate_input(cores: &[Core], inventory: &[Gem]) -> Result<()> {
    let mut keys = HashSet::new();
    for core in cores {
        if !keys.insert(core.key.as_str()) {
            bail!("duplicate core key: {}", core.key);
        }
        if core.min_pts > core.max_pts {
            bail!(
                "core {} has min_pts {} above max_pts {}",
                core.key,
                core.min_pts,
                core.max_pts
            );
        }
    }

    let mut ids = HashSet::new();
    for gem in inventory {
        if !ids.insert(gem.id) {
            bail!("duplicate gem id: {}", gem.id);
        }
    }

    Ok(())
}
