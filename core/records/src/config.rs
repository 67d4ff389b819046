//! FILENAME: core/records/src/config.rs
//! PURPOSE: Request-scoped configuration: preferred programs and plan costs.
//! CONTEXT: Passed explicitly into each call. Nothing in the engines reads
//! global defaults.

use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};

/// Default cost per credit for plans missing from the cost table.
pub const DEFAULT_FALLBACK_COST: f64 = 1000.0;

/// Default credits required for plans missing from the cost table.
pub const DEFAULT_FALLBACK_REQUIRED_CREDITS: f64 = 30.0;

/// Placeholder seed plans: (description, cost per credit, credits required).
/// The rates are illustrative only; real rates come from a loaded config.
const SEED_PLANS: [(&str, f64, f64); 6] = [
    ("Master of Business Administration", 1250.0, 36.0),
    ("MS Computer Science", 1200.0, 30.0),
    ("MS Data Science", 1200.0, 30.0),
    ("MS Cybersecurity", 1150.0, 30.0),
    ("MS Accounting", 1100.0, 30.0),
    ("MA Education", 850.0, 33.0),
];

/// Cost parameters for one academic plan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanCost {
    pub cost_per_credit: f64,
    pub credits_required: f64,
}

impl PlanCost {
    /// Negative inputs are clamped to zero.
    pub fn new(cost_per_credit: f64, credits_required: f64) -> Self {
        PlanCost {
            cost_per_credit: cost_per_credit.max(0.0),
            credits_required: credits_required.max(0.0),
        }
    }
}

/// Per-plan costs with fallbacks for plans not listed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanCostConfig {
    pub plans: BTreeMap<String, PlanCost>,
    pub fallback_cost: f64,
    pub fallback_required_credits: f64,
}

impl PlanCostConfig {
    /// An empty cost table with the given fallbacks.
    pub fn new(fallback_cost: f64, fallback_required_credits: f64) -> Self {
        PlanCostConfig {
            plans: BTreeMap::new(),
            fallback_cost: fallback_cost.max(0.0),
            fallback_required_credits: fallback_required_credits.max(0.0),
        }
    }

    /// Builder-style insert.
    pub fn with_plan(mut self, description: impl Into<String>, cost: PlanCost) -> Self {
        self.plans.insert(description.into(), cost);
        self
    }

    pub fn is_known(&self, description: &str) -> bool {
        self.plans.contains_key(description)
    }

    /// Cost parameters for a plan; unknown or absent plans use the fallbacks.
    pub fn lookup(&self, description: Option<&str>) -> PlanCost {
        description
            .and_then(|d| self.plans.get(d))
            .copied()
            .unwrap_or_else(|| PlanCost::new(self.fallback_cost, self.fallback_required_credits))
    }

    pub fn cost_per_credit(&self, description: Option<&str>) -> f64 {
        self.lookup(description).cost_per_credit
    }

    pub fn credits_required(&self, description: Option<&str>) -> f64 {
        self.lookup(description).credits_required
    }
}

impl Default for PlanCostConfig {
    fn default() -> Self {
        SEED_PLANS.iter().fold(
            PlanCostConfig::new(DEFAULT_FALLBACK_COST, DEFAULT_FALLBACK_REQUIRED_CREDITS),
            |config, &(name, cost, credits)| config.with_plan(name, PlanCost::new(cost, credits)),
        )
    }
}

/// Everything a summary request needs besides the data itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Plans pre-selected when the caller does not choose any.
    pub preferred_defaults: Vec<String>,
    pub costs: PlanCostConfig,
}

impl Config {
    pub fn fallback_cost(&self) -> f64 {
        self.costs.fallback_cost
    }

    pub fn fallback_required_credits(&self) -> f64 {
        self.costs.fallback_required_credits
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            preferred_defaults: SEED_PLANS.iter().map(|(name, _, _)| name.to_string()).collect(),
            costs: PlanCostConfig::default(),
        }
    }
}
