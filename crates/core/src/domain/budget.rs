use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Which extraction rule produced a budget.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetSource {
    #[default]
    None,
    Range,
    Approximate,
    Single,
    Keyword,
    /// Upper bound only: `3000元以内`, `不超过3000`.
    Ceiling,
    /// Lower bound only: `5000以上`, `至少5000元`.
    Floor,
}

/// How price value is scored for a given budget.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PricingMode {
    Target { target_price: f64, tolerance: f64 },
    Range { min_budget: f64, max_budget: f64 },
    Ceiling { max_budget: f64 },
    Floor { min_budget: f64 },
}

/// Structured price expectation extracted from user text.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BudgetDescriptor {
    pub has_budget: bool,
    pub target_price: f64,
    pub min_budget: f64,
    pub max_budget: f64,
    pub tolerance: f64,
    pub source: BudgetSource,
}

pub const DEFAULT_BUDGET_TOLERANCE: f64 = 0.2;

/// Upper bound recorded for budgets that only name a floor.
pub const OPEN_MAX_BUDGET: f64 = 99_999.0;

impl Default for BudgetDescriptor {
    fn default() -> Self {
        Self {
            has_budget: false,
            target_price: 0.0,
            min_budget: 0.0,
            max_budget: 0.0,
            tolerance: DEFAULT_BUDGET_TOLERANCE,
            source: BudgetSource::None,
        }
    }
}

impl BudgetDescriptor {
    pub fn none() -> Self {
        Self::default()
    }

    /// Explicit range such as `3000-4000元`. Bounds are reordered if reversed.
    pub fn range(first: f64, second: f64) -> Self {
        let (min_budget, max_budget) =
            if first <= second { (first, second) } else { (second, first) };
        let tolerance = if min_budget + max_budget > 0.0 {
            ((max_budget - min_budget) / (max_budget + min_budget) * 2.0).clamp(0.0, 1.0)
        } else {
            DEFAULT_BUDGET_TOLERANCE
        };
        Self {
            has_budget: true,
            target_price: (min_budget + max_budget) / 2.0,
            min_budget,
            max_budget,
            tolerance,
            source: BudgetSource::Range,
        }
    }

    /// Target price with a relative tolerance band around it.
    pub fn around(target_price: f64, tolerance: f64, source: BudgetSource) -> Self {
        let tolerance = tolerance.clamp(0.0, 1.0);
        Self {
            has_budget: true,
            target_price,
            min_budget: (target_price * (1.0 - tolerance)).floor(),
            max_budget: (target_price * (1.0 + tolerance)).floor(),
            tolerance,
            source,
        }
    }

    /// Canned range for qualitative wording such as "cheap" or "flagship".
    pub fn keyword(target_price: f64, min_budget: f64, max_budget: f64, tolerance: f64) -> Self {
        Self {
            has_budget: true,
            target_price,
            min_budget,
            max_budget,
            tolerance,
            source: BudgetSource::Keyword,
        }
    }

    /// Anything priced up to `max_budget`.
    pub fn ceiling(max_budget: f64) -> Self {
        Self {
            has_budget: true,
            target_price: max_budget,
            min_budget: 0.0,
            max_budget,
            tolerance: DEFAULT_BUDGET_TOLERANCE,
            source: BudgetSource::Ceiling,
        }
    }

    /// Anything priced from `min_budget` upwards.
    pub fn floor(min_budget: f64) -> Self {
        Self {
            has_budget: true,
            target_price: min_budget,
            min_budget,
            max_budget: OPEN_MAX_BUDGET.max(min_budget),
            tolerance: DEFAULT_BUDGET_TOLERANCE,
            source: BudgetSource::Floor,
        }
    }

    pub fn pricing_mode(&self) -> Option<PricingMode> {
        if !self.has_budget {
            return None;
        }
        let has_range = self.min_budget > 0.0 && self.max_budget >= self.min_budget;
        match self.source {
            BudgetSource::Ceiling if self.max_budget > 0.0 => {
                Some(PricingMode::Ceiling { max_budget: self.max_budget })
            }
            BudgetSource::Floor if self.min_budget > 0.0 => {
                Some(PricingMode::Floor { min_budget: self.min_budget })
            }
            BudgetSource::Range | BudgetSource::Keyword if has_range => Some(PricingMode::Range {
                min_budget: self.min_budget,
                max_budget: self.max_budget,
            }),
            _ if self.target_price > 0.0 => Some(PricingMode::Target {
                target_price: self.target_price,
                tolerance: self.tolerance,
            }),
            _ if has_range => Some(PricingMode::Range {
                min_budget: self.min_budget,
                max_budget: self.max_budget,
            }),
            _ => None,
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if !self.has_budget {
            return Ok(());
        }
        let target_ok = self.target_price > 0.0 && (0.0..=1.0).contains(&self.tolerance);
        let range_ok = self.min_budget > 0.0 && self.max_budget >= self.min_budget;
        if target_ok || range_ok {
            Ok(())
        } else {
            Err(DomainError::InvalidBudget(format!(
                "budget needs a positive target with tolerance in [0, 1] or a positive range, got \
                 target={} tolerance={} range={}..{}",
                self.target_price, self.tolerance, self.min_budget, self.max_budget
            )))
        }
    }

    /// Hashable view used as part of the vector cache key.
    pub fn cache_key(&self) -> Option<BudgetKey> {
        self.has_budget.then(|| BudgetKey {
            target_price: self.target_price.to_bits(),
            min_budget: self.min_budget.to_bits(),
            max_budget: self.max_budget.to_bits(),
            tolerance: self.tolerance.to_bits(),
            source: self.source,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BudgetKey {
    target_price: u64,
    min_budget: u64,
    max_budget: u64,
    tolerance: u64,
    source: BudgetSource,
}

#[cfg(test)]
mod tests {
    use super::{BudgetDescriptor, BudgetSource, PricingMode};

    #[test]
    fn range_budget_derives_midpoint_and_tolerance() {
        let budget = BudgetDescriptor::range(3000.0, 4000.0);
        assert!(budget.has_budget);
        assert_eq!(budget.target_price, 3500.0);
        assert!((budget.tolerance - 2.0 / 7.0).abs() < 1e-9);
        assert!(budget.validate().is_ok());
        assert_eq!(
            budget.pricing_mode(),
            Some(PricingMode::Range { min_budget: 3000.0, max_budget: 4000.0 })
        );
    }

    #[test]
    fn reversed_range_is_reordered() {
        let budget = BudgetDescriptor::range(4000.0, 3000.0);
        assert_eq!((budget.min_budget, budget.max_budget), (3000.0, 4000.0));
    }

    #[test]
    fn very_wide_range_keeps_tolerance_in_unit_interval() {
        let budget = BudgetDescriptor::range(1000.0, 9000.0);
        assert_eq!(budget.tolerance, 1.0);
        assert!(budget.validate().is_ok());
    }

    #[test]
    fn approximate_budget_uses_target_mode() {
        let budget = BudgetDescriptor::around(3000.0, 0.2, BudgetSource::Approximate);
        assert_eq!((budget.min_budget, budget.max_budget), (2400.0, 3600.0));
        assert_eq!(
            budget.pricing_mode(),
            Some(PricingMode::Target { target_price: 3000.0, tolerance: 0.2 })
        );
    }

    #[test]
    fn one_sided_budgets_select_their_own_modes() {
        let ceiling = BudgetDescriptor::ceiling(3000.0);
        assert_eq!(ceiling.source, BudgetSource::Ceiling);
        assert_eq!((ceiling.min_budget, ceiling.max_budget), (0.0, 3000.0));
        assert_eq!(ceiling.pricing_mode(), Some(PricingMode::Ceiling { max_budget: 3000.0 }));
        assert!(ceiling.validate().is_ok());

        let floor = BudgetDescriptor::floor(5000.0);
        assert_eq!(floor.max_budget, 99_999.0);
        assert_eq!(floor.pricing_mode(), Some(PricingMode::Floor { min_budget: 5000.0 }));
        assert!(floor.validate().is_ok());
    }

    #[test]
    fn empty_budget_has_no_mode_or_key() {
        let budget = BudgetDescriptor::none();
        assert_eq!(budget.pricing_mode(), None);
        assert_eq!(budget.cache_key(), None);
        assert!(budget.validate().is_ok());
    }

    #[test]
    fn inconsistent_budget_fails_validation() {
        let budget = BudgetDescriptor { has_budget: true, ..BudgetDescriptor::none() };
        assert!(budget.validate().is_err());
    }

    #[test]
    fn cache_keys_differ_by_budget() {
        let a = BudgetDescriptor::range(3000.0, 4000.0).cache_key();
        let b = BudgetDescriptor::range(3000.0, 4500.0).cache_key();
        assert_ne!(a, b);
    }
}
