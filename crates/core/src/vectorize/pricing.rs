//! Price-value scoring: performance per currency, or fit against a budget.

use crate::domain::budget::{BudgetDescriptor, PricingMode};
use crate::domain::dimension::unit;

/// Primary scores feeding the budget-free performance-per-price estimate.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PrimaryScores {
    pub cpu: f64,
    pub memory: f64,
    pub camera: f64,
    pub battery: f64,
    pub storage: f64,
}

impl PrimaryScores {
    fn weighted(&self) -> f64 {
        self.cpu * 0.3
            + self.memory * 0.2
            + self.camera * 0.2
            + self.battery * 0.15
            + self.storage * 0.15
    }
}

const PRICE_SCALE: f64 = 10_000.0;
const UNKNOWN_PRICE_SCORE: f64 = 0.5;

pub fn price_value(price: f64, primary: &PrimaryScores, budget: Option<&BudgetDescriptor>) -> f64 {
    match budget.and_then(BudgetDescriptor::pricing_mode) {
        Some(PricingMode::Target { target_price, tolerance }) => {
            target_fit(price, target_price, tolerance)
        }
        Some(PricingMode::Range { min_budget, max_budget }) => {
            range_fit(price, min_budget, max_budget)
        }
        Some(PricingMode::Ceiling { max_budget }) => ceiling_fit(price, max_budget),
        Some(PricingMode::Floor { min_budget }) => floor_fit(price, min_budget),
        None => value_for_money(price, primary),
    }
}

fn value_for_money(price: f64, primary: &PrimaryScores) -> f64 {
    if !(price > 0.0) {
        return UNKNOWN_PRICE_SCORE;
    }
    unit(primary.weighted() / (price / PRICE_SCALE))
}

/// Full marks at the target, 0.7 at the tolerance edge, then a steeper decay.
pub fn target_fit(price: f64, target: f64, tolerance: f64) -> f64 {
    let ratio = (price - target).abs() / target;
    if tolerance > 0.0 && ratio <= tolerance {
        unit(1.0 - ratio / tolerance * 0.3)
    } else {
        unit(0.7 - (ratio - tolerance) * 0.5)
    }
}

/// Peaks at the midpoint of `[min, max]`; outside the range the score starts
/// at 0.5 and decays, much faster above the range than below it.
///
/// The curve is discontinuous at the bounds: a price exactly at `min` or
/// `max` scores 0.0 while one just outside scores about 0.5.
pub fn range_fit(price: f64, min: f64, max: f64) -> f64 {
    if price < min {
        let deficit = min - price;
        return unit(0.5 - deficit / min * 0.3);
    }
    if price > max {
        let excess = price - max;
        return unit(0.5 - excess / max);
    }
    let half_span = (max - min) / 2.0;
    if half_span <= 0.0 {
        return 1.0;
    }
    let mid = (min + max) / 2.0;
    unit(1.0 - (price - mid).abs() / half_span)
}

/// Full marks anywhere under the ceiling, then the same decay as a range.
pub fn ceiling_fit(price: f64, max: f64) -> f64 {
    if price <= max {
        return 1.0;
    }
    unit(0.5 - (price - max) / max)
}

/// Full marks anywhere above the floor, gentle decay below it.
pub fn floor_fit(price: f64, min: f64) -> f64 {
    if price >= min {
        return 1.0;
    }
    unit(0.5 - (min - price) / min * 0.3)
}

#[cfg(test)]
mod tests {
    use super::{ceiling_fit, floor_fit, price_value, range_fit, target_fit, PrimaryScores};
    use crate::domain::budget::{BudgetDescriptor, BudgetSource};

    fn close(actual: f64, expected: f64) -> bool {
        (actual - expected).abs() < 1e-9
    }

    #[test]
    fn target_mode_is_full_at_target_and_point_seven_at_edge() {
        assert!(close(target_fit(3000.0, 3000.0, 0.2), 1.0));
        assert!(close(target_fit(3600.0, 3000.0, 0.2), 0.7));
        assert!(close(target_fit(2400.0, 3000.0, 0.2), 0.7));
        assert!(close(target_fit(4500.0, 3000.0, 0.2), 0.55));
        assert_eq!(target_fit(30_000.0, 3000.0, 0.2), 0.0);
    }

    #[test]
    fn zero_tolerance_target_degrades_from_point_seven() {
        assert!(close(target_fit(3000.0, 3000.0, 0.0), 0.7));
    }

    #[test]
    fn range_mode_peaks_at_midpoint() {
        assert!(close(range_fit(3500.0, 3000.0, 4000.0), 1.0));
        assert!(close(range_fit(3250.0, 3000.0, 4000.0), 0.5));
        assert!(close(range_fit(3000.0, 3000.0, 4000.0), 0.0));
        assert!(close(range_fit(5000.0, 5000.0, 5000.0), 1.0));
    }

    #[test]
    fn range_mode_jumps_at_its_bounds() {
        assert_eq!(range_fit(3000.0, 3000.0, 4000.0), 0.0);
        assert!(close(range_fit(2999.0, 3000.0, 4000.0), 0.5 - 0.3 / 3000.0));
        assert_eq!(range_fit(4000.0, 3000.0, 4000.0), 0.0);
        assert!(close(range_fit(4001.0, 3000.0, 4000.0), 0.5 - 1.0 / 4000.0));
    }

    #[test]
    fn one_sided_modes_reward_prices_on_the_right_side() {
        assert_eq!(ceiling_fit(1999.0, 3000.0), 1.0);
        assert_eq!(ceiling_fit(3000.0, 3000.0), 1.0);
        assert!(close(ceiling_fit(4500.0, 3000.0), 0.0));
        assert!(ceiling_fit(3299.0, 3000.0) < 0.5);

        assert_eq!(floor_fit(6000.0, 5000.0), 1.0);
        assert!(close(floor_fit(2500.0, 5000.0), 0.35));

        let primary = PrimaryScores::default();
        let ceiling = BudgetDescriptor::ceiling(3000.0);
        let cheap = price_value(1999.0, &primary, Some(&ceiling));
        let over = price_value(3299.0, &primary, Some(&ceiling));
        assert!(cheap > over);
    }

    #[test]
    fn range_mode_penalizes_out_of_range_prices() {
        assert!(close(range_fit(1500.0, 3000.0, 4000.0), 0.35));
        assert!(close(range_fit(5000.0, 3000.0, 4000.0), 0.25));
        assert_eq!(range_fit(6001.0, 3000.0, 4000.0), 0.0);
    }

    #[test]
    fn no_budget_rewards_performance_per_price() {
        let primary =
            PrimaryScores { cpu: 0.9, memory: 0.8, camera: 0.95, battery: 0.9, storage: 0.85 };
        let cheap = price_value(2000.0, &primary, None);
        let pricey = price_value(9000.0, &primary, None);
        assert_eq!(cheap, 1.0);
        assert!(pricey < cheap);
        assert!(close(price_value(0.0, &primary, None), 0.5));
    }

    #[test]
    fn budget_source_selects_mode() {
        let primary = PrimaryScores::default();
        let range = BudgetDescriptor::range(3000.0, 4000.0);
        let around = BudgetDescriptor::around(3500.0, 0.2, BudgetSource::Single);

        assert!(close(price_value(3000.0, &primary, Some(&range)), 0.0));
        assert!(price_value(3000.0, &primary, Some(&around)) > 0.7);
        assert_eq!(price_value(3000.0, &primary, Some(&BudgetDescriptor::none())), 0.0);
        assert!(close(price_value(0.0, &primary, Some(&BudgetDescriptor::none())), 0.5));
    }
}
