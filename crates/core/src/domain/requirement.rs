use std::fmt;

use serde::{Deserialize, Serialize};

use super::dimension::Dimension;
use crate::errors::DomainError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementType {
    Exact,
    Range,
    Minimum,
    Maximum,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    #[serde(rename = "GB")]
    Gigabytes,
    #[serde(rename = "inch")]
    Inches,
    #[serde(rename = "mAh")]
    MilliampHours,
    #[serde(rename = "MP")]
    Megapixels,
    #[serde(rename = "yuan")]
    Yuan,
}

impl Unit {
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Gigabytes => "GB",
            Self::Inches => "inch",
            Self::MilliampHours => "mAh",
            Self::Megapixels => "MP",
            Self::Yuan => "yuan",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Explicit numeric constraint extracted from user text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpecificRequirement {
    pub dimension: Dimension,
    pub value: f64,
    pub unit: Unit,
    /// Allowed relative deviation for `exact`/`range`, in `[0, 1]`.
    pub tolerance: f64,
    pub requirement_type: RequirementType,
}

impl SpecificRequirement {
    pub fn new(
        dimension: Dimension,
        value: f64,
        unit: Unit,
        tolerance: f64,
        requirement_type: RequirementType,
    ) -> Self {
        Self { dimension, value, unit, tolerance, requirement_type }
    }

    /// Absolute deviation allowed around `value` (`tolerance * value`).
    pub fn band(&self) -> f64 {
        self.tolerance * self.value
    }

    /// Hard satisfaction check used by the pre-filter.
    pub fn is_satisfied_by(&self, raw: f64) -> bool {
        match self.requirement_type {
            RequirementType::Exact | RequirementType::Range => {
                (raw - self.value).abs() <= self.band()
            }
            RequirementType::Minimum => raw >= self.value,
            RequirementType::Maximum => raw <= self.value,
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if !(self.value > 0.0) || !self.value.is_finite() {
            return Err(DomainError::InvalidRequirement(format!(
                "{} value must be positive, got {}",
                self.dimension, self.value
            )));
        }
        if !(0.0..=1.0).contains(&self.tolerance) {
            return Err(DomainError::InvalidRequirement(format!(
                "{} tolerance must be in [0, 1], got {}",
                self.dimension, self.tolerance
            )));
        }
        Ok(())
    }

    /// Short phrase such as `256GB` or `at least 5000mAh`.
    pub fn describe(&self) -> String {
        let quantity = format_quantity(self.value, self.unit);
        match self.requirement_type {
            RequirementType::Exact => quantity,
            RequirementType::Range => format!("{quantity} range"),
            RequirementType::Minimum => format!("at least {quantity}"),
            RequirementType::Maximum => format!("at most {quantity}"),
        }
    }
}

pub fn format_quantity(value: f64, unit: Unit) -> String {
    let number = if value.fract().abs() < f64::EPSILON {
        format!("{value:.0}")
    } else {
        let trimmed = format!("{value:.2}");
        trimmed.trim_end_matches('0').trim_end_matches('.').to_owned()
    };
    match unit {
        Unit::Inches | Unit::Yuan => format!("{number} {unit}"),
        _ => format!("{number}{unit}"),
    }
}

#[cfg(test)]
mod tests {
    use super::{format_quantity, RequirementType, SpecificRequirement, Unit};
    use crate::domain::dimension::Dimension;

    fn storage(value: f64, tolerance: f64, kind: RequirementType) -> SpecificRequirement {
        SpecificRequirement::new(Dimension::StorageSpeed, value, Unit::Gigabytes, tolerance, kind)
    }

    #[test]
    fn exact_with_zero_tolerance_requires_equality() {
        let requirement = storage(256.0, 0.0, RequirementType::Exact);
        assert!(requirement.is_satisfied_by(256.0));
        assert!(!requirement.is_satisfied_by(512.0));
    }

    #[test]
    fn range_accepts_values_inside_band() {
        let requirement = storage(192.0, 128.0 / 192.0, RequirementType::Range);
        assert!(requirement.is_satisfied_by(128.0));
        assert!(requirement.is_satisfied_by(256.0));
        assert!(!requirement.is_satisfied_by(512.0));
    }

    #[test]
    fn minimum_and_maximum_are_inclusive() {
        assert!(storage(128.0, 0.1, RequirementType::Minimum).is_satisfied_by(128.0));
        assert!(!storage(128.0, 0.1, RequirementType::Minimum).is_satisfied_by(64.0));
        assert!(storage(128.0, 0.1, RequirementType::Maximum).is_satisfied_by(128.0));
        assert!(!storage(128.0, 0.1, RequirementType::Maximum).is_satisfied_by(256.0));
    }

    #[test]
    fn validate_rejects_non_positive_values_and_wide_tolerance() {
        assert!(storage(0.0, 0.0, RequirementType::Exact).validate().is_err());
        assert!(storage(256.0, 1.5, RequirementType::Exact).validate().is_err());
        assert!(storage(256.0, 0.0, RequirementType::Exact).validate().is_ok());
    }

    #[test]
    fn describe_renders_requirement_phrases() {
        assert_eq!(storage(256.0, 0.0, RequirementType::Exact).describe(), "256GB");
        assert_eq!(storage(192.0, 0.6, RequirementType::Range).describe(), "192GB range");
        assert_eq!(format_quantity(6.1, Unit::Inches), "6.1 inch");
        assert_eq!(format_quantity(3000.0, Unit::Yuan), "3000 yuan");
    }

    #[test]
    fn units_serialize_as_symbols() {
        let json = serde_json::to_string(&Unit::MilliampHours).expect("serialize");
        assert_eq!(json, "\"mAh\"");
    }
}
