use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// One named axis of phone capability or user priority.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    CpuPerformance,
    MemoryCapacity,
    StorageSpeed,
    GpuPerformance,
    CameraQuality,
    CameraFeatures,
    BatteryCapacity,
    ChargingSpeed,
    ScreenQuality,
    ScreenSize,
    WeightPortability,
    SizePortability,
    BuildQuality,
    DesignAppeal,
    PriceValue,
    HeatControl,
    NetworkStability,
    SoftwareOptimization,
    Durability,
}

impl Dimension {
    pub const COUNT: usize = 19;

    /// Canonical order shared by every vector.
    pub const ALL: [Dimension; Dimension::COUNT] = [
        Dimension::CpuPerformance,
        Dimension::MemoryCapacity,
        Dimension::StorageSpeed,
        Dimension::GpuPerformance,
        Dimension::CameraQuality,
        Dimension::CameraFeatures,
        Dimension::BatteryCapacity,
        Dimension::ChargingSpeed,
        Dimension::ScreenQuality,
        Dimension::ScreenSize,
        Dimension::WeightPortability,
        Dimension::SizePortability,
        Dimension::BuildQuality,
        Dimension::DesignAppeal,
        Dimension::PriceValue,
        Dimension::HeatControl,
        Dimension::NetworkStability,
        Dimension::SoftwareOptimization,
        Dimension::Durability,
    ];

    /// Dimensions used as focus when the user expressed no material preference.
    pub const DEFAULT_FOCUS: [Dimension; 4] = [
        Dimension::CpuPerformance,
        Dimension::CameraQuality,
        Dimension::BatteryCapacity,
        Dimension::PriceValue,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CpuPerformance => "cpu_performance",
            Self::MemoryCapacity => "memory_capacity",
            Self::StorageSpeed => "storage_speed",
            Self::GpuPerformance => "gpu_performance",
            Self::CameraQuality => "camera_quality",
            Self::CameraFeatures => "camera_features",
            Self::BatteryCapacity => "battery_capacity",
            Self::ChargingSpeed => "charging_speed",
            Self::ScreenQuality => "screen_quality",
            Self::ScreenSize => "screen_size",
            Self::WeightPortability => "weight_portability",
            Self::SizePortability => "size_portability",
            Self::BuildQuality => "build_quality",
            Self::DesignAppeal => "design_appeal",
            Self::PriceValue => "price_value",
            Self::HeatControl => "heat_control",
            Self::NetworkStability => "network_stability",
            Self::SoftwareOptimization => "software_optimization",
            Self::Durability => "durability",
        }
    }

    /// Human-readable label used in reasons and summaries.
    pub fn label(&self) -> &'static str {
        match self {
            Self::CpuPerformance => "performance",
            Self::MemoryCapacity => "memory capacity",
            Self::StorageSpeed => "storage",
            Self::GpuPerformance => "gaming performance",
            Self::CameraQuality => "camera quality",
            Self::CameraFeatures => "camera features",
            Self::BatteryCapacity => "battery life",
            Self::ChargingSpeed => "charging speed",
            Self::ScreenQuality => "screen quality",
            Self::ScreenSize => "screen size",
            Self::WeightPortability => "portability",
            Self::SizePortability => "compact size",
            Self::BuildQuality => "build quality",
            Self::DesignAppeal => "design",
            Self::PriceValue => "value for money",
            Self::HeatControl => "heat control",
            Self::NetworkStability => "network stability",
            Self::SoftwareOptimization => "software optimization",
            Self::Durability => "durability",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dimension {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Dimension::ALL
            .into_iter()
            .find(|dimension| dimension.as_str() == normalized)
            .ok_or_else(|| DomainError::UnknownDimension(value.trim().to_owned()))
    }
}

/// Fixed-shape vector with one component per [`Dimension`].
///
/// Components are kept in `[0, 1]`: every mutator clamps its input, so a
/// vector built through the public API cannot leave the unit range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DimensionVector {
    pub cpu_performance: f64,
    pub memory_capacity: f64,
    pub storage_speed: f64,
    pub gpu_performance: f64,
    pub camera_quality: f64,
    pub camera_features: f64,
    pub battery_capacity: f64,
    pub charging_speed: f64,
    pub screen_quality: f64,
    pub screen_size: f64,
    pub weight_portability: f64,
    pub size_portability: f64,
    pub build_quality: f64,
    pub design_appeal: f64,
    pub price_value: f64,
    pub heat_control: f64,
    pub network_stability: f64,
    pub software_optimization: f64,
    pub durability: f64,
}

/// Capability profile of one catalog item.
pub type PerformanceVector = DimensionVector;

/// Importance the user places on each dimension.
pub type DemandVector = DimensionVector;

impl DimensionVector {
    pub fn get(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::CpuPerformance => self.cpu_performance,
            Dimension::MemoryCapacity => self.memory_capacity,
            Dimension::StorageSpeed => self.storage_speed,
            Dimension::GpuPerformance => self.gpu_performance,
            Dimension::CameraQuality => self.camera_quality,
            Dimension::CameraFeatures => self.camera_features,
            Dimension::BatteryCapacity => self.battery_capacity,
            Dimension::ChargingSpeed => self.charging_speed,
            Dimension::ScreenQuality => self.screen_quality,
            Dimension::ScreenSize => self.screen_size,
            Dimension::WeightPortability => self.weight_portability,
            Dimension::SizePortability => self.size_portability,
            Dimension::BuildQuality => self.build_quality,
            Dimension::DesignAppeal => self.design_appeal,
            Dimension::PriceValue => self.price_value,
            Dimension::HeatControl => self.heat_control,
            Dimension::NetworkStability => self.network_stability,
            Dimension::SoftwareOptimization => self.software_optimization,
            Dimension::Durability => self.durability,
        }
    }

    fn slot(&mut self, dimension: Dimension) -> &mut f64 {
        match dimension {
            Dimension::CpuPerformance => &mut self.cpu_performance,
            Dimension::MemoryCapacity => &mut self.memory_capacity,
            Dimension::StorageSpeed => &mut self.storage_speed,
            Dimension::GpuPerformance => &mut self.gpu_performance,
            Dimension::CameraQuality => &mut self.camera_quality,
            Dimension::CameraFeatures => &mut self.camera_features,
            Dimension::BatteryCapacity => &mut self.battery_capacity,
            Dimension::ChargingSpeed => &mut self.charging_speed,
            Dimension::ScreenQuality => &mut self.screen_quality,
            Dimension::ScreenSize => &mut self.screen_size,
            Dimension::WeightPortability => &mut self.weight_portability,
            Dimension::SizePortability => &mut self.size_portability,
            Dimension::BuildQuality => &mut self.build_quality,
            Dimension::DesignAppeal => &mut self.design_appeal,
            Dimension::PriceValue => &mut self.price_value,
            Dimension::HeatControl => &mut self.heat_control,
            Dimension::NetworkStability => &mut self.network_stability,
            Dimension::SoftwareOptimization => &mut self.software_optimization,
            Dimension::Durability => &mut self.durability,
        }
    }

    /// Sets a component, clamped to `[0, 1]`. NaN becomes 0.
    pub fn set(&mut self, dimension: Dimension, value: f64) {
        *self.slot(dimension) = unit(value);
    }

    /// Raises a component to `value` if it is currently lower.
    pub fn raise(&mut self, dimension: Dimension, value: f64) {
        let slot = self.slot(dimension);
        *slot = slot.max(unit(value));
    }

    pub fn iter(&self) -> impl Iterator<Item = (Dimension, f64)> + '_ {
        Dimension::ALL.into_iter().map(move |dimension| (dimension, self.get(dimension)))
    }

    pub fn is_normalized(&self) -> bool {
        self.iter().all(|(_, value)| (0.0..=1.0).contains(&value))
    }

    /// Dimensions whose component strictly exceeds `threshold`, in canonical order.
    pub fn dimensions_above(&self, threshold: f64) -> Vec<Dimension> {
        self.iter()
            .filter(|(_, value)| *value > threshold)
            .map(|(dimension, _)| dimension)
            .collect()
    }
}

pub(crate) fn unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
