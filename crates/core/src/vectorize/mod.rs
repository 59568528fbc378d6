//! Phone vectorizer: raw catalog records to normalized capability profiles.
//!
//! Primary dimensions come straight from lookup tables. Secondary
//! dimensions are heuristics over primary scores, brand and price. Nothing
//! here can fail; every component is clamped to `[0, 1]`.

pub mod cache;
pub mod pricing;
pub mod tables;

use std::sync::Arc;

use crate::domain::budget::BudgetDescriptor;
use crate::domain::dimension::{Dimension, PerformanceVector};
use crate::domain::phone::{Brand, CatalogItem};

pub use cache::{VectorCache, VectorKey};
pub use pricing::PrimaryScores;
pub use tables::{ScoreTables, Step, StepTable, UNKNOWN_CPU_SCORE};

const PREFERRED_SCREEN_INCH: f64 = 6.4;
const SCREEN_DISTANCE_PENALTY: f64 = 0.35;
const SCREEN_SIZE_FLOOR: f64 = 0.3;
const AUXILIARY_SCALE: f64 = 5.0;

#[derive(Clone, Debug)]
pub struct PhoneVectorizer {
    tables: Arc<ScoreTables>,
}

impl Default for PhoneVectorizer {
    fn default() -> Self {
        Self::new()
    }
}

impl PhoneVectorizer {
    pub fn new() -> Self {
        Self { tables: ScoreTables::builtin() }
    }

    pub fn vectorize(
        &self,
        item: &CatalogItem,
        budget: Option<&BudgetDescriptor>,
    ) -> PerformanceVector {
        let brand = item.brand();
        let primary = PrimaryScores {
            cpu: self.tables.cpu_score(&item.cpu),
            memory: self.tables.memory.score(f64::from(item.ram_gb)),
            storage: self.tables.storage.score(f64::from(item.storage_gb)),
            battery: self.tables.battery.score(f64::from(item.battery_mah)),
            camera: self.tables.camera.score(f64::from(item.camera_mp)),
        };

        let mut vector = PerformanceVector::default();
        vector.set(Dimension::CpuPerformance, primary.cpu);
        vector.set(Dimension::MemoryCapacity, primary.memory);
        vector.set(Dimension::StorageSpeed, primary.storage);
        vector.set(Dimension::BatteryCapacity, primary.battery);
        vector.set(Dimension::CameraQuality, primary.camera);

        vector.set(Dimension::GpuPerformance, primary.cpu * 0.9);
        vector.set(Dimension::CameraFeatures, primary.camera + camera_feature_bonus(brand));
        vector.set(Dimension::ChargingSpeed, charging_speed(brand));
        vector.set(Dimension::ScreenQuality, screen_quality(brand));
        vector.set(Dimension::BuildQuality, build_quality(brand, item.price));
        vector.set(Dimension::DesignAppeal, design_appeal(brand, item.price));
        vector.set(
            Dimension::HeatControl,
            blend_auxiliary(heat_control(brand, primary.cpu), item.heat_control),
        );
        vector.set(
            Dimension::NetworkStability,
            blend_auxiliary(network_stability(brand), item.network_stability),
        );
        vector.set(Dimension::SoftwareOptimization, software_optimization(brand));
        vector.set(Dimension::Durability, durability(brand, item.price));

        vector.set(Dimension::ScreenSize, screen_size(item.screen_size_inch));
        vector.set(
            Dimension::WeightPortability,
            self.tables.weight.score(f64::from(item.weight_g)),
        );
        vector.set(Dimension::SizePortability, self.tables.size.score(item.screen_size_inch));

        vector.set(Dimension::PriceValue, pricing::price_value(item.price, &primary, budget));
        vector
    }
}

fn camera_feature_bonus(brand: Brand) -> f64 {
    match brand {
        Brand::Apple => 0.10,
        Brand::Samsung | Brand::Huawei => 0.08,
        _ => 0.0,
    }
}

fn charging_speed(brand: Brand) -> f64 {
    match brand {
        Brand::Apple => 0.6,
        Brand::Huawei => 0.85,
        Brand::Xiaomi | Brand::Oppo | Brand::OnePlus => 0.9,
        _ => 0.7,
    }
}

fn screen_quality(brand: Brand) -> f64 {
    match brand {
        Brand::Samsung => 0.95,
        Brand::Apple => 0.9,
        Brand::Huawei => 0.85,
        _ => 0.8,
    }
}

fn build_quality(brand: Brand, price: f64) -> f64 {
    let base = match brand {
        Brand::Apple => 0.95,
        Brand::Samsung => 0.9,
        Brand::Huawei => 0.85,
        _ => 0.8,
    };
    if price > 8000.0 {
        base + 0.1
    } else if price > 0.0 && price < 2000.0 {
        base - 0.1
    } else {
        base
    }
}

fn design_appeal(brand: Brand, price: f64) -> f64 {
    let base = match brand {
        Brand::Apple => 0.9,
        Brand::Samsung => 0.85,
        _ => 0.8,
    };
    if price > 6000.0 {
        base + 0.1
    } else {
        base
    }
}

fn heat_control(brand: Brand, cpu: f64) -> f64 {
    let mut score = 0.7;
    if cpu > 0.9 {
        score -= 0.1;
    } else if cpu < 0.7 {
        score += 0.1;
    }
    match brand {
        Brand::Apple => score + 0.1,
        Brand::Samsung => score + 0.05,
        _ => score,
    }
}

fn network_stability(brand: Brand) -> f64 {
    match brand {
        Brand::Apple => 0.9,
        Brand::Huawei => 0.85,
        _ => 0.8,
    }
}

fn software_optimization(brand: Brand) -> f64 {
    match brand {
        Brand::Apple => 0.95,
        Brand::Huawei => 0.85,
        _ => 0.8,
    }
}

fn durability(brand: Brand, price: f64) -> f64 {
    let base = match brand {
        Brand::Apple => 0.9,
        Brand::Samsung => 0.85,
        _ => 0.8,
    };
    if price > 6000.0 {
        base + 0.1
    } else {
        base
    }
}

/// Equal blend of a heuristic with a catalog-supplied 1..5 rating.
fn blend_auxiliary(heuristic: f64, auxiliary: f64) -> f64 {
    let auxiliary = (auxiliary / AUXILIARY_SCALE).clamp(0.0, 1.0);
    heuristic * 0.5 + auxiliary * 0.5
}

fn screen_size(inches: f64) -> f64 {
    if !(inches > 0.0) {
        return SCREEN_SIZE_FLOOR;
    }
    (1.0 - (inches - PREFERRED_SCREEN_INCH).abs() * SCREEN_DISTANCE_PENALTY)
        .clamp(SCREEN_SIZE_FLOOR, 1.0)
}
