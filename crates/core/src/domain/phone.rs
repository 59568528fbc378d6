use serde::{Deserialize, Serialize};

use super::dimension::Dimension;

/// Raw catalog record for one phone, as supplied by the storage layer.
///
/// Every field has a default so partially filled records still deserialize;
/// a zero capacity is treated as "absent" by the vectorizer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogItem {
    pub name: String,
    pub cpu: String,
    pub ram_gb: u32,
    pub storage_gb: u32,
    pub screen_size_inch: f64,
    pub camera_mp: u32,
    pub battery_mah: u32,
    pub weight_g: u32,
    pub price: f64,
    pub rating: f64,
    pub sales: u64,
    /// Auxiliary heat control score in `[1, 5]`.
    pub heat_control: f64,
    /// Auxiliary network stability score in `[1, 5]`.
    pub network_stability: f64,
    pub highlights: Vec<String>,
}

pub const DEFAULT_AUXILIARY_SCORE: f64 = 3.0;

impl Default for CatalogItem {
    fn default() -> Self {
        Self {
            name: String::new(),
            cpu: String::new(),
            ram_gb: 0,
            storage_gb: 0,
            screen_size_inch: 0.0,
            camera_mp: 0,
            battery_mah: 0,
            weight_g: 0,
            price: 0.0,
            rating: 0.0,
            sales: 0,
            heat_control: DEFAULT_AUXILIARY_SCORE,
            network_stability: DEFAULT_AUXILIARY_SCORE,
            highlights: Vec::new(),
        }
    }
}

impl CatalogItem {
    /// Raw spec value compared against explicit numeric requirements.
    ///
    /// Dimensions without a raw counterpart report `0.0`.
    pub fn raw_value(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::StorageSpeed => f64::from(self.storage_gb),
            Dimension::MemoryCapacity => f64::from(self.ram_gb),
            Dimension::ScreenSize => self.screen_size_inch,
            Dimension::BatteryCapacity => f64::from(self.battery_mah),
            Dimension::CameraQuality => f64::from(self.camera_mp),
            Dimension::PriceValue => self.price,
            _ => 0.0,
        }
    }

    pub fn brand(&self) -> Brand {
        Brand::detect(&self.name)
    }

    /// Structural identity used for vector caching: every field the
    /// vectorizer reads, floats compared by bit pattern.
    pub fn identity(&self) -> ItemIdentity {
        ItemIdentity {
            name: self.name.clone(),
            cpu: self.cpu.clone(),
            ram_gb: self.ram_gb,
            storage_gb: self.storage_gb,
            camera_mp: self.camera_mp,
            battery_mah: self.battery_mah,
            weight_g: self.weight_g,
            screen_size_bits: self.screen_size_inch.to_bits(),
            price_bits: self.price.to_bits(),
            heat_control_bits: self.heat_control.to_bits(),
            network_stability_bits: self.network_stability.to_bits(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ItemIdentity {
    pub name: String,
    pub cpu: String,
    pub ram_gb: u32,
    pub storage_gb: u32,
    pub camera_mp: u32,
    pub battery_mah: u32,
    pub weight_g: u32,
    screen_size_bits: u64,
    price_bits: u64,
    heat_control_bits: u64,
    network_stability_bits: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Brand {
    Apple,
    Samsung,
    Huawei,
    Xiaomi,
    Oppo,
    OnePlus,
    Vivo,
    Other,
}

const BRAND_ALIASES: &[(Brand, &[&str])] = &[
    (Brand::Apple, &["iphone", "apple", "苹果"]),
    (Brand::Samsung, &["samsung", "galaxy", "三星"]),
    (Brand::Huawei, &["huawei", "华为"]),
    (Brand::Xiaomi, &["xiaomi", "redmi", "小米", "红米"]),
    (Brand::OnePlus, &["oneplus", "一加"]),
    (Brand::Oppo, &["oppo"]),
    (Brand::Vivo, &["vivo", "iqoo"]),
];

impl Brand {
    /// Detects the brand from a product name. Unrecognized names are `Other`.
    pub fn detect(name: &str) -> Self {
        let lower = name.to_lowercase();
        BRAND_ALIASES
            .iter()
            .find(|(_, aliases)| aliases.iter().any(|alias| lower.contains(alias)))
            .map(|(brand, _)| *brand)
            .unwrap_or(Brand::Other)
    }
}

#[cfg(test)]
mod tests {
    use super::{Brand, CatalogItem, DEFAULT_AUXILIARY_SCORE};
    use crate::domain::dimension::Dimension;

    #[test]
    fn detects_brands_from_english_and_chinese_names() {
        assert_eq!(Brand::detect("iPhone 14 Pro"), Brand::Apple);
        assert_eq!(Brand::detect("华为Mate 60"), Brand::Huawei);
        assert_eq!(Brand::detect("Redmi K60"), Brand::Xiaomi);
        assert_eq!(Brand::detect("小米13 Ultra"), Brand::Xiaomi);
        assert_eq!(Brand::detect("一加11"), Brand::OnePlus);
        assert_eq!(Brand::detect("OPPO Find X6"), Brand::Oppo);
        assert_eq!(Brand::detect("Galaxy S23"), Brand::Samsung);
        assert_eq!(Brand::detect("Nokia 3310"), Brand::Other);
    }

    #[test]
    fn partial_json_records_fill_defaults() {
        let item: CatalogItem =
            serde_json::from_str(r#"{"name":"Bare","price":1999}"#).expect("valid record");

        assert_eq!(item.name, "Bare");
        assert_eq!(item.price, 1999.0);
        assert_eq!(item.ram_gb, 0);
        assert_eq!(item.heat_control, DEFAULT_AUXILIARY_SCORE);
        assert!(item.highlights.is_empty());
    }

    #[test]
    fn raw_values_follow_dimension_mapping() {
        let item = CatalogItem {
            storage_gb: 256,
            ram_gb: 8,
            screen_size_inch: 6.1,
            battery_mah: 5000,
            camera_mp: 50,
            price: 3999.0,
            ..CatalogItem::default()
        };

        assert_eq!(item.raw_value(Dimension::StorageSpeed), 256.0);
        assert_eq!(item.raw_value(Dimension::MemoryCapacity), 8.0);
        assert_eq!(item.raw_value(Dimension::ScreenSize), 6.1);
        assert_eq!(item.raw_value(Dimension::BatteryCapacity), 5000.0);
        assert_eq!(item.raw_value(Dimension::CameraQuality), 50.0);
        assert_eq!(item.raw_value(Dimension::PriceValue), 3999.0);
        assert_eq!(item.raw_value(Dimension::Durability), 0.0);
    }

    #[test]
    fn identity_distinguishes_storage_variants() {
        let base =
            CatalogItem { name: "iPhone 14".to_owned(), storage_gb: 128, ..Default::default() };
        let bigger = CatalogItem { storage_gb: 256, ..base.clone() };
        assert_ne!(base.identity(), bigger.identity());
        assert_eq!(base.identity(), base.clone().identity());
    }

    #[test]
    fn identity_covers_every_vectorized_field() {
        let base =
            CatalogItem { name: "Model".to_owned(), battery_mah: 3000, ..Default::default() };
        let variants = [
            CatalogItem { battery_mah: 6000, ..base.clone() },
            CatalogItem { camera_mp: 108, ..base.clone() },
            CatalogItem { weight_g: 230, ..base.clone() },
            CatalogItem { screen_size_inch: 6.7, ..base.clone() },
            CatalogItem { heat_control: 4.5, ..base.clone() },
            CatalogItem { network_stability: 1.5, ..base.clone() },
        ];
        for variant in &variants {
            assert_ne!(base.identity(), variant.identity(), "{variant:?}");
        }

        let relabelled = CatalogItem { rating: 4.9, sales: 10, ..base.clone() };
        assert_eq!(base.identity(), relabelled.identity());
    }
}
