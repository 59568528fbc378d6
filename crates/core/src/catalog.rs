//! Catalog loading and the bundled sample data set.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::domain::phone::CatalogItem;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("could not read catalog file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Reads a JSON array of catalog records from disk.
pub fn load_catalog(path: &Path) -> Result<Vec<CatalogItem>, CatalogError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| CatalogError::ReadFile { path: path.to_path_buf(), source })?;
    parse_catalog(&raw)
}

pub fn parse_catalog(raw: &str) -> Result<Vec<CatalogItem>, CatalogError> {
    Ok(serde_json::from_str(raw)?)
}

struct PhoneSeed {
    name: &'static str,
    cpu: &'static str,
    ram_gb: u32,
    storage_gb: u32,
    screen_size_inch: f64,
    camera_mp: u32,
    battery_mah: u32,
    weight_g: u32,
    price: f64,
    highlights: &'static [&'static str],
    rating: f64,
    sales: u64,
    heat_control: f64,
    network_stability: f64,
}

impl PhoneSeed {
    fn to_item(&self) -> CatalogItem {
        CatalogItem {
            name: self.name.to_string(),
            cpu: self.cpu.to_string(),
            ram_gb: self.ram_gb,
            storage_gb: self.storage_gb,
            screen_size_inch: self.screen_size_inch,
            camera_mp: self.camera_mp,
            battery_mah: self.battery_mah,
            weight_g: self.weight_g,
            price: self.price,
            rating: self.rating,
            sales: self.sales,
            heat_control: self.heat_control,
            network_stability: self.network_stability,
            highlights: self.highlights.iter().map(|h| (*h).to_string()).collect(),
        }
    }
}

const SAMPLE_PHONES: &[PhoneSeed] = &[
    PhoneSeed {
        name: "小米13",
        cpu: "骁龙8 Gen2",
        ram_gb: 12,
        storage_gb: 256,
        screen_size_inch: 6.36,
        camera_mp: 50,
        battery_mah: 4500,
        weight_g: 189,
        price: 3999.0,
        highlights: &["轻薄", "高性能", "快充"],
        rating: 4.7,
        sales: 12000,
        heat_control: 4.0,
        network_stability: 4.2,
    },
    PhoneSeed {
        name: "iPhone 14",
        cpu: "A15",
        ram_gb: 6,
        storage_gb: 128,
        screen_size_inch: 6.1,
        camera_mp: 12,
        battery_mah: 3279,
        weight_g: 172,
        price: 5999.0,
        highlights: &["影像", "系统流畅", "品牌"],
        rating: 4.8,
        sales: 20000,
        heat_control: 4.5,
        network_stability: 3.5,
    },
    PhoneSeed {
        name: "华为P60",
        cpu: "骁龙8+ Gen1",
        ram_gb: 8,
        storage_gb: 256,
        screen_size_inch: 6.67,
        camera_mp: 48,
        battery_mah: 4815,
        weight_g: 197,
        price: 4999.0,
        highlights: &["拍照", "续航", "快充"],
        rating: 4.6,
        sales: 15000,
        heat_control: 4.2,
        network_stability: 4.8,
    },
    PhoneSeed {
        name: "OPPO Find X6",
        cpu: "天玑9200",
        ram_gb: 12,
        storage_gb: 256,
        screen_size_inch: 6.74,
        camera_mp: 50,
        battery_mah: 4800,
        weight_g: 207,
        price: 4499.0,
        highlights: &["影像", "快充", "大屏"],
        rating: 4.5,
        sales: 8000,
        heat_control: 3.8,
        network_stability: 4.1,
    },
    PhoneSeed {
        name: "vivo X90",
        cpu: "天玑9200",
        ram_gb: 8,
        storage_gb: 128,
        screen_size_inch: 6.78,
        camera_mp: 50,
        battery_mah: 4810,
        weight_g: 200,
        price: 3999.0,
        highlights: &["拍照", "快充", "大屏"],
        rating: 4.4,
        sales: 10000,
        heat_control: 3.9,
        network_stability: 4.0,
    },
    PhoneSeed {
        name: "一加11",
        cpu: "骁龙8 Gen2",
        ram_gb: 16,
        storage_gb: 256,
        screen_size_inch: 6.7,
        camera_mp: 50,
        battery_mah: 5000,
        weight_g: 205,
        price: 3999.0,
        highlights: &["性能", "快充", "大内存"],
        rating: 4.6,
        sales: 6000,
        heat_control: 4.3,
        network_stability: 4.3,
    },
    PhoneSeed {
        name: "Redmi K60",
        cpu: "骁龙8+ Gen1",
        ram_gb: 12,
        storage_gb: 256,
        screen_size_inch: 6.67,
        camera_mp: 64,
        battery_mah: 5500,
        weight_g: 204,
        price: 2499.0,
        highlights: &["性价比", "续航", "快充"],
        rating: 4.3,
        sales: 18000,
        heat_control: 3.5,
        network_stability: 3.8,
    },
    PhoneSeed {
        name: "iPhone 14 Pro",
        cpu: "A16",
        ram_gb: 6,
        storage_gb: 128,
        screen_size_inch: 6.1,
        camera_mp: 48,
        battery_mah: 3200,
        weight_g: 206,
        price: 7999.0,
        highlights: &["影像", "性能", "品牌"],
        rating: 4.9,
        sales: 25000,
        heat_control: 4.6,
        network_stability: 3.6,
    },
    PhoneSeed {
        name: "小米13 Ultra",
        cpu: "骁龙8 Gen2",
        ram_gb: 16,
        storage_gb: 512,
        screen_size_inch: 6.73,
        camera_mp: 50,
        battery_mah: 5000,
        weight_g: 227,
        price: 5999.0,
        highlights: &["影像", "性能", "大存储"],
        rating: 4.7,
        sales: 5000,
        heat_control: 4.4,
        network_stability: 4.4,
    },
    PhoneSeed {
        name: "华为Mate 60",
        cpu: "麒麟9000S",
        ram_gb: 12,
        storage_gb: 256,
        screen_size_inch: 6.69,
        camera_mp: 50,
        battery_mah: 4750,
        weight_g: 209,
        price: 6999.0,
        highlights: &["拍照", "续航", "品牌", "信号"],
        rating: 4.8,
        sales: 12000,
        heat_control: 4.1,
        network_stability: 5.0,
    },
    PhoneSeed {
        name: "OPPO Reno 10",
        cpu: "骁龙778G",
        ram_gb: 8,
        storage_gb: 128,
        screen_size_inch: 6.7,
        camera_mp: 64,
        battery_mah: 4600,
        weight_g: 180,
        price: 2499.0,
        highlights: &["轻薄", "拍照", "性价比"],
        rating: 4.2,
        sales: 15000,
        heat_control: 3.7,
        network_stability: 3.9,
    },
    PhoneSeed {
        name: "vivo S17",
        cpu: "骁龙778G",
        ram_gb: 8,
        storage_gb: 128,
        screen_size_inch: 6.78,
        camera_mp: 50,
        battery_mah: 4600,
        weight_g: 186,
        price: 2299.0,
        highlights: &["轻薄", "拍照", "颜值"],
        rating: 4.3,
        sales: 12000,
        heat_control: 3.8,
        network_stability: 4.0,
    },
];

/// The twelve-phone demo catalog, in a fixed order.
pub fn sample_catalog() -> Vec<CatalogItem> {
    SAMPLE_PHONES.iter().map(PhoneSeed::to_item).collect()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::{load_catalog, parse_catalog, sample_catalog, CatalogError};

    #[test]
    fn sample_catalog_has_twelve_distinct_phones() {
        let catalog = sample_catalog();
        assert_eq!(catalog.len(), 12);

        let mut names: Vec<_> = catalog.iter().map(|item| item.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 12);
        assert!(catalog.iter().all(|item| item.price > 0.0 && item.storage_gb > 0));
    }

    #[test]
    fn parses_partial_records() {
        let items = parse_catalog(r#"[{"name":"Alpha","storage_gb":256},{"name":"Beta"}]"#)
            .expect("valid catalog");
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].storage_gb, 256);
        assert_eq!(items[1].storage_gb, 0);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let error = parse_catalog("{not json").expect_err("should fail");
        assert!(matches!(error, CatalogError::Parse(_)));
    }

    #[test]
    fn missing_file_reports_path() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("absent.json");
        let error = load_catalog(&path).expect_err("should fail");
        assert!(matches!(error, CatalogError::ReadFile { path: ref p, .. } if *p == path));
    }

    #[test]
    fn sample_catalog_roundtrips_through_a_file() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("catalog.json");
        let catalog = sample_catalog();
        fs::write(&path, serde_json::to_string(&catalog).expect("serialize")).expect("write");

        assert_eq!(load_catalog(&path).expect("load"), catalog);
    }
}
