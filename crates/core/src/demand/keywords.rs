//! Keyword vocabularies that turn free text into dimension weights.

use super::text::contains_keyword;
use crate::domain::dimension::{Dimension, DimensionVector};

/// Every keyword present adds `increment` to the dimension's weight.
#[derive(Debug, Clone, Copy)]
pub struct KeywordRule {
    pub dimension: Dimension,
    pub increment: f64,
    pub keywords: &'static [&'static str],
}

/// Usage scenario: any trigger present lifts each bundled dimension to at
/// least its bundled weight.
#[derive(Debug, Clone, Copy)]
pub struct UsagePattern {
    pub name: &'static str,
    pub triggers: &'static [&'static str],
    pub bundle: &'static [(Dimension, f64)],
}

pub const KEYWORD_RULES: &[KeywordRule] = &[
    KeywordRule {
        dimension: Dimension::CpuPerformance,
        increment: 0.3,
        keywords: &[
            "性能", "处理器", "cpu", "游戏", "流畅", "快", "速度", "运行", "performance",
            "processor", "gaming", "fast", "speed",
        ],
    },
    KeywordRule {
        dimension: Dimension::MemoryCapacity,
        increment: 0.25,
        keywords: &["内存", "ram", "运行内存", "存储", "空间", "memory", "multitasking"],
    },
    KeywordRule {
        dimension: Dimension::StorageSpeed,
        increment: 0.25,
        keywords: &["存储", "空间", "容量", "速度", "快", "storage", "space"],
    },
    KeywordRule {
        dimension: Dimension::GpuPerformance,
        increment: 0.3,
        keywords: &["游戏", "显卡", "gpu", "图形", "画质", "gaming", "graphics"],
    },
    KeywordRule {
        dimension: Dimension::CameraQuality,
        increment: 0.35,
        keywords: &[
            "拍照", "摄影", "相机", "像素", "清晰", "画质", "照片", "camera", "photo", "photos",
            "photography", "megapixel",
        ],
    },
    KeywordRule {
        dimension: Dimension::CameraFeatures,
        increment: 0.3,
        keywords: &[
            "拍照", "摄影", "相机", "功能", "夜景", "人像", "广角", "night mode", "portrait",
            "zoom", "wide angle",
        ],
    },
    KeywordRule {
        dimension: Dimension::BatteryCapacity,
        increment: 0.35,
        keywords: &[
            "续航", "电池", "持久", "充电", "电量", "待机", "battery", "battery life", "standby",
        ],
    },
    KeywordRule {
        dimension: Dimension::ChargingSpeed,
        increment: 0.3,
        keywords: &[
            "充电", "快充", "充电速度", "充电器", "无线充电", "charging", "fast charging",
            "wireless charging",
        ],
    },
    KeywordRule {
        dimension: Dimension::ScreenQuality,
        increment: 0.3,
        keywords: &[
            "屏幕", "显示", "色彩", "分辨率", "画质", "清晰", "screen", "display", "resolution",
        ],
    },
    KeywordRule {
        dimension: Dimension::ScreenSize,
        increment: 0.25,
        keywords: &["屏幕", "尺寸", "大小", "显示", "big screen", "large screen", "screen size"],
    },
    KeywordRule {
        dimension: Dimension::WeightPortability,
        increment: 0.35,
        keywords: &[
            "轻薄", "便携", "重量", "携带", "轻", "重", "light", "lightweight", "portable",
            "weight",
        ],
    },
    KeywordRule {
        dimension: Dimension::SizePortability,
        increment: 0.3,
        keywords: &["轻薄", "便携", "尺寸", "大小", "携带", "compact", "small", "portable"],
    },
    KeywordRule {
        dimension: Dimension::BuildQuality,
        increment: 0.3,
        keywords: &[
            "做工", "质量", "耐用", "坚固", "材质", "手感", "build quality", "sturdy", "solid",
        ],
    },
    KeywordRule {
        dimension: Dimension::DesignAppeal,
        increment: 0.3,
        keywords: &[
            "外观", "设计", "颜值", "好看", "漂亮", "时尚", "design", "beautiful", "stylish",
            "looks",
        ],
    },
    KeywordRule {
        dimension: Dimension::PriceValue,
        increment: 0.4,
        keywords: &[
            "性价比", "便宜", "实惠", "预算", "价格", "贵", "cheap", "affordable", "budget",
            "price", "value for money",
        ],
    },
    KeywordRule {
        dimension: Dimension::HeatControl,
        increment: 0.25,
        keywords: &["散热", "发热", "温度", "冷却", "heat", "cooling", "overheating", "thermal"],
    },
    KeywordRule {
        dimension: Dimension::NetworkStability,
        increment: 0.25,
        keywords: &[
            "网络", "信号", "稳定", "连接", "5g", "4g", "network", "signal", "connectivity",
        ],
    },
    KeywordRule {
        dimension: Dimension::SoftwareOptimization,
        increment: 0.3,
        keywords: &["系统", "软件", "优化", "流畅", "卡顿", "体验", "software", "system", "smooth"],
    },
    KeywordRule {
        dimension: Dimension::Durability,
        increment: 0.25,
        keywords: &[
            "耐用", "质量", "坚固", "寿命", "长期", "durable", "durability", "long lasting",
        ],
    },
];

pub const USAGE_PATTERNS: &[UsagePattern] = &[
    UsagePattern {
        name: "gaming",
        triggers: &[
            "游戏", "电竞", "王者", "吃鸡", "手游", "原神", "gaming", "game", "games", "esports",
        ],
        bundle: &[
            (Dimension::CpuPerformance, 0.8),
            (Dimension::GpuPerformance, 0.8),
            (Dimension::MemoryCapacity, 0.6),
            (Dimension::HeatControl, 0.7),
            (Dimension::BatteryCapacity, 0.6),
        ],
    },
    UsagePattern {
        name: "photography",
        triggers: &["拍照", "摄影", "相机", "照片", "photo", "photos", "photography", "camera"],
        bundle: &[
            (Dimension::CameraQuality, 0.9),
            (Dimension::CameraFeatures, 0.9),
            (Dimension::ScreenQuality, 0.7),
            (Dimension::StorageSpeed, 0.6),
        ],
    },
    UsagePattern {
        name: "business",
        triggers: &["商务", "办公", "工作", "会议", "邮件", "business", "office", "work", "email"],
        bundle: &[
            (Dimension::BatteryCapacity, 0.8),
            (Dimension::NetworkStability, 0.8),
            (Dimension::SoftwareOptimization, 0.7),
            (Dimension::Durability, 0.7),
        ],
    },
    UsagePattern {
        name: "portable",
        triggers: &["轻薄", "便携", "携带", "轻便", "小巧", "portable", "lightweight", "compact"],
        bundle: &[
            (Dimension::WeightPortability, 0.9),
            (Dimension::SizePortability, 0.9),
            (Dimension::BatteryCapacity, 0.6),
        ],
    },
    UsagePattern {
        name: "budget",
        triggers: &["便宜", "实惠", "性价比", "预算", "经济", "cheap", "affordable", "budget"],
        bundle: &[
            (Dimension::PriceValue, 0.9),
            (Dimension::BatteryCapacity, 0.6),
            (Dimension::Durability, 0.6),
        ],
    },
];

/// Sums keyword increments per dimension, capped at 1.0.
pub fn keyword_weights(lowered: &str) -> DimensionVector {
    let mut weights = DimensionVector::default();
    for rule in KEYWORD_RULES {
        let hits =
            rule.keywords.iter().filter(|keyword| contains_keyword(lowered, keyword)).count();
        weights.set(rule.dimension, rule.increment * hits as f64);
    }
    weights
}

/// Merges every triggered usage bundle into `weights`; returns the names of
/// the patterns that fired.
pub fn apply_usage_patterns(weights: &mut DimensionVector, lowered: &str) -> Vec<&'static str> {
    let mut fired = Vec::new();
    for pattern in USAGE_PATTERNS {
        if !pattern.triggers.iter().any(|trigger| contains_keyword(lowered, trigger)) {
            continue;
        }
        for (dimension, weight) in pattern.bundle {
            weights.raise(*dimension, *weight);
        }
        fired.push(pattern.name);
    }
    fired
}
