//! Explicit numeric requirements ("256G存储", "at least 5000mAh").
//!
//! Extraction is table driven. Range rules run before exact rules and the
//! text they match is consumed, so "128-256G存储" never also yields an
//! exact 256 GB requirement. Only the first hit per category is kept.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::text::{clause_start, keyword_spans, overlaps};
use crate::domain::dimension::Dimension;
use crate::domain::requirement::{RequirementType, SpecificRequirement, Unit};

/// Prices below this are treated as noise ("至少8个" is not a budget).
pub const MIN_PLAUSIBLE_PRICE: f64 = 100.0;

/// Tolerance given to requirements qualified by a comparison word.
pub const COMPARISON_TOLERANCE: f64 = 0.1;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    Storage,
    Memory,
    ScreenSize,
    Battery,
    Camera,
    Price,
}

impl Category {
    pub fn dimension(self) -> Dimension {
        match self {
            Self::Storage => Dimension::StorageSpeed,
            Self::Memory => Dimension::MemoryCapacity,
            Self::ScreenSize => Dimension::ScreenSize,
            Self::Battery => Dimension::BatteryCapacity,
            Self::Camera => Dimension::CameraQuality,
            Self::Price => Dimension::PriceValue,
        }
    }

    pub fn unit(self) -> Unit {
        match self {
            Self::Storage | Self::Memory => Unit::Gigabytes,
            Self::ScreenSize => Unit::Inches,
            Self::Battery => Unit::MilliampHours,
            Self::Camera => Unit::Megapixels,
            Self::Price => Unit::Yuan,
        }
    }

    /// Tolerance of a plain exact hit in this category.
    pub fn exact_tolerance(self) -> f64 {
        match self {
            Self::Storage | Self::Memory => 0.0,
            Self::ScreenSize | Self::Camera => 0.1,
            Self::Battery => 0.05,
            Self::Price => 0.2,
        }
    }

    fn accepts(self, value: f64) -> bool {
        match self {
            Self::Price => value >= MIN_PLAUSIBLE_PRICE,
            _ => value > 0.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RuleKind {
    /// Two captures, the bounds of a range.
    Range,
    /// One capture, a single value.
    Exact,
}

#[derive(Debug, Clone, Copy)]
pub struct ExtractionRule {
    pub name: &'static str,
    pub category: Category,
    pub kind: RuleKind,
    /// Matched against lowercased text.
    pub pattern: &'static str,
    /// Multiplier applied to captured numbers (万像素 to MP, TB to GB).
    pub scale: f64,
    /// A phrase this rule must recognize.
    pub sample: &'static str,
}

pub const EXTRACTION_RULES: &[ExtractionRule] = &[
    ExtractionRule {
        name: "price_range_currency",
        category: Category::Price,
        kind: RuleKind::Range,
        pattern: r"(\d+)\s*(?:-|~|～|到|至)\s*(\d+)\s*(?:元|块|yuan|rmb)",
        scale: 1.0,
        sample: "3000-4000元",
    },
    ExtractionRule {
        name: "price_range_budget_prefix",
        category: Category::Price,
        kind: RuleKind::Range,
        pattern: concat!(
            r"(?:预算|budget)\s*(?:在|是|为|of|is)?\s*[$¥]?(\d+)",
            r"\s*(?:-|~|～|到|至|to)\s*[$¥]?(\d+)",
        ),
        scale: 1.0,
        sample: "预算3000到4000",
    },
    ExtractionRule {
        name: "price_range_budget_suffix",
        category: Category::Price,
        kind: RuleKind::Range,
        pattern: r"(\d+)\s*(?:-|~|～|到|至)\s*(\d+)\s*(?:的)?预算",
        scale: 1.0,
        sample: "3000-4000的预算",
    },
    ExtractionRule {
        name: "price_range_between",
        category: Category::Price,
        kind: RuleKind::Range,
        pattern: r"between\s*[$¥]?\s*(\d+)\s*and\s*[$¥]?\s*(\d+)",
        scale: 1.0,
        sample: "between 3000 and 4000",
    },
    ExtractionRule {
        name: "storage_range_suffix",
        category: Category::Storage,
        kind: RuleKind::Range,
        pattern: concat!(
            r"(\d+)\s*(?:gb?)?\s*(?:-|~|～|到|至|to)\s*(\d+)",
            r"\s*gb?\s*(?:的)?(?:存储|空间|storage)",
        ),
        scale: 1.0,
        sample: "128-256g存储",
    },
    ExtractionRule {
        name: "storage_range_prefix",
        category: Category::Storage,
        kind: RuleKind::Range,
        pattern: r"(?:存储|storage)\s*(\d+)\s*(?:gb?)?\s*(?:-|~|～|到|至|to)\s*(\d+)\s*gb?",
        scale: 1.0,
        sample: "存储128到256g",
    },
    ExtractionRule {
        name: "storage_suffix",
        category: Category::Storage,
        kind: RuleKind::Exact,
        pattern: r"(\d+)\s*gb?\s*(?:的)?(?:存储|空间|容量|of\s+storage|storage)",
        scale: 1.0,
        sample: "256g存储",
    },
    ExtractionRule {
        name: "storage_terabytes",
        category: Category::Storage,
        kind: RuleKind::Exact,
        pattern: r"(\d+)\s*tb?\s*(?:的)?(?:存储|空间|容量|of\s+storage|storage)",
        scale: 1024.0,
        sample: "1tb存储",
    },
    ExtractionRule {
        name: "storage_prefix",
        category: Category::Storage,
        kind: RuleKind::Exact,
        pattern: r"(?:存储|storage)\s*(\d+)\s*g",
        scale: 1.0,
        sample: "存储256g",
    },
    ExtractionRule {
        name: "storage_phone",
        category: Category::Storage,
        kind: RuleKind::Exact,
        pattern: r"(\d+)\s*gb?\s*的手机",
        scale: 1.0,
        sample: "256g的手机",
    },
    ExtractionRule {
        name: "memory_suffix",
        category: Category::Memory,
        kind: RuleKind::Exact,
        pattern: r"(\d+)\s*gb?\s*(?:的)?(?:运行内存|内存|of\s+ram|ram|of\s+memory|memory)",
        scale: 1.0,
        sample: "8g内存",
    },
    ExtractionRule {
        name: "memory_prefix",
        category: Category::Memory,
        kind: RuleKind::Exact,
        pattern: r"(?:运行内存|内存|ram)\s*(\d+)\s*g",
        scale: 1.0,
        sample: "内存12g",
    },
    ExtractionRule {
        name: "screen_inches_cn",
        category: Category::ScreenSize,
        kind: RuleKind::Exact,
        pattern: r"(\d+(?:\.\d+)?)\s*(?:英寸|寸)",
        scale: 1.0,
        sample: "6.7寸屏幕",
    },
    ExtractionRule {
        name: "screen_inches_en",
        category: Category::ScreenSize,
        kind: RuleKind::Exact,
        pattern: r"(\d+(?:\.\d+)?)\s*-?\s*inch",
        scale: 1.0,
        sample: "6.1 inch screen",
    },
    ExtractionRule {
        name: "battery_mah",
        category: Category::Battery,
        kind: RuleKind::Exact,
        pattern: r"(\d+)\s*(?:mah|毫安)",
        scale: 1.0,
        sample: "5000mah电池",
    },
    ExtractionRule {
        name: "camera_megapixels",
        category: Category::Camera,
        kind: RuleKind::Exact,
        pattern: r"(\d+)\s*(?:mp|megapixels?|百万像素)",
        scale: 1.0,
        sample: "50mp摄像头",
    },
    ExtractionRule {
        name: "camera_wan_pixels",
        category: Category::Camera,
        kind: RuleKind::Exact,
        pattern: r"(\d+)\s*万像素",
        scale: 0.01,
        sample: "5000万像素",
    },
    ExtractionRule {
        name: "price_bound_suffix",
        category: Category::Price,
        kind: RuleKind::Exact,
        pattern: r"(\d+)\s*(?:元|块)?\s*(?:以内|以下|以上)",
        scale: 1.0,
        sample: "3000元以内",
    },
    ExtractionRule {
        name: "price_approximately_suffix",
        category: Category::Price,
        kind: RuleKind::Exact,
        pattern: r"(\d+)\s*(?:元|块)\s*(?:左右|上下)",
        scale: 1.0,
        sample: "3000元左右",
    },
    ExtractionRule {
        name: "price_approximately_prefix",
        category: Category::Price,
        kind: RuleKind::Exact,
        pattern: r"(?:大约|大概|差不多)\s*(\d+)\s*(?:元|块)",
        scale: 1.0,
        sample: "大约3000块",
    },
    ExtractionRule {
        name: "price_labelled",
        category: Category::Price,
        kind: RuleKind::Exact,
        pattern: r"价格\s*(\d+)",
        scale: 1.0,
        sample: "价格2999元",
    },
    ExtractionRule {
        name: "price_phone",
        category: Category::Price,
        kind: RuleKind::Exact,
        pattern: r"(\d+)\s*(?:元|块)\s*(?:的)?手机",
        scale: 1.0,
        sample: "3000元的手机",
    },
    ExtractionRule {
        name: "price_around_currency",
        category: Category::Price,
        kind: RuleKind::Exact,
        pattern: r"(?:around|about|roughly)\s*[$¥]\s*(\d+)",
        scale: 1.0,
        sample: "around $600",
    },
    ExtractionRule {
        name: "price_around_named",
        category: Category::Price,
        kind: RuleKind::Exact,
        pattern: r"(?:around|about|roughly)\s*(\d+)\s*(?:yuan|rmb|dollars?)",
        scale: 1.0,
        sample: "about 3000 yuan",
    },
];

const MINIMUM_WORDS: &[&str] = &[
    "至少", "最少", "最低", "不低于", "不少于", "不小于", "大于等于", ">=", "≥", "at least",
    "minimum", "min", "no less than", "more than", "above", "over",
];

const MAXIMUM_WORDS: &[&str] = &[
    "最多", "最高", "不超过", "不高于", "不大于", "小于等于", "低于", "<=", "≤", "at most",
    "maximum", "max", "no more than", "under", "below", "less than", "within", "up to",
];

/// Comparison words that follow the quantity they bound ("5000mah以上").
const POSTFIX_WORDS: &[(&str, RequirementType)] = &[
    ("以内", RequirementType::Maximum),
    ("以下", RequirementType::Maximum),
    ("or less", RequirementType::Maximum),
    ("以上", RequirementType::Minimum),
    ("or more", RequirementType::Minimum),
];

const CURRENCY_WORDS: &[&str] = &["元", "块", "yuan", "rmb", "dollar"];

struct CompiledRule {
    rule: &'static ExtractionRule,
    regex: Regex,
}

static COMPILED_RULES: LazyLock<Vec<CompiledRule>> = LazyLock::new(|| {
    EXTRACTION_RULES
        .iter()
        .map(|rule| CompiledRule {
            rule,
            regex: Regex::new(rule.pattern).expect("valid extraction pattern"),
        })
        .collect()
});

static BARE_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:[$¥]\s*)?(\d+(?:\.\d+)?)(\s*(?:元|块|yuan|rmb|dollars?))?")
        .expect("valid bare number pattern")
});

/// Comparison word occurrence: `(start, end, kind)`.
type Comparison = (usize, usize, RequirementType);

fn comparisons(lowered: &str) -> Vec<Comparison> {
    let mut found: Vec<Comparison> = MINIMUM_WORDS
        .iter()
        .map(|word| (word, RequirementType::Minimum))
        .chain(MAXIMUM_WORDS.iter().map(|word| (word, RequirementType::Maximum)))
        .flat_map(|(word, kind)| keyword_spans(lowered, word).map(move |(s, e)| (s, e, kind)))
        .collect();
    // Earliest first; among words sharing an end, the longest ("no less than"
    // over "less than").
    found.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));
    found
}

/// Comparison closest before `position` within the same clause.
fn comparison_before(
    lowered: &str,
    comparisons: &[Comparison],
    position: usize,
) -> Option<RequirementType> {
    let clause = clause_start(lowered, position);
    comparisons
        .iter()
        .filter(|(start, end, _)| *start >= clause && *end <= position)
        .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(&a.0)))
        .map(|(_, _, kind)| *kind)
}

/// Postfix comparison closing a hit, either inside the match or right after.
fn comparison_after(lowered: &str, span: (usize, usize)) -> Option<RequirementType> {
    let matched = &lowered[span.0..span.1];
    let following = lowered[span.1..].trim_start();
    POSTFIX_WORDS
        .iter()
        .find(|(word, _)| matched.ends_with(word) || following.starts_with(word))
        .map(|(_, kind)| *kind)
}

fn capture_value(captures: &Captures<'_>, group: usize, scale: f64) -> Option<f64> {
    let value = captures.get(group)?.as_str().parse::<f64>().ok()? * scale;
    value.is_finite().then_some(value)
}

struct Hit {
    category: Category,
    span: (usize, usize),
    requirement: SpecificRequirement,
}

fn range_requirement(
    rule: &ExtractionRule,
    captures: &Captures<'_>,
) -> Option<SpecificRequirement> {
    let first = capture_value(captures, 1, rule.scale)?;
    let second = capture_value(captures, 2, rule.scale)?;
    let (low, high) = if first <= second { (first, second) } else { (second, first) };
    if !rule.category.accepts(low) {
        return None;
    }
    let mid = (low + high) / 2.0;
    let tolerance = ((high - low) / mid).clamp(0.0, 1.0);
    Some(SpecificRequirement::new(
        rule.category.dimension(),
        mid,
        rule.category.unit(),
        tolerance,
        RequirementType::Range,
    ))
}

fn exact_requirement(
    rule: &ExtractionRule,
    captures: &Captures<'_>,
    qualifier: Option<RequirementType>,
) -> Option<SpecificRequirement> {
    let value = capture_value(captures, 1, rule.scale)?;
    if !rule.category.accepts(value) {
        return None;
    }
    let (requirement_type, tolerance) = match qualifier {
        Some(kind) => (kind, COMPARISON_TOLERANCE),
        None => (RequirementType::Exact, rule.category.exact_tolerance()),
    };
    Some(SpecificRequirement::new(
        rule.category.dimension(),
        value,
        rule.category.unit(),
        tolerance,
        requirement_type,
    ))
}

/// Extracts requirements from lowercased text, in category discovery order.
pub fn extract_requirements(lowered: &str) -> Vec<SpecificRequirement> {
    let comparisons = comparisons(lowered);
    let mut hits: Vec<Hit> = Vec::new();

    for kind in [RuleKind::Range, RuleKind::Exact] {
        for compiled in COMPILED_RULES.iter().filter(|compiled| compiled.rule.kind == kind) {
            let rule = compiled.rule;
            if hits.iter().any(|hit| hit.category == rule.category) {
                continue;
            }
            for captures in compiled.regex.captures_iter(lowered) {
                let Some(whole) = captures.get(0) else { continue };
                let span = (whole.start(), whole.end());
                if hits.iter().any(|hit| overlaps(hit.span, span)) {
                    continue;
                }
                let requirement = match kind {
                    RuleKind::Range => range_requirement(rule, &captures),
                    RuleKind::Exact => exact_requirement(
                        rule,
                        &captures,
                        comparison_before(lowered, &comparisons, span.0)
                            .or_else(|| comparison_after(lowered, span)),
                    ),
                };
                if let Some(requirement) = requirement {
                    hits.push(Hit { category: rule.category, span, requirement });
                    break;
                }
            }
        }
    }

    if !hits.iter().any(|hit| hit.category == Category::Price) {
        if let Some(hit) = bare_price_after_comparison(lowered, &comparisons, &hits) {
            hits.push(hit);
        }
    }

    hits.into_iter().map(|hit| hit.requirement).collect()
}

/// `不超过3000元`, `under 3000`: a comparison word followed by a number that
/// no unit rule claimed is read as a price bound.
fn bare_price_after_comparison(
    lowered: &str,
    comparisons: &[Comparison],
    hits: &[Hit],
) -> Option<Hit> {
    comparisons.iter().find_map(|(_, end, kind)| {
        let tail = &lowered[*end..];
        let captures = BARE_NUMBER.captures(tail)?;
        let number = captures.get(1)?;
        let span = (end + number.start(), end + number.end());
        if hits.iter().any(|hit| overlaps(hit.span, span)) {
            return None;
        }
        let has_currency = captures.get(2).is_some();
        if !has_currency && followed_by_unit(&tail[number.end()..]) {
            return None;
        }
        let value = number.as_str().parse::<f64>().ok()?;
        if !Category::Price.accepts(value) {
            return None;
        }
        Some(Hit {
            category: Category::Price,
            span,
            requirement: SpecificRequirement::new(
                Dimension::PriceValue,
                value,
                Unit::Yuan,
                COMPARISON_TOLERANCE,
                *kind,
            ),
        })
    })
}

fn is_unit_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '寸' | '英' | '毫' | '万' | '像' | '个' | '核' | '%')
}

/// True when `rest`, the text right after a number, starts with a
/// non-currency unit ("5000毫安", "200g") or a decimal part ("6.7寸").
pub fn followed_by_unit(rest: &str) -> bool {
    if CURRENCY_WORDS.iter().any(|word| rest.starts_with(word)) {
        return false;
    }
    let mut chars = rest.chars();
    match chars.next() {
        Some('.') => chars.next().is_some_and(|ch| ch.is_ascii_digit()),
        Some(ch) => is_unit_char(ch),
        None => false,
    }
}
