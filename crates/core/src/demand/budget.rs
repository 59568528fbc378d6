//! Budget extraction: the first cascade step that matches wins.
//!
//! Order: explicit range, one-sided bound, fuzzy amount, single literal
//! price, then qualitative wording. Numbers below [`MIN_PLAUSIBLE_PRICE`]
//! are ignored at every step, as are numbers that carry a non-currency unit
//! ("大约5000毫安" is a battery, not a budget).

use std::sync::LazyLock;

use regex::Regex;

use super::extract::{followed_by_unit, MIN_PLAUSIBLE_PRICE};
use super::text::contains_keyword;
use crate::domain::budget::{BudgetDescriptor, BudgetSource};

/// Tolerance applied to a single literal price.
pub const SINGLE_PRICE_TOLERANCE: f64 = 0.1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BudgetRuleKind {
    Range,
    /// Named groups `amount` and `bound`; the bound word picks the side.
    Bound,
    Fuzzy,
    Single,
}

#[derive(Debug, Clone, Copy)]
pub struct BudgetRule {
    pub name: &'static str,
    pub kind: BudgetRuleKind,
    pub pattern: &'static str,
    pub sample: &'static str,
}

pub const BUDGET_RULES: &[BudgetRule] = &[
    BudgetRule {
        name: "range_currency",
        kind: BudgetRuleKind::Range,
        pattern: r"(\d+)\s*(?:-|~|～|到|至)\s*(\d+)\s*(?:元|块|yuan|rmb)",
        sample: "3000-4000元",
    },
    BudgetRule {
        name: "range_budget_prefix",
        kind: BudgetRuleKind::Range,
        pattern: concat!(
            r"(?:预算|budget)\s*(?:在|是|为|of|is)?\s*[$¥]?(\d+)",
            r"\s*(?:-|~|～|到|至|to)\s*[$¥]?(\d+)",
        ),
        sample: "预算3000到4000",
    },
    BudgetRule {
        name: "range_budget_suffix",
        kind: BudgetRuleKind::Range,
        pattern: r"(\d+)\s*(?:-|~|～|到|至)\s*(\d+)\s*(?:的)?预算",
        sample: "3000~4000的预算",
    },
    BudgetRule {
        name: "range_between",
        kind: BudgetRuleKind::Range,
        pattern: r"between\s*[$¥]?\s*(\d+)\s*and\s*[$¥]?\s*(\d+)",
        sample: "between $300 and $500",
    },
    BudgetRule {
        name: "range_currency_symbol",
        kind: BudgetRuleKind::Range,
        pattern: r"[$¥]\s*(\d+)\s*(?:-|~|to)\s*[$¥]?\s*(\d+)",
        sample: "¥3000-5000",
    },
    BudgetRule {
        name: "bound_suffix",
        kind: BudgetRuleKind::Bound,
        pattern: r"(?P<amount>\d+)\s*(?:元|块)?\s*(?P<bound>以内|以下|以上)",
        sample: "3000元以内",
    },
    BudgetRule {
        name: "bound_prefix",
        kind: BudgetRuleKind::Bound,
        pattern: concat!(
            r"(?P<bound>不超过|不高于|不大于|不低于|不少于|低于|高于|最多|最少|至少",
            r"|no more than|no less than|at most|at least|less than|more than",
            r"|up to|within|under|below|above|over)\s*[$¥]?\s*(?P<amount>\d+)",
        ),
        sample: "不超过3000元",
    },
    BudgetRule {
        name: "fuzzy_prefix",
        kind: BudgetRuleKind::Fuzzy,
        pattern: r"(?:大约|大概|差不多)\s*(\d+)",
        sample: "大约3000元",
    },
    BudgetRule {
        name: "fuzzy_suffix",
        kind: BudgetRuleKind::Fuzzy,
        pattern: r"(\d+)\s*(?:元|块)?\s*(?:左右|上下)",
        sample: "5000左右",
    },
    BudgetRule {
        name: "fuzzy_english_symbol",
        kind: BudgetRuleKind::Fuzzy,
        pattern: r"(?:around|about|roughly|approximately)\s*[$¥]\s*(\d+)",
        sample: "around $800",
    },
    BudgetRule {
        name: "fuzzy_english_named",
        kind: BudgetRuleKind::Fuzzy,
        pattern: r"(?:around|about|roughly|approximately)\s*(\d+)\s*(?:yuan|rmb|dollars?|元|块)",
        sample: "about 2500 yuan",
    },
    BudgetRule {
        name: "single_currency",
        kind: BudgetRuleKind::Single,
        pattern: r"(\d+)\s*(?:元|块|yuan|rmb)",
        sample: "3000元",
    },
    BudgetRule {
        name: "single_labelled",
        kind: BudgetRuleKind::Single,
        pattern: r"(?:预算|价格|budget|price)\s*(?:在|是|为|of|is)?\s*[$¥]?\s*(\d+)",
        sample: "预算4000",
    },
    BudgetRule {
        name: "single_symbol",
        kind: BudgetRuleKind::Single,
        pattern: r"[$¥]\s*(\d+)",
        sample: "$699",
    },
];

/// Bound words that set a floor; every other bound word sets a ceiling.
const FLOOR_WORDS: &[&str] = &[
    "以上", "不低于", "不少于", "高于", "最少", "至少", "no less than", "at least", "more than",
    "above", "over",
];

/// Qualitative price wording mapped to a canned range.
#[derive(Debug, Clone, Copy)]
pub struct PriceTier {
    pub name: &'static str,
    pub keywords: &'static [&'static str],
    pub target_price: f64,
    pub min_budget: f64,
    pub max_budget: f64,
    pub tolerance: f64,
}

pub const PRICE_TIERS: &[PriceTier] = &[
    PriceTier {
        name: "economy",
        keywords: &["便宜", "实惠", "性价比", "经济", "cheap", "affordable", "budget"],
        target_price: 3000.0,
        min_budget: 1500.0,
        max_budget: 4500.0,
        tolerance: 0.5,
    },
    PriceTier {
        name: "premium",
        keywords: &["高端", "旗舰", "顶级", "premium", "flagship", "high-end", "high end"],
        target_price: 8000.0,
        min_budget: 6000.0,
        max_budget: 12000.0,
        tolerance: 0.375,
    },
];

struct CompiledBudgetRule {
    rule: &'static BudgetRule,
    regex: Regex,
}

static COMPILED_BUDGET_RULES: LazyLock<Vec<CompiledBudgetRule>> = LazyLock::new(|| {
    BUDGET_RULES
        .iter()
        .map(|rule| CompiledBudgetRule {
            rule,
            regex: Regex::new(rule.pattern).expect("valid budget pattern"),
        })
        .collect()
});

/// Tolerance for an approximate amount: tighter for cheaper phones.
pub fn fuzzy_tolerance(target_price: f64) -> f64 {
    if target_price < 2000.0 {
        0.15
    } else if target_price < 5000.0 {
        0.2
    } else {
        0.25
    }
}

fn plausible(value: &str) -> Option<f64> {
    let value = value.parse::<f64>().ok()?;
    (value.is_finite() && value >= MIN_PLAUSIBLE_PRICE).then_some(value)
}

fn amount(lowered: &str, matched: regex::Match<'_>) -> Option<f64> {
    if followed_by_unit(&lowered[matched.end()..]) {
        return None;
    }
    plausible(matched.as_str())
}

fn apply_rule(compiled: &CompiledBudgetRule, lowered: &str) -> Option<BudgetDescriptor> {
    compiled.regex.captures_iter(lowered).find_map(|captures| match compiled.rule.kind {
        BudgetRuleKind::Range => {
            let first = plausible(captures.get(1)?.as_str())?;
            let second = plausible(captures.get(2)?.as_str())?;
            Some(BudgetDescriptor::range(first, second))
        }
        BudgetRuleKind::Bound => {
            let value = amount(lowered, captures.name("amount")?)?;
            let bound = captures.name("bound")?.as_str();
            Some(if FLOOR_WORDS.contains(&bound) {
                BudgetDescriptor::floor(value)
            } else {
                BudgetDescriptor::ceiling(value)
            })
        }
        BudgetRuleKind::Fuzzy => {
            let value = amount(lowered, captures.get(1)?)?;
            Some(BudgetDescriptor::around(value, fuzzy_tolerance(value), BudgetSource::Approximate))
        }
        BudgetRuleKind::Single => {
            let value = amount(lowered, captures.get(1)?)?;
            Some(BudgetDescriptor::around(value, SINGLE_PRICE_TOLERANCE, BudgetSource::Single))
        }
    })
}

/// Extracts a budget from lowercased text. Never fails; no match yields
/// [`BudgetDescriptor::none`].
pub fn extract_budget(lowered: &str) -> BudgetDescriptor {
    if let Some(budget) = COMPILED_BUDGET_RULES.iter().find_map(|rule| apply_rule(rule, lowered)) {
        return budget;
    }

    PRICE_TIERS
        .iter()
        .find(|tier| tier.keywords.iter().any(|keyword| contains_keyword(lowered, keyword)))
        .map(|tier| {
            BudgetDescriptor::keyword(
                tier.target_price,
                tier.min_budget,
                tier.max_budget,
                tier.tolerance,
            )
        })
        .unwrap_or_default()
}
