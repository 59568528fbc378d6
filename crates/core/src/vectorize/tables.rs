//! Lookup tables mapping raw hardware specs to normalized scores.
//!
//! Tables are pure data. The builtin set is materialized once and shared
//! behind an `Arc` by every vectorizer.

use std::sync::{Arc, LazyLock};

/// Score for chips that no table entry recognizes.
pub const UNKNOWN_CPU_SCORE: f64 = 0.7;

/// Which breakpoint applies to a value that falls between two keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// Largest breakpoint `<= value`; bigger is better (capacities).
    Floor,
    /// Smallest breakpoint `>= value`; smaller is better (weight, size).
    Ceiling,
}

/// Piecewise-constant curve over ascending breakpoints.
#[derive(Clone, Debug, PartialEq)]
pub struct StepTable {
    breakpoints: Vec<(f64, f64)>,
    step: Step,
    floor: f64,
}

impl StepTable {
    /// `floor` is returned for absent (non-positive) values.
    pub fn new(mut breakpoints: Vec<(f64, f64)>, step: Step, floor: f64) -> Self {
        breakpoints.sort_by(|a, b| a.0.total_cmp(&b.0));
        Self { breakpoints, step, floor }
    }

    pub fn score(&self, value: f64) -> f64 {
        if !(value > 0.0) {
            return self.floor;
        }
        let hit = match self.step {
            Step::Floor => self
                .breakpoints
                .iter()
                .rev()
                .find(|(key, _)| value >= *key)
                .or_else(|| self.breakpoints.first()),
            Step::Ceiling => self
                .breakpoints
                .iter()
                .find(|(key, _)| value <= *key)
                .or_else(|| self.breakpoints.last()),
        };
        hit.map(|(_, score)| *score).unwrap_or(self.floor)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScoreTables {
    /// Normalized chip name fragment -> score.
    pub cpu: Vec<(String, f64)>,
    pub memory: StepTable,
    pub storage: StepTable,
    pub battery: StepTable,
    pub camera: StepTable,
    pub weight: StepTable,
    pub size: StepTable,
}

static BUILTIN: LazyLock<Arc<ScoreTables>> = LazyLock::new(|| Arc::new(ScoreTables::default()));

impl ScoreTables {
    /// Shared handle to the builtin tables.
    pub fn builtin() -> Arc<ScoreTables> {
        Arc::clone(&BUILTIN)
    }

    /// Score of a chip name; the longest known fragment contained in the
    /// normalized name wins, unknown chips score [`UNKNOWN_CPU_SCORE`].
    pub fn cpu_score(&self, cpu: &str) -> f64 {
        let normalized = normalize_chip_name(cpu);
        if normalized.is_empty() {
            return UNKNOWN_CPU_SCORE;
        }
        self.cpu
            .iter()
            .filter(|(key, _)| normalized.contains(key.as_str()))
            .max_by_key(|(key, _)| key.len())
            .map(|(_, score)| *score)
            .unwrap_or(UNKNOWN_CPU_SCORE)
    }
}

impl Default for ScoreTables {
    fn default() -> Self {
        Self {
            cpu: CPU_SCORES.iter().map(|(name, score)| ((*name).to_owned(), *score)).collect(),
            memory: StepTable::new(
                vec![(4.0, 0.60), (6.0, 0.70), (8.0, 0.80), (12.0, 0.90), (16.0, 0.95)],
                Step::Floor,
                0.60,
            ),
            storage: StepTable::new(
                vec![(64.0, 0.50), (128.0, 0.70), (256.0, 0.85), (512.0, 0.95), (1024.0, 1.0)],
                Step::Floor,
                0.50,
            ),
            battery: StepTable::new(
                vec![
                    (3000.0, 0.60),
                    (3500.0, 0.70),
                    (4000.0, 0.80),
                    (4500.0, 0.85),
                    (5000.0, 0.90),
                    (5500.0, 0.95),
                    (6000.0, 1.0),
                ],
                Step::Floor,
                0.60,
            ),
            camera: StepTable::new(
                vec![
                    (12.0, 0.70),
                    (16.0, 0.75),
                    (20.0, 0.80),
                    (24.0, 0.85),
                    (32.0, 0.90),
                    (48.0, 0.95),
                    (64.0, 1.0),
                ],
                Step::Floor,
                0.70,
            ),
            weight: StepTable::new(
                vec![
                    (150.0, 0.95),
                    (160.0, 0.90),
                    (170.0, 0.85),
                    (180.0, 0.80),
                    (190.0, 0.75),
                    (200.0, 0.70),
                    (210.0, 0.65),
                    (220.0, 0.60),
                ],
                Step::Ceiling,
                0.60,
            ),
            size: StepTable::new(
                vec![
                    (5.0, 0.95),
                    (5.5, 0.90),
                    (6.0, 0.85),
                    (6.1, 0.80),
                    (6.3, 0.75),
                    (6.5, 0.70),
                    (6.7, 0.65),
                    (6.8, 0.60),
                ],
                Step::Ceiling,
                0.60,
            ),
        }
    }
}

const CPU_SCORES: &[(&str, f64)] = &[
    ("a17pro", 0.95),
    ("a16", 0.90),
    ("a15", 0.85),
    ("a14", 0.80),
    ("a13", 0.75),
    ("snapdragon8gen3", 0.92),
    ("snapdragon8gen2", 0.88),
    ("snapdragon8+gen1", 0.86),
    ("snapdragon8gen1", 0.85),
    ("snapdragon7+gen2", 0.80),
    ("snapdragon7gen2", 0.75),
    ("snapdragon778g", 0.74),
    ("snapdragon6gen1", 0.70),
    ("dimensity9300", 0.90),
    ("dimensity9200", 0.85),
    ("dimensity8200", 0.80),
    ("dimensity7200", 0.75),
    ("dimensity6100", 0.70),
    ("kirin9000s", 0.86),
    ("kirin9000", 0.85),
    ("kirin820", 0.75),
    ("exynos2200", 0.85),
    ("exynos2100", 0.80),
];

const CHIP_VENDOR_ALIASES: &[(&str, &str)] =
    &[("骁龙", "snapdragon"), ("天玑", "dimensity"), ("麒麟", "kirin"), ("qualcomm", "")];

/// Lowercases, maps Chinese vendor names and strips separators:
/// `骁龙8 Gen2` becomes `snapdragon8gen2`.
pub fn normalize_chip_name(cpu: &str) -> String {
    let mut name = cpu.to_lowercase();
    for (alias, canonical) in CHIP_VENDOR_ALIASES {
        name = name.replace(alias, canonical);
    }
    name.chars().filter(|ch| !ch.is_whitespace() && *ch != '-' && *ch != '_').collect()
}
