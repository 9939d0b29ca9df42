//! Valuation range estimate from stage, industry, location and company age.

use serde::{Deserialize, Serialize};

/// Base ranges ($M) by funding stage.
const STAGE_RANGES: &[(&str, (f64, f64))] = &[
    ("pre-seed", (0.5, 2.0)),
    ("seed", (2.0, 7.0)),
    ("series a", (8.0, 30.0)),
    ("series b", (30.0, 100.0)),
    ("series c", (80.0, 250.0)),
    ("series d", (200.0, 500.0)),
    ("pre-ipo", (500.0, 5000.0)),
];
const DEFAULT_RANGE: (f64, f64) = (5.0, 20.0);

const INDUSTRY_MULTIPLIERS: &[(&str, f64)] = &[
    ("artificial intelligence", 1.4),
    ("fintech", 1.3),
    ("healthtech", 1.5),
    ("biotech", 1.6),
    ("edtech", 0.9),
    ("e-commerce", 1.0),
    ("supply chain", 1.2),
    ("other", 1.0),
];

const LOCATION_MULTIPLIERS: &[(&str, f64)] = &[
    ("san francisco", 1.3),
    ("new york", 1.2),
    ("london", 1.1),
    ("beijing", 1.2),
    ("shanghai", 1.1),
    ("india", 0.9),
    ("jakarta", 0.9),
    ("sao paulo", 0.9),
    ("other", 1.0),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationEstimate {
    pub low: f64,
    pub high: f64,
    pub base: (f64, f64),
    pub industry_multiplier: f64,
    pub location_multiplier: f64,
    pub age: f64,
    pub age_multiplier: f64,
    /// Product of the three multipliers, rounded to 2 dp for display.
    pub combined: f64,
}

/// Table lookups are case-insensitive; unknown keys fall back to the defaults.
pub fn estimate_valuation(
    stage: &str,
    industry: &str,
    location: &str,
    age_years: f64,
) -> ValuationEstimate {
    let base = lookup(STAGE_RANGES, stage).unwrap_or(DEFAULT_RANGE);
    let industry_multiplier = lookup(INDUSTRY_MULTIPLIERS, industry).unwrap_or(1.0);
    let location_multiplier = lookup(LOCATION_MULTIPLIERS, location).unwrap_or(1.0);
    let age_multiplier = age_multiplier(age_years);

    let combined = industry_multiplier * location_multiplier * age_multiplier;

    ValuationEstimate {
        low: round2(base.0 * combined),
        high: round2(base.1 * combined),
        base,
        industry_multiplier,
        location_multiplier,
        age: age_years,
        age_multiplier,
        combined: round2(combined),
    }
}

pub fn age_multiplier(age_years: f64) -> f64 {
    if age_years < 1.0 {
        0.8
    } else if age_years < 3.0 {
        1.0
    } else if age_years < 6.0 {
        1.1
    } else if age_years < 10.0 {
        1.2
    } else {
        1.0
    }
}

fn lookup<T: Copy>(table: &[(&str, T)], key: &str) -> Option<T> {
    let key = key.trim().to_lowercase();
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
