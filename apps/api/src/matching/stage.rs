//! Funding-stage inference and investor stage compatibility.

pub const UNKNOWN_STAGE: &str = "unknown";

/// Investor stage keywords each startup stage is compatible with.
const STAGE_ADJACENCY: &[(&str, &[&str])] = &[
    ("seed", &["seed", "pre-seed"]),
    ("series a", &["seed", "series a", "pre-seed"]),
    ("series b", &["series a", "series b", "seed"]),
    ("series c", &["series b", "series c", "series a"]),
    ("series d", &["series c", "series d", "series b"]),
    ("pre-ipo", &["series c", "series d", "pre-ipo"]),
];

/// Maps a valuation (millions) to a stage label. Zero, negative and NaN ⇒ "unknown".
pub fn stage_from_valuation(valuation: f64) -> &'static str {
    if valuation.is_nan() || valuation <= 0.0 {
        UNKNOWN_STAGE
    } else if valuation < 2.0 {
        "series a"
    } else if valuation < 5.0 {
        "series b"
    } else if valuation < 10.0 {
        "series c"
    } else if valuation < 30.0 {
        "series d"
    } else if valuation < 100.0 {
        "late"
    } else {
        "pre-ipo"
    }
}

/// Stage used for matching: inferred from a positive valuation, else the supplied
/// label lowercased, else "unknown".
pub fn resolve_stage(valuation: Option<f64>, label: &str) -> String {
    if let Some(v) = valuation.filter(|v| *v > 0.0) {
        return stage_from_valuation(v).to_string();
    }
    let label = label.trim().to_lowercase();
    if label.is_empty() {
        UNKNOWN_STAGE.to_string()
    } else {
        label
    }
}

/// True when an investor's free-text stage accepts a startup at `startup_stage`.
///
/// Stages outside the adjacency table (including "unknown" and "late") are compatible
/// with everything. An investor with no stated stage matches none of the tabled stages.
pub fn is_stage_compatible(startup_stage: &str, investor_stages: &str) -> bool {
    let investor_stages = investor_stages.trim().to_lowercase();
    match STAGE_ADJACENCY
        .iter()
        .find(|(stage, _)| *stage == startup_stage)
    {
        Some((_, keywords)) => keywords.iter().any(|k| investor_stages.contains(k)),
        None => true,
    }
}
