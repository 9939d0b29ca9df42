//! Free-text industry → canonical bucket.

/// Ordered synonym table. The first bucket with a synonym contained in the text wins,
/// so order matters: short synonyms like "ai" sit in the first bucket.
const INDUSTRY_BUCKETS: &[(&str, &[&str])] = &[
    (
        "artificial intelligence",
        &["ai", "ml", "machine learning", "artificial intelligence", "ai/ml"],
    ),
    (
        "fintech",
        &["fintech", "financial", "payment", "banking", "finance"],
    ),
    ("ecommerce", &["e-commerce", "ecommerce", "retail", "marketplace"]),
    (
        "health",
        &[
            "health",
            "healthcare",
            "medical",
            "biotech",
            "life science",
            "med device",
        ],
    ),
    ("software", &["software", "saas", "internet software", "tech"]),
    ("edtech", &["edtech", "education", "learning"]),
    (
        "supply chain",
        &["supply chain", "logistics", "transportation"],
    ),
    (
        "data",
        &["data", "big data", "analytics", "data management"],
    ),
    ("hardware", &["hardware", "iot", "devices"]),
    ("blockchain", &["blockchain", "crypto", "web3"]),
    ("gaming", &["gaming", "games", "entertainment"]),
    ("food", &["food", "agtech", "agriculture"]),
    ("energy", &["energy", "climate", "cleantech"]),
    ("other", &["other", "various", "general"]),
];

/// Lowercases and trims `text`, then maps it to its bucket. Text matching no bucket is
/// returned as-is (lowercased).
pub fn normalize_industry(text: &str) -> String {
    let text = text.trim().to_lowercase();
    INDUSTRY_BUCKETS
        .iter()
        .find(|(_, synonyms)| synonyms.iter().any(|s| text.contains(s)))
        .map(|(bucket, _)| bucket.to_string())
        .unwrap_or(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_labels() {
        assert_eq!(normalize_industry("AI/ML"), "artificial intelligence");
        assert_eq!(normalize_industry("  Payments "), "fintech");
        assert_eq!(normalize_industry("Logistics"), "supply chain");
        assert_eq!(normalize_industry("Healthcare IT"), "health");
        assert_eq!(normalize_industry("Climate"), "energy");
    }

    #[test]
    fn test_first_bucket_wins() {
        // "fintech" contains "tech" (software) but fintech is checked first.
        assert_eq!(normalize_industry("Fintech"), "fintech");
        // Substring lookup: "retail" contains "ai".
        assert_eq!(normalize_industry("Retail"), "artificial intelligence");
    }

    #[test]
    fn test_unmatched_text_passes_through_lowercased() {
        assert_eq!(normalize_industry("  Space Launch "), "space launch");
        assert_eq!(normalize_industry(""), "");
    }
}
