//! The seven fixed pitch sections and the single alias → key canonicalization.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the seven fixed pitch sections. Declaration order is presentation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKey {
    Problem,
    Solution,
    Market,
    BusinessModel,
    Competition,
    Traction,
    Ask,
}

impl SectionKey {
    pub const ALL: [SectionKey; 7] = [
        SectionKey::Problem,
        SectionKey::Solution,
        SectionKey::Market,
        SectionKey::BusinessModel,
        SectionKey::Competition,
        SectionKey::Traction,
        SectionKey::Ask,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SectionKey::Problem => "problem",
            SectionKey::Solution => "solution",
            SectionKey::Market => "market",
            SectionKey::BusinessModel => "business_model",
            SectionKey::Competition => "competition",
            SectionKey::Traction => "traction",
            SectionKey::Ask => "ask",
        }
    }

    /// Human-facing title used in prompts and exports.
    pub fn title(self) -> &'static str {
        match self {
            SectionKey::Problem => "Problem",
            SectionKey::Solution => "Solution",
            SectionKey::Market => "Market",
            SectionKey::BusinessModel => "Business Model",
            SectionKey::Competition => "Competition & Moat",
            SectionKey::Traction => "Traction",
            SectionKey::Ask => "Ask & Use of Funds",
        }
    }

    /// Maps any accepted alias to its section. Unknown names return `None`.
    ///
    /// Names are trimmed and lowercased, `&` becomes `and`, and runs of spaces,
    /// hyphens and underscores collapse to a single `_` before lookup.
    pub fn canonicalize(name: &str) -> Option<SectionKey> {
        let normalized = normalize_name(name);
        let key = match normalized.as_str() {
            "problem" | "the_problem" | "pain" | "pain_point" | "pain_points" => {
                SectionKey::Problem
            }
            "solution" | "the_solution" | "product" | "product_solution" => SectionKey::Solution,
            "market" | "market_size" | "market_opportunity" | "tam" | "opportunity" => {
                SectionKey::Market
            }
            "business_model" | "businessmodel" | "revenue_model" | "monetization" => {
                SectionKey::BusinessModel
            }
            "competition" | "competition_and_moat" | "competitors" | "competitive_landscape"
            | "moat" => SectionKey::Competition,
            "traction" | "milestones" | "progress" => SectionKey::Traction,
            "ask" | "the_ask" | "ask_and_use_of_funds" | "use_of_funds" | "funding_ask"
            | "funding" => SectionKey::Ask,
            _ => return None,
        };
        Some(key)
    }
}

fn normalize_name(name: &str) -> String {
    let lowered = name.trim().to_lowercase().replace('&', " and ");
    lowered
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

impl fmt::Display for SectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSection(pub String);

impl fmt::Display for UnknownSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown pitch section '{}' (expected one of: problem, solution, market, business_model, competition, traction, ask)",
            self.0
        )
    }
}

impl std::error::Error for UnknownSection {}

impl FromStr for SectionKey {
    type Err = UnknownSection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SectionKey::canonicalize(s).ok_or_else(|| UnknownSection(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_names_map_to_themselves() {
        for key in SectionKey::ALL {
            assert_eq!(SectionKey::canonicalize(key.as_str()), Some(key));
        }
    }

    #[test]
    fn test_case_space_and_hyphen_variants() {
        assert_eq!(
            SectionKey::canonicalize("Business Model"),
            Some(SectionKey::BusinessModel)
        );
        assert_eq!(
            SectionKey::canonicalize("business-model"),
            Some(SectionKey::BusinessModel)
        );
        assert_eq!(
            SectionKey::canonicalize("  BUSINESS__MODEL "),
            Some(SectionKey::BusinessModel)
        );
    }

    #[test]
    fn test_display_titles_round_trip_through_canonicalize() {
        for key in SectionKey::ALL {
            assert_eq!(SectionKey::canonicalize(key.title()), Some(key), "{key}");
        }
    }

    #[test]
    fn test_ampersand_aliases() {
        assert_eq!(
            SectionKey::canonicalize("Competition & Moat"),
            Some(SectionKey::Competition)
        );
        assert_eq!(
            SectionKey::canonicalize("Ask & Use of Funds"),
            Some(SectionKey::Ask)
        );
    }

    #[test]
    fn test_unknown_names_are_rejected() {
        assert_eq!(SectionKey::canonicalize("team"), None);
        assert_eq!(SectionKey::canonicalize(""), None);
        // No partial/substring fallback.
        assert_eq!(SectionKey::canonicalize("problems and more"), None);
        let err = "financials".parse::<SectionKey>().unwrap_err();
        assert!(err.to_string().contains("financials"));
    }

    #[test]
    fn test_serde_uses_snake_case_keys() {
        let json = serde_json::to_string(&SectionKey::BusinessModel).unwrap();
        assert_eq!(json, "\"business_model\"");
    }

    #[test]
    fn test_ordering_follows_presentation_order() {
        let mut keys = vec![SectionKey::Ask, SectionKey::Problem, SectionKey::Market];
        keys.sort();
        assert_eq!(
            keys,
            vec![SectionKey::Problem, SectionKey::Market, SectionKey::Ask]
        );
    }
}
