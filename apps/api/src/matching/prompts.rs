// Prompt constants for the Matching module.

/// System prompt for per-investor insights.
pub const INSIGHT_SYSTEM: &str = "You are a venture analyst who explains, in one plain \
    sentence, why a specific investor could be a good fit for a specific startup. \
    No prefixes, no bullet points, no markdown.";

/// Investor insight prompt.
/// Replace: {startup_name}, {industry}, {stage}, {investor_name}, {focus},
///          {investor_stage}, {location}, {reasons}
pub const INSIGHT_PROMPT_TEMPLATE: &str = r#"Analyze this potential investor match for {startup_name} (industry: {industry}, stage: {stage}).

Investor: {investor_name}
Focus Areas: {focus}
Stage: {investor_stage}
Location: {location}
Scoring signals: {reasons}

Provide a brief, specific reason why this could be a good match, focusing on unique synergies.
Return only a single sentence without any prefixes or formatting."#;
