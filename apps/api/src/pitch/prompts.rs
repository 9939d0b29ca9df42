// All LLM prompt constants for the Pitch module.
// Reuses cross-cutting fragments from llm_client::prompts.

/// System prompt for pitch generation. JSON-only output.
pub const GENERATION_SYSTEM: &str = "You are a world-class startup storyteller advising a \
    founder preparing to pitch top-tier VCs. \
    You MUST respond with valid JSON only, a single JSON object. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Seven-part pitch prompt.
/// Replace: {investor_context}, {specificity_instruction}, {startup_name}, {industry},
///          {product}, {traction}, {stage}, {ask}
pub const GENERATION_PROMPT_TEMPLATE: &str = r#"{investor_context}
Craft a concise yet comprehensive 7-part investor pitch that covers:
1. Problem: vivid story + quantified pain (e.g., hours lost, dollars wasted).
2. Solution: product benefits + impact metrics (e.g., % time saved, error reduction).
3. Market: TAM, SAM, CAGR figures, and timing rationale.
4. Business Model: revenue streams, pricing, unit economics (LTV/CAC, margins).
5. Competition & Moat: key competitors, differentiation, defensibility.
6. Traction: customers, ARR/MRR, growth rates, partnerships, key milestones.
7. Ask & Use of Funds: funding amount, valuation context, deployment plan with KPIs.

Ensure each section includes at least one quantitative metric, timeframe, or specific benchmark.
{specificity_instruction}

Return a JSON object with this EXACT schema (all seven keys, no extra keys):
{
  "problem": {"text": "..."},
  "solution": {"text": "..."},
  "market": {"text": "..."},
  "business_model": {"text": "..."},
  "competition": {"text": "..."},
  "traction": {"text": "..."},
  "ask": {"text": "..."}
}

Startup Name: {startup_name}
Industry: {industry}
Product: {product}
Traction: {traction}
Stage: {stage}
Funding Ask: {ask}"#;

/// Improve prompt. Replace: {section_title}, {current_text}, {user_input},
///                          {specificity_instruction}
pub const IMPROVE_PROMPT_TEMPLATE: &str = r#"You are a world-class startup storyteller helping to improve a pitch for investors.

I need to improve the '{section_title}' section of my pitch based on additional information.

Current text:
"{current_text}"

Additional information from the founder:
"{user_input}"

Rewrite this section to incorporate the founder's input while keeping a compelling narrative.
Make the content specific, credible, and impactful for investors.
{specificity_instruction}

Return only the improved text without any explanations or formatting."#;

/// Regenerate prompt. Replace: {section_title}, {current_text}, {specificity_instruction}
pub const REGENERATE_PROMPT_TEMPLATE: &str = r#"You are a world-class startup storyteller helping to improve a pitch for investors.

Completely rewrite the '{section_title}' section of my pitch to make it more compelling and specific.

Current text:
"{current_text}"

The rewrite must be:
1. More specific, with concrete details and metrics
2. Free of buzzwords and vague claims
3. Compelling and credible for investors
4. A short narrative that builds conviction
{specificity_instruction}

Return only the rewritten text without any explanations or formatting."#;

/// Clarifying questions prompt. Replace: {section_title}, {section_text}, {weak_reasons}
pub const CLARIFY_PROMPT_TEMPLATE: &str = r#"You are a pitch advisor helping a founder strengthen one section of a startup pitch.

Section: {section_title}
Current text: {section_text}

Weakest sentences and why they were flagged:
{weak_reasons}

Write 2-3 specific questions whose answers would let the founder make this section concrete. Focus on:
1. Requesting concrete data and metrics
2. Clarifying vague or generic statements
3. Getting specific examples or proof points

Return a JSON array of 2-3 question strings, e.g. ["Question one?", "Question two?"]"#;

/// Cold email prompt.
/// Replace: {startup_name}, {investor_name}, {investor_context}, {traction}, {ask},
///          {founder_name}, {founder_email}
pub const EMAIL_PROMPT_TEMPLATE: &str = r#"Write a concise cold email to a VC investor. Follow this structure exactly:
1. Subject line
2. One-line greeting
3. One paragraph combining key metrics and the ask (max 3 sentences)
4. One-line call to action
5. Signature block

Use these details:
- Startup: {startup_name}
- Investor: {investor_name}{investor_context}
- Traction: {traction}
- Ask: {ask}
- Founder Name: {founder_name}
- Founder Email: {founder_email}

Avoid any repetition. Each piece of information should appear exactly once."#;
