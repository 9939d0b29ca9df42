// Shared prompt constants and prompt-building utilities.
// Each module that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON value. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Appended to the original prompt when a structured response was rejected.
/// Replace `{reason}` before sending.
pub const CORRECTIVE_REPROMPT: &str = "\
    Your previous response could not be used because: {reason}. \
    Respond again with valid JSON only, exactly matching the schema requested above. \
    Do not add commentary, code fences, or extra keys.";

/// Common instruction appended to every content-writing prompt.
pub const SPECIFICITY_INSTRUCTION: &str = "\
    Avoid buzzwords, vague claims, and unsubstantiated statements \
    (e.g. 'revolutionize', 'game-changing', 'significant potential'). \
    Use concrete details, metrics, timeframes, and specific examples from the \
    founder's inputs wherever possible. Do NOT invent figures the founder did not give.";
