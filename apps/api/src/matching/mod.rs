// Investor matching and valuation.
// Flow: profile → stage resolution → per-investor score → stable top-N → LLM insight per match.

pub mod handlers;
pub mod industry;
pub mod investors;
pub mod matcher;
pub mod prompts;
pub mod stage;
pub mod valuation;
