// Pitch deck engine: generation, sentence-level grading, section edits, follow-ups.
// All LLM calls go through llm_client::LlmRouter.

pub mod analyzer;
pub mod clarifier;
pub mod deck;
pub mod email;
pub mod export;
pub mod generator;
pub mod grader;
pub mod handlers;
pub mod improver;
pub mod prompts;
pub mod sections;
