//! Sentence grader: rule-based specificity/credibility tiers for a single sentence.
//!
//! Rules are evaluated in order and the first match wins:
//! 1. ≥2 user inputs + quantitative pattern → green 0.9
//! 2. ≥2 user inputs                        → green 0.85
//! 3. 1 user input + benefit phrase         → green 0.85
//!    1 user input                          → orange 0.6
//! 4. hype term                             → red 0.3
//! 5. vague term                            → orange 0.6
//! 6. anything else                         → orange 0.7

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceColor {
    Green,
    Orange,
    Red,
}

/// Grade of one sentence. Pure derived data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentenceGrade {
    pub text: String,
    pub color: ConfidenceColor,
    pub confidence: f64,
    pub reason: String,
}

/// Percentages, or a number (optionally k/m/b scaled) followed by a metric unit.
static QUANTITATIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\d+(?:\.\d+)?\s*%|\d+(?:\.\d+)?\s*[kmb]?\s*(?:person-hours|hours|arr|million|billion)",
    )
    .expect("quantitative pattern is a valid regex")
});

const BENEFIT_PHRASES: &[&str] = &[
    "per",
    "resulted in",
    "led to",
    "enabled",
    "enabling",
    "unlock",
    "unlocking",
];

const HYPE_TERMS: &[&str] = &[
    "we believe",
    "we imagine",
    "we're redefining",
    "we aim to",
    "revolutionize",
    "game-changing",
    "disrupt",
    "visionary",
    "transforming",
    "we think",
    "cutting-edge",
    "next-generation",
    "state-of-the-art",
    "innovative",
    "groundbreaking",
    "paradigm shift",
];

const VAGUE_TERMS: &[&str] = &[
    "some",
    "many",
    "various",
    "aim",
    "target",
    "expected",
    "potential",
    "several",
    "multiple",
    "numerous",
    "significant",
];

/// Lowercased, de-duplicated, non-blank user inputs.
pub fn normalize_inputs<S: AsRef<str>>(user_inputs: &[S]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(user_inputs.len());
    for input in user_inputs {
        let lowered = input.as_ref().trim().to_lowercase();
        if !lowered.is_empty() && !out.contains(&lowered) {
            out.push(lowered);
        }
    }
    out
}

/// Grades `sentence` against the founder's raw inputs.
pub fn grade_sentence<S: AsRef<str>>(sentence: &str, user_inputs: &[S]) -> SentenceGrade {
    grade_normalized(sentence, &normalize_inputs(user_inputs))
}

/// Same as [`grade_sentence`] with inputs already passed through [`normalize_inputs`].
pub(crate) fn grade_normalized(sentence: &str, inputs: &[String]) -> SentenceGrade {
    let lower = sentence.to_lowercase();
    let user_matches = inputs.iter().filter(|ui| lower.contains(ui.as_str())).count();

    let (color, confidence, reason) = if user_matches >= 2 && QUANTITATIVE.is_match(&lower) {
        (
            ConfidenceColor::Green,
            0.9,
            "Contains multiple specific data points plus contextual insight",
        )
    } else if user_matches >= 2 {
        (
            ConfidenceColor::Green,
            0.85,
            "References multiple user-provided data points",
        )
    } else if user_matches == 1 {
        if contains_any(&lower, BENEFIT_PHRASES) {
            (
                ConfidenceColor::Green,
                0.85,
                "Includes user data and demonstrates a clear benefit or outcome",
            )
        } else {
            (
                ConfidenceColor::Orange,
                0.6,
                "References user input but lacks additional insight or context",
            )
        }
    } else if contains_any(&lower, HYPE_TERMS) {
        (
            ConfidenceColor::Red,
            0.3,
            "Contains hype terms or unsubstantiated claims",
        )
    } else if contains_any(&lower, VAGUE_TERMS) {
        (
            ConfidenceColor::Orange,
            0.6,
            "Contains vague or non-specific language",
        )
    } else {
        (
            ConfidenceColor::Orange,
            0.7,
            "General statement without specific backing",
        )
    };

    SentenceGrade {
        text: sentence.to_string(),
        color,
        confidence,
        reason: reason.to_string(),
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}
