//! Pitch confidence analyzer. Splits section text into sentences, grades each,
//! and averages them into a section-level confidence.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::pitch::grader::{grade_normalized, normalize_inputs, SentenceGrade};
use crate::pitch::sections::{SectionKey, UnknownSection};

/// Raw section as produced by the LLM or supplied by a client, before grading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawSection {
    pub text: String,
}

/// A graded pitch section. `confidence` is always the mean of `sentences[].confidence`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PitchSection {
    pub text: String,
    pub confidence: f64,
    pub sentences: Vec<SentenceGrade>,
}

/// A graded pitch, keyed by the fixed sections in presentation order.
pub type Pitch = BTreeMap<SectionKey, PitchSection>;

/// Splits text at whitespace following `.`, `!` or `?`. Empty fragments are dropped.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let text = text.trim();
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut prev: Option<char> = None;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        if c.is_whitespace() && matches!(prev, Some('.' | '!' | '?')) {
            let fragment = text[start..idx].trim();
            if !fragment.is_empty() {
                sentences.push(fragment);
            }
            // Skip the rest of the whitespace run.
            let mut next_start = idx + c.len_utf8();
            while let Some(&(j, w)) = chars.peek() {
                if !w.is_whitespace() {
                    break;
                }
                next_start = j + w.len_utf8();
                chars.next();
            }
            start = next_start;
            prev = None;
            continue;
        }
        prev = Some(c);
    }

    let tail = text[start..].trim();
    if !tail.is_empty() {
        sentences.push(tail);
    }
    sentences
}

/// Grades one section's text against the user inputs.
pub fn analyze_section<S: AsRef<str>>(text: &str, user_inputs: &[S]) -> PitchSection {
    analyze_with(text, &normalize_inputs(user_inputs))
}

fn analyze_with(text: &str, inputs: &[String]) -> PitchSection {
    let sentences: Vec<SentenceGrade> = split_sentences(text)
        .into_iter()
        .map(|s| grade_normalized(s, inputs))
        .collect();

    let confidence = if sentences.is_empty() {
        0.0
    } else {
        sentences.iter().map(|s| s.confidence).sum::<f64>() / sentences.len() as f64
    };

    PitchSection {
        text: text.to_string(),
        confidence,
        sentences,
    }
}

/// Canonicalizes every section name, then grades each section.
///
/// Any name that does not map to one of the seven sections is rejected. When two
/// aliases map to the same section the later one wins.
pub fn analyze_pitch<'a, I, S>(sections: I, user_inputs: &[S]) -> Result<Pitch, UnknownSection>
where
    I: IntoIterator<Item = (&'a String, &'a RawSection)>,
    S: AsRef<str>,
{
    let inputs = normalize_inputs(user_inputs);
    let mut pitch = Pitch::new();
    for (name, raw) in sections {
        let key = SectionKey::canonicalize(name).ok_or_else(|| UnknownSection(name.clone()))?;
        pitch.insert(key, analyze_with(&raw.text, &inputs));
    }
    Ok(pitch)
}

/// Re-grades every section of an existing pitch (used after an improvement).
pub fn regrade_pitch<S: AsRef<str>>(pitch: &Pitch, user_inputs: &[S]) -> Pitch {
    let inputs = normalize_inputs(user_inputs);
    pitch
        .iter()
        .map(|(key, section)| (*key, analyze_with(&section.text, &inputs)))
        .collect()
}

/// Mean of all section confidences, 0.0 for an empty pitch.
pub fn overall_confidence(pitch: &Pitch) -> f64 {
    if pitch.is_empty() {
        return 0.0;
    }
    pitch.values().map(|s| s.confidence).sum::<f64>() / pitch.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pitch::grader::ConfidenceColor;

    fn raw(pairs: &[(&str, &str)]) -> BTreeMap<String, RawSection> {
        pairs
            .iter()
            .map(|(k, v)| {
                (
                    k.to_string(),
                    RawSection {
                        text: v.to_string(),
                    },
                )
            })
            .collect()
    }

    #[test]
    fn test_split_on_terminal_punctuation() {
        let s = split_sentences("First one. Second one! Third one? Fourth");
        assert_eq!(s, vec!["First one.", "Second one!", "Third one?", "Fourth"]);
    }

    #[test]
    fn test_split_ignores_punctuation_without_whitespace() {
        let s = split_sentences("Revenue grew 2.5x in Q1. Margins are 60%.");
        assert_eq!(s, vec!["Revenue grew 2.5x in Q1.", "Margins are 60%."]);
    }

    #[test]
    fn test_split_collapses_whitespace_runs_and_newlines() {
        let s = split_sentences("  One.\n\n   Two.   ");
        assert_eq!(s, vec!["One.", "Two."]);
    }

    #[test]
    fn test_split_empty_text() {
        assert!(split_sentences("").is_empty());
        assert!(split_sentences("   \n ").is_empty());
    }

    #[test]
    fn test_section_confidence_is_mean_of_sentences() {
        let section = analyze_section(
            "We will revolutionize payments. The founders met at university.",
            &["Acme"],
        );
        assert_eq!(section.sentences.len(), 2);
        assert_eq!(section.sentences[0].color, ConfidenceColor::Red);
        let mean = (0.3 + 0.7) / 2.0;
        assert!((section.confidence - mean).abs() < 1e-12);
    }

    #[test]
    fn test_empty_section_has_zero_confidence() {
        let section = analyze_section("   ", &["Acme"]);
        assert_eq!(section.confidence, 0.0);
        assert!(section.sentences.is_empty());
    }

    #[test]
    fn test_sentence_order_is_preserved() {
        let section = analyze_section("Alpha. Beta. Gamma.", &[] as &[&str]);
        let texts: Vec<_> = section.sentences.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["Alpha.", "Beta.", "Gamma."]);
    }

    #[test]
    fn test_analyze_pitch_canonicalizes_aliases() {
        let sections = raw(&[
            ("Business Model", "SaaS at $499/mo."),
            ("competition-and-moat", "Two incumbents."),
        ]);
        let pitch = analyze_pitch(&sections, &["Acme"]).unwrap();
        assert!(pitch.contains_key(&SectionKey::BusinessModel));
        assert!(pitch.contains_key(&SectionKey::Competition));
        assert_eq!(pitch.len(), 2);
    }

    #[test]
    fn test_analyze_pitch_rejects_unknown_section() {
        let sections = raw(&[("problem", "x."), ("team", "Great team.")]);
        let err = analyze_pitch(&sections, &["Acme"]).unwrap_err();
        assert_eq!(err.0, "team");
    }

    #[test]
    fn test_reanalysis_is_idempotent() {
        let inputs = ["Acme", "$2M ARR", "50 customers"];
        let first = analyze_section(
            "Acme closed 50 customers generating $2M ARR. We think the market is large.",
            &inputs,
        );
        let second = analyze_section(&first.text, &inputs);
        assert_eq!(first, second);
    }

    #[test]
    fn test_regrade_uses_new_inputs() {
        let sections = raw(&[("traction", "We onboarded 12 hospitals.")]);
        let pitch = analyze_pitch(&sections, &["Acme"]).unwrap();
        assert_eq!(pitch[&SectionKey::Traction].confidence, 0.7);

        let regraded = regrade_pitch(&pitch, &["Acme", "12 hospitals"]);
        assert_eq!(regraded[&SectionKey::Traction].confidence, 0.6);
    }

    #[test]
    fn test_overall_confidence() {
        let sections = raw(&[("problem", ""), ("ask", "The founders met at university.")]);
        let pitch = analyze_pitch(&sections, &["Acme"]).unwrap();
        assert!((overall_confidence(&pitch) - 0.35).abs() < 1e-12);
        assert_eq!(overall_confidence(&Pitch::new()), 0.0);
    }
}
