//! Heuristic quality scoring for rewrite results.
//!
//! Confidence is a bounded [0,1] blend of a base score, a backend bonus, a
//! no-op penalty, a length-ratio sanity band, and a coverage signal: the
//! fraction of distinct error types whose indicator pattern disappeared from
//! the rewritten text. The exact constants are tunable; boundedness and the
//! documented monotonic directions are the contract.

use super::model::StyleError;

/// Confidence and confirmed improvements for one rewrite pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// Heuristic quality score, clamped to `[0.0, 1.0]`.
    pub confidence: f64,
    /// Human-readable improvement descriptions, one per confirmed edit.
    pub improvements: Vec<String>,
}

const BASE_CONFIDENCE: f64 = 0.5;
const REMOTE_BACKEND_BONUS: f64 = 0.15;
const NO_CHANGE_CONFIDENCE: f64 = 0.05;
const LENGTH_RATIO_MIN: f64 = 0.5;
const LENGTH_RATIO_MAX: f64 = 2.0;
const LENGTH_RATIO_PENALTY: f64 = 0.2;
const COVERAGE_BONUS_MAX: f64 = 0.25;

const SECOND_PASS_BASE: f64 = 0.8;
const SECOND_PASS_UNCHANGED: f64 = 0.85;
const SECOND_PASS_TIGHTEN_BONUS: f64 = 0.05;

const LONG_SENTENCE_WORDS: usize = 25;

const PASSIVE_INDICATORS: &[&str] = &[" was ", " were ", " been ", " being ", " is ", " are "];
const FILLER_INDICATORS: &[&str] = &[
    " very ",
    " really ",
    " quite ",
    " just ",
    " actually ",
    " basically ",
];
const VAGUE_INDICATORS: &[&str] = &[" thing", " stuff", " various ", " several aspects"];

/// Pass-1 confidence for a rewritten text.
#[must_use]
pub fn calculate_confidence(
    original: &str,
    rewritten: &str,
    errors: &[StyleError],
    used_remote_backend: bool,
) -> f64 {
    if rewritten == original {
        return NO_CHANGE_CONFIDENCE;
    }

    let mut score = BASE_CONFIDENCE;
    if used_remote_backend {
        score += REMOTE_BACKEND_BONUS;
    }
    if !length_ratio_in_band(original, rewritten) {
        score -= LENGTH_RATIO_PENALTY;
    }
    score += COVERAGE_BONUS_MAX * coverage_fraction(original, rewritten, errors);
    score.clamp(0.0, 1.0)
}

/// Pass-2 confidence, biased upward: refinement starts from validated text.
///
/// The degenerate `final_text == first_pass` case returns a high but not
/// maximal score; an unchanged, already-good text is not a failure.
#[must_use]
pub fn calculate_second_pass_confidence(
    first_pass: &str,
    final_text: &str,
    errors: &[StyleError],
) -> f64 {
    if final_text == first_pass {
        return SECOND_PASS_UNCHANGED;
    }

    let mut score = SECOND_PASS_BASE;
    let ratio = length_ratio(first_pass, final_text);
    if !(LENGTH_RATIO_MIN..=LENGTH_RATIO_MAX).contains(&ratio) {
        score -= LENGTH_RATIO_PENALTY;
    } else if ratio < 1.0 {
        // Refinement that tightens the text without gutting it.
        score += SECOND_PASS_TIGHTEN_BONUS;
    }
    score += COVERAGE_BONUS_MAX * coverage_fraction(first_pass, final_text, errors) / 2.0;
    score.clamp(0.0, 1.0)
}

/// Confidence plus confirmed improvements in one bundle.
#[must_use]
pub fn evaluate_rewrite_quality(
    original: &str,
    rewritten: &str,
    errors: &[StyleError],
    used_remote_backend: bool,
) -> Evaluation {
    Evaluation {
        confidence: calculate_confidence(original, rewritten, errors, used_remote_backend),
        improvements: extract_improvements(original, rewritten, errors),
    }
}

/// Maps error types to canned improvement descriptions, but only where a
/// heuristic confirms a plausible corresponding edit. Unmatched types are
/// silently omitted; a claimed improvement is never fabricated.
#[must_use]
pub fn extract_improvements(
    original: &str,
    rewritten: &str,
    errors: &[StyleError],
) -> Vec<String> {
    let mut improvements = Vec::new();
    let mut seen_types: Vec<&str> = Vec::new();

    for error in errors {
        let error_type = error.error_type.as_str();
        if seen_types.contains(&error_type) {
            continue;
        }
        seen_types.push(error_type);

        let confirmed = match error_type {
            "passive_voice" => {
                indicator_resolved(original, rewritten, PASSIVE_INDICATORS)
                    .then_some("Converted passive voice to active voice")
            }
            "long_sentence" => {
                let shortened = max_sentence_words(rewritten) < max_sentence_words(original)
                    || sentence_count(rewritten) > sentence_count(original);
                shortened.then_some("Shortened long sentences for readability")
            }
            "wordiness" => (word_count(rewritten) < word_count(original))
                .then_some("Removed filler words and tightened phrasing"),
            "vague_terms" => indicator_resolved(original, rewritten, VAGUE_INDICATORS)
                .then_some("Replaced vague terms with specific language"),
            "ambiguity" => {
                let sentence = error.sentence.trim();
                let replaced = !sentence.is_empty()
                    && original.contains(sentence)
                    && !rewritten.contains(sentence);
                replaced.then_some("Clarified ambiguous phrasing")
            }
            _ => None,
        };

        if let Some(description) = confirmed {
            improvements.push(description.to_owned());
        }
    }

    improvements
}

fn length_ratio(original: &str, rewritten: &str) -> f64 {
    let original_chars = original.chars().count();
    if original_chars == 0 {
        return 1.0;
    }
    rewritten.chars().count() as f64 / original_chars as f64
}

fn length_ratio_in_band(original: &str, rewritten: &str) -> bool {
    let ratio = length_ratio(original, rewritten);
    (LENGTH_RATIO_MIN..=LENGTH_RATIO_MAX).contains(&ratio)
}

/// Fraction of distinct, measurable error types whose indicator pattern
/// disappeared between `original` and `rewritten`.
fn coverage_fraction(original: &str, rewritten: &str, errors: &[StyleError]) -> f64 {
    let mut measurable = 0usize;
    let mut resolved = 0usize;
    let mut seen_types: Vec<&str> = Vec::new();

    for error in errors {
        let error_type = error.error_type.as_str();
        if seen_types.contains(&error_type) {
            continue;
        }
        seen_types.push(error_type);

        let Some(present_in_original) = indicator_present(error_type, original) else {
            continue;
        };
        if !present_in_original {
            continue;
        }
        measurable += 1;
        if indicator_present(error_type, rewritten) == Some(false) {
            resolved += 1;
        }
    }

    if measurable == 0 {
        return 0.0;
    }
    resolved as f64 / measurable as f64
}

/// Whether the type's indicator appears in the text; `None` when the type
/// has no measurable indicator.
fn indicator_present(error_type: &str, text: &str) -> Option<bool> {
    match error_type {
        "passive_voice" => Some(contains_any(text, PASSIVE_INDICATORS)),
        "wordiness" => Some(contains_any(text, FILLER_INDICATORS)),
        "vague_terms" => Some(contains_any(text, VAGUE_INDICATORS)),
        "long_sentence" => Some(max_sentence_words(text) > LONG_SENTENCE_WORDS),
        _ => None,
    }
}

fn indicator_resolved(original: &str, rewritten: &str, indicators: &[&str]) -> bool {
    contains_any(original, indicators) && !contains_any(rewritten, indicators)
}

/// Case-insensitive padded containment so indicators match at boundaries.
fn contains_any(text: &str, indicators: &[&str]) -> bool {
    let padded = format!(" {} ", text.to_lowercase());
    indicators.iter().any(|indicator| padded.contains(indicator))
}

fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

fn sentence_count(text: &str) -> usize {
    text.chars()
        .filter(|character| matches!(character, '.' | '!' | '?'))
        .count()
        .max(usize::from(!text.trim().is_empty()))
}

fn max_sentence_words(text: &str) -> usize {
    text.split(['.', '!', '?'])
        .map(word_count)
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
#[path = "quality_tests.rs"]
mod tests;
