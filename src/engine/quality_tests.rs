//! Unit tests for confidence scoring and improvement extraction.

use rstest::rstest;

use crate::engine::model::{Severity, StyleError};

use super::{
    calculate_confidence, calculate_second_pass_confidence, evaluate_rewrite_quality,
    extract_improvements,
};

fn style_error(error_type: &str) -> StyleError {
    StyleError {
        error_type: error_type.to_owned(),
        subtype: None,
        severity: Severity::Medium,
        sentence: String::new(),
        suggestions: Vec::new(),
    }
}

const PASSIVE_ORIGINAL: &str = "The report was written by the team over several months.";
const ACTIVE_REWRITE: &str = "The team wrote the report over several months.";

#[test]
fn unchanged_text_scores_near_zero() {
    let score = calculate_confidence(
        PASSIVE_ORIGINAL,
        PASSIVE_ORIGINAL,
        &[style_error("passive_voice")],
        true,
    );
    assert!(score < 0.1, "no-op rewrite should score near zero: {score}");
}

#[test]
fn remote_backend_scores_above_local_for_same_rewrite() {
    let errors = vec![style_error("passive_voice")];
    let remote = calculate_confidence(PASSIVE_ORIGINAL, ACTIVE_REWRITE, &errors, true);
    let local = calculate_confidence(PASSIVE_ORIGINAL, ACTIVE_REWRITE, &errors, false);

    assert!(remote > local, "remote {remote} should exceed local {local}");
}

#[test]
fn resolved_indicators_raise_confidence() {
    let errors = vec![style_error("passive_voice")];
    let resolving = calculate_confidence(PASSIVE_ORIGINAL, ACTIVE_REWRITE, &errors, false);
    let non_resolving = calculate_confidence(
        PASSIVE_ORIGINAL,
        "The report was written by the team across several months.",
        &errors,
        false,
    );

    assert!(
        resolving > non_resolving,
        "coverage should add signal: {resolving} vs {non_resolving}"
    );
}

#[test]
fn pathological_truncation_is_penalised() {
    let errors = vec![style_error("wordiness")];
    let truncated = calculate_confidence(PASSIVE_ORIGINAL, "The report.", &errors, true);
    let sane = calculate_confidence(PASSIVE_ORIGINAL, ACTIVE_REWRITE, &errors, true);

    assert!(truncated < sane, "got truncated={truncated}, sane={sane}");
}

#[rstest]
#[case("", "", true)]
#[case(PASSIVE_ORIGINAL, ACTIVE_REWRITE, true)]
#[case(PASSIVE_ORIGINAL, "x", false)]
#[case("a", "some vastly longer replacement text that balloons the ratio", false)]
fn confidence_is_always_bounded(
    #[case] original: &str,
    #[case] rewritten: &str,
    #[case] used_remote: bool,
) {
    let errors = vec![
        style_error("passive_voice"),
        style_error("wordiness"),
        style_error("long_sentence"),
    ];
    let score = calculate_confidence(original, rewritten, &errors, used_remote);
    assert!((0.0..=1.0).contains(&score), "score out of bounds: {score}");

    let second = calculate_second_pass_confidence(original, rewritten, &errors);
    assert!(
        (0.0..=1.0).contains(&second),
        "second-pass score out of bounds: {second}"
    );
}

#[test]
fn second_pass_unchanged_text_is_high_but_not_maximal() {
    let score = calculate_second_pass_confidence(ACTIVE_REWRITE, ACTIVE_REWRITE, &[]);
    assert!(score > 0.7, "unchanged refinement is not a failure: {score}");
    assert!(score < 1.0, "unchanged refinement is not perfect: {score}");
}

#[test]
fn second_pass_outscores_first_pass_for_same_edit() {
    let errors = vec![style_error("wordiness")];
    let first = calculate_confidence(PASSIVE_ORIGINAL, ACTIVE_REWRITE, &errors, false);
    let second = calculate_second_pass_confidence(PASSIVE_ORIGINAL, ACTIVE_REWRITE, &errors);

    assert!(second > first, "refinement is biased upward: {second} vs {first}");
}

#[test]
fn improvements_require_confirming_evidence() {
    let errors = vec![style_error("passive_voice"), style_error("vague_terms")];
    let improvements = extract_improvements(PASSIVE_ORIGINAL, ACTIVE_REWRITE, &errors);

    assert_eq!(
        improvements,
        vec!["Converted passive voice to active voice".to_owned()],
        "vague_terms had no indicator in the original, so it must be omitted"
    );
}

#[test]
fn wordiness_improvement_requires_shorter_text() {
    let errors = vec![style_error("wordiness")];
    let confirmed = extract_improvements(
        "This is really very much a quite redundant sentence.",
        "This is a redundant sentence.",
        &errors,
    );
    let unconfirmed = extract_improvements(
        "Short text here.",
        "Short text here with extra words appended.",
        &errors,
    );

    assert_eq!(
        confirmed,
        vec!["Removed filler words and tightened phrasing".to_owned()]
    );
    assert!(unconfirmed.is_empty(), "longer text is not a wordiness fix");
}

#[test]
fn ambiguity_improvement_tracks_the_flagged_sentence() {
    let mut error = style_error("ambiguity");
    error.sentence = "It was unclear.".to_owned();
    let improvements = extract_improvements(
        "Some intro. It was unclear.",
        "Some intro. The deadline was unclear to the vendors.",
        &[error],
    );

    assert_eq!(improvements, vec!["Clarified ambiguous phrasing".to_owned()]);
}

#[test]
fn duplicate_error_types_yield_one_improvement() {
    let errors = vec![style_error("passive_voice"), style_error("passive_voice")];
    let improvements = extract_improvements(PASSIVE_ORIGINAL, ACTIVE_REWRITE, &errors);

    assert_eq!(improvements.len(), 1);
}

#[test]
fn evaluation_bundles_confidence_and_improvements() {
    let errors = vec![style_error("passive_voice")];
    let evaluation = evaluate_rewrite_quality(PASSIVE_ORIGINAL, ACTIVE_REWRITE, &errors, true);

    assert!((0.0..=1.0).contains(&evaluation.confidence));
    assert!(!evaluation.improvements.is_empty());
}
