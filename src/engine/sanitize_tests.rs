//! Unit tests for the output sanitization pipeline.

use rstest::rstest;

use super::clean;

const ORIGINAL: &str = "The committee was chaired by Dr. Okafor for three years.";

#[test]
fn narrative_prefix_is_stripped() {
    let raw = "Here's the improved text: Dr. Okafor chaired the committee for three years.";
    assert_eq!(
        clean(raw, ORIGINAL),
        "Dr. Okafor chaired the committee for three years."
    );
}

#[test]
fn stacked_prefixes_are_stripped_repeatedly() {
    let raw = "Sure! Here is the rewrite: Dr. Okafor chaired the committee for three years.";
    assert_eq!(
        clean(raw, ORIGINAL),
        "Dr. Okafor chaired the committee for three years."
    );
}

#[test]
fn meta_commentary_lines_are_removed() {
    let raw = concat!(
        "Dr. Okafor chaired the committee for three years.\n",
        "- I converted the passive construction to active voice.\n",
        "Note: the title was preserved.\n",
    );
    assert_eq!(
        clean(raw, ORIGINAL),
        "Dr. Okafor chaired the committee for three years."
    );
}

#[test]
fn numbered_meta_lines_are_removed() {
    let raw = concat!(
        "Dr. Okafor chaired the committee for three years.\n",
        "1. I removed the redundant phrasing.\n",
        "2) I shortened the opening clause.\n",
    );
    assert_eq!(
        clean(raw, ORIGINAL),
        "Dr. Okafor chaired the committee for three years."
    );
}

#[test]
fn trailing_edit_description_paragraph_is_dropped() {
    let raw = concat!(
        "Dr. Okafor chaired the committee for three years.\n",
        "\n",
        "This version uses active voice and removes the wordy framing ",
        "of the original sentence.\n",
    );
    assert_eq!(
        clean(raw, ORIGINAL),
        "Dr. Okafor chaired the committee for three years."
    );
}

#[test]
fn bracketed_placeholders_are_stripped_but_citations_survive() {
    let raw = concat!(
        "Dr. Okafor chaired the committee [insert specific examples] ",
        "for three years [1]."
    );
    assert_eq!(
        clean(raw, ORIGINAL),
        "Dr. Okafor chaired the committee for three years [1]."
    );
}

#[test]
fn whitespace_runs_collapse_to_single_spaces() {
    let raw = "Dr. Okafor\tchaired   the committee  for three years.";
    assert_eq!(
        clean(raw, ORIGINAL),
        "Dr. Okafor chaired the committee for three years."
    );
}

#[test]
fn overstripped_output_falls_back_to_original() {
    let raw = "Note: I rewrote everything.\n- I removed all of it.\nOk.";
    assert_eq!(clean(raw, ORIGINAL), ORIGINAL);
}

#[test]
fn unchanged_generation_returns_original_untouched() {
    assert_eq!(clean(ORIGINAL, ORIGINAL), ORIGINAL);
}

#[test]
fn meta_line_removal_exposes_a_prefix_that_is_still_stripped() {
    let raw = concat!(
        "Note: reviewed carefully.\n",
        "Rewritten text: Dr. Okafor chaired the committee for three years."
    );
    assert_eq!(
        clean(raw, ORIGINAL),
        "Dr. Okafor chaired the committee for three years."
    );
}

#[rstest]
#[case("Here's the improved text: Dr. Okafor chaired the committee for three years.")]
#[case("Dr. Okafor   chaired the committee.\n\nThis version is more direct and readable.")]
#[case("Note: reviewed carefully.\nRewritten text: Dr. Okafor chaired the committee for three years.")]
#[case("[insert greeting] Improved text: Dr. Okafor chaired the committee for three years.")]
#[case("short")]
#[case("")]
#[case(ORIGINAL)]
fn clean_is_idempotent(#[case] raw: &str) {
    let once = clean(raw, ORIGINAL);
    let twice = clean(&once, ORIGINAL);
    assert_eq!(once, twice, "clean must be idempotent for raw={raw:?}");
}

#[test]
fn clean_is_deterministic() {
    let raw = "Sure! Here's the rewrite: Dr. Okafor chaired the committee for three years.";
    assert_eq!(clean(raw, ORIGINAL), clean(raw, ORIGINAL));
}

#[test]
fn unterminated_bracket_is_kept_verbatim() {
    let raw = "Dr. Okafor chaired the committee [incomplete for three years.";
    assert_eq!(
        clean(raw, ORIGINAL),
        "Dr. Okafor chaired the committee [incomplete for three years."
    );
}
