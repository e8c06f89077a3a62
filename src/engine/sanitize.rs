//! Deterministic sanitization of raw LLM output.
//!
//! Generated text frequently arrives wrapped in narration ("Here's the
//! improved text:"), trailed by a paragraph describing the edits, or dotted
//! with bracketed placeholders. [`clean`] strips all of that through a fixed
//! ordered pipeline of stateless transforms. The pipeline is deterministic
//! and idempotent: `clean(clean(raw, original), original) == clean(raw,
//! original)` for all inputs.

/// Minimum number of characters a cleaned result must keep.
///
/// Falling under this floor signals over-aggressive stripping; the sanitizer
/// then discards its work and returns the original text.
pub const MIN_CLEANED_CHARS: usize = 20;

const NARRATIVE_PREFIXES: &[&str] = &[
    "here's the improved text:",
    "here is the improved text:",
    "here's the rewritten text:",
    "here is the rewritten text:",
    "here's the rewrite:",
    "here is the rewrite:",
    "here's the revised version:",
    "here is the revised version:",
    "sure, here's the rewrite:",
    "sure, here is the rewrite:",
    "final polished version:",
    "rewritten text:",
    "improved text:",
    "revised text:",
    "certainly!",
    "sure!",
    "of course!",
];

const META_LINE_MARKERS: &[&str] = &[
    "i converted",
    "i removed",
    "i changed",
    "i replaced",
    "i shortened",
    "i simplified",
    "i split",
    "i rewrote",
    "i made",
    "i also",
    "note:",
    "explanation:",
];

const TRAILING_PARAGRAPH_MARKERS: &[&str] = &[
    "the rewritten",
    "this version",
    "this rewrite",
    "these changes",
    "in this rewrite",
    "changes made:",
    "key changes:",
];

const PLACEHOLDER_HINTS: &[&str] = &[
    "insert",
    "add ",
    "include",
    "describe",
    "specify",
    "mention",
    "your ",
    "example",
    "placeholder",
    "todo",
];

/// Cleans raw generated text, falling back to `original` when the result
/// would be implausibly short.
#[must_use]
pub fn clean(raw: &str, original: &str) -> String {
    // Generation made no change; there is nothing to clean.
    if raw == original {
        return original.to_owned();
    }

    // Removing a meta line or placeholder can expose a narrative prefix at
    // the new text start, so run the stages to a fixed point. Every stage
    // only deletes text, which guarantees termination.
    let mut cleaned = raw.trim().to_owned();
    loop {
        let next = run_stages(&cleaned);
        if next == cleaned {
            break;
        }
        cleaned = next;
    }

    if cleaned.chars().count() < MIN_CLEANED_CHARS {
        return original.to_owned();
    }
    cleaned
}

fn run_stages(text: &str) -> String {
    let stripped = strip_narrative_prefixes(text);
    let without_meta = remove_meta_lines(&stripped);
    let without_trailer = remove_trailing_edit_description(&without_meta);
    let without_placeholders = strip_bracketed_placeholders(&without_trailer);
    normalise_whitespace(&without_placeholders)
}

/// Case-insensitive ASCII prefix strip; returns the remainder on match.
fn strip_prefix_ignore_ascii_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let mut offset = 0usize;
    let mut text_chars = text.chars();
    for expected in prefix.chars() {
        let actual = text_chars.next()?;
        if !actual.eq_ignore_ascii_case(&expected) {
            return None;
        }
        offset = offset.checked_add(actual.len_utf8())?;
    }
    text.get(offset..)
}

fn strip_narrative_prefixes(text: &str) -> String {
    let mut current = text.trim_start();
    loop {
        let stripped = NARRATIVE_PREFIXES
            .iter()
            .find_map(|prefix| strip_prefix_ignore_ascii_case(current, prefix));
        match stripped {
            Some(remainder) => current = remainder.trim_start(),
            None => return current.to_owned(),
        }
    }
}

/// Strips a bullet or `1.` / `1)` numbering marker from a line start.
fn strip_list_marker(line: &str) -> &str {
    let trimmed = line.trim_start();
    if let Some(rest) = trimmed
        .strip_prefix("- ")
        .or_else(|| trimmed.strip_prefix("* "))
        .or_else(|| trimmed.strip_prefix("\u{2022} "))
    {
        return rest.trim_start();
    }

    let digits_end: usize = trimmed
        .chars()
        .take_while(char::is_ascii_digit)
        .map(char::len_utf8)
        .sum();
    if digits_end == 0 {
        return trimmed;
    }
    trimmed
        .get(digits_end..)
        .and_then(|rest| rest.strip_prefix('.').or_else(|| rest.strip_prefix(')')))
        .map_or(trimmed, str::trim_start)
}

fn is_meta_line(line: &str) -> bool {
    let candidate = strip_list_marker(line);
    META_LINE_MARKERS
        .iter()
        .any(|marker| strip_prefix_ignore_ascii_case(candidate, marker).is_some())
}

fn remove_meta_lines(text: &str) -> String {
    let kept: Vec<&str> = text.lines().filter(|line| !is_meta_line(line)).collect();
    kept.join("\n")
}

fn is_edit_description(paragraph: &[&str]) -> bool {
    paragraph.first().is_some_and(|first_line| {
        TRAILING_PARAGRAPH_MARKERS
            .iter()
            .any(|marker| strip_prefix_ignore_ascii_case(first_line.trim_start(), marker).is_some())
    })
}

/// Drops trailing paragraphs that describe the edit instead of being it.
fn remove_trailing_edit_description(text: &str) -> String {
    let mut paragraphs: Vec<Vec<&str>> = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                paragraphs.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        paragraphs.push(current);
    }

    while paragraphs.len() > 1 {
        let drop_last = paragraphs.last().is_some_and(|last| is_edit_description(last));
        if !drop_last {
            break;
        }
        paragraphs.pop();
    }

    paragraphs
        .iter()
        .map(|paragraph| paragraph.join("\n"))
        .collect::<Vec<String>>()
        .join("\n\n")
}

fn is_placeholder(inner: &str) -> bool {
    let lowered = inner.trim_start().to_ascii_lowercase();
    PLACEHOLDER_HINTS
        .iter()
        .any(|hint| lowered.starts_with(hint))
}

/// Removes `[insert something here]`-style bracketed placeholders.
fn strip_bracketed_placeholders(text: &str) -> String {
    let mut output = String::new();
    let mut span = String::new();
    let mut in_brackets = false;

    for character in text.chars() {
        if in_brackets {
            if character == ']' {
                if !is_placeholder(&span) {
                    output.push('[');
                    output.push_str(&span);
                    output.push(']');
                }
                span.clear();
                in_brackets = false;
            } else {
                span.push(character);
            }
        } else if character == '[' {
            in_brackets = true;
        } else {
            output.push(character);
        }
    }

    // Unterminated bracket: keep the text verbatim.
    if in_brackets {
        output.push('[');
        output.push_str(&span);
    }
    output
}

/// Collapses runs of spaces/tabs, trims lines, and caps blank-line runs.
fn normalise_whitespace(text: &str) -> String {
    let mut lines_out: Vec<String> = Vec::new();
    let mut blank_pending = false;

    for line in text.lines() {
        let normalised = line.split_whitespace().collect::<Vec<&str>>().join(" ");
        if normalised.is_empty() {
            blank_pending = !lines_out.is_empty();
        } else {
            if blank_pending {
                lines_out.push(String::new());
                blank_pending = false;
            }
            lines_out.push(normalised);
        }
    }

    lines_out.join("\n")
}

#[cfg(test)]
#[path = "sanitize_tests.rs"]
mod tests;
