//! Local in-process rewrite pipeline.
//!
//! A deterministic rule-driven rewriter used when no remote model service is
//! configured. The pipeline inspects the prompt's instructions to decide
//! which transforms to run, then applies them to the original text with no
//! network I/O and no randomness. It is intentionally conservative: a
//! sentence that does not match a transform pattern is left untouched.

use crate::engine::error::EngineError;

use super::{BackendConfig, BackendKind, RewriteBackend};

const LONG_SENTENCE_WORDS: usize = 25;

const FILLER_WORDS: &[&str] = &[
    "very",
    "really",
    "quite",
    "just",
    "actually",
    "basically",
    "simply",
    "rather",
    "somewhat",
];

/// Deterministic local rewrite backend.
#[derive(Debug)]
pub struct LocalPipelineBackend {
    label: String,
    available: bool,
}

impl LocalPipelineBackend {
    /// Builds the pipeline from backend configuration.
    #[must_use]
    pub fn new(config: &BackendConfig) -> Self {
        let label = format!("{}:{}", BackendKind::LocalPipeline.label(), config.model_id);
        Self {
            label,
            available: true,
        }
    }
}

impl RewriteBackend for LocalPipelineBackend {
    fn is_available(&self) -> bool {
        self.available
    }

    fn generate(&self, prompt: &str, original: &str) -> Result<String, EngineError> {
        let lowered = prompt.to_lowercase();
        let mut text = original.to_owned();

        if lowered.contains("active voice") {
            text = activate_voice(&text);
        }
        if lowered.contains("split sentences") || lowered.contains("shorter") {
            text = split_long_sentences(&text);
        }
        if lowered.contains("filler") || lowered.contains("concision") {
            text = strip_fillers(&text);
        }

        // No instruction matched or nothing changed: run the clarity pass so
        // generation is never a silent echo when fillers are present.
        if text == original {
            text = strip_fillers(&text);
        }

        if text.trim().is_empty() {
            return Err(EngineError::Inference {
                message: "local pipeline produced empty output".to_owned(),
            });
        }
        Ok(text)
    }

    fn model_label(&self) -> &str {
        self.label.as_str()
    }
}

/// Splits text into sentences, keeping each terminator attached.
fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();

    for character in text.chars() {
        current.push(character);
        if matches!(character, '.' | '!' | '?') {
            sentences.push(current.trim().to_owned());
            current.clear();
        }
    }

    let remainder = current.trim();
    if !remainder.is_empty() {
        sentences.push(remainder.to_owned());
    }
    sentences
}

fn join_sentences(sentences: &[String]) -> String {
    sentences.join(" ")
}

fn capitalise_first(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        let mut output: String = first.to_uppercase().collect();
        output.push_str(chars.as_str());
        output
    })
}

fn strip_terminal_punctuation(word: &str) -> &str {
    word.trim_end_matches(['.', ',', '!', '?', ';', ':'])
}

/// Rewrites `<subject> was/were <verb>ed by <agent>` sentences actively.
fn activate_voice(text: &str) -> String {
    let sentences: Vec<String> = split_sentences(text)
        .into_iter()
        .map(|sentence| convert_passive_sentence(&sentence).unwrap_or(sentence))
        .collect();
    join_sentences(&sentences)
}

fn convert_passive_sentence(sentence: &str) -> Option<String> {
    let words: Vec<&str> = sentence.split_whitespace().collect();
    let aux_index = words.iter().position(|word| {
        let lowered = word.to_ascii_lowercase();
        lowered == "was" || lowered == "were"
    })?;
    let verb = words.get(aux_index.checked_add(1)?)?;
    if !strip_terminal_punctuation(verb).ends_with("ed") {
        return None;
    }
    let by_index = words
        .iter()
        .enumerate()
        .skip(aux_index.checked_add(2)?)
        .find_map(|(index, word)| (word.eq_ignore_ascii_case("by")).then_some(index))?;

    let subject: Vec<&str> = words.iter().take(aux_index).copied().collect();
    let agent: Vec<&str> = words
        .iter()
        .skip(by_index.checked_add(1)?)
        .map(|word| strip_terminal_punctuation(word))
        .collect();
    if subject.is_empty() || agent.is_empty() {
        return None;
    }

    let terminator = sentence
        .chars()
        .last()
        .filter(|last| matches!(last, '.' | '!' | '?'))
        .map_or_else(String::new, |last| last.to_string());

    let agent_phrase = capitalise_first(&agent.join(" "));
    let mut subject_words = subject.iter();
    let first_subject = subject_words.next().map(|word| {
        // Keep proper-noun capitalisation; lowercase plain sentence openers.
        if word.chars().skip(1).any(char::is_uppercase) {
            (*word).to_owned()
        } else {
            word.to_lowercase()
        }
    })?;
    let rest_subject: Vec<&str> = subject_words.copied().collect();
    let mut subject_phrase = first_subject;
    if !rest_subject.is_empty() {
        subject_phrase.push(' ');
        subject_phrase.push_str(&rest_subject.join(" "));
    }

    let verb_word = strip_terminal_punctuation(verb);
    Some(format!(
        "{agent_phrase} {verb_word} {subject_phrase}{terminator}"
    ))
}

/// Breaks overlong sentences at the first `, and` / `, but` joint.
fn split_long_sentences(text: &str) -> String {
    let sentences: Vec<String> = split_sentences(text)
        .into_iter()
        .map(|sentence| {
            if sentence.split_whitespace().count() > LONG_SENTENCE_WORDS {
                break_at_conjunction(&sentence).unwrap_or(sentence)
            } else {
                sentence
            }
        })
        .collect();
    join_sentences(&sentences)
}

fn break_at_conjunction(sentence: &str) -> Option<String> {
    let words: Vec<&str> = sentence.split_whitespace().collect();
    let joint = words.iter().enumerate().find_map(|(index, word)| {
        let follower = words.get(index.checked_add(1)?)?;
        let is_joint = word.ends_with(',')
            && (follower.eq_ignore_ascii_case("and") || follower.eq_ignore_ascii_case("but"));
        is_joint.then_some(index)
    })?;

    let head: Vec<&str> = words.iter().take(joint).copied().collect();
    let joint_word = words.get(joint)?.trim_end_matches(',');
    let continuation_start = words.get(joint.checked_add(2)?)?;
    let tail: Vec<&str> = words.iter().skip(joint.checked_add(3)?).copied().collect();
    if head.is_empty() {
        return None;
    }

    let mut output = head.join(" ");
    if !output.is_empty() {
        output.push(' ');
    }
    output.push_str(joint_word);
    output.push_str(". ");
    output.push_str(&capitalise_first(continuation_start));
    if !tail.is_empty() {
        output.push(' ');
        output.push_str(&tail.join(" "));
    }
    Some(output)
}

/// Drops common filler adverbs while keeping sentence punctuation intact.
fn strip_fillers(text: &str) -> String {
    let mut kept: Vec<String> = Vec::new();

    for word in text.split_whitespace() {
        let core = strip_terminal_punctuation(word).to_ascii_lowercase();
        if !FILLER_WORDS.contains(&core.as_str()) {
            kept.push(word.to_owned());
            continue;
        }

        // A dropped filler may carry the sentence terminator; move it onto
        // the previous kept word.
        let reversed: String = word
            .chars()
            .rev()
            .take_while(|character| matches!(character, '.' | '!' | '?'))
            .collect();
        let trailing: String = reversed.chars().rev().collect();
        if trailing.is_empty() {
            continue;
        }
        if let Some(last) = kept.last_mut() {
            while last.ends_with(',') || last.ends_with(';') {
                last.pop();
            }
            last.push_str(&trailing);
        } else {
            kept.push(trailing);
        }
    }

    kept.join(" ")
}
