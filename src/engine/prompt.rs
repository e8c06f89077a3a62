//! Deterministic prompt construction for both rewrite passes.
//!
//! Instructions are looked up in the style guide per error type, ordered by
//! severity (most severe first), and concatenated under a fixed template
//! with a primary-goal header. Prompts that would exceed the length budget
//! are truncated at whole-instruction granularity, dropping the
//! lowest-priority instructions first.

use serde::{Deserialize, Serialize};

use super::model::{RewriteContext, Severity, StyleError};
use super::styleguide::{GENERIC_INSTRUCTION, StyleGuide};

/// Default upper bound on prompt length, in characters.
pub const MAX_PROMPT_CHARS: usize = 4_000;

/// Prompt framing selected per backend family.
///
/// Smaller local models benefit from more directive phrasing, so the local
/// pipeline gets an explicit `Task:` preamble while the remote service gets
/// the terser framing. This is configuration chosen once at construction;
/// nothing downstream branches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptStyle {
    /// Compact framing for capable remote models.
    #[default]
    Terse,
    /// Directive framing with a `Task:` preamble for local models.
    Directive,
}

/// Builds backend-appropriate instruction prompts.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    guide: StyleGuide,
    style: PromptStyle,
    max_prompt_chars: usize,
}

impl PromptBuilder {
    /// Creates a builder over an immutable style guide.
    #[must_use]
    pub const fn new(guide: StyleGuide, style: PromptStyle) -> Self {
        Self {
            guide,
            style,
            max_prompt_chars: MAX_PROMPT_CHARS,
        }
    }

    /// Overrides the prompt length budget.
    #[must_use]
    pub const fn with_max_prompt_chars(mut self, max_prompt_chars: usize) -> Self {
        self.max_prompt_chars = max_prompt_chars;
        self
    }

    /// Builds the Pass-1 rewrite prompt.
    #[must_use]
    pub fn build_prompt(
        &self,
        content: &str,
        errors: &[StyleError],
        context: RewriteContext,
    ) -> String {
        let instructions = self.ranked_instructions(errors);

        let mut prompt = String::new();
        if self.style == PromptStyle::Directive {
            prompt.push_str("Task: You are editing a ");
            prompt.push_str(context.label());
            prompt.push_str(". Follow every instruction exactly.\n\n");
        }
        prompt.push_str("Rewrite the following ");
        prompt.push_str(context.label());
        prompt.push_str(" to fix the style issues listed below.\n\n");

        self.push_instruction_block(&mut prompt, &instructions, content.chars().count());

        prompt.push_str("\nTEXT:\n");
        prompt.push_str(content);
        prompt.push_str("\n\nRespond with only the rewritten text.");
        prompt
    }

    /// Builds the Pass-2 self-review prompt around the Pass-1 output.
    #[must_use]
    pub fn build_self_review_prompt(
        &self,
        first_pass_text: &str,
        original_errors: &[StyleError],
    ) -> String {
        let instructions = self.ranked_instructions(original_errors);

        let mut prompt = String::new();
        if self.style == PromptStyle::Directive {
            prompt.push_str("Task: Review and polish your own rewrite.\n\n");
        }
        prompt.push_str(concat!(
            "You previously rewrote a text to fix style issues. ",
            "Critique your rewrite below against the original goals, ",
            "then produce the final version.\n\n"
        ));

        self.push_instruction_block(&mut prompt, &instructions, first_pass_text.chars().count());

        prompt.push_str("\nYOUR REWRITE:\n");
        prompt.push_str(first_pass_text);
        prompt.push_str(concat!(
            "\n\nRespond with the FINAL POLISHED VERSION only: ",
            "no critique, no commentary, just the polished text."
        ));
        prompt
    }

    /// Distinct instructions for the error list, most severe first.
    ///
    /// Duplicated error types collapse to one instruction carrying the
    /// highest severity seen for that type.
    fn ranked_instructions(&self, errors: &[StyleError]) -> Vec<String> {
        let mut ranked: Vec<(&str, Severity)> = Vec::new();
        for error in errors {
            let key = error.instruction_key();
            match ranked.iter_mut().find(|(seen, _)| *seen == key) {
                Some(entry) => entry.1 = entry.1.max(error.severity),
                None => ranked.push((key, error.severity)),
            }
        }
        ranked.sort_by(|left, right| right.1.cmp(&left.1));

        if ranked.is_empty() {
            return vec![GENERIC_INSTRUCTION.to_owned()];
        }
        ranked
            .into_iter()
            .map(|(key, _)| self.guide.instruction_for(key).to_owned())
            .collect()
    }

    /// Appends the primary goal and additional instructions, honouring the
    /// length budget at whole-instruction granularity.
    fn push_instruction_block(
        &self,
        prompt: &mut String,
        instructions: &[String],
        content_chars: usize,
    ) {
        let mut iter = instructions.iter();
        let Some(primary) = iter.next() else {
            return;
        };

        prompt.push_str("PRIMARY GOAL: ");
        prompt.push_str(primary);
        prompt.push('\n');

        // Everything except the additional instructions counts against the
        // budget before any are admitted.
        let reserved = prompt
            .chars()
            .count()
            .saturating_add(content_chars)
            .saturating_add(80);
        let mut remaining = self.max_prompt_chars.saturating_sub(reserved);

        let additional: Vec<&String> = iter
            .take_while(|instruction| {
                let cost = instruction.chars().count().saturating_add(3);
                if cost <= remaining {
                    remaining = remaining.saturating_sub(cost);
                    true
                } else {
                    false
                }
            })
            .collect();

        if !additional.is_empty() {
            prompt.push_str("ADDITIONAL INSTRUCTIONS:\n");
            for instruction in additional {
                prompt.push_str("- ");
                prompt.push_str(instruction);
                prompt.push('\n');
            }
        }
    }
}

#[cfg(test)]
#[path = "prompt_tests.rs"]
mod tests;
