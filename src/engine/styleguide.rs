//! Style-guide instruction templates mapping error types to prompt text.
//!
//! The mapping is loaded once at startup (from YAML or built-in defaults),
//! validated eagerly, and immutable thereafter. The prompt builder consults
//! it through [`StyleGuide::instruction_for`]; unknown error types fall back
//! to a generic clarity instruction so a style guide can stay partial.

use std::collections::BTreeMap;

use serde::Deserialize;

use super::error::EngineError;

/// Instruction used when the error list is empty or a type is unmapped.
pub const GENERIC_INSTRUCTION: &str =
    "Improve clarity and concision while preserving the original meaning.";

const DEFAULT_INSTRUCTIONS: &[(&str, &str)] = &[
    (
        "passive_voice",
        "Convert passive voice constructions to active voice.",
    ),
    (
        "long_sentence",
        "Split sentences longer than 25 words into shorter, clearer ones.",
    ),
    (
        "wordiness",
        "Remove filler words and redundant phrasing without losing meaning.",
    ),
    (
        "vague_terms",
        "Replace vague terms with concrete, specific language.",
    ),
    (
        "unclear_reference",
        "Replace unclear pronoun references with the noun they refer to.",
    ),
    (
        "missing_antecedent",
        "Name the subject explicitly instead of relying on implied context.",
    ),
    (
        "jargon",
        "Replace specialist jargon with plain language the audience knows.",
    ),
    (
        "readability",
        "Simplify sentence structure to improve overall readability.",
    ),
];

/// Raw YAML shape for a style guide document.
#[derive(Debug, Deserialize)]
struct StyleGuideDocument {
    #[serde(default)]
    instructions: BTreeMap<String, String>,
}

/// Immutable mapping from error type (or subtype) to rewrite instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleGuide {
    instructions: BTreeMap<String, String>,
}

impl Default for StyleGuide {
    fn default() -> Self {
        Self::builtin()
    }
}

impl StyleGuide {
    /// The built-in instruction set used when no style guide is configured.
    #[must_use]
    pub fn builtin() -> Self {
        let instructions = DEFAULT_INSTRUCTIONS
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect();
        Self { instructions }
    }

    /// Parses a style guide from YAML, layering it over the built-in set.
    ///
    /// Entries present in the document replace built-in entries of the same
    /// key; absent keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Template`] when the YAML does not parse or an
    /// instruction is blank.
    pub fn from_yaml_str(source: &str) -> Result<Self, EngineError> {
        let document: StyleGuideDocument =
            serde_yaml::from_str(source).map_err(|error| EngineError::Template {
                message: format!("style guide YAML is invalid: {error}"),
            })?;

        for (key, value) in &document.instructions {
            if value.trim().is_empty() {
                return Err(EngineError::Template {
                    message: format!("instruction for '{key}' is blank"),
                });
            }
        }

        let mut guide = Self::builtin();
        guide.instructions.extend(document.instructions);
        Ok(guide)
    }

    /// Looks up the instruction for an error-type key.
    ///
    /// Unmapped keys fall back to [`GENERIC_INSTRUCTION`].
    #[must_use]
    pub fn instruction_for(&self, key: &str) -> &str {
        self.instructions
            .get(key)
            .map_or(GENERIC_INSTRUCTION, String::as_str)
    }

    /// Whether a key has an explicit instruction.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.instructions.contains_key(key)
    }
}
