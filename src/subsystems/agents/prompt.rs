//! Prompt assembly for the agent stages.
//!
//! Templates live in `config/prompts/` and are compiled into the binary.
//! Fragments are joined with a blank line; `{{key}}` placeholders are
//! substituted once, at [`build()`](PromptBuilder::build) time, after all
//! fragments are joined.

use std::collections::HashMap;

pub const INTENT_CLASSIFIER: &str = include_str!("../../../config/prompts/intent_classifier.md");
pub const ANSWER_SYSTEM: &str = include_str!("../../../config/prompts/answer_system.md");
pub const ANSWER_USER: &str = include_str!("../../../config/prompts/answer_user.md");

const SEPARATOR: &str = "\n\n";

/// Fluent builder: append fragments, register variables, build.
#[derive(Debug, Default)]
pub struct PromptBuilder {
    parts: Vec<String>,
    vars: HashMap<String, String>,
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a text fragment. Blank fragments are dropped.
    pub fn append(mut self, text: impl Into<String>) -> Self {
        let s = text.into();
        let trimmed = s.trim();
        if !trimmed.is_empty() {
            self.parts.push(trimmed.to_string());
        }
        self
    }

    /// Register `{{key}}` → `value` substitution pairs applied at build time.
    pub fn with_vars<'a, I>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        for (k, v) in vars {
            self.vars.insert(k.to_string(), v.to_string());
        }
        self
    }

    /// Register a single variable.
    pub fn var(mut self, key: &str, value: impl Into<String>) -> Self {
        self.vars.insert(key.to_string(), value.into());
        self
    }

    /// Join all fragments and substitute variables.
    ///
    /// Substitution is single-pass over the template, so a value that itself
    /// contains `{{...}}` (user text, tool output) is inserted verbatim.
    pub fn build(self) -> String {
        let template = self.parts.join(SEPARATOR);
        let mut out = String::with_capacity(template.len());
        let mut rest = template.as_str();

        while let Some(start) = rest.find("{{") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            match after.find("}}") {
                Some(end) => {
                    let key = &after[..end];
                    match self.vars.get(key) {
                        Some(value) => out.push_str(value),
                        None => {
                            out.push_str("{{");
                            out.push_str(key);
                            out.push_str("}}");
                        }
                    }
                    rest = &after[end + 2..];
                }
                None => {
                    out.push_str(&rest[start..]);
                    rest = "";
                }
            }
        }
        out.push_str(rest);
        out
    }
}
