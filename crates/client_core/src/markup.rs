//! Ordered pipeline turning the explanation service's lightweight markup
//! dialect into display markup.
//!
//! Stage order is fixed: block headings, strong emphasis, emphasis, line
//! breaks. Running strong emphasis before single emphasis is what keeps
//! `**bold *nested* bold**` from being torn apart by the single-star
//! pattern.

use regex::Regex;

struct MarkupStage {
    name: &'static str,
    pattern: Regex,
    replacement: &'static str,
}

impl MarkupStage {
    fn apply(&self, input: &str) -> String {
        self.pattern.replace_all(input, self.replacement).into_owned()
    }
}

pub struct MarkupPipeline {
    stages: Vec<MarkupStage>,
}

impl MarkupPipeline {
    /// The standard four-stage pipeline for explanation text.
    pub fn standard() -> Self {
        fn stage(name: &'static str, pattern: &str, replacement: &'static str) -> MarkupStage {
            MarkupStage {
                name,
                // Patterns are fixed literals.
                pattern: Regex::new(pattern).unwrap_or_else(|err| {
                    panic!("invalid markup stage pattern {name:?}: {err}")
                }),
                replacement,
            }
        }

        Self {
            stages: vec![
                stage("block-heading", r"(?m)^###\s*(.+?)\s*$", "<h5>$1</h5>"),
                stage("strong-emphasis", r"\*\*(.+?)\*\*", "<strong>$1</strong>"),
                stage("emphasis", r"\*([^*]+)\*", "<em>$1</em>"),
                stage("line-break", r"\n", "<br>"),
            ],
        }
    }

    pub fn apply(&self, input: &str) -> String {
        let mut text = input.to_string();
        for stage in &self.stages {
            text = stage.apply(&text);
        }
        text
    }

    #[cfg(test)]
    fn apply_stage(&self, name: &str, input: &str) -> String {
        self.stages
            .iter()
            .find(|stage| stage.name == name)
            .map(|stage| stage.apply(input))
            .unwrap_or_else(|| panic!("no markup stage named {name:?}"))
    }
}

impl Default for MarkupPipeline {
    fn default() -> Self {
        Self::standard()
    }
}
