//! Feedback "polish" step.
//!
//! [`Polisher`] is the seam for swapping in a language-model backed rewrite;
//! [`PatternPolisher`] is the deterministic word-substitution default.

use regex::{Captures, Regex};

pub trait Polisher: Send + Sync {
    fn polish(&self, text: &str) -> String;
}

const SUBSTITUTIONS: [(&str, &str); 5] = [
    ("good", "excellent"),
    ("nice", "outstanding"),
    ("okay", "satisfactory"),
    ("great", "exceptional"),
    ("awesome", "remarkable"),
];

const SHORT_TEXT_CHARS: usize = 100;
const CLOSING_SENTENCE: &str =
    "This demonstrates strong professional capabilities and positive collaboration skills.";

pub struct PatternPolisher {
    words: Regex,
    substitutions: Vec<(String, String)>,
}

impl PatternPolisher {
    pub fn new() -> Result<Self, regex::Error> {
        Self::with_substitutions(
            SUBSTITUTIONS
                .iter()
                .map(|(from, to)| (from.to_string(), to.to_string())),
        )
    }

    /// Whole-word, case-insensitive replacements. Replacements are inserted
    /// verbatim, so casing of the matched word is not preserved.
    pub fn with_substitutions(
        substitutions: impl IntoIterator<Item = (String, String)>,
    ) -> Result<Self, regex::Error> {
        let substitutions: Vec<(String, String)> = substitutions
            .into_iter()
            .map(|(from, to)| (from.to_lowercase(), to))
            .collect();
        let alternation = substitutions
            .iter()
            .map(|(from, _)| regex::escape(from))
            .collect::<Vec<_>>()
            .join("|");
        let words = Regex::new(&format!(r"(?i)\b(?:{alternation})\b"))?;
        Ok(Self {
            words,
            substitutions,
        })
    }

    fn substitute(&self, text: &str) -> String {
        self.words
            .replace_all(text, |caps: &Captures<'_>| {
                let matched = caps[0].to_lowercase();
                self.substitutions
                    .iter()
                    .find(|(from, _)| *from == matched)
                    .map(|(_, to)| to.clone())
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }
}

impl Polisher for PatternPolisher {
    fn polish(&self, text: &str) -> String {
        if text.trim().is_empty() {
            return text.to_string();
        }
        let mut polished = self.substitute(text);

        if text.chars().count() < SHORT_TEXT_CHARS {
            let body = polished.trim_end().trim_end_matches('.');
            if !body.trim().is_empty() {
                polished = format!("{body}. {CLOSING_SENTENCE}");
            }
        }

        let mut polished = capitalize_first(&polished);
        if !polished.ends_with(['.', '!', '?']) {
            polished.push('.');
        }
        polished
    }
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn polisher() -> PatternPolisher {
        PatternPolisher::new().unwrap()
    }

    #[test]
    fn short_feedback_gets_closing_sentence() {
        assert_eq!(
            polisher().polish("Sarah is good at coding and helps others"),
            "Sarah is excellent at coding and helps others. This demonstrates strong professional capabilities and positive collaboration skills."
        );
    }

    #[test]
    fn substitutions_ignore_case_and_first_letter_is_capitalized() {
        assert_eq!(
            polisher().polish("Great teamwork on the project, very nice communication"),
            "Exceptional teamwork on the project, very outstanding communication. This demonstrates strong professional capabilities and positive collaboration skills."
        );
    }

    #[test]
    fn long_feedback_only_gets_substitutions() {
        let original = "Alex consistently delivers high-quality work and is always willing to help team members. Their attention to detail is awesome.";
        assert_eq!(
            polisher().polish(original),
            "Alex consistently delivers high-quality work and is always willing to help team members. Their attention to detail is remarkable."
        );
    }

    #[test]
    fn words_inside_other_words_are_left_alone() {
        let text = "Goodness, the greatest ideas came from this sprint retrospective and they were written down carefully";
        assert_eq!(polisher().polish(text), format!("{text}."));
    }

    #[test]
    fn punctuation_only_input_gets_no_closing_sentence() {
        assert_eq!(polisher().polish("..."), "...");
    }

    #[test]
    fn blank_input_is_untouched() {
    }
}
