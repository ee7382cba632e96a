// ============================================================
// KEYPHRASE DERIVER
// ============================================================
// Derive a short content-word keyphrase from a product name and cap
// generated titles to a content-word budget

use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

use crate::domain::PipelineConfig;

use super::sanitizer::TextSanitizer;

// Word characters plus the accented letters used in Italian product names
static NON_WORD_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\wàèéìòùÀÈÉÌÒÙ]").unwrap());

pub struct KeyphraseDeriver {
    config: Arc<PipelineConfig>,
    sanitizer: TextSanitizer,
}

impl KeyphraseDeriver {
    pub fn new(config: Arc<PipelineConfig>) -> Self {
        let sanitizer = TextSanitizer::new(config.clone());
        Self { config, sanitizer }
    }

    /// Derive a focus keyphrase from a product name.
    ///
    /// Stopwords are skipped entirely; content words keep their original
    /// form and order. Returns an empty string when the name yields no
    /// content words, which callers treat as "no injection required".
    pub fn derive(&self, product_name: &str) -> String {
        let name = self.sanitizer.sanitize(product_name);
        if name.is_empty() {
            return String::new();
        }

        let mut words: Vec<&str> = Vec::new();
        for token in name.split_whitespace() {
            if self.is_content_word(token) {
                words.push(token);
            }
            if words.len() >= self.config.max_keyphrase_words {
                break;
            }
        }
        words.join(" ").trim().to_string()
    }

    /// Cap a title to at most `max_title_words` content words.
    ///
    /// Unlike `derive`, stopwords met before the cap is reached stay in
    /// the output, and the token that reaches the cap is kept.
    pub fn cap_title_words(&self, title: &str) -> String {
        if title.is_empty() {
            return String::new();
        }

        let mut content_count = 0;
        let mut result: Vec<&str> = Vec::new();
        for token in title.split_whitespace() {
            if self.is_content_word(token) {
                content_count += 1;
            }
            result.push(token);
            if content_count >= self.config.max_title_words {
                break;
            }
        }

        if result.is_empty() {
            title.to_string()
        } else {
            result.join(" ")
        }
    }

    fn is_content_word(&self, token: &str) -> bool {
        let clean = NON_WORD_PATTERN
            .replace_all(&token.to_lowercase(), "")
            .into_owned();
        !clean.is_empty() && !self.config.stopwords.contains(clean.as_str())
    }
}
