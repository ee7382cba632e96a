// ============================================================
// TEXT SANITIZER
// ============================================================
// Strip quoting artifacts, URLs, banned vocabulary and stray punctuation

use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

use crate::domain::PipelineConfig;

static FULL_URL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bhttps?://\S+\b").unwrap());

static WWW_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bwww\.\S+\b").unwrap());

static BARE_DOMAIN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b[^\s]+\.(it|com|net|org|eu|info|biz)\b").unwrap());

static WHITESPACE_RUN_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

static SPACE_BEFORE_PUNCT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+([,;:.!?])").unwrap());

static REPEATED_PUNCT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([,;:.!?]){2,}").unwrap());

/// Collapse whitespace runs to a single space and trim the edges
pub(crate) fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RUN_PATTERN
        .replace_all(text, " ")
        .trim()
        .to_string()
}

/// Pure text cleanup applied before any other pipeline step.
///
/// Never fails; empty input yields empty output.
pub struct TextSanitizer {
    config: Arc<PipelineConfig>,
}

impl TextSanitizer {
    pub fn new(config: Arc<PipelineConfig>) -> Self {
        Self { config }
    }

    pub fn sanitize(&self, text: &str) -> String {
        if text.trim().is_empty() {
            return String::new();
        }

        let mut out = strip_quotes(text);

        // URLs first, so "www." in the banned list only has to catch leftovers
        out = FULL_URL_PATTERN.replace_all(&out, "").into_owned();
        out = WWW_PATTERN.replace_all(&out, "").into_owned();
        out = BARE_DOMAIN_PATTERN.replace_all(&out, "").into_owned();

        // Literal, case-sensitive removal per configured casing variant
        for term in &self.config.banned_terms {
            out = out.replace(term.as_str(), "");
        }

        out = collapse_whitespace(&out);
        out = SPACE_BEFORE_PUNCT_PATTERN
            .replace_all(&out, "$1")
            .into_owned();
        out = REPEATED_PUNCT_PATTERN.replace_all(&out, "$1").into_owned();

        out.trim().to_string()
    }
}

/// Remove straight and curly double quotes, normalize the right single
/// quote to an apostrophe
fn strip_quotes(text: &str) -> String {
    text.replace('"', "")
        .replace('“', "")
        .replace('”', "")
        .replace('’', "'")
        .trim()
        .to_string()
}
