// ============================================================
// KEYPHRASE INJECTOR
// ============================================================
// Guarantee keyphrase presence in title, meta description and long
// description; containment checks are case-insensitive and
// markup-stripped, never raw substring matches

use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

use crate::domain::PipelineConfig;

use super::cta::CtaEnforcer;
use super::finalizer::DescriptionFinalizer;
use super::sanitizer::{collapse_whitespace, TextSanitizer};
use super::trimmer::trim_to_len;

static MARKUP_TAG_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());

/// Lowercase, strip markup tags to spaces, collapse whitespace
fn normalize_for_match(text: &str) -> String {
    let lowered = text.to_lowercase();
    let stripped = MARKUP_TAG_PATTERN.replace_all(&lowered, " ");
    collapse_whitespace(&stripped)
}

pub struct KeyphraseInjector {
    config: Arc<PipelineConfig>,
    sanitizer: TextSanitizer,
    cta: CtaEnforcer,
    finalizer: DescriptionFinalizer,
}

impl KeyphraseInjector {
    pub fn new(config: Arc<PipelineConfig>) -> Self {
        Self {
            sanitizer: TextSanitizer::new(config.clone()),
            cta: CtaEnforcer::new(config.clone()),
            finalizer: DescriptionFinalizer::new(config.clone()),
            config,
        }
    }

    /// Prepend the keyphrase to the title unless it is already present,
    /// then re-trim to the title's hard maximum
    pub fn inject_into_title(&self, title: &str, keyphrase: &str) -> String {
        let title = self.sanitizer.sanitize(title);
        let kp = self.sanitizer.sanitize(keyphrase);
        if kp.is_empty() {
            return title;
        }
        if normalize_for_match(&title).contains(&normalize_for_match(&kp)) {
            return title;
        }

        let merged = format!("{kp} – {title}");
        let merged = merged.trim_matches(&[' ', '–', '-'][..]);
        trim_to_len(merged, self.config.max_title_len)
    }

    /// Finalize the description and, when the keyphrase is missing, lead
    /// with it and re-run the finalizer so length and CTA contracts hold
    pub fn inject_into_description(&self, description: &str, keyphrase: &str) -> String {
        let desc = self.finalizer.finalize(description);
        let kp = self.sanitizer.sanitize(keyphrase);
        if kp.is_empty() {
            return desc;
        }
        if normalize_for_match(&desc).contains(&normalize_for_match(&kp)) {
            return desc;
        }

        let base = self.cta.strip_all(&desc);
        self.finalizer.finalize(&format!("{kp}: {base}"))
    }

    /// Prepend a keyphrase paragraph to the long description unless its
    /// opening window already mentions the keyphrase. Only the probe
    /// window is inspected; the rest of the text is never touched.
    pub fn inject_into_long_description(&self, long_desc: &str, keyphrase: &str) -> String {
        let kp = self.sanitizer.sanitize(keyphrase);
        if kp.is_empty() {
            return long_desc.trim().to_string();
        }

        let ld = long_desc.trim_start();
        let head: String = ld.chars().take(self.config.long_desc_probe_len).collect();
        let head = MARKUP_TAG_PATTERN.replace_all(&head, " ");
        if normalize_for_match(&head).contains(&normalize_for_match(&kp)) {
            return ld.to_string();
        }

        format!("<p>{kp}</p>\n{ld}").trim().to_string()
    }
}
