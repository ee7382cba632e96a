// ============================================================
// CTA ENFORCER
// ============================================================
// Remove every call-to-action phrase and re-append exactly one

use std::sync::Arc;

use crate::domain::PipelineConfig;

use super::sanitizer::collapse_whitespace;

// Separators left dangling once a CTA has been cut out
const TRAILING_SEPARATORS: &[char] = &[' ', '-', '–', '—', ',', ':', ';'];

pub struct CtaEnforcer {
    config: Arc<PipelineConfig>,
}

impl CtaEnforcer {
    pub fn new(config: Arc<PipelineConfig>) -> Self {
        Self { config }
    }

    /// Remove every occurrence of every configured CTA phrase, then
    /// collapse whitespace and strip trailing separator characters
    pub fn strip_all(&self, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }

        let mut out = text.to_string();
        for phrase in &self.config.cta_phrases {
            out = out.replace(phrase.as_str(), "");
        }
        let out = collapse_whitespace(&out);
        out.trim_end_matches(TRAILING_SEPARATORS).trim().to_string()
    }

    /// Strip all CTAs and append `cta` once at the end. An empty base
    /// yields the bare CTA.
    pub fn enforce_single(&self, text: &str, cta: &str) -> String {
        let base = self.strip_all(text);
        let base = base.trim_end_matches(TRAILING_SEPARATORS).trim_end();
        if base.is_empty() {
            return cta.to_string();
        }
        format!("{base} {cta}")
    }
}
