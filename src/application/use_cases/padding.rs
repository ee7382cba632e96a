// ============================================================
// PADDING ENGINE
// ============================================================
// Extend under-length text with filler sentences without breaching the
// maximum; a trailing CTA stays at the end

use std::sync::Arc;

use crate::domain::PipelineConfig;

use super::sanitizer::collapse_whitespace;
use super::trimmer::{char_len, trim_to_len};

pub struct PaddingEngine {
    config: Arc<PipelineConfig>,
}

impl PaddingEngine {
    pub fn new(config: Arc<PipelineConfig>) -> Self {
        Self { config }
    }

    /// Pad `text` toward `min_desc_len` with filler sentences.
    ///
    /// Fillers are spliced before a trailing CTA so the CTA keeps its
    /// final position. The maximum always wins: overflow is trimmed and
    /// padding stops. Running out of fillers below the minimum is an
    /// accepted terminal state.
    pub fn pad_to_min(&self, text: &str) -> String {
        let mut out = text.to_string();

        for filler in &self.config.filler_sentences {
            if char_len(&out) >= self.config.min_desc_len {
                break;
            }

            out = match self.trailing_cta(&out) {
                Some(cta) => {
                    let base = out[..out.len() - cta.len()].trim_end();
                    format!("{base} {filler} {cta}")
                }
                None => format!("{out} {filler}"),
            };
            out = collapse_whitespace(&out);

            if char_len(&out) > self.config.max_desc_len {
                out = trim_to_len(&out, self.config.max_desc_len);
                out = collapse_whitespace(&out);
                break;
            }
        }

        out
    }

    fn trailing_cta(&self, text: &str) -> Option<&str> {
        self.config
            .cta_phrases
            .iter()
            .map(String::as_str)
            .find(|cta| text.ends_with(cta))
    }
}
