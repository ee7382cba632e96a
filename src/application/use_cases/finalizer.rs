// ============================================================
// DESCRIPTION FINALIZER
// ============================================================
// Convergent length-window enforcement over sanitize, CTA, trim and pad

use std::sync::Arc;

use crate::domain::PipelineConfig;

use super::cta::CtaEnforcer;
use super::padding::PaddingEngine;
use super::sanitizer::TextSanitizer;
use super::trimmer::{char_len, trim_to_len};

/// Fixed-order states of the finalization machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Sanitize,
    EnforceCta,
    Shrink,
    Grow,
    Done,
}

// Upper bound on state transitions; the fixed Sanitize → EnforceCta →
// Shrink → Grow → Done walk needs four, the cap keeps any future edit
// from reintroducing an unbounded loop.
const MAX_STEPS: usize = 8;

/// Drives arbitrary text to a stable fixed point that satisfies the
/// description contracts: at most `max_desc_len` characters always, at
/// least `min_desc_len` when the filler budget allows, exactly one CTA
/// at the end.
pub struct DescriptionFinalizer {
    config: Arc<PipelineConfig>,
    sanitizer: TextSanitizer,
    cta: CtaEnforcer,
    padding: PaddingEngine,
}

impl DescriptionFinalizer {
    pub fn new(config: Arc<PipelineConfig>) -> Self {
        Self {
            sanitizer: TextSanitizer::new(config.clone()),
            cta: CtaEnforcer::new(config.clone()),
            padding: PaddingEngine::new(config.clone()),
            config,
        }
    }

    /// Finalize `text`. Total and idempotent: every input produces a
    /// valid result, and re-finalizing a finalized string is a no-op.
    pub fn finalize(&self, text: &str) -> String {
        let max = self.config.max_desc_len;
        let cta = self.config.default_cta.as_str();

        let mut out = text.to_string();
        let mut state = State::Sanitize;
        let mut steps = 0;

        while state != State::Done && steps < MAX_STEPS {
            steps += 1;
            state = match state {
                State::Sanitize => {
                    out = self.sanitizer.sanitize(&out);
                    State::EnforceCta
                }
                State::EnforceCta => {
                    out = self.cta.enforce_single(&out, cta);
                    State::Shrink
                }
                State::Shrink => {
                    if char_len(&out) > max {
                        out = trim_to_len(&out, max);
                        // Trimming may have cut the CTA off
                        out = self.cta.enforce_single(&out, cta);
                        if char_len(&out) > max {
                            out = trim_to_len(&out, max);
                        }
                    }
                    State::Grow
                }
                State::Grow => {
                    if char_len(&out) < self.config.min_desc_len {
                        out = self.padding.pad_to_min(&out);
                        if char_len(&out) > max {
                            out = trim_to_len(&out, max);
                            out = self.cta.enforce_single(&out, cta);
                            if char_len(&out) > max {
                                out = trim_to_len(&out, max);
                            }
                        }
                    }
                    State::Done
                }
                State::Done => State::Done,
            };
        }

        out.trim().to_string()
    }
}
