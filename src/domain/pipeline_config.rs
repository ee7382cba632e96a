// ============================================================
// PIPELINE CONFIG
// ============================================================
// Immutable configuration shared by every pipeline component

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Process-wide configuration for the SEO field synthesis pipeline.
///
/// Built once at startup and never mutated during a run; every length
/// bound is counted in characters, not bytes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Minimum meta description length
    pub min_desc_len: usize,

    /// Maximum meta description length (hard cap, always wins)
    pub max_desc_len: usize,

    /// Maximum SEO title length in characters
    pub max_title_len: usize,

    /// Maximum content words kept in a SEO title
    pub max_title_words: usize,

    /// Maximum content words in a derived keyphrase
    pub max_keyphrase_words: usize,

    /// Terms removed from any text, one entry per casing variant
    pub banned_terms: Vec<String>,

    /// Known call-to-action phrases
    pub cta_phrases: Vec<String>,

    /// CTA appended when enforcing a single trailing call to action
    pub default_cta: String,

    /// Stopwords excluded from content-word counting (lowercase)
    pub stopwords: HashSet<String>,

    /// Filler sentences used to pad under-length descriptions, in order
    pub filler_sentences: Vec<String>,

    /// Fallback product phrase when a row has no usable product name
    pub fallback_product: String,

    /// 0-based input column holding the product name
    pub title_column: usize,

    /// 0-based input column holding the product description
    pub description_column: usize,

    /// Output header for the focus keyphrase column
    pub focuskw_header: String,

    /// Output header for the SEO title column
    pub title_header: String,

    /// Output header for the meta description column
    pub metadesc_header: String,

    /// Output header for the long description column
    pub long_desc_header: String,

    /// Emit a progress line every N rows
    pub progress_interval: usize,

    /// How many leading characters of the long description are probed
    /// for keyphrase presence
    pub long_desc_probe_len: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            min_desc_len: 120,
            max_desc_len: 150,
            max_title_len: 60,
            max_title_words: 4,
            max_keyphrase_words: 4,
            banned_terms: [
                "woocommerce",
                "WooCommerce",
                "WordPress",
                "wordpress",
                "scada24",
                "Scada24",
                "www.",
                "http://",
                "https://",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            cta_phrases: ["Scopri di più", "Acquista ora", "Ordina online"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            default_cta: "Acquista ora".to_string(),
            stopwords: [
                "di", "a", "da", "in", "con", "su", "per", "tra", "fra", "e", "ed", "il", "lo",
                "la", "i", "gli", "le", "un", "uno", "una", "del", "della", "dei", "degli",
                "delle", "al", "allo", "alla", "ai", "agli", "alle", "dal", "dallo", "dalla",
                "dai", "dagli", "dalle", "nel", "nello", "nella", "nei", "negli", "nelle", "col",
                "coi", "sul", "sullo", "sulla", "sui", "sugli", "sulle",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            filler_sentences: [
                "Qualità professionale e affidabilità costante.",
                "Ideale per impianti e manutenzioni industriali.",
                "Materiali resistenti e prestazioni stabili nel tempo.",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            fallback_product: "Componenti oleodinamici per impianti industriali".to_string(),
            title_column: 4,
            description_column: 9,
            focuskw_header: "Meta: _yoast_wpseo_focuskw".to_string(),
            title_header: "Meta: _yoast_wpseo_title".to_string(),
            metadesc_header: "Meta: _yoast_wpseo_metadesc".to_string(),
            long_desc_header: "Descrizione".to_string(),
            progress_interval: 10,
            long_desc_probe_len: 500,
        }
    }
}

impl PipelineConfig {
    /// Validate internal consistency before a run
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.min_desc_len >= self.max_desc_len {
            return Err(format!(
                "min_desc_len ({}) must be below max_desc_len ({})",
                self.min_desc_len, self.max_desc_len
            ));
        }
        if self.max_title_len == 0 {
            return Err("max_title_len must be positive".to_string());
        }
        if self.default_cta.trim().is_empty() {
            return Err("default_cta must not be empty".to_string());
        }
        if self.progress_interval == 0 {
            return Err("progress_interval must be positive".to_string());
        }
        Ok(())
    }
}
