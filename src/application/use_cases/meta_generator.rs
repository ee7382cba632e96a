// ============================================================
// META GENERATION ORCHESTRATOR
// ============================================================
// Invoke the generation service, parse its labeled reply and repair the
// results through the finalizers; every service failure degrades to
// fallback fields instead of failing the row

use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;
use std::time::Instant;

use crate::domain::{GeneratedMeta, LlmConfig, PipelineConfig};
use crate::infrastructure::llm_clients::{GenerateOptions, LLMClient};

use crate::application::status::StatusSink;

use super::finalizer::DescriptionFinalizer;
use super::keyphrase::KeyphraseDeriver;
use super::sanitizer::TextSanitizer;
use super::trimmer::{char_len, trim_to_len};

pub const DEFAULT_SECTOR: &str =
    "oleodinamica e meccanica industriale (raccordi, tubi, oli, componenti)";

const GENERATE_TEMPERATURE: f32 = 0.6;
const REWRITE_TEMPERATURE: f32 = 0.5;

// How much of a product name or raw reply ends up in a log line
const LOG_SNIPPET_LEN: usize = 40;
const REPLY_SNIPPET_LEN: usize = 300;

static TITLE_LINE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^title\s*:\s*(.+)$").unwrap());

static DESCRIPTION_LINE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^description\s*:\s*(.+)$").unwrap());

const BASE_PROMPT: &str = r#"Sei uno specialista SEO per e-commerce B2B.

Settore / categoria prodotti:
"""{settore}"""

Devi generare:
- UN SEO title (max 60 caratteri) in italiano.
- UNA meta description (idealmente tra 120 e 150 caratteri) in italiano.

REQUISITI SEO TITLE:
- massimo 60 caratteri
- includi la parola chiave principale derivata dal nome prodotto
- chiaro, descrittivo e invogliante, senza frasi passive
- nessun nome di piattaforma o negozio (niente WooCommerce, WordPress, Scada24, ecc.)
- nessun URL o dominio (niente www, .it, http, https)

REQUISITI META DESCRIPTION:
- puntare a una lunghezza tra 120 e 150 caratteri
- includere la stessa parola chiave principale
- testo naturale e specifico per questo prodotto (caratteristiche tecniche, uso, vantaggi)
- UNA sola call to action breve ALLA FINE (es. Scopri di più, Acquista ora, Ordina online)
- NON ripetere più volte la stessa call to action
- nessun nome di piattaforma o negozio (niente WooCommerce, WordPress, Scada24, ecc.)
- nessun URL o dominio (niente www, .it, http, https)

CONTESTO PRODOTTO:
"""{contesto}"""

FORMATO RISPOSTA (OBBLIGATORIO):
Rispondi esattamente con DUE righe:

TITLE: <SEO title qui, in una sola riga>
DESCRIPTION: <meta description qui, in una sola riga>

Non aggiungere altre righe, testo o simboli.
"#;

const REWRITE_PROMPT: &str = r#"Sei uno specialista SEO per e-commerce B2B.

Devi RISCRIVERE la seguente meta description in italiano in modo che:
- sia compresa indicativamente tra 120 e 150 caratteri
- resti naturale e leggibile
- descriva il prodotto in modo specifico (uso, caratteristiche tecniche, vantaggi)
- includa UNA sola call to action breve ALLA FINE della frase
- NON ripeta più volte parole come "Scopri di più", "Acquista ora", "Ordina online"

VINCOLI:
- NON usare il carattere " (doppi apici) da nessuna parte nel testo.
- NON usare markdown.
- NON inserire URL o domini (niente www, .it, http, https).
- NON citare nomi di piattaforme o negozi (WooCommerce, WordPress, Scada24, ecc.).

NOME PRODOTTO:
"""{nome}"""

META DESCRIPTION ORIGINALE:
"""{descrizione}"""

Rispondi SOLO con la nuova meta description, in UNA sola riga, senza prefissi tipo DESCRIPTION:.
"#;

pub struct MetaGenerationOrchestrator {
    config: Arc<PipelineConfig>,
    llm_config: LlmConfig,
    client: Arc<dyn LLMClient + Send + Sync>,
    prompt_template: String,
    sanitizer: TextSanitizer,
    deriver: KeyphraseDeriver,
    finalizer: DescriptionFinalizer,
    status: StatusSink,
}

impl MetaGenerationOrchestrator {
    pub fn new(
        config: Arc<PipelineConfig>,
        llm_config: LlmConfig,
        client: Arc<dyn LLMClient + Send + Sync>,
        sector: &str,
        status: StatusSink,
    ) -> Self {
        let sector = if sector.trim().is_empty() {
            DEFAULT_SECTOR
        } else {
            sector.trim()
        };
        Self {
            sanitizer: TextSanitizer::new(config.clone()),
            deriver: KeyphraseDeriver::new(config.clone()),
            finalizer: DescriptionFinalizer::new(config.clone()),
            prompt_template: BASE_PROMPT.replace("{settore}", sector),
            config,
            llm_config,
            client,
            status,
        }
    }

    /// Generate a (title, description) pair for one product row.
    ///
    /// Both inputs empty short-circuits to an empty pair without any
    /// service call. Per-row service failures are logged and degrade to
    /// empty or fallback fields; this function never fails.
    pub async fn generate(&self, product_name: &str, raw_description: &str) -> GeneratedMeta {
        let name = product_name.trim();
        let description = raw_description.trim();

        if name.is_empty() && description.is_empty() {
            return GeneratedMeta::default();
        }

        let context = format!("Nome prodotto: {name}\nDescrizione: {description}");
        let prompt = self.prompt_template.replace("{contesto}", &context);

        let start = Instant::now();
        let raw = match self
            .client
            .generate(
                &self.llm_config,
                &prompt,
                &GenerateOptions {
                    num_predict: self.llm_config.max_tokens,
                    temperature: GENERATE_TEMPERATURE,
                },
            )
            .await
        {
            Ok(raw) => raw,
            Err(err) => {
                self.status.warn(format!(
                    "Generation failed for {:?}: {err}",
                    snippet(name, LOG_SNIPPET_LEN)
                ));
                return GeneratedMeta::default();
            }
        };
        self.status.emit(format!(
            "Model reply in {:.1}s for: {:?}",
            start.elapsed().as_secs_f64(),
            snippet(name, LOG_SNIPPET_LEN)
        ));

        let (title, description_out) = parse_labeled_reply(&raw);
        if title.is_empty() && description_out.is_empty() {
            self.status.warn("Unexpected reply format, row skipped.");
            self.status.warn(snippet(&raw, REPLY_SNIPPET_LEN));
            return GeneratedMeta::default();
        }

        let title = self.sanitizer.sanitize(&title);
        let title = trim_to_len(&title, self.config.max_title_len);
        let title = self.deriver.cap_title_words(&title);

        let description = self.repair_description_length(&description_out, name).await;

        GeneratedMeta { title, description }
    }

    /// Drive a description into the configured length window: accept it
    /// when finalization already lands inside, otherwise ask the service
    /// for a narrower rewrite, and fall back to the finalized original
    /// or a template-built description when that fails too.
    async fn repair_description_length(&self, description: &str, product_name: &str) -> String {
        let desc = self.finalizer.finalize(description);
        if desc.is_empty() {
            return self
                .finalizer
                .finalize(&self.fallback_description(product_name));
        }

        let len = char_len(&desc);
        if (self.config.min_desc_len..=self.config.max_desc_len).contains(&len) {
            return desc;
        }

        let prompt = REWRITE_PROMPT
            .replace("{nome}", product_name)
            .replace("{descrizione}", &desc);

        match self
            .client
            .generate(
                &self.llm_config,
                &prompt,
                &GenerateOptions {
                    num_predict: self.llm_config.max_tokens,
                    temperature: REWRITE_TEMPERATURE,
                },
            )
            .await
        {
            Ok(raw) => {
                let first_line = raw.lines().map(str::trim).find(|l| !l.is_empty());
                let rewritten = self.finalizer.finalize(first_line.unwrap_or(""));
                if rewritten.is_empty() {
                    self.status.warn(format!(
                        "No usable rewrite received for {:?}",
                        snippet(product_name, LOG_SNIPPET_LEN)
                    ));
                    desc
                } else {
                    rewritten
                }
            }
            Err(err) => {
                self.status.warn(format!(
                    "Rewrite failed for {:?}: {err}",
                    snippet(product_name, LOG_SNIPPET_LEN)
                ));
                desc
            }
        }
    }

    /// Template-built description used when nothing usable came back
    fn fallback_description(&self, product_name: &str) -> String {
        let name = product_name.trim();
        let name = if name.is_empty() {
            self.config.fallback_product.as_str()
        } else {
            name
        };
        format!(
            "{name} per impianti oleodinamici e applicazioni meccaniche: \
             prestazioni affidabili, materiali resistenti e uso professionale. {}",
            self.config.default_cta
        )
    }
}

/// Pull `TITLE:` / `DESCRIPTION:` values out of a reply; labels match
/// case-insensitively on any line, in any order
fn parse_labeled_reply(raw: &str) -> (String, String) {
    let mut title = String::new();
    let mut description = String::new();

    for line in raw.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(captures) = TITLE_LINE_PATTERN.captures(line) {
            title = captures[1].trim().to_string();
        }
        if let Some(captures) = DESCRIPTION_LINE_PATTERN.captures(line) {
            description = captures[1].trim().to_string();
        }
    }

    (title, description)
}

/// First `max_len` characters of `text`, for log lines
fn snippet(text: &str, max_len: usize) -> String {
    text.chars().take(max_len).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::Result;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct ScriptedClient {
        replies: Vec<String>,
        calls: AtomicUsize,
    }

    impl ScriptedClient {
        fn new(replies: Vec<&str>) -> Self {
            Self {
                replies: replies.into_iter().map(str::to_string).collect(),
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl LLMClient for ScriptedClient {
        async fn generate(
            &self,
            _config: &LlmConfig,
            _prompt: &str,
            _options: &GenerateOptions,
        ) -> Result<String> {
            let index = self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .replies
                .get(index)
                .cloned()
                .unwrap_or_else(|| self.replies.last().cloned().unwrap_or_default()))
        }
    }

    fn orchestrator(client: Arc<ScriptedClient>) -> MetaGenerationOrchestrator {
        MetaGenerationOrchestrator::new(
            Arc::new(PipelineConfig::default()),
            LlmConfig::default(),
            client,
            DEFAULT_SECTOR,
            StatusSink::disabled(),
        )
    }

    #[tokio::test]
    async fn test_empty_inputs_skip_the_service() {
        let client = Arc::new(ScriptedClient::new(vec!["TITLE: x\nDESCRIPTION: y"]));
        let meta = orchestrator(client.clone()).generate("", "   ").await;
        assert!(meta.is_empty());
        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test]
    async fn test_parses_labels_in_any_order() {
        let reply = "DESCRIPTION: Raccordo oleodinamico robusto per impianti industriali, \
                     tenuta perfetta e montaggio rapido in ogni condizione. Acquista ora\n\
                     TITLE: Raccordo DKOL professionale";
        let client = Arc::new(ScriptedClient::new(vec![reply]));
        let meta = orchestrator(client.clone()).generate("Raccordo DKOL", "").await;
        assert_eq!(meta.title, "Raccordo DKOL professionale");
        assert!(meta.description.starts_with("Raccordo oleodinamico robusto"));
        assert_eq!(client.call_count(), 1);
    }

    #[tokio::test]
    async fn test_unlabeled_reply_rejects_row() {
        let client = Arc::new(ScriptedClient::new(vec!["qualcosa di inatteso"]));
        let meta = orchestrator(client).generate("Raccordo DKOL", "tubo").await;
        assert!(meta.is_empty());
    }

    #[tokio::test]
    async fn test_short_description_triggers_rewrite() {
        // "No." pads below the window even after every filler, forcing
        // the narrower rewrite request
        let first = "TITLE: Raccordo DKOL\nDESCRIPTION: No.";
        let rewrite = "Raccordo oleodinamico DKOL per impianti industriali, tenuta affidabile, \
                       montaggio rapido e materiali resistenti nel tempo. Acquista ora";
        let client = Arc::new(ScriptedClient::new(vec![first, rewrite]));
        let meta = orchestrator(client.clone()).generate("Raccordo DKOL", "tubo").await;
        assert_eq!(client.call_count(), 2);
        assert!((120..=150).contains(&char_len(&meta.description)));
        assert!(meta.description.ends_with("Acquista ora"));
    }

    #[tokio::test]
    async fn test_title_is_capped_and_trimmed() {
        let reply = "TITLE: Olio lubrificante speciale per trasmissioni idrauliche pesanti industriali\n\
                     DESCRIPTION: Olio lubrificante per trasmissioni idrauliche industriali, protezione \
                     costante e prestazioni stabili nel tempo. Acquista ora";
        let client = Arc::new(ScriptedClient::new(vec![reply]));
        let meta = orchestrator(client).generate("Olio lubrificante", "").await;
        assert!(char_len(&meta.title) <= 60);
        // Four content words close the title
        assert_eq!(meta.title, "Olio lubrificante speciale per trasmissioni");
    }

    #[tokio::test]
    async fn test_service_error_degrades_to_empty() {
        struct FailingClient;

        #[async_trait]
        impl LLMClient for FailingClient {
            async fn generate(
                &self,
                _config: &LlmConfig,
                _prompt: &str,
                _options: &GenerateOptions,
            ) -> Result<String> {
                Err(crate::domain::AppError::LLMError("timeout".to_string()))
            }
        }

        let orchestrator = MetaGenerationOrchestrator::new(
            Arc::new(PipelineConfig::default()),
            LlmConfig::default(),
            Arc::new(FailingClient),
            DEFAULT_SECTOR,
            StatusSink::disabled(),
        );
        let meta = orchestrator.generate("Raccordo DKOL", "tubo").await;
        assert!(meta.is_empty());
    }

    #[test]
    fn test_fallback_description_uses_default_product() {
        let client = Arc::new(ScriptedClient::new(vec![""]));
        let orchestrator = orchestrator(client);
        let fallback = orchestrator.fallback_description("  ");
        assert!(fallback.starts_with("Componenti oleodinamici"));
        assert!(fallback.ends_with("Acquista ora"));
    }
}
