// End-to-end batch enrichment over a temp CSV with a scripted
// in-process generation client.

use std::io::Write;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use seogen::application::use_cases::batch_enricher::{BatchOutcome, BatchRowEnricher};
use seogen::application::{MetaGenerationOrchestrator, StatusSink, DEFAULT_SECTOR};
use seogen::domain::error::Result;
use seogen::domain::{LlmConfig, PipelineConfig};
use seogen::infrastructure::llm_clients::{GenerateOptions, LLMClient};

const REPLY: &str = "TITLE: Raccordo oleodinamico professionale\n\
                     DESCRIPTION: Raccordo oleodinamico robusto per impianti industriali, \
                     tenuta perfetta e montaggio rapido in ogni condizione. Acquista ora";

/// Returns the same well-formed reply for every call; optionally trips
/// a stop flag after a given number of calls
struct ScriptedClient {
    calls: AtomicUsize,
    stop_after: Option<(usize, Arc<AtomicBool>)>,
}

impl ScriptedClient {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            stop_after: None,
        }
    }

    fn stopping_after(calls: usize, flag: Arc<AtomicBool>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            stop_after: Some((calls, flag)),
        }
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
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some((limit, flag)) = &self.stop_after {
            if call >= *limit {
                flag.store(true, Ordering::Relaxed);
            }
        }
        Ok(REPLY.to_string())
    }
}

fn write_input(rows: usize) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "ID;Tipo;SKU;Nome breve;Nome;Extra;A;B;C;Descrizione breve").unwrap();
    for i in 0..rows {
        writeln!(
            file,
            "{i};simple;SKU{i};breve;Raccordo a gomito DKOL {i};x;;;;Tubo robusto per olio"
        )
        .unwrap();
    }
    file
}

fn enricher(
    client: Arc<dyn LLMClient + Send + Sync>,
    stop: Arc<AtomicBool>,
) -> BatchRowEnricher {
    let config = Arc::new(PipelineConfig::default());
    let orchestrator = MetaGenerationOrchestrator::new(
        config.clone(),
        LlmConfig::default(),
        client,
        DEFAULT_SECTOR,
        StatusSink::disabled(),
    );
    BatchRowEnricher::new(config, orchestrator, stop, StatusSink::disabled())
}

fn read_output(path: &std::path::Path) -> Vec<csv::StringRecord> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .has_headers(false)
        .from_path(path)
        .unwrap();
    reader.records().map(|r| r.unwrap()).collect()
}

#[tokio::test]
async fn test_full_batch_enriches_every_row() {
    let input = write_input(3);
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.csv");

    let stop = Arc::new(AtomicBool::new(false));
    let outcome = enricher(Arc::new(ScriptedClient::new()), stop)
        .run(input.path(), &output)
        .await
        .unwrap();

    assert_eq!(outcome, BatchOutcome::Done { rows: 3 });

    let records = read_output(&output);
    assert_eq!(records.len(), 4);

    // Target columns are appended to the header
    let header: Vec<&str> = records[0].iter().collect();
    assert!(header.contains(&"Meta: _yoast_wpseo_focuskw"));
    assert!(header.contains(&"Meta: _yoast_wpseo_title"));
    assert!(header.contains(&"Meta: _yoast_wpseo_metadesc"));
    assert!(header.contains(&"Descrizione"));

    let focuskw_idx = header
        .iter()
        .position(|h| *h == "Meta: _yoast_wpseo_focuskw")
        .unwrap();
    let metadesc_idx = header
        .iter()
        .position(|h| *h == "Meta: _yoast_wpseo_metadesc")
        .unwrap();
    let long_desc_idx = header.iter().position(|h| *h == "Descrizione").unwrap();

    for record in &records[1..] {
        let focuskw = record.get(focuskw_idx).unwrap();
        assert!(focuskw.starts_with("Raccordo gomito DKOL"));

        let metadesc = record.get(metadesc_idx).unwrap();
        assert!(metadesc.chars().count() <= 150);
        assert_eq!(metadesc.matches("Acquista ora").count(), 1);

        let long_desc = record.get(long_desc_idx).unwrap();
        assert!(long_desc.starts_with(&format!("<p>{focuskw}</p>")));
    }
}

#[tokio::test]
async fn test_stop_after_five_rows_leaves_valid_truncated_output() {
    let input = write_input(20);
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.csv");

    let stop = Arc::new(AtomicBool::new(false));
    // The flag trips during the fifth generation call, so the boundary
    // check stops the run before row six
    let client = Arc::new(ScriptedClient::stopping_after(5, stop.clone()));
    let outcome = enricher(client, stop).run(input.path(), &output).await.unwrap();

    assert_eq!(outcome, BatchOutcome::Stopped { rows: 5 });

    let records = read_output(&output);
    assert_eq!(records.len(), 6); // header + 5 enriched rows
}

#[tokio::test]
async fn test_blank_rows_are_dropped() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "A;B;C;D;Nome;F;G;H;I;Descrizione breve").unwrap();
    writeln!(file, ";;;;;;;;;").unwrap();
    writeln!(file, "1;;;;Tubo flessibile;;;;;Gomma per olio").unwrap();

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.csv");

    let stop = Arc::new(AtomicBool::new(false));
    let outcome = enricher(Arc::new(ScriptedClient::new()), stop)
        .run(file.path(), &output)
        .await
        .unwrap();

    assert_eq!(outcome, BatchOutcome::Done { rows: 1 });
    assert_eq!(read_output(&output).len(), 2);
}
