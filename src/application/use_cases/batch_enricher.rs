// ============================================================
// BATCH ROW ENRICHER
// ============================================================
// Iterate product rows, apply the pipeline and write enriched rows
// incrementally; cancellation is cooperative and checked once per row

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::domain::error::Result;
use crate::domain::PipelineConfig;
use crate::infrastructure::csv::{read_table, RowWriter};

use crate::application::status::StatusSink;

use super::injector::KeyphraseInjector;
use super::keyphrase::KeyphraseDeriver;
use super::meta_generator::MetaGenerationOrchestrator;

/// Terminal state of a batch run. Fatal errors surface as `Err` from
/// `run`; a user-requested stop is a normal outcome, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOutcome {
    /// All rows processed
    Done { rows: usize },
    /// Stopped by request at a row boundary; the output file is valid
    /// and contains every row processed so far
    Stopped { rows: usize },
}

pub struct BatchRowEnricher {
    config: Arc<PipelineConfig>,
    orchestrator: MetaGenerationOrchestrator,
    deriver: KeyphraseDeriver,
    injector: KeyphraseInjector,
    stop_requested: Arc<AtomicBool>,
    status: StatusSink,
}

impl BatchRowEnricher {
    pub fn new(
        config: Arc<PipelineConfig>,
        orchestrator: MetaGenerationOrchestrator,
        stop_requested: Arc<AtomicBool>,
        status: StatusSink,
    ) -> Self {
        Self {
            deriver: KeyphraseDeriver::new(config.clone()),
            injector: KeyphraseInjector::new(config.clone()),
            config,
            orchestrator,
            stop_requested,
            status,
        }
    }

    /// Run the batch: read every row of `input`, enrich it and append it
    /// to `output`. Rows are written one at a time, so a mid-run stop
    /// leaves a valid truncated file behind.
    pub async fn run(&self, input: &Path, output: &Path) -> Result<BatchOutcome> {
        let start = Instant::now();
        let table = read_table(input)?;

        if table.rows.is_empty() {
            self.status.emit("No rows found in the input CSV.");
            return Ok(BatchOutcome::Done { rows: 0 });
        }

        let mut rows = table.rows;
        let mut header = rows.remove(0);

        let focuskw_idx = header.get_or_add(&self.config.focuskw_header);
        let title_idx = header.get_or_add(&self.config.title_header);
        let metadesc_idx = header.get_or_add(&self.config.metadesc_header);
        let long_desc_idx = header.get_or_add(&self.config.long_desc_header);
        let max_target_idx = focuskw_idx
            .max(title_idx)
            .max(metadesc_idx)
            .max(long_desc_idx);

        let data_rows: Vec<_> = rows.into_iter().filter(|row| !row.is_blank()).collect();
        let total = data_rows.len();

        self.status.emit(format!("Rows to process: {total}"));
        self.status.emit(format!(
            "Detected delimiter: {:?}",
            table.dialect.delimiter as char
        ));

        let mut writer = RowWriter::create(output, table.dialect)?;
        writer.write(&header)?;

        for (done, mut row) in data_rows.into_iter().enumerate() {
            if self.stop_requested.load(Ordering::Relaxed) {
                self.status.emit("Stopped by request.");
                return Ok(BatchOutcome::Stopped { rows: done });
            }

            row.ensure_len(max_target_idx);

            let name = row.get(self.config.title_column).to_string();
            let raw_description = row.get(self.config.description_column).to_string();

            // A per-row generation failure is swallowed inside the
            // orchestrator; only file-level errors abort the batch
            let meta = self.orchestrator.generate(&name, &raw_description).await;

            // The keyphrase comes from the row's product name, never
            // from the generated title
            let keyphrase = self.deriver.derive(&name);

            let title = self.injector.inject_into_title(&meta.title, &keyphrase);
            let description = self
                .injector
                .inject_into_description(&meta.description, &keyphrase);
            let long_description = self
                .injector
                .inject_into_long_description(row.get(long_desc_idx), &keyphrase);

            row.set(focuskw_idx, keyphrase);
            row.set(title_idx, title);
            row.set(metadesc_idx, description);
            row.set(long_desc_idx, long_description);

            writer.write(&row)?;

            if (done + 1) % self.config.progress_interval == 0 {
                self.status
                    .emit(format!("Rows processed: {}/{}", done + 1, total));
            }
        }

        self.status.emit(format!(
            "Done. {} rows enriched in {:.1}s, output: {}",
            total,
            start.elapsed().as_secs_f64(),
            output.display()
        ));
        Ok(BatchOutcome::Done { rows: total })
    }
}
