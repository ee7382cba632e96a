use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::Parser;
use tokio::sync::mpsc;

use seogen::application::{
    BatchOutcome, BatchRowEnricher, MetaGenerationOrchestrator, StatusSink, DEFAULT_SECTOR,
};
use seogen::domain::error::{AppError, Result};
use seogen::infrastructure::config;
use seogen::infrastructure::llm_clients::{LLMClient, OllamaClient};

#[derive(Parser)]
#[command(name = "seogen", version, about = "Enrich a product CSV with SEO metadata")]
struct Cli {
    /// Input CSV file (WooCommerce product export)
    input: PathBuf,

    /// Output CSV file; defaults to `<input>_con_meta.csv`
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Product sector/category used to steer generation
    #[arg(short, long)]
    sector: Option<String>,

    /// Configuration file (TOML); defaults to `seogen.toml` if present
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the effective configuration and exit
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let _ = tracing_subscriber::fmt().with_env_filter("info").try_init();

    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let app_config = config::load(cli.config.as_deref())?;

    if cli.dry_run {
        println!("{:#?}", app_config);
        return Ok(());
    }

    if !cli.input.exists() {
        return Err(AppError::ValidationError(format!(
            "Input file does not exist: {}",
            cli.input.display()
        )));
    }

    let output = cli
        .output
        .unwrap_or_else(|| default_output_path(&cli.input));
    let sector = cli.sector.unwrap_or_else(|| DEFAULT_SECTOR.to_string());

    let pipeline = Arc::new(app_config.pipeline);
    let client: Arc<dyn LLMClient + Send + Sync> =
        Arc::new(OllamaClient::new(app_config.llm.timeout_secs));

    let stop_requested = Arc::new(AtomicBool::new(false));
    let (status_tx, mut status_rx) = mpsc::unbounded_channel();
    let status = StatusSink::new(status_tx);

    let orchestrator = MetaGenerationOrchestrator::new(
        pipeline.clone(),
        app_config.llm,
        client,
        &sector,
        status.clone(),
    );
    let enricher = BatchRowEnricher::new(pipeline, orchestrator, stop_requested.clone(), status);

    // Ctrl-C requests a cooperative stop; the worker honors it at the
    // next row boundary, so an in-flight generation call still completes
    {
        let stop_requested = stop_requested.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                stop_requested.store(true, Ordering::Relaxed);
            }
        });
    }

    let input = cli.input.clone();
    let output_for_worker = output.clone();
    let worker =
        tokio::spawn(async move { enricher.run(&input, &output_for_worker).await });

    while let Some(line) = status_rx.recv().await {
        println!("{line}");
    }

    let outcome = worker
        .await
        .map_err(|e| AppError::Internal(format!("Worker task failed: {e}")))??;

    match outcome {
        BatchOutcome::Done { rows } => {
            println!("Completed: {rows} rows -> {}", output.display());
        }
        BatchOutcome::Stopped { rows } => {
            println!(
                "Stopped by request after {rows} rows; partial output: {}",
                output.display()
            );
        }
    }

    Ok(())
}

fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    input.with_file_name(format!("{stem}_con_meta.csv"))
}
