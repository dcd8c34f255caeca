//! CLI binary for cvsift.
//!
//! A thin shim over the library crate that maps CLI flags to `BatchConfig`
//! and prints per-document progress plus a final summary.

use anyhow::{Context, Result};
use clap::Parser;
use cvsift::{
    run_batch, run_batch_to_csv, BatchConfig, BatchProgressCallback, ProgressCallback,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: one bar at the bottom, a log line per
/// document above it. Works when documents complete out of order
/// (`--concurrency > 1`).
struct CliProgressCallback {
    bar: ProgressBar,
    errors: AtomicUsize,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.cyan} {prefix:.bold}  [{bar:40.green/238}] {pos:>3}/{len} documents  ⏱ {elapsed_precise}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏  "),
        );
        bar.set_prefix("Screening");
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self {
            bar,
            errors: AtomicUsize::new(0),
        })
    }
}

impl BatchProgressCallback for CliProgressCallback {
    fn on_batch_start(&self, total_documents: usize) {
        self.bar.set_length(total_documents as u64);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Screening {total_documents} documents…"))
        ));
    }

    fn on_document_start(&self, _index: usize, source_id: &str, _total: usize) {
        self.bar.set_message(source_id.to_string());
    }

    fn on_document_complete(&self, _index: usize, source_id: &str, _total: usize) {
        self.bar
            .println(format!("  {} {}", green("✓"), source_id));
        self.bar.inc(1);
    }

    fn on_document_failed(&self, _index: usize, source_id: &str, _total: usize, error: String) {
        self.errors.fetch_add(1, Ordering::SeqCst);
        // Truncate very long error messages to keep output tidy.
        let msg = if error.chars().count() > 100 {
            let head: String = error.chars().take(99).collect();
            format!("{head}…")
        } else {
            error
        };
        self.bar
            .println(format!("  {} {}  {}", red("✗"), source_id, red(&msg)));
        self.bar.inc(1);
    }

    fn on_batch_complete(&self, total_documents: usize, succeeded: usize) {
        let failed = total_documents.saturating_sub(succeeded);
        self.bar.finish_and_clear();
        if failed == 0 {
            eprintln!(
                "{} {} documents screened successfully",
                green("✔"),
                bold(&succeeded.to_string())
            );
        } else {
            eprintln!(
                "{} {}/{} documents screened  ({} failed)",
                if succeeded == 0 { red("✘") } else { cyan("⚠") },
                bold(&succeeded.to_string()),
                total_documents,
                red(&failed.to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Screen a folder of CVs into processed_cvs.csv
  cvsift ./pdfs

  # Explicit output path and model
  cvsift ./pdfs -o screened.csv --model llama3

  # Kill any single model call after 2 minutes
  cvsift ./pdfs --timeout 120

  # Structured JSON (records, failures, stats) on stdout instead of CSV
  cvsift ./pdfs --json > result.json

SETUP:
  1. Install Ollama and pull a model:   ollama pull mistral
  2. Screen:                            cvsift ./pdfs -o processed_cvs.csv

  Failed documents never abort the batch: each failure is reported on
  stderr and the remaining documents are still processed.

ENVIRONMENT VARIABLES:
  CVSIFT_MODEL        Model passed to `ollama run` (default: mistral)
  CVSIFT_OLLAMA_BIN   Path to the ollama binary (default: from PATH)
  CVSIFT_OUTPUT       Default output CSV path
"#;

/// Screen CV/resume PDFs with a local language model into fixed-schema CSV.
#[derive(Parser, Debug)]
#[command(
    name = "cvsift",
    version,
    about = "Screen CV/resume PDFs with a local language model into fixed-schema CSV",
    long_about = "Extract text from every PDF in a directory, ask a local language model \
(via Ollama) for a structured assessment, and normalise the answers into one CSV row per \
document. Documents that fail are reported and skipped — one bad input never aborts a batch.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Directory containing the PDF documents to screen.
    input_dir: PathBuf,

    /// Write CSV to this file.
    #[arg(short, long, env = "CVSIFT_OUTPUT", default_value = "processed_cvs.csv")]
    output: PathBuf,

    /// Model passed to `ollama run`.
    #[arg(long, env = "CVSIFT_MODEL", default_value = "mistral")]
    model: String,

    /// Path to the ollama binary.
    #[arg(long, env = "CVSIFT_OLLAMA_BIN", default_value = "ollama")]
    ollama_bin: PathBuf,

    /// Per-document model call timeout in seconds (0 = no timeout).
    #[arg(long, env = "CVSIFT_TIMEOUT", default_value_t = 0)]
    timeout: u64,

    /// Number of documents processed at once. Keep at 1 for a single local
    /// Ollama instance.
    #[arg(short, long, env = "CVSIFT_CONCURRENCY", default_value_t = 1)]
    concurrency: usize,

    /// Path to a text file replacing the built-in instruction preamble.
    #[arg(long, env = "CVSIFT_PREAMBLE")]
    preamble: Option<PathBuf>,

    /// Omit the trailing "Source File" column.
    #[arg(long)]
    no_source_column: bool,

    /// Print the full batch result as JSON on stdout instead of writing CSV.
    #[arg(long)]
    json: bool,

    /// Disable the progress bar.
    #[arg(long, env = "CVSIFT_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "CVSIFT_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "CVSIFT_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active; the
    // bar provides all the feedback that matters to the user.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let config = build_config(&cli, show_progress).await?;

    // ── Run batch ────────────────────────────────────────────────────────
    if cli.json {
        let result = run_batch(&cli.input_dir, &config)
            .await
            .context("Batch failed")?;
        let json = serde_json::to_string_pretty(&result).context("Failed to serialise result")?;
        println!("{json}");
        return Ok(());
    }

    let result = run_batch_to_csv(&cli.input_dir, &cli.output, &config)
        .await
        .context("Batch failed")?;

    if !cli.quiet {
        eprintln!(
            "{}  {}/{} documents  {}ms  →  {}",
            if result.stats.failed == 0 {
                green("✔")
            } else {
                cyan("⚠")
            },
            result.stats.succeeded,
            result.stats.total_documents,
            result.stats.total_duration_ms,
            bold(&cli.output.display().to_string()),
        );
        for failure in &result.failures {
            eprintln!(
                "   {} {}  {}",
                red("✗"),
                failure.source_id,
                dim(&failure.reason.to_string())
            );
        }
    }

    Ok(())
}

/// Map CLI args to `BatchConfig`.
async fn build_config(cli: &Cli, show_progress: bool) -> Result<BatchConfig> {
    let mut builder = BatchConfig::builder()
        .model(cli.model.clone())
        .ollama_binary(cli.ollama_bin.clone())
        .concurrency(cli.concurrency)
        .include_source_column(!cli.no_source_column);

    if cli.timeout > 0 {
        builder = builder.invoke_timeout_secs(cli.timeout);
    }

    if let Some(ref path) = cli.preamble {
        let preamble = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read preamble from {path:?}"))?;
        builder = builder.preamble(preamble);
    }

    if show_progress {
        let cb = CliProgressCallback::new();
        builder = builder.progress(cb as ProgressCallback);
    }

    builder.build().context("Invalid configuration")
}
