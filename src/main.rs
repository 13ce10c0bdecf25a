mod bloom;
mod config;
mod error;
mod matcher;
mod modular;
mod report;
mod rolling_hash;
mod util;

use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

use config::{Algorithm, MatchConfig, DEFAULT_CHUNK_SIZE, DEFAULT_MODULUS};
use report::OutputFormat;

/// Match every k-byte chunk of a query document against a target document.
#[derive(Parser)]
#[command(name = "rkmatch", version, about = "Count how many chunks of one document occur in another")]
struct Cli {
    /// Matching algorithm: naive (0), rk (1) or batch (2)
    #[arg(short = 't', long = "algorithm", value_enum, default_value_t = Algorithm::Naive)]
    algorithm: Algorithm,
    /// Chunk size in bytes
    #[arg(short = 'k', long, default_value_t = DEFAULT_CHUNK_SIZE)]
    chunk_size: usize,
    /// Modulus for the rolling hash
    #[arg(short = 'q', long, default_value_t = DEFAULT_MODULUS)]
    modulus: u64,
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
    /// Document split into chunks
    query: PathBuf,
    /// Document searched for each chunk
    target: PathBuf,
}

/// Read a document and normalize it in place.
fn load_document(path: &Path) -> Result<Vec<u8>> {
    let mut doc = util::read_document(path)?;
    let raw_len = doc.len();
    let len = util::normalize(&mut doc);
    debug!(path = %path.display(), raw_len, len, "Loaded document");
    Ok(doc)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set up logging")?;

    let config = MatchConfig::new(cli.chunk_size, cli.modulus).context("Invalid options")?;
    let algorithm = cli.algorithm;
    let query_path = cli.query;
    let target_path = cli.target;

    let start = Instant::now();

    // Both documents are independent; load and normalize them concurrently.
    let (query, target) = tokio::try_join!(
        tokio::task::spawn_blocking(move || load_document(&query_path)),
        tokio::task::spawn_blocking(move || load_document(&target_path)),
    )?;
    let query = query?;
    let target = target?;

    let summary = tokio::task::spawn_blocking(move || {
        matcher::match_document(algorithm, &query, &target, &config)
    })
    .await?
    .context("Matching failed")?;

    info!(
        algorithm = ?algorithm,
        matched = summary.matched,
        total = summary.total,
        elapsed_secs = start.elapsed().as_secs_f64(),
        "Done"
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match cli.format {
        OutputFormat::Text => summary.write_text(&mut out)?,
        OutputFormat::Json => summary.write_json(&mut out)?,
    }
    out.flush()?;

    Ok(())
}
