//! # News Normalizer
//!
//! Turns raw news payloads saved by an external fetcher into one list of
//! canonical article records for downstream processing (text-to-speech,
//! summarization, fine-tuning).
//!
//! ## Sources
//!
//! - NewsAPI top headlines (`news_api`)
//! - Currents latest news (`currents`)
//! - GNews top headlines (`gnews`)
//! - CNN RSS feed entries (`cnn`)
//!
//! ## Usage
//!
//! ```sh
//! news_normalizer -r data/raw -o data/processed/processed_news_data.json -t truncate-aware
//! ```
//!
//! ## Pipeline
//!
//! 1. **Loading**: Read every configured raw payload (concurrently)
//! 2. **Normalizing**: Map each payload to canonical records, in source order
//! 3. **Output**: Write the processed JSON file and, optionally, merge article
//!    URLs into the URL index

use clap::Parser;
use std::error::Error;
use std::path::Path;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod models;
mod normalize;
mod outputs;
mod sources;
mod utils;

use cli::Cli;
use config::PipelineConfig;
use normalize::normalize_all;
use outputs::json;
use utils::ensure_writable_dir;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("news_normalizer starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let config = match PipelineConfig::from_cli(&args) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Failed to load configuration");
            return Err(e);
        }
    };
    info!(
        jobs = config.jobs.len(),
        truncation = ?config.truncation,
        output = %config.output.display(),
        "Configuration resolved"
    );

    // Early check: the output location must be writable before any work
    let output_dir = config
        .output
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    if let Err(e) = ensure_writable_dir(output_dir).await {
        error!(
            path = %output_dir.display(),
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    // ---- Load raw payloads ----
    let payloads = match sources::load_all(&config.jobs).await {
        Ok(payloads) => payloads,
        Err(e) => {
            error!(error = %e, "Failed to load raw payloads");
            return Err(e);
        }
    };

    // ---- Normalize, in source order ----
    let (articles, urls) = normalize_all(&config.jobs, &payloads, config.truncation);
    info!(count = articles.len(), "Total normalized articles");

    // ---- Output ----
    if let Err(e) = json::write_articles(&config.output, &articles).await {
        error!(path = %config.output.display(), error = %e, "Failed to write processed articles");
        return Err(e);
    }

    match &config.urls_output {
        Some(path) => {
            if let Err(e) = json::update_url_index(path, urls).await {
                error!(path = %path.display(), error = %e, "Failed to update URL index");
                return Err(e);
            }
        }
        None => debug!(count = urls.len(), "No URL index configured; skipping"),
    }

    if articles.is_empty() {
        warn!("No articles were produced; check the raw payloads and source names");
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}
