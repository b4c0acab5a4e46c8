// ==========================================
// Body-shop equipment workbook ingestion - CLI entry
// ==========================================
// Usage: bodyshop-ingest <data-root>
// Runs the full pipeline against a data root and prints the result as
// JSON on stdout. Exit code 1 when any file-level error occurred.
// ==========================================

use anyhow::Context;
use bodyshop_ingest::engine::{ingest, validate_result, IngestOptions};
use bodyshop_ingest::logging;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    logging::init();

    info!("==================================================");
    info!("body-shop workbook ingestion");
    info!("version: {}", bodyshop_ingest::VERSION);
    info!("==================================================");

    let data_root: PathBuf = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .context("usage: bodyshop-ingest <data-root>")?;

    info!("data root: {}", data_root.display());

    let result = ingest(IngestOptions::new(data_root)).await;

    for warning in validate_result(&result) {
        warn!("{warning}");
    }
    for warning in &result.warnings {
        warn!("{warning}");
    }
    for error in &result.errors {
        warn!("file error: {error}");
    }

    let json = serde_json::to_string_pretty(&result)
        .context("failed to serialize ingestion result")?;
    println!("{json}");

    if result.errors.is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
