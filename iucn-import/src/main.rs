//! iucn2sqlite - consolidate IUCN Red List CSV exports into SQLite
//!
//! Scans the input root for dataset directories (those holding a
//! `taxonomy.csv`) and loads them all into the destination database in a
//! single transaction. A successful run prints nothing; any data error
//! aborts the run with a diagnostic and leaves nothing committed.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use iucn_common::config::{resolve_input_dir, ImportConfig, CONFIG_FILE_ENV, INPUT_DIR_ENV};
use iucn_common::db::init_database;
use iucn_import::ImportPipeline;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log filter when neither RUST_LOG nor the config file sets one
const DEFAULT_LOG_FILTER: &str = "warn";

/// Command-line arguments for iucn2sqlite
#[derive(Parser, Debug)]
#[command(name = "iucn2sqlite")]
#[command(about = "Import IUCN Red List CSV exports into a SQLite database")]
#[command(version)]
struct Args {
    /// Destination SQLite database (created if missing)
    db_path: PathBuf,

    /// Directory whose subdirectories hold the exports [default: current directory]
    #[arg(short, long, env = INPUT_DIR_ENV)]
    input_dir: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long, env = CONFIG_FILE_ENV)]
    config: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => ImportConfig::load(path)?,
        None => ImportConfig::default(),
    };

    // Initialize tracing
    let fallback = config.log_filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER);
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let input_dir = resolve_input_dir(args.input_dir.as_deref(), &config)?;
    info!("Input root: {}", input_dir.display());
    info!("Database: {}", args.db_path.display());

    let pool = init_database(&args.db_path)
        .await
        .with_context(|| format!("Failed to open database {}", args.db_path.display()))?;

    let summary = ImportPipeline::new(pool.clone())
        .run(&input_dir)
        .await
        .context("Import aborted, no changes were committed")?;

    pool.close().await;

    info!(
        directories = summary.directories_processed,
        skipped = summary.directories_skipped,
        taxa = summary.taxa_inserted,
        habitats = summary.habitats_created,
        links = summary.links_inserted,
        assessments = summary.assessments_updated,
        elevations = summary.elevations_updated,
        common_names = summary.common_names_inserted,
        coerced = summary.values_coerced,
        "Import complete"
    );

    Ok(())
}
