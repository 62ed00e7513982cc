//! Import pipeline driver
//!
//! Discovers dataset directories under the input root and loads each one in
//! a fixed sequence:
//!
//! 1. taxonomy rows, inserted verbatim with default supplementary fields
//! 2. habitat rows, deduplicated and linked to their taxon
//! 3. supplementary rows, updating taxa in place
//! 4. common names
//!
//! All directories share one unit of work that is committed only after the
//! last directory succeeds. Any error aborts the run with nothing committed.

use crate::db::{insert_common_name, insert_taxon};
use crate::input::{
    read_common_names, read_habitats, read_supplementary, read_taxonomy, DatasetFiles,
};
use crate::reconcile::reconcile_taxon;
use crate::relationships::link_habitat;
use crate::utils::UnitOfWork;
use iucn_common::Result;
use sqlx::{SqliteConnection, SqlitePool};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Counters for one import run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub directories_processed: usize,
    /// Subdirectories without a taxonomy export
    pub directories_skipped: usize,
    pub taxa_inserted: usize,
    pub habitats_created: usize,
    pub links_inserted: usize,
    pub assessments_updated: usize,
    pub elevations_updated: usize,
    pub common_names_inserted: usize,
    /// Categorical values replaced by their default
    pub values_coerced: usize,
}

/// Dataset directories found under an input root
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Discovery {
    /// Sorted by directory name so runs are reproducible
    pub datasets: Vec<DatasetFiles>,
    pub skipped: Vec<PathBuf>,
}

/// List the immediate subdirectories of `root` that hold a taxonomy export
pub fn discover_datasets(root: &Path) -> Result<Discovery> {
    let mut dirs = Vec::new();
    for entry in std::fs::read_dir(root)? {
        let path = entry?.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    dirs.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    let mut discovery = Discovery::default();
    for dir in dirs {
        if DatasetFiles::is_dataset(&dir) {
            discovery.datasets.push(DatasetFiles::new(dir));
        } else {
            debug!(dir = %dir.display(), "Skipping directory without taxonomy export");
            discovery.skipped.push(dir);
        }
    }
    Ok(discovery)
}

/// Drives a full import into one database
pub struct ImportPipeline {
    pool: SqlitePool,
}

impl ImportPipeline {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Import every dataset under `input_root` and commit once
    pub async fn run(&self, input_root: &Path) -> Result<ImportSummary> {
        let discovery = discover_datasets(input_root)?;
        info!(
            root = %input_root.display(),
            datasets = discovery.datasets.len(),
            skipped = discovery.skipped.len(),
            "Discovered dataset directories"
        );

        let mut summary = ImportSummary {
            directories_skipped: discovery.skipped.len(),
            ..ImportSummary::default()
        };

        let mut uow = UnitOfWork::begin(&self.pool).await?;
        for dataset in &discovery.datasets {
            info!(dir = %dataset.dir.display(), "Importing dataset");
            import_dataset(uow.connection(), dataset, &mut summary).await?;
            summary.directories_processed += 1;
        }
        uow.commit().await?;

        Ok(summary)
    }
}

/// Load one dataset directory onto the run's connection
pub async fn import_dataset(
    conn: &mut SqliteConnection,
    dataset: &DatasetFiles,
    summary: &mut ImportSummary,
) -> Result<()> {
    let taxa = read_taxonomy(&dataset.taxonomy())?;
    for record in &taxa {
        insert_taxon(conn, record).await?;
    }
    summary.taxa_inserted += taxa.len();
    info!(count = taxa.len(), "Loaded taxonomy");

    let habitats = read_habitats(&dataset.habitats())?;
    for record in &habitats {
        let outcome = link_habitat(conn, record).await?;
        if outcome.habitat_created {
            summary.habitats_created += 1;
        }
        summary.values_coerced += outcome.coerced_values;
    }
    summary.links_inserted += habitats.len();
    info!(count = habitats.len(), "Loaded habitat links");

    let supplementary = read_supplementary(&dataset.supplementary())?;
    for record in &supplementary {
        let outcome = reconcile_taxon(conn, record).await?;
        if outcome.assessment_updated {
            summary.assessments_updated += 1;
        }
        if outcome.elevation_updated {
            summary.elevations_updated += 1;
        }
    }
    info!(count = supplementary.len(), "Applied supplementary fields");

    let common_names = read_common_names(&dataset.common_names())?;
    for record in &common_names {
        insert_common_name(conn, record).await?;
    }
    summary.common_names_inserted += common_names.len();
    info!(count = common_names.len(), "Loaded common names");

    Ok(())
}
