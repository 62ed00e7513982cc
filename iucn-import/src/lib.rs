//! iucn-import - IUCN Red List CSV importer
//!
//! Consolidates per-dataset Red List exports (taxonomy, habitats,
//! supplementary fields, common names) into one SQLite database with
//! deduplicated habitats and normalized categorical values.

pub mod db;
pub mod input;
pub mod normalize;
pub mod pipeline;
pub mod reconcile;
pub mod relationships;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_support;

pub use pipeline::{ImportPipeline, ImportSummary};
