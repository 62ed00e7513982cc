//! Supplementary field reconciliation
//!
//! Applies assessment ids and elevation ranges from `all_other_fields.csv`
//! to taxa that were already inserted. Unparseable numbers and inverted
//! ranges are skipped quietly; a taxon id that matches no row is fatal.

use crate::db::{update_assessment, update_elevation};
use crate::input::SupplementaryRecord;
use iucn_common::db::{ELEVATION_CEILING, ELEVATION_FLOOR};
use iucn_common::Result;
use sqlx::SqliteConnection;
use tracing::debug;

/// What the reconciler did with one supplementary row
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileOutcome {
    pub assessment_updated: bool,
    pub elevation_updated: bool,
}

/// Parse an integer field; blank or malformed input yields `None`
pub fn parse_integer(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}

/// Clamp an elevation range to [-500, 9000]
///
/// Returns `None` for inverted or empty ranges (`lower >= upper`); such rows
/// leave the stored range untouched.
pub fn clamp_elevation(lower: i64, upper: i64) -> Option<(i64, i64)> {
    if lower >= upper {
        return None;
    }
    Some((lower.max(ELEVATION_FLOOR), upper.min(ELEVATION_CEILING)))
}

/// Apply one supplementary row to its taxon
pub async fn reconcile_taxon(
    conn: &mut SqliteConnection,
    record: &SupplementaryRecord,
) -> Result<ReconcileOutcome> {
    let mut outcome = ReconcileOutcome::default();

    match parse_integer(&record.assessment_id) {
        Some(assessment_id) => {
            update_assessment(conn, record.taxon_id, assessment_id).await?;
            outcome.assessment_updated = true;
        }
        None => debug!(
            taxon_id = record.taxon_id,
            raw = %record.assessment_id,
            "Skipping unparseable assessment id"
        ),
    }

    let lower = parse_integer(&record.elevation_lower);
    let upper = parse_integer(&record.elevation_upper);
    let (Some(lower), Some(upper)) = (lower, upper) else {
        debug!(
            taxon_id = record.taxon_id,
            lower = %record.elevation_lower,
            upper = %record.elevation_upper,
            "Skipping incomplete elevation range"
        );
        return Ok(outcome);
    };

    match clamp_elevation(lower, upper) {
        Some((lower, upper)) => {
            update_elevation(conn, record.taxon_id, lower, upper).await?;
            outcome.elevation_updated = true;
        }
        None => debug!(
            taxon_id = record.taxon_id,
            lower,
            upper,
            "Skipping inverted elevation range"
        ),
    }

    Ok(outcome)
}
