//! Taxon to habitat relationship builder

use crate::db::{insert_link, resolve_habitat};
use crate::input::HabitatRecord;
use crate::normalize::{normalize_importance, normalize_season, normalize_suitability};
use iucn_common::Result;
use sqlx::SqliteConnection;
use tracing::{debug, warn};

/// What linking one habitat row did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkOutcome {
    pub habitat_id: i64,
    pub habitat_created: bool,
    /// Number of categorical fields replaced by their default (0..=3)
    pub coerced_values: usize,
}

/// Resolve the habitat, normalize the row's attributes and insert one link
///
/// The taxon id is not checked against `taxonomy`; load order guarantees it.
pub async fn link_habitat(conn: &mut SqliteConnection, record: &HabitatRecord) -> Result<LinkOutcome> {
    let habitat = resolve_habitat(conn, &record.code, &record.name).await?;

    let importance = normalize_importance(&record.major_importance);
    let season = normalize_season(&record.season);
    let suitability = normalize_suitability(&record.suitability);

    if importance.coerced {
        debug!(
            taxon_id = record.taxon_id,
            raw = %record.major_importance,
            "Coerced major importance to No"
        );
    }
    if season.coerced {
        warn!(
            taxon_id = record.taxon_id,
            habitat = %record.code,
            raw = %record.season,
            "Unrecognised season, storing '{}'",
            season.value
        );
    }
    if suitability.coerced {
        debug!(
            taxon_id = record.taxon_id,
            raw = %record.suitability,
            "Coerced suitability to Unknown"
        );
    }

    insert_link(
        conn,
        record.taxon_id,
        habitat.id,
        importance.value,
        season.value,
        suitability.value,
    )
    .await?;

    let coerced_values = [importance.coerced, season.coerced, suitability.coerced]
        .into_iter()
        .filter(|coerced| *coerced)
        .count();

    Ok(LinkOutcome {
        habitat_id: habitat.id,
        habitat_created: habitat.created,
        coerced_values,
    })
}
