//! Habitat reference data and taxon links
//!
//! Habitat rows are deduplicated on `code`: the first occurrence creates the
//! row and fixes its name, later occurrences resolve to the same id.

use crate::normalize::{Season, Suitability};
use iucn_common::db::Habitat;
use iucn_common::{expect_single_row, Error, Result};
use sqlx::SqliteConnection;

/// Outcome of resolving a habitat code to its surrogate id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedHabitat {
    pub id: i64,
    /// This call inserted the row
    pub created: bool,
}

/// Insert the habitat if its code is unseen, then return its id
///
/// When the insert is a no-op the id is looked up by code, and the lookup
/// must find exactly one row.
pub async fn resolve_habitat(
    conn: &mut SqliteConnection,
    code: &str,
    name: &str,
) -> Result<ResolvedHabitat> {
    let result = sqlx::query("INSERT INTO habitat (code, name) VALUES (?, ?) ON CONFLICT(code) DO NOTHING")
        .bind(code)
        .bind(name)
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() == 1 {
        return Ok(ResolvedHabitat {
            id: result.last_insert_rowid(),
            created: true,
        });
    }

    let ids: Vec<i64> = sqlx::query_scalar("SELECT id FROM habitat WHERE code = ?")
        .bind(code)
        .fetch_all(&mut *conn)
        .await?;

    match ids.as_slice() {
        [id] => Ok(ResolvedHabitat {
            id: *id,
            created: false,
        }),
        [] => Err(Error::NotFound(format!("habitat code '{}' after insert", code))),
        many => Err(Error::Integrity(format!(
            "habitat code '{}' matches {} rows",
            code,
            many.len()
        ))),
    }
}

/// Insert one taxon/habitat link with its normalized attributes
///
/// Repeated (taxon, habitat) pairs produce repeated links.
pub async fn insert_link(
    conn: &mut SqliteConnection,
    taxon_id: i64,
    habitat_id: i64,
    major_importance: bool,
    season: Season,
    suitability: Suitability,
) -> Result<()> {
    let result = sqlx::query(
        r#"
        INSERT INTO taxonomy_habitat_m2m (taxonomy, habitat, majorImportance, season, suitability)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(taxon_id)
    .bind(habitat_id)
    .bind(major_importance)
    .bind(season.as_str())
    .bind(suitability.as_str())
    .execute(&mut *conn)
    .await?;

    expect_single_row(
        result.rows_affected(),
        format_args!("link taxon {} to habitat {}", taxon_id, habitat_id),
    )
}

/// Load habitat by code
pub async fn load_habitat_by_code(conn: &mut SqliteConnection, code: &str) -> Result<Option<Habitat>> {
    let habitat = sqlx::query_as::<_, Habitat>("SELECT id, code, name FROM habitat WHERE code = ?")
        .bind(code)
        .fetch_optional(&mut *conn)
        .await?;

    Ok(habitat)
}
