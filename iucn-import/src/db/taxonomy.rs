//! Taxon persistence
//!
//! Taxonomy rows are inserted once per id with default supplementary fields;
//! the reconciler later overwrites assessment and elevation in place.

use crate::input::TaxonomyRecord;
use iucn_common::db::{Taxon, DEFAULT_ASSESSMENT_ID, ELEVATION_CEILING, ELEVATION_FLOOR};
use iucn_common::{expect_single_row, Error, Result};
use sqlx::SqliteConnection;

/// Insert a taxonomy row verbatim
///
/// A repeated id is an `Integrity` error, whether it repeats within one
/// export or across datasets.
pub async fn insert_taxon(conn: &mut SqliteConnection, record: &TaxonomyRecord) -> Result<()> {
    let result = sqlx::query(
        r#"
        INSERT INTO taxonomy (
            id, scientificName, kingdomName, phylumName, orderName, className,
            familyName, genusName, speciesName, infraType, infraName, infraAuthority,
            subpopulationName, authority, taxonomicNotes,
            assessmentId, elevationLower, elevationUpper
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(record.id)
    .bind(&record.scientific_name)
    .bind(&record.kingdom_name)
    .bind(&record.phylum_name)
    .bind(&record.order_name)
    .bind(&record.class_name)
    .bind(&record.family_name)
    .bind(&record.genus_name)
    .bind(&record.species_name)
    .bind(&record.infra_type)
    .bind(&record.infra_name)
    .bind(&record.infra_authority)
    .bind(&record.subpopulation_name)
    .bind(&record.authority)
    .bind(&record.taxonomic_notes)
    .bind(DEFAULT_ASSESSMENT_ID)
    .bind(ELEVATION_FLOOR)
    .bind(ELEVATION_CEILING)
    .execute(&mut *conn)
    .await
    .map_err(|e| Error::from_insert(e, format_args!("taxon {}", record.id)))?;

    expect_single_row(result.rows_affected(), format_args!("insert taxon {}", record.id))
}

/// Overwrite a taxon's assessment id
pub async fn update_assessment(
    conn: &mut SqliteConnection,
    taxon_id: i64,
    assessment_id: i64,
) -> Result<()> {
    let result = sqlx::query("UPDATE taxonomy SET assessmentId = ? WHERE id = ?")
        .bind(assessment_id)
        .bind(taxon_id)
        .execute(&mut *conn)
        .await?;

    expect_single_row(result.rows_affected(), format_args!("assessment update for taxon {}", taxon_id))
}

/// Overwrite both elevation bounds of a taxon
pub async fn update_elevation(
    conn: &mut SqliteConnection,
    taxon_id: i64,
    lower: i64,
    upper: i64,
) -> Result<()> {
    let result = sqlx::query("UPDATE taxonomy SET elevationLower = ?, elevationUpper = ? WHERE id = ?")
        .bind(lower)
        .bind(upper)
        .bind(taxon_id)
        .execute(&mut *conn)
        .await?;

    expect_single_row(result.rows_affected(), format_args!("elevation update for taxon {}", taxon_id))
}

/// Load taxon by id
pub async fn load_taxon(conn: &mut SqliteConnection, taxon_id: i64) -> Result<Option<Taxon>> {
    let taxon = sqlx::query_as::<_, Taxon>("SELECT * FROM taxonomy WHERE id = ?")
        .bind(taxon_id)
        .fetch_optional(&mut *conn)
        .await?;

    Ok(taxon)
}
