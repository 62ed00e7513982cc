//! Common name persistence

use crate::input::CommonNameRecord;
use iucn_common::{expect_single_row, Result};
use sqlx::SqliteConnection;

/// Insert one vernacular name; no deduplication is performed
pub async fn insert_common_name(conn: &mut SqliteConnection, record: &CommonNameRecord) -> Result<()> {
    let result = sqlx::query("INSERT INTO common_names (taxonomy, name, language, main) VALUES (?, ?, ?, ?)")
        .bind(record.taxon_id)
        .bind(&record.name)
        .bind(&record.language)
        .bind(record.main)
        .execute(&mut *conn)
        .await?;

    expect_single_row(
        result.rows_affected(),
        format_args!("common name '{}' for taxon {}", record.name, record.taxon_id),
    )
}
