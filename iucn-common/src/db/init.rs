//! Database initialization
//!
//! Opens (or creates) the destination SQLite store and declares the four
//! relations with their indexes. Every statement uses `IF NOT EXISTS`, so
//! running against a populated store leaves the schema untouched.

use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use tracing::info;

/// Open the destination database, creating the file and schema if needed
///
/// The pool is capped at one connection: the importer is a single writer and
/// stages everything in one transaction.
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    initialize_schema(&pool).await?;

    Ok(pool)
}

/// Open a private in-memory database with the full schema
///
/// The single connection is never recycled, otherwise the data would vanish
/// with it.
pub async fn init_memory_database() -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;

    initialize_schema(&pool).await?;

    Ok(pool)
}

/// Create all tables and indexes (idempotent)
pub async fn initialize_schema(pool: &SqlitePool) -> Result<()> {
    create_taxonomy_table(pool).await?;
    create_habitat_table(pool).await?;
    create_taxonomy_habitat_table(pool).await?;
    create_common_names_table(pool).await?;

    info!("Database schema initialized");
    Ok(())
}

async fn create_taxonomy_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS taxonomy (
            id INTEGER UNIQUE PRIMARY KEY,
            scientificName VARCHAR(255) NOT NULL,
            kingdomName VARCHAR(32) NOT NULL,
            phylumName VARCHAR(32) NOT NULL,
            orderName VARCHAR(32) NOT NULL,
            className VARCHAR(32) NOT NULL,
            familyName VARCHAR(255) NOT NULL,
            genusName VARCHAR(255) NOT NULL,
            speciesName VARCHAR(255) NOT NULL,
            infraType VARCHAR(255),
            infraName VARCHAR(255),
            infraAuthority VARCHAR(255),
            subpopulationName VARCHAR(255),
            authority VARCHAR(255),
            taxonomicNotes TEXT,
            assessmentId INTEGER NOT NULL DEFAULT 0,
            elevationLower INTEGER NOT NULL DEFAULT -500,
            elevationUpper INTEGER NOT NULL DEFAULT 9000
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE UNIQUE INDEX IF NOT EXISTS taxonomy_id_index ON taxonomy(id)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_habitat_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS habitat (
            id INTEGER UNIQUE PRIMARY KEY ASC,
            code VARCHAR(16) UNIQUE NOT NULL,
            name VARCHAR(255) NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE UNIQUE INDEX IF NOT EXISTS habitat_id_index ON habitat(id)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE UNIQUE INDEX IF NOT EXISTS habitat_code_index ON habitat(code)")
        .execute(pool)
        .await?;

    Ok(())
}

/// Link table carries per-association attributes and has no primary key
async fn create_taxonomy_habitat_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS taxonomy_habitat_m2m (
            taxonomy INTEGER NOT NULL,
            habitat INTEGER NOT NULL,
            majorImportance INTEGER NOT NULL DEFAULT 0,
            season VARCHAR(32) NOT NULL,
            suitability VARCHAR(32) NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS taxonomy_habitat_m2m_taxonomy_index ON taxonomy_habitat_m2m(taxonomy)",
    )
    .execute(pool)
    .await?;
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS taxonomy_habitat_m2m_habitat_index ON taxonomy_habitat_m2m(habitat)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_common_names_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS common_names (
            id INTEGER UNIQUE PRIMARY KEY ASC,
            taxonomy INTEGER NOT NULL,
            name VARCHAR(255) NOT NULL,
            language VARCHAR(32) NOT NULL,
            main INTEGER DEFAULT 0
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE UNIQUE INDEX IF NOT EXISTS common_names_id_index ON common_names(id)")
        .execute(pool)
        .await?;
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS common_names_taxonomy_index ON common_names(taxonomy)",
    )
    .execute(pool)
    .await?;

    Ok(())
}
