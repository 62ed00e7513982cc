//! End-to-end import tests
//!
//! Each test writes export directories into a temp root, runs the pipeline
//! against an on-disk database and inspects the committed rows.

mod helpers;

use helpers::{count_rows, open_store, DatasetBuilder};
use iucn_common::db::{CommonName, Habitat, Taxon, TaxonHabitatLink};
use iucn_common::Error;
use iucn_import::{ImportPipeline, ImportSummary};
use sqlx::SqlitePool;
use tempfile::TempDir;

async fn load_taxon(pool: &SqlitePool, id: i64) -> Taxon {
    sqlx::query_as("SELECT * FROM taxonomy WHERE id = ?")
        .bind(id)
        .fetch_one(pool)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_single_dataset_end_to_end() {
    let input = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    DatasetBuilder::new()
        .taxon(1)
        .habitat(1, "FOR", "Forest", "Yes", "breeding", "garbage")
        .common_name(1, "Forest cat", "English", true)
        .write(input.path(), "mammals");

    let pool = open_store(&out.path().join("redlist.db")).await;
    let summary = ImportPipeline::new(pool.clone())
        .run(input.path())
        .await
        .unwrap();

    assert_eq!(
        summary,
        ImportSummary {
            directories_processed: 1,
            directories_skipped: 0,
            taxa_inserted: 1,
            habitats_created: 1,
            links_inserted: 1,
            assessments_updated: 0,
            elevations_updated: 0,
            common_names_inserted: 1,
            values_coerced: 1,
        }
    );

    let taxon = load_taxon(&pool, 1).await;
    assert_eq!(taxon.scientific_name, "Genus1 species1");
    assert_eq!(taxon.authority.as_deref(), Some("(Author, 1900)"));
    assert_eq!(taxon.subpopulation_name, None);
    assert_eq!(taxon.assessment_id, 0);
    assert_eq!((taxon.elevation_lower, taxon.elevation_upper), (-500, 9000));

    let habitats: Vec<Habitat> = sqlx::query_as("SELECT * FROM habitat")
        .fetch_all(&pool)
        .await
        .unwrap();
    assert_eq!(habitats.len(), 1);
    assert_eq!(habitats[0].code, "FOR");

    let links: Vec<TaxonHabitatLink> = sqlx::query_as("SELECT * FROM taxonomy_habitat_m2m")
        .fetch_all(&pool)
        .await
        .unwrap();
    assert_eq!(
        links,
        vec![TaxonHabitatLink {
            taxonomy: 1,
            habitat: habitats[0].id,
            major_importance: true,
            season: "Breeding Season".to_string(),
            suitability: "Unknown".to_string(),
        }]
    );

    let names: Vec<CommonName> = sqlx::query_as("SELECT * FROM common_names")
        .fetch_all(&pool)
        .await
        .unwrap();
    assert_eq!(names.len(), 1);
    assert_eq!(names[0].taxonomy, 1);
    assert_eq!(names[0].name, "Forest cat");
    assert_eq!(names[0].language, "English");
    assert!(names[0].main);
}

#[tokio::test]
async fn test_second_run_aborts_on_duplicate_taxon() {
    let input = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    DatasetBuilder::new()
        .taxon(1)
        .habitat(1, "FOR", "Forest", "Yes", "resident", "Suitable")
        .common_name(1, "Forest cat", "English", true)
        .write(input.path(), "mammals");
    let db_path = out.path().join("redlist.db");

    let pool = open_store(&db_path).await;
    ImportPipeline::new(pool.clone()).run(input.path()).await.unwrap();
    pool.close().await;

    let pool = open_store(&db_path).await;
    let err = ImportPipeline::new(pool.clone())
        .run(input.path())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Integrity(_)), "got {:?}", err);
    assert_eq!(count_rows(&pool, "taxonomy").await, 1);
    assert_eq!(count_rows(&pool, "habitat").await, 1);
    assert_eq!(count_rows(&pool, "taxonomy_habitat_m2m").await, 1);
    assert_eq!(count_rows(&pool, "common_names").await, 1);
}

#[tokio::test]
async fn test_duplicate_taxon_across_directories_commits_nothing() {
    let input = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    DatasetBuilder::new()
        .taxon(5)
        .habitat(5, "1.1", "Forest - Boreal", "Yes", "resident", "Suitable")
        .write(input.path(), "a_first");
    DatasetBuilder::new().taxon(5).write(input.path(), "b_second");

    let pool = open_store(&out.path().join("redlist.db")).await;
    let err = ImportPipeline::new(pool.clone())
        .run(input.path())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Integrity(_)), "got {:?}", err);
    // First directory's writes were staged but never committed
    assert_eq!(count_rows(&pool, "taxonomy").await, 0);
    assert_eq!(count_rows(&pool, "habitat").await, 0);
    assert_eq!(count_rows(&pool, "taxonomy_habitat_m2m").await, 0);
}

#[tokio::test]
async fn test_habitats_deduplicated_across_directories() {
    let input = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    DatasetBuilder::new()
        .taxon(1)
        .habitat(1, "5.1", "Wetlands - Permanent Rivers", "Yes", "Resident", "Suitable")
        .habitat(1, "1.4", "Forest - Temperate", "No", "passage", "Marginal")
        .write(input.path(), "birds");
    DatasetBuilder::new()
        .taxon(2)
        .habitat(2, "5.1", "Rivers (renamed)", "No", "non-breeding", "Suitable")
        .write(input.path(), "fishes");

    let pool = open_store(&out.path().join("redlist.db")).await;
    let summary = ImportPipeline::new(pool.clone())
        .run(input.path())
        .await
        .unwrap();

    assert_eq!(summary.habitats_created, 2);
    assert_eq!(summary.links_inserted, 3);
    assert_eq!(count_rows(&pool, "habitat").await, 2);

    // "birds" sorts first, so its name for 5.1 is kept
    let name: String = sqlx::query_scalar("SELECT name FROM habitat WHERE code = '5.1'")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(name, "Wetlands - Permanent Rivers");

    let shared: Vec<i64> = sqlx::query_scalar(
        r#"
        SELECT m.taxonomy FROM taxonomy_habitat_m2m m
        JOIN habitat h ON h.id = m.habitat
        WHERE h.code = '5.1'
        ORDER BY m.taxonomy
        "#,
    )
    .fetch_all(&pool)
    .await
    .unwrap();
    assert_eq!(shared, vec![1, 2]);
}

#[tokio::test]
async fn test_duplicate_habitat_rows_produce_duplicate_links() {
    let input = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    DatasetBuilder::new()
        .taxon(1)
        .habitat(1, "FOR", "Forest", "Yes", "resident", "Suitable")
        .habitat(1, "FOR", "Forest", "Yes", "resident", "Suitable")
        .write(input.path(), "mammals");

    let pool = open_store(&out.path().join("redlist.db")).await;
    ImportPipeline::new(pool.clone()).run(input.path()).await.unwrap();

    assert_eq!(count_rows(&pool, "habitat").await, 1);
    assert_eq!(count_rows(&pool, "taxonomy_habitat_m2m").await, 2);
}

#[tokio::test]
async fn test_elevation_reconciliation() {
    let input = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    DatasetBuilder::new()
        .taxon(1)
        .taxon(2)
        .taxon(3)
        .taxon(4)
        .supplementary(1, "1001", "-1000", "100")
        .supplementary(2, "1002", "50", "20")
        .supplementary(3, "1003", "0", "20000")
        .supplementary(4, "not-a-number", "", "300")
        .write(input.path(), "reptiles");

    let pool = open_store(&out.path().join("redlist.db")).await;
    let summary = ImportPipeline::new(pool.clone())
        .run(input.path())
        .await
        .unwrap();

    assert_eq!(summary.assessments_updated, 3);
    assert_eq!(summary.elevations_updated, 2);

    let clamped_floor = load_taxon(&pool, 1).await;
    assert_eq!(clamped_floor.assessment_id, 1001);
    assert_eq!((clamped_floor.elevation_lower, clamped_floor.elevation_upper), (-500, 100));

    let inverted = load_taxon(&pool, 2).await;
    assert_eq!(inverted.assessment_id, 1002);
    assert_eq!((inverted.elevation_lower, inverted.elevation_upper), (-500, 9000));

    let clamped_ceiling = load_taxon(&pool, 3).await;
    assert_eq!((clamped_ceiling.elevation_lower, clamped_ceiling.elevation_upper), (0, 9000));

    let malformed = load_taxon(&pool, 4).await;
    assert_eq!(malformed.assessment_id, 0);
    assert_eq!((malformed.elevation_lower, malformed.elevation_upper), (-500, 9000));
}

#[tokio::test]
async fn test_supplementary_for_unknown_taxon_aborts() {
    let input = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    DatasetBuilder::new()
        .taxon(1)
        .supplementary(77, "1", "0", "10")
        .write(input.path(), "mammals");

    let pool = open_store(&out.path().join("redlist.db")).await;
    let err = ImportPipeline::new(pool.clone())
        .run(input.path())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::NotFound(_)), "got {:?}", err);
    assert_eq!(count_rows(&pool, "taxonomy").await, 0);
}

#[tokio::test]
async fn test_missing_supplementary_file_aborts() {
    let input = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    DatasetBuilder::new()
        .taxon(1)
        .without_supplementary()
        .write(input.path(), "mammals");

    let pool = open_store(&out.path().join("redlist.db")).await;
    let err = ImportPipeline::new(pool.clone())
        .run(input.path())
        .await
        .unwrap_err();

    match err {
        Error::MissingInput(path) => assert!(path.ends_with("mammals/all_other_fields.csv")),
        other => panic!("expected missing input, got {:?}", other),
    }
    assert_eq!(count_rows(&pool, "taxonomy").await, 0);
}

#[tokio::test]
async fn test_directories_without_taxonomy_are_skipped() {
    let input = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    std::fs::create_dir(input.path().join("scratch")).unwrap();
    std::fs::write(input.path().join("scratch").join("habitats.csv"), "junk").unwrap();
    std::fs::write(input.path().join("README.txt"), "not a directory").unwrap();
    DatasetBuilder::new().taxon(1).write(input.path(), "mammals");

    let pool = open_store(&out.path().join("redlist.db")).await;
    let summary = ImportPipeline::new(pool.clone())
        .run(input.path())
        .await
        .unwrap();

    assert_eq!(summary.directories_processed, 1);
    assert_eq!(summary.directories_skipped, 1);
    assert_eq!(count_rows(&pool, "taxonomy").await, 1);
}

#[tokio::test]
async fn test_empty_input_root_commits_empty_store() {
    let input = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();

    let pool = open_store(&out.path().join("redlist.db")).await;
    let summary = ImportPipeline::new(pool.clone())
        .run(input.path())
        .await
        .unwrap();

    assert_eq!(summary, ImportSummary::default());
    assert_eq!(count_rows(&pool, "taxonomy").await, 0);
}
