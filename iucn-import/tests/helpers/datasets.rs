//! Export directory fixtures
//!
//! Writes dataset directories in the Red List export layout.

use iucn_common::db::init_database;
use sqlx::SqlitePool;
use std::fs;
use std::path::{Path, PathBuf};

const TAXONOMY_HEADER: &str = "internalTaxonId,scientificName,kingdomName,phylumName,orderName,className,familyName,genusName,speciesName,infraType,infraName,infraAuthority,subpopulationName,authority,taxonomicNotes";
const HABITATS_HEADER: &str = "assessmentId,internalTaxonId,scientificName,code,name,majorImportance,season,suitability";
const SUPPLEMENTARY_HEADER: &str = "assessmentId,internalTaxonId,scientificName,ElevationLower.limit,ElevationUpper.limit";
const COMMON_NAMES_HEADER: &str = "internalTaxonId,scientificName,name,language,main";

/// Builds the four CSV files of one dataset directory
#[derive(Debug, Clone)]
pub struct DatasetBuilder {
    taxonomy: Vec<String>,
    habitats: Vec<String>,
    supplementary: Vec<String>,
    common_names: Vec<String>,
    write_supplementary: bool,
}

impl Default for DatasetBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DatasetBuilder {
    pub fn new() -> Self {
        Self {
            taxonomy: Vec::new(),
            habitats: Vec::new(),
            supplementary: Vec::new(),
            common_names: Vec::new(),
            write_supplementary: true,
        }
    }

    pub fn taxon(mut self, id: i64) -> Self {
        self.taxonomy.push(format!(
            "{id},Genus{id} species{id},ANIMALIA,CHORDATA,CARNIVORA,MAMMALIA,FELIDAE,Genus{id},species{id},,,,,\"(Author, 1900)\","
        ));
        self
    }

    pub fn habitat(
        mut self,
        taxon_id: i64,
        code: &str,
        name: &str,
        importance: &str,
        season: &str,
        suitability: &str,
    ) -> Self {
        self.habitats.push(format!(
            "1,{taxon_id},Genus{taxon_id} species{taxon_id},{code},{name},{importance},{season},{suitability}"
        ));
        self
    }

    pub fn supplementary(mut self, taxon_id: i64, assessment: &str, lower: &str, upper: &str) -> Self {
        self.supplementary.push(format!(
            "{assessment},{taxon_id},Genus{taxon_id} species{taxon_id},{lower},{upper}"
        ));
        self
    }

    pub fn common_name(mut self, taxon_id: i64, name: &str, language: &str, main: bool) -> Self {
        self.common_names.push(format!(
            "{taxon_id},Genus{taxon_id} species{taxon_id},{name},{language},{main}"
        ));
        self
    }

    /// Leave `all_other_fields.csv` out of the directory
    pub fn without_supplementary(mut self) -> Self {
        self.write_supplementary = false;
        self
    }

    /// Write the dataset as `root/name` and return its path
    pub fn write(&self, root: &Path, name: &str) -> PathBuf {
        let dir = root.join(name);
        fs::create_dir_all(&dir).unwrap();

        write_csv(&dir.join("taxonomy.csv"), TAXONOMY_HEADER, &self.taxonomy);
        write_csv(&dir.join("habitats.csv"), HABITATS_HEADER, &self.habitats);
        if self.write_supplementary {
            write_csv(
                &dir.join("all_other_fields.csv"),
                SUPPLEMENTARY_HEADER,
                &self.supplementary,
            );
        }
        write_csv(&dir.join("common_names.csv"), COMMON_NAMES_HEADER, &self.common_names);

        dir
    }
}

fn write_csv(path: &Path, header: &str, rows: &[String]) {
    let mut content = String::from(header);
    content.push('\n');
    for row in rows {
        content.push_str(row);
        content.push('\n');
    }
    fs::write(path, content).unwrap();
}

/// Open (or create) a database file with the full schema
pub async fn open_store(path: &Path) -> SqlitePool {
    init_database(path).await.expect("failed to open test database")
}

pub async fn count_rows(pool: &SqlitePool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(pool)
        .await
        .unwrap()
}
