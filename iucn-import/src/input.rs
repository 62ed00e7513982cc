//! CSV input readers
//!
//! One reader per export file. Habitat and common-name files are addressed
//! by header name, falling back to the column position used by the Red List
//! export layout when a header is missing or renamed. Taxonomy is strictly
//! positional; the supplementary file is strictly by name.

use csv::StringRecord;
use iucn_common::{Error, Result};
use std::path::{Path, PathBuf};

pub const TAXONOMY_FILE: &str = "taxonomy.csv";
pub const HABITATS_FILE: &str = "habitats.csv";
pub const SUPPLEMENTARY_FILE: &str = "all_other_fields.csv";
pub const COMMON_NAMES_FILE: &str = "common_names.csv";

/// A logical column: its header name and its position in the standard export
#[derive(Debug, Clone, Copy)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub position: usize,
}

impl ColumnSpec {
    const fn new(name: &'static str, position: usize) -> Self {
        Self { name, position }
    }
}

const HABITAT_TAXON_ID: ColumnSpec = ColumnSpec::new("internalTaxonId", 1);
const HABITAT_CODE: ColumnSpec = ColumnSpec::new("code", 3);
const HABITAT_NAME: ColumnSpec = ColumnSpec::new("name", 4);
const HABITAT_IMPORTANCE: ColumnSpec = ColumnSpec::new("majorImportance", 5);
const HABITAT_SEASON: ColumnSpec = ColumnSpec::new("season", 6);
const HABITAT_SUITABILITY: ColumnSpec = ColumnSpec::new("suitability", 7);

const COMMON_NAME_TAXON_ID: ColumnSpec = ColumnSpec::new("internalTaxonId", 0);
const COMMON_NAME_NAME: ColumnSpec = ColumnSpec::new("name", 2);
const COMMON_NAME_LANGUAGE: ColumnSpec = ColumnSpec::new("language", 3);
const COMMON_NAME_MAIN: ColumnSpec = ColumnSpec::new("main", 4);

const SUPPLEMENTARY_TAXON_ID: &str = "internalTaxonId";
const SUPPLEMENTARY_ASSESSMENT_ID: &str = "assessmentId";
const SUPPLEMENTARY_ELEVATION_LOWER: &str = "ElevationLower.limit";
const SUPPLEMENTARY_ELEVATION_UPPER: &str = "ElevationUpper.limit";

const TAXONOMY_COLUMNS: usize = 15;

/// Resolved column indexes for one file
#[derive(Debug)]
pub struct ColumnMap {
    indexes: Vec<(ColumnSpec, usize)>,
}

impl ColumnMap {
    /// Resolve each spec by header name, else by its documented position
    pub fn resolve(headers: &StringRecord, specs: &[ColumnSpec]) -> Self {
        let indexes = specs
            .iter()
            .map(|spec| {
                let index = find_header(headers, spec.name).unwrap_or(spec.position);
                (*spec, index)
            })
            .collect();
        Self { indexes }
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.indexes
            .iter()
            .find(|(spec, _)| spec.name == name)
            .map(|(_, index)| *index)
    }

    /// Field for a required column; a short row is an error
    fn required<'r>(&self, row: &Row<'r>, name: &str) -> Result<&'r str> {
        self.index_of(name)
            .and_then(|index| row.record.get(index))
            .ok_or_else(|| row.invalid(format!("missing column '{}'", name)))
    }

    /// Field for a free-text column; absent cells read as empty
    fn optional<'r>(&self, row: &Row<'r>, name: &str) -> &'r str {
        self.index_of(name)
            .and_then(|index| row.record.get(index))
            .unwrap_or("")
    }
}

fn find_header(headers: &StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|header| header.trim_start_matches('\u{feff}').trim() == name)
}

/// A record with enough context to report where it came from
struct Row<'r> {
    path: &'r Path,
    line: u64,
    record: &'r StringRecord,
}

impl<'r> Row<'r> {
    fn invalid(&self, message: String) -> Error {
        Error::InvalidInput(format!("{}:{}: {}", self.path.display(), self.line, message))
    }

    fn taxon_id(&self, raw: &str) -> Result<i64> {
        raw.trim()
            .parse()
            .map_err(|_| self.invalid(format!("taxon id '{}' is not an integer", raw)))
    }
}

/// One row of `taxonomy.csv`, in file order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxonomyRecord {
    pub id: i64,
    pub scientific_name: String,
    pub kingdom_name: String,
    pub phylum_name: String,
    pub order_name: String,
    pub class_name: String,
    pub family_name: String,
    pub genus_name: String,
    pub species_name: String,
    pub infra_type: Option<String>,
    pub infra_name: Option<String>,
    pub infra_authority: Option<String>,
    pub subpopulation_name: Option<String>,
    pub authority: Option<String>,
    pub taxonomic_notes: Option<String>,
}

/// One row of `habitats.csv`; categorical fields are still raw
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HabitatRecord {
    pub taxon_id: i64,
    pub code: String,
    pub name: String,
    pub major_importance: String,
    pub season: String,
    pub suitability: String,
}

/// One row of `all_other_fields.csv`; numeric fields are still raw
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupplementaryRecord {
    pub taxon_id: i64,
    pub assessment_id: String,
    pub elevation_lower: String,
    pub elevation_upper: String,
}

/// One row of `common_names.csv`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommonNameRecord {
    pub taxon_id: i64,
    pub name: String,
    pub language: String,
    pub main: bool,
}

/// Paths of the export files inside one dataset directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetFiles {
    pub dir: PathBuf,
}

impl DatasetFiles {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// A directory is a dataset iff it holds a taxonomy export
    pub fn is_dataset(dir: &Path) -> bool {
        dir.join(TAXONOMY_FILE).is_file()
    }

    pub fn taxonomy(&self) -> PathBuf {
        self.dir.join(TAXONOMY_FILE)
    }

    pub fn habitats(&self) -> PathBuf {
        self.dir.join(HABITATS_FILE)
    }

    pub fn supplementary(&self) -> PathBuf {
        self.dir.join(SUPPLEMENTARY_FILE)
    }

    pub fn common_names(&self) -> PathBuf {
        self.dir.join(COMMON_NAMES_FILE)
    }
}

fn open_reader(path: &Path) -> Result<csv::Reader<std::fs::File>> {
    if !path.is_file() {
        return Err(Error::MissingInput(path.to_path_buf()));
    }

    Ok(csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?)
}

/// Read every record, handing each to `parse` with its line number
fn read_records<T>(
    path: &Path,
    mut parse: impl FnMut(&StringRecord, &Row<'_>) -> Result<T>,
) -> Result<Vec<T>> {
    let mut reader = open_reader(path)?;
    let headers = reader.headers()?.clone();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let row = Row { path, line, record: &record };
        rows.push(parse(&headers, &row)?);
    }
    Ok(rows)
}

fn non_empty(field: &str) -> Option<String> {
    if field.is_empty() {
        None
    } else {
        Some(field.to_string())
    }
}

/// `true`, `yes` or `1` in any case mark the main name
pub fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "true" | "yes" | "1"
    )
}

/// Read `taxonomy.csv` (15 columns, fixed order)
pub fn read_taxonomy(path: &Path) -> Result<Vec<TaxonomyRecord>> {
    read_records(path, |_, row| {
        let record = row.record;
        if record.len() < TAXONOMY_COLUMNS {
            return Err(row.invalid(format!(
                "expected {} columns, found {}",
                TAXONOMY_COLUMNS,
                record.len()
            )));
        }
        let field = |index: usize| record.get(index).unwrap_or_default();

        Ok(TaxonomyRecord {
            id: row.taxon_id(field(0))?,
            scientific_name: field(1).to_string(),
            kingdom_name: field(2).to_string(),
            phylum_name: field(3).to_string(),
            order_name: field(4).to_string(),
            class_name: field(5).to_string(),
            family_name: field(6).to_string(),
            genus_name: field(7).to_string(),
            species_name: field(8).to_string(),
            infra_type: non_empty(field(9)),
            infra_name: non_empty(field(10)),
            infra_authority: non_empty(field(11)),
            subpopulation_name: non_empty(field(12)),
            authority: non_empty(field(13)),
            taxonomic_notes: non_empty(field(14)),
        })
    })
}

/// Read `habitats.csv`
pub fn read_habitats(path: &Path) -> Result<Vec<HabitatRecord>> {
    let mut columns: Option<ColumnMap> = None;

    read_records(path, |headers, row| {
        let map = columns.get_or_insert_with(|| {
            ColumnMap::resolve(
                headers,
                &[
                    HABITAT_TAXON_ID,
                    HABITAT_CODE,
                    HABITAT_NAME,
                    HABITAT_IMPORTANCE,
                    HABITAT_SEASON,
                    HABITAT_SUITABILITY,
                ],
            )
        });

        Ok(HabitatRecord {
            taxon_id: row.taxon_id(map.required(row, HABITAT_TAXON_ID.name)?)?,
            code: map.required(row, HABITAT_CODE.name)?.to_string(),
            name: map.required(row, HABITAT_NAME.name)?.to_string(),
            major_importance: map.optional(row, HABITAT_IMPORTANCE.name).to_string(),
            season: map.optional(row, HABITAT_SEASON.name).to_string(),
            suitability: map.optional(row, HABITAT_SUITABILITY.name).to_string(),
        })
    })
}

/// Read `all_other_fields.csv`; every column is looked up by name
pub fn read_supplementary(path: &Path) -> Result<Vec<SupplementaryRecord>> {
    let mut indexes: Option<[usize; 4]> = None;

    read_records(path, |headers, row| {
        let [taxon, assessment, lower, upper] = match indexes {
            Some(found) => found,
            None => {
                let lookup = |name: &str| {
                    find_header(headers, name).ok_or_else(|| {
                        Error::InvalidInput(format!(
                            "{}: missing column '{}'",
                            path.display(),
                            name
                        ))
                    })
                };
                let found = [
                    lookup(SUPPLEMENTARY_TAXON_ID)?,
                    lookup(SUPPLEMENTARY_ASSESSMENT_ID)?,
                    lookup(SUPPLEMENTARY_ELEVATION_LOWER)?,
                    lookup(SUPPLEMENTARY_ELEVATION_UPPER)?,
                ];
                indexes = Some(found);
                found
            }
        };
        let field = |index: usize| row.record.get(index).unwrap_or_default();

        Ok(SupplementaryRecord {
            taxon_id: row.taxon_id(field(taxon))?,
            assessment_id: field(assessment).to_string(),
            elevation_lower: field(lower).to_string(),
            elevation_upper: field(upper).to_string(),
        })
    })
}

/// Read `common_names.csv`
pub fn read_common_names(path: &Path) -> Result<Vec<CommonNameRecord>> {
    let mut columns: Option<ColumnMap> = None;

    read_records(path, |headers, row| {
        let map = columns.get_or_insert_with(|| {
            ColumnMap::resolve(
                headers,
                &[
                    COMMON_NAME_TAXON_ID,
                    COMMON_NAME_NAME,
                    COMMON_NAME_LANGUAGE,
                    COMMON_NAME_MAIN,
                ],
            )
        });

        Ok(CommonNameRecord {
            taxon_id: row.taxon_id(map.required(row, COMMON_NAME_TAXON_ID.name)?)?,
            name: map.required(row, COMMON_NAME_NAME.name)?.to_string(),
            language: map.required(row, COMMON_NAME_LANGUAGE.name)?.to_string(),
            main: parse_flag(map.optional(row, COMMON_NAME_MAIN.name)),
        })
    })
}
