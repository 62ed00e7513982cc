//! Database models

use serde::{Deserialize, Serialize};

/// Assessment id stored until the supplementary dataset provides one
pub const DEFAULT_ASSESSMENT_ID: i64 = 0;

/// Lowest elevation (metres) a taxon may record; also the column default
pub const ELEVATION_FLOOR: i64 = -500;

/// Highest elevation (metres) a taxon may record; also the column default
pub const ELEVATION_CEILING: i64 = 9000;

/// One row of `taxonomy`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
#[sqlx(rename_all = "camelCase")]
pub struct Taxon {
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
    pub assessment_id: i64,
    pub elevation_lower: i64,
    pub elevation_upper: i64,
}

/// One row of `habitat`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Habitat {
    pub id: i64,
    pub code: String,
    pub name: String,
}

/// One row of `taxonomy_habitat_m2m`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
#[sqlx(rename_all = "camelCase")]
pub struct TaxonHabitatLink {
    pub taxonomy: i64,
    pub habitat: i64,
    pub major_importance: bool,
    pub season: String,
    pub suitability: String,
}

/// One row of `common_names`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct CommonName {
    pub id: i64,
    pub taxonomy: i64,
    pub name: String,
    pub language: String,
    pub main: bool,
}
