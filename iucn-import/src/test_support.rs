//! Fixtures shared by unit tests

use crate::input::TaxonomyRecord;

/// Minimal taxonomy row with every optional field empty
pub fn taxonomy_record(id: i64) -> TaxonomyRecord {
    TaxonomyRecord {
        id,
        scientific_name: format!("Genus{} species{}", id, id),
        kingdom_name: "ANIMALIA".to_string(),
        phylum_name: "CHORDATA".to_string(),
        order_name: "PASSERIFORMES".to_string(),
        class_name: "AVES".to_string(),
        family_name: "FRINGILLIDAE".to_string(),
        genus_name: format!("Genus{}", id),
        species_name: format!("species{}", id),
        infra_type: None,
        infra_name: None,
        infra_authority: None,
        subpopulation_name: None,
        authority: None,
        taxonomic_notes: None,
    }
}
