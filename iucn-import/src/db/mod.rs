//! Database access for the importer
//!
//! Every function takes the connection of the running unit of work, so all
//! writes land in the one transaction committed at the end of the run.

pub mod common_names;
pub mod habitats;
pub mod taxonomy;

pub use common_names::insert_common_name;
pub use habitats::{insert_link, load_habitat_by_code, resolve_habitat, ResolvedHabitat};
pub use taxonomy::{insert_taxon, load_taxon, update_assessment, update_elevation};
