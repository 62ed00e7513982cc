//! # IUCN Common Library
//!
//! Shared code for the IUCN Red List importer:
//! - Database schema and row models
//! - Error type and row-count checks
//! - Configuration loading

pub mod config;
pub mod db;
pub mod error;

pub use error::{expect_single_row, Error, Result};
