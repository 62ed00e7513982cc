//! Test Helper Utilities
//!
//! Shared utilities for testing iucn-import

#![allow(dead_code)]

pub mod datasets;

pub use datasets::{count_rows, open_store, DatasetBuilder};
