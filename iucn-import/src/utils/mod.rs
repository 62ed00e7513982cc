//! Utility modules for iucn-import

pub mod unit_of_work;

pub use unit_of_work::UnitOfWork;
