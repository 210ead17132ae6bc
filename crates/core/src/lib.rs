//! Budgetbook Core - Domain entities, services, and traits.
//!
//! This crate holds the settings screen logic of Budgetbook: preference
//! sources, the drive mount signal, the legacy backup import job and the
//! aggregated screen state. It is database-agnostic and defines traits that
//! are implemented by the `storage-sqlite` crate.

pub mod backup;
pub mod constants;
pub mod drive;
pub mod errors;
pub mod navigation;
pub mod settings;
pub mod settings_screen;
pub mod transactions;

#[cfg(test)]
mod testing;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
