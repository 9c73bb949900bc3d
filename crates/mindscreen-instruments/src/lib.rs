//! mindscreen-instruments
//!
//! Screening instrument definitions and deterministic scoring. Pure data
//! and pure functions: no network, no clock, no randomness.
//!
//! An instrument is described by an [`InstrumentDefinition`] value (items,
//! category table, severity bands, critical item). The scoring,
//! categorization and risk functions are generic over that value, so a new
//! instrument is a data addition under [`instruments`].

pub mod categorize;
pub mod definition;
pub mod error;
pub mod guidance;
pub mod instruments;
pub mod scoring;

pub use definition::InstrumentDefinition;

/// Return all registered instruments.
pub fn all_instruments() -> Vec<&'static InstrumentDefinition> {
    vec![instruments::phq9::definition()]
}

/// Look up an instrument by ID.
pub fn get_instrument(id: &str) -> Option<&'static InstrumentDefinition> {
    all_instruments().into_iter().find(|i| i.id == id)
}
