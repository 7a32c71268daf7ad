//! osler-personas
//!
//! The persona store: resolves a patient identifier to a structured
//! persona record. Personas live as `{patient_id}.persona.json` files in
//! a directory chosen by the caller.

pub mod error;
pub mod store;

pub use error::PersonaError;
pub use store::{PersonaStore, PersonaSummary};
