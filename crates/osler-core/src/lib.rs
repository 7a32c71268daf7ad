//! osler-core
//!
//! Pure domain types for the standardized-patient simulator.
//! No I/O, no AWS dependency — this is the shared vocabulary of the system.

pub mod error;
pub mod models;
