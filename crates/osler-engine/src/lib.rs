//! osler-engine
//!
//! The deterministic dialogue policy for the standardized patient: slot
//! detection, the guard chain (interpreter gate, scope guardrail), and the
//! template-based reply composer.
//!
//! Every function here is pure and synchronous. Session state comes in as
//! a parameter and goes out in the [`TurnOutcome`]; nothing is held
//! between calls, so independent sessions can run a turn concurrently
//! with no shared mutable state.

pub mod compose;
pub mod guards;
pub mod slots;
pub mod turn;

pub use guards::{GuardOutcome, check_guards};
pub use slots::{Slot, detect_slots};
pub use turn::patient_reply;

pub use osler_core::models::turn::TurnOutcome;
