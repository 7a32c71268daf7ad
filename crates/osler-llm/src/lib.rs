//! osler-llm
//!
//! The generative reply adapter: a drop-in alternative to the
//! deterministic composer that delegates phrasing to a pluggable
//! text-generation backend while honoring the same interpreter-gate and
//! guardrail contracts, the same tag vocabulary, and the same caller-owned
//! session state.
//!
//! The backend boundary is the [`TextGenerator`] trait: two operations,
//! `generate` and `generate_stream`. [`EchoGenerator`] is the offline
//! implementation used in tests and development; `osler-bedrock` provides
//! the hosted one.

pub mod adapters;
pub mod error;
pub mod prompt;
pub mod stream;
pub mod turn;

pub use adapters::{EchoGenerator, FragmentReceiver, TextGenerator};
pub use error::GenerateError;
pub use prompt::{BehaviorProfile, PromptMessage, PromptRole, build_messages};
pub use stream::{StreamEvent, stream_patient_reply};
pub use turn::{TurnOptions, patient_reply_generated};
