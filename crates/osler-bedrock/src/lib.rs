//! osler-bedrock
//!
//! AWS Bedrock backend for the generative patient: a [`TextGenerator`]
//! implementation over the Converse API, plus chat model discovery.
//!
//! [`TextGenerator`]: osler_llm::TextGenerator

pub mod error;
pub mod generator;
pub mod models;

pub use error::BedrockError;
pub use generator::BedrockGenerator;
pub use models::{ChatModel, list_chat_models};
