use thiserror::Error;

/// Failures of the pluggable text-generation capability.
///
/// These are surfaced to the caller distinctly from guardrail deflections
/// and interpreter-gate prompts, which are ordinary turns — the engine
/// never substitutes content for a failed generation.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("text generation failed: {0}")]
    Generation(String),
}
