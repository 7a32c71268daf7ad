//! The text-generation capability boundary.
//!
//! Concrete backends (echo, hosted model, local) are interchangeable
//! implementations of [`TextGenerator`]; nothing above this boundary knows
//! which one is in play.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::GenerateError;
use crate::prompt::{PromptMessage, PromptRole};

/// A lazy, finite, non-restartable sequence of reply fragments. Fragment
/// order is delivery order; an `Err` item ends the sequence.
pub type FragmentReceiver = mpsc::Receiver<Result<String, GenerateError>>;

/// A pluggable text-generation backend.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a complete reply for the given chat messages.
    async fn generate(
        &self,
        messages: &[PromptMessage],
        temperature: f32,
    ) -> Result<String, GenerateError>;

    /// Stream the reply as fragments.
    ///
    /// Backends with no native streaming keep this default, which
    /// synthesizes a single-fragment stream from the non-streaming result.
    async fn generate_stream(
        &self,
        messages: &[PromptMessage],
        temperature: f32,
    ) -> FragmentReceiver {
        let (tx, rx) = mpsc::channel(1);
        let result = self.generate(messages, temperature).await;
        let _ = tx.send(result).await;
        rx
    }
}

/// Offline backend that echoes the last user message. Keeps development
/// and tests off the network.
pub struct EchoGenerator;

#[async_trait]
impl TextGenerator for EchoGenerator {
    async fn generate(
        &self,
        messages: &[PromptMessage],
        _temperature: f32,
    ) -> Result<String, GenerateError> {
        let last_user = messages
            .iter()
            .rev()
            .find(|m| m.role == PromptRole::User)
            .map(|m| m.content.as_str())
            .unwrap_or_default();
        Ok(format!("(echo) {last_user}"))
    }

    async fn generate_stream(
        &self,
        messages: &[PromptMessage],
        temperature: f32,
    ) -> FragmentReceiver {
        let text = match self.generate(messages, temperature).await {
            Ok(text) => text,
            Err(e) => {
                let (tx, rx) = mpsc::channel(1);
                let _ = tx.send(Err(e)).await;
                return rx;
            }
        };

        // Simulate a token stream by words.
        let (tx, rx) = mpsc::channel(16);
        tokio::spawn(async move {
            for word in text.split_whitespace() {
                if tx.send(Ok(format!("{word} "))).await.is_err() {
                    return;
                }
            }
        });
        rx
    }
}
