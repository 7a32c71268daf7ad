//! Streaming generative turns.
//!
//! A turn is a cooperative producer of `Token` fragments terminated by
//! exactly one `Done` metadata event. Fragments always arrive before the
//! terminal event; on a mid-stream generation failure the error item is
//! delivered *instead of* `Done`, and the caller must treat state/tags as
//! not updated. Dropping the receiver cancels the producer before `Done`.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use osler_core::models::persona::Persona;
use osler_core::models::session::SessionState;
use osler_core::models::tag::Tag;
use osler_engine::check_guards;

use crate::adapters::TextGenerator;
use crate::error::GenerateError;
use crate::prompt::build_messages;
use crate::turn::{TurnOptions, input_tags, output_recheck_tripped};

/// An event in a streaming turn.
#[derive(Debug, Clone)]
pub enum StreamEvent {
    /// One reply fragment.
    Token(String),
    /// Terminal metadata: the outgoing session state and the turn's tags.
    /// Emitted exactly once per successful turn; state and tags are only
    /// valid once this event is observed.
    Done { state: SessionState, tags: Vec<Tag> },
}

/// Run one turn in streaming mode.
///
/// Must be called within a tokio runtime: the producer runs in a spawned
/// task feeding a bounded channel. Guard short-circuits (interpreter
/// gate, scope guardrail) stream their fixed reply as a single token
/// followed by `Done`.
///
/// The output-side guardrail cannot retract fragments that were already
/// delivered; when the accumulated reply trips the re-check, the terminal
/// tag set carries `guardrails_invoked` instead.
pub fn stream_patient_reply(
    generator: Arc<dyn TextGenerator>,
    user_text: impl Into<String>,
    persona: &Persona,
    state: &SessionState,
    options: TurnOptions,
) -> mpsc::Receiver<Result<StreamEvent, GenerateError>> {
    let user_text = user_text.into();
    let persona = persona.clone();
    let incoming = state.clone();
    let (tx, rx) = mpsc::channel(32);

    tokio::spawn(async move {
        if let Some(guard) = check_guards(&user_text, &persona, &incoming) {
            if tx.send(Ok(StreamEvent::Token(guard.reply))).await.is_err() {
                return;
            }
            let _ = tx
                .send(Ok(StreamEvent::Done {
                    state: guard.state,
                    tags: guard.tags,
                }))
                .await;
            return;
        }

        let messages = build_messages(&persona, &user_text, &incoming, &options.behavior);
        let mut fragments = generator
            .generate_stream(&messages, options.temperature)
            .await;

        let mut full_reply = String::new();
        while let Some(item) = fragments.recv().await {
            match item {
                Ok(fragment) => {
                    full_reply.push_str(&fragment);
                    if tx.send(Ok(StreamEvent::Token(fragment))).await.is_err() {
                        // Receiver dropped: cancelled before the terminal
                        // event, so state/tags were never delivered.
                        return;
                    }
                }
                Err(e) => {
                    // Fragments already sent stay observable; the error
                    // replaces the terminal event.
                    warn!(error = %e, "generation failed mid-stream");
                    let _ = tx.send(Err(e)).await;
                    return;
                }
            }
        }

        let mut state = incoming;
        let mut tags = input_tags(&user_text);
        state.shared_cc = true;
        if output_recheck_tripped(&full_reply) {
            warn!("streamed reply tripped output-side guardrail");
            tags.push(Tag::GuardrailsInvoked);
        }

        debug!(chars = full_reply.len(), tags = tags.len(), "stream complete");
        let _ = tx.send(Ok(StreamEvent::Done { state, tags })).await;
    });

    rx
}
