//! One generative conversational turn (non-streaming).

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use osler_core::models::persona::Persona;
use osler_core::models::session::SessionState;
use osler_core::models::tag::Tag;
use osler_core::models::turn::TurnOutcome;
use osler_engine::{check_guards, detect_slots};

use crate::adapters::TextGenerator;
use crate::error::GenerateError;
use crate::prompt::{BehaviorProfile, build_messages};

/// Per-request knobs for the generative path. Threaded explicitly so
/// concurrent sessions stay isolated; there is no process-wide setting.
#[derive(Debug, Clone)]
pub struct TurnOptions {
    pub temperature: f32,
    pub behavior: BehaviorProfile,
}

impl Default for TurnOptions {
    fn default() -> Self {
        Self {
            temperature: 0.2,
            behavior: BehaviorProfile::default(),
        }
    }
}

/// Diagnosis/prescription vocabulary the generated text itself must not
/// carry, even though the input-side guardrail already passed.
static OUTPUT_RECHECK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bdiagnos|\bprescrib").expect("recheck pattern must compile"));

/// Softened replacement when the generated reply trips the re-check.
pub const SOFTENED_DEFLECTION: &str = "I'm not sure about the exact diagnosis or prescriptions—I'm \
     mainly describing what I feel day to day.";

pub(crate) fn output_recheck_tripped(reply: &str) -> bool {
    OUTPUT_RECHECK.is_match(&reply.to_lowercase())
}

/// Rubric tags for a generative turn come from the slot classifier applied
/// to the learner's *input*, not to the generated output, so both reply
/// paths feed the scorer identically.
pub(crate) fn input_tags(user_text: &str) -> Vec<Tag> {
    detect_slots(user_text)
        .iter()
        .filter_map(|slot| slot.tag())
        .collect()
}

/// Run one turn against a text-generation backend.
///
/// The interpreter gate and scope guardrail short-circuit exactly as in
/// the deterministic path (and never reach the model). A generation
/// failure is surfaced as an error, never silently replaced with content.
/// A reply that itself contains diagnosis/prescription vocabulary is
/// swapped for [`SOFTENED_DEFLECTION`] with `guardrails_invoked` appended
/// — defense in depth on the output side.
pub async fn patient_reply_generated(
    generator: &dyn TextGenerator,
    user_text: &str,
    persona: &Persona,
    state: &SessionState,
    options: &TurnOptions,
) -> Result<TurnOutcome, GenerateError> {
    if let Some(guard) = check_guards(user_text, persona, state) {
        return Ok(TurnOutcome {
            reply: guard.reply,
            state: guard.state,
            tags: guard.tags,
        });
    }

    let messages = build_messages(persona, user_text, state, &options.behavior);
    let mut reply = generator.generate(&messages, options.temperature).await?;

    let mut state = state.clone();
    let mut tags = input_tags(user_text);
    state.shared_cc = true;

    if output_recheck_tripped(&reply) {
        warn!("generated reply tripped output-side guardrail, softening");
        reply = SOFTENED_DEFLECTION.to_string();
        tags.push(Tag::GuardrailsInvoked);
    }

    debug!(tags = tags.len(), "generative turn complete");

    Ok(TurnOutcome { reply, state, tags })
}
