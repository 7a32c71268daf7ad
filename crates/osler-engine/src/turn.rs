//! One deterministic conversational turn.

use tracing::debug;

use osler_core::models::persona::Persona;
use osler_core::models::session::SessionState;
use osler_core::models::tag::Tag;
use osler_core::models::turn::TurnOutcome;

use crate::{compose, guards, slots};

/// Prompt used once the chief complaint has already been disclosed and a
/// turn matches nothing.
const NUDGE: &str = "What would you like to know next? You can ask about when it started, \
     how it happened, what makes it worse or better.";

/// Fallback disclosure for personas without a scripted chief complaint.
const GENERIC_CC: &str = "I've been having some pain that I'd like help with.";

/// Run one turn of the deterministic dialogue policy.
///
/// Pipeline: guard chain (interpreter gate, then scope guardrail), slot
/// detection, then one composed sentence per hit slot in canonical table
/// order. A no-match turn discloses the chief complaint once (setting
/// `shared_cc` and tagging it), and nudges thereafter.
pub fn patient_reply(user_text: &str, persona: &Persona, state: &SessionState) -> TurnOutcome {
    if let Some(guard) = guards::check_guards(user_text, persona, state) {
        return TurnOutcome {
            reply: guard.reply,
            state: guard.state,
            tags: guard.tags,
        };
    }

    let mut state = state.clone();
    let mut parts: Vec<String> = Vec::new();
    let mut tags: Vec<Tag> = Vec::new();

    let hits = slots::detect_slots(user_text);
    for slot in &hits {
        if let Some((sentence, tag)) = compose::sentence_for(*slot, persona) {
            parts.push(sentence);
            tags.push(tag);
        }
    }

    if parts.is_empty() {
        if state.shared_cc {
            parts.push(NUDGE.to_string());
        } else {
            parts.push(
                persona
                    .chief_complaint
                    .clone()
                    .unwrap_or_else(|| GENERIC_CC.to_string()),
            );
            state.shared_cc = true;
            tags.push(Tag::SharedCc);
        }
    }

    debug!(slots = hits.len(), tags = tags.len(), "composed deterministic turn");

    TurnOutcome {
        reply: parts.join(" "),
        state,
        tags,
    }
}
