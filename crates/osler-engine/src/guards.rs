//! The guard chain: priority-ordered checks that run before any other
//! policy and own their own short-circuit replies.
//!
//! Order matters. The interpreter gate is evaluated strictly first: while
//! language access is unmet, the input is not inspected for anything else,
//! not even out-of-scope asks. The scope guardrail runs second and
//! deflects requests a standardized patient must never answer (diagnosis,
//! prescriptions, imaging).
//!
//! Guard outcomes are ordinary conversational turns, never errors.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use osler_core::models::persona::Persona;
use osler_core::models::session::SessionState;
use osler_core::models::tag::Tag;

/// A short-circuit turn produced by a guard.
#[derive(Debug, Clone)]
pub struct GuardOutcome {
    pub reply: String,
    pub state: SessionState,
    pub tags: Vec<Tag>,
}

type Guard = fn(&str, &Persona, &SessionState) -> Option<GuardOutcome>;

/// Evaluation order is the priority order.
const GUARDS: &[Guard] = &[interpreter_gate, scope_guardrail];

/// Run the guard chain. The first guard that fires ends the turn; `None`
/// means the input may proceed to slot detection or generation.
pub fn check_guards(
    user_text: &str,
    persona: &Persona,
    state: &SessionState,
) -> Option<GuardOutcome> {
    GUARDS
        .iter()
        .find_map(|guard| guard(user_text, persona, state))
}

static WANTS_INTERPRETER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(interpreter|translate|translator)\b").expect("interpreter pattern must compile")
});

/// Language-access gate.
///
/// States: `NEEDS_INTERPRETER` (required and not yet provided) and
/// `CLEARED`. Clearing happens when the input asks for an interpreter;
/// it sets `interpreter_provided` in the outgoing state and is terminal
/// for the session. Both branches tag `interpreter_needed` so the session
/// records that language access was an issue.
fn interpreter_gate(
    user_text: &str,
    persona: &Persona,
    state: &SessionState,
) -> Option<GuardOutcome> {
    if !persona.interpreter_required() || state.interpreter_provided {
        return None;
    }
    let language = persona.identity.language.as_deref()?;

    let tags = vec![Tag::InterpreterNeeded];
    let mut state = state.clone();

    if WANTS_INTERPRETER.is_match(&user_text.to_lowercase()) {
        debug!(language, "interpreter gate cleared");
        state.interpreter_provided = true;
        Some(GuardOutcome {
            reply: format!(
                "Thank you. With an interpreter for {language}, I'm ready to continue. How can I help?"
            ),
            state,
            tags,
        })
    } else {
        debug!(language, "interpreter gate blocking turn");
        Some(GuardOutcome {
            reply: format!("Before we start, I need an interpreter for {language}, please."),
            state,
            tags,
        })
    }
}

/// Asks a standardized patient must deflect rather than answer.
const OUT_OF_SCOPE_PATTERNS: &[&str] = &[
    r"\bwhat'?s my diagnosis\b",
    r"\bdiagnos(e|is)\b",
    r"\bcan you prescribe\b",
    r"\bwhat medication\b",
    r"\bimaging\b|\bx-?ray\b|\bmri\b|\bct\b",
];

static OUT_OF_SCOPE: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    OUT_OF_SCOPE_PATTERNS
        .iter()
        .map(|p| Regex::new(p).expect("guardrail pattern must compile"))
        .collect()
});

/// The fixed deflection for out-of-scope clinical asks.
pub const DEFLECTION: &str = "I'm not sure about that—I'm just here to tell you how it feels and \
     what I notice day to day. I don't know about diagnoses, imaging, or prescriptions.";

/// Scope guardrail: diagnosis, prescription, and imaging requests
/// short-circuit the turn with a fixed deflection. Slot matches in the
/// same input are ignored; `guardrails_invoked` is the only tag produced.
fn scope_guardrail(
    user_text: &str,
    _persona: &Persona,
    state: &SessionState,
) -> Option<GuardOutcome> {
    let text = user_text.to_lowercase();
    if OUT_OF_SCOPE.iter().any(|p| p.is_match(&text)) {
        debug!("scope guardrail invoked");
        Some(GuardOutcome {
            reply: DEFLECTION.to_string(),
            state: state.clone(),
            tags: vec![Tag::GuardrailsInvoked],
        })
    } else {
        None
    }
}
