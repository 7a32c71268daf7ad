use osler_core::models::persona::{Identity, Persona};
use osler_core::models::session::SessionState;
use osler_core::models::tag::Tag;
use osler_engine::{check_guards, patient_reply};

fn ukrainian_persona() -> Persona {
    Persona {
        identity: Identity {
            language: Some("Ukrainian".to_string()),
            interpreter_needed: true,
            ..Default::default()
        },
        ..Default::default()
    }
}

#[test]
fn interpreter_gate_blocks_until_requested() {
    let persona = ukrainian_persona();
    let outcome = patient_reply("hello", &persona, &SessionState::default());

    assert!(outcome.reply.contains("interpreter for Ukrainian"));
    assert_eq!(outcome.tags, vec![Tag::InterpreterNeeded]);
    assert!(!outcome.state.interpreter_provided);
}

#[test]
fn interpreter_request_clears_the_gate() {
    let persona = ukrainian_persona();
    let outcome = patient_reply("Can we get an interpreter?", &persona, &SessionState::default());

    assert!(outcome.reply.starts_with("Thank you."));
    assert!(outcome.reply.contains("Ukrainian"));
    assert!(outcome.state.interpreter_provided);
}

#[test]
fn clearing_is_terminal_for_the_session() {
    let persona = ukrainian_persona();
    let cleared = SessionState {
        interpreter_provided: true,
        ..Default::default()
    };

    // Gate no longer fires; re-requesting an interpreter is a normal turn.
    assert!(check_guards("could we get a translator?", &persona, &cleared).is_none());

    let outcome = patient_reply("when did it start?", &persona, &cleared);
    assert!(!outcome.tags.contains(&Tag::InterpreterNeeded));
    assert!(outcome.tags.contains(&Tag::AskedOnset));
}

#[test]
fn interpreter_flag_without_language_does_not_gate() {
    let persona = Persona {
        identity: Identity {
            interpreter_needed: true,
            language: None,
            ..Default::default()
        },
        ..Default::default()
    };
    assert!(check_guards("hello", &persona, &SessionState::default()).is_none());
}

#[test]
fn gate_runs_before_the_guardrail() {
    // An out-of-scope ask while the gate is unmet gets the interpreter
    // prompt, not the deflection: the input is not inspected further.
    let persona = ukrainian_persona();
    let outcome = patient_reply("What's my diagnosis?", &persona, &SessionState::default());

    assert!(outcome.reply.contains("interpreter"));
    assert_eq!(outcome.tags, vec![Tag::InterpreterNeeded]);
}

#[test]
fn diagnosis_ask_is_deflected() {
    let outcome = patient_reply("What's my diagnosis?", &Persona::default(), &SessionState::default());

    assert_eq!(outcome.reply, osler_engine::guards::DEFLECTION);
    assert_eq!(outcome.tags, vec![Tag::GuardrailsInvoked]);
}

#[test]
fn imaging_asks_are_deflected() {
    for ask in ["Should I order an MRI?", "Do you need an x-ray?", "What about imaging?"] {
        let outcome = patient_reply(ask, &Persona::default(), &SessionState::default());
        assert_eq!(outcome.tags, vec![Tag::GuardrailsInvoked], "ask: {ask}");
    }
}

#[test]
fn guardrail_ignores_slot_matches_in_the_same_input() {
    let outcome = patient_reply(
        "What's my diagnosis, and when did the pain start?",
        &Persona::default(),
        &SessionState::default(),
    );

    assert_eq!(outcome.tags, vec![Tag::GuardrailsInvoked]);
    assert_eq!(outcome.reply, osler_engine::guards::DEFLECTION);
}

#[test]
fn guardrail_leaves_state_untouched() {
    let incoming = SessionState {
        shared_cc: true,
        ..Default::default()
    };
    let outcome = patient_reply("can you prescribe something?", &Persona::default(), &incoming);
    assert_eq!(outcome.state, incoming);
}
