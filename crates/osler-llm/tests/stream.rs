use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use osler_core::models::persona::{Identity, Persona};
use osler_core::models::session::SessionState;
use osler_core::models::tag::Tag;
use osler_llm::{
    EchoGenerator, FragmentReceiver, GenerateError, PromptMessage, StreamEvent, TextGenerator,
    TurnOptions, stream_patient_reply,
};

/// Drain a stream into (fragments, done-event, error).
async fn drain(
    mut rx: mpsc::Receiver<Result<StreamEvent, GenerateError>>,
) -> (Vec<String>, Option<(SessionState, Vec<Tag>)>, Option<GenerateError>) {
    let mut fragments = Vec::new();
    let mut done = None;
    let mut error = None;

    while let Some(item) = rx.recv().await {
        match item {
            Ok(StreamEvent::Token(t)) => fragments.push(t),
            Ok(StreamEvent::Done { state, tags }) => {
                assert!(done.is_none(), "Done must be exactly-once");
                done = Some((state, tags));
            }
            Err(e) => error = Some(e),
        }
    }
    (fragments, done, error)
}

#[tokio::test]
async fn fragments_arrive_before_a_single_done_event() {
    let rx = stream_patient_reply(
        Arc::new(EchoGenerator),
        "When did this start?",
        &Persona::default(),
        &SessionState::default(),
        TurnOptions::default(),
    );

    let (fragments, done, error) = drain(rx).await;

    assert!(error.is_none());
    assert!(fragments.len() > 1, "echo streams word by word");
    assert_eq!(fragments.concat(), "(echo) When did this start? ");

    let (state, tags) = done.expect("terminal metadata event");
    assert!(state.shared_cc);
    assert_eq!(tags, vec![Tag::AskedOnset]);
}

#[tokio::test]
async fn guard_short_circuit_streams_one_token_then_done() {
    let persona = Persona {
        identity: Identity {
            language: Some("Ukrainian".to_string()),
            interpreter_needed: true,
            ..Default::default()
        },
        ..Default::default()
    };

    let rx = stream_patient_reply(
        Arc::new(EchoGenerator),
        "hello",
        &persona,
        &SessionState::default(),
        TurnOptions::default(),
    );

    let (fragments, done, error) = drain(rx).await;

    assert!(error.is_none());
    assert_eq!(fragments.len(), 1);
    assert!(fragments[0].contains("interpreter for Ukrainian"));

    let (state, tags) = done.unwrap();
    assert_eq!(tags, vec![Tag::InterpreterNeeded]);
    assert!(!state.shared_cc);
}

/// Streams two fragments, then fails.
struct MidStreamFailure;

#[async_trait]
impl TextGenerator for MidStreamFailure {
    async fn generate(
        &self,
        _messages: &[PromptMessage],
        _temperature: f32,
    ) -> Result<String, GenerateError> {
        Err(GenerateError::Generation("unused".to_string()))
    }

    async fn generate_stream(
        &self,
        _messages: &[PromptMessage],
        _temperature: f32,
    ) -> FragmentReceiver {
        let (tx, rx) = mpsc::channel(4);
        tokio::spawn(async move {
            let _ = tx.send(Ok("My knee ".to_string())).await;
            let _ = tx.send(Ok("has been ".to_string())).await;
            let _ = tx
                .send(Err(GenerateError::Generation("connection reset".to_string())))
                .await;
        });
        rx
    }
}

#[tokio::test]
async fn mid_stream_failure_keeps_fragments_and_replaces_done() {
    let rx = stream_patient_reply(
        Arc::new(MidStreamFailure),
        "How is your knee?",
        &Persona::default(),
        &SessionState::default(),
        TurnOptions::default(),
    );

    let (fragments, done, error) = drain(rx).await;

    // Already-produced fragments stay observable.
    assert_eq!(fragments, vec!["My knee ".to_string(), "has been ".to_string()]);
    // ...but the turn did not complete: no terminal event, so the caller
    // must treat state/tags as not updated.
    assert!(done.is_none());
    assert!(matches!(error, Some(GenerateError::Generation(_))));
}

/// Implements only `generate`; streaming comes from the trait default.
struct NonStreamingBackend;

#[async_trait]
impl TextGenerator for NonStreamingBackend {
    async fn generate(
        &self,
        _messages: &[PromptMessage],
        _temperature: f32,
    ) -> Result<String, GenerateError> {
        Ok("It aches mostly at night.".to_string())
    }
}

#[tokio::test]
async fn non_streaming_backend_synthesizes_a_single_fragment_stream() {
    let rx = stream_patient_reply(
        Arc::new(NonStreamingBackend),
        "Tell me more.",
        &Persona::default(),
        &SessionState::default(),
        TurnOptions::default(),
    );

    let (fragments, done, error) = drain(rx).await;

    assert!(error.is_none());
    assert_eq!(fragments, vec!["It aches mostly at night.".to_string()]);
    assert!(done.is_some());
}

#[tokio::test]
async fn streamed_reply_tripping_recheck_tags_guardrails() {
    /// Streams text containing prescription vocabulary.
    struct Leaky;

    #[async_trait]
    impl TextGenerator for Leaky {
        async fn generate(
            &self,
            _messages: &[PromptMessage],
            _temperature: f32,
        ) -> Result<String, GenerateError> {
            Ok("They might prescribe me something.".to_string())
        }
    }

    let rx = stream_patient_reply(
        Arc::new(Leaky),
        "What helps?",
        &Persona::default(),
        &SessionState::default(),
        TurnOptions::default(),
    );

    let (_fragments, done, _error) = drain(rx).await;
    let (_state, tags) = done.unwrap();
    assert!(tags.contains(&Tag::GuardrailsInvoked));
}
