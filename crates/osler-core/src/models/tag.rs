use serde::{Deserialize, Serialize};

/// Semantic tag describing a clinical-interview behavior the learner just
/// exhibited. Tags are accumulated by the caller across a session and are
/// the sole input to rubric scoring.
///
/// The wire spellings are the join key between engine output and the
/// scorer: they are fixed, including the historically irregular
/// `asked_sdoH_transport`, and must never be "normalized".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tag {
    #[serde(rename = "asked_onset")]
    AskedOnset,
    #[serde(rename = "asked_mechanism")]
    AskedMechanism,
    #[serde(rename = "asked_location")]
    AskedLocation,
    #[serde(rename = "asked_severity")]
    AskedSeverity,
    #[serde(rename = "asked_aggravators")]
    AskedAggravators,
    #[serde(rename = "asked_easers")]
    AskedEasers,
    #[serde(rename = "asked_24h_pattern")]
    Asked24hPattern,
    #[serde(rename = "screened_red_flags")]
    ScreenedRedFlags,
    #[serde(rename = "asked_work_status")]
    AskedWorkStatus,
    #[serde(rename = "asked_sdoH_transport")]
    AskedSdohTransport,
    #[serde(rename = "asked_goals")]
    AskedGoals,
    #[serde(rename = "asked_exam")]
    AskedExam,
    #[serde(rename = "shared_cc")]
    SharedCc,
    #[serde(rename = "interpreter_needed")]
    InterpreterNeeded,
    #[serde(rename = "guardrails_invoked")]
    GuardrailsInvoked,
}

impl Tag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tag::AskedOnset => "asked_onset",
            Tag::AskedMechanism => "asked_mechanism",
            Tag::AskedLocation => "asked_location",
            Tag::AskedSeverity => "asked_severity",
            Tag::AskedAggravators => "asked_aggravators",
            Tag::AskedEasers => "asked_easers",
            Tag::Asked24hPattern => "asked_24h_pattern",
            Tag::ScreenedRedFlags => "screened_red_flags",
            Tag::AskedWorkStatus => "asked_work_status",
            Tag::AskedSdohTransport => "asked_sdoH_transport",
            Tag::AskedGoals => "asked_goals",
            Tag::AskedExam => "asked_exam",
            Tag::SharedCc => "shared_cc",
            Tag::InterpreterNeeded => "interpreter_needed",
            Tag::GuardrailsInvoked => "guardrails_invoked",
        }
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
