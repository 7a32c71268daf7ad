use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A standardized-patient persona, loaded once per conversation.
///
/// Every field is optional at the data level: the dialogue policy must
/// degrade to generic phrasing when a field is absent, never fail the turn.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Persona {
    pub meta: PersonaMeta,
    pub identity: Identity,
    pub condition: Option<String>,
    pub chief_complaint: Option<String>,
    pub hpi: Hpi,
    pub goals: Vec<String>,
    pub context: PersonaContext,
    pub sdoh: Sdoh,
    pub communication_profile: CommunicationProfile,
    pub exam_script: ExamScript,
}

impl Persona {
    /// Whether this persona is blocked on language access: an interpreter
    /// is required iff the flag is set AND a spoken language is recorded.
    pub fn interpreter_required(&self) -> bool {
        self.identity.interpreter_needed && self.identity.language.is_some()
    }
}

/// File-level metadata carried alongside the persona content.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonaMeta {
    pub patient_id: Option<String>,
    pub schema_version: Option<String>,
    pub created_at: Option<jiff::Timestamp>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Identity {
    pub preferred_name: Option<String>,
    pub pronouns: Option<String>,
    pub age: Option<u32>,
    pub sex_at_birth: Option<String>,
    pub gender_identity: Option<String>,
    /// Spoken language, e.g. `"Ukrainian"`.
    pub language: Option<String>,
    pub interpreter_needed: bool,
}

/// History of present illness.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Hpi {
    pub onset: Option<String>,
    pub mechanism: Option<String>,
    pub location: Option<String>,
    /// Severity on the 0-10 numeric rating scale.
    pub severity_nrs: Option<f64>,
    pub aggravators: Vec<String>,
    pub easers: Vec<String>,
    #[serde(rename = "24h_pattern")]
    pub pattern_24h: Option<String>,
    pub red_flags: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonaContext {
    pub city: Option<String>,
    pub rural_urban: Option<String>,
    pub work_status: Option<String>,
    pub sport_participation: Option<String>,
}

/// Social determinants of health.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Sdoh {
    pub transport: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CommunicationProfile {
    pub tone: Option<String>,
    pub talkativeness: Option<String>,
    pub health_literacy: Option<String>,
}

/// Exam findings the patient can report when explicitly asked.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExamScript {
    pub observation: Option<String>,
    /// Active range-of-motion highlights, keyed by movement.
    pub arom: BTreeMap<String, String>,
    /// Special-test results, keyed by test name.
    pub special_tests: BTreeMap<String, String>,
    pub neurovascular: Option<String>,
}
