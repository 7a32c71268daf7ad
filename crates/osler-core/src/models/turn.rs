use serde::{Deserialize, Serialize};

use super::session::SessionState;
use super::tag::Tag;

/// The result of one conversational turn: the patient-voiced reply, the
/// outgoing session state for the caller to store, and the tags earned
/// this turn (in emission order).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnOutcome {
    pub reply: String,
    pub state: SessionState,
    pub tags: Vec<Tag>,
}
