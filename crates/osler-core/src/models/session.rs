use serde::{Deserialize, Serialize};

/// Per-conversation state, owned by the caller and round-tripped through
/// every turn. The engine never holds state between calls: each turn is a
/// pure function of `(input text, persona, incoming state)`.
///
/// Unrecognized keys supplied by the caller survive the round trip via the
/// flattened `extra` map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    /// Chief complaint already disclosed this session.
    #[serde(default)]
    pub shared_cc: bool,
    /// Language-access precondition satisfied; once true it stays true.
    #[serde(default)]
    pub interpreter_provided: bool,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
