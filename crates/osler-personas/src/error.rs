use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersonaError {
    #[error("persona not found: {patient_id}")]
    NotFound { patient_id: String },

    #[error("malformed persona file for {patient_id}: {source}")]
    Malformed {
        patient_id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error reading persona store: {0}")]
    Io(#[from] std::io::Error),
}
