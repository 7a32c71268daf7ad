//! File-backed persona store with a read-mostly cache.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use osler_core::models::persona::Persona;

use crate::error::PersonaError;

const PERSONA_SUFFIX: &str = ".persona.json";

/// Loads personas from a directory of `{patient_id}.persona.json` files.
///
/// Loaded personas are cached behind an `RwLock`; a persona is inserted
/// only once fully deserialized, so concurrent first-lookups may each read
/// the file but can never observe a partially-built record. Personas are
/// immutable for the life of the process.
pub struct PersonaStore {
    dir: PathBuf,
    cache: RwLock<HashMap<String, Arc<Persona>>>,
}

/// Listing entry for the instructor-facing patient picker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonaSummary {
    pub patient_id: String,
    pub preferred_name: Option<String>,
    pub age: Option<u32>,
    pub condition: Option<String>,
    pub chief_complaint: Option<String>,
}

impl PersonaStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Resolve a patient identifier to its persona.
    ///
    /// A missing file is `PersonaError::NotFound`; an undeserializable
    /// file is `PersonaError::Malformed`. Partial records load fine —
    /// every persona field is optional and the engine degrades to generic
    /// phrasing downstream.
    pub fn load(&self, patient_id: &str) -> Result<Arc<Persona>, PersonaError> {
        if let Some(persona) = self
            .cache
            .read()
            .expect("persona cache lock poisoned")
            .get(patient_id)
        {
            return Ok(Arc::clone(persona));
        }

        let path = self.dir.join(format!("{patient_id}{PERSONA_SUFFIX}"));
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(patient_id, path = %path.display(), "persona file not found");
                return Err(PersonaError::NotFound {
                    patient_id: patient_id.to_string(),
                });
            }
            Err(e) => return Err(e.into()),
        };

        let persona: Persona =
            serde_json::from_slice(&bytes).map_err(|source| PersonaError::Malformed {
                patient_id: patient_id.to_string(),
                source,
            })?;

        debug!(patient_id, "persona loaded");

        let persona = Arc::new(persona);
        let mut cache = self.cache.write().expect("persona cache lock poisoned");
        // A concurrent loader may have won the race; keep the first entry
        // so repeat callers see one consistent Arc.
        Ok(Arc::clone(
            cache
                .entry(patient_id.to_string())
                .or_insert(persona),
        ))
    }

    /// List available personas by scanning the store directory.
    ///
    /// Files that fail to parse are skipped with a warning rather than
    /// failing the whole listing. Results are sorted by patient id.
    pub fn list(&self) -> Result<Vec<PersonaSummary>, PersonaError> {
        let mut summaries = Vec::new();

        for entry in std::fs::read_dir(&self.dir)? {
            let entry = entry?;
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };
            let Some(patient_id) = name.strip_suffix(PERSONA_SUFFIX) else {
                continue;
            };

            match self.load(patient_id) {
                Ok(persona) => summaries.push(PersonaSummary {
                    patient_id: patient_id.to_string(),
                    preferred_name: persona.identity.preferred_name.clone(),
                    age: persona.identity.age,
                    condition: persona.condition.clone(),
                    chief_complaint: persona.chief_complaint.clone(),
                }),
                Err(e) => {
                    warn!(patient_id, error = %e, "skipping unreadable persona");
                }
            }
        }

        summaries.sort_by(|a, b| a.patient_id.cmp(&b.patient_id));
        Ok(summaries)
    }
}
