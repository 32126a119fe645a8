//! Error types for `mayberry-core`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("symptom not found: {0}")]
  SymptomNotFound(Uuid),

  #[error("disease not found: {0}")]
  DiseaseNotFound(Uuid),

  #[error("treatment not found: {0}")]
  TreatmentNotFound(Uuid),

  #[error("medication not found: {0}")]
  MedicationNotFound(Uuid),

  #[error("probability weight {0} is outside [0, 1]")]
  WeightOutOfRange(f64),

  #[error("duplicate {kind} name: {name:?}")]
  DuplicateName { kind: &'static str, name: String },

  #[error("knowledge store unavailable: {0}")]
  StoreUnavailable(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
