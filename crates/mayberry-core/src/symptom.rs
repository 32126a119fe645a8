//! Symptom reference data.
//!
//! Symptoms are immutable once seeded. Names are unique in the store and are
//! the vocabulary users type into the symptom checker.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;

/// Broad classification of a symptom.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SymptomCategory {
  #[default]
  Physical,
  Psychological,
  Behavioral,
}

/// A single reported symptom, e.g. "Fever".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Symptom {
  pub id:              Uuid,
  /// Canonical name; unique across the store.
  pub name:            String,
  pub description:     String,
  pub category:        SymptomCategory,
  /// Organ system, e.g. "respiratory" or "neurological".
  pub body_system:     String,
  /// Always warrants a critical risk level when reported.
  pub is_emergency:    bool,
  /// Population prevalence in `[0, 1]`.
  pub prevalence_rate: Option<f64>,
  /// Warning signs that accompany the symptom.
  pub red_flags:       Vec<String>,
}

/// Folded form symptom names are unique under, ignoring case.
///
/// Stores and the knowledge base must agree on it, so both go through here.
pub fn name_key(name: &str) -> String { name.to_lowercase() }

/// Input to [`crate::store::KnowledgeStore::add_symptom`].
#[derive(Debug, Clone)]
pub struct NewSymptom {
  pub name:            String,
  pub description:     String,
  pub category:        SymptomCategory,
  pub body_system:     String,
  pub is_emergency:    bool,
  pub prevalence_rate: Option<f64>,
  pub red_flags:       Vec<String>,
}

impl NewSymptom {
  /// Convenience constructor for a non-emergency physical symptom.
  pub fn new(name: impl Into<String>, body_system: impl Into<String>) -> Self {
    Self {
      name:            name.into(),
      description:     String::new(),
      category:        SymptomCategory::default(),
      body_system:     body_system.into(),
      is_emergency:    false,
      prevalence_rate: None,
      red_flags:       Vec::new(),
    }
  }

  pub fn described(mut self, description: impl Into<String>) -> Self {
    self.description = description.into();
    self
  }

  pub fn emergency(mut self) -> Self {
    self.is_emergency = true;
    self
  }

  pub fn into_symptom(self, id: Uuid) -> Symptom {
    Symptom {
      id,
      name: self.name,
      description: self.description,
      category: self.category,
      body_system: self.body_system,
      is_emergency: self.is_emergency,
      prevalence_rate: self.prevalence_rate,
      red_flags: self.red_flags,
    }
  }
}
