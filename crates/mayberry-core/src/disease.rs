//! Disease reference data and the weighted symptom–disease edge.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Severity ────────────────────────────────────────────────────────────────

/// Ordinal severity of a condition.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Default,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SeverityLevel {
  #[default]
  Mild,
  Moderate,
  Severe,
  Critical,
}

// ─── Disease ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Disease {
  pub id:             Uuid,
  /// Canonical name; unique across the store.
  pub name:           String,
  pub icd_10_code:    Option<String>,
  pub description:    String,
  pub severity_level: SeverityLevel,
  pub is_chronic:     bool,
  pub is_contagious:  bool,
  /// Population prevalence in `[0, 1]`.
  pub prevalence:     Option<f64>,
  pub mortality_rate: Option<f64>,
}

/// Input to [`crate::store::KnowledgeStore::add_disease`].
#[derive(Debug, Clone)]
pub struct NewDisease {
  pub name:           String,
  pub icd_10_code:    Option<String>,
  pub description:    String,
  pub severity_level: SeverityLevel,
  pub is_chronic:     bool,
  pub is_contagious:  bool,
  pub prevalence:     Option<f64>,
  pub mortality_rate: Option<f64>,
}

impl NewDisease {
  pub fn new(name: impl Into<String>, severity_level: SeverityLevel) -> Self {
    Self {
      name: name.into(),
      icd_10_code: None,
      description: String::new(),
      severity_level,
      is_chronic: false,
      is_contagious: false,
      prevalence: None,
      mortality_rate: None,
    }
  }

  pub fn into_disease(self, id: Uuid) -> Disease {
    Disease {
      id,
      name: self.name,
      icd_10_code: self.icd_10_code,
      description: self.description,
      severity_level: self.severity_level,
      is_chronic: self.is_chronic,
      is_contagious: self.is_contagious,
      prevalence: self.prevalence,
      mortality_rate: self.mortality_rate,
    }
  }
}

// ─── Association ─────────────────────────────────────────────────────────────

pub const DEFAULT_PROBABILITY_WEIGHT: f64 = 0.5;
pub const DEFAULT_SEVERITY_MODIFIER: f64 = 1.0;

/// A many-to-many edge between a symptom and a disease.
///
/// The weights are stored but scoring only counts presence; they are kept for
/// display and later refinement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SymptomDiseaseAssociation {
  pub symptom_id:         Uuid,
  pub disease_id:         Uuid,
  /// How characteristic the symptom is of the disease, in `[0, 1]`.
  pub probability_weight: f64,
  /// Multiplicative severity adjustment.
  pub severity_modifier:  f64,
}

impl SymptomDiseaseAssociation {
  /// Build an edge, rejecting a weight outside `[0, 1]` (or NaN).
  pub fn new(
    symptom_id: Uuid,
    disease_id: Uuid,
    probability_weight: f64,
    severity_modifier: f64,
  ) -> Result<Self> {
    if !(0.0..=1.0).contains(&probability_weight) {
      return Err(Error::WeightOutOfRange(probability_weight));
    }
    Ok(Self { symptom_id, disease_id, probability_weight, severity_modifier })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn association_rejects_out_of_range_weight() {
    let (s, d) = (Uuid::new_v4(), Uuid::new_v4());
    assert!(SymptomDiseaseAssociation::new(s, d, 1.5, 1.0).is_err());
    assert!(SymptomDiseaseAssociation::new(s, d, -0.1, 1.0).is_err());
    assert!(SymptomDiseaseAssociation::new(s, d, f64::NAN, 1.0).is_err());
    assert!(SymptomDiseaseAssociation::new(s, d, 0.0, 1.0).is_ok());
    assert!(SymptomDiseaseAssociation::new(s, d, 1.0, 1.0).is_ok());
  }

  #[test]
  fn severity_parses_and_orders() {
    assert_eq!("severe".parse::<SeverityLevel>().unwrap(), SeverityLevel::Severe);
    assert_eq!(SeverityLevel::Critical.to_string(), "critical");
    assert!(SeverityLevel::Mild < SeverityLevel::Critical);
  }
}
