//! Supplementary reference entities: treatments, medications, lab markers,
//! guidelines and drug interactions.
//!
//! Unlike symptoms and diseases these carry a caller-assigned id; the seed
//! builds them in memory and links them before handing them to the store.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;

// ─── Treatments ──────────────────────────────────────────────────────────────

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TreatmentKind {
  Medication,
  Procedure,
  Lifestyle,
  Therapy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Treatment {
  pub id:                    Uuid,
  pub name:                  String,
  pub kind:                  TreatmentKind,
  pub description:           String,
  /// Fraction of patients for whom the treatment works, in `[0, 1]`.
  pub effectiveness_rate:    Option<f64>,
  pub requires_prescription: bool,
  /// "low" | "medium" | "high"
  pub cost_category:         Option<String>,
}

impl Treatment {
  pub fn new(name: impl Into<String>, kind: TreatmentKind) -> Self {
    Self {
      id: Uuid::new_v4(),
      name: name.into(),
      kind,
      description: String::new(),
      effectiveness_rate: None,
      requires_prescription: false,
      cost_category: None,
    }
  }
}

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
pub enum RecommendationLevel {
  Primary,
  Secondary,
  Alternative,
  #[default]
  Standard,
}

/// Edge between a disease and one of its treatments.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiseaseTreatment {
  pub disease_id:           Uuid,
  pub treatment_id:         Uuid,
  pub effectiveness_score:  f64,
  pub recommendation_level: RecommendationLevel,
}

/// A treatment as presented for a particular disease.
#[derive(Debug, Clone, Serialize)]
pub struct TreatmentOption {
  #[serde(flatten)]
  pub treatment:            Treatment,
  pub effectiveness_score:  f64,
  pub recommendation_level: RecommendationLevel,
}

// ─── Medications ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Medication {
  pub id:                      Uuid,
  pub generic_name:            String,
  pub brand_names:             Vec<String>,
  pub drug_class:              String,
  pub mechanism_of_action:     Option<String>,
  pub indications:             Vec<String>,
  pub contraindications:       Vec<String>,
  pub side_effects:            Vec<String>,
  /// FDA letter category: A, B, C, D or X.
  pub pregnancy_category:      Option<String>,
  pub requires_monitoring:     bool,
  pub is_controlled_substance: bool,
}

impl Medication {
  pub fn new(generic_name: impl Into<String>, drug_class: impl Into<String>) -> Self {
    Self {
      id: Uuid::new_v4(),
      generic_name: generic_name.into(),
      brand_names: Vec::new(),
      drug_class: drug_class.into(),
      mechanism_of_action: None,
      indications: Vec::new(),
      contraindications: Vec::new(),
      side_effects: Vec::new(),
      pregnancy_category: None,
      requires_monitoring: false,
      is_controlled_substance: false,
    }
  }
}

/// A recorded interaction between two medications. The pair is unordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrugInteraction {
  pub drug_a_id:        Uuid,
  pub drug_b_id:        Uuid,
  /// "major" | "moderate" | "minor" | "contraindicated"
  pub interaction_type: String,
  /// 1 (negligible) to 5 (life-threatening).
  pub severity:         u8,
  pub clinical_effect:  String,
  pub management:       String,
}

impl DrugInteraction {
  pub fn involves(&self, a: Uuid, b: Uuid) -> bool {
    (self.drug_a_id == a && self.drug_b_id == b)
      || (self.drug_a_id == b && self.drug_b_id == a)
  }
}

// ─── Lab markers ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabMarker {
  pub id:                    Uuid,
  pub name:                  String,
  /// "blood" | "urine" | "measurement" | ...
  pub test_type:             String,
  pub units:                 Option<String>,
  pub normal_range_min:      Option<f64>,
  pub normal_range_max:      Option<f64>,
  /// Human-readable range for markers without numeric bounds.
  pub normal_range_text:     Option<String>,
  pub critical_low:          Option<f64>,
  pub critical_high:         Option<f64>,
  pub clinical_significance: Option<String>,
  pub disease_id:            Option<Uuid>,
}

impl LabMarker {
  pub fn new(name: impl Into<String>, test_type: impl Into<String>) -> Self {
    Self {
      id: Uuid::new_v4(),
      name: name.into(),
      test_type: test_type.into(),
      units: None,
      normal_range_min: None,
      normal_range_max: None,
      normal_range_text: None,
      critical_low: None,
      critical_high: None,
      clinical_significance: None,
      disease_id: None,
    }
  }
}

// ─── Guidelines ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guideline {
  pub id:               Uuid,
  pub title:            String,
  /// Issuing body, e.g. "WHO" or "AHA".
  pub organization:     String,
  pub version:          Option<String>,
  /// "A" | "B" | "C"
  pub evidence_level:   Option<String>,
  /// "diagnosis" | "treatment" | "prevention" | "screening"
  pub guideline_type:   String,
  pub content:          String,
  pub publication_date: Option<NaiveDate>,
  pub is_active:        bool,
}
