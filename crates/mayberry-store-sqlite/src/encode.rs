//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! UUIDs are stored as hyphenated lowercase strings. Ordinal enums are stored
//! as their lowercase names. List-valued fields are compact JSON arrays and
//! dates are ISO 8601 (`YYYY-MM-DD`).

use std::str::FromStr;

use chrono::NaiveDate;
use mayberry_core::{
  disease::{Disease, SymptomDiseaseAssociation},
  reference::{DiseaseTreatment, DrugInteraction, Guideline, LabMarker, Medication, Treatment},
  symptom::Symptom,
};
use rusqlite::Row;
use uuid::Uuid;

use crate::{Error, Result};

// ─── Scalars ─────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT)
    .map_err(|e| Error::Decode(format!("bad date {s:?}: {e}")))
}

/// Parse an enum stored by its `strum` name.
pub fn decode_enum<T: FromStr>(what: &str, s: &str) -> Result<T> {
  s.parse()
    .map_err(|_| Error::Decode(format!("unknown {what}: {s:?}")))
}

pub fn encode_list(items: &[String]) -> Result<String> {
  Ok(serde_json::to_string(items)?)
}

pub fn decode_list(s: &str) -> Result<Vec<String>> { Ok(serde_json::from_str(s)?) }

/// A medication's list-valued columns, encoded ahead of the insert.
pub struct MedicationLists {
  pub brand_names:       String,
  pub indications:       String,
  pub contraindications: String,
  pub side_effects:      String,
}

impl MedicationLists {
  pub fn encode(m: &Medication) -> Result<Self> {
    Ok(Self {
      brand_names:       encode_list(&m.brand_names)?,
      indications:       encode_list(&m.indications)?,
      contraindications: encode_list(&m.contraindications)?,
      side_effects:      encode_list(&m.side_effects)?,
    })
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `symptoms` row.
pub struct RawSymptom {
  pub symptom_id:      String,
  pub name:            String,
  pub description:     String,
  pub category:        String,
  pub body_system:     String,
  pub is_emergency:    bool,
  pub prevalence_rate: Option<f64>,
  pub red_flags:       String,
}

impl RawSymptom {
  pub const SELECT: &'static str = "SELECT symptom_id, name, description, category, body_system,
                                   is_emergency, prevalence_rate, red_flags
                            FROM symptoms ORDER BY rowid";

  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      symptom_id:      row.get(0)?,
      name:            row.get(1)?,
      description:     row.get(2)?,
      category:        row.get(3)?,
      body_system:     row.get(4)?,
      is_emergency:    row.get(5)?,
      prevalence_rate: row.get(6)?,
      red_flags:       row.get(7)?,
    })
  }

  pub fn into_symptom(self) -> Result<Symptom> {
    Ok(Symptom {
      id:              decode_uuid(&self.symptom_id)?,
      name:            self.name,
      description:     self.description,
      category:        decode_enum("symptom category", &self.category)?,
      body_system:     self.body_system,
      is_emergency:    self.is_emergency,
      prevalence_rate: self.prevalence_rate,
      red_flags:       decode_list(&self.red_flags)?,
    })
  }
}

/// Raw values read directly from a `diseases` row.
pub struct RawDisease {
  pub disease_id:     String,
  pub name:           String,
  pub icd_10_code:    Option<String>,
  pub description:    String,
  pub severity_level: String,
  pub is_chronic:     bool,
  pub is_contagious:  bool,
  pub prevalence:     Option<f64>,
  pub mortality_rate: Option<f64>,
}

impl RawDisease {
  pub const SELECT: &'static str = "SELECT disease_id, name, icd_10_code, description, severity_level,
                                   is_chronic, is_contagious, prevalence, mortality_rate
                            FROM diseases ORDER BY rowid";

  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      disease_id:     row.get(0)?,
      name:           row.get(1)?,
      icd_10_code:    row.get(2)?,
      description:    row.get(3)?,
      severity_level: row.get(4)?,
      is_chronic:     row.get(5)?,
      is_contagious:  row.get(6)?,
      prevalence:     row.get(7)?,
      mortality_rate: row.get(8)?,
    })
  }

  pub fn into_disease(self) -> Result<Disease> {
    Ok(Disease {
      id:             decode_uuid(&self.disease_id)?,
      name:           self.name,
      icd_10_code:    self.icd_10_code,
      description:    self.description,
      severity_level: decode_enum("severity level", &self.severity_level)?,
      is_chronic:     self.is_chronic,
      is_contagious:  self.is_contagious,
      prevalence:     self.prevalence,
      mortality_rate: self.mortality_rate,
    })
  }
}

/// Raw values read directly from a `symptom_disease_mapping` row.
pub struct RawAssociation {
  pub symptom_id:         String,
  pub disease_id:         String,
  pub probability_weight: f64,
  pub severity_modifier:  f64,
}

impl RawAssociation {
  pub const SELECT: &'static str = "SELECT symptom_id, disease_id, probability_weight, severity_modifier
                            FROM symptom_disease_mapping ORDER BY rowid";

  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      symptom_id:         row.get(0)?,
      disease_id:         row.get(1)?,
      probability_weight: row.get(2)?,
      severity_modifier:  row.get(3)?,
    })
  }

  pub fn into_association(self) -> Result<SymptomDiseaseAssociation> {
    Ok(SymptomDiseaseAssociation::new(
      decode_uuid(&self.symptom_id)?,
      decode_uuid(&self.disease_id)?,
      self.probability_weight,
      self.severity_modifier,
    )?)
  }
}

/// Raw values read directly from a `treatments` row.
pub struct RawTreatment {
  pub treatment_id:          String,
  pub name:                  String,
  pub kind:                  String,
  pub description:           String,
  pub effectiveness_rate:    Option<f64>,
  pub requires_prescription: bool,
  pub cost_category:         Option<String>,
}

impl RawTreatment {
  pub const SELECT: &'static str = "SELECT treatment_id, name, kind, description, effectiveness_rate,
                                   requires_prescription, cost_category
                            FROM treatments ORDER BY rowid";

  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      treatment_id:          row.get(0)?,
      name:                  row.get(1)?,
      kind:                  row.get(2)?,
      description:           row.get(3)?,
      effectiveness_rate:    row.get(4)?,
      requires_prescription: row.get(5)?,
      cost_category:         row.get(6)?,
    })
  }

  pub fn into_treatment(self) -> Result<Treatment> {
    Ok(Treatment {
      id:                    decode_uuid(&self.treatment_id)?,
      name:                  self.name,
      kind:                  decode_enum("treatment kind", &self.kind)?,
      description:           self.description,
      effectiveness_rate:    self.effectiveness_rate,
      requires_prescription: self.requires_prescription,
      cost_category:         self.cost_category,
    })
  }
}

/// Raw values read directly from a `disease_treatment_mapping` row.
pub struct RawTreatmentLink {
  pub disease_id:           String,
  pub treatment_id:         String,
  pub effectiveness_score:  f64,
  pub recommendation_level: String,
}

impl RawTreatmentLink {
  pub const SELECT: &'static str = "SELECT disease_id, treatment_id, effectiveness_score, recommendation_level
                            FROM disease_treatment_mapping ORDER BY rowid";

  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      disease_id:           row.get(0)?,
      treatment_id:         row.get(1)?,
      effectiveness_score:  row.get(2)?,
      recommendation_level: row.get(3)?,
    })
  }

  pub fn into_link(self) -> Result<DiseaseTreatment> {
    Ok(DiseaseTreatment {
      disease_id:           decode_uuid(&self.disease_id)?,
      treatment_id:         decode_uuid(&self.treatment_id)?,
      effectiveness_score:  self.effectiveness_score,
      recommendation_level: decode_enum("recommendation level", &self.recommendation_level)?,
    })
  }
}

/// Raw values read directly from a `medications` row.
pub struct RawMedication {
  pub medication_id:           String,
  pub generic_name:            String,
  pub brand_names:             String,
  pub drug_class:              String,
  pub mechanism_of_action:     Option<String>,
  pub indications:             String,
  pub contraindications:       String,
  pub side_effects:            String,
  pub pregnancy_category:      Option<String>,
  pub requires_monitoring:     bool,
  pub is_controlled_substance: bool,
}

impl RawMedication {
  pub const SELECT: &'static str = "SELECT medication_id, generic_name, brand_names, drug_class,
                                   mechanism_of_action, indications, contraindications,
                                   side_effects, pregnancy_category, requires_monitoring,
                                   is_controlled_substance
                            FROM medications ORDER BY rowid";

  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      medication_id:           row.get(0)?,
      generic_name:            row.get(1)?,
      brand_names:             row.get(2)?,
      drug_class:              row.get(3)?,
      mechanism_of_action:     row.get(4)?,
      indications:             row.get(5)?,
      contraindications:       row.get(6)?,
      side_effects:            row.get(7)?,
      pregnancy_category:      row.get(8)?,
      requires_monitoring:     row.get(9)?,
      is_controlled_substance: row.get(10)?,
    })
  }

  pub fn into_medication(self) -> Result<Medication> {
    Ok(Medication {
      id:                      decode_uuid(&self.medication_id)?,
      generic_name:            self.generic_name,
      brand_names:             decode_list(&self.brand_names)?,
      drug_class:              self.drug_class,
      mechanism_of_action:     self.mechanism_of_action,
      indications:             decode_list(&self.indications)?,
      contraindications:       decode_list(&self.contraindications)?,
      side_effects:            decode_list(&self.side_effects)?,
      pregnancy_category:      self.pregnancy_category,
      requires_monitoring:     self.requires_monitoring,
      is_controlled_substance: self.is_controlled_substance,
    })
  }
}

/// Raw values read directly from a `drug_interactions` row.
pub struct RawInteraction {
  pub drug_a_id:        String,
  pub drug_b_id:        String,
  pub interaction_type: String,
  pub severity:         i64,
  pub clinical_effect:  String,
  pub management:       String,
}

impl RawInteraction {
  pub const SELECT: &'static str = "SELECT drug_a_id, drug_b_id, interaction_type, severity,
                                   clinical_effect, management
                            FROM drug_interactions ORDER BY rowid";

  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      drug_a_id:        row.get(0)?,
      drug_b_id:        row.get(1)?,
      interaction_type: row.get(2)?,
      severity:         row.get(3)?,
      clinical_effect:  row.get(4)?,
      management:       row.get(5)?,
    })
  }

  pub fn into_interaction(self) -> Result<DrugInteraction> {
    let severity = u8::try_from(self.severity)
      .map_err(|_| Error::Decode(format!("interaction severity {}", self.severity)))?;
    Ok(DrugInteraction {
      drug_a_id: decode_uuid(&self.drug_a_id)?,
      drug_b_id: decode_uuid(&self.drug_b_id)?,
      interaction_type: self.interaction_type,
      severity,
      clinical_effect: self.clinical_effect,
      management: self.management,
    })
  }
}

/// Raw values read directly from a `lab_markers` row.
pub struct RawLabMarker {
  pub marker_id:             String,
  pub name:                  String,
  pub test_type:             String,
  pub units:                 Option<String>,
  pub normal_range_min:      Option<f64>,
  pub normal_range_max:      Option<f64>,
  pub normal_range_text:     Option<String>,
  pub critical_low:          Option<f64>,
  pub critical_high:         Option<f64>,
  pub clinical_significance: Option<String>,
  pub disease_id:            Option<String>,
}

impl RawLabMarker {
  pub const SELECT: &'static str = "SELECT marker_id, name, test_type, units, normal_range_min,
                                   normal_range_max, normal_range_text, critical_low,
                                   critical_high, clinical_significance, disease_id
                            FROM lab_markers ORDER BY rowid";

  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      marker_id:             row.get(0)?,
      name:                  row.get(1)?,
      test_type:             row.get(2)?,
      units:                 row.get(3)?,
      normal_range_min:      row.get(4)?,
      normal_range_max:      row.get(5)?,
      normal_range_text:     row.get(6)?,
      critical_low:          row.get(7)?,
      critical_high:         row.get(8)?,
      clinical_significance: row.get(9)?,
      disease_id:            row.get(10)?,
    })
  }

  pub fn into_marker(self) -> Result<LabMarker> {
    Ok(LabMarker {
      id:                    decode_uuid(&self.marker_id)?,
      name:                  self.name,
      test_type:             self.test_type,
      units:                 self.units,
      normal_range_min:      self.normal_range_min,
      normal_range_max:      self.normal_range_max,
      normal_range_text:     self.normal_range_text,
      critical_low:          self.critical_low,
      critical_high:         self.critical_high,
      clinical_significance: self.clinical_significance,
      disease_id:            self.disease_id.as_deref().map(decode_uuid).transpose()?,
    })
  }
}

/// Raw values read directly from a `medical_guidelines` row.
pub struct RawGuideline {
  pub guideline_id:     String,
  pub title:            String,
  pub organization:     String,
  pub version:          Option<String>,
  pub evidence_level:   Option<String>,
  pub guideline_type:   String,
  pub content:          String,
  pub publication_date: Option<String>,
  pub is_active:        bool,
}

impl RawGuideline {
  pub const SELECT: &'static str = "SELECT guideline_id, title, organization, version, evidence_level,
                                   guideline_type, content, publication_date, is_active
                            FROM medical_guidelines ORDER BY rowid";

  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      guideline_id:     row.get(0)?,
      title:            row.get(1)?,
      organization:     row.get(2)?,
      version:          row.get(3)?,
      evidence_level:   row.get(4)?,
      guideline_type:   row.get(5)?,
      content:          row.get(6)?,
      publication_date: row.get(7)?,
      is_active:        row.get(8)?,
    })
  }

  pub fn into_guideline(self) -> Result<Guideline> {
    Ok(Guideline {
      id:               decode_uuid(&self.guideline_id)?,
      title:            self.title,
      organization:     self.organization,
      version:          self.version,
      evidence_level:   self.evidence_level,
      guideline_type:   self.guideline_type,
      content:          self.content,
      publication_date: self.publication_date.as_deref().map(decode_date).transpose()?,
      is_active:        self.is_active,
    })
  }
}

#[cfg(test)]
mod tests {
  use mayberry_core::{disease::SeverityLevel, symptom::SymptomCategory};

  use super::*;

  #[test]
  fn enums_decode_from_their_stored_names() {
    let s: SeverityLevel = decode_enum("severity level", "critical").unwrap();
    assert_eq!(s, SeverityLevel::Critical);
    let c: SymptomCategory = decode_enum("symptom category", "psychological").unwrap();
    assert_eq!(c, SymptomCategory::Psychological);
    assert!(matches!(
      decode_enum::<SeverityLevel>("severity level", "apocalyptic"),
      Err(Error::Decode(_))
    ));
  }

  #[test]
  fn dates_use_iso_format() {
    let d = NaiveDate::from_ymd_opt(2020, 4, 1).unwrap();
    assert_eq!(encode_date(d), "2020-04-01");
    assert_eq!(decode_date("2020-04-01").unwrap(), d);
    assert!(decode_date("01/04/2020").is_err());
  }
}
