//! [`KnowledgeBase`]: the immutable, indexed snapshot every lookup runs on.
//!
//! Loading validates the referential invariants the store is expected to hold
//! (edges never dangle, weights stay in `[0, 1]`, symptom names are unique
//! ignoring case) and fails fast if they don't. After that every operation is
//! total: "not found" is an empty result, never an error.

use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use crate::{
  Error, Result,
  disease::Disease,
  reference::{DrugInteraction, Guideline, LabMarker, Medication, TreatmentOption},
  store::{KnowledgeStore, Snapshot},
  symptom::{Symptom, name_key},
};

/// Default page size for substring searches.
pub const DEFAULT_SEARCH_LIMIT: usize = 10;

/// Read-only view over a [`Snapshot`] with the indexes the matcher needs.
///
/// Share it behind an `Arc`; nothing in here is mutable after construction.
#[derive(Debug)]
pub struct KnowledgeBase {
  snapshot:            Snapshot,
  symptom_index:       HashMap<Uuid, usize>,
  disease_index:       HashMap<Uuid, usize>,
  /// Lowercased symptom name → symptom position.
  symptom_names:       HashMap<String, usize>,
  /// Symptom position → disease positions, in association order.
  diseases_by_symptom: Vec<Vec<usize>>,
  /// Disease position → symptom positions, in association order.
  symptoms_by_disease: Vec<Vec<usize>>,
}

impl KnowledgeBase {
  /// Read a snapshot from `store` and index it.
  ///
  /// Any store failure surfaces as [`Error::StoreUnavailable`]; there is no
  /// partially-loaded knowledge base.
  pub async fn load<S: KnowledgeStore>(store: &S) -> Result<Self> {
    let snapshot = store
      .snapshot()
      .await
      .map_err(|e| Error::StoreUnavailable(Box::new(e)))?;
    let kb = Self::from_snapshot(snapshot)?;
    tracing::info!(
      symptoms = kb.snapshot.symptoms.len(),
      diseases = kb.snapshot.diseases.len(),
      associations = kb.snapshot.associations.len(),
      "knowledge base loaded"
    );
    Ok(kb)
  }

  /// Index an in-memory snapshot.
  pub fn from_snapshot(snapshot: Snapshot) -> Result<Self> {
    let mut symptom_index = HashMap::with_capacity(snapshot.symptoms.len());
    let mut symptom_names = HashMap::with_capacity(snapshot.symptoms.len());
    for (pos, symptom) in snapshot.symptoms.iter().enumerate() {
      symptom_index.insert(symptom.id, pos);
      if symptom_names.insert(name_key(&symptom.name), pos).is_some() {
        return Err(Error::DuplicateName { kind: "symptom", name: symptom.name.clone() });
      }
    }

    let mut disease_index = HashMap::with_capacity(snapshot.diseases.len());
    let mut disease_names = HashSet::with_capacity(snapshot.diseases.len());
    for (pos, disease) in snapshot.diseases.iter().enumerate() {
      disease_index.insert(disease.id, pos);
      if !disease_names.insert(disease.name.as_str()) {
        return Err(Error::DuplicateName { kind: "disease", name: disease.name.clone() });
      }
    }

    let mut diseases_by_symptom = vec![Vec::new(); snapshot.symptoms.len()];
    let mut symptoms_by_disease = vec![Vec::new(); snapshot.diseases.len()];
    for edge in &snapshot.associations {
      if !(0.0..=1.0).contains(&edge.probability_weight) {
        return Err(Error::WeightOutOfRange(edge.probability_weight));
      }
      let s = *symptom_index
        .get(&edge.symptom_id)
        .ok_or(Error::SymptomNotFound(edge.symptom_id))?;
      let d = *disease_index
        .get(&edge.disease_id)
        .ok_or(Error::DiseaseNotFound(edge.disease_id))?;
      diseases_by_symptom[s].push(d);
      symptoms_by_disease[d].push(s);
    }

    let treatment_ids: HashSet<Uuid> = snapshot.treatments.iter().map(|t| t.id).collect();
    for link in &snapshot.treatment_links {
      if !disease_index.contains_key(&link.disease_id) {
        return Err(Error::DiseaseNotFound(link.disease_id));
      }
      if !treatment_ids.contains(&link.treatment_id) {
        return Err(Error::TreatmentNotFound(link.treatment_id));
      }
    }

    let medication_ids: HashSet<Uuid> = snapshot.medications.iter().map(|m| m.id).collect();
    for interaction in &snapshot.drug_interactions {
      for id in [interaction.drug_a_id, interaction.drug_b_id] {
        if !medication_ids.contains(&id) {
          return Err(Error::MedicationNotFound(id));
        }
      }
    }

    Ok(Self {
      snapshot,
      symptom_index,
      disease_index,
      symptom_names,
      diseases_by_symptom,
      symptoms_by_disease,
    })
  }

  // ── Raw access ────────────────────────────────────────────────────────

  pub fn symptoms(&self) -> &[Symptom] { &self.snapshot.symptoms }

  pub fn diseases(&self) -> &[Disease] { &self.snapshot.diseases }

  pub fn medications(&self) -> &[Medication] { &self.snapshot.medications }

  pub fn drug_interactions(&self) -> &[DrugInteraction] {
    &self.snapshot.drug_interactions
  }

  /// Diseases linked to a symptom, in association order.
  pub fn diseases_for_symptom(&self, id: Uuid) -> impl Iterator<Item = &Disease> + '_ {
    self
      .symptom_index
      .get(&id)
      .map(|&pos| self.diseases_by_symptom[pos].as_slice())
      .unwrap_or_default()
      .iter()
      .map(|&d| &self.snapshot.diseases[d])
  }

  /// Symptoms linked to a disease, in association order.
  pub fn symptoms_of_disease(&self, id: Uuid) -> impl Iterator<Item = &Symptom> + '_ {
    self
      .disease_index
      .get(&id)
      .map(|&pos| self.symptoms_by_disease[pos].as_slice())
      .unwrap_or_default()
      .iter()
      .map(|&s| &self.snapshot.symptoms[s])
  }

  // ── Lookup service ────────────────────────────────────────────────────

  /// Case-insensitive substring search over symptom name and description.
  pub fn search_symptoms(&self, query: &str, limit: usize) -> Vec<&Symptom> {
    let needle = query.to_lowercase();
    self
      .snapshot
      .symptoms
      .iter()
      .filter(|s| contains_ci(&s.name, &needle) || contains_ci(&s.description, &needle))
      .take(limit)
      .collect()
  }

  /// Case-insensitive substring search over disease name and description.
  pub fn search_diseases(&self, query: &str, limit: usize) -> Vec<&Disease> {
    let needle = query.to_lowercase();
    self
      .snapshot
      .diseases
      .iter()
      .filter(|d| contains_ci(&d.name, &needle) || contains_ci(&d.description, &needle))
      .take(limit)
      .collect()
  }

  /// Resolve names to symptoms by exact, case-insensitive name.
  ///
  /// Unknown names are dropped. Output follows the first occurrence of each
  /// resolved symptom in `names`; a symptom named twice appears once.
  pub fn resolve_symptom_names<I, N>(&self, names: I) -> Vec<&Symptom>
  where
    I: IntoIterator<Item = N>,
    N: AsRef<str>,
  {
    let mut seen = HashSet::new();
    names
      .into_iter()
      .filter_map(|n| self.symptom_names.get(&name_key(n.as_ref())).copied())
      .filter(|pos| seen.insert(*pos))
      .map(|pos| &self.snapshot.symptoms[pos])
      .collect()
  }

  /// Every symptom flagged `is_emergency`, in store order.
  pub fn emergency_symptoms(&self) -> Vec<&Symptom> {
    self.snapshot.symptoms.iter().filter(|s| s.is_emergency).collect()
  }

  /// Treatments for the first disease whose name contains `disease_name`.
  pub fn treatments_for_disease(&self, disease_name: &str) -> Vec<TreatmentOption> {
    let needle = disease_name.to_lowercase();
    let Some(disease) = self
      .snapshot
      .diseases
      .iter()
      .find(|d| contains_ci(&d.name, &needle))
    else {
      return Vec::new();
    };

    self
      .snapshot
      .treatment_links
      .iter()
      .filter(|link| link.disease_id == disease.id)
      .filter_map(|link| {
        self
          .snapshot
          .treatments
          .iter()
          .find(|t| t.id == link.treatment_id)
          .map(|t| TreatmentOption {
            treatment:            t.clone(),
            effectiveness_score:  link.effectiveness_score,
            recommendation_level: link.recommendation_level,
          })
      })
      .collect()
  }

  /// First medication whose generic name or any brand name contains `name`.
  pub fn medication_info(&self, name: &str) -> Option<&Medication> {
    let needle = name.to_lowercase();
    self.snapshot.medications.iter().find(|m| {
      contains_ci(&m.generic_name, &needle)
        || m.brand_names.iter().any(|b| contains_ci(b, &needle))
    })
  }

  /// Medication whose generic or brand name equals `name`, ignoring case.
  pub fn medication_by_name(&self, name: &str) -> Option<&Medication> {
    self.snapshot.medications.iter().find(|m| {
      m.generic_name.eq_ignore_ascii_case(name)
        || m.brand_names.iter().any(|b| b.eq_ignore_ascii_case(name))
    })
  }

  /// First lab marker whose name contains `name`.
  pub fn lab_marker(&self, name: &str) -> Option<&LabMarker> {
    let needle = name.to_lowercase();
    self.snapshot.lab_markers.iter().find(|m| contains_ci(&m.name, &needle))
  }

  /// Active guidelines whose title contains `topic`, optionally restricted to
  /// organizations containing `organization`.
  pub fn guidelines(&self, topic: &str, organization: Option<&str>) -> Vec<&Guideline> {
    let topic = topic.to_lowercase();
    let organization = organization.map(str::to_lowercase);
    self
      .snapshot
      .guidelines
      .iter()
      .filter(|g| g.is_active && contains_ci(&g.title, &topic))
      .filter(|g| {
        organization
          .as_deref()
          .is_none_or(|org| contains_ci(&g.organization, org))
      })
      .collect()
  }
}

/// `haystack` contains the already-lowercased `needle`, ignoring case.
pub(crate) fn contains_ci(haystack: &str, needle: &str) -> bool {
  haystack.to_lowercase().contains(needle)
}
