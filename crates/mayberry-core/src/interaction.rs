//! Pairwise drug interaction checks.

use serde::Serialize;

use crate::{knowledge::KnowledgeBase, reference::Medication};

/// A recorded interaction between two of the requested medications.
#[derive(Debug, Clone, Serialize)]
pub struct InteractionWarning {
  pub drug_a:           String,
  pub drug_b:           String,
  pub interaction_type: String,
  pub severity:         u8,
  pub clinical_effect:  String,
  pub management:       String,
}

/// Result of [`KnowledgeBase::check_drug_interactions`].
#[derive(Debug, Clone, Serialize)]
pub struct InteractionReport {
  /// Generic names of the medications that resolved.
  pub resolved:     Vec<String>,
  /// Input names that matched no medication.
  pub unresolved:   Vec<String>,
  /// Most severe first.
  pub interactions: Vec<InteractionWarning>,
}

impl KnowledgeBase {
  /// Look up every recorded interaction among `names`.
  ///
  /// Names match a generic or brand name exactly, ignoring case. A drug named
  /// twice (e.g. by generic and brand name) is checked once.
  pub fn check_drug_interactions<N: AsRef<str>>(&self, names: &[N]) -> InteractionReport {
    let mut meds: Vec<&Medication> = Vec::new();
    let mut unresolved = Vec::new();
    for name in names {
      match self.medication_by_name(name.as_ref()) {
        Some(m) if !meds.iter().any(|seen| seen.id == m.id) => meds.push(m),
        Some(_) => {}
        None => unresolved.push(name.as_ref().to_owned()),
      }
    }

    let mut interactions = Vec::new();
    for (i, a) in meds.iter().enumerate() {
      for b in &meds[i + 1..] {
        interactions.extend(
          self
            .drug_interactions()
            .iter()
            .filter(|x| x.involves(a.id, b.id))
            .map(|x| InteractionWarning {
              drug_a:           a.generic_name.clone(),
              drug_b:           b.generic_name.clone(),
              interaction_type: x.interaction_type.clone(),
              severity:         x.severity,
              clinical_effect:  x.clinical_effect.clone(),
              management:       x.management.clone(),
            }),
        );
      }
    }
    interactions.sort_by(|a, b| b.severity.cmp(&a.severity));

    InteractionReport {
      resolved: meds.iter().map(|m| m.generic_name.clone()).collect(),
      unresolved,
      interactions,
    }
  }
}

#[cfg(test)]
mod tests {
  use crate::fixture;

  #[test]
  fn brand_and_generic_names_resolve_to_one_interaction() {
    let kb = fixture::knowledge_base();
    let report = kb.check_drug_interactions(&["tylenol", "Ibuprofen", "Zzyx"]);
    assert_eq!(report.resolved, ["Acetaminophen", "Ibuprofen"]);
    assert_eq!(report.unresolved, ["Zzyx"]);
    assert_eq!(report.interactions.len(), 1);
    assert_eq!(report.interactions[0].severity, 3);
  }

  #[test]
  fn same_drug_twice_has_no_interaction() {
    let kb = fixture::knowledge_base();
    let report = kb.check_drug_interactions(&["Acetaminophen", "Panadol"]);
    assert_eq!(report.resolved, ["Acetaminophen"]);
    assert!(report.interactions.is_empty());
  }
}
