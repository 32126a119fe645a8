//! Symptom-to-disease matching.
//!
//! Scoring is plain set overlap: the fraction of the caller's symptom names
//! that a disease is associated with. Association weights are not consulted.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{disease::Disease, knowledge::KnowledgeBase};

/// A candidate disease for a set of reported symptoms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
  #[serde(flatten)]
  pub disease:           Disease,
  /// `matching_symptoms / total_symptoms`, always in `[0, 1]`.
  pub match_score:       f64,
  pub matching_symptoms: usize,
  /// Distinct names in the caller's input, resolved or not.
  pub total_symptoms:    usize,
}

impl KnowledgeBase {
  /// Rank the diseases associated with any of `symptom_names`.
  ///
  /// Names are resolved ignoring case, but a disease only counts an input name
  /// as matching when it equals one of the disease's symptom names exactly.
  /// The denominator is the number of distinct input names, so unrecognised
  /// names lower every score.
  ///
  /// Ties keep their first-seen order: resolved symptoms in input order, and
  /// for each symptom its diseases in association order.
  pub fn match_diseases<N: AsRef<str>>(&self, symptom_names: &[N]) -> Vec<MatchResult> {
    let inputs: HashSet<&str> = symptom_names.iter().map(AsRef::as_ref).collect();
    let total_symptoms = inputs.len();

    let resolved = self.resolve_symptom_names(symptom_names);
    if resolved.is_empty() {
      tracing::debug!(total_symptoms, "no input symptom resolved");
      return Vec::new();
    }

    let mut seen = HashSet::new();
    let candidates: Vec<&Disease> = resolved
      .iter()
      .flat_map(|symptom| self.diseases_for_symptom(symptom.id))
      .filter(|disease| seen.insert(disease.id))
      .collect();

    let mut results: Vec<MatchResult> = candidates
      .into_iter()
      .map(|disease| {
        let matched: HashSet<&str> = self
          .symptoms_of_disease(disease.id)
          .map(|s| s.name.as_str())
          .filter(|name| inputs.contains(name))
          .collect();
        let matching_symptoms = matched.len();
        let match_score = if total_symptoms == 0 {
          0.0
        } else {
          matching_symptoms as f64 / total_symptoms as f64
        };
        MatchResult {
          disease: disease.clone(),
          match_score,
          matching_symptoms,
          total_symptoms,
        }
      })
      .collect();

    // `sort_by` is stable, which keeps first-seen order among ties.
    results.sort_by(|a, b| b.match_score.total_cmp(&a.match_score));

    tracing::debug!(
      resolved = resolved.len(),
      total_symptoms,
      candidates = results.len(),
      "matched diseases"
    );
    results
  }
}
