//! Risk classification over match results.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::{knowledge::KnowledgeBase, matcher::MatchResult};

/// Scores strictly above this classify as [`RiskLevel::High`].
pub const HIGH_RISK_THRESHOLD: f64 = 0.7;
/// Scores strictly above this classify as [`RiskLevel::Medium`].
pub const MEDIUM_RISK_THRESHOLD: f64 = 0.4;

/// Ordinal risk; `Ord` follows severity.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Default,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RiskLevel {
  #[default]
  Low,
  Medium,
  High,
  Critical,
}

impl RiskLevel {
  /// The fixed advice attached to each level.
  pub fn recommendation(self) -> &'static str {
    match self {
      Self::Critical => "Seek immediate emergency medical attention.",
      Self::High => "Consult with a healthcare provider as soon as possible.",
      Self::Medium => "Consider scheduling an appointment with your doctor.",
      Self::Low => "Monitor symptoms and seek medical advice if they worsen.",
    }
  }
}

/// Output of [`classify`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
  pub risk_level:             RiskLevel,
  pub has_emergency_symptoms: bool,
  pub recommendations:        Vec<String>,
}

impl RiskAssessment {
  pub fn new(risk_level: RiskLevel, has_emergency_symptoms: bool) -> Self {
    Self {
      risk_level,
      has_emergency_symptoms,
      recommendations: vec![risk_level.recommendation().to_owned()],
    }
  }
}

/// Classify a result set. First rule that applies wins:
///
/// 1. an input name is (case-sensitively) an emergency symptom → critical;
/// 2. best score above [`HIGH_RISK_THRESHOLD`] → high;
/// 3. best score above [`MEDIUM_RISK_THRESHOLD`] → medium;
/// 4. otherwise low.
pub fn classify<N: AsRef<str>>(
  match_results: &[MatchResult],
  input_symptom_names: &[N],
  emergency_names: &HashSet<&str>,
) -> RiskAssessment {
  let has_emergency_symptoms = input_symptom_names
    .iter()
    .any(|n| emergency_names.contains(n.as_ref()));

  let best = match_results
    .iter()
    .map(|r| r.match_score)
    .fold(None, |acc: Option<f64>, s| Some(acc.map_or(s, |a| a.max(s))));

  let risk_level = match best {
    _ if has_emergency_symptoms => RiskLevel::Critical,
    Some(s) if s > HIGH_RISK_THRESHOLD => RiskLevel::High,
    Some(s) if s > MEDIUM_RISK_THRESHOLD => RiskLevel::Medium,
    _ => RiskLevel::Low,
  };

  RiskAssessment::new(risk_level, has_emergency_symptoms)
}

impl KnowledgeBase {
  /// [`classify`] against this knowledge base's emergency symptoms.
  pub fn classify_risk<N: AsRef<str>>(
    &self,
    match_results: &[MatchResult],
    input_symptom_names: &[N],
  ) -> RiskAssessment {
    let emergency_names: HashSet<&str> = self
      .emergency_symptoms()
      .into_iter()
      .map(|s| s.name.as_str())
      .collect();
    classify(match_results, input_symptom_names, &emergency_names)
  }
}

#[cfg(test)]
mod tests {
  use crate::{disease::SeverityLevel, fixture};

  use super::*;

  fn result_with_score(score: f64) -> MatchResult {
    MatchResult {
      disease:           crate::disease::NewDisease::new("Test", SeverityLevel::Mild)
        .into_disease(uuid::Uuid::nil()),
      match_score:       score,
      matching_symptoms: 0,
      total_symptoms:    0,
    }
  }

  #[test]
  fn thresholds_are_strict() {
    let none: HashSet<&str> = HashSet::new();
    let level = |s: f64| classify(&[result_with_score(s)], &["x"], &none).risk_level;
    assert_eq!(level(0.71), RiskLevel::High);
    assert_eq!(level(0.7), RiskLevel::Medium);
    assert_eq!(level(0.41), RiskLevel::Medium);
    assert_eq!(level(0.4), RiskLevel::Low);
    assert_eq!(level(0.0), RiskLevel::Low);
  }

  #[test]
  fn best_score_governs() {
    let none: HashSet<&str> = HashSet::new();
    let results = [result_with_score(0.2), result_with_score(0.9), result_with_score(0.5)];
    assert_eq!(classify(&results, &["x"], &none).risk_level, RiskLevel::High);
  }

  #[test]
  fn no_results_is_low() {
    let none: HashSet<&str> = HashSet::new();
    let assessment = classify(&[], &["x"], &none);
    assert_eq!(assessment.risk_level, RiskLevel::Low);
    assert_eq!(
      assessment.recommendations,
      ["Monitor symptoms and seek medical advice if they worsen."]
    );
  }

  #[test]
  fn emergency_symptom_is_critical_without_matches() {
    let kb = fixture::knowledge_base();
    let assessment = kb.classify_risk(&[], &["Chest Pain"]);
    assert_eq!(assessment.risk_level, RiskLevel::Critical);
    assert!(assessment.has_emergency_symptoms);
    assert_eq!(
      assessment.recommendations,
      ["Seek immediate emergency medical attention."]
    );
  }

  #[test]
  fn emergency_membership_is_case_sensitive() {
    let kb = fixture::knowledge_base();
    let assessment = kb.classify_risk(&[], &["chest pain"]);
    assert_eq!(assessment.risk_level, RiskLevel::Low);
    assert!(!assessment.has_emergency_symptoms);
  }

  #[test]
  fn classification_is_deterministic() {
    let kb = fixture::knowledge_base();
    let input = ["Fever", "Cough", "Fatigue"];
    let results = kb.match_diseases(&input);
    let first = kb.classify_risk(&results, &input);
    for _ in 0..10 {
      assert_eq!(kb.classify_risk(&results, &input), first);
    }
    assert_eq!(first.risk_level, RiskLevel::High);
  }

  #[test]
  fn levels_order_by_severity() {
    assert!(RiskLevel::Critical > RiskLevel::High);
    assert!(RiskLevel::High > RiskLevel::Medium);
    assert!(RiskLevel::Medium > RiskLevel::Low);
    assert_eq!(RiskLevel::Medium.to_string(), "medium");
  }
}
