//! Structured symptom analysis: match, classify, truncate.

use serde::{Deserialize, Serialize};

use crate::{knowledge::KnowledgeBase, matcher::MatchResult, risk::RiskLevel};

/// How many candidates an analysis reports by default.
pub const DEFAULT_TOP_MATCHES: usize = 5;

/// Demographic context supplied with a symptom list.
///
/// Carried through and echoed back; it does not affect scoring.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Demographics {
  pub age:    Option<u32>,
  pub gender: Option<String>,
}

/// Full result of [`KnowledgeBase::analyze_symptoms`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymptomAnalysis {
  pub symptoms:               Vec<String>,
  /// Best candidates first, at most `top_matches` of them.
  pub possible_diseases:      Vec<MatchResult>,
  pub risk_level:             RiskLevel,
  pub has_emergency_symptoms: bool,
  pub recommendations:        Vec<String>,
  pub demographic_factors:    Demographics,
}

impl KnowledgeBase {
  /// Match `symptoms`, classify the full candidate list, then keep the best
  /// `top_matches` candidates for the report.
  pub fn analyze_symptoms(
    &self,
    symptoms: &[String],
    demographics: Demographics,
    top_matches: usize,
  ) -> SymptomAnalysis {
    let mut matches = self.match_diseases(symptoms);
    let risk = self.classify_risk(&matches, symptoms);
    matches.truncate(top_matches);

    tracing::debug!(
      symptoms = symptoms.len(),
      risk_level = %risk.risk_level,
      emergency = risk.has_emergency_symptoms,
      "symptom analysis complete"
    );

    SymptomAnalysis {
      symptoms:               symptoms.to_vec(),
      possible_diseases:      matches,
      risk_level:             risk.risk_level,
      has_emergency_symptoms: risk.has_emergency_symptoms,
      recommendations:        risk.recommendations,
      demographic_factors:    demographics,
    }
  }
}
