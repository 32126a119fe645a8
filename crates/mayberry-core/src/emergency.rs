//! Emergency keyword overlay for free-text input.
//!
//! Runs independently of the matcher. On the free-text path its level is
//! merged with the classifier's through [`EmergencyLevel::escalate`].

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::risk::RiskLevel;

/// Phrases that flag a message as an emergency.
pub const EMERGENCY_KEYWORDS: &[&str] = &[
  "chest pain",
  "heart attack",
  "stroke",
  "difficulty breathing",
  "shortness of breath",
  "can't breathe",
  "unconscious",
  "severe bleeding",
  "seizure",
  "overdose",
  "suicidal",
  "emergency",
  "urgent",
  "critical",
];

/// Any of these in a flagged message makes it critical.
const CRITICAL_MARKERS: &[&str] = &["severe", "critical", "emergency", "urgent"];

/// Any of these in a flagged message makes it at least high.
const HIGH_MARKERS: &[&str] = &["chest pain", "difficulty breathing", "stroke"];

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
pub enum EmergencyLevel {
  #[default]
  None,
  Medium,
  High,
  Critical,
}

impl EmergencyLevel {
  /// The matching risk level, or `None` when nothing was detected.
  pub fn as_risk(self) -> Option<RiskLevel> {
    match self {
      Self::None => None,
      Self::Medium => Some(RiskLevel::Medium),
      Self::High => Some(RiskLevel::High),
      Self::Critical => Some(RiskLevel::Critical),
    }
  }

  /// The higher of `risk` and this level.
  pub fn escalate(self, risk: RiskLevel) -> RiskLevel {
    self.as_risk().map_or(risk, |own| own.max(risk))
  }
}

/// Result of scanning one message.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EmergencyAssessment {
  pub emergency_detected:        bool,
  pub emergency_level:           EmergencyLevel,
  /// Keywords found in the text, in [`EMERGENCY_KEYWORDS`] order.
  pub keywords:                  Vec<String>,
  pub immediate_action_required: bool,
}

/// Scan `text` for emergency keywords, ignoring case.
pub fn detect_emergency(text: &str) -> EmergencyAssessment {
  let lowered = text.to_lowercase();
  let keywords: Vec<String> = EMERGENCY_KEYWORDS
    .iter()
    .filter(|k| lowered.contains(*k))
    .map(|k| (*k).to_owned())
    .collect();

  if keywords.is_empty() {
    return EmergencyAssessment::default();
  }

  let emergency_level = if CRITICAL_MARKERS.iter().any(|m| lowered.contains(m)) {
    EmergencyLevel::Critical
  } else if HIGH_MARKERS.iter().any(|m| lowered.contains(m)) {
    EmergencyLevel::High
  } else {
    EmergencyLevel::Medium
  };

  tracing::info!(level = %emergency_level, ?keywords, "emergency keywords detected");

  EmergencyAssessment {
    emergency_detected: true,
    emergency_level,
    keywords,
    immediate_action_required: matches!(
      emergency_level,
      EmergencyLevel::Critical | EmergencyLevel::High
    ),
  }
}

/// What to do right now, for messages that need immediate action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyResponse {
  pub message: String,
  pub steps:   Vec<String>,
}

impl EmergencyResponse {
  /// Guidance for `assessment`, or `None` if no immediate action is needed.
  pub fn for_assessment(assessment: &EmergencyAssessment) -> Option<Self> {
    if !assessment.immediate_action_required {
      return None;
    }
    let message = match assessment.emergency_level {
      EmergencyLevel::Critical => {
        "This may be a medical emergency. Call your local emergency number now."
      }
      _ => "Your symptoms may need urgent care. Contact a healthcare provider immediately.",
    };
    Some(Self {
      message: message.to_owned(),
      steps:   vec![
        "Call emergency services (e.g. 911) or go to the nearest emergency room.".into(),
        "Do not drive yourself if you feel faint, confused or short of breath.".into(),
        "Stay with someone who can help until care arrives.".into(),
      ],
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn severe_chest_pain_is_critical() {
    let a = detect_emergency("I have severe chest pain");
    assert!(a.emergency_detected);
    assert_eq!(a.emergency_level, EmergencyLevel::Critical);
    assert!(a.immediate_action_required);
    assert_eq!(a.keywords, ["chest pain"]);
  }

  #[test]
  fn chest_pain_alone_is_high() {
    let a = detect_emergency("Sudden CHEST PAIN after running");
    assert_eq!(a.emergency_level, EmergencyLevel::High);
    assert!(a.immediate_action_required);
  }

  #[test]
  fn other_keywords_are_medium() {
    let a = detect_emergency("my friend had a seizure yesterday");
    assert!(a.emergency_detected);
    assert_eq!(a.emergency_level, EmergencyLevel::Medium);
    assert!(!a.immediate_action_required);
  }

  #[test]
  fn urgent_is_both_keyword_and_critical_marker() {
    let a = detect_emergency("this is urgent");
    assert_eq!(a.emergency_level, EmergencyLevel::Critical);
  }

  #[test]
  fn severity_word_alone_does_not_trigger() {
    let a = detect_emergency("I have a severe headache");
    assert!(!a.emergency_detected);
    assert_eq!(a.emergency_level, EmergencyLevel::None);
    assert!(a.keywords.is_empty());
  }

  #[test]
  fn escalate_takes_the_higher_level() {
    assert_eq!(EmergencyLevel::None.escalate(RiskLevel::Medium), RiskLevel::Medium);
    assert_eq!(EmergencyLevel::High.escalate(RiskLevel::Low), RiskLevel::High);
    assert_eq!(EmergencyLevel::Medium.escalate(RiskLevel::Critical), RiskLevel::Critical);
  }

  #[test]
  fn response_only_when_action_required() {
    assert!(EmergencyResponse::for_assessment(&detect_emergency("seizure")).is_none());
    let response =
      EmergencyResponse::for_assessment(&detect_emergency("stroke symptoms")).unwrap();
    assert!(!response.steps.is_empty());
  }
}
