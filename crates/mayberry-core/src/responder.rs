//! Free-text responder: the chat-facing path through the knowledge base.
//!
//! A message is scanned for emergency keywords and for symptom and medication
//! names. Mentioned symptoms go through the regular analysis; the overlay's
//! level is merged on top. Nothing here is random: the same message against
//! the same knowledge base and memory always yields the same reply.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  analysis::{DEFAULT_TOP_MATCHES, Demographics},
  emergency::{EmergencyAssessment, EmergencyResponse, detect_emergency},
  knowledge::KnowledgeBase,
  matcher::MatchResult,
  memory::{MedicalMemory, MemoryEntry, MemoryKind},
  risk::RiskLevel,
};

/// Confidence reported when the knowledge base produced no candidate.
pub const DEFAULT_CONFIDENCE: f64 = 0.7;

const GENERAL_ADVICE: &str = "Consult a healthcare professional for personalized advice.";

const DISCLAIMER: &str = "This information is not a substitute for professional medical advice.";

/// Replies used when the message mentions nothing the knowledge base knows.
/// `{}` is replaced with an excerpt of the message.
const FALLBACK_RESPONSES: &[&str] = &[
  "Thank you for your question about '{}'. I recommend consulting a healthcare professional for a proper evaluation.",
  "I understand you're concerned about '{}'. I can share general health information, but it should not replace a professional consultation.",
  "Regarding '{}': it's important to get a proper medical evaluation. Please describe any specific symptoms so I can look them up.",
];

const EXCERPT_CHARS: usize = 50;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedEntities {
  /// Canonical names of mentioned symptoms, in store order.
  pub symptoms:    Vec<String>,
  /// Generic names of mentioned medications, in store order.
  pub medications: Vec<String>,
}

impl ExtractedEntities {
  pub fn is_empty(&self) -> bool { self.symptoms.is_empty() && self.medications.is_empty() }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
  pub response:            String,
  pub risk_level:          RiskLevel,
  pub confidence_score:    f64,
  pub recommendations:     Vec<String>,
  pub possible_diseases:   Vec<MatchResult>,
  pub emergency_info:      EmergencyAssessment,
  pub emergency_response:  Option<EmergencyResponse>,
  pub extracted_entities:  ExtractedEntities,
  pub knowledge_base_used: bool,
  pub medical_memory_used: bool,
  pub timestamp:           DateTime<Utc>,
}

pub struct MedicalResponder {
  knowledge:   Arc<KnowledgeBase>,
  memory:      Arc<MedicalMemory>,
  top_matches: usize,
}

impl MedicalResponder {
  pub fn new(knowledge: Arc<KnowledgeBase>, memory: Arc<MedicalMemory>) -> Self {
    Self { knowledge, memory, top_matches: DEFAULT_TOP_MATCHES }
  }

  pub fn with_top_matches(mut self, top_matches: usize) -> Self {
    self.top_matches = top_matches;
    self
  }

  /// Symptom and medication names mentioned in `text` as whole words.
  pub fn extract_entities(&self, text: &str) -> ExtractedEntities {
    let lowered = text.to_lowercase();
    let symptoms = self
      .knowledge
      .symptoms()
      .iter()
      .filter(|s| mentions(&lowered, &s.name.to_lowercase()))
      .map(|s| s.name.clone())
      .collect();
    let medications = self
      .knowledge
      .medications()
      .iter()
      .filter(|m| {
        mentions(&lowered, &m.generic_name.to_lowercase())
          || m.brand_names.iter().any(|b| mentions(&lowered, &b.to_lowercase()))
      })
      .map(|m| m.generic_name.clone())
      .collect();
    ExtractedEntities { symptoms, medications }
  }

  /// Answer one message. `user_id` enables the medical memory.
  pub fn respond(&self, user_id: Option<&str>, text: &str) -> ChatReply {
    let emergency_info = detect_emergency(text);
    let extracted_entities = self.extract_entities(text);

    let remembered: Vec<String> = user_id
      .map(|id| self.memory.recent(id, MemoryKind::Symptom))
      .unwrap_or_default()
      .into_iter()
      .filter(|name| !extracted_entities.symptoms.contains(name))
      .collect();
    let medical_memory_used = !remembered.is_empty();

    let analysis = (!extracted_entities.symptoms.is_empty()).then(|| {
      self.knowledge.analyze_symptoms(
        &extracted_entities.symptoms,
        Demographics::default(),
        self.top_matches,
      )
    });
    let pipeline_risk = analysis.as_ref().map_or(RiskLevel::Low, |a| a.risk_level);
    let risk_level = emergency_info.emergency_level.escalate(pipeline_risk);
    let possible_diseases = analysis.map(|a| a.possible_diseases).unwrap_or_default();

    let confidence_score = possible_diseases
      .first()
      .map_or(DEFAULT_CONFIDENCE, |m| m.match_score);

    let emergency_response = EmergencyResponse::for_assessment(&emergency_info);
    let knowledge_base_used = !extracted_entities.is_empty();

    let mut paragraphs = Vec::new();
    if let Some(er) = &emergency_response {
      paragraphs.push(er.message.clone());
    }
    if knowledge_base_used {
      paragraphs.extend(self.describe(&extracted_entities, &possible_diseases));
    } else {
      paragraphs.push(fallback_response(text));
    }
    if medical_memory_used {
      paragraphs.push(format!("Earlier you mentioned: {}.", remembered.join(", ")));
    }
    paragraphs.push(risk_level.recommendation().to_owned());
    paragraphs.push(DISCLAIMER.to_owned());

    let mut recommendations = vec![risk_level.recommendation().to_owned()];
    recommendations.push(GENERAL_ADVICE.to_owned());

    if let Some(id) = user_id {
      let entries = extracted_entities
        .symptoms
        .iter()
        .map(|s| MemoryEntry::new(MemoryKind::Symptom, s.as_str()))
        .chain(
          extracted_entities
            .medications
            .iter()
            .map(|m| MemoryEntry::new(MemoryKind::Medication, m.as_str())),
        );
      self.memory.record(id, entries);
    }

    tracing::debug!(
      risk_level = %risk_level,
      emergency = %emergency_info.emergency_level,
      knowledge_base_used,
      medical_memory_used,
      "chat reply generated"
    );

    ChatReply {
      response: paragraphs.join(" "),
      risk_level,
      confidence_score,
      recommendations,
      possible_diseases,
      emergency_info,
      emergency_response,
      extracted_entities,
      knowledge_base_used,
      medical_memory_used,
      timestamp: Utc::now(),
    }
  }

  fn describe(&self, entities: &ExtractedEntities, diseases: &[MatchResult]) -> Vec<String> {
    let mut out = Vec::new();
    if !entities.symptoms.is_empty() {
      if diseases.is_empty() {
        out.push(format!(
          "You mentioned {}, which I could not link to a specific condition.",
          entities.symptoms.join(", ")
        ));
      } else {
        let candidates: Vec<String> = diseases
          .iter()
          .map(|m| format!("{} ({:.0}% match)", m.disease.name, m.match_score * 100.0))
          .collect();
        out.push(format!(
          "Based on the symptoms you described ({}), possible conditions include {}.",
          entities.symptoms.join(", "),
          candidates.join(", ")
        ));
      }
    }
    for name in &entities.medications {
      if let Some(m) = self.knowledge.medication_info(name) {
        let mut line = format!("{} is a {} medication.", m.generic_name, m.drug_class);
        if !m.side_effects.is_empty() {
          line.push_str(&format!(" Common side effects: {}.", m.side_effects.join(", ")));
        }
        out.push(line);
      }
    }
    out
  }
}

/// `term` occurs in `text` with no letter or digit on either side.
fn mentions(text: &str, term: &str) -> bool {
  if term.is_empty() {
    return false;
  }
  text.match_indices(term).any(|(start, _)| {
    let before = text[..start].chars().next_back();
    let after = text[start + term.len()..].chars().next();
    !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
  })
}

/// A canned reply chosen by a stable hash of the message.
fn fallback_response(text: &str) -> String {
  let index = text
    .bytes()
    .fold(0usize, |acc, b| acc.wrapping_mul(31).wrapping_add(usize::from(b)))
    % FALLBACK_RESPONSES.len();
  let excerpt: String = text.trim().chars().take(EXCERPT_CHARS).collect();
  FALLBACK_RESPONSES[index].replacen("{}", &excerpt, 1)
}

#[cfg(test)]
mod tests {
  use crate::{emergency::EmergencyLevel, fixture};

  use super::*;

  fn responder() -> MedicalResponder {
    MedicalResponder::new(fixture::knowledge_base(), Arc::new(MedicalMemory::default()))
  }

  #[test]
  fn severe_chest_pain_is_critical_with_guidance() {
    let reply = responder().respond(None, "I have severe chest pain");
    assert_eq!(reply.emergency_info.emergency_level, EmergencyLevel::Critical);
    assert!(reply.emergency_info.immediate_action_required);
    assert_eq!(reply.risk_level, RiskLevel::Critical);
    assert!(reply.emergency_response.is_some());
    assert_eq!(reply.extracted_entities.symptoms, ["Chest Pain"]);
  }

  #[test]
  fn symptoms_in_text_go_through_the_matcher() {
    let reply = responder().respond(None, "I've had a fever, a cough and fatigue all week");
    assert_eq!(reply.extracted_entities.symptoms, ["Fever", "Cough", "Fatigue"]);
    assert!(reply.knowledge_base_used);
    assert_eq!(reply.risk_level, RiskLevel::High);
    assert_eq!(reply.confidence_score, 1.0);
    assert!(reply.possible_diseases.iter().any(|m| m.disease.name == "Influenza"));
    assert!(reply.response.contains("Influenza (100% match)"));
  }

  #[test]
  fn overlay_raises_but_never_lowers_pipeline_risk() {
    // Matcher alone: Headache+Nausea → Migraine at 2/2 → high. The overlay
    // finds "seizure" → medium, which must not pull the level down.
    let reply = responder().respond(None, "headache and nausea after a seizure");
    assert_eq!(reply.emergency_info.emergency_level, EmergencyLevel::Medium);
    assert_eq!(reply.risk_level, RiskLevel::High);
  }

  #[test]
  fn unknown_text_gets_a_deterministic_fallback() {
    let r = responder();
    let a = r.respond(None, "hello, is anyone there?");
    let b = r.respond(None, "hello, is anyone there?");
    assert_eq!(a.response, b.response);
    assert!(!a.knowledge_base_used);
    assert_eq!(a.risk_level, RiskLevel::Low);
    assert_eq!(a.confidence_score, DEFAULT_CONFIDENCE);
    assert!(a.response.contains("hello, is anyone there?"));
  }

  #[test]
  fn medical_memory_carries_symptoms_across_messages() {
    let r = responder();
    let first = r.respond(Some("u1"), "I have a fever");
    assert!(!first.medical_memory_used);

    let second = r.respond(Some("u1"), "now also a headache");
    assert!(second.medical_memory_used);
    assert!(second.response.contains("Earlier you mentioned: Fever."));

    let other_user = r.respond(Some("u2"), "now also a headache");
    assert!(!other_user.medical_memory_used);
  }

  #[test]
  fn medications_are_extracted_by_generic_or_brand_name() {
    let reply = responder().respond(None, "Can I take Advil with tylenol?");
    assert_eq!(reply.extracted_entities.medications, ["Acetaminophen", "Ibuprofen"]);
    assert!(reply.knowledge_base_used);
  }

  #[test]
  fn mentions_respects_word_boundaries() {
    assert!(mentions("i have a rash.", "rash"));
    assert!(!mentions("the car crash", "rash"));
    assert!(mentions("chest pain, again", "chest pain"));
    assert!(!mentions("anything", ""));
  }
}
