//! Liveness probe over a loaded knowledge base.

use std::fmt::Display;

use serde::Serialize;
use strum::Display as StrumDisplay;

use crate::knowledge::KnowledgeBase;

/// The query the probe runs.
const PROBE_QUERY: &str = "fever";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, StrumDisplay)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum HealthStatus {
  Healthy,
  Unavailable,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
  pub status:     HealthStatus,
  pub message:    String,
  /// Symptoms returned by the probe search (0 or 1).
  pub probe_hits: usize,
  pub symptoms:   usize,
  pub diseases:   usize,
}

impl HealthReport {
  /// Report for a knowledge base that could not be loaded.
  pub fn unavailable(reason: impl Display) -> Self {
    Self {
      status:     HealthStatus::Unavailable,
      message:    format!("knowledge base unavailable: {reason}"),
      probe_hits: 0,
      symptoms:   0,
      diseases:   0,
    }
  }
}

impl KnowledgeBase {
  /// Run a one-result symptom search and report what the base holds.
  pub fn health(&self) -> HealthReport {
    let probe_hits = self.search_symptoms(PROBE_QUERY, 1).len();
    HealthReport {
      status: HealthStatus::Healthy,
      message: format!("found {probe_hits} symptom(s) for test query {PROBE_QUERY:?}"),
      probe_hits,
      symptoms: self.symptoms().len(),
      diseases: self.diseases().len(),
    }
  }
}
