//! Lab value interpretation against a marker's reference ranges.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::{knowledge::KnowledgeBase, reference::LabMarker};

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Interpretation {
  CriticallyLow,
  CriticallyHigh,
  Low,
  High,
  Normal,
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LabStatus {
  Critical,
  Abnormal,
  WithinRange,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabInterpretation {
  pub marker_name:           String,
  pub value:                 f64,
  pub units:                 Option<String>,
  /// `"min-max"`; a missing bound prints as `None`.
  pub normal_range:          String,
  pub interpretation:        Interpretation,
  pub status:                LabStatus,
  pub clinical_significance: Option<String>,
}

/// Classify `value` against `marker`. Critical bounds are checked before
/// normal bounds; absent bounds are skipped, while a bound of zero applies.
pub fn interpret(marker: &LabMarker, value: f64) -> LabInterpretation {
  let below = |bound: Option<f64>| bound.is_some_and(|b| value < b);
  let above = |bound: Option<f64>| bound.is_some_and(|b| value > b);

  let (interpretation, status) = if below(marker.critical_low) {
    (Interpretation::CriticallyLow, LabStatus::Critical)
  } else if above(marker.critical_high) {
    (Interpretation::CriticallyHigh, LabStatus::Critical)
  } else if below(marker.normal_range_min) {
    (Interpretation::Low, LabStatus::Abnormal)
  } else if above(marker.normal_range_max) {
    (Interpretation::High, LabStatus::Abnormal)
  } else {
    (Interpretation::Normal, LabStatus::WithinRange)
  };

  LabInterpretation {
    marker_name: marker.name.clone(),
    value,
    units: marker.units.clone(),
    normal_range: format!(
      "{}-{}",
      fmt_bound(marker.normal_range_min),
      fmt_bound(marker.normal_range_max)
    ),
    interpretation,
    status,
    clinical_significance: marker.clinical_significance.clone(),
  }
}

fn fmt_bound(bound: Option<f64>) -> String {
  bound.map_or_else(|| "None".to_owned(), |b| b.to_string())
}

impl KnowledgeBase {
  /// Interpret `value` for the first marker whose name contains
  /// `marker_name`. Unknown markers yield `None`.
  pub fn interpret_lab_value(&self, marker_name: &str, value: f64) -> Option<LabInterpretation> {
    self.lab_marker(marker_name).map(|m| interpret(m, value))
  }
}
