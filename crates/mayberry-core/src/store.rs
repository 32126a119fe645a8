//! The `KnowledgeStore` trait and the raw snapshot it produces.
//!
//! The trait is implemented by storage backends (e.g. `mayberry-store-sqlite`).
//! Reads go through a single [`KnowledgeStore::snapshot`] call; the resulting
//! [`Snapshot`] is turned into an indexed
//! [`KnowledgeBase`](crate::knowledge::KnowledgeBase) and never touches the
//! store again.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::{
  disease::{Disease, NewDisease, SymptomDiseaseAssociation},
  reference::{
    DiseaseTreatment, DrugInteraction, Guideline, LabMarker, Medication, Treatment,
  },
  symptom::{NewSymptom, Symptom},
};

// ─── Snapshot ────────────────────────────────────────────────────────────────

/// Every reference row in the store, in store order.
///
/// "Store order" is whatever stable order the backend enumerates rows in
/// (insertion order for SQLite). Lookup results inherit it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
  pub symptoms:          Vec<Symptom>,
  pub diseases:          Vec<Disease>,
  pub associations:      Vec<SymptomDiseaseAssociation>,
  pub treatments:        Vec<Treatment>,
  pub treatment_links:   Vec<DiseaseTreatment>,
  pub medications:       Vec<Medication>,
  pub drug_interactions: Vec<DrugInteraction>,
  pub lab_markers:       Vec<LabMarker>,
  pub guidelines:        Vec<Guideline>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a knowledge store backend.
///
/// Reference data is written once when seeding and read-only afterwards. Every
/// edge insert must fail when one of its endpoints does not exist.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes.
pub trait KnowledgeStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Symptoms and diseases ─────────────────────────────────────────────

  /// Persist a new symptom; the store assigns its id.
  fn add_symptom(
    &self,
    input: NewSymptom,
  ) -> impl Future<Output = Result<Symptom, Self::Error>> + Send + '_;

  /// Persist a new disease; the store assigns its id.
  fn add_disease(
    &self,
    input: NewDisease,
  ) -> impl Future<Output = Result<Disease, Self::Error>> + Send + '_;

  /// Link a symptom to a disease.
  fn associate(
    &self,
    edge: SymptomDiseaseAssociation,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Supplementary reference data ──────────────────────────────────────

  fn add_treatment(
    &self,
    treatment: Treatment,
  ) -> impl Future<Output = Result<Treatment, Self::Error>> + Send + '_;

  fn link_treatment(
    &self,
    link: DiseaseTreatment,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn add_medication(
    &self,
    medication: Medication,
  ) -> impl Future<Output = Result<Medication, Self::Error>> + Send + '_;

  fn add_drug_interaction(
    &self,
    interaction: DrugInteraction,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn add_lab_marker(
    &self,
    marker: LabMarker,
  ) -> impl Future<Output = Result<LabMarker, Self::Error>> + Send + '_;

  fn add_guideline(
    &self,
    guideline: Guideline,
  ) -> impl Future<Output = Result<Guideline, Self::Error>> + Send + '_;

  /// Write every row of `snapshot` as one unit: either all of it lands or
  /// none of it does. Ids are taken from the rows as given.
  fn import(&self, snapshot: Snapshot) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Read every reference row.
  fn snapshot(&self) -> impl Future<Output = Result<Snapshot, Self::Error>> + Send + '_;
}
