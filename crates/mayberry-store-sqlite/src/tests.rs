//! Integration tests for `SqliteStore` against an in-memory database.

use mayberry_core::{
  Error as CoreError,
  analysis::Demographics,
  disease::{NewDisease, SeverityLevel, SymptomDiseaseAssociation},
  knowledge::KnowledgeBase,
  reference::{DrugInteraction, LabMarker, Medication},
  risk::RiskLevel,
  store::KnowledgeStore,
  symptom::{NewSymptom, SymptomCategory},
};
use uuid::Uuid;

use crate::{
  Error, SqliteStore,
  seed::{reference_snapshot, seed},
};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn seeded() -> SqliteStore {
  let s = store().await;
  seed(&s).await.unwrap().expect("fresh store is seeded");
  s
}

// ─── Writes ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn symptom_roundtrip() {
  let s = store().await;
  let mut input = NewSymptom::new("Confusion", "neurological")
    .described("State of mental uncertainty")
    .emergency();
  input.category = SymptomCategory::Psychological;
  input.prevalence_rate = Some(0.05);
  input.red_flags = vec!["sudden onset".into()];
  let added = s.add_symptom(input).await.unwrap();

  let snapshot = s.snapshot().await.unwrap();
  assert_eq!(snapshot.symptoms, [added]);
}

#[tokio::test]
async fn duplicate_symptom_name_is_rejected_ignoring_case() {
  let s = store().await;
  s.add_symptom(NewSymptom::new("Fever", "general")).await.unwrap();
  let err = s
    .add_symptom(NewSymptom::new("FEVER", "general"))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Core(CoreError::DuplicateName { kind: "symptom", .. })));
}

#[tokio::test]
async fn symptom_names_are_unique_under_unicode_case_folding() {
  let s = store().await;
  s.add_symptom(NewSymptom::new("Ödem", "cardiovascular")).await.unwrap();
  let err = s
    .add_symptom(NewSymptom::new("ödem", "cardiovascular"))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Core(CoreError::DuplicateName { kind: "symptom", .. })));

  let kb = KnowledgeBase::load(&s).await.unwrap();
  assert_eq!(kb.resolve_symptom_names(["ÖDEM"]).len(), 1);
}

#[tokio::test]
async fn association_requires_both_endpoints() {
  let s = store().await;
  let fever = s.add_symptom(NewSymptom::new("Fever", "general")).await.unwrap();
  let flu = s
    .add_disease(NewDisease::new("Influenza", SeverityLevel::Moderate))
    .await
    .unwrap();

  let ghost = Uuid::new_v4();
  let err = s
    .associate(SymptomDiseaseAssociation::new(ghost, flu.id, 0.5, 1.0).unwrap())
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Core(CoreError::SymptomNotFound(id)) if id == ghost));

  let err = s
    .associate(SymptomDiseaseAssociation::new(fever.id, ghost, 0.5, 1.0).unwrap())
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Core(CoreError::DiseaseNotFound(id)) if id == ghost));

  assert!(s.snapshot().await.unwrap().associations.is_empty());
}

#[tokio::test]
async fn association_weight_out_of_range_is_rejected() {
  let s = store().await;
  let fever = s.add_symptom(NewSymptom::new("Fever", "general")).await.unwrap();
  let flu = s
    .add_disease(NewDisease::new("Influenza", SeverityLevel::Moderate))
    .await
    .unwrap();

  let edge = SymptomDiseaseAssociation {
    symptom_id:         fever.id,
    disease_id:         flu.id,
    probability_weight: 1.5,
    severity_modifier:  1.0,
  };
  let err = s.associate(edge).await.unwrap_err();
  assert!(matches!(err, Error::Core(CoreError::WeightOutOfRange(_))));
}

#[tokio::test]
async fn duplicate_association_is_a_database_error() {
  let s = store().await;
  let fever = s.add_symptom(NewSymptom::new("Fever", "general")).await.unwrap();
  let flu = s
    .add_disease(NewDisease::new("Influenza", SeverityLevel::Moderate))
    .await
    .unwrap();
  let edge = SymptomDiseaseAssociation::new(fever.id, flu.id, 0.9, 1.0).unwrap();

  s.associate(edge).await.unwrap();
  let err = s.associate(edge).await.unwrap_err();
  assert!(matches!(err, Error::Database(_)));
}

#[tokio::test]
async fn interaction_requires_known_medications() {
  let s = store().await;
  let ibuprofen = s
    .add_medication(Medication::new("Ibuprofen", "NSAID"))
    .await
    .unwrap();
  let err = s
    .add_drug_interaction(DrugInteraction {
      drug_a_id:        ibuprofen.id,
      drug_b_id:        Uuid::new_v4(),
      interaction_type: "moderate".into(),
      severity:         3,
      clinical_effect:  String::new(),
      management:       String::new(),
    })
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Core(CoreError::MedicationNotFound(_))));
}

#[tokio::test]
async fn medication_lists_and_marker_bounds_roundtrip() {
  let s = store().await;
  let mut m = Medication::new("Acetaminophen", "Analgesic/Antipyretic");
  m.brand_names = vec!["Tylenol".into(), "Panadol".into()];
  m.side_effects = vec!["Hepatotoxicity at high doses".into()];
  let m = s.add_medication(m).await.unwrap();

  let mut marker = LabMarker::new("HbA1c", "blood");
  marker.normal_range_max = Some(5.7);
  marker.normal_range_text = Some("Less than 5.7%".into());
  let marker = s.add_lab_marker(marker).await.unwrap();

  let snapshot = s.snapshot().await.unwrap();
  assert_eq!(snapshot.medications, [m]);
  assert_eq!(snapshot.lab_markers, [marker]);
  assert_eq!(snapshot.lab_markers[0].normal_range_min, None);
}

// ─── Snapshot order ──────────────────────────────────────────────────────────

#[tokio::test]
async fn snapshot_preserves_insertion_order() {
  let s = store().await;
  for name in ["Wheezing", "Cough", "Fever"] {
    s.add_symptom(NewSymptom::new(name, "respiratory")).await.unwrap();
  }
  let names: Vec<_> = s
    .snapshot()
    .await
    .unwrap()
    .symptoms
    .into_iter()
    .map(|s| s.name)
    .collect();
  assert_eq!(names, ["Wheezing", "Cough", "Fever"]);
}

#[tokio::test]
async fn file_store_persists_across_reopen() {
  let path = std::env::temp_dir().join(format!("mayberry-{}.db", Uuid::new_v4()));
  {
    let s = SqliteStore::open(&path).await.unwrap();
    s.add_symptom(NewSymptom::new("Fever", "general")).await.unwrap();
  }
  let s = SqliteStore::open(&path).await.unwrap();
  assert_eq!(s.snapshot().await.unwrap().symptoms.len(), 1);
  let _ = std::fs::remove_file(&path);
}

// ─── Seed ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn seed_runs_once() {
  let s = seeded().await;
  let first = s.snapshot().await.unwrap();
  assert!(seed(&s).await.unwrap().is_none());
  let second = s.snapshot().await.unwrap();
  assert_eq!(first.symptoms.len(), second.symptoms.len());
}

#[tokio::test]
async fn failed_seed_writes_nothing_and_stays_retryable() {
  let s = store().await;
  s.add_disease(NewDisease::new("Influenza", SeverityLevel::Moderate))
    .await
    .unwrap();

  let err = seed(&s).await.unwrap_err();
  assert!(matches!(err, Error::Core(CoreError::DuplicateName { kind: "disease", .. })));

  let snapshot = s.snapshot().await.unwrap();
  assert!(snapshot.symptoms.is_empty());
  assert_eq!(snapshot.diseases.len(), 1);
  assert!(snapshot.associations.is_empty());

  // Still unseeded, so the next attempt tries again instead of skipping.
  assert!(seed(&s).await.is_err());
}

#[tokio::test]
async fn import_rolls_back_on_a_bad_row() {
  let s = store().await;
  let mut snapshot = reference_snapshot();
  snapshot.drug_interactions.push(DrugInteraction {
    drug_a_id:        Uuid::new_v4(),
    drug_b_id:        Uuid::new_v4(),
    interaction_type: "major".into(),
    severity:         4,
    clinical_effect:  String::new(),
    management:       String::new(),
  });

  let err = s.import(snapshot).await.unwrap_err();
  assert!(matches!(err, Error::Database(_)));

  let after = s.snapshot().await.unwrap();
  assert!(after.symptoms.is_empty());
  assert!(after.medications.is_empty());
  assert!(after.guidelines.is_empty());
}

#[tokio::test]
async fn seeded_store_reproduces_influenza_scenario() {
  let s = seeded().await;
  let kb = KnowledgeBase::load(&s).await.unwrap();

  let input = vec!["Fever".to_owned(), "Cough".to_owned(), "Fatigue".to_owned()];
  let matches = kb.match_diseases(&input);
  let flu = matches
    .iter()
    .find(|m| m.disease.name == "Influenza")
    .expect("influenza is a candidate");
  assert_eq!(flu.match_score, 1.0);
  assert_eq!(flu.matching_symptoms, 3);
  assert_eq!(flu.total_symptoms, 3);

  let analysis = kb.analyze_symptoms(&input, Demographics::default(), 5);
  assert_eq!(analysis.risk_level, RiskLevel::High);
  assert!(!analysis.has_emergency_symptoms);
  assert_eq!(analysis.possible_diseases.len(), 5);
}

#[tokio::test]
async fn seeded_store_serves_lookups() {
  let s = seeded().await;
  let kb = KnowledgeBase::load(&s).await.unwrap();

  // Descriptions are searched too: Headache is "Pain in the head or neck region".
  let hits: Vec<_> = kb
    .search_symptoms("pain", 10)
    .into_iter()
    .map(|s| s.name.as_str())
    .collect();
  assert_eq!(hits, [
    "Chest Pain",
    "Abdominal Pain",
    "Headache",
    "Joint Pain",
    "Muscle Pain",
    "Back Pain"
  ]);

  assert_eq!(kb.medication_info("advil").unwrap().generic_name, "Ibuprofen");
  assert!(!kb.treatments_for_disease("influenza").is_empty());
  assert_eq!(kb.guidelines("covid", Some("who")).len(), 1);

  let report = kb.check_drug_interactions(&["Tylenol", "Motrin"]);
  assert_eq!(report.interactions.len(), 1);

  let glucose = kb.interpret_lab_value("glucose", 450.0).unwrap();
  assert_eq!(glucose.status, mayberry_core::lab::LabStatus::Critical);
}
