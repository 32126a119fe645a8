//! In-memory reference data shared by the unit tests.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::{
  disease::{NewDisease, SeverityLevel, SymptomDiseaseAssociation},
  knowledge::KnowledgeBase,
  reference::{
    DiseaseTreatment, DrugInteraction, Guideline, LabMarker, Medication,
    RecommendationLevel, Treatment, TreatmentKind,
  },
  store::Snapshot,
  symptom::NewSymptom,
};

pub struct Fixture {
  pub snapshot: Snapshot,
}

impl Fixture {
  pub fn new() -> Self {
    let mut snapshot = Snapshot::default();

    let symptoms = [
      NewSymptom::new("Fever", "general").described("Elevated body temperature above normal"),
      NewSymptom::new("Cough", "respiratory").described("Sudden expulsion of air from lungs"),
      NewSymptom::new("Fatigue", "general").described("Extreme tiredness or exhaustion"),
      NewSymptom::new("Headache", "neurological").described("Pain in the head or neck region"),
      NewSymptom::new("Muscle Pain", "musculoskeletal").described("Pain in muscles"),
      NewSymptom::new("Shortness of Breath", "respiratory")
        .described("Difficulty breathing or feeling breathless")
        .emergency(),
      NewSymptom::new("Chest Pain", "cardiovascular")
        .described("Pain or discomfort in the chest area")
        .emergency(),
      NewSymptom::new("Wheezing", "respiratory")
        .described("High-pitched whistling sound when breathing"),
      NewSymptom::new("Nausea", "gastrointestinal")
        .described("Feeling of sickness with inclination to vomit"),
      NewSymptom::new("Rash", "dermatological").described("Skin irritation or eruption"),
    ];
    snapshot.symptoms = symptoms
      .into_iter()
      .map(|s| s.into_symptom(uuid::Uuid::new_v4()))
      .collect();

    let diseases = [
      ("Common Cold", "J00", "Viral upper respiratory tract infection", SeverityLevel::Mild),
      ("Influenza", "J11.1", "Viral infection affecting respiratory system", SeverityLevel::Moderate),
      ("Pneumonia", "J18.9", "Infection causing inflammation in lung air sacs", SeverityLevel::Severe),
      ("Asthma", "J45.9", "Chronic respiratory condition with airway inflammation", SeverityLevel::Moderate),
      ("Migraine", "G43.909", "Severe recurring headache", SeverityLevel::Moderate),
    ];
    snapshot.diseases = diseases
      .into_iter()
      .map(|(name, code, description, severity)| {
        let mut d = NewDisease::new(name, severity);
        d.icd_10_code = Some(code.into());
        d.description = description.into();
        d.into_disease(uuid::Uuid::new_v4())
      })
      .collect();

    let edges: [(&str, &[(&str, f64)]); 5] = [
      ("Common Cold", &[("Fever", 0.8), ("Cough", 0.9), ("Headache", 0.6), ("Fatigue", 0.7)]),
      ("Influenza", &[
        ("Fever", 0.95),
        ("Cough", 0.8),
        ("Fatigue", 0.9),
        ("Muscle Pain", 0.8),
        ("Headache", 0.7),
      ]),
      ("Pneumonia", &[
        ("Fever", 0.85),
        ("Cough", 0.9),
        ("Shortness of Breath", 0.8),
        ("Chest Pain", 0.7),
        ("Fatigue", 0.8),
      ]),
      ("Asthma", &[
        ("Shortness of Breath", 0.9),
        ("Wheezing", 0.8),
        ("Cough", 0.7),
        ("Chest Pain", 0.6),
      ]),
      ("Migraine", &[("Headache", 0.95), ("Nausea", 0.8), ("Fatigue", 0.7)]),
    ];
    let mut fixture = Self { snapshot };
    for (disease, symptoms) in edges {
      let disease_id = fixture.disease_id(disease);
      for &(symptom, weight) in symptoms {
        let edge = SymptomDiseaseAssociation::new(
          fixture.symptom_id(symptom),
          disease_id,
          weight,
          1.0,
        )
        .unwrap();
        fixture.snapshot.associations.push(edge);
      }
    }

    let rest = Treatment::new("Rest and fluids", TreatmentKind::Lifestyle);
    fixture.snapshot.treatment_links.push(DiseaseTreatment {
      disease_id:           fixture.disease_id("Influenza"),
      treatment_id:         rest.id,
      effectiveness_score:  0.7,
      recommendation_level: RecommendationLevel::Primary,
    });
    fixture.snapshot.treatments.push(rest);

    let mut acetaminophen = Medication::new("Acetaminophen", "Analgesic/Antipyretic");
    acetaminophen.brand_names = vec!["Tylenol".into(), "Panadol".into()];
    let mut ibuprofen = Medication::new("Ibuprofen", "NSAID");
    ibuprofen.brand_names = vec!["Advil".into(), "Motrin".into()];
    fixture.snapshot.drug_interactions.push(DrugInteraction {
      drug_a_id:        acetaminophen.id,
      drug_b_id:        ibuprofen.id,
      interaction_type: "moderate".into(),
      severity:         3,
      clinical_effect:  "Liver damage".into(),
      management:       "Avoid frequent use together".into(),
    });
    fixture.snapshot.medications = vec![acetaminophen, ibuprofen];

    let mut glucose = LabMarker::new("Glucose", "blood");
    glucose.units = Some("mg/dL".into());
    glucose.normal_range_min = Some(70.0);
    glucose.normal_range_max = Some(100.0);
    glucose.critical_low = Some(40.0);
    glucose.critical_high = Some(400.0);
    let mut hba1c = LabMarker::new("HbA1c", "blood");
    hba1c.units = Some("%".into());
    hba1c.normal_range_max = Some(5.7);
    hba1c.normal_range_text = Some("Less than 5.7%".into());
    fixture.snapshot.lab_markers = vec![glucose, hba1c];

    fixture.snapshot.guidelines = vec![
      Guideline {
        id:               uuid::Uuid::new_v4(),
        title:            "Influenza Prevention and Control".into(),
        organization:     "WHO".into(),
        version:          Some("2023".into()),
        evidence_level:   Some("A".into()),
        guideline_type:   "prevention".into(),
        content:          "Annual vaccination is recommended.".into(),
        publication_date: NaiveDate::from_ymd_opt(2023, 1, 15),
        is_active:        true,
      },
      Guideline {
        id:               uuid::Uuid::new_v4(),
        title:            "Retired Cold Protocol".into(),
        organization:     "WHO".into(),
        version:          None,
        evidence_level:   None,
        guideline_type:   "treatment".into(),
        content:          String::new(),
        publication_date: None,
        is_active:        false,
      },
    ];

    fixture
  }

  pub fn symptom_id(&self, name: &str) -> uuid::Uuid {
    self.snapshot.symptoms.iter().find(|s| s.name == name).unwrap().id
  }

  pub fn disease_id(&self, name: &str) -> uuid::Uuid {
    self.snapshot.diseases.iter().find(|d| d.name == name).unwrap().id
  }
}

pub fn knowledge_base() -> Arc<KnowledgeBase> {
  Arc::new(KnowledgeBase::from_snapshot(Fixture::new().snapshot).unwrap())
}
