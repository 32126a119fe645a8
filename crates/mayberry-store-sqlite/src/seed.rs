//! Bundled reference data and the routine that loads it into a store.

use std::collections::HashMap;

use chrono::NaiveDate;
use mayberry_core::{
  disease::{DEFAULT_SEVERITY_MODIFIER, NewDisease, SeverityLevel, SymptomDiseaseAssociation},
  reference::{
    DiseaseTreatment, DrugInteraction, Guideline, LabMarker, Medication, RecommendationLevel,
    Treatment, TreatmentKind,
  },
  store::{KnowledgeStore, Snapshot},
  symptom::{NewSymptom, SymptomCategory},
};
use uuid::Uuid;

use SeverityLevel::{Critical, Mild, Moderate, Severe};
use SymptomCategory::{Physical, Psychological};

// ─── Data ────────────────────────────────────────────────────────────────────

/// name, description, category, body system, emergency, prevalence
type SymptomRow = (&'static str, &'static str, SymptomCategory, &'static str, bool, f64);

const SYMPTOMS: &[SymptomRow] = &[
  ("Fever", "Elevated body temperature above normal", Physical, "general", false, 0.15),
  ("Cough", "Sudden expulsion of air from lungs", Physical, "respiratory", false, 0.25),
  ("Shortness of Breath", "Difficulty breathing or feeling breathless", Physical, "respiratory", true, 0.12),
  ("Chest Pain", "Pain or discomfort in the chest area", Physical, "cardiovascular", true, 0.08),
  ("Wheezing", "High-pitched whistling sound when breathing", Physical, "respiratory", false, 0.06),
  ("Heart Palpitations", "Irregular or rapid heartbeat", Physical, "cardiovascular", true, 0.10),
  ("Dizziness", "Feeling lightheaded or unsteady", Physical, "neurological", false, 0.18),
  ("Fainting", "Brief loss of consciousness", Physical, "neurological", true, 0.03),
  ("Swelling in Legs", "Fluid retention in lower extremities", Physical, "cardiovascular", false, 0.09),
  ("Nausea", "Feeling of sickness with inclination to vomit", Physical, "gastrointestinal", false, 0.20),
  ("Vomiting", "Forceful expulsion of stomach contents", Physical, "gastrointestinal", false, 0.12),
  ("Diarrhea", "Loose or watery bowel movements", Physical, "gastrointestinal", false, 0.16),
  ("Constipation", "Difficulty or infrequent bowel movements", Physical, "gastrointestinal", false, 0.14),
  ("Abdominal Pain", "Pain in the stomach area", Physical, "gastrointestinal", false, 0.22),
  ("Loss of Appetite", "Reduced desire to eat", Physical, "general", false, 0.11),
  ("Headache", "Pain in the head or neck region", Physical, "neurological", false, 0.35),
  ("Confusion", "State of mental uncertainty or lack of clarity", Psychological, "neurological", true, 0.05),
  ("Memory Loss", "Inability to remember information", Psychological, "neurological", false, 0.07),
  ("Seizures", "Sudden uncontrolled electrical activity in brain", Physical, "neurological", true, 0.01),
  ("Numbness", "Loss of sensation in body parts", Physical, "neurological", false, 0.08),
  ("Fatigue", "Extreme tiredness or exhaustion", Physical, "general", false, 0.30),
  ("Weight Loss", "Unintentional reduction in body weight", Physical, "general", false, 0.09),
  ("Weight Gain", "Unintentional increase in body weight", Physical, "general", false, 0.08),
  ("Night Sweats", "Excessive sweating during sleep", Physical, "general", false, 0.06),
  ("Chills", "Feeling cold with shivering", Physical, "general", false, 0.10),
  ("Joint Pain", "Pain in joints", Physical, "musculoskeletal", false, 0.19),
  ("Muscle Pain", "Pain in muscles", Physical, "musculoskeletal", false, 0.21),
  ("Back Pain", "Pain in the back", Physical, "musculoskeletal", false, 0.28),
  ("Stiffness", "Reduced flexibility in joints or muscles", Physical, "musculoskeletal", false, 0.15),
  ("Rash", "Skin irritation or eruption", Physical, "dermatological", false, 0.17),
  ("Itching", "Uncomfortable sensation causing desire to scratch", Physical, "dermatological", false, 0.13),
  ("Bruising", "Discoloration of skin due to bleeding underneath", Physical, "dermatological", false, 0.12),
];

/// name, ICD-10, description, prevalence, mortality, severity, chronic, contagious
type DiseaseRow =
  (&'static str, &'static str, &'static str, f64, f64, SeverityLevel, bool, bool);

const DISEASES: &[DiseaseRow] = &[
  ("Common Cold", "J00", "Viral upper respiratory tract infection", 0.2, 0.0001, Mild, false, true),
  ("Influenza", "J11.1", "Viral infection affecting respiratory system", 0.05, 0.001, Moderate, false, true),
  ("Pneumonia", "J18.9", "Infection causing inflammation in lung air sacs", 0.01, 0.05, Severe, false, false),
  ("Asthma", "J45.9", "Chronic respiratory condition with airway inflammation", 0.08, 0.002, Moderate, true, false),
  ("Hypertension", "I10", "High blood pressure", 0.45, 0.01, Moderate, true, false),
  ("Heart Attack", "I21.9", "Blockage of blood flow to heart muscle", 0.02, 0.15, Critical, false, false),
  ("Atrial Fibrillation", "I48.91", "Irregular heart rhythm", 0.03, 0.05, Moderate, true, false),
  ("Gastroesophageal Reflux Disease", "K21.9", "Stomach acid flows back into esophagus", 0.15, 0.001, Mild, true, false),
  ("Irritable Bowel Syndrome", "K58.9", "Functional bowel disorder", 0.12, 0.0001, Mild, true, false),
  ("Peptic Ulcer", "K27.9", "Sores in stomach or small intestine lining", 0.05, 0.01, Moderate, false, false),
  ("Migraine", "G43.909", "Severe recurring headache", 0.12, 0.0001, Moderate, true, false),
  ("Stroke", "I64", "Interrupted blood supply to brain", 0.005, 0.20, Critical, false, false),
  ("Epilepsy", "G40.909", "Neurological disorder causing seizures", 0.01, 0.01, Moderate, true, false),
  ("Type 2 Diabetes", "E11.9", "High blood sugar due to insulin resistance", 0.11, 0.02, Moderate, true, false),
  ("Hypothyroidism", "E03.9", "Underactive thyroid gland", 0.05, 0.001, Mild, true, false),
  ("Depression", "F32.9", "Mental health disorder with persistent sadness", 0.08, 0.005, Moderate, true, false),
  ("Anxiety Disorder", "F41.9", "Excessive worry and fear", 0.06, 0.001, Mild, true, false),
];

const ASSOCIATIONS: &[(&str, &[(&str, f64)])] = &[
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
  ("Hypertension", &[("Headache", 0.6), ("Dizziness", 0.5), ("Chest Pain", 0.4)]),
  ("Heart Attack", &[
    ("Chest Pain", 0.9),
    ("Shortness of Breath", 0.7),
    ("Nausea", 0.6),
    ("Dizziness", 0.5),
    ("Fainting", 0.4),
  ]),
  ("Gastroesophageal Reflux Disease", &[("Chest Pain", 0.8), ("Nausea", 0.6), ("Cough", 0.5)]),
  ("Irritable Bowel Syndrome", &[
    ("Abdominal Pain", 0.9),
    ("Diarrhea", 0.7),
    ("Constipation", 0.6),
    ("Nausea", 0.5),
  ]),
  ("Migraine", &[("Headache", 0.95), ("Nausea", 0.8), ("Dizziness", 0.6), ("Fatigue", 0.7)]),
  ("Type 2 Diabetes", &[("Fatigue", 0.8), ("Weight Loss", 0.6), ("Dizziness", 0.5)]),
  ("Depression", &[("Fatigue", 0.9), ("Loss of Appetite", 0.7), ("Memory Loss", 0.6)]),
  ("Anxiety Disorder", &[
    ("Heart Palpitations", 0.8),
    ("Dizziness", 0.7),
    ("Shortness of Breath", 0.6),
    ("Fatigue", 0.6),
  ]),
];

/// generic, brands, class, mechanism, indications, contraindications,
/// side effects, pregnancy category (list fields are comma separated)
type MedicationRow = (
  &'static str,
  &'static str,
  &'static str,
  &'static str,
  &'static str,
  &'static str,
  &'static str,
  &'static str,
);

const MEDICATIONS: &[MedicationRow] = &[
  ("Acetaminophen", "Tylenol, Panadol", "Analgesic/Antipyretic",
   "Inhibits prostaglandin synthesis in CNS", "Pain, fever",
   "Severe liver disease", "Hepatotoxicity at high doses", "B"),
  ("Ibuprofen", "Advil, Motrin", "NSAID",
   "Inhibits COX-1 and COX-2 enzymes", "Pain, inflammation, fever",
   "Peptic ulcer, severe heart failure", "GI bleeding, kidney problems", "C"),
  ("Aspirin", "Bayer Aspirin", "NSAID/Antiplatelet",
   "Irreversibly inhibits COX enzymes", "Pain, fever, cardiovascular protection",
   "Bleeding disorders, children with viral infections", "GI bleeding, Reye's syndrome", "C"),
  ("Lisinopril", "Prinivil, Zestril", "ACE Inhibitor",
   "Blocks conversion of angiotensin I to II", "Hypertension, heart failure",
   "Pregnancy, bilateral renal artery stenosis", "Cough, hyperkalemia, angioedema", "D"),
  ("Metformin", "Glucophage", "Biguanide",
   "Decreases hepatic glucose production", "Type 2 diabetes",
   "Severe kidney disease, metabolic acidosis", "Lactic acidosis, GI upset", "B"),
  ("Atorvastatin", "Lipitor", "Statin",
   "Inhibits HMG-CoA reductase", "High cholesterol",
   "Active liver disease, pregnancy", "Muscle pain, liver enzyme elevation", "X"),
  ("Albuterol", "Ventolin, ProAir", "Beta-2 Agonist",
   "Relaxes bronchial smooth muscle", "Asthma, COPD",
   "Hypersensitivity to drug", "Tremor, palpitations", "C"),
  ("Omeprazole", "Prilosec", "Proton Pump Inhibitor",
   "Blocks gastric acid secretion", "GERD, peptic ulcers",
   "Known hypersensitivity", "Headache, diarrhea, vitamin B12 deficiency", "C"),
  ("Sertraline", "Zoloft", "SSRI Antidepressant",
   "Inhibits serotonin reuptake", "Depression, anxiety disorders",
   "MAOIs, pregnancy", "Nausea, sexual dysfunction, weight changes", "C"),
  ("Levothyroxine", "Synthroid", "Thyroid Hormone",
   "Replaces thyroid hormone", "Hypothyroidism",
   "Untreated adrenal insufficiency", "Cardiac arrhythmias, osteoporosis", "A"),
];

/// drug a, drug b, type, severity, clinical effect, management
const INTERACTIONS: &[(&str, &str, &str, u8, &str, &str)] = &[(
  "Acetaminophen",
  "Ibuprofen",
  "moderate",
  3,
  "Liver damage",
  "Avoid frequent use together",
)];

/// name, test type, units, normal min, normal max, range text, critical low,
/// critical high, significance, disease
type LabRow = (
  &'static str,
  &'static str,
  &'static str,
  Option<f64>,
  Option<f64>,
  Option<&'static str>,
  Option<f64>,
  Option<f64>,
  &'static str,
  &'static str,
);

const LAB_MARKERS: &[LabRow] = &[
  ("Hemoglobin", "blood", "g/dL", Some(12.0), Some(16.0), None, Some(7.0), Some(18.0),
   "Oxygen-carrying protein in red blood cells", "Common Cold"),
  ("White Blood Cell Count", "blood", "cells/μL", Some(4000.0), Some(11000.0), None,
   Some(1000.0), Some(30000.0), "Indicates immune system activity and infection", "Pneumonia"),
  ("Glucose", "blood", "mg/dL", Some(70.0), Some(100.0), Some("Fasting"), Some(40.0),
   Some(400.0), "Blood sugar level", "Type 2 Diabetes"),
  ("Cholesterol Total", "blood", "mg/dL", None, Some(200.0), Some("Less than 200 mg/dL"), None,
   None, "Total cholesterol level", "Heart Attack"),
  ("Blood Pressure Systolic", "measurement", "mmHg", Some(90.0), Some(120.0),
   Some("Less than 120 mmHg"), Some(60.0), Some(200.0),
   "Pressure in arteries during heart contraction", "Hypertension"),
  ("Creatinine", "blood", "mg/dL", Some(0.6), Some(1.2), None, Some(0.3), Some(10.0),
   "Kidney function marker", "Hypertension"),
  ("TSH", "blood", "mIU/L", Some(0.4), Some(4.0), None, Some(0.1), Some(100.0),
   "Thyroid stimulating hormone", "Hypothyroidism"),
  ("HbA1c", "blood", "%", None, Some(5.7), Some("Less than 5.7%"), None, None,
   "Average blood sugar over 2-3 months", "Type 2 Diabetes"),
];

/// name, kind, description, prescription, linked diseases with effectiveness
/// and recommendation level
type TreatmentRow = (
  &'static str,
  TreatmentKind,
  &'static str,
  bool,
  &'static [(&'static str, f64, RecommendationLevel)],
);

const TREATMENTS: &[TreatmentRow] = &[
  ("Paracetamol", TreatmentKind::Medication, "Common pain reliever and fever reducer.", false, &[
    ("Common Cold", 0.6, RecommendationLevel::Secondary),
    ("Influenza", 0.6, RecommendationLevel::Secondary),
  ]),
  ("Rest and fluids", TreatmentKind::Lifestyle, "Adequate rest and hydration.", false, &[
    ("Common Cold", 0.7, RecommendationLevel::Primary),
    ("Influenza", 0.7, RecommendationLevel::Primary),
  ]),
  ("Inhaled bronchodilator", TreatmentKind::Medication, "Short-acting relief of airway constriction.", true, &[
    ("Asthma", 0.85, RecommendationLevel::Primary),
  ]),
];

// ─── Seeding ─────────────────────────────────────────────────────────────────

/// Row counts written by [`seed`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
  pub symptoms:          usize,
  pub diseases:          usize,
  pub associations:      usize,
  pub treatments:        usize,
  pub medications:       usize,
  pub drug_interactions: usize,
  pub lab_markers:       usize,
  pub guidelines:        usize,
}

fn split_list(s: &str) -> Vec<String> {
  s.split(',').map(str::trim).filter(|x| !x.is_empty()).map(str::to_owned).collect()
}

impl SeedReport {
  fn of(snapshot: &Snapshot) -> Self {
    Self {
      symptoms:          snapshot.symptoms.len(),
      diseases:          snapshot.diseases.len(),
      associations:      snapshot.associations.len(),
      treatments:        snapshot.treatments.len(),
      medications:       snapshot.medications.len(),
      drug_interactions: snapshot.drug_interactions.len(),
      lab_markers:       snapshot.lab_markers.len(),
      guidelines:        snapshot.guidelines.len(),
    }
  }
}

/// The bundled reference data with fresh ids, ready for
/// [`KnowledgeStore::import`].
pub fn reference_snapshot() -> Snapshot {
  let mut snapshot = Snapshot::default();

  let mut symptom_ids = HashMap::new();
  for &(name, description, category, body_system, emergency, prevalence) in SYMPTOMS {
    let mut input = NewSymptom::new(name, body_system).described(description);
    input.category = category;
    input.is_emergency = emergency;
    input.prevalence_rate = Some(prevalence);
    let symptom = input.into_symptom(Uuid::new_v4());
    symptom_ids.insert(name, symptom.id);
    snapshot.symptoms.push(symptom);
  }

  let mut disease_ids = HashMap::new();
  for &(name, icd, description, prevalence, mortality, severity, chronic, contagious) in DISEASES {
    let mut input = NewDisease::new(name, severity);
    input.icd_10_code = Some(icd.to_owned());
    input.description = description.to_owned();
    input.prevalence = Some(prevalence);
    input.mortality_rate = Some(mortality);
    input.is_chronic = chronic;
    input.is_contagious = contagious;
    let disease = input.into_disease(Uuid::new_v4());
    disease_ids.insert(name, disease.id);
    snapshot.diseases.push(disease);
  }

  for &(disease, symptoms) in ASSOCIATIONS {
    let Some(&disease_id) = disease_ids.get(disease) else {
      tracing::warn!(disease, "seed association names an unknown disease");
      continue;
    };
    for &(symptom, weight) in symptoms {
      let Some(&symptom_id) = symptom_ids.get(symptom) else {
        tracing::warn!(symptom, "seed association names an unknown symptom");
        continue;
      };
      snapshot.associations.push(SymptomDiseaseAssociation {
        symptom_id,
        disease_id,
        probability_weight: weight,
        severity_modifier: DEFAULT_SEVERITY_MODIFIER,
      });
    }
  }

  for &(name, kind, description, prescription, links) in TREATMENTS {
    let mut treatment = Treatment::new(name, kind);
    treatment.description = description.to_owned();
    treatment.requires_prescription = prescription;
    for &(disease, effectiveness_score, recommendation_level) in links {
      if let Some(&disease_id) = disease_ids.get(disease) {
        snapshot.treatment_links.push(DiseaseTreatment {
          disease_id,
          treatment_id: treatment.id,
          effectiveness_score,
          recommendation_level,
        });
      }
    }
    snapshot.treatments.push(treatment);
  }

  let mut medication_ids: HashMap<&str, Uuid> = HashMap::new();
  for &(generic, brands, class, mechanism, indications, contraindications, side_effects, pregnancy) in
    MEDICATIONS
  {
    let mut medication = Medication::new(generic, class);
    medication.brand_names = split_list(brands);
    medication.mechanism_of_action = Some(mechanism.to_owned());
    medication.indications = split_list(indications);
    medication.contraindications = split_list(contraindications);
    medication.side_effects = split_list(side_effects);
    medication.pregnancy_category = Some(pregnancy.to_owned());
    medication_ids.insert(generic, medication.id);
    snapshot.medications.push(medication);
  }

  for &(a, b, interaction_type, severity, effect, management) in INTERACTIONS {
    if let (Some(&drug_a_id), Some(&drug_b_id)) = (medication_ids.get(a), medication_ids.get(b)) {
      snapshot.drug_interactions.push(DrugInteraction {
        drug_a_id,
        drug_b_id,
        interaction_type: interaction_type.to_owned(),
        severity,
        clinical_effect: effect.to_owned(),
        management: management.to_owned(),
      });
    }
  }

  for &(name, test_type, units, min, max, text, crit_low, crit_high, significance, disease) in
    LAB_MARKERS
  {
    let mut marker = LabMarker::new(name, test_type);
    marker.units = Some(units.to_owned());
    marker.normal_range_min = min;
    marker.normal_range_max = max;
    marker.normal_range_text = text.map(str::to_owned);
    marker.critical_low = crit_low;
    marker.critical_high = crit_high;
    marker.clinical_significance = Some(significance.to_owned());
    marker.disease_id = disease_ids.get(disease).copied();
    snapshot.lab_markers.push(marker);
  }

  snapshot.guidelines.push(Guideline {
    id:               Uuid::new_v4(),
    title:            "COVID-19 Treatment Guidelines".into(),
    organization:     "WHO".into(),
    version:          Some("1.0".into()),
    evidence_level:   Some("A".into()),
    guideline_type:   "treatment".into(),
    content:          "Follow WHO protocol for COVID-19 management.".into(),
    publication_date: NaiveDate::from_ymd_opt(2020, 4, 1),
    is_active:        true,
  });

  snapshot
}

/// Load the bundled reference data into `store` in one import.
///
/// A store that already holds symptoms is left untouched and `None` is
/// returned. A failed import writes nothing, so the seed can be retried.
pub async fn seed<S: KnowledgeStore>(store: &S) -> Result<Option<SeedReport>, S::Error> {
  if !store.snapshot().await?.symptoms.is_empty() {
    tracing::info!("knowledge store already populated; skipping seed");
    return Ok(None);
  }

  let snapshot = reference_snapshot();
  let report = SeedReport::of(&snapshot);
  store.import(snapshot).await?;

  tracing::info!(?report, "seeded knowledge store");
  Ok(Some(report))
}
