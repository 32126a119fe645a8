//! [`SqliteStore`], the SQLite implementation of [`KnowledgeStore`].

use std::path::Path;

use rusqlite::{Connection, OptionalExtension as _, Row};
use uuid::Uuid;

use mayberry_core::{
  disease::{Disease, NewDisease, SymptomDiseaseAssociation},
  reference::{DiseaseTreatment, DrugInteraction, Guideline, LabMarker, Medication, Treatment},
  store::{KnowledgeStore, Snapshot},
  symptom::{NewSymptom, Symptom, name_key},
};

use crate::{
  encode::{
    encode_date, encode_list, encode_uuid, MedicationLists, RawAssociation, RawDisease,
    RawGuideline, RawInteraction, RawLabMarker, RawMedication, RawSymptom, RawTreatment,
    RawTreatmentLink,
  },
  schema::SCHEMA,
  Error, Result,
};

type CoreError = mayberry_core::Error;

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Mayberry knowledge store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    tracing::info!(path = %path.display(), "opened knowledge store");
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Whether a row keyed by `id` exists in `table`.
  async fn exists(&self, table: &'static str, key: &'static str, id: Uuid) -> Result<bool> {
    let id = encode_uuid(id);
    Ok(self.conn.call(move |conn| Ok(row_exists(conn, table, key, &id)?)).await?)
  }

  /// Whether `value` is already used in `table.column`.
  async fn name_taken(
    &self,
    table: &'static str,
    column: &'static str,
    value: String,
  ) -> Result<bool> {
    Ok(self.conn.call(move |conn| Ok(row_exists(conn, table, column, &value)?)).await?)
  }

  async fn require(
    &self,
    table: &'static str,
    key: &'static str,
    id: Uuid,
    missing: fn(Uuid) -> CoreError,
  ) -> Result<()> {
    if self.exists(table, key, id).await? {
      Ok(())
    } else {
      Err(missing(id).into())
    }
  }
}

fn query_all<T>(
  conn: &rusqlite::Connection,
  sql: &str,
  from_row: fn(&Row<'_>) -> rusqlite::Result<T>,
) -> rusqlite::Result<Vec<T>> {
  let mut stmt = conn.prepare(sql)?;
  let rows = stmt
    .query_map([], from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}

/// Every table's raw rows, read inside one transaction.
struct RawSnapshot {
  symptoms:          Vec<RawSymptom>,
  diseases:          Vec<RawDisease>,
  associations:      Vec<RawAssociation>,
  treatments:        Vec<RawTreatment>,
  treatment_links:   Vec<RawTreatmentLink>,
  medications:       Vec<RawMedication>,
  drug_interactions: Vec<RawInteraction>,
  lab_markers:       Vec<RawLabMarker>,
  guidelines:        Vec<RawGuideline>,
}

impl RawSnapshot {
  fn read(conn: &mut rusqlite::Connection) -> rusqlite::Result<Self> {
    let tx = conn.transaction()?;
    let raw = Self {
      symptoms:          query_all(&tx, RawSymptom::SELECT, RawSymptom::from_row)?,
      diseases:          query_all(&tx, RawDisease::SELECT, RawDisease::from_row)?,
      associations:      query_all(&tx, RawAssociation::SELECT, RawAssociation::from_row)?,
      treatments:        query_all(&tx, RawTreatment::SELECT, RawTreatment::from_row)?,
      treatment_links:   query_all(&tx, RawTreatmentLink::SELECT, RawTreatmentLink::from_row)?,
      medications:       query_all(&tx, RawMedication::SELECT, RawMedication::from_row)?,
      drug_interactions: query_all(&tx, RawInteraction::SELECT, RawInteraction::from_row)?,
      lab_markers:       query_all(&tx, RawLabMarker::SELECT, RawLabMarker::from_row)?,
      guidelines:        query_all(&tx, RawGuideline::SELECT, RawGuideline::from_row)?,
    };
    tx.commit()?;
    Ok(raw)
  }

  fn decode(self) -> Result<Snapshot> {
    Ok(Snapshot {
      symptoms:          self
        .symptoms
        .into_iter()
        .map(RawSymptom::into_symptom)
        .collect::<Result<_>>()?,
      diseases:          self
        .diseases
        .into_iter()
        .map(RawDisease::into_disease)
        .collect::<Result<_>>()?,
      associations:      self
        .associations
        .into_iter()
        .map(RawAssociation::into_association)
        .collect::<Result<_>>()?,
      treatments:        self
        .treatments
        .into_iter()
        .map(RawTreatment::into_treatment)
        .collect::<Result<_>>()?,
      treatment_links:   self
        .treatment_links
        .into_iter()
        .map(RawTreatmentLink::into_link)
        .collect::<Result<_>>()?,
      medications:       self
        .medications
        .into_iter()
        .map(RawMedication::into_medication)
        .collect::<Result<_>>()?,
      drug_interactions: self
        .drug_interactions
        .into_iter()
        .map(RawInteraction::into_interaction)
        .collect::<Result<_>>()?,
      lab_markers:       self
        .lab_markers
        .into_iter()
        .map(RawLabMarker::into_marker)
        .collect::<Result<_>>()?,
      guidelines:        self
        .guidelines
        .into_iter()
        .map(RawGuideline::into_guideline)
        .collect::<Result<_>>()?,
    })
  }
}

// ─── Row writes ──────────────────────────────────────────────────────────────
//
// Shared by the single-row `KnowledgeStore` methods and by `import`, which
// runs them all inside one transaction.

fn row_exists(
  conn: &Connection,
  table: &str,
  column: &str,
  value: &str,
) -> rusqlite::Result<bool> {
  Ok(
    conn
      .query_row(
        &format!("SELECT 1 FROM {table} WHERE {column} = ?1"),
        rusqlite::params![value],
        |_| Ok(true),
      )
      .optional()?
      .unwrap_or(false),
  )
}

fn insert_symptom(conn: &Connection, s: &Symptom, red_flags: &str) -> rusqlite::Result<()> {
  conn.execute(
    "INSERT INTO symptoms (
       symptom_id, name, name_key, description, category, body_system,
       is_emergency, prevalence_rate, red_flags
     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
    rusqlite::params![
      encode_uuid(s.id),
      s.name,
      name_key(&s.name),
      s.description,
      s.category.to_string(),
      s.body_system,
      s.is_emergency,
      s.prevalence_rate,
      red_flags,
    ],
  )?;
  Ok(())
}

fn insert_disease(conn: &Connection, d: &Disease) -> rusqlite::Result<()> {
  conn.execute(
    "INSERT INTO diseases (
       disease_id, name, icd_10_code, description, severity_level,
       is_chronic, is_contagious, prevalence, mortality_rate
     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
    rusqlite::params![
      encode_uuid(d.id),
      d.name,
      d.icd_10_code,
      d.description,
      d.severity_level.to_string(),
      d.is_chronic,
      d.is_contagious,
      d.prevalence,
      d.mortality_rate,
    ],
  )?;
  Ok(())
}

fn insert_association(conn: &Connection, e: &SymptomDiseaseAssociation) -> rusqlite::Result<()> {
  conn.execute(
    "INSERT INTO symptom_disease_mapping (
       symptom_id, disease_id, probability_weight, severity_modifier
     ) VALUES (?1, ?2, ?3, ?4)",
    rusqlite::params![
      encode_uuid(e.symptom_id),
      encode_uuid(e.disease_id),
      e.probability_weight,
      e.severity_modifier,
    ],
  )?;
  Ok(())
}

fn insert_treatment(conn: &Connection, t: &Treatment) -> rusqlite::Result<()> {
  conn.execute(
    "INSERT INTO treatments (
       treatment_id, name, kind, description, effectiveness_rate,
       requires_prescription, cost_category
     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    rusqlite::params![
      encode_uuid(t.id),
      t.name,
      t.kind.to_string(),
      t.description,
      t.effectiveness_rate,
      t.requires_prescription,
      t.cost_category,
    ],
  )?;
  Ok(())
}

fn insert_treatment_link(conn: &Connection, l: &DiseaseTreatment) -> rusqlite::Result<()> {
  conn.execute(
    "INSERT INTO disease_treatment_mapping (
       disease_id, treatment_id, effectiveness_score, recommendation_level
     ) VALUES (?1, ?2, ?3, ?4)",
    rusqlite::params![
      encode_uuid(l.disease_id),
      encode_uuid(l.treatment_id),
      l.effectiveness_score,
      l.recommendation_level.to_string(),
    ],
  )?;
  Ok(())
}

fn insert_medication(
  conn: &Connection,
  m: &Medication,
  lists: &MedicationLists,
) -> rusqlite::Result<()> {
  conn.execute(
    "INSERT INTO medications (
       medication_id, generic_name, brand_names, drug_class,
       mechanism_of_action, indications, contraindications, side_effects,
       pregnancy_category, requires_monitoring, is_controlled_substance
     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
    rusqlite::params![
      encode_uuid(m.id),
      m.generic_name,
      lists.brand_names,
      m.drug_class,
      m.mechanism_of_action,
      lists.indications,
      lists.contraindications,
      lists.side_effects,
      m.pregnancy_category,
      m.requires_monitoring,
      m.is_controlled_substance,
    ],
  )?;
  Ok(())
}

fn insert_interaction(conn: &Connection, i: &DrugInteraction) -> rusqlite::Result<()> {
  conn.execute(
    "INSERT INTO drug_interactions (
       drug_a_id, drug_b_id, interaction_type, severity, clinical_effect, management
     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    rusqlite::params![
      encode_uuid(i.drug_a_id),
      encode_uuid(i.drug_b_id),
      i.interaction_type,
      i.severity,
      i.clinical_effect,
      i.management,
    ],
  )?;
  Ok(())
}

fn insert_lab_marker(conn: &Connection, m: &LabMarker) -> rusqlite::Result<()> {
  conn.execute(
    "INSERT INTO lab_markers (
       marker_id, name, test_type, units, normal_range_min, normal_range_max,
       normal_range_text, critical_low, critical_high, clinical_significance,
       disease_id
     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
    rusqlite::params![
      encode_uuid(m.id),
      m.name,
      m.test_type,
      m.units,
      m.normal_range_min,
      m.normal_range_max,
      m.normal_range_text,
      m.critical_low,
      m.critical_high,
      m.clinical_significance,
      m.disease_id.map(encode_uuid),
    ],
  )?;
  Ok(())
}

fn insert_guideline(conn: &Connection, g: &Guideline) -> rusqlite::Result<()> {
  conn.execute(
    "INSERT INTO medical_guidelines (
       guideline_id, title, organization, version, evidence_level,
       guideline_type, content, publication_date, is_active
     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
    rusqlite::params![
      encode_uuid(g.id),
      g.title,
      g.organization,
      g.version,
      g.evidence_level,
      g.guideline_type,
      g.content,
      g.publication_date.map(encode_date),
      g.is_active,
    ],
  )?;
  Ok(())
}

/// The first name in `snapshot` that is already taken, by the store or by an
/// earlier row of the same kind.
fn first_duplicate(
  conn: &Connection,
  snapshot: &Snapshot,
) -> rusqlite::Result<Option<CoreError>> {
  fn clash<'a>(
    conn: &Connection,
    kind: &'static str,
    table: &str,
    column: &str,
    names: impl Iterator<Item = (&'a str, String)>,
  ) -> rusqlite::Result<Option<CoreError>> {
    let mut seen = std::collections::HashSet::new();
    for (name, key) in names {
      if !seen.insert(key.clone()) || row_exists(conn, table, column, &key)? {
        return Ok(Some(CoreError::DuplicateName { kind, name: name.to_owned() }));
      }
    }
    Ok(None)
  }

  if let Some(dup) = clash(
    conn,
    "symptom",
    "symptoms",
    "name_key",
    snapshot.symptoms.iter().map(|s| (s.name.as_str(), name_key(&s.name))),
  )? {
    return Ok(Some(dup));
  }
  if let Some(dup) = clash(
    conn,
    "disease",
    "diseases",
    "name",
    snapshot.diseases.iter().map(|d| (d.name.as_str(), d.name.clone())),
  )? {
    return Ok(Some(dup));
  }
  clash(
    conn,
    "medication",
    "medications",
    "generic_name",
    snapshot
      .medications
      .iter()
      .map(|m| (m.generic_name.as_str(), m.generic_name.clone())),
  )
}

// ─── KnowledgeStore impl ─────────────────────────────────────────────────────

impl KnowledgeStore for SqliteStore {
  type Error = Error;

  // ── Symptoms and diseases ─────────────────────────────────────────────

  async fn add_symptom(&self, input: NewSymptom) -> Result<Symptom> {
    if self.name_taken("symptoms", "name_key", name_key(&input.name)).await? {
      return Err(CoreError::DuplicateName { kind: "symptom", name: input.name }.into());
    }

    let symptom = input.into_symptom(Uuid::new_v4());
    let s = symptom.clone();
    let red_flags = encode_list(&s.red_flags)?;
    self
      .conn
      .call(move |conn| Ok(insert_symptom(conn, &s, &red_flags)?))
      .await?;
    Ok(symptom)
  }

  async fn add_disease(&self, input: NewDisease) -> Result<Disease> {
    if self.name_taken("diseases", "name", input.name.clone()).await? {
      return Err(CoreError::DuplicateName { kind: "disease", name: input.name }.into());
    }

    let disease = input.into_disease(Uuid::new_v4());
    let d = disease.clone();
    self.conn.call(move |conn| Ok(insert_disease(conn, &d)?)).await?;
    Ok(disease)
  }

  async fn associate(&self, edge: SymptomDiseaseAssociation) -> Result<()> {
    // Fields are public, so re-run the constructor's range check.
    let edge = SymptomDiseaseAssociation::new(
      edge.symptom_id,
      edge.disease_id,
      edge.probability_weight,
      edge.severity_modifier,
    )?;
    self
      .require("symptoms", "symptom_id", edge.symptom_id, CoreError::SymptomNotFound)
      .await?;
    self
      .require("diseases", "disease_id", edge.disease_id, CoreError::DiseaseNotFound)
      .await?;

    self.conn.call(move |conn| Ok(insert_association(conn, &edge)?)).await?;
    Ok(())
  }

  // ── Supplementary reference data ──────────────────────────────────────

  async fn add_treatment(&self, treatment: Treatment) -> Result<Treatment> {
    let t = treatment.clone();
    self.conn.call(move |conn| Ok(insert_treatment(conn, &t)?)).await?;
    Ok(treatment)
  }

  async fn link_treatment(&self, link: DiseaseTreatment) -> Result<()> {
    self
      .require("diseases", "disease_id", link.disease_id, CoreError::DiseaseNotFound)
      .await?;
    self
      .require("treatments", "treatment_id", link.treatment_id, CoreError::TreatmentNotFound)
      .await?;

    self.conn.call(move |conn| Ok(insert_treatment_link(conn, &link)?)).await?;
    Ok(())
  }

  async fn add_medication(&self, medication: Medication) -> Result<Medication> {
    if self
      .name_taken("medications", "generic_name", medication.generic_name.clone())
      .await?
    {
      return Err(
        CoreError::DuplicateName { kind: "medication", name: medication.generic_name }.into(),
      );
    }

    let m = medication.clone();
    let lists = MedicationLists::encode(&m)?;
    self
      .conn
      .call(move |conn| Ok(insert_medication(conn, &m, &lists)?))
      .await?;
    Ok(medication)
  }

  async fn add_drug_interaction(&self, interaction: DrugInteraction) -> Result<()> {
    for id in [interaction.drug_a_id, interaction.drug_b_id] {
      self
        .require("medications", "medication_id", id, CoreError::MedicationNotFound)
        .await?;
    }

    self
      .conn
      .call(move |conn| Ok(insert_interaction(conn, &interaction)?))
      .await?;
    Ok(())
  }

  async fn add_lab_marker(&self, marker: LabMarker) -> Result<LabMarker> {
    if let Some(disease_id) = marker.disease_id {
      self
        .require("diseases", "disease_id", disease_id, CoreError::DiseaseNotFound)
        .await?;
    }

    let m = marker.clone();
    self.conn.call(move |conn| Ok(insert_lab_marker(conn, &m)?)).await?;
    Ok(marker)
  }

  async fn add_guideline(&self, guideline: Guideline) -> Result<Guideline> {
    let g = guideline.clone();
    self.conn.call(move |conn| Ok(insert_guideline(conn, &g)?)).await?;
    Ok(guideline)
  }

  // ── Bulk ──────────────────────────────────────────────────────────────

  async fn import(&self, snapshot: Snapshot) -> Result<()> {
    for edge in &snapshot.associations {
      SymptomDiseaseAssociation::new(
        edge.symptom_id,
        edge.disease_id,
        edge.probability_weight,
        edge.severity_modifier,
      )?;
    }
    let red_flags = snapshot
      .symptoms
      .iter()
      .map(|s| encode_list(&s.red_flags))
      .collect::<Result<Vec<_>>>()?;
    let medication_lists = snapshot
      .medications
      .iter()
      .map(MedicationLists::encode)
      .collect::<Result<Vec<_>>>()?;

    let rows = snapshot.symptoms.len() + snapshot.diseases.len() + snapshot.associations.len();

    // Dropping `tx` without committing rolls the whole import back.
    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        if let Some(dup) = first_duplicate(&tx, &snapshot)? {
          return Ok(Err(dup));
        }
        for (s, flags) in snapshot.symptoms.iter().zip(&red_flags) {
          insert_symptom(&tx, s, flags)?;
        }
        for d in &snapshot.diseases {
          insert_disease(&tx, d)?;
        }
        for e in &snapshot.associations {
          insert_association(&tx, e)?;
        }
        for t in &snapshot.treatments {
          insert_treatment(&tx, t)?;
        }
        for l in &snapshot.treatment_links {
          insert_treatment_link(&tx, l)?;
        }
        for (m, lists) in snapshot.medications.iter().zip(&medication_lists) {
          insert_medication(&tx, m, lists)?;
        }
        for i in &snapshot.drug_interactions {
          insert_interaction(&tx, i)?;
        }
        for m in &snapshot.lab_markers {
          insert_lab_marker(&tx, m)?;
        }
        for g in &snapshot.guidelines {
          insert_guideline(&tx, g)?;
        }
        tx.commit()?;
        Ok(Ok(()))
      })
      .await?;
    outcome?;

    tracing::debug!(rows, "imported knowledge snapshot");
    Ok(())
  }

  // ── Reads ─────────────────────────────────────────────────────────────

  async fn snapshot(&self) -> Result<Snapshot> {
    let raw = self.conn.call(|conn| Ok(RawSnapshot::read(conn)?)).await?;
    let snapshot = raw.decode()?;
    tracing::debug!(
      symptoms = snapshot.symptoms.len(),
      diseases = snapshot.diseases.len(),
      associations = snapshot.associations.len(),
      "read knowledge snapshot"
    );
    Ok(snapshot)
  }
}
