//! SQL schema for the Mayberry SQLite store.
//!
//! Executed once at connection startup. Every table keeps its implicit
//! `rowid`, and reads order by it so snapshots come back in insertion order.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS symptoms (
    symptom_id      TEXT PRIMARY KEY,
    name            TEXT NOT NULL,
    name_key        TEXT NOT NULL UNIQUE,  -- `symptom::name_key(name)`
    description     TEXT NOT NULL DEFAULT '',
    category        TEXT NOT NULL,   -- 'physical' | 'psychological' | 'behavioral'
    body_system     TEXT NOT NULL,
    is_emergency    INTEGER NOT NULL DEFAULT 0,
    prevalence_rate REAL,
    red_flags       TEXT NOT NULL DEFAULT '[]'
);

CREATE TABLE IF NOT EXISTS diseases (
    disease_id     TEXT PRIMARY KEY,
    name           TEXT NOT NULL UNIQUE,
    icd_10_code    TEXT,
    description    TEXT NOT NULL DEFAULT '',
    severity_level TEXT NOT NULL,    -- 'mild' | 'moderate' | 'severe' | 'critical'
    is_chronic     INTEGER NOT NULL DEFAULT 0,
    is_contagious  INTEGER NOT NULL DEFAULT 0,
    prevalence     REAL,
    mortality_rate REAL
);

CREATE TABLE IF NOT EXISTS symptom_disease_mapping (
    symptom_id         TEXT NOT NULL REFERENCES symptoms(symptom_id),
    disease_id         TEXT NOT NULL REFERENCES diseases(disease_id),
    probability_weight REAL NOT NULL DEFAULT 0.5,
    severity_modifier  REAL NOT NULL DEFAULT 1.0,
    PRIMARY KEY (symptom_id, disease_id),
    CHECK (probability_weight BETWEEN 0.0 AND 1.0)
);

CREATE TABLE IF NOT EXISTS treatments (
    treatment_id          TEXT PRIMARY KEY,
    name                  TEXT NOT NULL,
    kind                  TEXT NOT NULL,  -- 'medication' | 'procedure' | 'lifestyle' | 'therapy'
    description           TEXT NOT NULL DEFAULT '',
    effectiveness_rate    REAL,
    requires_prescription INTEGER NOT NULL DEFAULT 0,
    cost_category         TEXT
);

CREATE TABLE IF NOT EXISTS disease_treatment_mapping (
    disease_id           TEXT NOT NULL REFERENCES diseases(disease_id),
    treatment_id         TEXT NOT NULL REFERENCES treatments(treatment_id),
    effectiveness_score  REAL NOT NULL,
    recommendation_level TEXT NOT NULL DEFAULT 'standard',
    PRIMARY KEY (disease_id, treatment_id)
);

-- List-valued columns hold JSON arrays of strings.
CREATE TABLE IF NOT EXISTS medications (
    medication_id           TEXT PRIMARY KEY,
    generic_name            TEXT NOT NULL UNIQUE COLLATE NOCASE,
    brand_names             TEXT NOT NULL DEFAULT '[]',
    drug_class              TEXT NOT NULL,
    mechanism_of_action     TEXT,
    indications             TEXT NOT NULL DEFAULT '[]',
    contraindications       TEXT NOT NULL DEFAULT '[]',
    side_effects            TEXT NOT NULL DEFAULT '[]',
    pregnancy_category      TEXT,
    requires_monitoring     INTEGER NOT NULL DEFAULT 0,
    is_controlled_substance INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS drug_interactions (
    drug_a_id        TEXT NOT NULL REFERENCES medications(medication_id),
    drug_b_id        TEXT NOT NULL REFERENCES medications(medication_id),
    interaction_type TEXT NOT NULL,
    severity         INTEGER NOT NULL,
    clinical_effect  TEXT NOT NULL DEFAULT '',
    management       TEXT NOT NULL DEFAULT '',
    CHECK (severity BETWEEN 1 AND 5)
);

CREATE TABLE IF NOT EXISTS lab_markers (
    marker_id             TEXT PRIMARY KEY,
    name                  TEXT NOT NULL,
    test_type             TEXT NOT NULL,
    units                 TEXT,
    normal_range_min      REAL,
    normal_range_max      REAL,
    normal_range_text     TEXT,
    critical_low          REAL,
    critical_high         REAL,
    clinical_significance TEXT,
    disease_id            TEXT REFERENCES diseases(disease_id)
);

CREATE TABLE IF NOT EXISTS medical_guidelines (
    guideline_id     TEXT PRIMARY KEY,
    title            TEXT NOT NULL,
    organization     TEXT NOT NULL,
    version          TEXT,
    evidence_level   TEXT,
    guideline_type   TEXT NOT NULL,
    content          TEXT NOT NULL DEFAULT '',
    publication_date TEXT,           -- ISO 8601 date
    is_active        INTEGER NOT NULL DEFAULT 1
);

CREATE INDEX IF NOT EXISTS mapping_disease_idx ON symptom_disease_mapping(disease_id);

PRAGMA user_version = 1;
";
