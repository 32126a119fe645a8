//! `mayberry`: command-line front end for the Mayberry knowledge base.
//!
//! Reads `mayberry.toml` (or the path given with `--config`) plus `MAYBERRY_*`
//! environment variables, opens the SQLite store and runs one command. Every
//! command prints its result as pretty JSON on stdout.
//!
//! ```text
//! mayberry seed
//! mayberry analyze Fever Cough Fatigue --age 42
//! mayberry chat --user alice "I have severe chest pain"
//! ```

mod settings;

use std::{
  io::{self, BufRead as _},
  path::PathBuf,
  sync::Arc,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use mayberry_core::{
  analysis::Demographics,
  emergency::{EmergencyResponse, detect_emergency},
  health::HealthReport,
  knowledge::KnowledgeBase,
  memory::MedicalMemory,
  responder::MedicalResponder,
};
use mayberry_store_sqlite::{SqliteStore, seed::seed};
use serde::Serialize;
use settings::AppConfig;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "mayberry", author, version, about = "Symptom and disease knowledge base")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "mayberry.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Load the bundled reference data into an empty store.
  Seed,

  /// Probe the knowledge base.
  Health,

  #[command(flatten)]
  Query(Query),
}

/// Commands that run against a loaded knowledge base.
#[derive(Subcommand)]
enum Query {
  /// Symptoms whose name or description contains QUERY.
  SearchSymptoms {
    query: String,
    #[arg(short, long)]
    limit: Option<usize>,
  },

  /// Diseases whose name or description contains QUERY.
  SearchDiseases {
    query: String,
    #[arg(short, long)]
    limit: Option<usize>,
  },

  /// Symptoms that always warrant emergency care.
  EmergencySymptoms,

  /// Rank every disease sharing a symptom with the input.
  Predict {
    #[arg(required = true)]
    symptoms: Vec<String>,
  },

  /// Match, classify risk and report the best candidates.
  Analyze {
    #[arg(required = true)]
    symptoms: Vec<String>,
    #[arg(long)]
    age:      Option<u32>,
    #[arg(long)]
    gender:   Option<String>,
    /// Candidates to report (defaults to `top_matches` from config).
    #[arg(long)]
    top:      Option<usize>,
  },

  /// Scan free text for emergency keywords.
  Emergency { text: String },

  /// Answer free-text messages. Without MESSAGE, reads one message per line
  /// from stdin and keeps the medical memory across lines.
  Chat {
    #[arg(short, long)]
    user:    Option<String>,
    message: Option<String>,
  },

  /// Treatments linked to the first disease matching NAME.
  Treatments { disease: String },

  /// Medication by generic or brand name.
  Medication { name: String },

  /// Recorded interactions among the given medications.
  Interactions {
    #[arg(required = true, num_args = 2..)]
    names: Vec<String>,
  },

  /// Interpret a lab value against the marker's reference ranges.
  Lab { marker: String, value: f64 },

  /// Active guidelines whose title contains TOPIC.
  Guidelines {
    topic:        String,
    #[arg(long)]
    organization: Option<String>,
  },
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Logs go to stderr so stdout stays valid JSON.
  tracing_subscriber::fmt()
    .with_writer(io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let cfg = AppConfig::load(&cli.config)?;

  match cli.command {
    Command::Health => {
      let report = match load(&cfg).await {
        Ok(kb) => kb.health(),
        Err(e) => HealthReport::unavailable(format!("{e:#}")),
      };
      print_json(&report)
    }
    Command::Seed => {
      let store = open(&cfg).await?;
      match seed(&store).await.context("failed to seed store")? {
        Some(r) => print_json(&serde_json::json!({
          "seeded":            true,
          "symptoms":          r.symptoms,
          "diseases":          r.diseases,
          "associations":      r.associations,
          "treatments":        r.treatments,
          "medications":       r.medications,
          "drug_interactions": r.drug_interactions,
          "lab_markers":       r.lab_markers,
          "guidelines":        r.guidelines,
        })),
        None => print_json(&serde_json::json!({ "seeded": false })),
      }
    }
    Command::Query(query) => {
      let kb = load(&cfg).await?;
      run(query, kb, &cfg)
    }
  }
}

async fn open(cfg: &AppConfig) -> anyhow::Result<SqliteStore> {
  SqliteStore::open(&cfg.store_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", cfg.store_path))
}

async fn load(cfg: &AppConfig) -> anyhow::Result<Arc<KnowledgeBase>> {
  let store = open(cfg).await?;
  let kb = KnowledgeBase::load(&store)
    .await
    .context("failed to load knowledge base")?;
  Ok(Arc::new(kb))
}

// ─── Commands ─────────────────────────────────────────────────────────────────

fn run(query: Query, kb: Arc<KnowledgeBase>, cfg: &AppConfig) -> anyhow::Result<()> {
  match query {
    Query::SearchSymptoms { query, limit } => {
      print_json(&kb.search_symptoms(&query, limit.unwrap_or(cfg.search_limit)))
    }
    Query::SearchDiseases { query, limit } => {
      print_json(&kb.search_diseases(&query, limit.unwrap_or(cfg.search_limit)))
    }
    Query::EmergencySymptoms => print_json(&kb.emergency_symptoms()),
    Query::Predict { symptoms } => print_json(&kb.match_diseases(&symptoms)),
    Query::Analyze { symptoms, age, gender, top } => print_json(&kb.analyze_symptoms(
      &symptoms,
      Demographics { age, gender },
      top.unwrap_or(cfg.top_matches),
    )),
    Query::Emergency { text } => {
      let assessment = detect_emergency(&text);
      let response = EmergencyResponse::for_assessment(&assessment);
      print_json(&serde_json::json!({
        "assessment": assessment,
        "response":   response,
      }))
    }
    Query::Chat { user, message } => {
      let memory = Arc::new(MedicalMemory::new(cfg.memory_capacity));
      let responder = MedicalResponder::new(kb, memory).with_top_matches(cfg.top_matches);
      match message {
        Some(text) => print_json(&responder.respond(user.as_deref(), &text)),
        None => {
          for line in io::stdin().lock().lines() {
            let line = line.context("failed to read stdin")?;
            if line.trim().is_empty() {
              continue;
            }
            print_json(&responder.respond(user.as_deref(), &line))?;
          }
          Ok(())
        }
      }
    }
    Query::Treatments { disease } => print_json(&kb.treatments_for_disease(&disease)),
    Query::Medication { name } => print_json(&kb.medication_info(&name)),
    Query::Interactions { names } => print_json(&kb.check_drug_interactions(&names)),
    Query::Lab { marker, value } => print_json(&kb.interpret_lab_value(&marker, value)),
    Query::Guidelines { topic, organization } => {
      print_json(&kb.guidelines(&topic, organization.as_deref()))
    }
  }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
  let out = serde_json::to_string_pretty(value).context("failed to encode output")?;
  println!("{out}");
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn query_subcommands_parse_under_the_top_level() {
    let cli = Cli::try_parse_from(["mayberry", "emergency-symptoms"]).unwrap();
    assert!(matches!(cli.command, Command::Query(Query::EmergencySymptoms)));

    let cli = Cli::try_parse_from(["mayberry", "lab", "glucose", "450"]).unwrap();
    assert!(matches!(
      cli.command,
      Command::Query(Query::Lab { ref marker, value }) if marker == "glucose" && value == 450.0
    ));
  }

  #[test]
  fn interactions_needs_two_names() {
    assert!(Cli::try_parse_from(["mayberry", "interactions", "advil"]).is_err());
  }
}
