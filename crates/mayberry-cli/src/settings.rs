//! Runtime configuration: an optional TOML file overlaid with `MAYBERRY_*`
//! environment variables.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use mayberry_core::{
  analysis::DEFAULT_TOP_MATCHES, knowledge::DEFAULT_SEARCH_LIMIT,
  memory::DEFAULT_MEMORY_CAPACITY,
};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
  /// SQLite file holding the reference data. A leading `~/` is expanded.
  pub store_path:      PathBuf,
  /// Default page size for `search-*` commands.
  pub search_limit:    usize,
  /// Candidates reported by `analyze` and `chat`.
  pub top_matches:     usize,
  /// Medical-memory entries kept per user.
  pub memory_capacity: usize,
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      store_path:      PathBuf::from("mayberry.db"),
      search_limit:    DEFAULT_SEARCH_LIMIT,
      top_matches:     DEFAULT_TOP_MATCHES,
      memory_capacity: DEFAULT_MEMORY_CAPACITY,
    }
  }
}

impl AppConfig {
  /// Read `path` (if it exists) and the environment.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("MAYBERRY").try_parsing(true))
      .build()
      .context("failed to read config file")?;

    let mut cfg: Self = settings
      .try_deserialize()
      .context("failed to deserialise AppConfig")?;
    cfg.store_path = expand_tilde(&cfg.store_path);
    Ok(cfg)
  }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
