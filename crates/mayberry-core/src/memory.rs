//! Per-user medical memory: a bounded history of recently mentioned symptoms
//! and medications used to personalise free-text replies.
//!
//! This is a cache, not a record. Dropping it loses personalisation only.
//! Each user has their own lock, so writers for different users never wait
//! on each other while writers for one user serialize.

use std::{
  collections::{HashMap, VecDeque},
  sync::{Arc, Mutex, PoisonError, RwLock},
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Entries kept per user before the oldest are evicted.
pub const DEFAULT_MEMORY_CAPACITY: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemoryKind {
  Symptom,
  Medication,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryEntry {
  pub kind:        MemoryKind,
  pub name:        String,
  pub recorded_at: DateTime<Utc>,
}

impl MemoryEntry {
  pub fn new(kind: MemoryKind, name: impl Into<String>) -> Self {
    Self { kind, name: name.into(), recorded_at: Utc::now() }
  }
}

type History = Arc<Mutex<VecDeque<MemoryEntry>>>;

#[derive(Debug)]
pub struct MedicalMemory {
  capacity: usize,
  users:    RwLock<HashMap<String, History>>,
}

impl Default for MedicalMemory {
  fn default() -> Self { Self::new(DEFAULT_MEMORY_CAPACITY) }
}

impl MedicalMemory {
  pub fn new(capacity: usize) -> Self {
    Self { capacity, users: RwLock::new(HashMap::new()) }
  }

  fn history(&self, user_id: &str) -> History {
    if let Some(h) = self
      .users
      .read()
      .unwrap_or_else(PoisonError::into_inner)
      .get(user_id)
    {
      return Arc::clone(h);
    }
    let mut users = self.users.write().unwrap_or_else(PoisonError::into_inner);
    Arc::clone(users.entry(user_id.to_owned()).or_default())
  }

  /// Append `entries` to the user's history, then trim it to capacity.
  pub fn record<I>(&self, user_id: &str, entries: I)
  where
    I: IntoIterator<Item = MemoryEntry>,
  {
    let history = self.history(user_id);
    let mut history = history.lock().unwrap_or_else(PoisonError::into_inner);
    history.extend(entries);
    let overflow = history.len().saturating_sub(self.capacity);
    if overflow > 0 {
      history.drain(..overflow);
      tracing::debug!(user_id, evicted = overflow, "medical memory trimmed");
    }
  }

  /// The user's history, oldest first. Unknown users have an empty history.
  pub fn recall(&self, user_id: &str) -> Vec<MemoryEntry> {
    let users = self.users.read().unwrap_or_else(PoisonError::into_inner);
    users
      .get(user_id)
      .map(|h| {
        h.lock()
          .unwrap_or_else(PoisonError::into_inner)
          .iter()
          .cloned()
          .collect()
      })
      .unwrap_or_default()
  }

  /// Distinct names of `kind`, most recent first.
  pub fn recent(&self, user_id: &str, kind: MemoryKind) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for entry in self.recall(user_id).into_iter().rev() {
      if entry.kind == kind && !names.contains(&entry.name) {
        names.push(entry.name);
      }
    }
    names
  }

  /// Drop everything remembered about `user_id`.
  ///
  /// A `record` for the same user that is already in flight finishes against
  /// the dropped history, so its entries are lost too.
  pub fn forget(&self, user_id: &str) {
    self
      .users
      .write()
      .unwrap_or_else(PoisonError::into_inner)
      .remove(user_id);
  }
}

#[cfg(test)]
mod tests {
  use std::thread;

  use super::*;

  fn symptom(name: &str) -> MemoryEntry { MemoryEntry::new(MemoryKind::Symptom, name) }

  #[test]
  fn history_is_bounded_and_keeps_the_newest() {
    let memory = MedicalMemory::new(3);
    memory.record("u1", ["a", "b", "c", "d", "e"].map(symptom));
    let names: Vec<_> = memory.recall("u1").into_iter().map(|e| e.name).collect();
    assert_eq!(names, ["c", "d", "e"]);
  }

  #[test]
  fn users_are_isolated() {
    let memory = MedicalMemory::default();
    memory.record("u1", [symptom("Fever")]);
    memory.record("u2", [MemoryEntry::new(MemoryKind::Medication, "Ibuprofen")]);

    assert_eq!(memory.recent("u1", MemoryKind::Symptom), ["Fever"]);
    assert!(memory.recent("u1", MemoryKind::Medication).is_empty());
    assert_eq!(memory.recent("u2", MemoryKind::Medication), ["Ibuprofen"]);
    assert!(memory.recall("nobody").is_empty());
  }

  #[test]
  fn recent_is_distinct_and_newest_first() {
    let memory = MedicalMemory::default();
    memory.record("u1", ["Fever", "Cough", "Fever"].map(symptom));
    assert_eq!(memory.recent("u1", MemoryKind::Symptom), ["Fever", "Cough"]);
  }

  #[test]
  fn concurrent_writers_for_one_user_lose_nothing() {
    let memory = MedicalMemory::new(1_000);
    thread::scope(|scope| {
      for t in 0..8 {
        let memory = &memory;
        scope.spawn(move || {
          for i in 0..25 {
            memory.record("shared", [symptom(&format!("{t}-{i}"))]);
          }
        });
      }
    });
    assert_eq!(memory.recall("shared").len(), 200);
  }

  #[test]
  fn forget_clears_a_user() {
    let memory = MedicalMemory::default();
    memory.record("u1", [symptom("Fever")]);
    memory.forget("u1");
    assert!(memory.recall("u1").is_empty());
  }
}
