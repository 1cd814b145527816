//! Deduplicated collection of questions answered incorrectly or skipped.

use serde::{Deserialize, Serialize};

use crate::domain::Question;

/// Missed questions accumulated during a pass, keyed by question id.
///
/// Insertion has set semantics: recording the same question twice leaves one
/// entry. Order of first insertion is preserved so review rounds replay
/// misses in the order they happened.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MissedTracker {
  items: Vec<Question>,
}

impl MissedTracker {
  pub fn new() -> Self {
    Self::default()
  }

  /// Insert by id if not already present (idempotent)
  pub fn record(&mut self, question: &Question) {
    if !self.contains(&question.id) {
      self.items.push(question.clone());
    }
  }

  /// Remove a question by id (no-op if absent)
  pub fn remove(&mut self, id: &str) {
    self.items.retain(|q| q.id != id);
  }

  pub fn contains(&self, id: &str) -> bool {
    self.items.iter().any(|q| q.id == id)
  }

  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }

  pub fn len(&self) -> usize {
    self.items.len()
  }

  /// Hand the current contents over as the next working set, leaving the
  /// tracker empty.
  pub fn drain(&mut self) -> Vec<Question> {
    std::mem::take(&mut self.items)
  }

  pub fn clear(&mut self) {
    self.items.clear();
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn question(id: &str) -> Question {
    serde_json::from_value(serde_json::json!({
      "id": id,
      "question": format!("Q{}", id),
      "answer": format!("A{}", id),
    }))
    .unwrap()
  }

  #[test]
  fn test_new_is_empty() {
    let tracker = MissedTracker::new();
    assert!(tracker.is_empty());
    assert_eq!(tracker.len(), 0);
  }

  #[test]
  fn test_record_is_idempotent() {
    let mut tracker = MissedTracker::new();
    let q = question("7");

    tracker.record(&q);
    tracker.record(&q);
    tracker.record(&q);

    assert_eq!(tracker.len(), 1);
  }

  #[test]
  fn test_record_preserves_first_seen_order() {
    let mut tracker = MissedTracker::new();
    tracker.record(&question("2"));
    tracker.record(&question("1"));
    tracker.record(&question("2"));

    let drained = tracker.drain();
    let ids: Vec<&str> = drained.iter().map(|q| q.id.as_str()).collect();
    assert_eq!(ids, vec!["2", "1"]);
  }

  #[test]
  fn test_remove_by_id() {
    let mut tracker = MissedTracker::new();
    tracker.record(&question("1"));
    tracker.record(&question("2"));

    tracker.remove("1");

    assert_eq!(tracker.len(), 1);
    assert!(!tracker.contains("1"));
    assert!(tracker.contains("2"));
  }

  #[test]
  fn test_remove_absent_id_is_noop() {
    let mut tracker = MissedTracker::new();
    tracker.record(&question("1"));
    tracker.remove("99");
    assert_eq!(tracker.len(), 1);
  }

  #[test]
  fn test_drain_empties_tracker() {
    let mut tracker = MissedTracker::new();
    tracker.record(&question("1"));
    tracker.record(&question("2"));

    let drained = tracker.drain();
    assert_eq!(drained.len(), 2);
    assert!(tracker.is_empty());
  }
}
