//! Simple in-memory session storage for quiz sessions.
//!
//! Stores QuizSession state keyed by session ID (carried in request bodies).
//! Sessions auto-expire after a configurable duration of inactivity.
//!
//! Mutation happens in place under the store lock, so a submission's tracker
//! write is always visible to the advance that follows it.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{LazyLock, Mutex};

use crate::config;
use crate::engine::QuizSession;

/// Session entry with last access time for expiration
struct SessionEntry {
  session: QuizSession,
  last_access: DateTime<Utc>,
}

/// Global session store
static SESSIONS: LazyLock<Mutex<HashMap<String, SessionEntry>>> =
  LazyLock::new(|| Mutex::new(HashMap::new()));

/// Insert or replace the session for the given ID
pub fn insert_session(session_id: &str, session: QuizSession) {
  let mut sessions = SESSIONS.lock().expect("Session store lock poisoned");

  // Clean up expired sessions occasionally (~10% chance)
  if rand::random::<u8>() < config::SESSION_CLEANUP_THRESHOLD {
    cleanup_expired(&mut sessions);
  }

  sessions.insert(
    session_id.to_string(),
    SessionEntry {
      session,
      last_access: Utc::now(),
    },
  );
}

/// Run `f` against the stored session in place. Returns None when the ID is
/// unknown or expired.
pub fn with_session<T>(session_id: &str, f: impl FnOnce(&mut QuizSession) -> T) -> Option<T> {
  let mut sessions = SESSIONS.lock().expect("Session store lock poisoned");

  if rand::random::<u8>() < config::SESSION_CLEANUP_THRESHOLD {
    cleanup_expired(&mut sessions);
  }

  let entry = sessions.get_mut(session_id)?;
  entry.last_access = Utc::now();
  Some(f(&mut entry.session))
}

pub fn remove_session(session_id: &str) {
  let mut sessions = SESSIONS.lock().expect("Session store lock poisoned");
  sessions.remove(session_id);
}

/// Clean up expired sessions
fn cleanup_expired(sessions: &mut HashMap<String, SessionEntry>) {
  let expiry = Utc::now() - Duration::hours(config::SESSION_EXPIRY_HOURS);
  sessions.retain(|_, entry| entry.last_access > expiry);
}

/// Generate a new session ID
pub fn generate_session_id() -> String {
  use rand::Rng;
  let mut rng = rand::rng();
  (0..32)
    .map(|_| {
      let idx = rng.random_range(0..36);
      if idx < 10 {
        (b'0' + idx) as char
      } else {
        (b'a' + idx - 10) as char
      }
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::QuizFeatures;

  #[test]
  fn test_unknown_session_is_none() {
    assert!(with_session("no-such-session", |_| ()).is_none());
  }

  #[test]
  fn test_in_place_mutation_is_visible_to_next_access() {
    let id = "test-session-mutation";
    insert_session(id, QuizSession::new(Vec::new(), QuizFeatures::default()));

    with_session(id, |s| s.restart()).unwrap();
    let epoch = with_session(id, |s| s.epoch).unwrap();
    assert_eq!(epoch, 1);

    remove_session(id);
    assert!(with_session(id, |_| ()).is_none());
  }

  #[test]
  fn test_generated_ids_are_lowercase_alphanumeric() {
    let id = generate_session_id();
    assert_eq!(id.len(), 32);
    assert!(id.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    assert_ne!(id, generate_session_id());
  }
}
