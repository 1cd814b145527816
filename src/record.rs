//! Fire-and-forget answer recording.
//!
//! Each judged answer is reported to an optional telemetry endpoint in a
//! background task. The quiz flow never waits on recording and never fails
//! because of it; errors are logged and dropped.

use chrono::Utc;

/// Extension trait for logging errors without propagating them
pub trait LogOnError<T> {
  /// Log the error at warn level and return None
  fn log_warn(self, context: &str) -> Option<T>;
  /// Log the error at warn level and return the default
  fn log_warn_default(self, context: &str) -> T
  where
    T: Default;
}

impl<T, E: std::fmt::Display> LogOnError<T> for Result<T, E> {
  fn log_warn(self, context: &str) -> Option<T> {
    match self {
      Ok(v) => Some(v),
      Err(e) => {
        tracing::warn!("{}: {}", context, e);
        None
      }
    }
  }

  fn log_warn_default(self, context: &str) -> T
  where
    T: Default,
  {
    match self {
      Ok(v) => v,
      Err(e) => {
        tracing::warn!("{}: {}", context, e);
        T::default()
      }
    }
  }
}

#[derive(Debug, Clone)]
pub struct AnswerRecorder {
  client: reqwest::Client,
  endpoint: Option<String>,
}

impl AnswerRecorder {
  /// No endpoint simply disables recording
  pub fn new(endpoint: Option<String>) -> Self {
    Self {
      client: reqwest::Client::new(),
      endpoint,
    }
  }

  pub fn disabled() -> Self {
    Self::new(None)
  }

  pub fn is_enabled(&self) -> bool {
    self.endpoint.is_some()
  }

  /// Report one judged answer in the background.
  ///
  /// `user` is the session ID, sent as both user id and display name since
  /// there is no account system; `question_id` must be the pre-shuffle
  /// identity, already resolved by the engine through `original_index`.
  pub fn record(&self, user: &str, question_id: &str, correct: bool) {
    let Some(endpoint) = self.endpoint.clone() else {
      return;
    };
    let client = self.client.clone();
    let payload = record_payload(user, question_id, correct);

    tokio::spawn(async move {
      client
        .post(&endpoint)
        .json(&payload)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .log_warn("Failed to record answer");
    });
  }
}

fn record_payload(user: &str, question_id: &str, correct: bool) -> serde_json::Value {
  serde_json::json!({
    "userId": user,
    "userName": user,
    "questionId": question_id,
    "correct": correct,
    "answeredAt": Utc::now().to_rfc3339(),
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_log_warn_passes_ok_through() {
    let result: Result<u32, String> = Ok(5);
    assert_eq!(result.log_warn("context"), Some(5));
  }

  #[test]
  fn test_log_warn_swallows_err() {
    let result: Result<u32, String> = Err("boom".to_string());
    assert_eq!(result.log_warn("context"), None);
  }

  #[test]
  fn test_log_warn_default_on_err() {
    let result: Result<Vec<u32>, String> = Err("boom".to_string());
    assert!(result.log_warn_default("context").is_empty());
  }

  #[test]
  fn test_payload_carries_user_id_and_name() {
    let payload = record_payload("session-abc", "12", true);
    assert_eq!(payload["userId"], "session-abc");
    assert_eq!(payload["userName"], "session-abc");
    assert_eq!(payload["questionId"], "12");
    assert_eq!(payload["correct"], true);
    assert!(payload["answeredAt"].is_string());
  }

  #[test]
  fn test_disabled_recorder_is_a_noop() {
    let recorder = AnswerRecorder::disabled();
    assert!(!recorder.is_enabled());
    // Returns before spawning, so no runtime is needed
    recorder.record("session", "1", true);
  }
}
