//! JSON API handlers for the quiz frontend.

pub mod quiz;
pub mod select;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::domain::ChatMessage;
use crate::engine::{EngineError, Prompt, QuizSession};

/// Uniform JSON error body for the API
#[derive(Debug)]
pub enum ApiError {
  UnknownSession,
  WrongPhase,
  Backend(String),
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match self {
      Self::UnknownSession => (
        StatusCode::NOT_FOUND,
        "unknown or expired session".to_string(),
      ),
      Self::WrongPhase => (
        StatusCode::CONFLICT,
        "operation is not valid in the current phase".to_string(),
      ),
      Self::Backend(message) => (StatusCode::BAD_GATEWAY, message),
    };
    (status, Json(serde_json::json!({ "error": message }))).into_response()
  }
}

impl From<EngineError> for ApiError {
  fn from(_: EngineError) -> Self {
    Self::WrongPhase
  }
}

/// Snapshot of everything the frontend renders for a session
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizState {
  pub phase: &'static str,
  pub review_round: u32,
  pub locked: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub prompt: Option<Prompt>,
  pub chat: Vec<ChatMessage>,
}

impl QuizState {
  pub fn snapshot(session: &QuizSession) -> Self {
    Self {
      phase: session.phase().name(),
      review_round: session.review_round(),
      locked: session.is_locked(),
      prompt: session.current_prompt(),
      chat: session.chat.clone(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::QuizFeatures;

  #[test]
  fn test_snapshot_of_fresh_session_has_no_prompt() {
    let session = QuizSession::new(Vec::new(), QuizFeatures::default());
    let state = QuizState::snapshot(&session);
    assert_eq!(state.phase, "selecting_genre");
    assert!(state.prompt.is_none());
    assert!(state.chat.is_empty());

    let json = serde_json::to_value(&state).unwrap();
    assert_eq!(json["reviewRound"], 0);
    assert!(json.get("prompt").is_none());
  }
}
